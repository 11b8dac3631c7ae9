//! Session records and their reconciliation.

pub mod model;
pub mod reconciler;
pub mod repository;

pub use model::{SessionDraft, SessionIdentity, SessionRecord};
pub use reconciler::{PublishOutcome, publish};
pub use repository::SessionBackend;
