//! Domain model and seams for vscls.
//!
//! Everything outside this crate (the record store, the secret store, the
//! collaboration tool, the terminal) is reached through the traits defined
//! here.

pub mod auth;
pub mod collaboration;
pub mod config;
pub mod error;
pub mod secret;
pub mod session;
pub mod ui;

// Re-export common error type
pub use error::{Result, VsclsError};
