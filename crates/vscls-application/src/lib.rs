//! Application layer for vscls.
//!
//! Coordinates the credential store, the backend client and the
//! collaboration tool into the five user-facing commands.

pub mod commands;
pub mod credentials;

pub use commands::{
    CommandContext, CommandOutcome, CreateSessionOptions, HostInfo, SessionCommands,
};
pub use credentials::{AcquisitionState, CredentialService};
