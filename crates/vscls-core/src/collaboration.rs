//! Collaboration tool seam.
//!
//! The external tool that produces joinable session links. vscls only
//! publishes and looks up those links; it never talks to the tool's service
//! directly.

use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait CollaborationApi: Send + Sync {
    /// Ends the local session, if one is running.
    async fn end(&self) -> Result<()>;

    /// Starts sharing and returns the session link.
    ///
    /// Some hosts start sharing without handing the link back; they return
    /// `Ok(None)` and the caller falls back to the clipboard.
    async fn share(&self) -> Result<Option<String>>;

    /// Joins the session behind `url`.
    async fn join(&self, url: &str) -> Result<()>;
}

/// Read access to the system clipboard.
#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn read_text(&self) -> Result<String>;
}
