//! Session backend trait.
//!
//! Defines the interface to the remote record store holding session records.

use super::model::{SessionDraft, SessionRecord};
use crate::error::Result;
use async_trait::async_trait;

/// Authenticated CRUD access to the session-record collection.
///
/// Every method except [`SessionBackend::authenticate`] requires a prior
/// successful authentication on the same instance and fails with
/// [`crate::VsclsError::Auth`] otherwise.
#[async_trait]
pub trait SessionBackend: Send + Sync {
    /// Exchanges the credentials for a token.
    ///
    /// A rejected pair, a transport failure, or a response without a usable
    /// token are all reported as `Auth` errors.
    async fn authenticate(&self, identifier: &str, secret: &str) -> Result<()>;

    /// Lists records using a single fixed-size page.
    ///
    /// Collections larger than the page size are truncated.
    async fn list_all(&self) -> Result<Vec<SessionRecord>>;

    /// Returns the records whose `machineId`, `projectName` and `deviceName`
    /// equal the given values exactly, in backend order.
    async fn find_by_identity(
        &self,
        machine_id: &str,
        project_name: &str,
        device_name: &str,
    ) -> Result<Vec<SessionRecord>>;

    /// Inserts a new record and returns it with `id` and timestamps.
    async fn create(&self, draft: &SessionDraft) -> Result<SessionRecord>;

    /// Replaces the writable fields of the record with the given id.
    async fn update(&self, id: &str, draft: &SessionDraft) -> Result<SessionRecord>;

    /// Deletes the record with the given id.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Record deleted
    /// - `Err(VsclsError::NotFound)`: No record with that id
    /// - `Err(_)`: Any other failure
    async fn delete(&self, id: &str) -> Result<()>;
}
