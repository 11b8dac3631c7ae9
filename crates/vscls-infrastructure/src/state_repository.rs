//! Generated per-machine state (`state.toml`).

use crate::paths::VsclsPaths;
use crate::storage::AtomicTomlFile;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;
use vscls_core::Result;

/// Contents of `state.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    /// Stable identifier of this device, part of every session identity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub machine_id: Option<String>,
    /// RFC 3339 time the machine id was generated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub machine_id_created_at: Option<String>,
}

/// Reads and initialises `state.toml`.
pub struct StateRepository {
    file: AtomicTomlFile<AppState>,
}

impl StateRepository {
    pub fn new(paths: &VsclsPaths) -> Self {
        Self::with_path(paths.state_file())
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: AtomicTomlFile::new(path),
        }
    }

    pub fn get_state(&self) -> Result<AppState> {
        Ok(self.file.load()?.unwrap_or_default())
    }

    /// Returns this machine's id, generating and persisting one on first use.
    pub fn machine_id(&self) -> Result<String> {
        let state = self.file.update(AppState::default(), |state| {
            let has_id = state
                .machine_id
                .as_deref()
                .is_some_and(|id| !id.trim().is_empty());
            if has_id {
                return Ok(false);
            }

            let id = Uuid::new_v4().to_string();
            tracing::info!("[State] Generated machine id {}", id);
            state.machine_id = Some(id);
            state.machine_id_created_at = Some(chrono::Utc::now().to_rfc3339());
            Ok(true)
        })?;

        Ok(state.machine_id.unwrap_or_default())
    }
}
