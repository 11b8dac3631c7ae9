//! Session record domain model.

use serde::{Deserialize, Serialize};

/// A published collaboration session as stored by the backend.
///
/// Field names follow the collection schema, so the struct is serialized in
/// camelCase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    /// Store-assigned identifier.
    pub id: String,
    #[serde(default)]
    pub machine_id: String,
    #[serde(default)]
    pub device_name: String,
    #[serde(default)]
    pub project_name: String,
    #[serde(default)]
    pub session_url: String,
    /// Backend timestamp, kept in the backend's own string form.
    #[serde(default)]
    pub created: String,
    #[serde(default)]
    pub updated: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_name: Option<String>,
}

impl SessionRecord {
    /// The identity key of this record.
    pub fn identity(&self) -> SessionIdentity<'_> {
        SessionIdentity {
            machine_id: &self.machine_id,
            project_name: &self.project_name,
            device_name: &self.device_name,
        }
    }

    /// Picker label: `"{project} ({url})"`, without the parentheses when
    /// there is no URL.
    pub fn label(&self) -> String {
        with_parenthesised(&self.project_name, &self.session_url)
    }

    /// Picker description: `"{device} ({machine})"`.
    pub fn description(&self) -> String {
        with_parenthesised(&self.device_name, &self.machine_id)
    }

    pub fn has_url(&self) -> bool {
        !self.session_url.trim().is_empty()
    }
}

fn with_parenthesised(main: &str, extra: &str) -> String {
    if extra.is_empty() {
        main.to_string()
    } else {
        format!("{} ({})", main, extra)
    }
}

/// The writable fields of a session record.
///
/// Used as the body of create and update requests; the backend assigns
/// `id` and the timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDraft {
    pub machine_id: String,
    pub device_name: String,
    pub project_name: String,
    pub session_url: String,
}

impl SessionDraft {
    pub fn new(
        machine_id: impl Into<String>,
        device_name: impl Into<String>,
        project_name: impl Into<String>,
        session_url: impl Into<String>,
    ) -> Self {
        Self {
            machine_id: machine_id.into(),
            device_name: device_name.into(),
            project_name: project_name.into(),
            session_url: session_url.into(),
        }
    }

    pub fn identity(&self) -> SessionIdentity<'_> {
        SessionIdentity {
            machine_id: &self.machine_id,
            project_name: &self.project_name,
            device_name: &self.device_name,
        }
    }
}

/// Composite identity `(machineId, projectName, deviceName)` used to decide
/// record reuse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionIdentity<'a> {
    pub machine_id: &'a str,
    pub project_name: &'a str,
    pub device_name: &'a str,
}
