//! Configuration model for `config.toml`.

use serde::{Deserialize, Serialize};

/// Default PocketBase address used when nothing is configured.
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8090";
/// Collection that holds published session records.
pub const DEFAULT_SESSIONS_COLLECTION: &str = "vscode_live_share_sessions";
/// Fixed page size for listing. Records beyond it are not returned.
pub const DEFAULT_PAGE_SIZE: u32 = 1000;

/// Plaintext credential keys written by older releases at the top level of
/// `config.toml`. They are removed by the legacy-settings migration.
pub const LEGACY_AUTH_EMAIL_KEY: &str = "pocketbase_auth_email";
pub const LEGACY_AUTH_PASSWORD_KEY: &str = "pocketbase_auth_password";

/// Root of `config.toml`.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct RootConfig {
    #[serde(default)]
    pub backend: BackendSettings,
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default)]
    pub collaboration: CollaborationSettings,
}

/// Where the record store lives and how to address it.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct BackendSettings {
    #[serde(default = "default_backend_url")]
    pub url: String,
    #[serde(default = "default_collection")]
    pub collection: String,
    /// Superuser auth collection (PocketBase >= 0.23). When unset the legacy
    /// admins endpoint is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_collection: Option<String>,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            url: default_backend_url(),
            collection: default_collection(),
            auth_collection: None,
            page_size: default_page_size(),
        }
    }
}

fn default_backend_url() -> String {
    DEFAULT_BACKEND_URL.to_string()
}

fn default_collection() -> String {
    DEFAULT_SESSIONS_COLLECTION.to_string()
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

/// Publishing behaviour.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct SessionSettings {
    /// Update the existing record for the same machine/project/device
    /// instead of appending a new one.
    #[serde(default)]
    pub overwrite_existing_project: bool,
    /// Skips the device-name prompt when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_name: Option<String>,
}

impl SessionSettings {
    /// Returns the device-name override if it is set and non-blank.
    pub fn device_name_override(&self) -> Option<&str> {
        self.device_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

/// External commands that drive the collaboration tool.
///
/// Every command is an argv list. `join_command` may contain a `{url}`
/// placeholder; when absent the URL is appended as the last argument.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct CollaborationSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_command: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join_command: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_command: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clipboard_command: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: RootConfig = toml::from_str("").unwrap();
        assert_eq!(config.backend.url, DEFAULT_BACKEND_URL);
        assert_eq!(config.backend.collection, DEFAULT_SESSIONS_COLLECTION);
        assert_eq!(config.backend.page_size, 1000);
        assert!(config.backend.auth_collection.is_none());
        assert!(!config.session.overwrite_existing_project);
    }

    #[test]
    fn test_partial_backend_section() {
        let config: RootConfig = toml::from_str(
            r#"
            [backend]
            url = "https://pb.example.com"

            [session]
            overwrite_existing_project = true
            device_name = "laptop"
            "#,
        )
        .unwrap();

        assert_eq!(config.backend.url, "https://pb.example.com");
        assert_eq!(config.backend.collection, DEFAULT_SESSIONS_COLLECTION);
        assert!(config.session.overwrite_existing_project);
        assert_eq!(config.session.device_name_override(), Some("laptop"));
    }

    #[test]
    fn test_blank_device_override_is_ignored() {
        let settings = SessionSettings {
            overwrite_existing_project: false,
            device_name: Some("   ".to_string()),
        };
        assert_eq!(settings.device_name_override(), None);
    }

    #[test]
    fn test_legacy_keys_are_ignored_by_model() {
        let config: RootConfig = toml::from_str(
            r#"
            pocketbase_auth_email = "admin@example.com"
            pocketbase_auth_password = "hunter2"
            "#,
        )
        .unwrap();
        assert_eq!(config, RootConfig::default());
    }
}
