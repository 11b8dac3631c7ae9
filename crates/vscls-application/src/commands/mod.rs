//! The five user-facing commands.
//!
//! Every handler catches its own errors: a failure becomes one notification
//! naming the likely misconfiguration, and the handler returns a
//! [`CommandOutcome`] instead of an error.

mod clear;
mod configure;
mod create;
mod delete;
pub mod gate;
mod list;

pub use create::CreateSessionOptions;
pub use gate::CommandGate;

use crate::credentials::CredentialService;
use std::sync::Arc;
use vscls_core::collaboration::{Clipboard, CollaborationApi};
use vscls_core::config::SessionSettings;
use vscls_core::session::SessionBackend;
use vscls_core::ui::{PickItem, Prompter};
use vscls_core::{Result, VsclsError};

/// How a command ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Completed,
    /// The user dismissed a prompt or there was nothing to act on.
    Cancelled,
    /// The same command was already running.
    Busy,
    /// The error has already been shown to the user.
    Failed(VsclsError),
}

impl CommandOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, CommandOutcome::Failed(_))
    }
}

/// Facts about the machine and workspace the commands run in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostInfo {
    /// Stable device identifier.
    pub machine_id: String,
    /// Name of the open workspace, used as the default project name.
    pub workspace_name: String,
}

/// Everything the handlers need, injected by the composition root.
pub struct CommandContext {
    pub backend: Arc<dyn SessionBackend>,
    pub credentials: Arc<CredentialService>,
    pub collaboration: Arc<dyn CollaborationApi>,
    pub clipboard: Arc<dyn Clipboard>,
    pub prompter: Arc<dyn Prompter>,
    pub host: HostInfo,
    pub settings: SessionSettings,
    /// Shown in connection failures.
    pub backend_url: String,
}

#[derive(Debug, Default)]
struct Gates {
    configure: CommandGate,
    clear: CommandGate,
    create: CommandGate,
    list: CommandGate,
    delete: CommandGate,
}

/// Command handlers sharing one backend client and credential store.
pub struct SessionCommands {
    backend: Arc<dyn SessionBackend>,
    credentials: Arc<CredentialService>,
    collaboration: Arc<dyn CollaborationApi>,
    clipboard: Arc<dyn Clipboard>,
    prompter: Arc<dyn Prompter>,
    host: HostInfo,
    settings: SessionSettings,
    backend_url: String,
    gates: Gates,
}

impl SessionCommands {
    pub fn new(context: CommandContext) -> Self {
        Self {
            backend: context.backend,
            credentials: context.credentials,
            collaboration: context.collaboration,
            clipboard: context.clipboard,
            prompter: context.prompter,
            host: context.host,
            settings: context.settings,
            backend_url: context.backend_url,
            gates: Gates::default(),
        }
    }

    pub fn host(&self) -> &HostInfo {
        &self.host
    }

    /// Resolves credentials and authenticates. `Ok(false)` means the user
    /// cancelled the credential prompt.
    async fn sign_in(&self) -> Result<bool> {
        let Some(credentials) = self.credentials.resolve(self.prompter.as_ref()).await? else {
            return Ok(false);
        };
        self.backend
            .authenticate(&credentials.identifier, &credentials.secret)
            .await?;
        Ok(true)
    }

    /// Ends the local collaboration session. Failures only get logged.
    async fn end_local_session(&self) {
        if let Err(err) = self.collaboration.end().await {
            tracing::warn!("[Commands] Ending the local session failed: {}", err);
        }
    }

    fn busy(&self, command: &str) -> CommandOutcome {
        tracing::debug!("[Commands] {} is already running", command);
        self.prompter.info(&format!("{} is already running.", command));
        CommandOutcome::Busy
    }

    fn finish(&self, command: &str, result: Result<CommandOutcome>) -> CommandOutcome {
        match result {
            Ok(outcome) => {
                tracing::debug!("[Commands] {} finished: {:?}", command, outcome);
                outcome
            }
            Err(err) => {
                tracing::error!("[Commands] {} failed: {}", command, err);
                self.prompter.error(&failure_message(&err, &self.backend_url));
                CommandOutcome::Failed(err)
            }
        }
    }
}

/// Picker entries for a list of records.
fn pick_items(records: &[vscls_core::session::SessionRecord]) -> Vec<PickItem> {
    records
        .iter()
        .map(|record| PickItem {
            label: record.label(),
            description: record.description(),
        })
        .collect()
}

/// User-facing text for a failed command: the likely cause with the raw
/// detail interpolated.
pub fn failure_message(err: &VsclsError, backend_url: &str) -> String {
    match err {
        VsclsError::Auth(detail) => format!(
            "Could not sign in to {}: {}. Run `vscls configure-server` to check the admin e-mail and password.",
            backend_url, detail
        ),
        VsclsError::Transport(detail) => format!(
            "Could not reach the session server at {}: {}. Check backend.url in config.toml.",
            backend_url, detail
        ),
        VsclsError::NotFound { .. } => {
            format!("{}. It may already have been deleted.", err)
        }
        VsclsError::Validation(detail) => format!("Invalid input: {}", detail),
        VsclsError::SecretStore(detail) => format!(
            "Could not access the secret store: {}. Use --no-keyring with VSCLS_LOGIN_IDENTIFIER and VSCLS_LOGIN_SECRET if no keyring is available.",
            detail
        ),
        VsclsError::Collaboration(detail) => format!(
            "The collaboration tool failed: {}. Check the [collaboration] commands in config.toml.",
            detail
        ),
        VsclsError::Config(_) | VsclsError::Io { .. } | VsclsError::Serialization { .. } => {
            format!("Configuration problem: {}", err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "http://127.0.0.1:8090";

    #[test]
    fn test_auth_failure_points_to_configure() {
        let message = failure_message(&VsclsError::auth("Failed to authenticate."), URL);
        assert!(message.contains("configure-server"));
        assert!(message.contains("Failed to authenticate."));
        assert!(message.contains(URL));
    }

    #[test]
    fn test_transport_failure_points_to_url_setting() {
        let message = failure_message(&VsclsError::transport("connection refused"), URL);
        assert!(message.contains("backend.url"));
        assert!(message.contains("connection refused"));
    }

    #[test]
    fn test_not_found_keeps_detail() {
        let message = failure_message(&VsclsError::not_found("session", "r1"), URL);
        assert!(message.contains("r1"));
    }

    #[test]
    fn test_only_failed_is_failure() {
        assert!(CommandOutcome::Failed(VsclsError::auth("x")).is_failure());
        assert!(!CommandOutcome::Cancelled.is_failure());
        assert!(!CommandOutcome::Busy.is_failure());
    }
}
