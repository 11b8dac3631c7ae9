//! Composition root: builds the command handlers from configuration.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use vscls_application::{CommandContext, CredentialService, HostInfo, SessionCommands};
use vscls_core::secret::{SecretKey, SecretStore};
use vscls_infrastructure::paths::VsclsPaths;
use vscls_infrastructure::{
    CommandClipboard, CommandCollaboration, ConfigService, KeyringSecretStore, MemorySecretStore,
    PocketBaseClient, StateRepository,
};

use crate::terminal::TerminalPrompter;

pub const IDENTIFIER_ENV: &str = "VSCLS_LOGIN_IDENTIFIER";
pub const SECRET_ENV: &str = "VSCLS_LOGIN_SECRET";

const FALLBACK_WORKSPACE_NAME: &str = "workspace";

/// Global command-line settings that shape the wiring.
#[derive(Debug, Clone, Default)]
pub struct BootstrapOptions {
    pub config: Option<PathBuf>,
    pub url: Option<String>,
    pub no_keyring: bool,
}

pub fn build(paths: &VsclsPaths, options: &BootstrapOptions) -> Result<SessionCommands> {
    let config_service = match &options.config {
        Some(path) => ConfigService::with_path(path.clone()),
        None => ConfigService::new(paths),
    };
    let mut config = config_service
        .get_config()
        .with_context(|| format!("Failed to load {}", config_service.path().display()))?;
    if let Some(url) = &options.url {
        config.backend.url = url.clone();
    }
    tracing::debug!("[Bootstrap] Backend {}", config.backend.url);

    let backend = Arc::new(PocketBaseClient::new(&config.backend)?);

    let machine_id = StateRepository::new(paths)
        .machine_id()
        .context("Failed to load the machine id")?;

    let credentials = if options.no_keyring {
        // Env-only mode keeps nothing on disk, so legacy values stay where they are
        Arc::new(CredentialService::without_legacy(env_secret_store()))
    } else {
        Arc::new(CredentialService::new(
            Arc::new(KeyringSecretStore::new()),
            Arc::new(config_service.clone()),
        ))
    };

    Ok(SessionCommands::new(CommandContext {
        backend_url: backend.base_url().to_string(),
        backend,
        credentials,
        collaboration: Arc::new(CommandCollaboration::new(config.collaboration.clone())),
        clipboard: Arc::new(CommandClipboard::new(
            config.collaboration.clipboard_command.clone(),
        )),
        prompter: Arc::new(TerminalPrompter::new()),
        host: HostInfo {
            machine_id,
            workspace_name: workspace_name(),
        },
        settings: config.session,
    }))
}

fn env_secret_store() -> Arc<dyn SecretStore> {
    let entries = [
        (SecretKey::LoginIdentifier, IDENTIFIER_ENV),
        (SecretKey::LoginSecret, SECRET_ENV),
    ]
    .into_iter()
    .filter_map(|(key, var)| {
        std::env::var(var)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(|value| (key, value))
    });
    Arc::new(MemorySecretStore::with_secrets(entries))
}

/// Name of the current directory.
fn workspace_name() -> String {
    std::env::current_dir()
        .ok()
        .and_then(|dir| dir.file_name().map(|name| name.to_string_lossy().into_owned()))
        .unwrap_or_else(|| FALLBACK_WORKSPACE_NAME.to_string())
}
