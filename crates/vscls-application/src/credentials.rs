//! Credential Store Adapter.
//!
//! Wraps the raw [`SecretStore`] with the soft-failure rules the command
//! handlers rely on, the interactive acquisition flow, and the cleanup of
//! plaintext credentials from older releases.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use vscls_core::secret::{Credentials, LegacySettings, SecretKey, SecretStore};
use vscls_core::ui::Prompter;
use vscls_core::{Result, VsclsError};

const IDENTIFIER_PROMPT: &str = "PocketBase admin e-mail";
const SECRET_PROMPT: &str = "PocketBase admin password";

/// States of the interactive credential acquisition.
///
/// ```text
/// NoCredentials -> PromptIdentifier -> PromptSecret -> Stored -> Ready
///                        |                  |
///                        +---- cancel ------+--> Stopped
/// ```
/// `Ready` is entered directly when both secrets are already stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcquisitionState {
    NoCredentials,
    PromptIdentifier,
    PromptSecret { identifier: String },
    Stored(Credentials),
    Ready(Credentials),
    Stopped,
}

pub struct CredentialService {
    store: Arc<dyn SecretStore>,
    legacy: Option<Arc<dyn LegacySettings>>,
    /// Set once the legacy cleanup ran in this process.
    legacy_checked: AtomicBool,
}

impl CredentialService {
    pub fn new(store: Arc<dyn SecretStore>, legacy: Arc<dyn LegacySettings>) -> Self {
        Self {
            store,
            legacy: Some(legacy),
            legacy_checked: AtomicBool::new(false),
        }
    }

    /// A service with no legacy configuration to clean up.
    pub fn without_legacy(store: Arc<dyn SecretStore>) -> Self {
        Self {
            store,
            legacy: None,
            legacy_checked: AtomicBool::new(true),
        }
    }

    /// Reads a secret. Store failures are logged and reported as absent.
    pub async fn load(&self, key: SecretKey) -> Option<String> {
        match self.store.get(key).await {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("[Credentials] Could not read '{}': {}", key, err);
                None
            }
        }
    }

    /// Stores a non-blank secret.
    ///
    /// Blank values are rejected with a `Validation` error and the store is
    /// left untouched.
    pub async fn store(&self, key: SecretKey, value: &str) -> Result<()> {
        if value.trim().is_empty() {
            return Err(VsclsError::validation(format!("{} must not be empty", key)));
        }
        self.store.set(key, value).await.inspect_err(|err| {
            tracing::error!("[Credentials] Could not store '{}': {}", key, err);
        })
    }

    /// Removes a secret; removing an absent one succeeds.
    pub async fn remove(&self, key: SecretKey) -> Result<()> {
        self.store.delete(key).await.inspect_err(|err| {
            tracing::error!("[Credentials] Could not remove '{}': {}", key, err);
        })
    }

    /// Validates both values before writing either.
    ///
    /// If the secret cannot be written the previous identifier is put back,
    /// so the store never pairs the new identifier with the old secret.
    pub async fn store_credentials(&self, credentials: &Credentials) -> Result<()> {
        for (key, value) in [
            (SecretKey::LoginIdentifier, &credentials.identifier),
            (SecretKey::LoginSecret, &credentials.secret),
        ] {
            if value.trim().is_empty() {
                return Err(VsclsError::validation(format!("{} must not be empty", key)));
            }
        }

        let previous = self.load(SecretKey::LoginIdentifier).await;
        self.store(SecretKey::LoginIdentifier, credentials.identifier.trim())
            .await?;
        if let Err(err) = self.store(SecretKey::LoginSecret, &credentials.secret).await {
            self.restore_identifier(previous.as_deref()).await;
            return Err(err);
        }
        Ok(())
    }

    async fn restore_identifier(&self, previous: Option<&str>) {
        let key = SecretKey::LoginIdentifier;
        let restored = match previous {
            Some(value) => self.store.set(key, value).await,
            None => self.store.delete(key).await,
        };
        if let Err(err) = restored {
            tracing::warn!("[Credentials] Could not restore '{}': {}", key, err);
        }
    }

    /// Both secrets, when both are stored and non-blank.
    pub async fn stored_credentials(&self) -> Option<Credentials> {
        let identifier = self.load(SecretKey::LoginIdentifier).await?;
        let secret = self.load(SecretKey::LoginSecret).await?;
        if identifier.trim().is_empty() || secret.trim().is_empty() {
            return None;
        }
        Some(Credentials::new(identifier, secret))
    }

    /// Removes both secrets.
    pub async fn clear(&self) -> Result<()> {
        for key in SecretKey::ALL {
            self.remove(key).await?;
        }
        tracing::info!("[Credentials] Cleared stored credentials");
        Ok(())
    }

    /// Clears the plaintext credential keys of older releases.
    ///
    /// Runs at most once per process. If nothing is stored yet and both
    /// legacy values are present they are imported first. Returns `true`
    /// when the configuration was rewritten.
    pub async fn migrate_legacy_plaintext(&self) -> Result<bool> {
        let Some(legacy) = &self.legacy else {
            return Ok(false);
        };
        if self.legacy_checked.swap(true, Ordering::SeqCst) {
            return Ok(false);
        }

        let result = self.migrate_from(legacy.as_ref()).await;
        if result.is_err() {
            // Let the next resolution retry
            self.legacy_checked.store(false, Ordering::SeqCst);
        }
        result
    }

    async fn migrate_from(&self, legacy: &dyn LegacySettings) -> Result<bool> {
        let Some(found) = legacy.read_legacy_credentials().await? else {
            return Ok(false);
        };

        if self.stored_credentials().await.is_none()
            && let Some(credentials) = found.complete()
        {
            self.store_credentials(&credentials).await?;
            tracing::info!("[Credentials] Imported plaintext credentials into the secret store");
        }

        legacy.clear_legacy_credentials().await
    }

    /// Returns credentials, prompting for missing ones.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(_))`: Stored credentials, or freshly prompted and stored ones
    /// - `Ok(None)`: The user cancelled a prompt
    /// - `Err(_)`: Prompted values were blank or could not be stored
    pub async fn resolve(&self, prompter: &dyn Prompter) -> Result<Option<Credentials>> {
        if let Err(err) = self.migrate_legacy_plaintext().await {
            tracing::warn!("[Credentials] Legacy settings cleanup failed: {}", err);
        }

        let mut state = match self.stored_credentials().await {
            Some(credentials) => AcquisitionState::Ready(credentials),
            None => AcquisitionState::NoCredentials,
        };

        loop {
            state = match state {
                AcquisitionState::NoCredentials => AcquisitionState::PromptIdentifier,
                AcquisitionState::PromptIdentifier => {
                    let current = self.load(SecretKey::LoginIdentifier).await;
                    match prompter.input(IDENTIFIER_PROMPT, current.as_deref()).await {
                        Some(identifier) => AcquisitionState::PromptSecret { identifier },
                        None => AcquisitionState::Stopped,
                    }
                }
                AcquisitionState::PromptSecret { identifier } => {
                    match prompter.password(SECRET_PROMPT).await {
                        Some(secret) => {
                            let credentials = Credentials::new(identifier.trim(), secret);
                            self.store_credentials(&credentials).await?;
                            AcquisitionState::Stored(credentials)
                        }
                        None => AcquisitionState::Stopped,
                    }
                }
                AcquisitionState::Stored(credentials) => AcquisitionState::Ready(credentials),
                AcquisitionState::Ready(credentials) => return Ok(Some(credentials)),
                AcquisitionState::Stopped => {
                    tracing::debug!("[Credentials] Credential prompt cancelled");
                    return Ok(None);
                }
            };
        }
    }

    /// Always prompts, pre-filling the stored identifier, and stores the
    /// answers. Used by `configure-server`.
    pub async fn prompt_and_store(&self, prompter: &dyn Prompter) -> Result<Option<Credentials>> {
        if let Err(err) = self.migrate_legacy_plaintext().await {
            tracing::warn!("[Credentials] Legacy settings cleanup failed: {}", err);
        }

        let current = self.load(SecretKey::LoginIdentifier).await;
        let Some(identifier) = prompter.input(IDENTIFIER_PROMPT, current.as_deref()).await else {
            return Ok(None);
        };
        let Some(secret) = prompter.password(SECRET_PROMPT).await else {
            return Ok(None);
        };

        let credentials = Credentials::new(identifier.trim(), secret);
        self.store_credentials(&credentials).await?;
        Ok(Some(credentials))
    }
}
