//! OS keyring secret store.
//!
//! Uses the `keyring` crate: Keychain on macOS, Credential Manager on
//! Windows and the Secret Service (GNOME Keyring, KWallet) on Linux.

use async_trait::async_trait;
use keyring::Entry;
use vscls_core::secret::{SECRET_SERVICE_NAME, SecretKey, SecretStore};
use vscls_core::{Result, VsclsError};

/// Secret store backed by the platform keyring.
///
/// Keyring calls block, so each one runs on the blocking pool.
#[derive(Debug, Clone)]
pub struct KeyringSecretStore {
    service: String,
}

impl KeyringSecretStore {
    pub fn new() -> Self {
        Self::with_service(SECRET_SERVICE_NAME)
    }

    /// Uses a custom service name, e.g. to keep several profiles apart.
    pub fn with_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    async fn run<T, F>(&self, key: SecretKey, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(Entry) -> std::result::Result<T, keyring::Error> + Send + 'static,
    {
        let service = self.service.clone();
        tokio::task::spawn_blocking(move || {
            let entry = Entry::new(&service, key.as_str()).map_err(|e| map_error(key, e))?;
            op(entry).map_err(|e| map_error(key, e))
        })
        .await
        .map_err(|e| VsclsError::secret_store(format!("Keyring task failed: {}", e)))?
    }
}

impl Default for KeyringSecretStore {
    fn default() -> Self {
        Self::new()
    }
}

fn map_error(key: SecretKey, error: keyring::Error) -> VsclsError {
    match error {
        keyring::Error::NoStorageAccess(err) => VsclsError::secret_store(format!(
            "Keyring is not accessible while handling '{}'. Is a keyring service running and unlocked? ({})",
            key, err
        )),
        keyring::Error::PlatformFailure(err) => {
            VsclsError::secret_store(format!("Keyring failure for '{}': {}", key, err))
        }
        other => VsclsError::secret_store(format!("Keyring error for '{}': {}", key, other)),
    }
}

#[async_trait]
impl SecretStore for KeyringSecretStore {
    async fn get(&self, key: SecretKey) -> Result<Option<String>> {
        self.run(key, |entry| match entry.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e),
        })
        .await
    }

    async fn set(&self, key: SecretKey, value: &str) -> Result<()> {
        let value = value.to_string();
        self.run(key, move |entry| entry.set_password(&value)).await
    }

    async fn delete(&self, key: SecretKey) -> Result<()> {
        self.run(key, |entry| match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e),
        })
        .await
    }
}
