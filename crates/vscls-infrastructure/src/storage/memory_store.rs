//! Process-local secret store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use vscls_core::Result;
use vscls_core::secret::{SecretKey, SecretStore};

/// Keeps secrets in memory for the life of the process.
///
/// Used in env-only mode (`--no-keyring`) and in tests.
#[derive(Debug, Default)]
pub struct MemorySecretStore {
    secrets: Mutex<HashMap<SecretKey, String>>,
}

impl MemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populated store.
    pub fn with_secrets(entries: impl IntoIterator<Item = (SecretKey, String)>) -> Self {
        Self {
            secrets: Mutex::new(entries.into_iter().collect()),
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<SecretKey, String>> {
        self.secrets.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl SecretStore for MemorySecretStore {
    async fn get(&self, key: SecretKey) -> Result<Option<String>> {
        Ok(self.lock().get(&key).cloned())
    }

    async fn set(&self, key: SecretKey, value: &str) -> Result<()> {
        self.lock().insert(key, value.to_string());
        Ok(())
    }

    async fn delete(&self, key: SecretKey) -> Result<()> {
        self.lock().remove(&key);
        Ok(())
    }
}
