//! Configuration service implementation.
//!
//! Loads `config.toml` and owns the cleanup of plaintext credential keys
//! written by older releases.

use crate::paths::VsclsPaths;
use crate::storage::AtomicTomlFile;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use vscls_core::Result;
use vscls_core::config::{LEGACY_AUTH_EMAIL_KEY, LEGACY_AUTH_PASSWORD_KEY, RootConfig};
use vscls_core::secret::{LegacyCredentials, LegacySettings};

/// Configuration service that loads and caches the root configuration.
///
/// A missing file is created with defaults on first access so users have
/// something to edit.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<RootConfig>>>,
}

impl ConfigService {
    pub fn new(paths: &VsclsPaths) -> Self {
        Self::with_path(paths.config_file())
    }

    /// Creates a service for a custom file (for `--config` and tests).
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            path,
            config: Arc::new(RwLock::new(None)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets the root configuration, loading from file if not cached.
    pub fn get_config(&self) -> Result<RootConfig> {
        {
            let read_lock = self.config.read().unwrap_or_else(|e| e.into_inner());
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let loaded = self.load_or_create()?;

        let mut write_lock = self.config.write().unwrap_or_else(|e| e.into_inner());
        *write_lock = Some(loaded.clone());
        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut write_lock = self.config.write().unwrap_or_else(|e| e.into_inner());
        *write_lock = None;
    }

    fn load_or_create(&self) -> Result<RootConfig> {
        let file = AtomicTomlFile::<RootConfig>::new(self.path.clone());
        match file.load()? {
            Some(config) => Ok(config),
            None => {
                let default_config = RootConfig::default();
                if !self.path.exists() {
                    tracing::info!(
                        "[Config] Writing default configuration to {}",
                        self.path.display()
                    );
                    file.save(&default_config)?;
                }
                Ok(default_config)
            }
        }
    }

    /// Untyped view of the file, so unknown keys survive a rewrite.
    fn raw_file(&self) -> AtomicTomlFile<toml::Table> {
        AtomicTomlFile::new(self.path.clone())
    }
}

fn string_value(table: &toml::Table, key: &str) -> Option<String> {
    table.get(key).and_then(|v| v.as_str()).map(str::to_string)
}

#[async_trait]
impl LegacySettings for ConfigService {
    async fn read_legacy_credentials(&self) -> Result<Option<LegacyCredentials>> {
        let Some(table) = self.raw_file().load()? else {
            return Ok(None);
        };

        if !table.contains_key(LEGACY_AUTH_EMAIL_KEY)
            && !table.contains_key(LEGACY_AUTH_PASSWORD_KEY)
        {
            return Ok(None);
        }

        Ok(Some(LegacyCredentials {
            identifier: string_value(&table, LEGACY_AUTH_EMAIL_KEY),
            secret: string_value(&table, LEGACY_AUTH_PASSWORD_KEY),
        }))
    }

    async fn clear_legacy_credentials(&self) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }

        let mut removed = false;
        self.raw_file().update(toml::Table::new(), |table| {
            removed |= table.remove(LEGACY_AUTH_EMAIL_KEY).is_some();
            removed |= table.remove(LEGACY_AUTH_PASSWORD_KEY).is_some();
            Ok(removed)
        })?;

        if removed {
            tracing::info!("[Config] Removed plaintext credentials from {}", self.path.display());
            self.invalidate_cache();
        }
        Ok(removed)
    }
}
