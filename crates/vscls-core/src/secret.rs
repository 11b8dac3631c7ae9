//! Secret storage seam.
//!
//! The encrypted, application-scoped store that holds the backend login.

use crate::error::Result;
use async_trait::async_trait;
use std::fmt;

/// Service name under which all vscls secrets are stored.
pub const SECRET_SERVICE_NAME: &str = "vscls";

/// The two secrets vscls keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SecretKey {
    /// Login identifier (admin e-mail).
    LoginIdentifier,
    /// Login secret (password).
    LoginSecret,
}

impl SecretKey {
    pub const ALL: [SecretKey; 2] = [SecretKey::LoginIdentifier, SecretKey::LoginSecret];

    /// Account name used in the underlying store.
    pub fn as_str(&self) -> &'static str {
        match self {
            SecretKey::LoginIdentifier => "login-identifier",
            SecretKey::LoginSecret => "login-secret",
        }
    }
}

impl fmt::Display for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw access to an encrypted secret store.
///
/// # Security Note
///
/// Implementations must never log secret values.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Returns `Ok(None)` when the secret is absent.
    async fn get(&self, key: SecretKey) -> Result<Option<String>>;

    async fn set(&self, key: SecretKey, value: &str) -> Result<()>;

    /// Removing an absent secret succeeds.
    async fn delete(&self, key: SecretKey) -> Result<()>;
}

/// Plaintext credentials written to the configuration by older releases.
///
/// Both values are wiped from memory on drop.
#[derive(Clone, Default, PartialEq, Eq, zeroize::Zeroize, zeroize::ZeroizeOnDrop)]
pub struct LegacyCredentials {
    pub identifier: Option<String>,
    pub secret: Option<String>,
}

impl LegacyCredentials {
    /// Both values present and non-blank.
    pub fn complete(&self) -> Option<Credentials> {
        let identifier = self
            .identifier
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())?;
        let secret = self.secret.as_deref().filter(|v| !v.trim().is_empty())?;
        Some(Credentials::new(identifier, secret))
    }
}

impl fmt::Debug for LegacyCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LegacyCredentials")
            .field("identifier", &self.identifier)
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Access to the plaintext credential keys of older releases.
#[async_trait]
pub trait LegacySettings: Send + Sync {
    /// Returns `Ok(None)` when no legacy key is present.
    async fn read_legacy_credentials(&self) -> Result<Option<LegacyCredentials>>;

    /// Removes the legacy keys. Returns `true` when anything was removed.
    async fn clear_legacy_credentials(&self) -> Result<bool>;
}

/// A backend login, wiped from memory on drop.
#[derive(Clone, PartialEq, Eq, zeroize::Zeroize, zeroize::ZeroizeOnDrop)]
pub struct Credentials {
    pub identifier: String,
    pub secret: String,
}

impl Credentials {
    pub fn new(identifier: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            secret: secret.into(),
        }
    }
}

// Keeps the secret out of logs and panic messages.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("identifier", &self.identifier)
            .field("secret", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_secret() {
        let creds = Credentials::new("admin@example.com", "hunter2");
        let printed = format!("{:?}", creds);
        assert!(printed.contains("admin@example.com"));
        assert!(!printed.contains("hunter2"));
    }

    #[test]
    fn test_legacy_complete_requires_both_values() {
        let partial = LegacyCredentials {
            identifier: Some("admin@example.com".into()),
            secret: Some("  ".into()),
        };
        assert!(partial.complete().is_none());

        let full = LegacyCredentials {
            identifier: Some(" admin@example.com ".into()),
            secret: Some("hunter2".into()),
        };
        let creds = full.complete().unwrap();
        assert_eq!(creds.identifier, "admin@example.com");
        assert_eq!(creds.secret, "hunter2");
        assert!(!format!("{:?}", full).contains("hunter2"));
    }

    #[test]
    fn test_zeroize_clears_credentials() {
        use zeroize::Zeroize;

        let mut creds = Credentials::new("admin@example.com", "hunter2");
        creds.zeroize();
        assert!(creds.identifier.is_empty());
        assert!(creds.secret.is_empty());

        let mut legacy = LegacyCredentials {
            identifier: Some("admin@example.com".into()),
            secret: Some("hunter2".into()),
        };
        legacy.zeroize();
        assert_eq!(legacy, LegacyCredentials::default());
    }

    #[test]
    fn test_key_names_are_distinct() {
        assert_ne!(
            SecretKey::LoginIdentifier.as_str(),
            SecretKey::LoginSecret.as_str()
        );
    }
}
