//! Authentication state of a backend client.

/// Lifecycle of the single authenticated session a client holds.
///
/// ```text
/// Unauthenticated -> Authenticating -> Authenticated | Failed
///                          ^                   |
///                          +-------------------+  (re-authentication)
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthState {
    #[default]
    Unauthenticated,
    Authenticating,
    Authenticated { token: String },
    Failed { reason: String },
}

impl AuthState {
    pub fn token(&self) -> Option<&str> {
        match self {
            AuthState::Authenticated { token } => Some(token),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated { .. })
    }

    /// Short name for logs; never includes the token.
    pub fn name(&self) -> &'static str {
        match self {
            AuthState::Unauthenticated => "unauthenticated",
            AuthState::Authenticating => "authenticating",
            AuthState::Authenticated { .. } => "authenticated",
            AuthState::Failed { .. } => "failed",
        }
    }
}
