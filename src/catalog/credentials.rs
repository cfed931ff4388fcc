//! Injected session credentials.
//!
//! The catalog never reads a token from ambient state: it asks its
//! [`CredentialsProvider`], and tells it to forget the token when the API
//! rejects it.

use std::fmt;
use std::sync::RwLock;

/// Source of the bearer token replayed to the catalog.
pub trait CredentialsProvider: Send + Sync {
    /// Current token, if logged in.
    fn token(&self) -> Option<String>;

    /// Forget the token. Called when the API answers 401.
    fn clear(&self);
}

/// In-memory session store.
#[derive(Default)]
pub struct SessionCredentials {
    token: RwLock<Option<String>>,
}

impl fmt::Debug for SessionCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCredentials")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

impl SessionCredentials {
    /// A session holding `token`.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }

    /// A session without a token.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Replace the token, e.g. after logging in again.
    pub fn set(&self, token: impl Into<String>) {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = Some(token.into());
    }

    pub fn is_authenticated(&self) -> bool {
        self.token
            .read()
            .map(|t| t.is_some())
            .unwrap_or_else(|e| e.into_inner().is_some())
    }
}

impl CredentialsProvider for SessionCredentials {
    fn token(&self) -> Option<String> {
        self.token
            .read()
            .map(|t| t.clone())
            .unwrap_or_else(|e| e.into_inner().clone())
    }

    fn clear(&self) {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = None;
    }
}
