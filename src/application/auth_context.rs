// Auth context - explicit holder of the caller's bearer token
use std::sync::{Arc, RwLock};

/// Shared, cloneable handle over an optional bearer token.
///
/// Clones observe the same token, so concurrent fetches started for one
/// request agree on when the session ended.
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
    token: Arc<RwLock<Option<String>>>,
}

impl AuthContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        let context = Self::new();
        context.store(token);
        context
    }

    /// Build from an `Authorization` header value (`Bearer <token>`, scheme
    /// matched case-insensitively)
    pub fn from_authorization(header: Option<&str>) -> Self {
        let token = header
            .and_then(|h| h.trim().split_once(' '))
            .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
            .map(|(_, token)| token);
        match token {
            Some(token) => Self::with_token(token),
            None => Self::new(),
        }
    }

    pub fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Store a token; blank tokens leave the context logged out
    pub fn store(&self, token: impl Into<String>) {
        let token = token.into();
        let token = token.trim();
        let mut slot = self
            .token
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = (!token.is_empty()).then(|| token.to_string());
    }

    pub fn is_logged_in(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .is_some()
    }

    /// Clear the token. Returns true only for the call that ended the session.
    pub fn log_out(&self) -> bool {
        self.token
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take()
            .is_some()
    }
}
