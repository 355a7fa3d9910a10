//! Token storage for the client.
//!
//! Holds the access/refresh pair from login. Authenticated requests attach
//! `Authorization: Bearer <access>`; the public methods (login, refresh,
//! profiles) go out bare.

use parking_lot::RwLock;

#[derive(Debug, Clone, PartialEq, Eq)]
struct TokenPair {
    access: String,
    refresh: String,
}

/// Thread-safe holder for the current token pair.
#[derive(Default)]
pub struct TokenStore {
    tokens: RwLock<Option<TokenPair>>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace both tokens after a login.
    pub fn set_pair(&self, access: &str, refresh: &str) {
        *self.tokens.write() = Some(TokenPair {
            access: access.to_string(),
            refresh: refresh.to_string(),
        });
    }

    /// Replace only the access token after a refresh.
    pub fn set_access(&self, access: &str) {
        let mut tokens = self.tokens.write();
        if let Some(pair) = tokens.as_mut() {
            pair.access = access.to_string();
        }
    }

    pub fn access_token(&self) -> Option<String> {
        self.tokens.read().as_ref().map(|p| p.access.clone())
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.tokens.read().as_ref().map(|p| p.refresh.clone())
    }

    pub fn is_logged_in(&self) -> bool {
        self.tokens.read().is_some()
    }

    /// Drop both tokens on logout.
    pub fn clear(&self) {
        *self.tokens.write() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_store() {
        let store = TokenStore::new();
        assert!(!store.is_logged_in());
        assert!(store.access_token().is_none());
        assert!(store.refresh_token().is_none());
    }

    #[test]
    fn test_set_pair_and_clear() {
        let store = TokenStore::new();
        store.set_pair("acc-1", "ref-1");
        assert!(store.is_logged_in());
        assert_eq!(store.access_token().as_deref(), Some("acc-1"));
        assert_eq!(store.refresh_token().as_deref(), Some("ref-1"));

        store.clear();
        assert!(!store.is_logged_in());
    }

    #[test]
    fn test_set_access_keeps_refresh() {
        let store = TokenStore::new();
        store.set_pair("acc-1", "ref-1");
        store.set_access("acc-2");
        assert_eq!(store.access_token().as_deref(), Some("acc-2"));
        assert_eq!(store.refresh_token().as_deref(), Some("ref-1"));
    }

    #[test]
    fn test_set_access_without_login_is_noop() {
        let store = TokenStore::new();
        store.set_access("acc-1");
        assert!(!store.is_logged_in());
    }
}
