//! Persisted bearer credential, kept in sync with the transport's default headers.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use session_sdk::{TokenPersistence, TransportHeaders};
use tracing::{debug, warn};

/// Storage key used when none is configured.
pub const DEFAULT_TOKEN_KEY: &str = "auth_token";

/// Owns the single persisted credential.
///
/// Never fails: storage errors are logged and read as "no credential". The
/// token itself is never inspected.
pub struct TokenStore {
    persistence: Arc<dyn TokenPersistence>,
    transport: Arc<TransportHeaders>,
    key: String,
}

impl TokenStore {
    #[must_use]
    pub fn new(
        persistence: Arc<dyn TokenPersistence>,
        transport: Arc<TransportHeaders>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            persistence,
            transport,
            key: key.into(),
        }
    }

    /// The persisted credential, if any.
    #[must_use]
    pub fn get(&self) -> Option<SecretString> {
        match self.persistence.load(&self.key) {
            Ok(Some(token)) if !token.is_empty() => Some(SecretString::from(token)),
            Ok(_) => None,
            Err(e) => {
                warn!(key = %self.key, error = %e, "Token storage unavailable, treating as no credential");
                None
            }
        }
    }

    /// Persist the credential and install it as the transport's bearer header.
    pub fn set(&self, token: &SecretString) {
        if let Err(e) = self.persistence.store(&self.key, token.expose_secret()) {
            warn!(key = %self.key, error = %e, "Failed to persist credential");
        }
        if let Err(e) = self.transport.install_bearer(token) {
            warn!(error = %e, "Credential is not a valid header value, Authorization header not installed");
        }
        debug!(key = %self.key, "Credential applied");
    }

    /// Forget the credential and remove the bearer header.
    pub fn clear(&self) {
        if let Err(e) = self.persistence.remove(&self.key) {
            warn!(key = %self.key, error = %e, "Failed to remove persisted credential");
        }
        self.transport.remove_authorization();
        debug!(key = %self.key, "Credential cleared");
    }

    #[must_use]
    pub fn transport(&self) -> &Arc<TransportHeaders> {
        &self.transport
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use session_sdk::StorageError;
    use tracing_test::traced_test;

    use super::*;
    use crate::infra::storage::MemoryTokenPersistence;

    struct UnavailablePersistence;

    impl TokenPersistence for UnavailablePersistence {
        fn load(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("private browsing".to_owned()))
        }

        fn store(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("private browsing".to_owned()))
        }

        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("private browsing".to_owned()))
        }
    }

    fn store_with(persistence: Arc<dyn TokenPersistence>) -> TokenStore {
        TokenStore::new(persistence, Arc::new(TransportHeaders::new()), DEFAULT_TOKEN_KEY)
    }

    #[test]
    fn set_get_clear_keeps_header_in_sync() {
        let persistence = Arc::new(MemoryTokenPersistence::new());
        let store = store_with(persistence.clone());

        assert!(store.get().is_none());

        store.set(&SecretString::from("tok-1".to_owned()));
        assert_eq!(
            store.get().map(|t| t.expose_secret().to_owned()),
            Some("tok-1".to_owned())
        );
        assert_eq!(
            persistence.load(DEFAULT_TOKEN_KEY).unwrap().as_deref(),
            Some("tok-1")
        );
        assert_eq!(
            store
                .transport()
                .bearer_token()
                .map(|t| t.expose_secret().to_owned()),
            Some("tok-1".to_owned())
        );

        store.clear();
        assert!(store.get().is_none());
        assert!(store.transport().bearer_token().is_none());
    }

    #[test]
    fn empty_persisted_value_is_absent() {
        let persistence = Arc::new(MemoryTokenPersistence::new());
        persistence.store(DEFAULT_TOKEN_KEY, "").unwrap();

        assert!(store_with(persistence).get().is_none());
    }

    #[test]
    #[traced_test]
    fn storage_failures_degrade_to_no_credential() {
        let store = store_with(Arc::new(UnavailablePersistence));

        store.set(&SecretString::from("tok".to_owned()));
        assert!(store.get().is_none());
        // The header is still applied for this process.
        assert!(store.transport().bearer_token().is_some());

        store.clear();
        assert!(store.transport().bearer_token().is_none());
        assert!(logs_contain("Token storage unavailable"));
    }
}
