//! Consumer key/secret persistence.

use std::fmt;

use thiserror::Error;

use crate::credentials::backend::{BackendError, KeyringBackend, SecretBackend};

/// Keychain service namespace for every entry the CLI writes.
pub const SERVICE_NAME: &str = "mpesa-cli";

pub const CONSUMER_KEY_ENTRY: &str = "consumer_key";
pub const CONSUMER_SECRET_ENTRY: &str = "consumer_secret";

/// Daraja app credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub consumer_key: String,
    pub consumer_secret: String,
}

impl Credentials {
    pub fn new(consumer_key: impl Into<String>, consumer_secret: impl Into<String>) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"<redacted>")
            .finish()
    }
}

/// Writing a credential failed.
#[derive(Debug, Error)]
#[error("failed to store {entry} in keychain: {source}")]
pub struct StoreError {
    pub entry: &'static str,
    #[source]
    pub source: BackendError,
}

/// Reading credentials failed.
#[derive(Debug, Error)]
pub enum RetrieveError {
    #[error("could not retrieve {entry} from keychain. Please run 'mpesa-cli login' again")]
    NotFound { entry: &'static str },

    #[error("keychain unavailable while reading {entry}: {source}")]
    BackendUnavailable {
        entry: &'static str,
        #[source]
        source: BackendError,
    },
}

impl RetrieveError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RetrieveError::NotFound { .. })
    }
}

/// Credential store over a secret backend.
///
/// Every call goes to the backend; nothing is cached in memory.
pub struct CredentialStore {
    backend: Box<dyn SecretBackend>,
}

impl CredentialStore {
    pub fn new(backend: impl SecretBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    /// Store backed by the OS keychain under [`SERVICE_NAME`].
    pub fn keychain() -> Self {
        Self::new(KeyringBackend::new(SERVICE_NAME))
    }

    /// Persist both values, overwriting earlier ones.
    pub fn store(&self, consumer_key: &str, consumer_secret: &str) -> Result<(), StoreError> {
        for (entry, value) in [
            (CONSUMER_KEY_ENTRY, consumer_key),
            (CONSUMER_SECRET_ENTRY, consumer_secret),
        ] {
            self.backend
                .set(entry, value)
                .map_err(|source| StoreError { entry, source })?;
        }

        tracing::debug!(service = SERVICE_NAME, "Credentials stored");
        Ok(())
    }

    /// Load both values; `NotFound` if either is missing.
    pub fn retrieve(&self) -> Result<Credentials, RetrieveError> {
        let consumer_key = self.read(CONSUMER_KEY_ENTRY)?;
        let consumer_secret = self.read(CONSUMER_SECRET_ENTRY)?;
        Ok(Credentials {
            consumer_key,
            consumer_secret,
        })
    }

    fn read(&self, entry: &'static str) -> Result<String, RetrieveError> {
        match self.backend.get(entry) {
            Ok(Some(value)) => Ok(value),
            Ok(None) => Err(RetrieveError::NotFound { entry }),
            Err(source) => Err(RetrieveError::BackendUnavailable { entry, source }),
        }
    }
}

impl fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialStore")
            .field("service", &SERVICE_NAME)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::backend::MemoryBackend;

    #[test]
    fn test_store_then_retrieve() {
        let store = CredentialStore::new(MemoryBackend::new());
        store.store("AbC123", "Secr3t").unwrap();

        let creds = store.retrieve().unwrap();
        assert_eq!(creds, Credentials::new("AbC123", "Secr3t"));
    }

    #[test]
    fn test_store_overwrites() {
        let store = CredentialStore::new(MemoryBackend::new());
        store.store("old-key", "old-secret").unwrap();
        store.store("new-key", "new-secret").unwrap();

        let creds = store.retrieve().unwrap();
        assert_eq!(creds.consumer_key, "new-key");
        assert_eq!(creds.consumer_secret, "new-secret");
    }

    #[test]
    fn test_retrieve_empty_store_is_not_found() {
        let store = CredentialStore::new(MemoryBackend::new());
        let err = store.retrieve().unwrap_err();

        assert!(err.is_not_found());
        assert!(err.to_string().contains("mpesa-cli login"));
    }

    #[test]
    fn test_missing_secret_alone_is_not_found() {
        let backend = MemoryBackend::new();
        backend.set(CONSUMER_KEY_ENTRY, "only-key").unwrap();
        let store = CredentialStore::new(backend);

        match store.retrieve() {
            Err(RetrieveError::NotFound { entry }) => assert_eq!(entry, CONSUMER_SECRET_ENTRY),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_unavailable_backend() {
        let store = CredentialStore::new(MemoryBackend::unavailable());

        let err = store.store("k", "s").unwrap_err();
        assert_eq!(err.entry, CONSUMER_KEY_ENTRY);

        let err = store.retrieve().unwrap_err();
        assert!(matches!(err, RetrieveError::BackendUnavailable { .. }));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let rendered = format!("{:?}", Credentials::new("AbC123", "Secr3t"));
        assert!(rendered.contains("AbC123"));
        assert!(!rendered.contains("Secr3t"));
    }
}
