//! Secret storage backends.

use std::collections::HashMap;
use std::sync::Mutex;

use thiserror::Error;

/// Platform secret storage failed (locked keychain, no D-Bus, denied...).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct BackendError(pub String);

impl From<keyring::Error> for BackendError {
    fn from(err: keyring::Error) -> Self {
        BackendError(err.to_string())
    }
}

/// A flat store of named secrets under one service namespace.
pub trait SecretBackend: Send + Sync {
    /// Write `value` under `entry`, replacing whatever was there.
    fn set(&self, entry: &str, value: &str) -> Result<(), BackendError>;

    /// Read `entry`; `Ok(None)` when nothing is stored under it.
    fn get(&self, entry: &str) -> Result<Option<String>, BackendError>;
}

/// OS-native keychain (macOS Keychain, Windows Credential Manager, Linux
/// Secret Service fronted by the kernel keyring). Entries persist until
/// overwritten.
#[derive(Debug, Clone)]
pub struct KeyringBackend {
    service: String,
}

impl KeyringBackend {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }
}

impl SecretBackend for KeyringBackend {
    fn set(&self, entry: &str, value: &str) -> Result<(), BackendError> {
        let item = keyring::Entry::new(&self.service, entry)?;
        item.set_password(value)?;
        Ok(())
    }

    fn get(&self, entry: &str) -> Result<Option<String>, BackendError> {
        let item = keyring::Entry::new(&self.service, entry)?;
        match item.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// Process-local backend. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<String, String>>,
    unavailable: bool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend whose every call fails, like a locked keychain.
    pub fn unavailable() -> Self {
        Self {
            entries: Mutex::default(),
            unavailable: true,
        }
    }

    fn check(&self) -> Result<(), BackendError> {
        if self.unavailable {
            return Err(BackendError("secret storage is unavailable".to_string()));
        }
        Ok(())
    }
}

impl SecretBackend for MemoryBackend {
    fn set(&self, entry: &str, value: &str) -> Result<(), BackendError> {
        self.check()?;
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| BackendError(e.to_string()))?;
        entries.insert(entry.to_string(), value.to_string());
        Ok(())
    }

    fn get(&self, entry: &str) -> Result<Option<String>, BackendError> {
        self.check()?;
        let entries = self
            .entries
            .lock()
            .map_err(|e| BackendError(e.to_string()))?;
        Ok(entries.get(entry).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_backend_round_trip() {
        let backend = MemoryBackend::new();
        assert_eq!(backend.get("consumer_key").unwrap(), None);

        backend.set("consumer_key", "AbC123").unwrap();
        assert_eq!(backend.get("consumer_key").unwrap().as_deref(), Some("AbC123"));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_linux_keychain_outlives_reboot() {
        let persistence = keyring::default::default_credential_builder().persistence();
        assert_eq!(format!("{:?}", persistence), "UntilDelete");
    }
}
