//! Credential storage subsystem.
//!
//! # Data Flow
//! ```text
//! login
//!     → store.rs (CredentialStore::store)
//!     → backend.rs (OS keychain: mpesa-cli/consumer_key, mpesa-cli/consumer_secret)
//!
//! every authenticated command
//!     → store.rs (CredentialStore::retrieve)
//!     → Credentials → auth token request
//! ```
//!
//! # Security Constraints
//! - Secrets live only in the OS keychain; never on disk, never logged
//! - No in-memory cache: every read goes to the keychain
//! - No logout: entries are only ever overwritten

pub mod backend;
pub mod store;

pub use backend::{BackendError, KeyringBackend, MemoryBackend, SecretBackend};
pub use store::{CredentialStore, Credentials, RetrieveError, StoreError, SERVICE_NAME};
