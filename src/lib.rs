//! M-Pesa (Daraja) command-line client library.

pub mod auth;
pub mod config;
pub mod credentials;
pub mod health;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod session;
pub mod transactions;

pub use auth::{AccessToken, AuthError, TokenService};
pub use config::{Config, ConfigError, ConfigSources, Environment};
pub use credentials::{CredentialStore, Credentials};
pub use session::{Session, SessionError};
pub use transactions::{QueryError, TransactionClient, TransactionStatus};
