//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults (schema.rs)
//!     → config file, YAML or TOML (loader.rs)
//!     → MPESA_* environment variables (loader.rs)
//!     → validation.rs (environment, production invariant, URLs, timeout)
//!     → Config (validated, immutable, built fresh per invocation)
//! ```
//!
//! # Design Decisions
//! - No global state: `resolve` takes explicit search paths and an
//!   environment snapshot, so identical inputs give equal configs
//! - Every key has a default except the production-only ones
//! - Endpoint selection is a pure function of `Config`

pub mod loader;
pub mod schema;
pub mod template;
pub mod validation;

pub use loader::{resolve, ConfigError, ConfigSources};
pub use schema::{Config, Environment, Settings};
pub use template::write_template;
pub use validation::ValidationError;
