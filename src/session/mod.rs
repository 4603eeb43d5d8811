//! Authenticated session subsystem.
//!
//! # Data Flow
//! ```text
//! transactions query:
//!     credentials (keychain) → token (auth) → status query (transactions)
//!
//! login:
//!     prompted credentials → token (auth) → keychain
//! ```
//!
//! # Design Decisions
//! - Strictly sequential: a query is never issued without a token in hand
//! - No retries; the first failure is terminal for the invocation
//! - The state trail is kept for diagnostics and tests

pub mod runner;
pub mod state;

pub use runner::{Session, SessionError};
pub use state::SessionState;
