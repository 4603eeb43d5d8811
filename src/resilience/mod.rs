//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Token or query request:
//!     → timeouts.rs (client with connect/request deadline)
//!     → On failure: typed transport error straight back to the caller
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - No retries or circuit breaking: a CLI invocation makes one attempt and
//!   reports the outcome

pub mod timeouts;

pub use timeouts::{http_client, DEFAULT_TIMEOUT};
