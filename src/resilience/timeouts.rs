//! Timeout enforcement.
//!
//! # Responsibilities
//! - Build the HTTP client shared by the token and query calls
//! - Bound every request (connect + send + body) by the configured deadline
//!
//! # Design Decisions
//! - A timed-out call surfaces as a transport error, never a hang
//! - No retries: one attempt per call

use std::time::Duration;

/// Default deadline for outbound API calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = concat!("mpesa-cli/", env!("CARGO_PKG_VERSION"));

/// HTTP client whose every request is bounded by `timeout`.
pub fn http_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
}
