//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber for the CLI
//! - Keep diagnostics on stderr so stdout stays clean for results
//!
//! # Design Decisions
//! - `RUST_LOG` wins when set; otherwise warnings only, debug with `-v`
//! - Secrets are never recorded as fields

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter directive for the given verbosity.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "mpesa_cli=debug"
    } else {
        "mpesa_cli=warn"
    }
}

/// Install the global subscriber. Safe to call more than once.
pub fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_directive(verbose).into());

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}
