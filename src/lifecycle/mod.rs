//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Progress (progress.rs):
//!     start → background task draws frames
//!     network call completes (Ok or Err)
//!     → stop signal → task clears its line → join → result reported
//! ```
//!
//! # Design Decisions
//! - The indicator never touches the data being computed
//! - Stop and join happen before any output, on success and failure
//! - Drop guard covers early returns and panics

pub mod progress;

pub use progress::{run_with_indicator, with_progress, ProgressIndicator};
