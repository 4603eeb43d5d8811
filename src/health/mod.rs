//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! doctor.rs:
//!     resolved config (or its error)
//!     → keychain lookup
//!     → token request per environment
//!     → DoctorReport (one line per check)
//! ```

pub mod doctor;

pub use doctor::{default_targets, run_doctor, CheckOutcome, DoctorReport, TokenTarget};
