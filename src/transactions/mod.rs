//! Transaction status subsystem.
//!
//! # Data Flow
//! ```text
//! Config + transaction id
//!     → types.rs (TransactionStatusRequest with fixed CommandID/IdentifierType)
//!     → query.rs (POST with Bearer token, bounded timeout)
//!     → TransactionStatus (ConversationID, ResponseCode, ...)
//! ```

pub mod query;
pub mod types;

pub use query::{QueryError, TransactionClient};
pub use types::{TransactionStatus, TransactionStatusRequest};
