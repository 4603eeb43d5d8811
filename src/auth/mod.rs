//! Authentication against the Daraja OAuth endpoint.

pub mod token;

pub use token::{AccessToken, AuthError, TokenService, DEFAULT_TOKEN_LIFETIME};
