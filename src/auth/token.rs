//! OAuth client-credentials token acquisition.
//!
//! # Responsibilities
//! - Exchange a consumer key/secret for a bearer token
//! - Classify failures: rejected by the API, transport, or malformed body
//!
//! # Design Decisions
//! - The token endpoint is a parameter, so tests point it at a mock server
//! - Tokens are held in memory for one invocation and never written to disk

use std::fmt;
use std::time::Duration;

use base64::Engine;
use reqwest::header::AUTHORIZATION;
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::credentials::Credentials;
use crate::resilience::http_client;

/// Lifetime Daraja gives its tokens, used when `expires_in` is unusable.
pub const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(3599);

/// Errors from the token endpoint.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The API answered with a non-200 status.
    #[error("authentication failed with status {status}: {body}")]
    Rejected { status: u16, body: String },

    /// DNS, TCP, TLS or timeout failure.
    #[error("could not reach token endpoint: {0}")]
    Transport(#[source] reqwest::Error),

    /// 200 with a body that is not a usable token response.
    #[error("failed to parse auth response: {0}")]
    MalformedResponse(String),
}

/// Short-lived bearer token.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    value: String,
    expires_in: Duration,
}

impl AccessToken {
    pub fn new(value: impl Into<String>, expires_in: Duration) -> Self {
        Self {
            value: value.into(),
            expires_in,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Lifetime reported by the API at issue time.
    pub fn expires_in(&self) -> Duration {
        self.expires_in
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"<redacted>")
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

// Daraja sends `expires_in` as a string ("3599").
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    #[serde(default)]
    expires_in: Option<serde_json::Value>,
}

/// Client for the OAuth token endpoint.
#[derive(Debug, Clone)]
pub struct TokenService {
    client: reqwest::Client,
}

impl TokenService {
    /// Create a service whose requests are bounded by `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, AuthError> {
        let client = http_client(timeout).map_err(AuthError::Transport)?;
        Ok(Self { client })
    }

    /// Request a token from `token_url` using HTTP Basic auth.
    pub async fn get_access_token(
        &self,
        credentials: &Credentials,
        token_url: &Url,
    ) -> Result<AccessToken, AuthError> {
        let pair = format!("{}:{}", credentials.consumer_key, credentials.consumer_secret);
        let auth_header = format!(
            "Basic {}",
            base64::engine::general_purpose::STANDARD.encode(pair)
        );

        tracing::debug!(url = %token_url, "Requesting access token");

        let response = self
            .client
            .get(token_url.clone())
            .header(AUTHORIZATION, auth_header)
            .send()
            .await
            .map_err(AuthError::Transport)?;

        let status = response.status();
        let body = response.text().await.map_err(AuthError::Transport)?;

        if status != StatusCode::OK {
            tracing::warn!(status = status.as_u16(), "Token request rejected");
            return Err(AuthError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let token = parse_token_response(&body)?;
        tracing::debug!(expires_in_secs = token.expires_in.as_secs(), "Access token acquired");
        Ok(token)
    }
}

fn parse_token_response(body: &str) -> Result<AccessToken, AuthError> {
    let parsed: TokenResponse =
        serde_json::from_str(body).map_err(|e| AuthError::MalformedResponse(e.to_string()))?;

    let value = parsed
        .access_token
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AuthError::MalformedResponse("missing access_token".to_string()))?;

    let expires_in = parsed
        .expires_in
        .as_ref()
        .and_then(|raw| match raw {
            serde_json::Value::String(s) => s.trim().parse::<u64>().ok(),
            serde_json::Value::Number(n) => n.as_u64(),
            _ => None,
        })
        .map(Duration::from_secs)
        .unwrap_or_else(|| {
            tracing::debug!("Token response has no usable expires_in, assuming default");
            DEFAULT_TOKEN_LIFETIME
        });

    Ok(AccessToken::new(value, expires_in))
}
