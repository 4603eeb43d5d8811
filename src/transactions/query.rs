//! Transaction status queries.

use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use reqwest::StatusCode;
use thiserror::Error;

use crate::auth::AccessToken;
use crate::config::Config;
use crate::resilience::http_client;
use crate::transactions::types::{TransactionStatus, TransactionStatusRequest};

/// Errors from the transaction status endpoint.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("transaction id must not be empty")]
    InvalidTransactionId,

    #[error("api request failed with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("error sending transaction status request: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("failed to parse transaction status response: {0}")]
    MalformedResponse(String),
}

/// Client for `POST /mpesa/transactionstatus/v1/query`.
#[derive(Debug, Clone)]
pub struct TransactionClient {
    client: reqwest::Client,
}

impl TransactionClient {
    pub fn new(timeout: Duration) -> Result<Self, QueryError> {
        let client = http_client(timeout).map_err(QueryError::Transport)?;
        Ok(Self { client })
    }

    /// Submit a status query for `transaction_id`.
    ///
    /// The endpoint host comes from `config`. One attempt only; failures are
    /// returned as-is.
    pub async fn query_transaction(
        &self,
        access_token: &AccessToken,
        transaction_id: &str,
        config: &Config,
    ) -> Result<TransactionStatus, QueryError> {
        let transaction_id = transaction_id.trim();
        if transaction_id.is_empty() {
            return Err(QueryError::InvalidTransactionId);
        }

        let request = TransactionStatusRequest::new(transaction_id, config);
        let url = config.transaction_status_url();

        tracing::debug!(
            url = %url,
            transaction_id = %transaction_id,
            environment = %config.environment,
            "Submitting transaction status query"
        );

        let response = self
            .client
            .post(url)
            .header(AUTHORIZATION, format!("Bearer {}", access_token.value()))
            .json(&request)
            .send()
            .await
            .map_err(QueryError::Transport)?;

        let status = response.status();
        let body = response.text().await.map_err(QueryError::Transport)?;

        if status != StatusCode::OK {
            tracing::warn!(status = status.as_u16(), "Transaction status query rejected");
            return Err(QueryError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: TransactionStatus = serde_json::from_str(&body)
            .map_err(|e| QueryError::MalformedResponse(e.to_string()))?;

        tracing::debug!(
            conversation_id = %parsed.conversation_id,
            response_code = %parsed.response_code,
            "Transaction status query accepted"
        );

        Ok(parsed)
    }
}
