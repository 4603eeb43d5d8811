//! Authenticated operations: login and transaction status queries.

use thiserror::Error;

use crate::auth::{AuthError, TokenService};
use crate::config::Config;
use crate::credentials::{CredentialStore, Credentials, RetrieveError, StoreError};
use crate::session::state::SessionState;
use crate::transactions::{QueryError, TransactionClient, TransactionStatus};

/// Failure of a session step; the source carries the detail.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("error getting credentials")]
    Credentials(#[from] RetrieveError),

    #[error("failed to store credentials")]
    Store(#[from] StoreError),

    #[error("error getting access token")]
    Auth(#[from] AuthError),

    #[error("transaction status query failed")]
    Query(#[from] QueryError),
}

impl SessionError {
    /// No stored credentials: the user needs to run `login`.
    pub fn is_credentials_missing(&self) -> bool {
        matches!(self, SessionError::Credentials(err) if err.is_not_found())
    }
}

/// One CLI invocation's worth of authenticated work.
pub struct Session {
    config: Config,
    store: CredentialStore,
    tokens: TokenService,
    transactions: TransactionClient,
    state: SessionState,
    trail: Vec<SessionState>,
}

impl Session {
    /// Session with HTTP clients bounded by the configured timeout.
    pub fn new(config: Config, store: CredentialStore) -> Result<Self, SessionError> {
        let tokens = TokenService::new(config.timeout())?;
        let transactions = TransactionClient::new(config.timeout())?;
        Ok(Self::with_services(config, store, tokens, transactions))
    }

    pub fn with_services(
        config: Config,
        store: CredentialStore,
        tokens: TokenService,
        transactions: TransactionClient,
    ) -> Self {
        Self {
            config,
            store,
            tokens,
            transactions,
            state: SessionState::Unauthenticated,
            trail: vec![SessionState::Unauthenticated],
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn credential_store(&self) -> &CredentialStore {
        &self.store
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Every state visited by the last run, in order.
    pub fn trail(&self) -> &[SessionState] {
        &self.trail
    }

    /// Verify `credentials` against the configured environment, then store
    /// them. Nothing is written when the API rejects them.
    pub async fn login(&self, credentials: &Credentials) -> Result<(), SessionError> {
        let token_url = self.config.token_url();
        tracing::info!(environment = %self.config.environment, "Validating credentials");

        self.tokens.get_access_token(credentials, &token_url).await?;
        self.store
            .store(&credentials.consumer_key, &credentials.consumer_secret)?;

        tracing::info!("Credentials validated and stored");
        Ok(())
    }

    /// Load credentials, acquire a token, then query `transaction_id`.
    ///
    /// Each step runs only after the previous one succeeded; the first
    /// failure ends the run in `Failed`.
    pub async fn query(&mut self, transaction_id: &str) -> Result<TransactionStatus, SessionError> {
        self.state = SessionState::Unauthenticated;
        self.trail = vec![SessionState::Unauthenticated];

        let result = self.run_query(transaction_id).await;
        if let Err(err) = &result {
            tracing::debug!(state = %self.state, error = %err, "Session failed");
            self.advance(SessionState::Failed);
        }
        result
    }

    async fn run_query(&mut self, transaction_id: &str) -> Result<TransactionStatus, SessionError> {
        if transaction_id.trim().is_empty() {
            return Err(QueryError::InvalidTransactionId.into());
        }

        let credentials = self.store.retrieve()?;
        self.advance(SessionState::CredentialsLoaded);

        let token = self
            .tokens
            .get_access_token(&credentials, &self.config.token_url())
            .await?;
        self.advance(SessionState::TokenAcquired);

        self.advance(SessionState::QueryIssued);
        let status = self
            .transactions
            .query_transaction(&token, transaction_id, &self.config)
            .await?;

        self.advance(SessionState::Succeeded);
        Ok(status)
    }

    fn advance(&mut self, to: SessionState) {
        debug_assert!(
            self.state.can_transition_to(to),
            "illegal session transition {} -> {}",
            self.state,
            to
        );
        tracing::debug!(from = %self.state, to = %to, "Session transition");
        self.state = to;
        self.trail.push(to);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::MemoryBackend;

    fn offline_config() -> Config {
        let mut config = Config::sandbox_defaults();
        config.base_url = "http://127.0.0.1:1".parse().unwrap();
        config.timeout_secs = 1;
        config
    }

    #[tokio::test]
    async fn test_missing_credentials_fail_first_step() {
        let store = CredentialStore::new(MemoryBackend::new());
        let mut session = Session::new(offline_config(), store).unwrap();

        let err = session.query("TX1").await.unwrap_err();
        assert!(err.is_credentials_missing());
        assert_eq!(
            session.trail(),
            &[SessionState::Unauthenticated, SessionState::Failed]
        );
    }

    #[tokio::test]
    async fn test_unreachable_token_endpoint_stops_before_query() {
        let store = CredentialStore::new(MemoryBackend::new());
        store.store("key", "secret").unwrap();
        let mut session = Session::new(offline_config(), store).unwrap();

        let err = session.query("TX1").await.unwrap_err();
        assert!(matches!(err, SessionError::Auth(AuthError::Transport(_))));
        assert!(!err.is_credentials_missing());
        assert_eq!(
            session.trail(),
            &[
                SessionState::Unauthenticated,
                SessionState::CredentialsLoaded,
                SessionState::Failed,
            ]
        );
    }
}
