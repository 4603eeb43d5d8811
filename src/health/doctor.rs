//! Environment and credential diagnostics (`mpesa-cli doctor`).
//!
//! # Responsibilities
//! - Report whether the configuration resolves
//! - Check that credentials are present in the keychain
//! - Try to acquire a token from each environment
//!
//! # Design Decisions
//! - Checks never abort the run; every outcome is reported
//! - Token checks are skipped, not failed, when there are no credentials
//! - Token endpoints are passed in, so tests target mock servers

use std::fmt;

use url::Url;

use crate::auth::TokenService;
use crate::config::{schema::token_endpoint, Config, ConfigError, Environment};
use crate::credentials::CredentialStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    Passed(String),
    Failed(String),
    Skipped(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Check {
    pub name: String,
    pub outcome: CheckOutcome,
}

/// Result of a doctor run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DoctorReport {
    pub checks: Vec<Check>,
}

impl DoctorReport {
    /// True when no check failed. Skipped checks do not count as failures.
    pub fn is_healthy(&self) -> bool {
        !self
            .checks
            .iter()
            .any(|check| matches!(check.outcome, CheckOutcome::Failed(_)))
    }

    pub fn check(&self, name: &str) -> Option<&Check> {
        self.checks.iter().find(|check| check.name == name)
    }

    fn push(&mut self, name: impl Into<String>, outcome: CheckOutcome) {
        self.checks.push(Check {
            name: name.into(),
            outcome,
        });
    }
}

impl fmt::Display for DoctorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for check in &self.checks {
            match &check.outcome {
                CheckOutcome::Passed(msg) => writeln!(f, "✅ {}: {}", check.name, msg)?,
                CheckOutcome::Failed(msg) => writeln!(f, "❌ {}: {}", check.name, msg)?,
                CheckOutcome::Skipped(msg) => writeln!(f, "⏭  {}: {}", check.name, msg)?,
            }
        }
        Ok(())
    }
}

/// A token endpoint to probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenTarget {
    pub environment: Environment,
    pub token_url: Url,
}

/// Sandbox and production, honouring a configured host override for the
/// configured environment.
pub fn default_targets(config: Option<&Config>) -> Vec<TokenTarget> {
    Environment::ALL
        .into_iter()
        .map(|environment| {
            let token_url = match config {
                Some(config) if config.environment == environment => config.token_url(),
                _ => token_endpoint(&environment.base_url()),
            };
            TokenTarget {
                environment,
                token_url,
            }
        })
        .collect()
}

/// Run every check and collect the outcomes.
pub async fn run_doctor(
    config: &Result<Config, ConfigError>,
    store: &CredentialStore,
    tokens: &TokenService,
    targets: &[TokenTarget],
) -> DoctorReport {
    let mut report = DoctorReport::default();

    match config {
        Ok(config) => report.push(
            "Configuration",
            CheckOutcome::Passed(format!("valid ({} environment)", config.environment)),
        ),
        Err(err) => report.push("Configuration", CheckOutcome::Failed(err.to_string())),
    }

    let credentials = match store.retrieve() {
        Ok(credentials) => {
            report.push(
                "Credentials",
                CheckOutcome::Passed("found in keychain".to_string()),
            );
            Some(credentials)
        }
        Err(err) => {
            report.push("Credentials", CheckOutcome::Failed(err.to_string()));
            None
        }
    };

    for target in targets {
        let name = format!("{} token", target.environment);
        let Some(credentials) = &credentials else {
            report.push(name, CheckOutcome::Skipped("no credentials".to_string()));
            continue;
        };

        let outcome = match tokens.get_access_token(credentials, &target.token_url).await {
            Ok(_) => CheckOutcome::Passed("auth token fetched successfully".to_string()),
            Err(err) => {
                tracing::debug!(environment = %target.environment, error = %err, "Token check failed");
                CheckOutcome::Failed(format!("failed to fetch auth token: {}", err))
            }
        };
        report.push(name, outcome);
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::MemoryBackend;
    use std::time::Duration;

    #[test]
    fn test_default_targets_use_builtin_hosts() {
        let targets = default_targets(None);
        assert_eq!(targets.len(), 2);
        assert_eq!(
            targets[0].token_url.as_str(),
            "https://sandbox.safaricom.co.ke/oauth/v1/generate?grant_type=client_credentials"
        );
        assert_eq!(
            targets[1].token_url.as_str(),
            "https://api.safaricom.co.ke/oauth/v1/generate?grant_type=client_credentials"
        );
    }

    #[test]
    fn test_default_targets_honour_override() {
        let mut config = Config::sandbox_defaults();
        config.base_url = "http://127.0.0.1:7000".parse().unwrap();

        let targets = default_targets(Some(&config));
        assert_eq!(targets[0].token_url.host_str(), Some("127.0.0.1"));
        assert_eq!(targets[1].token_url.host_str(), Some("api.safaricom.co.ke"));
    }

    #[tokio::test]
    async fn test_missing_credentials_skip_token_checks() {
        let store = CredentialStore::new(MemoryBackend::new());
        let tokens = TokenService::new(Duration::from_secs(1)).unwrap();
        let config = Ok(Config::sandbox_defaults());

        let report = run_doctor(&config, &store, &tokens, &default_targets(None)).await;

        assert!(!report.is_healthy());
        assert!(matches!(
            report.check("Credentials").unwrap().outcome,
            CheckOutcome::Failed(_)
        ));
        assert!(matches!(
            report.check("sandbox token").unwrap().outcome,
            CheckOutcome::Skipped(_)
        ));
        assert!(report.to_string().contains("mpesa-cli login"));
    }
}
