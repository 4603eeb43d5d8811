//! Configuration validation.
//!
//! # Responsibilities
//! - Turn raw `Settings` into a typed `Config`
//! - Enforce the production invariant (shortcode and credential present)
//! - Validate the API host override and the HTTP timeout
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure: Settings → Result<Config, Vec<ValidationError>>

use thiserror::Error;
use url::Url;

use crate::config::schema::{Config, Environment, Settings};

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("environment must be either 'sandbox' or 'production', got: {0}")]
    InvalidEnvironment(String),

    #[error("{field} is required for {environment} environment")]
    MissingField {
        field: &'static str,
        environment: Environment,
    },

    #[error("{field} must be an absolute http(s) URL, got: {value}")]
    InvalidUrl { field: &'static str, value: String },

    #[error("timeout_secs must be a positive integer, got: {0}")]
    InvalidTimeout(String),
}

/// Validate merged settings and build the typed configuration.
pub fn validate(settings: &Settings) -> Result<Config, Vec<ValidationError>> {
    let mut errors = Vec::new();

    let raw_environment = settings.environment.clone().unwrap_or_default();
    let environment = match raw_environment.parse::<Environment>() {
        Ok(env) => Some(env),
        Err(other) => {
            errors.push(ValidationError::InvalidEnvironment(other));
            None
        }
    };

    let base_url = match settings.base_url.as_deref() {
        Some(raw) => match parse_http_url(raw) {
            Some(url) => Some(url),
            None => {
                errors.push(ValidationError::InvalidUrl {
                    field: "base_url",
                    value: raw.to_string(),
                });
                None
            }
        },
        None => None,
    };

    let raw_timeout = settings.timeout_secs.clone().unwrap_or_default();
    let timeout_secs = match raw_timeout.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Some(secs),
        _ => {
            errors.push(ValidationError::InvalidTimeout(raw_timeout));
            None
        }
    };

    let (Some(environment), Some(timeout_secs)) = (environment, timeout_secs) else {
        return Err(errors);
    };

    let config = Config {
        business_shortcode: settings.business_shortcode.clone().unwrap_or_default(),
        security_credential: settings.security_credential.clone().unwrap_or_default(),
        environment,
        initiator: settings.initiator.clone().unwrap_or_default(),
        result_url: settings.result_url.clone().unwrap_or_default(),
        queue_timeout_url: settings.queue_timeout_url.clone().unwrap_or_default(),
        base_url: base_url.unwrap_or_else(|| environment.base_url()),
        timeout_secs,
    };

    if let Err(invariant_errors) = validate_config(&config) {
        errors.extend(invariant_errors);
    }

    if errors.is_empty() {
        Ok(config)
    } else {
        Err(errors)
    }
}

/// Check the invariants a typed `Config` must hold.
pub fn validate_config(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.environment == Environment::Production {
        if config.business_shortcode.trim().is_empty() {
            errors.push(ValidationError::MissingField {
                field: "business_shortcode",
                environment: config.environment,
            });
        }
        if config.security_credential.trim().is_empty() {
            errors.push(ValidationError::MissingField {
                field: "security_credential",
                environment: config.environment,
            });
        }
    }

    if config.timeout_secs == 0 {
        errors.push(ValidationError::InvalidTimeout("0".to_string()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn parse_http_url(raw: &str) -> Option<Url> {
    let url = Url::parse(raw.trim()).ok()?;
    let http = matches!(url.scheme(), "http" | "https");
    (http && url.has_host()).then_some(url)
}
