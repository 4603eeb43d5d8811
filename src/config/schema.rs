//! Configuration schema definitions.
//!
//! `Settings` is the raw, layered view (every key optional, every value a
//! string) that defaults, the config file and environment variables are
//! merged into. `Config` is the validated, typed result handed to the rest of
//! the CLI.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

/// Daraja sandbox API host.
pub const SANDBOX_BASE_URL: &str = "https://sandbox.safaricom.co.ke";

/// Daraja production API host.
pub const PRODUCTION_BASE_URL: &str = "https://api.safaricom.co.ke";

const TOKEN_PATH: &str = "/oauth/v1/generate";
const TRANSACTION_STATUS_PATH: &str = "/mpesa/transactionstatus/v1/query";

/// Every key understood by the config file and the `MPESA_*` variables.
pub const KEYS: [&str; 8] = [
    "environment",
    "business_shortcode",
    "security_credential",
    "initiator",
    "result_url",
    "queue_timeout_url",
    "base_url",
    "timeout_secs",
];

/// The M-Pesa API environment a request is aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Environment {
    #[default]
    Sandbox,
    Production,
}

impl Environment {
    pub const ALL: [Environment; 2] = [Environment::Sandbox, Environment::Production];

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Sandbox => "sandbox",
            Environment::Production => "production",
        }
    }

    /// Built-in API host for this environment.
    pub fn base_url(&self) -> Url {
        let raw = match self {
            Environment::Sandbox => SANDBOX_BASE_URL,
            Environment::Production => PRODUCTION_BASE_URL,
        };
        Url::parse(raw).expect("built-in base URLs are valid")
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = String;

    /// Exact match only; "Sandbox" or " production" are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sandbox" => Ok(Environment::Sandbox),
            "production" => Ok(Environment::Production),
            other => Err(other.to_string()),
        }
    }
}

/// `GET <base>/oauth/v1/generate?grant_type=client_credentials`
pub fn token_endpoint(base: &Url) -> Url {
    let mut url = endpoint(base, TOKEN_PATH);
    url.query_pairs_mut()
        .append_pair("grant_type", "client_credentials");
    url
}

/// `POST <base>/mpesa/transactionstatus/v1/query`
pub fn transaction_status_endpoint(base: &Url) -> Url {
    endpoint(base, TRANSACTION_STATUS_PATH)
}

// Keeps any path prefix on the base (gateways mounted under a sub-path).
fn endpoint(base: &Url, path: &str) -> Url {
    let mut url = base.clone();
    let prefix = base.path().trim_end_matches('/').to_string();
    url.set_path(&format!("{}{}", prefix, path));
    url.set_query(None);
    url.set_fragment(None);
    url
}

/// Validated configuration for a single CLI invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Paybill or Buygoods account number, sent as `PartyA`.
    pub business_shortcode: String,

    /// Initiator credential, sent as configured.
    pub security_credential: String,

    pub environment: Environment,

    /// Name of the API operator initiating the request.
    pub initiator: String,

    /// Callback for the asynchronous transaction result.
    pub result_url: String,

    /// Callback for queue timeouts.
    pub queue_timeout_url: String,

    /// API host; the environment's built-in host unless overridden.
    pub base_url: Url,

    /// Timeout applied to every outbound HTTP call.
    pub timeout_secs: u64,
}

impl Config {
    /// Sandbox configuration using Safaricom's public test shortcode.
    pub fn sandbox_defaults() -> Self {
        Self {
            business_shortcode: "600986".to_string(),
            security_credential: "YourSecurityCredential".to_string(),
            environment: Environment::Sandbox,
            initiator: "testapi".to_string(),
            result_url: "https://domain.com/result".to_string(),
            queue_timeout_url: "https://domain.com/timeout".to_string(),
            base_url: Environment::Sandbox.base_url(),
            timeout_secs: 10,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn token_url(&self) -> Url {
        token_endpoint(&self.base_url)
    }

    pub fn transaction_status_url(&self) -> Url {
        transaction_status_endpoint(&self.base_url)
    }

    /// JSON view safe for logs and `config show`.
    pub fn redacted(&self) -> serde_json::Value {
        let credential = if self.security_credential.is_empty() {
            ""
        } else {
            "********"
        };

        serde_json::json!({
            "environment": self.environment.as_str(),
            "business_shortcode": self.business_shortcode,
            "security_credential": credential,
            "initiator": self.initiator,
            "result_url": self.result_url,
            "queue_timeout_url": self.queue_timeout_url,
            "base_url": self.base_url.as_str(),
            "timeout_secs": self.timeout_secs,
        })
    }
}

/// Raw layered settings prior to validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub environment: Option<String>,
    pub business_shortcode: Option<String>,
    pub security_credential: Option<String>,
    pub initiator: Option<String>,
    pub result_url: Option<String>,
    pub queue_timeout_url: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<String>,
}

impl Settings {
    /// Hard-coded defaults, the bottom layer of every resolution.
    pub fn defaults() -> Self {
        Self {
            environment: Some("sandbox".to_string()),
            initiator: Some("testapi".to_string()),
            result_url: Some("https://domain.com/result".to_string()),
            queue_timeout_url: Some("https://domain.com/timeout".to_string()),
            timeout_secs: Some("10".to_string()),
            ..Self::default()
        }
    }

    /// Mutable slot for a config key, `None` for unknown keys.
    pub fn slot_mut(&mut self, key: &str) -> Option<&mut Option<String>> {
        match key {
            "environment" => Some(&mut self.environment),
            "business_shortcode" => Some(&mut self.business_shortcode),
            "security_credential" => Some(&mut self.security_credential),
            "initiator" => Some(&mut self.initiator),
            "result_url" => Some(&mut self.result_url),
            "queue_timeout_url" => Some(&mut self.queue_timeout_url),
            "base_url" => Some(&mut self.base_url),
            "timeout_secs" => Some(&mut self.timeout_secs),
            _ => None,
        }
    }

    /// Apply `upper` on top of `self`; keys set in `upper` win.
    pub fn overlay(&mut self, mut upper: Settings) {
        for key in KEYS {
            let value = upper.slot_mut(key).and_then(Option::take);
            if let (Some(value), Some(slot)) = (value, self.slot_mut(key)) {
                *slot = Some(value);
            }
        }
    }
}
