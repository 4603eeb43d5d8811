//! Configuration resolution from defaults, disk and environment.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::config::schema::{Config, Settings, KEYS};
use crate::config::validation::{validate, ValidationError};

/// Base name of the config file (`mpesa-cli.yaml` and friends).
pub const CONFIG_NAME: &str = "mpesa-cli";

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "MPESA_";

const EXTENSIONS: [&str; 3] = ["yaml", "yml", "toml"];

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config file {}: {message}", path.display())]
    ParseFailure { path: PathBuf, message: String },

    #[error("invalid configuration: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Everything `resolve` reads, captured up front.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    /// Directories searched, in order, for `mpesa-cli.{yaml,yml,toml}`.
    pub search_paths: Vec<PathBuf>,

    /// Snapshot of the environment variables.
    pub env: HashMap<String, String>,
}

impl ConfigSources {
    /// Snapshot the current process: `MPESA_*` variables and the default
    /// search path.
    pub fn from_process() -> Self {
        let env: HashMap<String, String> = std::env::vars()
            .filter(|(key, _)| key.starts_with(ENV_PREFIX))
            .collect();
        let home = std::env::var_os("HOME").map(PathBuf::from);

        Self {
            search_paths: default_search_paths(home.as_deref()),
            env,
        }
    }

    pub fn with_search_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.search_paths.push(path.into());
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }
}

/// Current directory, then `$HOME/.config/mpesa-cli`, then `/etc/mpesa-cli`.
pub fn default_search_paths(home: Option<&Path>) -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(".")];
    if let Some(home) = home {
        paths.push(home.join(".config").join(CONFIG_NAME));
    }
    paths.push(PathBuf::from("/etc").join(CONFIG_NAME));
    paths
}

/// First config file found along the search path.
pub fn find_config_file(search_paths: &[PathBuf]) -> Option<PathBuf> {
    search_paths.iter().find_map(|dir| {
        EXTENSIONS
            .iter()
            .map(|ext| dir.join(format!("{}.{}", CONFIG_NAME, ext)))
            .find(|candidate| candidate.is_file())
    })
}

/// Resolve a validated configuration.
///
/// Layers, lowest first: built-in defaults, the config file (`explicit`
/// when given, otherwise the first file on the search path), then the
/// `MPESA_*` variables. A missing file on the search path is not an error;
/// a missing explicit file is.
pub fn resolve(explicit: Option<&Path>, sources: &ConfigSources) -> Result<Config, ConfigError> {
    let mut settings = Settings::defaults();

    let file = match explicit {
        Some(path) if !path.is_file() => return Err(ConfigError::NotFound(path.to_path_buf())),
        Some(path) => Some(path.to_path_buf()),
        None => find_config_file(&sources.search_paths),
    };

    if let Some(path) = file {
        tracing::debug!(path = %path.display(), "Using config file");
        settings.overlay(load_file(&path)?);
    } else {
        tracing::debug!("No config file found, using defaults");
    }

    settings.overlay(env_settings(&sources.env));

    let config = validate(&settings).map_err(ConfigError::Validation)?;

    tracing::debug!(
        environment = %config.environment,
        base_url = %config.base_url,
        timeout_secs = config.timeout_secs,
        "Configuration resolved"
    );

    Ok(config)
}

/// Read a config file; TOML for `.toml`, YAML otherwise.
pub fn load_file(path: &Path) -> Result<Settings, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let parse_failure = |message: String| ConfigError::ParseFailure {
        path: path.to_path_buf(),
        message,
    };

    let is_toml = path.extension().is_some_and(|ext| ext == "toml");
    let file: FileSettings = if is_toml {
        toml::from_str(&content).map_err(|e| parse_failure(e.to_string()))?
    } else {
        // Empty or comment-only documents parse to null.
        let value: serde_yaml::Value =
            serde_yaml::from_str(&content).map_err(|e| parse_failure(e.to_string()))?;
        if value.is_null() {
            FileSettings::default()
        } else {
            serde_yaml::from_value(value).map_err(|e| parse_failure(e.to_string()))?
        }
    };

    Ok(file.into())
}

/// Explicitly bound `MPESA_<KEY>` variables. Empty values count as unset.
pub fn env_settings(env: &HashMap<String, String>) -> Settings {
    let mut settings = Settings::default();
    for key in KEYS {
        let var = format!("{}{}", ENV_PREFIX, key.to_uppercase());
        let value = env.get(&var).filter(|value| !value.is_empty());
        if let (Some(value), Some(slot)) = (value, settings.slot_mut(key)) {
            *slot = Some(value.clone());
        }
    }
    settings
}

/// A config value as written in the file. Unquoted YAML such as
/// `business_shortcode: 600986` arrives as a number.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Integer(i64),
    Float(f64),
    Flag(bool),
}

impl From<Scalar> for String {
    fn from(scalar: Scalar) -> Self {
        match scalar {
            Scalar::Text(s) => s,
            Scalar::Integer(i) => i.to_string(),
            Scalar::Float(f) => f.to_string(),
            Scalar::Flag(b) => b.to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileSettings {
    environment: Option<Scalar>,
    business_shortcode: Option<Scalar>,
    security_credential: Option<Scalar>,
    initiator: Option<Scalar>,
    result_url: Option<Scalar>,
    queue_timeout_url: Option<Scalar>,
    base_url: Option<Scalar>,
    timeout_secs: Option<Scalar>,
}

impl From<FileSettings> for Settings {
    fn from(file: FileSettings) -> Self {
        Settings {
            environment: file.environment.map(Into::into),
            business_shortcode: file.business_shortcode.map(Into::into),
            security_credential: file.security_credential.map(Into::into),
            initiator: file.initiator.map(Into::into),
            result_url: file.result_url.map(Into::into),
            queue_timeout_url: file.queue_timeout_url.map(Into::into),
            base_url: file.base_url.map(Into::into),
            timeout_secs: file.timeout_secs.map(Into::into),
        }
    }
}
