//! Runtime configuration.
//!
//! Sources, lowest precedence first:
//! 1. Built-in defaults
//! 2. TOML file (`--config <FILE>` or `MAILTRACE_CONFIG`)
//! 3. Environment (`MAILTRACE_API_KEY`, `MAILTRACE_PROFILE`, `MAILTRACE_TIMEOUT_MS`)
//! 4. Command line flags
//!
//! Keys in the file are camelCase:
//!
//! ```toml
//! apiKey = "0123456789abcdef"
//! profile = "live"
//! timeoutMs = 5000
//! ```

use crate::checkers::breach::DEFAULT_BREACH_API_URL;
use crate::cli::args::Args;
use crate::LookupProfile;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

pub const ENV_API_KEY: &str = "MAILTRACE_API_KEY";
pub const ENV_PROFILE: &str = "MAILTRACE_PROFILE";
pub const ENV_TIMEOUT_MS: &str = "MAILTRACE_TIMEOUT_MS";

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// mailtrace configuration
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MailTraceConfig {
    /// Breach-database API key; never hard-coded
    pub api_key: Option<String>,
    pub breach_api_url: String,
    pub user_agent: String,
    /// Per-checker timeout in milliseconds
    pub timeout_ms: u64,
    pub profile: LookupProfile,
    /// Simulated latency of each mocked checker
    pub mock_delay_ms: u64,
}

impl Default for MailTraceConfig {
    fn default() -> Self {
        MailTraceConfig {
            api_key: None,
            breach_api_url: DEFAULT_BREACH_API_URL.to_string(),
            user_agent: format!("mailtrace/{}", env!("CARGO_PKG_VERSION")),
            timeout_ms: 10000,
            profile: LookupProfile::default(),
            mock_delay_ms: 2000,
        }
    }
}

// The API key stays out of logs.
impl fmt::Debug for MailTraceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailTraceConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("breach_api_url", &self.breach_api_url)
            .field("user_agent", &self.user_agent)
            .field("timeout_ms", &self.timeout_ms)
            .field("profile", &self.profile)
            .field("mock_delay_ms", &self.mock_delay_ms)
            .finish()
    }
}

impl MailTraceConfig {
    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: MailTraceConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML file
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Apply environment overrides read through `lookup`
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(ENV_API_KEY).filter(|k| !k.trim().is_empty()) {
            self.api_key = Some(key);
        }
        if let Some(profile) = lookup(ENV_PROFILE) {
            self.profile = profile.parse().map_err(|reason| ConfigError::Invalid {
                field: ENV_PROFILE,
                reason,
            })?;
        }
        if let Some(timeout) = lookup(ENV_TIMEOUT_MS) {
            self.timeout_ms = timeout.trim().parse().map_err(|_| ConfigError::Invalid {
                field: ENV_TIMEOUT_MS,
                reason: format!("'{}' is not a number of milliseconds", timeout),
            })?;
        }
        self.validate()
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Build the effective configuration for a command line invocation
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let mut config = match args.config {
            Some(ref path) => Self::load_file(path)?,
            None => Self::default(),
        };

        config.apply_env()?;

        if let Some(ref key) = args.api_key {
            config.api_key = Some(key.clone());
        }
        if let Some(profile) = args.profile {
            config.profile = profile;
        }
        if let Some(timeout_ms) = args.timeout_ms {
            config.timeout_ms = timeout_ms;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "timeoutMs",
                reason: "must be greater than zero".to_string(),
            });
        }
        if !self.breach_api_url.starts_with("http://") && !self.breach_api_url.starts_with("https://") {
            return Err(ConfigError::Invalid {
                field: "breachApiUrl",
                reason: format!("'{}' is not an http(s) URL", self.breach_api_url),
            });
        }
        Ok(())
    }
}
