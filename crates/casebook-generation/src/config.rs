//! Generation backend configuration.
//!
//! Configuration can be loaded from:
//! - TOML files (default: ~/.config/casebook/generation.toml)
//! - Environment variables (CASEBOOK_* prefixed)
//!
//! When no endpoint is configured the simulated backend is selected, so
//! development and test environments work without any external service.

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

use casebook_core::defaults;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Invalid backend: {0}")]
    InvalidBackend(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Generation backend type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Local simulation: fixed delay plus canned sections.
    #[default]
    Simulated,
    /// External HTTP generation endpoint.
    Http,
}

impl FromStr for BackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "simulated" => Ok(Self::Simulated),
            "http" => Ok(Self::Http),
            _ => Err(ConfigError::InvalidBackend(s.to_string())),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simulated => write!(f, "simulated"),
            Self::Http => write!(f, "http"),
        }
    }
}

fn default_timeout_secs() -> u64 {
    defaults::GENERATION_TIMEOUT_SECS
}

fn default_delay_ms() -> u64 {
    defaults::SIMULATED_GENERATION_DELAY_MS
}

/// HTTP backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Generation endpoint URL.
    pub endpoint: String,
    /// Optional bearer token.
    pub api_key: Option<String>,
    /// Optional model slug forwarded to the endpoint.
    pub model: Option<String>,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: None,
            model: None,
            timeout_secs: defaults::GENERATION_TIMEOUT_SECS,
        }
    }
}

/// Simulated backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatedConfig {
    /// Fixed delay applied before returning canned content.
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

impl Default for SimulatedConfig {
    fn default() -> Self {
        Self {
            delay_ms: defaults::SIMULATED_GENERATION_DELAY_MS,
        }
    }
}

/// Top-level generation configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GenerationConfig {
    /// Which backend to use.
    pub backend: BackendKind,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub simulated: SimulatedConfig,
}

impl GenerationConfig {
    /// Load configuration from the default path, falling back to env vars.
    ///
    /// Order: `$CASEBOOK_GENERATION_CONFIG` file if set, then
    /// `~/.config/casebook/generation.toml` if present, then environment.
    pub fn load() -> ConfigResult<Self> {
        if let Ok(explicit) = env::var("CASEBOOK_GENERATION_CONFIG") {
            debug!(path = %explicit, "loading generation config from explicit path");
            return Self::from_file(Path::new(&explicit));
        }

        if let Some(path) = Self::default_path() {
            if path.exists() {
                debug!(path = %path.display(), "loading generation config from default path");
                return Self::from_file(&path);
            }
        }

        Ok(Self::from_env())
    }

    /// Default config file location, if a home directory is known.
    pub fn default_path() -> Option<PathBuf> {
        env::var_os("HOME").map(|home| {
            PathBuf::from(home)
                .join(".config")
                .join("casebook")
                .join("generation.toml")
        })
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Build configuration from CASEBOOK_* environment variables.
    ///
    /// Setting `CASEBOOK_GENERATION_URL` selects the HTTP backend unless
    /// `CASEBOOK_GENERATION_BACKEND` says otherwise.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = env::var("CASEBOOK_GENERATION_URL") {
            config.backend = BackendKind::Http;
            config.http.endpoint = url;
        }
        if let Ok(backend) = env::var("CASEBOOK_GENERATION_BACKEND") {
            if let Ok(kind) = backend.parse() {
                config.backend = kind;
            }
        }
        if let Ok(key) = env::var("CASEBOOK_GENERATION_API_KEY") {
            config.http.api_key = Some(key);
        }
        if let Ok(model) = env::var("CASEBOOK_GENERATION_MODEL") {
            config.http.model = Some(model);
        }
        if let Ok(secs) = env::var("CASEBOOK_GENERATION_TIMEOUT_SECS") {
            if let Ok(secs) = secs.parse() {
                config.http.timeout_secs = secs;
            }
        }

        info!(
            backend = %config.backend,
            "generation config built from environment"
        );
        config
    }

    /// Check internal consistency.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.backend == BackendKind::Http && self.http.endpoint.is_empty() {
            return Err(ConfigError::Validation(
                "http backend selected but no endpoint configured".to_string(),
            ));
        }
        Ok(())
    }

    /// Request timeout as a Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_kind_from_str() {
        assert_eq!("simulated".parse::<BackendKind>().unwrap(), BackendKind::Simulated);
        assert_eq!("HTTP".parse::<BackendKind>().unwrap(), BackendKind::Http);
        assert!("ollama".parse::<BackendKind>().is_err());
    }

    #[test]
    fn test_default_is_simulated() {
        let config = GenerationConfig::default();
        assert_eq!(config.backend, BackendKind::Simulated);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_http_backend_requires_endpoint() {
        let config = GenerationConfig {
            backend: BackendKind::Http,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_parse_toml() {
        let raw = r#"
            backend = "http"

            [http]
            endpoint = "https://gen.example.org/v1/generate"
            timeout_secs = 30
        "#;
        let config: GenerationConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.backend, BackendKind::Http);
        assert_eq!(config.http.endpoint, "https://gen.example.org/v1/generate");
        assert_eq!(config.http.timeout_secs, 30);
        // Unset sections fall back to defaults.
        assert_eq!(
            config.simulated.delay_ms,
            defaults::SIMULATED_GENERATION_DELAY_MS
        );
    }
}
