//! Configuration management for repobuild
//!
//! Configuration is loaded from a YAML file with environment variable
//! override for the two secret fields. Missing file or invalid YAML is a
//! startup-fatal error; everything else has a sensible default.
//!
//! # Environment Variables
//!
//! - `GITHUB_TOKEN`: overrides `github_token` from the YAML file
//! - `OPENAI_API_KEY`: overrides `openai_api_key` from the YAML file
//!
//! # Example
//!
//! ```no_run
//! use repobuild::Config;
//!
//! let config = Config::from_yaml("config.yaml").expect("config load failed");
//! config.validate().expect("invalid configuration");
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default values for configuration
const DEFAULT_BASE_DIR: &str = "github-repos";
const DEFAULT_LOG_DIR: &str = "logs";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CACHE_CAPACITY: usize = 64;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file does not exist
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    /// Configuration file could not be read
    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Configuration file is not valid YAML
    #[error("Invalid YAML configuration: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),

    /// A required field is empty after env override
    #[error("{0} is required")]
    MissingField(&'static str),

    /// Directory creation failed during validation
    #[error("Failed to create directory {path}: {source}")]
    DirectoryError {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Main configuration structure for repobuild
///
/// Construct with [`Config::from_yaml`], which applies environment variable
/// overrides for the secret fields, then call [`Config::validate`] before
/// using the configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// GitHub API token
    #[serde(default)]
    pub github_token: String,

    /// API key for the model provider
    #[serde(default)]
    pub openai_api_key: String,

    /// Directory repositories are downloaded into
    #[serde(default = "default_base_directory")]
    pub base_directory: PathBuf,

    /// Directory for dated log files
    #[serde(default = "default_log_directory")]
    pub log_directory: PathBuf,

    /// Model name used for README analysis
    #[serde(default = "default_model_name")]
    pub model_name: String,

    /// Maximum analysis attempts before giving up
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Model request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum number of cached analysis results
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

fn default_base_directory() -> PathBuf {
    PathBuf::from(DEFAULT_BASE_DIR)
}

fn default_log_directory() -> PathBuf {
    PathBuf::from(DEFAULT_LOG_DIR)
}

fn default_model_name() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_cache_capacity() -> usize {
    DEFAULT_CACHE_CAPACITY
}

impl Config {
    /// Loads configuration from a YAML file with environment variable override
    ///
    /// `GITHUB_TOKEN` and `OPENAI_API_KEY` environment variables take
    /// precedence over the values in the file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file does not exist or is not valid YAML.
    pub fn from_yaml(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = serde_yaml::from_str(&contents)?;

        // Environment variables override file config
        if let Ok(token) = env::var("GITHUB_TOKEN") {
            config.github_token = token;
        }
        if let Ok(key) = env::var("OPENAI_API_KEY") {
            config.openai_api_key = key;
        }

        Ok(config)
    }

    /// Validates the configuration and creates the working directories
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a secret field is empty or a directory
    /// cannot be created.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.github_token.is_empty() {
            return Err(ConfigError::MissingField("GITHUB_TOKEN"));
        }
        if self.openai_api_key.is_empty() {
            return Err(ConfigError::MissingField("OPENAI_API_KEY"));
        }

        for dir in [&self.base_directory, &self.log_directory] {
            std::fs::create_dir_all(dir).map_err(|source| ConfigError::DirectoryError {
                path: dir.clone(),
                source,
            })?;
        }

        Ok(())
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Repobuild Configuration:")?;
        writeln!(f, "  Base Directory: {}", self.base_directory.display())?;
        writeln!(f, "  Log Directory: {}", self.log_directory.display())?;
        writeln!(f, "  Model: {}", self.model_name)?;
        writeln!(f, "  Max Retries: {}", self.max_retries)?;
        writeln!(f, "  Request Timeout: {}s", self.timeout_secs)?;
        writeln!(f, "  Cache Capacity: {}", self.cache_capacity)?;
        Ok(())
    }
}
