//! Configuration management for Fernweh.
//!
//! Parses `fernweh.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `api.base_url`

mod expand;

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "fernweh.toml";

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override content API base URL.
    pub api_url: Option<String>,
}

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Content API configuration.
    pub api: ApiConfig,
    /// Image delivery transform defaults.
    pub images: ImagesConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Content API configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Content API base URL. Absolute `http(s)` URL, or a `/`-relative
    /// path when the site is served behind a reverse-proxy rewrite.
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8055".to_owned(),
        }
    }
}

/// Default image transform parameters applied to story assets.
///
/// Values are kept as strings; they are passed verbatim as query
/// parameters to the delivery service.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ImagesConfig {
    /// Target encoding (e.g. `webp`). `None` leaves encoding unset.
    pub format: Option<String>,
    /// Target pixel width.
    pub width: Option<String>,
    /// Target quality 0-100.
    pub quality: Option<String>,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            format: Some("webp".to_owned()),
            width: Some("800".to_owned()),
            quality: Some("100".to_owned()),
        }
    }
}

/// Configuration loading error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`api.base_url`").
        field: String,
        /// Error message (e.g., "${`FERNWEH_API_URL`} not set").
        message: String,
    },
}

impl Config {
    /// Load configuration.
    ///
    /// Uses `path` if given, otherwise searches the current directory and
    /// its parents for `fernweh.toml`, otherwise falls back to defaults.
    /// CLI settings are applied last.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] when an explicit path does not
    /// exist, and parse/expansion/validation errors from loading.
    pub fn load(
        path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound(path.to_path_buf()));
                }
                Self::load_from_file(path)?
            }
            None => match Self::discover_config() {
                Some(path) => Self::load_from_file(&path)?,
                None => Self::default(),
            },
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(api_url) = &settings.api_url {
            self.api.base_url.clone_from(api_url);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before validation
        config.expand_env_vars()?;
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base_url = &self.api.base_url;
        if base_url.is_empty() {
            return Err(ConfigError::Validation(
                "api.base_url cannot be empty".to_owned(),
            ));
        }
        if !base_url.starts_with("http://")
            && !base_url.starts_with("https://")
            && !base_url.starts_with('/')
        {
            return Err(ConfigError::Validation(format!(
                "api.base_url must be an http(s) URL or a /-relative path, got \"{base_url}\""
            )));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.api.base_url = expand::expand_env(&self.api.base_url, "api.base_url")?;
        Ok(())
    }
}
