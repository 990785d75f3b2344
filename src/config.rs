//! Configuration management with TOML, environment variables, and CLI overrides.

use crate::error::ConfigError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Application configuration with layered loading.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Proxy URL (e.g., socks5://host:port), applied to every HTTP client
    #[serde(default)]
    pub proxy: Option<String>,

    /// Parts marketplace settings
    #[serde(default)]
    pub carpart: CarPartSettings,

    /// VIN decode portal settings
    #[serde(default)]
    pub vinmatch: VinMatchSettings,

    /// Export settings
    #[serde(default)]
    pub output: OutputSettings,

    /// Stdout rendering format
    #[serde(default)]
    pub format: OutputFormat,
}

/// Settings for Car-Part.com searches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarPartSettings {
    /// Zip code searches are centered on
    #[serde(default)]
    pub zip_code: Option<String>,

    /// Marketplace root URL
    #[serde(default = "default_carpart_url")]
    pub base_url: String,

    /// Base delay before each search submission in milliseconds
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Random jitter added to delay (0 to this value)
    #[serde(default = "default_delay_jitter_ms")]
    pub delay_jitter_ms: u64,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Credentials and location of the VINMatchPro portal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VinMatchSettings {
    #[serde(default = "default_vinmatch_url")]
    pub url: String,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Where and how result files are written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(default = "default_output_dir")]
    pub directory: PathBuf,

    #[serde(default)]
    pub format: ExportFormat,
}

fn default_carpart_url() -> String {
    "https://www.car-part.com".to_string()
}

fn default_vinmatch_url() -> String {
    "https://www.vinmatchpro.com".to_string()
}

fn default_delay_ms() -> u64 {
    1000
}

fn default_delay_jitter_ms() -> u64 {
    1500
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

impl Default for CarPartSettings {
    fn default() -> Self {
        Self {
            zip_code: None,
            base_url: default_carpart_url(),
            delay_ms: default_delay_ms(),
            delay_jitter_ms: default_delay_jitter_ms(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for VinMatchSettings {
    fn default() -> Self {
        Self {
            url: default_vinmatch_url(),
            username: None,
            password: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self { directory: default_output_dir(), format: ExportFormat::Csv }
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        let local_config = Path::new("config.toml");
        if local_config.exists() {
            debug!("Found config.toml in current directory");
            return Self::from_file(local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("parts-pricer").join("config.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides.
    pub fn with_env(mut self) -> Self {
        if let Ok(zip) = std::env::var("PARTS_ZIP") {
            self.carpart.zip_code = Some(zip);
        }

        if let Ok(proxy) = std::env::var("PARTS_PROXY") {
            self.proxy = Some(proxy);
        }

        if let Ok(delay) = std::env::var("PARTS_DELAY") {
            if let Ok(d) = delay.parse() {
                self.carpart.delay_ms = d;
            }
        }

        if let Ok(username) = std::env::var("VINMATCH_USERNAME") {
            self.vinmatch.username = Some(username);
        }

        if let Ok(password) = std::env::var("VINMATCH_PASSWORD") {
            self.vinmatch.password = Some(password);
        }

        self
    }

    /// Returns the configured search zip code.
    pub fn require_zip(&self) -> Result<&str, ConfigError> {
        self.carpart
            .zip_code
            .as_deref()
            .map(str::trim)
            .filter(|z| !z.is_empty())
            .ok_or(ConfigError::MissingZip)
    }

    /// Returns `(username, password)` for the decode portal.
    pub fn decoder_credentials(&self) -> Result<(&str, &str), ConfigError> {
        let username = self
            .vinmatch
            .username
            .as_deref()
            .filter(|u| !u.is_empty())
            .ok_or(ConfigError::MissingDecoderSetting { field: "username", env: "USERNAME" })?;
        let password = self
            .vinmatch
            .password
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or(ConfigError::MissingDecoderSetting { field: "password", env: "PASSWORD" })?;
        Ok((username, password))
    }
}

/// Stdout format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown format: {}. Use: table, json, csv", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

/// File format for exported rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    #[serde(alias = "xlsx")]
    Excel,
}

impl ExportFormat {
    /// File extension written for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Excel => "xlsx",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            _ => Err(format!("Unknown export format: {}. Use: csv, excel", s)),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Csv => write!(f, "csv"),
            ExportFormat::Excel => write!(f, "excel"),
        }
    }
}
