use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

use crate::date_format::{DatePattern, parse_timezone};
use crate::error::SitemapError;
use crate::generator::DEFAULT_FILE_NAME_PREFIX;
use crate::render::MAX_URLS_PER_SITEMAP;

/// Trait for abstracting environment variable access
pub trait EnvProvider {
    fn get(&self, key: &str) -> Option<String>;
}

/// System environment variable provider for production use
pub struct SystemEnvProvider;

impl EnvProvider for SystemEnvProvider {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),

    #[error("JSON parsing error: {0}")]
    JsonParsing(#[from] serde_json::Error),

    #[error("Configuration validation error: {0}")]
    Validation(String),

    #[error("Environment variable error: {0}")]
    Environment(String),

    #[error("Unsupported configuration file format: {0}")]
    UnsupportedFormat(String),
}

impl From<ConfigError> for SitemapError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Io(e) => SitemapError::Io(e),
            other => SitemapError::Config(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Main generation configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub generator: GeneratorConfig,
    pub dates: DateConfig,
    pub index: IndexConfig,
}

/// Sitemap generator configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Host every URL must share, e.g. `https://www.example.com`
    pub base_url: Option<String>,
    /// Directory for sitemap files; unset keeps documents in memory
    pub output_dir: Option<PathBuf>,
    /// File name stem of each sitemap
    pub file_name_prefix: String,
    /// URLs per sitemap; unset uses the variant's ceiling
    pub max_urls: Option<usize>,
    /// Split into numbered sitemaps instead of failing when one is full
    pub allow_multiple_sitemaps: bool,
    /// Allow writing a sitemap with no URLs
    pub allow_empty_sitemap: bool,
    /// Gzip written sitemaps
    pub gzip: bool,
    /// Validate every document against the sitemap schema
    pub auto_validate: bool,
}

/// Date formatting configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DateConfig {
    pub pattern: DatePattern,
    /// `Z` or `±HH:MM`
    pub timezone: String,
}

/// Sitemap index configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IndexConfig {
    /// Index file name inside the output directory
    pub file_name: String,
    pub allow_empty_index: bool,
    /// W3C datetime used for entries without their own `lastmod`
    pub default_last_mod: Option<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            output_dir: None,
            file_name_prefix: DEFAULT_FILE_NAME_PREFIX.to_string(),
            max_urls: None,
            allow_multiple_sitemaps: true,
            allow_empty_sitemap: false,
            gzip: false,
            auto_validate: false,
        }
    }
}

impl Default for DateConfig {
    fn default() -> Self {
        Self {
            pattern: DatePattern::Auto,
            timezone: "Z".to_string(),
        }
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            file_name: "sitemap_index.xml".to_string(),
            allow_empty_index: false,
            default_last_mod: None,
        }
    }
}

/// Configuration manager for loading and checking configurations
pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration with precedence: defaults -> file -> environment
    pub fn load_config(path: Option<&Path>) -> Result<Config> {
        let config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::find_config_file(Path::new("."))?.unwrap_or_default(),
        };

        let config = Self::apply_environment_overrides(config)?;
        Self::validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a file (TOML or JSON)
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let content = std::fs::read_to_string(path)?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(toml::from_str(&content)?),
            Some("json") => Ok(serde_json::from_str(&content)?),
            Some(ext) => Err(ConfigError::UnsupportedFormat(ext.to_string())),
            None => {
                // Try to parse as TOML first, then JSON
                if let Ok(config) = toml::from_str::<Config>(&content) {
                    Ok(config)
                } else {
                    Ok(serde_json::from_str(&content)?)
                }
            }
        }
    }

    /// Find a configuration file in `dir`
    pub fn find_config_file(dir: &Path) -> Result<Option<Config>> {
        let config_names = [
            "sitemap-generator.toml",
            "sitemap-generator.json",
            ".sitemap-generator.toml",
            ".sitemap-generator.json",
        ];

        for name in &config_names {
            let path = dir.join(name);
            if path.exists() {
                return Ok(Some(Self::load_from_file(&path)?));
            }
        }

        Ok(None)
    }

    /// Apply environment variable overrides using the system environment
    pub fn apply_environment_overrides(config: Config) -> Result<Config> {
        Self::apply_environment_overrides_with(&SystemEnvProvider, config)
    }

    /// Apply environment variable overrides with a custom environment provider
    pub fn apply_environment_overrides_with(
        env: &impl EnvProvider,
        mut config: Config,
    ) -> Result<Config> {
        // Generator settings
        if let Some(base_url) = env.get("SITEMAP_BASE_URL") {
            config.generator.base_url = Some(base_url);
        }

        if let Some(output_dir) = env.get("SITEMAP_OUTPUT_DIR") {
            config.generator.output_dir = Some(PathBuf::from(output_dir));
        }

        if let Some(prefix) = env.get("SITEMAP_FILE_PREFIX") {
            config.generator.file_name_prefix = prefix;
        }

        if let Some(max_urls) = env.get("SITEMAP_MAX_URLS") {
            config.generator.max_urls = Some(parse_env("SITEMAP_MAX_URLS", &max_urls)?);
        }

        if let Some(allow) = env.get("SITEMAP_ALLOW_MULTIPLE") {
            config.generator.allow_multiple_sitemaps = parse_env("SITEMAP_ALLOW_MULTIPLE", &allow)?;
        }

        if let Some(allow) = env.get("SITEMAP_ALLOW_EMPTY") {
            config.generator.allow_empty_sitemap = parse_env("SITEMAP_ALLOW_EMPTY", &allow)?;
        }

        if let Some(gzip) = env.get("SITEMAP_GZIP") {
            config.generator.gzip = parse_env("SITEMAP_GZIP", &gzip)?;
        }

        if let Some(validate) = env.get("SITEMAP_AUTO_VALIDATE") {
            config.generator.auto_validate = parse_env("SITEMAP_AUTO_VALIDATE", &validate)?;
        }

        // Date settings
        if let Some(pattern) = env.get("SITEMAP_DATE_PATTERN") {
            config.dates.pattern = pattern.parse().map_err(|_| {
                ConfigError::Environment(format!("Invalid SITEMAP_DATE_PATTERN value: {}", pattern))
            })?;
        }

        if let Some(timezone) = env.get("SITEMAP_TIMEZONE") {
            config.dates.timezone = timezone;
        }

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate_config(config: &Config) -> Result<()> {
        if let Some(base_url) = &config.generator.base_url {
            let url = Url::parse(base_url).map_err(|e| {
                ConfigError::Validation(format!("Invalid base URL {}: {}", base_url, e))
            })?;
            if url.host_str().is_none() {
                return Err(ConfigError::Validation(format!(
                    "Base URL {} has no host",
                    base_url
                )));
            }
        }

        if let Some(max_urls) = config.generator.max_urls {
            if max_urls == 0 {
                return Err(ConfigError::Validation(
                    "Max URLs must be greater than 0".to_string(),
                ));
            }
            if max_urls > MAX_URLS_PER_SITEMAP {
                return Err(ConfigError::Validation(format!(
                    "Max URLs cannot exceed {}",
                    MAX_URLS_PER_SITEMAP
                )));
            }
        }

        let prefix = &config.generator.file_name_prefix;
        if prefix.is_empty() {
            return Err(ConfigError::Validation(
                "File name prefix must not be empty".to_string(),
            ));
        }
        if prefix.contains('/') || prefix.contains('\\') {
            return Err(ConfigError::Validation(format!(
                "Invalid file name prefix: {}",
                prefix
            )));
        }

        let index_file = &config.index.file_name;
        if index_file.is_empty() || index_file.contains('/') || index_file.contains('\\') {
            return Err(ConfigError::Validation(format!(
                "Invalid index file name: {}",
                index_file
            )));
        }

        parse_timezone(&config.dates.timezone)
            .map_err(|e| ConfigError::Validation(e.to_string()))?;

        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| ConfigError::Environment(format!("Invalid {} value: {}", key, value)))
}
