use crate::error::{CatalogError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Data file version this build understands
pub const SUPPORTED_VERSION: &str = "1.0";

/// Upper bound the YouTube API accepts for ids per `videos` request
pub const MAX_IDS_PER_REQUEST: usize = 50;

/// Configuration for the video guides catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Catalog data file settings
    pub catalog: CatalogConfig,

    /// YouTube metadata enrichment settings
    pub youtube: YouTubeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Path to the structured video data file
    pub data_file: PathBuf,

    /// Data file version expected in the `version` key
    pub supported_version: String,

    /// Category label meaning "no category restriction"
    pub all_label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YouTubeConfig {
    /// API key; enrichment is disabled when absent
    pub api_key: Option<String>,

    /// `videos` resource endpoint
    pub api_endpoint: String,

    /// Timeout for a single HTTP request (seconds)
    pub request_timeout_seconds: u64,

    /// Timeout wrapped around one category's batch fetch (seconds, 0 = none)
    pub fetch_timeout_seconds: u64,

    /// Ids sent per API request
    pub max_batch_size: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("data/videos.json"),
            supported_version: SUPPORTED_VERSION.to_string(),
            all_label: "All".to_string(),
        }
    }
}

impl Default for YouTubeConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_endpoint: "https://www.googleapis.com/youtube/v3/videos".to_string(),
            request_timeout_seconds: 30,
            fetch_timeout_seconds: 60,
            max_batch_size: MAX_IDS_PER_REQUEST,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig::default(),
            youtube: YouTubeConfig::default(),
        }
    }
}

impl YouTubeConfig {
    /// API key when one is configured and non-blank
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

impl Config {
    /// Load configuration from the first config file found, then apply
    /// environment overrides. Falls back to defaults plus environment.
    pub fn load() -> Result<Self> {
        let config_paths = ["video-guides.toml", "config/video-guides.toml"];

        for path in &config_paths {
            let path = Path::new(path);
            if path.exists() {
                match Self::from_file(path) {
                    Ok(config) => {
                        tracing::info!("📄 Loaded configuration from: {}", path.display());
                        return Ok(config.with_env_overrides(env_var_string));
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse config file {}: {}", path.display(), e);
                    }
                }
            }
        }

        Ok(Self::from_env())
    }

    /// Parse a TOML configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)?;
        toml::from_str(&config_str)
            .map_err(|e| CatalogError::InvalidConfig(format!("{}: {}", path.display(), e)))
    }

    /// Defaults with environment overrides applied
    pub fn from_env() -> Self {
        Self::default().with_env_overrides(env_var_string)
    }

    /// Apply `YOUTUBE_API_KEY` and `VIDEO_GUIDES_DATA_FILE` overrides
    pub fn with_env_overrides(mut self, env_lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(api_key) = env_lookup("YOUTUBE_API_KEY") {
            self.youtube.api_key = Some(api_key);
        }

        if let Some(data_file) = env_lookup("VIDEO_GUIDES_DATA_FILE") {
            self.catalog.data_file = PathBuf::from(data_file);
        }

        self
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let config_str = toml::to_string_pretty(self)
            .map_err(|e| CatalogError::InvalidConfig(e.to_string()))?;
        std::fs::write(path, config_str)?;
        tracing::info!("💾 Configuration saved to: {}", path.display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.catalog.supported_version.trim().is_empty() {
            return Err(CatalogError::InvalidConfig(
                "supported_version must not be empty".to_string(),
            ));
        }

        if self.catalog.all_label.trim().is_empty() {
            return Err(CatalogError::InvalidConfig(
                "all_label must not be empty".to_string(),
            ));
        }

        if self.youtube.request_timeout_seconds == 0 {
            return Err(CatalogError::InvalidConfig(
                "request_timeout_seconds must be greater than 0".to_string(),
            ));
        }

        if self.youtube.max_batch_size == 0 || self.youtube.max_batch_size > MAX_IDS_PER_REQUEST {
            return Err(CatalogError::InvalidConfig(format!(
                "max_batch_size must be between 1 and {}",
                MAX_IDS_PER_REQUEST
            )));
        }

        Ok(())
    }

    /// Get runtime configuration summary
    pub fn summary(&self) -> String {
        format!(
            "Video Guides Configuration:\n\
            - Data File: {}\n\
            - Supported Version: {}\n\
            - YouTube Enrichment: {}\n\
            - Batch Size: {}\n\
            - Fetch Timeout: {}s",
            self.catalog.data_file.display(),
            self.catalog.supported_version,
            if self.youtube.credential().is_some() { "enabled" } else { "disabled" },
            self.youtube.max_batch_size,
            self.youtube.fetch_timeout_seconds
        )
    }
}

fn env_var_string(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Configuration builder for programmatic config creation
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_data_file(mut self, path: PathBuf) -> Self {
        self.config.catalog.data_file = path;
        self
    }

    pub fn with_api_key(mut self, api_key: String) -> Self {
        self.config.youtube.api_key = Some(api_key);
        self
    }

    pub fn with_api_endpoint(mut self, endpoint: String) -> Self {
        self.config.youtube.api_endpoint = endpoint;
        self
    }

    pub fn with_fetch_timeout(mut self, seconds: u64) -> Self {
        self.config.youtube.fetch_timeout_seconds = seconds;
        self
    }

    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.config.youtube.max_batch_size = size;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.catalog.data_file, PathBuf::from("data/videos.json"));
        assert_eq!(config.catalog.supported_version, "1.0");
        assert_eq!(config.youtube.max_batch_size, 50);
        assert!(config.youtube.credential().is_none());
    }

    #[test]
    fn test_config_builder() {
        let config = ConfigBuilder::new()
            .with_data_file(PathBuf::from("/srv/videos.json"))
            .with_api_key("key".to_string())
            .with_batch_size(10)
            .build();

        assert_eq!(config.catalog.data_file, PathBuf::from("/srv/videos.json"));
        assert_eq!(config.youtube.credential(), Some("key"));
        assert_eq!(config.youtube.max_batch_size, 10);
    }

    #[test]
    fn test_blank_api_key_is_not_a_credential() {
        let config = ConfigBuilder::new().with_api_key("   ".to_string()).build();
        assert!(config.youtube.credential().is_none());
    }

    #[test]
    fn test_config_validation() {
        assert!(Config::default().validate().is_ok());
        assert!(ConfigBuilder::new().with_batch_size(0).build().validate().is_err());
        assert!(ConfigBuilder::new().with_batch_size(51).build().validate().is_err());

        let mut config = Config::default();
        config.catalog.all_label = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::default().with_env_overrides(|key| match key {
            "YOUTUBE_API_KEY" => Some("from-env".to_string()),
            "VIDEO_GUIDES_DATA_FILE" => Some("/tmp/v.json".to_string()),
            _ => None,
        });

        assert_eq!(config.youtube.credential(), Some("from-env"));
        assert_eq!(config.catalog.data_file, PathBuf::from("/tmp/v.json"));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("video-guides.toml");
        std::fs::write(&path, "[youtube]\nmax_batch_size = 20\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.youtube.max_batch_size, 20);
        assert_eq!(config.youtube.request_timeout_seconds, 30);
        assert_eq!(config.catalog.all_label, "All");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.toml");
        let config = ConfigBuilder::new().with_fetch_timeout(5).build();

        config.save(&path).unwrap();
        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded.youtube.fetch_timeout_seconds, 5);
    }
}
