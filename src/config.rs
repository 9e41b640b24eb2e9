use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the music video finder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Collection storage settings
    pub storage: StorageConfig,

    /// External API settings
    pub api: ApiConfig,

    /// Artist enrichment settings
    pub enrichment: EnrichmentConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the collection data files
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// MusicBrainz API base URL
    pub musicbrainz_endpoint: String,

    /// TheAudioDB API base URL
    pub audiodb_endpoint: String,

    /// TheAudioDB fallback base URL, tried when the primary fails
    pub audiodb_alternate_endpoint: String,

    /// YouTube Data API base URL
    pub youtube_endpoint: String,

    /// YouTube Data API key, required for playlist extraction only
    pub youtube_api_key: Option<String>,

    /// User-Agent header sent to all services
    pub user_agent: String,

    /// Timeout for API requests (seconds)
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichmentConfig {
    /// Delay between consecutive TheAudioDB detail requests (milliseconds)
    pub request_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage: StorageConfig {
                data_dir: PathBuf::from("./data"),
            },
            api: ApiConfig {
                musicbrainz_endpoint: "https://musicbrainz.org/ws/2".to_string(),
                audiodb_endpoint: "https://www.theaudiodb.com/api/v1/json/2".to_string(),
                audiodb_alternate_endpoint: "https://theaudiodb.com/api/v1/json/2".to_string(),
                youtube_endpoint: "https://www.googleapis.com/youtube/v3".to_string(),
                youtube_api_key: None,
                user_agent: "MusicVideoFinder/1.0.0 (mvid-finder)".to_string(),
                request_timeout_secs: 30,
            },
            enrichment: EnrichmentConfig {
                request_delay_ms: 500,
            },
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load() -> Result<Self> {
        // Try to load from various locations
        let config_paths = [
            "mvid-finder.toml",
            "config/mvid-finder.toml",
            "~/.config/mvid-finder/config.toml",
            "/etc/mvid-finder/config.toml",
        ];

        for path in &config_paths {
            if let Ok(config_str) = std::fs::read_to_string(path) {
                match toml::from_str::<Config>(&config_str) {
                    Ok(mut config) => {
                        tracing::info!("📄 Loaded configuration from: {}", path);
                        config.apply_env_overrides();
                        return Ok(config);
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse config file {}: {}", path, e);
                    }
                }
            }
        }

        // Fall back to defaults plus environment overrides
        let mut config = Self::default();
        config.apply_env_overrides();
        Ok(config)
    }

    /// Override settings from environment variables
    fn apply_env_overrides(&mut self) {
        if let Ok(data_dir) = std::env::var("MVID_FINDER_DATA_DIR") {
            self.storage.data_dir = PathBuf::from(data_dir);
        }

        if let Ok(api_key) = std::env::var("MVID_FINDER_YOUTUBE_API_KEY") {
            self.api.youtube_api_key = Some(api_key);
        }

        if let Ok(timeout) = std::env::var("MVID_FINDER_REQUEST_TIMEOUT") {
            if let Ok(secs) = timeout.parse() {
                self.api.request_timeout_secs = secs;
            }
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &str) -> Result<()> {
        let config_str = toml::to_string_pretty(self)?;
        std::fs::write(path, config_str)?;
        tracing::info!("💾 Configuration saved to: {}", path);
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.api.request_timeout_secs == 0 {
            return Err(anyhow!("request_timeout_secs must be greater than 0"));
        }

        if self.api.user_agent.is_empty() {
            return Err(anyhow!("user_agent must not be empty"));
        }

        for (name, endpoint) in [
            ("musicbrainz_endpoint", &self.api.musicbrainz_endpoint),
            ("audiodb_endpoint", &self.api.audiodb_endpoint),
            (
                "audiodb_alternate_endpoint",
                &self.api.audiodb_alternate_endpoint,
            ),
            ("youtube_endpoint", &self.api.youtube_endpoint),
        ] {
            if !endpoint.starts_with("http") {
                return Err(anyhow!("{} must be an http(s) URL", name));
            }
        }

        Ok(())
    }
}
