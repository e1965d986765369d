use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::ingest::DEFAULT_KEYWORDS;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_page_limit")]
    pub page_limit: usize,
    /// Upper bound on pages fetched in one update
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,
    #[serde(default = "default_keywords")]
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_snapshot")]
    pub snapshot: PathBuf,
    /// Static files served under `/images`, laid out as `images/...`
    #[serde(default = "default_assets")]
    pub assets: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Seconds between snapshot reloads; 0 turns auto-refresh off
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
    #[serde(default = "default_highlight_reset_secs")]
    pub highlight_reset_secs: u64,
    #[serde(default = "default_thinking_delay_ms")]
    pub thinking_delay_ms: u64,
}

fn default_base_url() -> String {
    "https://166ws8jk15.execute-api.us-east-1.amazonaws.com/prod".to_string()
}

fn default_page_limit() -> usize {
    100
}

fn default_max_pages() -> usize {
    100
}

fn default_keywords() -> Vec<String> {
    DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect()
}

fn default_snapshot() -> PathBuf {
    PathBuf::from("data/gilligan-universe.json")
}

fn default_assets() -> PathBuf {
    PathBuf::from("data/assets")
}

fn default_port() -> u16 {
    8080
}

fn default_refresh_interval_secs() -> u64 {
    8 * 60 * 60
}

fn default_highlight_reset_secs() -> u64 {
    8
}

fn default_thinking_delay_ms() -> u64 {
    500
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            page_limit: default_page_limit(),
            max_pages: default_max_pages(),
            keywords: default_keywords(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            snapshot: default_snapshot(),
            assets: default_assets(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            refresh_interval_secs: default_refresh_interval_secs(),
            highlight_reset_secs: default_highlight_reset_secs(),
            thinking_delay_ms: default_thinking_delay_ms(),
        }
    }
}

impl ServerConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn highlight_reset(&self) -> Duration {
        Duration::from_secs(self.highlight_reset_secs)
    }

    pub fn thinking_delay(&self) -> Duration {
        Duration::from_millis(self.thinking_delay_ms)
    }
}

impl Config {
    /// Get the configuration directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("gilligan-universe");
        Ok(config_dir)
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from file, falling back to defaults when none exists
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            tracing::debug!(
                "No configuration at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file at {}", config_path.display()))?;

        config.expand_env_vars();

        Ok(config)
    }

    /// Expand environment variables in configuration values
    fn expand_env_vars(&mut self) {
        self.api.base_url = expand_env_var(&self.api.base_url);
    }
}

/// Expand environment variable references like ${VAR_NAME}
fn expand_env_var(value: &str) -> String {
    if value.starts_with("${") && value.ends_with('}') {
        let var_name = &value[2..value.len() - 1];
        std::env::var(var_name).unwrap_or_default()
    } else if let Some(var_name) = value.strip_prefix('$') {
        std::env::var(var_name).unwrap_or_default()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_env_var_braces() {
        // SAFETY: test is single-threaded
        unsafe { std::env::set_var("GU_TEST_VAR_A", "http://api.local") };
        assert_eq!(expand_env_var("${GU_TEST_VAR_A}"), "http://api.local");
        unsafe { std::env::remove_var("GU_TEST_VAR_A") };
    }

    #[test]
    fn test_expand_env_var_literal() {
        assert_eq!(expand_env_var("https://example.com"), "https://example.com");
    }

    #[test]
    fn test_expand_env_var_missing_returns_empty() {
        assert_eq!(expand_env_var("${DEFINITELY_NOT_SET_XYZ_123}"), "");
    }

    #[test]
    fn test_config_from_toml() {
        let toml_str = r#"
            [api]
            base_url = "http://localhost:9000"
            page_limit = 50
            max_pages = 3
            keywords = ["pluribus"]

            [data]
            snapshot = "/tmp/graph.json"

            [server]
            port = 3000
            refresh_interval_secs = 0
            highlight_reset_secs = 2
        "#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:9000");
        assert_eq!(config.api.page_limit, 50);
        assert_eq!(config.api.max_pages, 3);
        assert_eq!(config.api.keywords, vec!["pluribus".to_string()]);
        assert_eq!(config.data.snapshot, PathBuf::from("/tmp/graph.json"));
        assert_eq!(config.server.port, 3000);
        assert!(config.server.refresh_interval().is_zero());
        assert_eq!(config.server.highlight_reset(), Duration::from_secs(2));
        assert_eq!(config.server.thinking_delay(), Duration::from_millis(500));
    }

    #[test]
    fn test_config_default_values() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.api.page_limit, 100);
        assert_eq!(config.api.max_pages, 100);
        assert_eq!(config.api.keywords.len(), DEFAULT_KEYWORDS.len());
        assert_eq!(
            config.data.snapshot,
            PathBuf::from("data/gilligan-universe.json")
        );
        assert_eq!(config.data.assets, PathBuf::from("data/assets"));
        assert_eq!(config.server.refresh_interval(), Duration::from_secs(28_800));
        assert_eq!(config.server.highlight_reset(), Duration::from_secs(8));
    }

    #[test]
    fn test_config_roundtrip_toml() {
        let mut config = Config::default();
        config.server.port = 9999;
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(deserialized.server.port, 9999);
        assert_eq!(deserialized.api.base_url, config.api.base_url);
    }
}
