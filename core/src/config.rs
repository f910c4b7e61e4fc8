use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;

const API_KEY_ENV: &str = "TMDB_API_KEY";
const PORT_ENV: &str = "PORT";

/// Proxy server configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub upstream: UpstreamConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default)]
    pub allow_lan_access: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            allow_lan_access: false,
        }
    }
}

impl ServerConfig {
    pub fn bind_host(&self) -> &str {
        if self.allow_lan_access {
            "0.0.0.0"
        } else {
            &self.host
        }
    }
}

/// Movie metadata API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// No fallback value: startup fails when this is missing.
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_language")]
    pub default_language: String,

    #[serde(default = "default_region")]
    pub default_region: String,

    /// Seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Outbound HTTP(S) proxy; connect directly when unset.
    #[serde(default)]
    pub proxy_url: Option<String>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            default_language: default_language(),
            default_region: default_region(),
            request_timeout: default_request_timeout(),
            proxy_url: None,
        }
    }
}

impl UpstreamConfig {
    /// Returns the configured key, rejecting a missing or blank one.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(ConfigError::MissingApiKey),
        }
    }
}

impl Config {
    /// Apply overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|name| std::env::var(name).ok());
    }

    /// Apply overrides using `lookup` to resolve variable names.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(API_KEY_ENV).filter(|v| !v.trim().is_empty()) {
            self.upstream.api_key = Some(key);
        }

        if let Some(raw) = lookup(PORT_ENV).filter(|v| !v.trim().is_empty()) {
            match raw.trim().parse::<u16>() {
                Ok(port) => self.server.port = port,
                Err(e) => tracing::warn!("Ignoring {}={:?}: {}", PORT_ENV, raw, e),
            }
        }
    }

    /// Check everything the server needs before it binds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.upstream.require_api_key()?;

        let base = self.upstream.base_url.trim();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(self.upstream.base_url.clone()));
        }

        if self.upstream.request_timeout == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        Ok(())
    }
}

// Default value functions
fn default_port() -> u16 { 5000 }
fn default_host() -> String { "127.0.0.1".to_string() }
fn default_base_url() -> String { "https://api.themoviedb.org/3".to_string() }
fn default_language() -> String { "pt-BR".to_string() }
fn default_region() -> String { "BR".to_string() }
fn default_request_timeout() -> u64 { 30 }

/// Get default config file path
/// Uses ~/.config/tmdb-proxy/config.toml for Unix-like CLI experience
pub fn default_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("tmdb-proxy")
        .join("config.toml")
}

/// Load config from file, or return defaults if not found.
///
/// Loading order:
/// 1. Specified path (if provided)
/// 2. ./config.toml (if exists)
/// 3. default_config_path() (usually ~/.config/tmdb-proxy/config.toml)
///
/// Environment overrides (`TMDB_API_KEY`, `PORT`) are applied on top.
pub fn load_config(path: Option<PathBuf>) -> anyhow::Result<Config> {
    let mut config = load_config_file(path)?;
    config.apply_env_overrides();
    Ok(config)
}

fn load_config_file(path: Option<PathBuf>) -> anyhow::Result<Config> {
    if let Some(config_path) = path {
        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content)?;
            tracing::info!("Loaded config from specified path {:?}", config_path);
            return Ok(config);
        } else {
            anyhow::bail!("Specified config file not found: {:?}", config_path);
        }
    }

    let local_config = PathBuf::from("config.toml");
    if local_config.exists() {
        match std::fs::read_to_string(&local_config) {
            Ok(content) => match toml::from_str::<Config>(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from current directory {:?}", local_config);
                    return Ok(config);
                }
                Err(e) => {
                    tracing::error!("Failed to parse ./config.toml: {}. Falling back to default path.", e);
                }
            },
            Err(e) => {
                tracing::error!("Failed to read ./config.toml: {}. Falling back to default path.", e);
            }
        }
    }

    let default_path = default_config_path();
    if default_path.exists() {
        let content = std::fs::read_to_string(&default_path)?;
        let config: Config = toml::from_str(&content)?;
        tracing::info!("Loaded config from default path {:?}", default_path);
        Ok(config)
    } else {
        tracing::info!("No config file found, using defaults");
        Ok(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn empty_file_yields_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.upstream.base_url, "https://api.themoviedb.org/3");
        assert_eq!(config.upstream.default_language, "pt-BR");
        assert_eq!(config.upstream.default_region, "BR");
        assert!(config.upstream.api_key.is_none());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config: Config = toml::from_str(
            r#"
            [server]
            port = 8080
            allow_lan_access = true

            [upstream]
            api_key = "abc"
            default_language = "en-US"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.bind_host(), "0.0.0.0");
        assert_eq!(config.upstream.api_key.as_deref(), Some("abc"));
        assert_eq!(config.upstream.default_language, "en-US");
        assert_eq!(config.upstream.default_region, "BR");
        assert_eq!(config.upstream.request_timeout, 30);
    }

    #[test]
    fn missing_api_key_fails_validation() {
        let config = Config::default();
        assert!(matches!(config.validate(), Err(ConfigError::MissingApiKey)));

        let mut blank = Config::default();
        blank.upstream.api_key = Some("   ".into());
        assert!(matches!(blank.validate(), Err(ConfigError::MissingApiKey)));
    }

    #[test]
    fn bad_base_url_fails_validation() {
        let mut config = Config::default();
        config.upstream.api_key = Some("k".into());
        config.upstream.base_url = "api.themoviedb.org/3".into();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidBaseUrl(_))));
    }

    #[test]
    fn zero_timeout_fails_validation() {
        let config: Config = toml::from_str(
            r#"
            [upstream]
            api_key = "k"
            request_timeout = 0
            "#,
        )
        .unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::ZeroTimeout)));

        let mut one = config.clone();
        one.upstream.request_timeout = 1;
        assert!(one.validate().is_ok());
    }

    #[test]
    fn env_overrides_win_over_file() {
        let env: HashMap<&str, &str> = [("TMDB_API_KEY", "from-env"), ("PORT", "9090")].into();
        let mut config = Config::default();
        config.upstream.api_key = Some("from-file".into());

        config.apply_overrides_from(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(config.upstream.api_key.as_deref(), Some("from-env"));
        assert_eq!(config.server.port, 9090);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn unparseable_port_and_blank_key_are_ignored() {
        let env: HashMap<&str, &str> = [("TMDB_API_KEY", ""), ("PORT", "not-a-port")].into();
        let mut config = Config::default();

        config.apply_overrides_from(|name| env.get(name).map(|v| v.to_string()));

        assert!(config.upstream.api_key.is_none());
        assert_eq!(config.server.port, 5000);
    }
}
