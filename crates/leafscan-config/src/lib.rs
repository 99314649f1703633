use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON5 parse error: {0}")]
    Json5(#[from] json5::Error),
    #[error("Config directory not found")]
    NoDirFound,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Allowed CORS origins; "*" allows any.
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

fn default_port() -> u16 {
    8000
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            cors_origins: default_cors_origins(),
        }
    }
}

/// Vision-model (classification) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisionConfig {
    /// Model ID sent to the generative API.
    #[serde(default = "default_vision_model")]
    pub model: String,
    /// API key. Falls back to the GOOGLE_API_KEY environment variable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

fn default_vision_model() -> String {
    "gemini-2.5-pro".to_string()
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            model: default_vision_model(),
            api_key: None,
        }
    }
}

impl VisionConfig {
    /// Resolve the API key from config or environment.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("GOOGLE_API_KEY").ok())
    }
}

/// Speech-synthesis configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// Maximum number of synthesized clips kept in memory.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

fn default_cache_capacity() -> usize {
    50
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            cache_capacity: default_cache_capacity(),
        }
    }
}

/// Top-level leafscan configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeafscanConfig {
    /// HTTP server config.
    #[serde(default)]
    pub server: ServerConfig,
    /// Vision-model config.
    #[serde(default)]
    pub vision: VisionConfig,
    /// Speech-synthesis config.
    #[serde(default)]
    pub speech: SpeechConfig,
    /// SQLite database path. Defaults to leafscan.db in the config dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_path: Option<PathBuf>,
}

/// Resolve the leafscan config directory (~/.leafscan/).
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    dirs::home_dir()
        .map(|h| h.join(".leafscan"))
        .ok_or(ConfigError::NoDirFound)
}

/// Resolve the config file path (~/.leafscan/config.json5).
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.json5"))
}

/// Load configuration from the default path, falling back to defaults.
pub fn load_config() -> Result<LeafscanConfig, ConfigError> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    let path = config_file_path()?;
    load_config_from(&path)
}

/// Load configuration from a specific path, falling back to defaults if not found.
pub fn load_config_from(path: &Path) -> Result<LeafscanConfig, ConfigError> {
    if !path.exists() {
        tracing::debug!("Config file not found at {}, using defaults", path.display());
        return Ok(LeafscanConfig::default());
    }

    let content = std::fs::read_to_string(path)?;
    let config: LeafscanConfig = json5::from_str(&content)?;
    Ok(config)
}

/// Ensure the config directory exists.
pub fn ensure_config_dir() -> Result<PathBuf, ConfigError> {
    let dir = config_dir()?;
    if !dir.exists() {
        std::fs::create_dir_all(&dir)?;
    }
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LeafscanConfig::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.vision.model, "gemini-2.5-pro");
        assert_eq!(config.speech.cache_capacity, 50);
        assert!(config.db_path.is_none());
    }

    #[test]
    fn test_json5_parse() {
        let json5_str = r#"{
            server: { port: 9090, cors_origins: ["https://app.example.com"] },
            vision: { model: "gemini-2.0-flash" },
            speech: { cache_capacity: 10 },
        }"#;
        let config: LeafscanConfig = json5::from_str(json5_str).unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.cors_origins, vec!["https://app.example.com"]);
        assert_eq!(config.vision.model, "gemini-2.0-flash");
        assert_eq!(config.speech.cache_capacity, 10);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: LeafscanConfig = json5::from_str(r#"{ server: { port: 3000 } }"#).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.speech.cache_capacity, 50);
    }

    #[test]
    fn test_api_key_from_config() {
        let config = VisionConfig {
            model: "gemini-2.5-pro".into(),
            api_key: Some("key-from-file".into()),
        };
        assert_eq!(config.resolve_api_key(), Some("key-from-file".into()));
    }
}
