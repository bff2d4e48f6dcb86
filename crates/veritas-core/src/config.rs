use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Result, VeritasError};

/// Top-level configuration for Veritas.
///
/// Loaded from `~/.veritas/config.toml` by default. Every section falls back
/// to its defaults when missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VeritasConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub remote: RemoteConfig,
}

impl VeritasConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: VeritasConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| VeritasError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Analysis matcher settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Number of leading characters of the input used as the match key.
    pub match_prefix_chars: usize,
    /// Fixed seed for the process random source. `None` seeds from the OS.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Placeholder link attached to synthesized records.
    pub learn_more_url: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            match_prefix_chars: 20,
            seed: None,
            learn_more_url: "https://factcheck.example.com/analysis-details".to_string(),
        }
    }
}

/// Conversation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Maximum accepted message length in characters.
    pub max_message_length: usize,
    /// How many characters of the analysed text the welcome message quotes.
    pub welcome_preview_chars: usize,
    /// Lower bound of the simulated reply latency.
    pub latency_min_ms: u64,
    /// Upper bound of the simulated reply latency.
    pub latency_max_ms: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            max_message_length: 2000,
            welcome_preview_chars: 50,
            latency_min_ms: 1000,
            latency_max_ms: 2500,
        }
    }
}

/// Remote generation service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Route replies through the remote service (with local fallback).
    pub enabled: bool,
    /// URL receiving the JSON POST.
    pub endpoint: String,
    /// Per-request timeout.
    pub timeout_ms: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: "http://localhost:8080/api/llm/chat".to_string(),
            timeout_ms: 10_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ---- Defaults ----

    #[test]
    fn test_default_config() {
        let config = VeritasConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.analysis.match_prefix_chars, 20);
        assert!(config.analysis.seed.is_none());
        assert_eq!(config.chat.max_message_length, 2000);
        assert_eq!(config.chat.welcome_preview_chars, 50);
        assert_eq!(config.chat.latency_min_ms, 1000);
        assert_eq!(config.chat.latency_max_ms, 2500);
        assert!(!config.remote.enabled);
        assert_eq!(config.remote.timeout_ms, 10_000);
    }

    // ---- Parsing ----

    #[test]
    fn test_partial_toml_fills_defaults() {
        let toml_str = r#"
[analysis]
seed = 99

[remote]
enabled = true
endpoint = "http://127.0.0.1:9000/chat"
"#;
        let config: VeritasConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.analysis.seed, Some(99));
        assert_eq!(config.analysis.match_prefix_chars, 20);
        assert!(config.remote.enabled);
        assert_eq!(config.remote.endpoint, "http://127.0.0.1:9000/chat");
        assert_eq!(config.remote.timeout_ms, 10_000);
        assert_eq!(config.chat.latency_max_ms, 2500);
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config: VeritasConfig = toml::from_str("").unwrap();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.chat.max_message_length, 2000);
    }

    // ---- File round trip ----

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = VeritasConfig::default();
        config.general.log_level = "debug".to_string();
        config.chat.latency_min_ms = 0;
        config.chat.latency_max_ms = 0;
        config.save(&path).unwrap();

        let loaded = VeritasConfig::load(&path).unwrap();
        assert_eq!(loaded.general.log_level, "debug");
        assert_eq!(loaded.chat.latency_max_ms, 0);
    }

    #[test]
    fn test_load_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = VeritasConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, VeritasError::Io(_)));
    }

    #[test]
    fn test_load_or_default_on_bad_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "chat = [[[").unwrap();
        let config = VeritasConfig::load_or_default(&path);
        assert_eq!(config.chat.max_message_length, 2000);
    }
}
