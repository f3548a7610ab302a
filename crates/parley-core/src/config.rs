use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{ParleyError, Result};

/// Top-level configuration for the Parley application.
///
/// Loaded from `~/.parley/config.toml` by default. Each section corresponds
/// to a bounded context or cross-cutting concern.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParleyConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub page: PageConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub voice: VoiceConfig,
}

impl ParleyConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ParleyConfig = toml::from_str(&content)?;
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
            toml::to_string_pretty(self).map_err(|e| ParleyError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Resolve the page title shown at the top of the chat surface.
    ///
    /// Priority: `PARLEY_PAGE_TITLE` env var > config value > default.
    /// The setting is required; an empty value everywhere is a startup error.
    pub fn resolve_page_title(&self) -> Result<String> {
        let fallback = if self.page.title.is_empty() {
            None
        } else {
            Some(self.page.title.as_str())
        };
        require_env("PARLEY_PAGE_TITLE", fallback)
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

/// Chat page presentation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Title shown above the chat transcript.
    pub title: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            title: "AI Agent".to_string(),
        }
    }
}

/// Remote streaming chat API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// SSE stream endpoint of the remote chat backend.
    pub url: String,
    /// Model name reported in the session and the greeting.
    pub model_name: String,
    /// Connection timeout in seconds.
    pub connect_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:8000/stream".to_string(),
            model_name: "gpt-4o-mini".to_string(),
            connect_timeout_secs: 10,
        }
    }
}

/// Voice input/output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    /// Whether voice capabilities (STT input, TTS playback) are enabled.
    pub enabled: bool,
    /// Expected sample rate of captured audio in Hz.
    pub sample_rate: u32,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            sample_rate: 16_000,
        }
    }
}

// =============================================================================
// Environment helpers
// =============================================================================

/// Read an environment variable, falling back to `default` if unset or empty.
pub fn env_or(name: &str, default: &str) -> String {
    match std::env::var(name) {
        Ok(val) if !val.trim().is_empty() => val,
        _ => default.to_string(),
    }
}

/// Read a required environment-style setting.
///
/// Returns the env var if set and non-empty, otherwise the provided default.
/// Fails with a configuration error when the variable is absent and no
/// default is given — required settings abort startup rather than limp along.
pub fn require_env(name: &str, default: Option<&str>) -> Result<String> {
    match std::env::var(name) {
        Ok(val) if !val.trim().is_empty() => Ok(val),
        _ => match default {
            Some(d) => Ok(d.to_string()),
            None => Err(ParleyError::Config(format!(
                "required setting {} is not set and has no default",
                name
            ))),
        },
    }
}

// =============================================================================
// Tests
// =============================================================================
