//! CLI argument definitions for the Parley application.
//!
//! Uses `clap` with derive macros for ergonomic argument parsing.
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::PathBuf;
use uuid::Uuid;

/// Parley — a voice-enabled streaming chat client.
#[derive(Parser, Debug)]
#[command(name = "parley", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Stream endpoint URL of the remote chat backend.
    #[arg(long = "api-url")]
    pub api_url: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// Enable voice capabilities (spoken replies, /voice input).
    #[arg(long = "voice")]
    pub voice: bool,

    /// Stable user identifier; generated fresh when absent.
    #[arg(long = "user-id")]
    pub user_id: Option<Uuid>,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > PARLEY_CONFIG env var > ~/.parley/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("PARLEY_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the stream endpoint URL.
    ///
    /// Priority: --api-url flag > PARLEY_API_URL env var > config file value.
    pub fn resolve_api_url(&self, config_url: &str) -> String {
        if let Some(ref url) = self.api_url {
            return url.clone();
        }
        if let Ok(url) = std::env::var("PARLEY_API_URL") {
            if !url.trim().is_empty() {
                return url;
            }
        }
        config_url.to_string()
    }

    /// Resolve the log level.
    ///
    /// Priority: --log-level flag > config file value.
    /// Returns `None` if not overridden.
    pub fn resolve_log_level(&self) -> Option<String> {
        self.log_level.clone()
    }

    /// Resolve the user identifier.
    ///
    /// Priority: --user-id flag > PARLEY_USER_ID env var > freshly generated.
    pub fn resolve_user_id(&self) -> Uuid {
        if let Some(id) = self.user_id {
            return id;
        }
        if let Ok(val) = std::env::var("PARLEY_USER_ID") {
            if let Ok(id) = val.parse::<Uuid>() {
                return id;
            }
        }
        Uuid::new_v4()
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".parley").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".parley").join("config.toml");
    }
    PathBuf::from("config.toml")
}
