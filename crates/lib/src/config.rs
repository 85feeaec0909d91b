//! Configuration types and loading.
//!
//! Config is loaded from a JSON file (e.g. `~/.wcschat/config.json`) and environment.
//! Credentials can live in the environment instead of the file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level application config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Remote conversation service endpoint and credentials.
    #[serde(default)]
    pub service: ServiceConfig,

    /// Conversation session identity.
    #[serde(default)]
    pub session: SessionConfig,

    /// Desktop window settings.
    #[serde(default)]
    pub window: WindowConfig,

    /// Background worker settings.
    #[serde(default)]
    pub worker: WorkerConfig,
}

/// Conversation service endpoint, API version, and credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceConfig {
    /// Service base URL. Overridden by WCS_URL env.
    #[serde(default = "default_service_url")]
    pub url: String,

    /// API version date sent with every message.
    #[serde(default = "default_service_version")]
    pub version: String,

    /// Overridden by WCS_USERNAME env.
    pub username: Option<String>,

    /// Overridden by WCS_PASSWORD env.
    pub password: Option<String>,

    /// Overridden by WCS_WORKSPACE_ID env.
    pub workspace_id: Option<String>,

    /// HTTP request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    /// Fixed client id for the conversation. When unset a fresh one is generated per run.
    pub client_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowConfig {
    #[serde(default = "default_window_title")]
    pub title: String,

    #[serde(default = "default_window_width")]
    pub width: f32,

    #[serde(default = "default_window_height")]
    pub height: f32,

    /// "system", "light" or "dark". Unknown values fall back to the toolkit default.
    pub theme: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerConfig {
    /// Jobs that may wait behind the one in flight before submissions are refused.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

fn default_service_url() -> String {
    "https://gateway.watsonplatform.net/conversation/api".to_string()
}

fn default_service_version() -> String {
    "2017-05-26".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_window_title() -> String {
    "Chat with Watson".to_string()
}

fn default_window_width() -> f32 {
    640.0
}

fn default_window_height() -> f32 {
    480.0
}

fn default_queue_capacity() -> usize {
    16
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            url: default_service_url(),
            version: default_service_version(),
            username: None,
            password: None,
            workspace_id: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: default_window_title(),
            width: default_window_width(),
            height: default_window_height(),
            theme: None,
        }
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            queue_capacity: default_queue_capacity(),
        }
    }
}

/// Non-empty trimmed value of `var`, else the non-empty trimmed fallback.
fn env_or(var: &str, fallback: Option<&String>) -> Option<String> {
    std::env::var(var)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| {
            fallback
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        })
}

/// Resolve the service URL: env WCS_URL overrides config.
pub fn resolve_service_url(config: &Config) -> String {
    env_or("WCS_URL", Some(&config.service.url)).unwrap_or_else(default_service_url)
}

/// Resolve the service username: env WCS_USERNAME overrides config.
pub fn resolve_username(config: &Config) -> Option<String> {
    env_or("WCS_USERNAME", config.service.username.as_ref())
}

/// Resolve the service password: env WCS_PASSWORD overrides config.
pub fn resolve_password(config: &Config) -> Option<String> {
    env_or("WCS_PASSWORD", config.service.password.as_ref())
}

/// Resolve the workspace id: env WCS_WORKSPACE_ID overrides config.
pub fn resolve_workspace_id(config: &Config) -> Option<String> {
    env_or("WCS_WORKSPACE_ID", config.service.workspace_id.as_ref())
}

/// Resolve config path from env or default.
pub fn default_config_path() -> PathBuf {
    std::env::var("WCSCHAT_CONFIG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .map(|h| h.join(".wcschat").join("config.json"))
                .unwrap_or_else(|| PathBuf::from("config.json"))
        })
}

/// Load config from the default path (or WCSCHAT_CONFIG_PATH). Missing file => default config.
/// Returns the config and the path that was used.
pub fn load_config(path: Option<PathBuf>) -> Result<(Config, PathBuf)> {
    let path = path.unwrap_or_else(default_config_path);
    let config = if !path.exists() {
        log::debug!("config file not found, using defaults: {}", path.display());
        Config::default()
    } else {
        let s = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        serde_json::from_str(&s)
            .with_context(|| format!("parsing config from {}", path.display()))?
    };
    Ok((config, path))
}
