//! Configuration loading, validation, and management for chatset.
//!
//! Loads configuration from `~/.chatset/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use chatset_core::settings::AppSettings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.chatset/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key for the completion backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Model name passed to the backend
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Max tokens per backend response
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Completion backend
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Orchestrator behaviour
    #[serde(default)]
    pub assistant: AssistantConfig,

    /// Initial settings snapshot
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Photo storage
    #[serde(default)]
    pub photos: PhotoConfig,
}

fn default_model() -> String {
    "gpt-4o-mini".into()
}
fn default_temperature() -> f32 {
    0.2
}
fn default_max_tokens() -> u32 {
    1024
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("assistant", &self.assistant)
            .field("defaults", &self.defaults)
            .field("photos", &self.photos)
            .finish()
    }
}

/// Which OpenAI-compatible endpoint to talk to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_provider_name")]
    pub name: String,

    #[serde(default = "default_api_url")]
    pub api_url: String,
}

fn default_provider_name() -> String {
    "openai".into()
}
fn default_api_url() -> String {
    "https://api.openai.com/v1".into()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: default_provider_name(),
            api_url: default_api_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Backend round trips allowed per user message
    #[serde(default = "default_max_tool_iterations")]
    pub max_tool_iterations: u32,

    /// Transcript entries carried into a rebuilt session
    #[serde(default = "default_recent_context_entries")]
    pub recent_context_entries: usize,

    /// Local capacity limit, in estimated tokens. Unset means only the
    /// backend decides when the context is full.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_window_tokens: Option<usize>,

    /// Refuse further tool calls in a turn once a UI component was shown
    #[serde(default = "default_true")]
    pub one_handoff_per_turn: bool,
}

fn default_max_tool_iterations() -> u32 {
    8
}
fn default_recent_context_entries() -> usize {
    3
}
fn default_true() -> bool {
    true
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            max_tool_iterations: default_max_tool_iterations(),
            recent_context_entries: default_recent_context_entries(),
            context_window_tokens: None,
            one_handoff_per_turn: true,
        }
    }
}

/// Settings the store starts with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_background_color")]
    pub background_color: String,

    #[serde(default)]
    pub dark_mode: bool,

    #[serde(default = "default_font_size")]
    pub font_size: i64,

    #[serde(default = "default_opacity")]
    pub opacity: f64,

    #[serde(default = "default_username")]
    pub username: String,
}

fn default_background_color() -> String {
    AppSettings::default().background_color
}
fn default_font_size() -> i64 {
    AppSettings::default().font_size
}
fn default_opacity() -> f64 {
    AppSettings::default().opacity
}
fn default_username() -> String {
    AppSettings::default().username
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            background_color: default_background_color(),
            dark_mode: false,
            font_size: default_font_size(),
            opacity: default_opacity(),
            username: default_username(),
        }
    }
}

impl DefaultsConfig {
    /// The initial snapshot described by this section.
    pub fn to_settings(&self) -> AppSettings {
        AppSettings {
            background_color: self.background_color.clone(),
            dark_mode: self.dark_mode,
            font_size: self.font_size,
            opacity: self.opacity,
            username: self.username.clone(),
            profile_photo: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PhotoConfig {
    /// Directory for uploaded profile photos (default: `~/.chatset/photos`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from the default path (~/.chatset/config.toml).
    ///
    /// Environment overrides:
    /// - `CHATSET_API_KEY`, then `OPENAI_API_KEY` (only if the file sets none)
    /// - `CHATSET_API_URL`
    /// - `CHATSET_MODEL`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();
        let mut config = Self::load_from(&config_path)?;

        if config.api_key.is_none() {
            config.api_key = std::env::var("CHATSET_API_KEY")
                .ok()
                .or_else(|| std::env::var("OPENAI_API_KEY").ok());
        }

        if let Ok(url) = std::env::var("CHATSET_API_URL") {
            config.provider.api_url = url;
        }

        if let Ok(model) = std::env::var("CHATSET_MODEL") {
            config.model = model;
        }

        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".chatset")
    }

    /// Get the configuration file path.
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Directory used by the file-backed photo store.
    pub fn photo_dir(&self) -> PathBuf {
        self.photos
            .dir
            .clone()
            .unwrap_or_else(|| Self::config_dir().join("photos"))
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::ValidationError(
                "temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.assistant.max_tool_iterations == 0 {
            return Err(ConfigError::ValidationError(
                "assistant.max_tool_iterations must be > 0".into(),
            ));
        }

        if self.assistant.recent_context_entries == 0 {
            return Err(ConfigError::ValidationError(
                "assistant.recent_context_entries must be > 0".into(),
            ));
        }

        if !(8..=72).contains(&self.defaults.font_size) {
            return Err(ConfigError::ValidationError(
                "defaults.font_size must be between 8 and 72".into(),
            ));
        }

        if !(0.0..=1.0).contains(&self.defaults.opacity) {
            return Err(ConfigError::ValidationError(
                "defaults.opacity must be between 0.0 and 1.0".into(),
            ));
        }

        if chatset_core::settings::hex_color_digits(&self.defaults.background_color).is_none() {
            return Err(ConfigError::ValidationError(
                "defaults.background_color must be #RRGGBB or #AARRGGBB".into(),
            ));
        }

        Ok(())
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Generate a default config TOML string (for the `init` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            provider: ProviderConfig::default(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            assistant: AssistantConfig::default(),
            defaults: DefaultsConfig::default(),
            photos: PhotoConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
