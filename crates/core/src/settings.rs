//! Setting identifiers, typed values, and the settings store capabilities.
//!
//! The identifier set is closed. Per-setting behaviour (description,
//! constraints, validity, UI mapping) lives in a single descriptor table in
//! `chatset-settings`, never in ad hoc matches spread across crates.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use crate::error::SettingsError;
use crate::photo::PhotoHandle;

/// A user-changeable application setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SettingId {
    BackgroundColor,
    DarkMode,
    FontSize,
    Opacity,
    Username,
    ProfilePhoto,
}

impl SettingId {
    pub const ALL: [SettingId; 6] = [
        SettingId::BackgroundColor,
        SettingId::DarkMode,
        SettingId::FontSize,
        SettingId::Opacity,
        SettingId::Username,
        SettingId::ProfilePhoto,
    ];

    /// Wire name, as used in tool schemas.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BackgroundColor => "backgroundColor",
            Self::DarkMode => "darkMode",
            Self::FontSize => "fontSize",
            Self::Opacity => "opacity",
            Self::Username => "username",
            Self::ProfilePhoto => "profilePhoto",
        }
    }
}

impl fmt::Display for SettingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no known setting.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown setting: {0}")]
pub struct UnknownSetting(pub String);

impl FromStr for SettingId {
    type Err = UnknownSetting;

    /// Accepts the wire name as well as snake_case, kebab-case and
    /// space-separated spellings, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .flat_map(char::to_lowercase)
            .collect();
        SettingId::ALL
            .into_iter()
            .find(|id| id.as_str().to_lowercase() == folded)
            .ok_or_else(|| UnknownSetting(s.to_string()))
    }
}

/// A typed candidate value. Carries no setting identifier; validity is
/// judged by pairing it with one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum SettingValue {
    NamedColor(String),
    CustomColor(String),
    Boolean(bool),
    Integer(i64),
    Decimal(f64),
    Text(String),
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NamedColor(name) => write!(f, "Color: {name}"),
            Self::CustomColor(hex) => write!(f, "Custom Color: {hex}"),
            Self::Boolean(value) => write!(f, "Boolean: {value}"),
            Self::Integer(value) => write!(f, "Number: {value}"),
            Self::Decimal(value) => write!(f, "Decimal: {value}"),
            Self::Text(value) => write!(f, "Text: {value}"),
        }
    }
}

/// One validated change, handed to the mutator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingChange {
    pub setting: SettingId,
    pub value: SettingValue,
}

/// Read-only snapshot of the current settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    /// `#RRGGBB` or `#AARRGGBB`
    pub background_color: String,
    pub dark_mode: bool,
    pub font_size: i64,
    pub opacity: f64,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_photo: Option<PhotoHandle>,
}

impl AppSettings {
    pub fn has_profile_photo(&self) -> bool {
        self.profile_photo.is_some()
    }
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            background_color: "#FF2D55".into(),
            dark_mode: false,
            font_size: 16,
            opacity: 1.0,
            username: "User".into(),
            profile_photo: None,
        }
    }
}

/// The digits of a `#RRGGBB` / `#AARRGGBB` color, without the optional
/// leading `#`. `None` unless there are exactly 6 or 8 hex digits.
pub fn hex_color_digits(hex: &str) -> Option<&str> {
    let trimmed = hex.trim();
    let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
    (matches!(digits.len(), 6 | 8) && digits.chars().all(|c| c.is_ascii_hexdigit())).then_some(digits)
}

/// Read access to the settings store.
#[async_trait]
pub trait SettingsAccessor: Send + Sync {
    async fn current(&self) -> AppSettings;
}

/// Write access to the settings store. Receives only validated changes.
#[async_trait]
pub trait SettingsMutator: Send + Sync {
    async fn apply(&self, change: &SettingChange) -> Result<(), SettingsError>;
}
