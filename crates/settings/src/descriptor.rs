//! One descriptor per setting: description, constraint text, coercion,
//! validity and UI mapping live together so they cannot drift apart.

use chatset_core::settings::{SettingId, SettingValue, hex_color_digits};
use chatset_core::ui::UiComponent;
use std::sync::LazyLock;
use crate::palette::NamedColor;

/// Static record describing how one setting accepts values.
pub struct SettingDescriptor {
    pub id: SettingId,
    /// What the setting does, phrased to follow "which ..."
    pub description: &'static str,
    /// Human-readable value constraints, quoted in corrective messages
    pub constraints: String,
    /// Component shown when a change is requested without a value
    pub ui: Option<UiComponent>,
    coerce: fn(&str) -> Option<SettingValue>,
    valid: fn(&SettingValue) -> bool,
}

impl SettingDescriptor {
    /// Turn raw model-supplied text into a typed candidate.
    pub fn coerce(&self, raw: &str) -> Option<SettingValue> {
        (self.coerce)(raw)
    }

    /// Whether a candidate lies in this setting's domain.
    pub fn is_valid(&self, value: &SettingValue) -> bool {
        (self.valid)(value)
    }

    /// `* id: description - constraints`
    pub fn catalogue_line(&self) -> String {
        format!("* {}: {} - {}", self.id, self.description, self.constraints)
    }
}

pub const FONT_SIZE_RANGE: std::ops::RangeInclusive<i64> = 8..=72;
pub const OPACITY_RANGE: std::ops::RangeInclusive<f64> = 0.0..=1.0;

static DESCRIPTORS: LazyLock<Vec<SettingDescriptor>> = LazyLock::new(|| {
    vec![
        SettingDescriptor {
            id: SettingId::BackgroundColor,
            description: "changes the background color of the app",
            constraints: format!(
                "Available colors: {}, or a custom hex color such as #1E90FF",
                NamedColor::catalogue()
            ),
            ui: Some(UiComponent::ColorPicker),
            coerce: coerce_color,
            valid: |value| match value {
                SettingValue::NamedColor(name) => name.parse::<NamedColor>().is_ok(),
                SettingValue::CustomColor(hex) => is_valid_hex_color(hex),
                _ => false,
            },
        },
        SettingDescriptor {
            id: SettingId::DarkMode,
            description: "toggles dark mode on or off",
            constraints: "Values: true or false".into(),
            ui: None,
            coerce: |raw| match raw.trim().to_lowercase().as_str() {
                "true" => Some(SettingValue::Boolean(true)),
                "false" => Some(SettingValue::Boolean(false)),
                _ => None,
            },
            valid: |value| matches!(value, SettingValue::Boolean(_)),
        },
        SettingDescriptor {
            id: SettingId::FontSize,
            description: "adjusts the font size",
            constraints: format!(
                "Range: {} to {} points",
                FONT_SIZE_RANGE.start(),
                FONT_SIZE_RANGE.end()
            ),
            ui: Some(UiComponent::FontSizeSlider),
            coerce: |raw| raw.trim().parse::<i64>().ok().map(SettingValue::Integer),
            valid: |value| matches!(value, SettingValue::Integer(v) if FONT_SIZE_RANGE.contains(v)),
        },
        SettingDescriptor {
            id: SettingId::Opacity,
            description: "sets the app opacity",
            constraints: "Range: 0.0 to 1.0".into(),
            ui: Some(UiComponent::OpacitySlider),
            coerce: |raw| raw.trim().parse::<f64>().ok().map(SettingValue::Decimal),
            valid: |value| matches!(value, SettingValue::Decimal(v) if OPACITY_RANGE.contains(v)),
        },
        SettingDescriptor {
            id: SettingId::Username,
            description: "sets the user's display name",
            constraints: "Any text string".into(),
            ui: None,
            coerce: |raw| Some(SettingValue::Text(raw.to_string())),
            valid: |value| matches!(value, SettingValue::Text(_)),
        },
        SettingDescriptor {
            id: SettingId::ProfilePhoto,
            description: "changes the user's profile photo",
            constraints: "An uploaded image; call without a value to show the photo uploader".into(),
            ui: Some(UiComponent::UploadPhotos),
            coerce: |_| None,
            valid: |_| false,
        },
    ]
});

/// The descriptor for `id`. The table is laid out in declaration order.
pub fn descriptor(id: SettingId) -> &'static SettingDescriptor {
    &DESCRIPTORS[id as usize]
}

/// Every descriptor, in `SettingId::ALL` order.
pub fn descriptors() -> &'static [SettingDescriptor] {
    &DESCRIPTORS
}

/// One catalogue line per setting, newline separated.
pub fn catalogue() -> String {
    descriptors()
        .iter()
        .map(SettingDescriptor::catalogue_line)
        .collect::<Vec<_>>()
        .join("\n")
}

fn coerce_color(raw: &str) -> Option<SettingValue> {
    let trimmed = raw.trim();
    if let Ok(color) = trimmed.parse::<NamedColor>() {
        return Some(SettingValue::NamedColor(color.name().to_string()));
    }
    if trimmed.starts_with('#') || trimmed.chars().count() == 6 {
        return Some(SettingValue::CustomColor(trimmed.to_string()));
    }
    None
}

/// 6 or 8 hex digits after one optional leading `#`.
pub fn is_valid_hex_color(hex: &str) -> bool {
    hex_color_digits(hex).is_some()
}

/// Upper-case `#RRGGBB` / `#AARRGGBB`, or `None` if `hex` is not a valid color.
pub fn normalize_hex(hex: &str) -> Option<String> {
    hex_color_digits(hex).map(|digits| format!("#{}", digits.to_uppercase()))
}
