//! Setting value validation.
//!
//! Two steps: coercion (raw text → typed candidate) and validity (candidate
//! within the setting's domain). Failures are ordinary data; callers turn
//! them into corrective guidance for the model.

use chatset_core::settings::{SettingId, SettingValue};
use crate::descriptor::descriptor;

/// Why a raw value was not accepted.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationFailure {
    #[error("{raw:?} cannot be read as a value for {setting}")]
    NotCoercible { setting: SettingId, raw: String },

    #[error("{value} is outside the allowed values for {setting}")]
    OutOfDomain { setting: SettingId, value: SettingValue },
}

impl ValidationFailure {
    pub fn setting(&self) -> SettingId {
        match self {
            Self::NotCoercible { setting, .. } | Self::OutOfDomain { setting, .. } => *setting,
        }
    }

    /// Guidance naming the violated constraint.
    pub fn corrective_message(&self) -> String {
        let setting = self.setting();
        let constraints = &descriptor(setting).constraints;
        match self {
            Self::NotCoercible { raw, .. } => {
                format!("Invalid value for {setting}: {raw:?} is not a recognised value. {constraints}")
            }
            Self::OutOfDomain { value, .. } => {
                format!("Invalid value for {setting}: {value}. {constraints}")
            }
        }
    }
}

/// Convert raw text into a typed candidate for `setting`.
pub fn coerce(setting: SettingId, raw: &str) -> Result<SettingValue, ValidationFailure> {
    descriptor(setting)
        .coerce(raw)
        .ok_or_else(|| ValidationFailure::NotCoercible {
            setting,
            raw: raw.to_string(),
        })
}

/// Whether `value` is acceptable for `setting`.
pub fn is_valid(setting: SettingId, value: &SettingValue) -> bool {
    descriptor(setting).is_valid(value)
}

/// Coerce and check validity in one step.
pub fn validate(setting: SettingId, raw: &str) -> Result<SettingValue, ValidationFailure> {
    let value = coerce(setting, raw)?;
    if is_valid(setting, &value) {
        Ok(value)
    } else {
        Err(ValidationFailure::OutOfDomain { setting, value })
    }
}
