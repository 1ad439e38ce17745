//! The tools the settings assistant may call.
//!
//! Two tools are registered with every session:
//! - [`GetCurrentSettingsTool`] reads one setting from the snapshot.
//! - [`ChangeSettingTool`] validates and applies a change, or hands the
//!   change off to an interactive component when no value is given.
//!
//! Both answer with text only; rejected input is reported in the output so
//! the model can correct itself.

pub mod change_setting;
pub mod get_current_settings;
pub mod handoff;

#[cfg(test)]
mod test_support;

use chatset_core::event::EventBus;
use chatset_core::settings::{SettingId, SettingsAccessor, SettingsMutator};
use chatset_core::tool::ToolRegistry;
use chatset_core::ui::UiDisplay;
use std::sync::Arc;

pub use change_setting::ChangeSettingTool;
pub use get_current_settings::GetCurrentSettingsTool;
pub use handoff::{Handoff, UiHandoff};

pub const QUERY_TOOL_NAME: &str = "get_current_settings";
pub const CHANGE_TOOL_NAME: &str = "change_setting";

/// Key in [`chatset_core::tool::ToolResult::data`] naming the component a
/// call displayed.
pub const UI_SHOWN_KEY: &str = "ui_shown";

/// Build the registry holding both settings tools.
pub fn default_registry(
    accessor: Arc<dyn SettingsAccessor>,
    mutator: Arc<dyn SettingsMutator>,
    display: Arc<dyn UiDisplay>,
    event_bus: Arc<EventBus>,
) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(GetCurrentSettingsTool::new(accessor)));
    let handoff = UiHandoff::new(display, event_bus.clone());
    registry.register(Box::new(ChangeSettingTool::new(mutator, handoff, event_bus)));
    registry
}

/// JSON Schema for the `setting` argument shared by both tools.
pub(crate) fn setting_schema(description: &str) -> serde_json::Value {
    let names: Vec<&str> = SettingId::ALL.iter().map(|s| s.as_str()).collect();
    serde_json::json!({
        "type": "string",
        "enum": names,
        "description": description
    })
}

/// Rejection text for a `setting` argument that names no known setting.
pub(crate) fn unknown_setting(raw: &str) -> String {
    let names: Vec<&str> = SettingId::ALL.iter().map(|s| s.as_str()).collect();
    format!("Unknown setting '{raw}'. Available settings: {}", names.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{RecordingDisplay, RecordingMutator};
    use chatset_settings::InMemorySettingsStore;

    #[test]
    fn registry_holds_both_tools() {
        let store = Arc::new(InMemorySettingsStore::default());
        let registry = default_registry(
            store,
            Arc::new(RecordingMutator::default()),
            Arc::new(RecordingDisplay::succeeding()),
            Arc::new(EventBus::default()),
        );
        assert_eq!(registry.names(), vec![CHANGE_TOOL_NAME, QUERY_TOOL_NAME]);
    }

    #[test]
    fn setting_schema_lists_every_setting() {
        let schema = setting_schema("which setting");
        let values = schema["enum"].as_array().unwrap();
        assert_eq!(values.len(), SettingId::ALL.len());
        assert!(values.iter().any(|v| v == "profilePhoto"));
    }
}
