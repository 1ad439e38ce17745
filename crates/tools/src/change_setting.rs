//! Change tool: applies a validated value or hands the change off to the UI.
//!
//! With a value, the value is coerced and validated against the setting's
//! descriptor. Only a valid value reaches the mutator, exactly once. Without
//! a value, [`UiHandoff`] decides the response.

use async_trait::async_trait;
use chatset_core::error::ToolError;
use chatset_core::event::{DomainEvent, EventBus};
use chatset_core::settings::{SettingChange, SettingId, SettingsMutator};
use chatset_core::tool::{Tool, ToolResult};
use chatset_settings::{catalogue, validate};
use std::sync::Arc;
use tracing::{info, warn};
use crate::handoff::UiHandoff;
use crate::{CHANGE_TOOL_NAME, UI_SHOWN_KEY, setting_schema, unknown_setting};

pub struct ChangeSettingTool {
    mutator: Arc<dyn SettingsMutator>,
    handoff: UiHandoff,
    event_bus: Arc<EventBus>,
    description: String,
}

impl ChangeSettingTool {
    pub fn new(mutator: Arc<dyn SettingsMutator>, handoff: UiHandoff, event_bus: Arc<EventBus>) -> Self {
        let description = format!(
            "Helps the user modify app settings. Pass a value to change the setting directly; \
             omit the value to show an interactive component for the setting where one exists.\n\n\
             Settings:\n{}",
            catalogue()
        );
        Self {
            mutator,
            handoff,
            event_bus,
            description,
        }
    }

    async fn hand_off(&self, setting: SettingId) -> ToolResult {
        let handoff = self.handoff.request_ui_for(setting).await;
        let result = ToolResult::ok(handoff.output);
        match handoff.shown {
            Some(component) => result.with_data(serde_json::json!({ UI_SHOWN_KEY: component })),
            None => result,
        }
    }

    async fn change(&self, setting: SettingId, raw: &str) -> ToolResult {
        let value = match validate(setting, raw) {
            Ok(value) => value,
            Err(failure) => {
                info!(setting = %setting, raw, "Rejected setting value");
                return ToolResult::rejected(failure.corrective_message());
            }
        };

        let change = SettingChange { setting, value };
        if let Err(e) = self.mutator.apply(&change).await {
            warn!(setting = %setting, error = %e, "Failed to apply setting");
            return ToolResult::rejected(format!("Failed to change {setting}: {e}"));
        }

        info!(setting = %setting, value = %change.value, "Setting changed");
        let output = format!("Successfully changed {setting} to {}.", change.value);
        self.event_bus.publish(DomainEvent::SettingChanged {
            setting,
            value: change.value,
            timestamp: chrono::Utc::now(),
        });
        ToolResult::ok(output)
    }
}

#[async_trait]
impl Tool for ChangeSettingTool {
    fn name(&self) -> &str {
        CHANGE_TOOL_NAME
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "setting": setting_schema("The specific setting to modify or interact with"),
                "value": {
                    "type": ["string", "null"],
                    "description": "Optional: the new value as a simple string (e.g. 'yellow', 'true', '16', '0.8', 'username'). If not provided, shows an interactive UI component"
                }
            },
            "required": ["setting"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let raw_setting = arguments["setting"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'setting' argument".into()))?;

        let Ok(setting) = raw_setting.parse::<SettingId>() else {
            return Ok(ToolResult::rejected(unknown_setting(raw_setting)));
        };

        // Photos arrive as image data through the uploader, never as text.
        if setting == SettingId::ProfilePhoto {
            return Ok(self.hand_off(setting).await);
        }

        Ok(match raw_value(&arguments["value"]) {
            Some(raw) => self.change(setting, &raw).await,
            None => self.hand_off(setting).await,
        })
    }
}

/// The `value` argument as text. Models sometimes send bare numbers or
/// booleans; those are accepted as their JSON spelling.
fn raw_value(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{RecordingDisplay, RecordingMutator};
    use chatset_core::settings::SettingValue;
    use chatset_core::ui::UiComponent;

    struct Fixture {
        tool: ChangeSettingTool,
        mutator: Arc<RecordingMutator>,
        display: Arc<RecordingDisplay>,
    }

    fn fixture_with(mutator: RecordingMutator, display: RecordingDisplay) -> Fixture {
        let mutator = Arc::new(mutator);
        let display = Arc::new(display);
        let bus = Arc::new(EventBus::default());
        let handoff = UiHandoff::new(display.clone(), bus.clone());
        Fixture {
            tool: ChangeSettingTool::new(mutator.clone(), handoff, bus),
            mutator,
            display,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(RecordingMutator::default(), RecordingDisplay::succeeding())
    }

    #[tokio::test]
    async fn valid_value_is_applied_once() {
        let f = fixture();
        let result = f
            .tool
            .execute(serde_json::json!({ "setting": "fontSize", "value": "20" }))
            .await
            .unwrap();

        assert!(result.success);
        assert_eq!(result.output, "Successfully changed fontSize to Number: 20.");
        let applied = f.mutator.applied.lock().await;
        assert_eq!(applied.len(), 1);
        assert_eq!(applied[0].value, SettingValue::Integer(20));
        assert!(f.display.calls().await.is_empty());
    }

    #[tokio::test]
    async fn invalid_values_never_reach_the_mutator() {
        let f = fixture();
        let cases = [
            ("fontSize", "7"),
            ("fontSize", "abc"),
            ("opacity", "1.1"),
            ("backgroundColor", "#ABCD"),
            ("backgroundColor", "chartreuse"),
            ("darkMode", "maybe"),
        ];
        for (setting, value) in cases {
            let result = f
                .tool
                .execute(serde_json::json!({ "setting": setting, "value": value }))
                .await
                .unwrap();
            assert!(!result.success, "{setting}={value}");
            assert!(result.output.starts_with("Invalid value for"), "{}", result.output);
        }
        assert_eq!(f.mutator.count().await, 0);
        assert!(f.display.calls().await.is_empty());
    }

    #[tokio::test]
    async fn corrective_text_names_the_constraint() {
        let f = fixture();
        let result = f
            .tool
            .execute(serde_json::json!({ "setting": "fontSize", "value": "7" }))
            .await
            .unwrap();
        assert!(result.output.contains("Range: 8 to 72 points"));
    }

    #[tokio::test]
    async fn missing_value_shows_the_slider_without_mutating() {
        let f = fixture();
        let result = f
            .tool
            .execute(serde_json::json!({ "setting": "fontSize", "value": null }))
            .await
            .unwrap();

        assert_eq!(f.display.calls().await, vec![UiComponent::FontSizeSlider]);
        assert_eq!(f.mutator.count().await, 0);
        assert_eq!(result.data.unwrap()[UI_SHOWN_KEY], "fontSizeSlider");
    }

    #[tokio::test]
    async fn profile_photo_always_hands_off() {
        let f = fixture();
        f.tool.execute(serde_json::json!({ "setting": "profilePhoto" })).await.unwrap();
        f.tool
            .execute(serde_json::json!({ "setting": "profilePhoto", "value": "me.png" }))
            .await
            .unwrap();

        assert_eq!(
            f.display.calls().await,
            vec![UiComponent::UploadPhotos, UiComponent::UploadPhotos]
        );
        assert_eq!(f.mutator.count().await, 0);
    }

    #[tokio::test]
    async fn dark_mode_applies_the_parsed_boolean() {
        let f = fixture();
        f.tool
            .execute(serde_json::json!({ "setting": "darkMode", "value": "false" }))
            .await
            .unwrap();
        f.tool
            .execute(serde_json::json!({ "setting": "darkMode", "value": true }))
            .await
            .unwrap();

        let applied = f.mutator.applied.lock().await;
        assert_eq!(applied[0].value, SettingValue::Boolean(false));
        assert_eq!(applied[1].value, SettingValue::Boolean(true));
    }

    #[tokio::test]
    async fn blank_value_is_treated_as_absent() {
        let f = fixture();
        f.tool
            .execute(serde_json::json!({ "setting": "opacity", "value": "  " }))
            .await
            .unwrap();
        assert_eq!(f.display.calls().await, vec![UiComponent::OpacitySlider]);
    }

    #[tokio::test]
    async fn numeric_value_is_accepted() {
        let f = fixture();
        let result = f
            .tool
            .execute(serde_json::json!({ "setting": "opacity", "value": 0.5 }))
            .await
            .unwrap();
        assert!(result.success);
        assert_eq!(f.mutator.applied.lock().await[0].value, SettingValue::Decimal(0.5));
    }

    #[tokio::test]
    async fn mutator_failure_is_reported_as_text() {
        let f = fixture_with(RecordingMutator::failing(), RecordingDisplay::succeeding());
        let result = f
            .tool
            .execute(serde_json::json!({ "setting": "username", "value": "Ada" }))
            .await
            .unwrap();
        assert!(!result.success);
        assert!(result.output.starts_with("Failed to change username"));
    }

    #[tokio::test]
    async fn successful_change_is_published() {
        let mutator = Arc::new(RecordingMutator::default());
        let bus = Arc::new(EventBus::default());
        let mut rx = bus.subscribe();
        let handoff = UiHandoff::new(Arc::new(RecordingDisplay::succeeding()), bus.clone());
        let tool = ChangeSettingTool::new(mutator, handoff, bus);

        tool.execute(serde_json::json!({ "setting": "backgroundColor", "value": "Red" }))
            .await
            .unwrap();

        match rx.recv().await.unwrap().as_ref() {
            DomainEvent::SettingChanged { setting, value, .. } => {
                assert_eq!(*setting, SettingId::BackgroundColor);
                assert_eq!(*value, SettingValue::NamedColor("red".into()));
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn description_embeds_the_catalogue() {
        let f = fixture();
        assert!(f.tool.description().contains("* opacity: sets the app opacity - Range: 0.0 to 1.0"));
    }
}
