//! Query tool: states the current value of one setting.

use async_trait::async_trait;
use chatset_core::error::ToolError;
use chatset_core::settings::{AppSettings, SettingId, SettingsAccessor};
use chatset_core::tool::{Tool, ToolResult};
use std::sync::Arc;
use tracing::debug;
use crate::{QUERY_TOOL_NAME, setting_schema, unknown_setting};

pub struct GetCurrentSettingsTool {
    accessor: Arc<dyn SettingsAccessor>,
}

impl GetCurrentSettingsTool {
    pub fn new(accessor: Arc<dyn SettingsAccessor>) -> Self {
        Self { accessor }
    }
}

#[async_trait]
impl Tool for GetCurrentSettingsTool {
    fn name(&self) -> &str {
        QUERY_TOOL_NAME
    }

    fn description(&self) -> &str {
        "Retrieves the current value of one app setting: background color, dark mode, font size, \
         opacity, username, or profile photo status."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "setting": setting_schema("The specific setting the user would like to check")
            },
            "required": ["setting"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let raw = arguments["setting"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'setting' argument".into()))?;

        let Ok(setting) = raw.parse::<SettingId>() else {
            return Ok(ToolResult::rejected(unknown_setting(raw)));
        };

        let current = self.accessor.current().await;
        debug!(setting = %setting, "Querying setting");
        Ok(ToolResult::ok(describe(setting, &current)))
    }
}

/// One sentence stating `setting`'s value in `current`.
pub fn describe(setting: SettingId, current: &AppSettings) -> String {
    match setting {
        SettingId::BackgroundColor => format!("The background color is {}", current.background_color),
        SettingId::DarkMode => format!(
            "Dark mode is {}",
            if current.dark_mode { "enabled" } else { "disabled" }
        ),
        SettingId::FontSize => format!("The font size is {}", current.font_size),
        SettingId::Opacity => format!("The opacity is {:?}", current.opacity),
        SettingId::Username => format!("The username is {}", current.username),
        SettingId::ProfilePhoto => match &current.profile_photo {
            Some(handle) => format!("The profile photo is set to {handle}"),
            None => "There is no profile photo currently".to_string(),
        },
    }
}
