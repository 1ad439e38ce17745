//! UI hand-off: satisfying a change request by showing an interactive
//! component instead of applying a typed value.
//!
//! The component for each setting comes from the descriptor table. Settings
//! without a component (dark mode, username) get textual guidance telling
//! the model what to ask for next. If the display capability fails, the
//! same textual guidance is used.

use chatset_core::event::{DomainEvent, EventBus};
use chatset_core::settings::SettingId;
use chatset_core::ui::{UiComponent, UiDisplay};
use chatset_settings::descriptor;
use std::sync::Arc;
use tracing::{info, warn};
use crate::{CHANGE_TOOL_NAME, QUERY_TOOL_NAME};

/// Outcome of a hand-off: the tool output and the component actually shown.
#[derive(Debug, Clone, PartialEq)]
pub struct Handoff {
    pub output: String,
    pub shown: Option<UiComponent>,
}

pub struct UiHandoff {
    display: Arc<dyn UiDisplay>,
    event_bus: Arc<EventBus>,
}

impl UiHandoff {
    pub fn new(display: Arc<dyn UiDisplay>, event_bus: Arc<EventBus>) -> Self {
        Self { display, event_bus }
    }

    /// The component that can collect a value for `setting`, if any.
    pub fn component_for(setting: SettingId) -> Option<UiComponent> {
        descriptor(setting).ui
    }

    /// Hand a value-less change request for `setting` off to the user.
    pub async fn request_ui_for(&self, setting: SettingId) -> Handoff {
        let Some(component) = Self::component_for(setting) else {
            return Handoff {
                output: guidance_without_component(setting),
                shown: None,
            };
        };

        if self.display.show(component).await {
            info!(setting = %setting, component = %component, "UI component shown");
            self.event_bus.publish(DomainEvent::UiComponentShown {
                component,
                timestamp: chrono::Utc::now(),
            });
            Handoff {
                output: format!(
                    "The user was shown the {component}, which {}. Ask the user to use the component.",
                    component.description()
                ),
                shown: Some(component),
            }
        } else {
            warn!(setting = %setting, component = %component, "UI component could not be displayed");
            Handoff {
                output: format!(
                    "Oops, something went wrong and the {component} was not displayed. {}",
                    ask_for_value(setting)
                ),
                shown: None,
            }
        }
    }
}

fn guidance_without_component(setting: SettingId) -> String {
    match setting {
        SettingId::DarkMode => format!(
            "Use the {QUERY_TOOL_NAME} tool to get the current app settings. Check the darkMode \
             setting, then call {CHANGE_TOOL_NAME} again with the correct true / false value to \
             toggle darkMode."
        ),
        SettingId::Username => format!(
            "The user wants to change their username. Ask the user to provide the valid username, \
             then call {CHANGE_TOOL_NAME} again with the username as the value to make the change."
        ),
        other => ask_for_value(other),
    }
}

fn ask_for_value(setting: SettingId) -> String {
    let d = descriptor(setting);
    format!(
        "The user wants to change the {setting} setting, which {}. Ask the user to provide the \
         valid value for making the change - {}",
        d.description, d.constraints
    )
}
