//! The settings assistant.
//!
//! A user message flows through three layers:
//!
//! 1. [`SettingsChat`] appends it to the visible conversation
//! 2. [`SettingsAssistant`] hands it to the live session, rebuilding the
//!    session once if its context overflows
//! 3. [`ToolSession`] loops over backend calls and tool executions until the
//!    backend answers with text
//!
//! The reply travels back the same way; UI components shown along the way
//! are already in the conversation when `send` returns.

pub mod chat;
pub mod instructions;
pub mod orchestrator;
pub mod session;
pub mod token;
pub mod transcript;

#[cfg(test)]
pub(crate) mod test_helpers;

use chatset_core::event::EventBus;
use chatset_core::provider::Provider;
use chatset_core::settings::{SettingsAccessor, SettingsMutator};
use chatset_core::ui::UiDisplay;
use std::sync::Arc;

pub use chat::{ConversationDisplay, GREETING, SettingsChat};
pub use orchestrator::{Phase, SettingsAssistant};
pub use session::{SessionConfig, SessionError, ToolSession};
pub use transcript::{Transcript, TranscriptEntry};

/// Wire an assistant from configuration and its collaborators.
pub fn build_assistant(
    config: &chatset_config::AppConfig,
    provider: Arc<dyn Provider>,
    accessor: Arc<dyn SettingsAccessor>,
    mutator: Arc<dyn SettingsMutator>,
    display: Arc<dyn UiDisplay>,
    event_bus: Arc<EventBus>,
) -> SettingsAssistant {
    let tools = chatset_tools::default_registry(accessor, mutator, display, event_bus.clone());
    SettingsAssistant::new(provider, Arc::new(tools), SessionConfig::from_config(config), event_bus)
        .with_recent_entries(config.assistant.recent_context_entries)
}
