//! Domain events: observable side effects of a turn.
//!
//! Events are published when the assistant changes a setting, shows a UI
//! component, runs a tool, replies, or rebuilds its session. Subscribers
//! (the CLI, tests) can react without being wired into the orchestrator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;
use crate::settings::{SettingId, SettingValue};
use crate::ui::UiComponent;

/// All domain events in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DomainEvent {
    /// A validated value was applied to the settings store
    SettingChanged {
        setting: SettingId,
        value: SettingValue,
        timestamp: DateTime<Utc>,
    },

    /// An interactive component was shown to the user
    UiComponentShown {
        component: UiComponent,
        timestamp: DateTime<Utc>,
    },

    /// A tool was executed
    ToolExecuted {
        tool_name: String,
        success: bool,
        duration_ms: u64,
        timestamp: DateTime<Utc>,
    },

    /// The backend produced a final reply
    ResponseGenerated {
        model: String,
        tokens_used: u32,
        timestamp: DateTime<Utc>,
    },

    /// The session overflowed and was rebuilt from recent transcript lines
    SessionRebuilt {
        carried_lines: usize,
        timestamp: DateTime<Utc>,
    },

    /// An error was turned into an apologetic reply
    ErrorOccurred {
        context: String,
        error_message: String,
        timestamp: DateTime<Utc>,
    },
}

/// A broadcast-based event bus for domain events.
pub struct EventBus {
    sender: broadcast::Sender<Arc<DomainEvent>>,
}

impl EventBus {
    /// Create a new event bus with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all subscribers.
    pub fn publish(&self, event: DomainEvent) {
        // No subscribers is fine
        let _ = self.sender.send(Arc::new(event));
    }

    /// Subscribe to receive events.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<DomainEvent>> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}
