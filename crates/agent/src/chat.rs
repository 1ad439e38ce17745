//! Chat front: keeps the user-visible conversation in step with the
//! assistant.
//!
//! The conversation is shared with [`ConversationDisplay`], so components
//! shown by the change tool land in the conversation between the user's
//! message and the assistant's reply.

use async_trait::async_trait;
use chatset_core::message::{Conversation, Message};
use chatset_core::ui::{UiComponent, UiDisplay};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use crate::orchestrator::SettingsAssistant;

pub const GREETING: &str = "Hello! What app settings would you like to change today?";

/// Shows components by appending them to a conversation.
pub struct ConversationDisplay {
    conversation: Arc<RwLock<Conversation>>,
}

impl ConversationDisplay {
    pub fn new(conversation: Arc<RwLock<Conversation>>) -> Self {
        Self { conversation }
    }
}

#[async_trait]
impl UiDisplay for ConversationDisplay {
    async fn show(&self, component: UiComponent) -> bool {
        self.conversation
            .write()
            .await
            .push(Message::component(component.message_kind(), ""));
        debug!(component = %component, "Component appended to conversation");
        true
    }
}

pub struct SettingsChat {
    assistant: SettingsAssistant,
    conversation: Arc<RwLock<Conversation>>,
}

impl SettingsChat {
    /// `conversation` should be the one the assistant's display writes to.
    pub fn new(assistant: SettingsAssistant, conversation: Arc<RwLock<Conversation>>) -> Self {
        Self {
            assistant,
            conversation,
        }
    }

    pub fn conversation(&self) -> Arc<RwLock<Conversation>> {
        self.conversation.clone()
    }

    pub fn assistant(&self) -> &SettingsAssistant {
        &self.assistant
    }

    /// Seed an empty conversation with the greeting. Returns the greeting
    /// when it was added.
    pub async fn open(&self) -> Option<&'static str> {
        let mut conversation = self.conversation.write().await;
        if !conversation.messages.is_empty() {
            return None;
        }
        conversation.push(Message::assistant(GREETING));
        self.assistant.prewarm();
        Some(GREETING)
    }

    /// Send one user message and return the assistant's reply.
    ///
    /// Blank or `null` replies are returned but not added to the
    /// conversation.
    pub async fn send(&mut self, text: &str) -> String {
        self.open().await;
        self.conversation.write().await.push(Message::user(text));

        let reply = self.assistant.handle(text).await;
        let trimmed = reply.trim();
        if !trimmed.is_empty() && trimmed != "null" {
            self.conversation.write().await.push(Message::assistant(&reply));
        }
        reply
    }
}
