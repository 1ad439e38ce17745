//! The settings assistant: turns one user message into one reply.
//!
//! The assistant owns a single [`ToolSession`]. When the session reports
//! that its context no longer fits, the assistant builds a fresh session
//! whose instructions carry the last few transcript entries, and retries the
//! same message once. Every other failure becomes an apologetic reply; the
//! caller always gets text back.

use chatset_core::event::{DomainEvent, EventBus};
use chatset_core::provider::Provider;
use chatset_core::tool::ToolRegistry;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use crate::instructions::{BASE_INSTRUCTIONS, with_recent_context};
use crate::session::{SessionConfig, SessionError, ToolSession};

/// Transcript entries carried into a rebuilt session by default.
pub const DEFAULT_RECENT_ENTRIES: usize = 3;

/// Where the assistant is in handling a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    AwaitingCompletion,
    Overflowed,
    Reconstructing,
    Responded,
    Failed,
}

pub struct SettingsAssistant {
    provider: Arc<dyn Provider>,
    tools: Arc<ToolRegistry>,
    config: SessionConfig,
    event_bus: Arc<EventBus>,
    base_instructions: String,
    recent_entries: usize,
    session: ToolSession,
    sessions_created: usize,
    phase: Phase,
}

impl SettingsAssistant {
    pub fn new(
        provider: Arc<dyn Provider>,
        tools: Arc<ToolRegistry>,
        config: SessionConfig,
        event_bus: Arc<EventBus>,
    ) -> Self {
        let session = ToolSession::new(
            provider.clone(),
            tools.clone(),
            BASE_INSTRUCTIONS,
            config.clone(),
            event_bus.clone(),
        );
        Self {
            provider,
            tools,
            config,
            event_bus,
            base_instructions: BASE_INSTRUCTIONS.to_string(),
            recent_entries: DEFAULT_RECENT_ENTRIES,
            session,
            sessions_created: 1,
            phase: Phase::Idle,
        }
    }

    /// Replace the base instructions. Starts over with a fresh session.
    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.base_instructions = instructions.into();
        self.session = self.new_session(self.base_instructions.clone());
        self
    }

    /// Set how many transcript entries survive a rebuild.
    pub fn with_recent_entries(mut self, n: usize) -> Self {
        self.recent_entries = n;
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Sessions built so far, including the initial one.
    pub fn sessions_created(&self) -> usize {
        self.sessions_created
    }

    /// Instructions of the live session.
    pub fn session_instructions(&self) -> &str {
        self.session.instructions()
    }

    pub fn session(&self) -> &ToolSession {
        &self.session
    }

    /// Ask the backend to start loading. Returns immediately; does nothing
    /// outside a tokio runtime.
    pub fn prewarm(&self) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            debug!("No runtime; skipping prewarm");
            return;
        };
        let provider = self.provider.clone();
        handle.spawn(async move {
            provider.prewarm().await;
        });
    }

    /// Handle one user message. `&mut self` keeps calls from overlapping.
    pub async fn handle(&mut self, text: &str) -> String {
        info!(chars = text.len(), "Handling user message");
        self.phase = Phase::AwaitingCompletion;

        match self.session.respond(text).await {
            Ok(reply) => {
                self.phase = Phase::Responded;
                reply
            }
            Err(SessionError::ContextWindowExceeded(detail)) => {
                warn!(detail = %detail, "Context window exceeded; rebuilding session");
                self.phase = Phase::Overflowed;
                self.rebuild_and_retry(text).await
            }
            Err(e) => self.fail("respond", &e, "Sorry, I encountered an error processing your request"),
        }
    }

    async fn rebuild_and_retry(&mut self, text: &str) -> String {
        self.phase = Phase::Reconstructing;
        let recent = self.session.transcript().recent(self.recent_entries).to_vec();
        let instructions = with_recent_context(&self.base_instructions, &recent);
        self.session = self.new_session(instructions);
        self.sessions_created += 1;

        info!(carried = recent.len(), "Session rebuilt");
        self.event_bus.publish(DomainEvent::SessionRebuilt {
            carried_lines: recent.len(),
            timestamp: chrono::Utc::now(),
        });

        self.phase = Phase::AwaitingCompletion;
        match self.session.respond(text).await {
            Ok(reply) => {
                self.phase = Phase::Responded;
                reply
            }
            Err(e) => self.fail(
                "retry after rebuild",
                &e,
                "Sorry, I encountered an error processing your request after context reset",
            ),
        }
    }

    fn fail(&mut self, context: &str, e: &SessionError, apology: &str) -> String {
        error!(context, error = %e, "Could not produce a reply");
        self.phase = Phase::Failed;
        self.event_bus.publish(DomainEvent::ErrorOccurred {
            context: context.to_string(),
            error_message: e.to_string(),
            timestamp: chrono::Utc::now(),
        });
        format!("{apology}: {e}")
    }

    fn new_session(&self, instructions: String) -> ToolSession {
        ToolSession::new(
            self.provider.clone(),
            self.tools.clone(),
            instructions,
            self.config.clone(),
            self.event_bus.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{ScriptedProvider, make_text_response, overflow};
    use chatset_core::error::ProviderError;

    fn assistant(provider: Arc<ScriptedProvider>) -> SettingsAssistant {
        SettingsAssistant::new(
            provider,
            Arc::new(ToolRegistry::new()),
            SessionConfig::default(),
            Arc::new(EventBus::default()),
        )
    }

    #[tokio::test]
    async fn normal_reply() {
        let provider = Arc::new(ScriptedProvider::new(vec![Ok(make_text_response("Sure."))]));
        let mut a = assistant(provider);
        assert_eq!(a.phase(), Phase::Idle);

        assert_eq!(a.handle("hi").await, "Sure.");
        assert_eq!(a.phase(), Phase::Responded);
        assert_eq!(a.sessions_created(), 1);
    }

    #[tokio::test]
    async fn other_failures_become_apologies() {
        let provider = Arc::new(ScriptedProvider::new(vec![Err(ProviderError::Timeout("60s".into()))]));
        let mut a = assistant(provider.clone());

        let reply = a.handle("hi").await;
        assert!(reply.starts_with("Sorry, I encountered an error processing your request: "));
        assert!(reply.contains("60s"));
        assert_eq!(a.phase(), Phase::Failed);
        assert_eq!(provider.call_count(), 1);
        assert_eq!(a.sessions_created(), 1);
    }

    #[tokio::test]
    async fn overflow_rebuilds_once() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Ok(make_text_response("first")),
            Err(overflow()),
            Ok(make_text_response("second")),
        ]));
        let mut a = assistant(provider.clone());

        assert_eq!(a.handle("one").await, "first");
        assert_eq!(a.handle("two").await, "second");
        assert_eq!(a.sessions_created(), 2);

        // Carried: "Assistant: first", then "User: two" (the overflowed prompt),
        // preceded by "User: one".
        let instructions = a.session_instructions();
        assert!(instructions.contains("RECENT CONVERSATION CONTEXT:"));
        assert!(instructions.contains("User: one\nAssistant: first\nUser: two\n"));

        // The retry starts from the rebuilt instructions and the same prompt
        let retry = &provider.requests()[2];
        assert_eq!(retry.messages.len(), 2);
        assert_eq!(retry.messages[1].content, "two");
    }

    #[tokio::test]
    async fn second_overflow_is_not_retried() {
        let provider = Arc::new(ScriptedProvider::new(vec![Err(overflow()), Err(overflow())]));
        let mut a = assistant(provider.clone());

        let reply = a.handle("hi").await;
        assert!(reply.starts_with("Sorry, I encountered an error processing your request after context reset"));
        assert_eq!(provider.call_count(), 2);
        assert_eq!(a.sessions_created(), 2);
        assert_eq!(a.phase(), Phase::Failed);
    }

    #[tokio::test]
    async fn rebuild_is_published() {
        let provider = Arc::new(ScriptedProvider::new(vec![Err(overflow()), Ok(make_text_response("ok"))]));
        let bus = Arc::new(EventBus::default());
        let mut rx = bus.subscribe();
        let mut a = SettingsAssistant::new(provider, Arc::new(ToolRegistry::new()), SessionConfig::default(), bus);

        a.handle("hi").await;

        let mut rebuilt = None;
        while let Ok(event) = rx.try_recv() {
            if let DomainEvent::SessionRebuilt { carried_lines, .. } = event.as_ref() {
                rebuilt = Some(*carried_lines);
            }
        }
        // Instructions and the prompt were all the old session held
        assert_eq!(rebuilt, Some(2));
    }

    #[tokio::test]
    async fn recent_entry_count_is_configurable() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Ok(make_text_response("a")),
            Err(overflow()),
            Ok(make_text_response("b")),
        ]));
        let mut a = assistant(provider).with_recent_entries(1);

        a.handle("one").await;
        a.handle("two").await;

        let instructions = a.session_instructions();
        assert!(instructions.contains("User: two\n"));
        assert!(!instructions.contains("Assistant: a"));
    }

    #[tokio::test]
    async fn prewarm_returns_immediately() {
        let provider = Arc::new(ScriptedProvider::new(vec![]));
        let a = assistant(provider.clone());
        a.prewarm();
        tokio::task::yield_now().await;
        assert_eq!(provider.call_count(), 0);
    }

    fn carried_lines(instructions: &str) -> Vec<String> {
        let (_, context) = instructions
            .split_once("Here's the recent conversation history for context:\n\n")
            .unwrap();
        let (carried, _) = context.split_once("\n\nPlease continue").unwrap();
        carried.lines().map(String::from).collect()
    }

    #[tokio::test]
    async fn overflow_on_first_turn_does_not_copy_the_instructions() {
        let provider = Arc::new(ScriptedProvider::new(vec![Err(overflow()), Ok(make_text_response("ok"))]));
        let mut a = assistant(provider);

        assert_eq!(a.handle("hi").await, "ok");

        let instructions = a.session_instructions();
        assert_eq!(instructions.matches("RULE 1 - Value Parameter Usage").count(), 1);
        let carried = carried_lines(instructions);
        assert_eq!(carried.len(), 2);
        assert!(carried[0].starts_with("Instructions: You are a settings assistant."));
        assert_eq!(carried[1], "User: hi");
    }

    #[tokio::test]
    async fn multi_line_reply_is_carried_as_one_line() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Ok(make_text_response("Line one\nLine two\nLine three")),
            Err(overflow()),
            Ok(make_text_response("ok")),
        ]));
        let mut a = assistant(provider);

        a.handle("one").await;
        a.handle("two").await;

        assert_eq!(
            carried_lines(a.session_instructions()),
            vec!["User: one", "Assistant: Line one Line two Line three", "User: two"]
        );
    }

    #[tokio::test]
    async fn repeated_overflow_does_not_grow_the_session() {
        let provider = Arc::new(ScriptedProvider::new(vec![]));
        let config = SessionConfig {
            context_window_tokens: Some(1),
            ..SessionConfig::default()
        };
        let mut a = SettingsAssistant::new(
            provider.clone(),
            Arc::new(ToolRegistry::new()),
            config,
            Arc::new(EventBus::default()),
        );

        let mut sizes = Vec::new();
        for _ in 0..4 {
            a.handle("hello").await;
            let instructions = a.session_instructions();
            assert!(carried_lines(instructions).len() <= DEFAULT_RECENT_ENTRIES);
            assert_eq!(instructions.matches("RULE 1 - Value Parameter Usage").count(), 1);
            sizes.push(instructions.len());
        }
        assert_eq!(sizes[1], sizes[2]);
        assert_eq!(sizes[2], sizes[3]);
        assert!(sizes[3] < 2 * BASE_INSTRUCTIONS.len());
        assert_eq!(provider.call_count(), 0);
    }
}
