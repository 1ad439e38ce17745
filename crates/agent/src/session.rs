//! A completion session: instructions, a fixed tool set, and the transcript
//! of one conversation with the backend.
//!
//! `respond` runs the tool loop for one prompt. Every tool outcome, including
//! unknown tools and malformed arguments, goes back to the backend as tool
//! output; only backend failures and capacity overflow end the loop early.

use chatset_core::error::ProviderError;
use chatset_core::event::{DomainEvent, EventBus};
use chatset_core::provider::{Provider, ProviderRequest};
use chatset_core::tool::{ToolCall, ToolRegistry};
use chatset_core::ui::UiComponent;
use chatset_tools::UI_SHOWN_KEY;
use std::sync::Arc;
use tracing::{debug, info, warn};
use crate::token::{estimate_messages_tokens, estimate_tools_tokens};
use crate::transcript::{Transcript, TranscriptEntry};

/// Knobs shared by every session an assistant creates.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    /// Backend round trips allowed per prompt
    pub max_tool_iterations: u32,
    /// Local capacity limit, checked before each backend call
    pub context_window_tokens: Option<usize>,
    /// Refuse further tool calls in a turn once a component was shown
    pub one_handoff_per_turn: bool,
}

impl SessionConfig {
    pub fn from_config(config: &chatset_config::AppConfig) -> Self {
        Self {
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: Some(config.max_tokens),
            max_tool_iterations: config.assistant.max_tool_iterations,
            context_window_tokens: config.assistant.context_window_tokens,
            one_handoff_per_turn: config.assistant.one_handoff_per_turn,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::from_config(&chatset_config::AppConfig::default())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Exceeded context window size: {0}")]
    ContextWindowExceeded(String),

    #[error(transparent)]
    Provider(ProviderError),

    #[error("No reply after {0} tool iterations")]
    IterationLimit(u32),
}

impl From<ProviderError> for SessionError {
    fn from(e: ProviderError) -> Self {
        match e {
            ProviderError::ContextWindowExceeded(detail) => Self::ContextWindowExceeded(detail),
            other => Self::Provider(other),
        }
    }
}

pub struct ToolSession {
    provider: Arc<dyn Provider>,
    tools: Arc<ToolRegistry>,
    config: SessionConfig,
    event_bus: Arc<EventBus>,
    transcript: Transcript,
}

impl ToolSession {
    pub fn new(
        provider: Arc<dyn Provider>,
        tools: Arc<ToolRegistry>,
        instructions: impl Into<String>,
        config: SessionConfig,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            provider,
            tools,
            config,
            event_bus,
            transcript: Transcript::new(instructions),
        }
    }

    pub fn instructions(&self) -> &str {
        self.transcript.instructions()
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Run one prompt to a final text reply.
    pub async fn respond(&mut self, prompt: &str) -> Result<String, SessionError> {
        self.transcript.push(TranscriptEntry::Prompt(prompt.to_string()));

        let definitions = self.tools.definitions();
        let mut shown: Option<UiComponent> = None;

        for iteration in 1..=self.config.max_tool_iterations {
            let messages = self.transcript.to_messages();

            if let Some(window) = self.config.context_window_tokens {
                let estimated = estimate_messages_tokens(&messages) + estimate_tools_tokens(&definitions);
                if estimated > window {
                    warn!(estimated, window, "Session exceeds context window");
                    return Err(SessionError::ContextWindowExceeded(format!(
                        "estimated {estimated} tokens, window is {window}"
                    )));
                }
            }

            debug!(iteration, entries = self.transcript.len(), "Session iteration");

            let request = ProviderRequest {
                model: self.config.model.clone(),
                messages,
                temperature: self.config.temperature,
                max_tokens: self.config.max_tokens,
                tools: definitions.clone(),
            };
            let response = self.provider.complete(request).await?;

            if let Some(usage) = &response.usage {
                self.event_bus.publish(DomainEvent::ResponseGenerated {
                    model: response.model.clone(),
                    tokens_used: usage.total_tokens,
                    timestamp: chrono::Utc::now(),
                });
            }

            let message = response.message;
            if message.tool_calls.is_empty() {
                self.transcript.push(TranscriptEntry::Response(message.content.clone()));
                return Ok(message.content);
            }

            let calls = message.tool_calls;
            self.transcript.push(TranscriptEntry::ToolCalls {
                content: message.content,
                calls: calls.clone(),
            });

            for tc in &calls {
                let output = match shown {
                    Some(component) if self.config.one_handoff_per_turn => {
                        info!(tool = %tc.name, component = %component, "Refusing tool call after UI hand-off");
                        format!(
                            "The {component} is already shown to the user. Do not call any more tools; \
                             wait for the user to use the component."
                        )
                    }
                    _ => {
                        let (output, component) = self.run_tool(&tc.id, &tc.name, &tc.arguments).await;
                        shown = shown.or(component);
                        output
                    }
                };
                self.transcript.push(TranscriptEntry::ToolOutput {
                    call_id: tc.id.clone(),
                    output,
                });
            }
        }

        warn!(max = self.config.max_tool_iterations, "Max tool iterations reached");
        Err(SessionError::IterationLimit(self.config.max_tool_iterations))
    }

    /// Execute one call. Returns the tool output and the component it
    /// displayed, if any.
    async fn run_tool(&self, id: &str, name: &str, arguments: &str) -> (String, Option<UiComponent>) {
        let arguments = match serde_json::from_str::<serde_json::Value>(arguments) {
            Ok(value) => value,
            Err(e) => {
                warn!(tool = %name, error = %e, "Malformed tool arguments");
                return (format!("Error: invalid arguments for {name}: {e}"), None);
            }
        };
        let call = ToolCall {
            id: id.to_string(),
            name: name.to_string(),
            arguments,
        };

        let start = std::time::Instant::now();
        let result = self.tools.execute(&call).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        let (success, output, component) = match result {
            Ok(result) => {
                let component = result
                    .data
                    .as_ref()
                    .and_then(|data| data.get(UI_SHOWN_KEY))
                    .and_then(|value| serde_json::from_value::<UiComponent>(value.clone()).ok());
                (result.success, result.output, component)
            }
            Err(e) => {
                warn!(tool = %name, error = %e, "Tool execution failed");
                (false, format!("Error: {e}"), None)
            }
        };

        info!(tool = %name, success, duration_ms, "Tool executed");
        self.event_bus.publish(DomainEvent::ToolExecuted {
            tool_name: name.to_string(),
            success,
            duration_ms,
            timestamp: chrono::Utc::now(),
        });
        (output, component)
    }
}
