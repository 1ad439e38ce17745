//! Shared test helpers for session and orchestrator tests.

use async_trait::async_trait;
use chatset_core::error::ProviderError;
use chatset_core::message::{Message, MessageToolCall};
use chatset_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};
use chatset_core::ui::{UiComponent, UiDisplay};
use std::collections::VecDeque;
use std::sync::Mutex;

/// A mock provider that returns a sequence of scripted outcomes and keeps
/// every request it receives.
///
/// Panics if more calls are made than outcomes provided.
pub struct ScriptedProvider {
    outcomes: Mutex<VecDeque<Result<ProviderResponse, ProviderError>>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    pub fn new(outcomes: Vec<Result<ProviderResponse, ProviderError>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted_mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let call = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request);
            requests.len()
        };
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("ScriptedProvider: no outcome for call #{call}"))
    }
}

/// Display that records components and answers with a fixed flag.
pub struct StubDisplay {
    shown: Mutex<Vec<UiComponent>>,
    succeed: bool,
}

impl StubDisplay {
    pub fn new(succeed: bool) -> Self {
        Self {
            shown: Mutex::new(Vec::new()),
            succeed,
        }
    }

    pub fn shown(&self) -> Vec<UiComponent> {
        self.shown.lock().unwrap().clone()
    }
}

#[async_trait]
impl UiDisplay for StubDisplay {
    async fn show(&self, component: UiComponent) -> bool {
        self.shown.lock().unwrap().push(component);
        self.succeed
    }
}

pub fn make_text_response(text: &str) -> ProviderResponse {
    ProviderResponse {
        message: Message::assistant(text),
        usage: Some(Usage {
            prompt_tokens: 10,
            completion_tokens: 5,
            total_tokens: 15,
        }),
        model: "mock-model".into(),
    }
}

pub fn make_tool_call_response(tool_calls: Vec<MessageToolCall>) -> ProviderResponse {
    let mut message = Message::assistant("");
    message.tool_calls = tool_calls;
    ProviderResponse {
        message,
        usage: None,
        model: "mock-model".into(),
    }
}

pub fn make_tool_call(name: &str, args: serde_json::Value) -> MessageToolCall {
    MessageToolCall {
        id: format!("call_{name}"),
        name: name.to_string(),
        arguments: serde_json::to_string(&args).unwrap(),
    }
}

pub fn overflow() -> ProviderError {
    ProviderError::ContextWindowExceeded("maximum context length exceeded".into())
}
