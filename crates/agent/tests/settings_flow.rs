//! End-to-end flows through the chat front, the assistant, the real tools,
//! and the in-memory settings store, with a scripted backend.

use async_trait::async_trait;
use chatset_agent::{ConversationDisplay, SessionConfig, SettingsAssistant, SettingsChat, build_assistant};
use chatset_config::AppConfig;
use chatset_core::error::ProviderError;
use chatset_core::event::{DomainEvent, EventBus};
use chatset_core::message::{Conversation, Message, MessageKind, MessageToolCall};
use chatset_core::provider::{Provider, ProviderRequest, ProviderResponse};
use chatset_core::settings::{AppSettings, SettingsAccessor};
use chatset_core::tool::ToolRegistry;
use chatset_settings::{InMemoryPhotoStore, InMemorySettingsStore};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::RwLock;

enum Step {
    Call(&'static str, serde_json::Value),
    Text(&'static str),
    Overflow,
    Fail,
}

struct Backend {
    steps: Mutex<VecDeque<Step>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl Backend {
    fn new(steps: Vec<Step>) -> Arc<Self> {
        Arc::new(Self {
            steps: Mutex::new(steps.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn last_request(&self) -> ProviderRequest {
        self.requests.lock().unwrap().last().cloned().unwrap()
    }
}

#[async_trait]
impl Provider for Backend {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        self.requests.lock().unwrap().push(request);
        let step = self.steps.lock().unwrap().pop_front().expect("backend ran out of steps");
        let message = match step {
            Step::Call(name, args) => {
                let mut message = Message::assistant("");
                message.tool_calls.push(MessageToolCall {
                    id: format!("call_{}", self.calls()),
                    name: name.into(),
                    arguments: args.to_string(),
                });
                message
            }
            Step::Text(text) => Message::assistant(text),
            Step::Overflow => {
                return Err(ProviderError::ContextWindowExceeded("context_length_exceeded".into()));
            }
            Step::Fail => return Err(ProviderError::Network("connection reset".into())),
        };
        Ok(ProviderResponse {
            message,
            usage: None,
            model: "scripted".into(),
        })
    }
}

struct Harness {
    chat: SettingsChat,
    store: Arc<InMemorySettingsStore>,
    events: Arc<EventBus>,
}

fn harness(backend: Arc<Backend>) -> Harness {
    let conversation = Arc::new(RwLock::new(Conversation::new()));
    let store = Arc::new(InMemorySettingsStore::new(AppSettings::default()).with_photo_store(Arc::new(InMemoryPhotoStore::new())));
    let events = Arc::new(EventBus::default());
    let assistant = build_assistant(
        &AppConfig::default(),
        backend,
        store.clone(),
        store.clone(),
        Arc::new(ConversationDisplay::new(conversation.clone())),
        events.clone(),
    );
    Harness {
        chat: SettingsChat::new(assistant, conversation),
        store,
        events,
    }
}

async fn kinds(chat: &SettingsChat) -> Vec<MessageKind> {
    let conversation = chat.conversation();
    let conversation = conversation.read().await;
    conversation.ordered().iter().map(|m| m.kind).collect()
}

#[tokio::test]
async fn explicit_value_is_applied() {
    let backend = Backend::new(vec![
        Step::Call("change_setting", serde_json::json!({ "setting": "backgroundColor", "value": "blue" })),
        Step::Text("Your background is now blue."),
    ]);
    let mut h = harness(backend.clone());

    let reply = h.chat.send("make the background blue").await;

    assert_eq!(reply, "Your background is now blue.");
    assert_eq!(h.store.current().await.background_color, "#007AFF");
    let tool_output = backend.last_request().messages.last().unwrap().content.clone();
    assert_eq!(tool_output, "Successfully changed backgroundColor to Color: blue.");
}

#[tokio::test]
async fn font_size_without_value_shows_the_slider() {
    let backend = Backend::new(vec![
        Step::Call("change_setting", serde_json::json!({ "setting": "fontSize", "value": null })),
        Step::Text("Use the slider to pick a size."),
    ]);
    let mut h = harness(backend);
    let before = h.store.current().await;

    h.chat.send("change the font size").await;

    assert_eq!(h.store.current().await, before);
    let kinds = kinds(&h.chat).await;
    assert_eq!(kinds.iter().filter(|k| **k == MessageKind::FontSizeSlider).count(), 1);
}

#[tokio::test]
async fn profile_photo_routes_to_the_uploader() {
    let backend = Backend::new(vec![
        Step::Call("change_setting", serde_json::json!({ "setting": "profilePhoto", "value": null })),
        Step::Text("Upload a new photo above."),
    ]);
    let mut h = harness(backend);

    h.chat.send("new profile picture").await;

    assert!(kinds(&h.chat).await.contains(&MessageKind::UploadPhotos));
    assert!(!h.store.current().await.has_profile_photo());

    // The upload itself arrives outside the chat
    h.store.set_profile_photo(b"png bytes").await.unwrap();
    assert!(h.store.current().await.has_profile_photo());
}

#[tokio::test]
async fn invalid_values_never_mutate() {
    let backend = Backend::new(vec![
        Step::Call("change_setting", serde_json::json!({ "setting": "opacity", "value": "1.1" })),
        Step::Text("Opacity must be between 0 and 1."),
        Step::Call("change_setting", serde_json::json!({ "setting": "fontSize", "value": "7" })),
        Step::Text("Font size must be 8 or more."),
        Step::Call("change_setting", serde_json::json!({ "setting": "backgroundColor", "value": "chartreuse" })),
        Step::Text("That color isn't available."),
    ]);
    let mut h = harness(backend.clone());
    let mut rx = h.events.subscribe();
    let before = h.store.current().await;

    h.chat.send("opacity 1.1").await;
    let corrective = backend.last_request().messages.last().unwrap().content.clone();
    assert!(corrective.starts_with("Invalid value for opacity"));
    assert!(corrective.contains("Range: 0.0 to 1.0"));

    h.chat.send("font 7").await;
    h.chat.send("chartreuse background").await;

    assert_eq!(h.store.current().await, before);
    while let Ok(event) = rx.try_recv() {
        assert!(!matches!(event.as_ref(), DomainEvent::SettingChanged { .. }));
    }
}

#[tokio::test]
async fn dark_mode_toggle_queries_first() {
    let backend = Backend::new(vec![
        Step::Call("change_setting", serde_json::json!({ "setting": "darkMode", "value": null })),
        Step::Call("get_current_settings", serde_json::json!({ "setting": "darkMode" })),
        Step::Call("change_setting", serde_json::json!({ "setting": "darkMode", "value": "true" })),
        Step::Text("Dark mode is on."),
    ]);
    let mut h = harness(backend.clone());

    assert_eq!(h.chat.send("toggle dark mode").await, "Dark mode is on.");
    assert!(h.store.current().await.dark_mode);
    assert_eq!(backend.calls(), 4);
}

#[tokio::test]
async fn queries_are_stable_without_changes() {
    let backend = Backend::new(vec![
        Step::Call("get_current_settings", serde_json::json!({ "setting": "opacity" })),
        Step::Text("first"),
        Step::Call("get_current_settings", serde_json::json!({ "setting": "opacity" })),
        Step::Text("second"),
    ]);
    let mut h = harness(backend.clone());

    h.chat.send("what's the opacity?").await;
    let first = backend.last_request().messages.last().unwrap().content.clone();
    h.chat.send("and now?").await;
    let second = backend.last_request().messages.last().unwrap().content.clone();

    assert_eq!(first, "The opacity is 1.0");
    assert_eq!(first, second);
}

#[tokio::test]
async fn overflow_once_then_success() {
    let backend = Backend::new(vec![
        Step::Text("Hi! What would you like to change?"),
        Step::Overflow,
        Step::Call("change_setting", serde_json::json!({ "setting": "username", "value": "Ada" })),
        Step::Text("You're now Ada."),
    ]);
    let mut h = harness(backend.clone());

    h.chat.send("hello").await;
    let reply = h.chat.send("call me Ada").await;

    assert_eq!(reply, "You're now Ada.");
    assert_eq!(h.store.current().await.username, "Ada");
    assert_eq!(h.chat.assistant().sessions_created(), 2);

    let instructions = h.chat.assistant().session_instructions();
    let (_, context) = instructions.split_once("Here's the recent conversation history for context:\n\n").unwrap();
    let (carried, _) = context.split_once("\n\nPlease continue").unwrap();
    let lines: Vec<&str> = carried.lines().collect();
    assert!(lines.len() <= 3);
    assert_eq!(lines.last(), Some(&"User: call me Ada"));
}

#[tokio::test]
async fn overflow_twice_gives_up() {
    let backend = Backend::new(vec![Step::Overflow, Step::Overflow]);
    let mut h = harness(backend.clone());

    let reply = h.chat.send("hello").await;

    assert!(reply.starts_with("Sorry, I encountered an error processing your request after context reset"));
    assert_eq!(backend.calls(), 2);
    assert_eq!(h.chat.assistant().sessions_created(), 2);
}

#[tokio::test]
async fn backend_failure_is_apologised_for() {
    let backend = Backend::new(vec![Step::Fail]);
    let mut h = harness(backend.clone());

    let reply = h.chat.send("hello").await;

    assert!(reply.starts_with("Sorry, I encountered an error processing your request: "));
    assert_eq!(backend.calls(), 1);
    // The apology is still shown to the user
    let conversation = h.chat.conversation();
    assert_eq!(conversation.read().await.last().unwrap().content, reply);
}

#[tokio::test]
async fn local_window_triggers_rebuild() {
    // A window too small for any request makes both attempts overflow
    // without reaching the backend.
    let backend = Backend::new(vec![]);
    let config = SessionConfig {
        context_window_tokens: Some(1),
        ..SessionConfig::default()
    };
    let mut assistant = SettingsAssistant::new(
        backend.clone(),
        Arc::new(ToolRegistry::new()),
        config,
        Arc::new(EventBus::default()),
    );

    let reply = assistant.handle("hello").await;

    assert!(reply.contains("after context reset"));
    assert_eq!(backend.calls(), 0);
    assert_eq!(assistant.sessions_created(), 2);
}
