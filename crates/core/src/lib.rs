//! # chatset core
//!
//! Domain types, traits, and error definitions for the chatset settings
//! assistant. This crate has **no framework dependencies**; it defines the
//! domain model that the other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every collaborator the assistant talks to is a trait here: the completion
//! backend, the tools, the settings store, the UI surface, the photo store.
//! Implementations live in their respective crates. This enables:
//! - Swapping the completion backend via configuration
//! - Testing the orchestrator with scripted backends and in-memory stores
//! - A clean dependency graph (all crates depend inward on core)

pub mod error;
pub mod event;
pub mod message;
pub mod photo;
pub mod provider;
pub mod settings;
pub mod tool;
pub mod ui;

// Re-export key types at crate root for ergonomics
pub use error::{Error, ProviderError, Result, SettingsError, ToolError};
pub use event::{DomainEvent, EventBus};
pub use message::{Conversation, ConversationId, Message, MessageKind, MessageToolCall, Role};
pub use photo::{PhotoHandle, PhotoStore};
pub use provider::{Provider, ProviderRequest, ProviderResponse, ToolDefinition, Usage};
pub use settings::{
    AppSettings, SettingChange, SettingId, SettingValue, SettingsAccessor, SettingsMutator, UnknownSetting,
};
pub use tool::{Tool, ToolCall, ToolRegistry, ToolResult};
pub use ui::{UiComponent, UiDisplay};
