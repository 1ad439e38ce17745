//! Completion backends for chatset.
//!
//! All backends implement the `chatset_core::Provider` trait. The only
//! backend shipped is the OpenAI-compatible chat-completions client, which
//! covers OpenAI, OpenRouter, Ollama, vLLM and similar endpoints.

pub mod openai_compat;

use chatset_core::error::ProviderError;
use chatset_core::provider::Provider;
use std::sync::Arc;

pub use openai_compat::OpenAiCompatProvider;

/// Build the configured backend.
///
/// A missing API key is only accepted for local Ollama endpoints.
pub fn build_from_config(config: &chatset_config::AppConfig) -> Result<Arc<dyn Provider>, ProviderError> {
    let name = config.provider.name.as_str();
    let api_key = match (&config.api_key, name) {
        (Some(key), _) => key.clone(),
        (None, "ollama") => "ollama".to_string(),
        (None, _) => {
            return Err(ProviderError::NotConfigured(format!(
                "no API key for provider '{name}'; set CHATSET_API_KEY or api_key in {}",
                chatset_config::AppConfig::config_path().display()
            )));
        }
    };
    Ok(Arc::new(OpenAiCompatProvider::new(name, &config.provider.api_url, api_key)))
}
