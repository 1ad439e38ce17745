//! `chatset chat`: Interactive or single-message settings chat.

use chatset_agent::{ConversationDisplay, SettingsChat, build_assistant};
use chatset_config::AppConfig;
use chatset_core::event::EventBus;
use chatset_core::message::{Conversation, Message, MessageKind};
use chatset_core::settings::SettingsAccessor;
use chatset_settings::{FilePhotoStore, InMemorySettingsStore};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::RwLock;

pub async fn run(message: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if !config.has_api_key() && config.provider.name != "ollama" {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    CHATSET_API_KEY = 'sk-...'");
        eprintln!("    OPENAI_API_KEY  = 'sk-...'");
        eprintln!();
        eprintln!("  Or add it to your config file:");
        eprintln!("    {}", AppConfig::config_path().display());
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }

    let provider = chatset_providers::build_from_config(&config)?;
    let store = Arc::new(
        InMemorySettingsStore::new(config.defaults.to_settings())
            .with_photo_store(Arc::new(FilePhotoStore::new(config.photo_dir()))),
    );
    let conversation = Arc::new(RwLock::new(Conversation::new()));
    let event_bus = Arc::new(EventBus::default());
    let assistant = build_assistant(
        &config,
        provider,
        store.clone(),
        store.clone(),
        Arc::new(ConversationDisplay::new(conversation.clone())),
        event_bus,
    );
    let mut chat = SettingsChat::new(assistant, conversation);

    if let Some(msg) = message {
        eprint!("  Thinking...");
        let reply = chat.send(&msg).await;
        eprint!("\r              \r");
        print_new(&chat, 1).await;
        println!("{reply}");
    } else {
        println!();
        println!("  chatset settings assistant");
        println!();
        println!("  Provider:  {}", config.provider.name);
        println!("  Model:     {}", config.model);
        println!();
        println!("  Commands:  /settings        show current settings");
        println!("             /photo <path>    upload a profile photo");
        println!("             exit             quit");
        println!();

        if let Some(greeting) = chat.open().await {
            println!("  Assistant > {greeting}");
        }
        let mut seen = chat.conversation().read().await.messages.len();

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            print!("  You > ");
            use std::io::Write;
            std::io::stdout().flush()?;

            let Some(line) = lines.next_line().await? else {
                break;
            };
            let input = line.trim();
            match input {
                "" => continue,
                "exit" | "quit" => break,
                "/settings" => {
                    for line in super::settings::render(&store.current().await) {
                        println!("    {line}");
                    }
                    continue;
                }
                _ => {}
            }
            if let Some(path) = input.strip_prefix("/photo ") {
                match tokio::fs::read(path.trim()).await {
                    Ok(bytes) => match store.set_profile_photo(&bytes).await {
                        Ok(handle) => println!("  Profile photo updated ({handle})"),
                        Err(e) => eprintln!("  Upload failed: {e}"),
                    },
                    Err(e) => eprintln!("  Could not read {}: {e}", path.trim()),
                }
                continue;
            }

            eprint!("  ...");
            let reply = chat.send(input).await;
            eprint!("\r     \r");
            // Skip the user's own message, print components, then the reply
            seen = print_new(&chat, seen + 1).await;
            println!("  Assistant > {reply}");
            println!();
        }
    }

    match store.cleanup_photos().await {
        Ok(0) => {}
        Ok(n) => tracing::info!(removed = n, "Removed unreferenced photos"),
        Err(e) => tracing::warn!(error = %e, "Photo cleanup failed"),
    }
    Ok(())
}

/// Print component markers for conversation messages from `from` on.
/// Returns the new conversation length.
async fn print_new(chat: &SettingsChat, from: usize) -> usize {
    let conversation = chat.conversation();
    let conversation = conversation.read().await;
    for message in conversation.messages.iter().skip(from) {
        if let Some(marker) = marker(message) {
            println!("  {marker}");
        }
    }
    conversation.messages.len()
}

fn marker(message: &Message) -> Option<String> {
    let name = match message.kind {
        MessageKind::Text => return None,
        MessageKind::UploadPhotos => "uploadPhotos",
        MessageKind::ColorPicker => "colorPicker",
        MessageKind::FontSizeSlider => "fontSizeSlider",
        MessageKind::OpacitySlider => "opacitySlider",
    };
    Some(format!("[{name} shown]"))
}
