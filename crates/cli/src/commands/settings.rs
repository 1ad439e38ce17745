//! `chatset settings`: show the snapshot a chat starts from.

use chatset_config::AppConfig;
use chatset_core::settings::{AppSettings, SettingId};
use chatset_tools::get_current_settings::describe;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    for line in render(&config.defaults.to_settings()) {
        println!("  {line}");
    }
    Ok(())
}

pub fn render(settings: &AppSettings) -> Vec<String> {
    SettingId::ALL.iter().map(|id| describe(*id, settings)).collect()
}
