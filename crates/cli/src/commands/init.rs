//! `chatset init`: write the default config file.

use chatset_config::AppConfig;
use std::path::Path;

pub fn run(force: bool) -> Result<(), Box<dyn std::error::Error>> {
    let path = AppConfig::config_path();
    if write_default(&path, force)? {
        println!("Wrote default config to {}", path.display());
        println!("Set api_key there or export CHATSET_API_KEY before running `chatset chat`.");
    } else {
        println!("Config already exists at {} (use --force to overwrite)", path.display());
    }
    Ok(())
}

/// Write the default config to `path`. Returns `false` when a file already
/// exists and `force` is not set.
fn write_default(path: &Path, force: bool) -> std::io::Result<bool> {
    if path.exists() && !force {
        return Ok(false);
    }
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::write(path, AppConfig::default_toml())?;
    Ok(true)
}
