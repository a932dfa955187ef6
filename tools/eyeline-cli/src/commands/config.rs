//! Show or persist the effective configuration.

use std::path::PathBuf;

use eyeline_common::config::{config_file_path, AppConfig};

pub fn run(config: &AppConfig, path: Option<PathBuf>, save: bool) -> anyhow::Result<()> {
    let path = path.unwrap_or_else(config_file_path);

    if save {
        config
            .save_to(&path)
            .map_err(|e| anyhow::anyhow!("Failed to save config: {e}"))?;
        eprintln!("Saved configuration to {}", path.display());
    } else {
        eprintln!("Config path: {}", path.display());
    }

    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}
