//! Config Command
//!
//! Usage:
//!   codex-docgen config show [-f json]
//!   codex-docgen config path

use crate::config::ConfigLoader;
use crate::types::Result;

/// Print the merged effective configuration
pub fn show(format: &str) -> Result<()> {
    let config = ConfigLoader::load()?;
    println!("{}", ConfigLoader::render(&config, format == "json")?);
    Ok(())
}

/// Print configuration file locations and whether they exist
pub fn path() -> Result<()> {
    match ConfigLoader::global_config_path() {
        Some(global) => println!("Global:  {} ({})", global.display(), existence(global.exists())),
        None => println!("Global:  (no config directory on this platform)"),
    }

    let project = ConfigLoader::project_config_path();
    println!("Project: {} ({})", project.display(), existence(project.exists()));
    Ok(())
}

fn existence(exists: bool) -> &'static str {
    if exists { "found" } else { "not found" }
}
