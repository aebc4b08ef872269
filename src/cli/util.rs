//! CLI Common Utilities
//!
//! Shared initialization for command handlers: configuration, the
//! orchestrator built from it, and source-file validation.

use std::path::Path;

use crate::ai::GenerationOrchestrator;
use crate::analyzer::scanner::file_scanner::is_python_source;
use crate::config::{Config, ConfigLoader};
use crate::types::{DocgenError, Result};

/// Command execution context
pub struct CommandContext {
    pub config: Config,
    pub orchestrator: GenerationOrchestrator,
}

impl CommandContext {
    /// Load merged configuration and wire the orchestrator.
    pub fn load() -> Result<Self> {
        Self::from_config(ConfigLoader::load()?)
    }

    pub fn from_config(config: Config) -> Result<Self> {
        let orchestrator = GenerationOrchestrator::from_config(&config)?;
        Ok(Self {
            config,
            orchestrator,
        })
    }
}

/// Read a Python source file after checking it exists and has a `.py` suffix.
pub fn read_python_source(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(DocgenError::InvalidInput(format!(
            "File '{}' does not exist",
            path.display()
        )));
    }
    if !is_python_source(path) {
        return Err(DocgenError::InvalidInput(format!(
            "File '{}' is not a Python file",
            path.display()
        )));
    }
    Ok(std::fs::read_to_string(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_read_python_source() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("mod.py");
        fs::write(&source, "x = 1\n").unwrap();
        assert_eq!(read_python_source(&source).unwrap(), "x = 1\n");
    }

    #[test]
    fn test_rejects_other_suffix_and_missing() {
        let dir = TempDir::new().unwrap();
        let text = dir.path().join("notes.txt");
        fs::write(&text, "hello").unwrap();

        let err = read_python_source(&text).unwrap_err();
        assert!(err.to_string().contains("not a Python file"));

        let err = read_python_source(&dir.path().join("gone.py")).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }
}
