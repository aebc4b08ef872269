//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Global config (<config dir>/codex-docgen/config.toml)
//! 3. Project config (.docgen.toml)
//! 4. Environment variables (CODEX_DOCGEN_* prefix, `__` between levels)

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::types::Config;
use crate::types::{DocgenError, Result};

const APP_DIR: &str = "codex-docgen";
const PROJECT_CONFIG: &str = ".docgen.toml";
const ENV_PREFIX: &str = "CODEX_DOCGEN_";

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with full resolution chain using Figment:
    /// defaults → global → project → env vars
    pub fn load() -> Result<Config> {
        Self::load_with(Self::global_config_path(), Self::project_config_path())
    }

    /// Same chain with explicit file locations.
    pub fn load_with(global: Option<PathBuf>, project: PathBuf) -> Result<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(global_path) = global
            && global_path.exists()
        {
            debug!("Loading global config from: {}", global_path.display());
            figment = figment.merge(Toml::file(&global_path));
        }

        if project.exists() {
            debug!("Loading project config from: {}", project.display());
            figment = figment.merge(Toml::file(&project));
        }

        // e.g. CODEX_DOCGEN_LLM__MAX_TOKENS -> llm.max_tokens
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__").lowercase(true));

        let config = Self::extract(figment)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file only
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let config = Self::extract(
            Figment::new()
                .merge(Serialized::defaults(Config::default()))
                .merge(Toml::file(path)),
        )?;
        config.validate()?;
        Ok(config)
    }

    fn extract(figment: Figment) -> Result<Config> {
        figment
            .extract()
            .map_err(|e| DocgenError::Settings(format!("Configuration error: {}", e)))
    }

    // =========================================================================
    // Path Management
    // =========================================================================

    /// Platform config directory for this tool
    pub fn global_dir() -> Option<PathBuf> {
        directories::BaseDirs::new().map(|dirs| dirs.config_dir().join(APP_DIR))
    }

    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_dir().map(|dir| dir.join("config.toml"))
    }

    pub fn project_config_path() -> PathBuf {
        PathBuf::from(PROJECT_CONFIG)
    }

    // =========================================================================
    // Config Commands
    // =========================================================================

    /// Render the effective configuration as TOML or JSON
    pub fn render(config: &Config, as_json: bool) -> Result<String> {
        if as_json {
            Ok(serde_json::to_string_pretty(config)?)
        } else {
            toml::to_string_pretty(config).map_err(|e| DocgenError::Settings(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::provider::ProviderKind;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_defaults_without_files() {
        let dir = TempDir::new().unwrap();
        let config =
            ConfigLoader::load_with(None, dir.path().join("missing.toml")).unwrap();
        assert_eq!(config.llm.max_tokens, 1000);
    }

    #[test]
    fn test_project_overrides_global() {
        let dir = TempDir::new().unwrap();
        let global = dir.path().join("global.toml");
        let project = dir.path().join("project.toml");
        fs::write(&global, "[llm]\ntemperature = 0.5\nmax_tokens = 500\n").unwrap();
        fs::write(&project, "[llm]\nmax_tokens = 700\nprovider = \"openrouter\"\n").unwrap();

        let config = ConfigLoader::load_with(Some(global), project).unwrap();
        assert_eq!(config.llm.temperature, 0.5);
        assert_eq!(config.llm.max_tokens, 700);
        assert_eq!(config.llm.provider, Some(ProviderKind::OpenRouter));
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[llm]\ntemperature = 9.0\n").unwrap();
        assert!(ConfigLoader::load_from_file(&path).is_err());
    }

    #[test]
    fn test_render_toml_and_json() {
        let config = Config::default();
        let toml = ConfigLoader::render(&config, false).unwrap();
        assert!(toml.contains("[llm]"));
        let json = ConfigLoader::render(&config, true).unwrap();
        assert!(json.contains("\"fallback_chain\""));
    }
}
