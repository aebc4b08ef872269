//! Configuration Types
//!
//! All configuration structures with sensible defaults. Credentials are never
//! part of the configuration; they come from arguments or the environment.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::ai::provider::ProviderKind;
use crate::constants::{batch, generation, network, retry, templates};
use crate::types::{DocgenError, Result};

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// LLM provider settings
    pub llm: LlmConfig,

    /// Prompt template location
    pub templates: TemplatesConfig,

    /// Directory processing settings
    pub batch: BatchConfig,
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `DocgenError::Settings` on validation failure.
    pub fn validate(&self) -> Result<()> {
        let llm = &self.llm;

        if !(0.0..=2.0).contains(&llm.temperature) {
            return Err(DocgenError::Settings(format!(
                "LLM temperature must be between 0.0 and 2.0, got {}",
                llm.temperature
            )));
        }

        if llm.max_tokens == 0 || llm.max_tokens > generation::MAX_TOKENS_LIMIT {
            return Err(DocgenError::Settings(format!(
                "LLM max_tokens must be between 1 and {}, got {}",
                generation::MAX_TOKENS_LIMIT,
                llm.max_tokens
            )));
        }

        if llm.timeout_secs == 0 {
            return Err(DocgenError::Settings(
                "LLM timeout_secs must be greater than 0".to_string(),
            ));
        }

        if llm.max_retries == 0 {
            return Err(DocgenError::Settings(
                "LLM max_retries must be at least 1".to_string(),
            ));
        }

        if llm.initial_backoff_ms == 0 || llm.max_backoff_secs == 0 {
            return Err(DocgenError::Settings(
                "LLM backoff delays must be greater than 0".to_string(),
            ));
        }

        if llm.fallback_chain.is_empty() {
            return Err(DocgenError::Settings(
                "LLM fallback_chain must name at least one provider".to_string(),
            ));
        }

        for (name, value) in [("proxy", &llm.proxy), ("http_referer", &llm.http_referer)] {
            if let Some(value) = value.as_deref().filter(|v| !v.trim().is_empty()) {
                url::Url::parse(value).map_err(|e| {
                    DocgenError::Settings(format!("LLM {} is not a valid URL ({}): {}", name, value, e))
                })?;
            }
        }

        for key in llm.models.keys() {
            key.parse::<ProviderKind>().map_err(|_| {
                DocgenError::Settings(format!("Unknown provider in llm.models: {}", key))
            })?;
        }

        if self.batch.concurrency == 0 || self.batch.concurrency > batch::MAX_CONCURRENCY {
            return Err(DocgenError::Settings(format!(
                "Batch concurrency must be between 1 and {}, got {}",
                batch::MAX_CONCURRENCY,
                self.batch.concurrency
            )));
        }

        Ok(())
    }
}

// =============================================================================
// LLM Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Explicit provider; `None` walks `fallback_chain`
    pub provider: Option<ProviderKind>,

    /// Providers tried in order until one constructs
    pub fallback_chain: Vec<ProviderKind>,

    /// Temperature for generation (0.0 = deterministic)
    pub temperature: f32,

    /// Maximum tokens to generate
    pub max_tokens: u32,

    /// Per-attempt request timeout in seconds
    pub timeout_secs: u64,

    /// Total attempts per request
    pub max_retries: u32,

    /// Fixed delay after a warm-up status
    pub overload_delay_secs: u64,

    /// First exponential backoff delay
    pub initial_backoff_ms: u64,

    /// Backoff cap
    pub max_backoff_secs: u64,

    /// Proxy URL for every remote provider
    pub proxy: Option<String>,

    /// `HTTP-Referer` sent to OpenRouter
    pub http_referer: Option<String>,

    /// Model overrides keyed by provider name
    pub models: HashMap<String, String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: None,
            fallback_chain: ProviderKind::default_chain(),
            temperature: generation::DEFAULT_TEMPERATURE,
            max_tokens: generation::DEFAULT_MAX_TOKENS,
            timeout_secs: network::DEFAULT_TIMEOUT_SECS,
            max_retries: retry::DEFAULT_MAX_ATTEMPTS,
            overload_delay_secs: retry::OVERLOAD_DELAY_SECS,
            initial_backoff_ms: retry::INITIAL_BACKOFF_MS,
            max_backoff_secs: retry::MAX_BACKOFF_SECS,
            proxy: None,
            http_referer: None,
            models: HashMap::new(),
        }
    }
}

// =============================================================================
// Templates Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplatesConfig {
    /// Directory holding `<name>.txt` prompt templates
    pub dir: PathBuf,
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(templates::DEFAULT_DIR),
        }
    }
}

// =============================================================================
// Batch Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Units generated at once within a file
    pub concurrency: usize,

    /// Descend into subdirectories
    pub recursive: bool,

    /// Glob patterns skipped during scanning
    pub exclude: Vec<String>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            concurrency: batch::DEFAULT_CONCURRENCY,
            recursive: false,
            exclude: Vec::new(),
        }
    }
}
