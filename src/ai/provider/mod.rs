//! LLM Provider Abstraction
//!
//! Defines the LlmProvider trait for docstring generation.
//! All providers return `LlmResponse` with token usage metrics.
//!
//! ## Modules
//!
//! - `credentials`: explicit-argument-then-environment key lookup
//! - `retry`: retry state machine and clock seam
//! - `transport`: HTTP seam (`reqwest` in production, scripted in tests)
//! - `remote` / `endpoints`: the remote chat-completions services
//! - `offline`: deterministic stand-in that never needs a key

mod credentials;
mod endpoints;
mod offline;
mod remote;
mod retry;
mod transport;

pub use credentials::{CredentialSource, ProcessEnv, resolve_credential};
pub use endpoints::{RemoteSpec, remote_spec};
pub use offline::{OfflineProvider, render_skeleton};
pub use remote::RemoteProvider;
pub use retry::{
    FailureKind, RecordingSleeper, RetryDecision, RetryPolicy, RetrySchedule, Sleeper,
    TokioSleeper,
};
pub use transport::{
    HttpReply, HttpTransport, RecordedRequest, ReqwestTransport, ScriptedTransport,
    TransportError,
};

// Re-export error types from centralized location
pub use crate::types::{ErrorCategory, ErrorClassifier, LlmError};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use crate::config::LlmConfig;
use crate::constants::{generation, network};
use crate::types::{DocgenError, Result};

// =============================================================================
// Provider Kind
// =============================================================================

/// Closed set of provider selectors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[serde(alias = "mock")]
    Offline,
    DeepSeek,
    OpenAi,
    OpenRouter,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 4] = [
        ProviderKind::Offline,
        ProviderKind::DeepSeek,
        ProviderKind::OpenAi,
        ProviderKind::OpenRouter,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Offline => "offline",
            Self::DeepSeek => "deepseek",
            Self::OpenAi => "openai",
            Self::OpenRouter => "openrouter",
        }
    }

    pub fn is_remote(&self) -> bool {
        !matches!(self, Self::Offline)
    }

    /// Chain walked when no provider is named
    pub fn default_chain() -> Vec<ProviderKind> {
        vec![Self::DeepSeek, Self::OpenAi, Self::Offline]
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = DocgenError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "offline" | "mock" => Ok(Self::Offline),
            "deepseek" => Ok(Self::DeepSeek),
            "openai" => Ok(Self::OpenAi),
            "openrouter" => Ok(Self::OpenRouter),
            _ => Err(DocgenError::UnknownProvider(s.to_string())),
        }
    }
}

// =============================================================================
// LLM Response with Usage Metrics
// =============================================================================

/// Generated text plus usage, timing and attempt count
#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub content: String,
    pub usage: TokenUsage,
    pub timing: ResponseTiming,
    pub metadata: ResponseMetadata,
    /// Requests issued, including the successful one
    pub attempts: u32,
}

/// Token usage metrics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Input tokens (prompt)
    pub input_tokens: u32,
    /// Output tokens (response)
    pub output_tokens: u32,
}

impl TokenUsage {
    /// Total tokens used (input + output)
    pub fn total(&self) -> u32 {
        self.input_tokens + self.output_tokens
    }

    /// Create from OpenAI-style usage response
    pub fn from_openai(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            input_tokens: prompt_tokens,
            output_tokens: completion_tokens,
        }
    }
}

/// Response timing metrics
#[derive(Debug, Clone, Default)]
pub struct ResponseTiming {
    /// Total response time in milliseconds (wall clock, all attempts)
    pub total_ms: u64,
}

impl ResponseTiming {
    pub fn from_duration(duration: Duration) -> Self {
        Self {
            total_ms: duration.as_millis() as u64,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ResponseMetadata {
    pub model: String,
    pub provider: String,
}

/// Shared LLM provider type for concurrent access across units.
pub type SharedProvider = Arc<dyn LlmProvider + Send + Sync>;

// =============================================================================
// Provider Settings
// =============================================================================

/// Non-secret knobs shared by every provider a factory builds
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub temperature: f32,
    pub max_tokens: u32,
    /// Per-attempt request timeout
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    pub retry: RetryPolicy,
    /// Proxy URL applied to every remote provider
    pub proxy: Option<String>,
    pub http_referer: Option<String>,
    /// Model overrides keyed by provider token
    pub models: HashMap<String, String>,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            temperature: generation::DEFAULT_TEMPERATURE,
            max_tokens: generation::DEFAULT_MAX_TOKENS,
            request_timeout: Duration::from_secs(network::DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(network::CONNECTION_TIMEOUT_SECS),
            retry: RetryPolicy::default(),
            proxy: None,
            http_referer: None,
            models: HashMap::new(),
        }
    }
}

impl ProviderSettings {
    pub fn model_for(&self, kind: ProviderKind, default: &str) -> String {
        self.models
            .get(kind.as_str())
            .filter(|m| !m.trim().is_empty())
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }
}

impl From<&LlmConfig> for ProviderSettings {
    fn from(config: &LlmConfig) -> Self {
        Self {
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            request_timeout: Duration::from_secs(config.timeout_secs),
            connect_timeout: Duration::from_secs(network::CONNECTION_TIMEOUT_SECS),
            retry: RetryPolicy {
                max_attempts: config.max_retries,
                initial_backoff: Duration::from_millis(config.initial_backoff_ms),
                max_backoff: Duration::from_secs(config.max_backoff_secs),
                overload_delay: Duration::from_secs(config.overload_delay_secs),
            },
            proxy: config.proxy.clone(),
            http_referer: config.http_referer.clone(),
            models: config.models.clone(),
        }
    }
}

// =============================================================================
// LLM Provider Trait
// =============================================================================

#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Turn a rendered prompt into generated text.
    ///
    /// Remote providers retry internally; an `Err` means every attempt failed.
    async fn generate(&self, prompt: &str) -> Result<LlmResponse>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// Model name currently in use
    fn model(&self) -> &str;
}

// =============================================================================
// Provider Factory
// =============================================================================

/// Builds providers by kind; construction is where credentials are checked
pub trait ProviderFactory: Send + Sync {
    fn create(&self, kind: ProviderKind, credential: Option<&str>) -> Result<SharedProvider>;
}

/// Factory wiring the real transport, clock and process environment
pub struct DefaultProviderFactory {
    settings: ProviderSettings,
    credentials: Arc<dyn CredentialSource>,
    transport: Arc<dyn HttpTransport>,
    sleeper: Arc<dyn Sleeper>,
}

impl DefaultProviderFactory {
    pub fn new(settings: ProviderSettings) -> Result<Self> {
        let transport = ReqwestTransport::new(settings.connect_timeout, settings.proxy.as_deref())?;
        Ok(Self::with_parts(
            settings,
            Arc::new(ProcessEnv),
            Arc::new(transport),
            Arc::new(TokioSleeper),
        ))
    }

    pub fn with_parts(
        settings: ProviderSettings,
        credentials: Arc<dyn CredentialSource>,
        transport: Arc<dyn HttpTransport>,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        Self {
            settings,
            credentials,
            transport,
            sleeper,
        }
    }
}

impl ProviderFactory for DefaultProviderFactory {
    fn create(&self, kind: ProviderKind, credential: Option<&str>) -> Result<SharedProvider> {
        match remote_spec(kind) {
            None => Ok(Arc::new(OfflineProvider::new())),
            Some(spec) => Ok(Arc::new(RemoteProvider::new(
                spec,
                credential,
                &self.settings,
                self.credentials.as_ref(),
                self.transport.clone(),
                self.sleeper.clone(),
            )?)),
        }
    }
}

/// Create a shared provider with the production transport
pub fn create_provider(
    kind: ProviderKind,
    credential: Option<&str>,
    settings: &ProviderSettings,
) -> Result<SharedProvider> {
    DefaultProviderFactory::new(settings.clone())?.create(kind, credential)
}
