//! Unified Error Type System
//!
//! Centralized error types for extraction and generation.
//! Provides HTTP-status classification for retry decisions.
//!
//! ## Error Categories
//!
//! - **Transient**: Temporary server issues (retry with backoff)
//! - **RateLimit**: API rate limiting (retry with backoff)
//! - **Network**: Connectivity issues and timeouts (retry with backoff)
//! - **Auth**: Authentication failures (fail fast)
//! - **BadRequest**: Rejected request (fail fast)
//! - **Unavailable**: Endpoint missing (fail fast)
//!
//! ## Propagation
//!
//! - Parse errors are hard failures for the affected input
//! - Generation errors are soft failures, turned into placeholders per unit

use std::time::Duration;
use thiserror::Error;

// =============================================================================
// Error Categories
// =============================================================================

/// Error categories used for retry decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Rate limited - back off then retry
    RateLimit,
    /// Authentication failed - fail fast, don't retry
    Auth,
    /// Network/connectivity issues - retry with backoff
    Network,
    /// Endpoint unavailable - fail fast
    Unavailable,
    /// Invalid request - don't retry, fix request
    BadRequest,
    /// Response body could not be interpreted
    ParseError,
    /// Temporary server issues - retry same provider
    Transient,
    /// Unknown error
    Unknown,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RateLimit => write!(f, "RATE_LIMIT"),
            Self::Auth => write!(f, "AUTH"),
            Self::Network => write!(f, "NETWORK"),
            Self::Unavailable => write!(f, "UNAVAILABLE"),
            Self::BadRequest => write!(f, "BAD_REQUEST"),
            Self::ParseError => write!(f, "PARSE_ERROR"),
            Self::Transient => write!(f, "TRANSIENT"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

impl ErrorCategory {
    /// Check if this category is retryable on the same provider
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimit | Self::Network | Self::Transient)
    }
}

// =============================================================================
// LLM Error
// =============================================================================

/// Provider failure with category and attempt context
#[derive(Debug, Clone)]
pub struct LlmError {
    /// Error category for routing decisions
    pub category: ErrorCategory,
    /// Detailed error message (the underlying cause)
    pub message: String,
    /// Provider that produced the error
    pub provider: Option<String>,
    /// Number of requests issued before giving up
    pub attempts: u32,
}

impl std::fmt::Display for LlmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.provider {
            Some(provider) => write!(f, "[{}:{}] {}", provider, self.category, self.message)?,
            None => write!(f, "[{}] {}", self.category, self.message)?,
        }
        if self.attempts > 1 {
            write!(f, " (after {} attempts)", self.attempts)?;
        }
        Ok(())
    }
}

impl std::error::Error for LlmError {}

impl LlmError {
    pub fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
            provider: None,
            attempts: 0,
        }
    }

    pub fn with_provider(
        category: ErrorCategory,
        message: impl Into<String>,
        provider: impl Into<String>,
    ) -> Self {
        Self {
            category,
            message: message.into(),
            provider: Some(provider.into()),
            attempts: 0,
        }
    }

    /// Record how many requests were issued
    pub fn attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }

    pub fn is_retryable(&self) -> bool {
        self.category.is_retryable()
    }
}

// =============================================================================
// Error Classifier
// =============================================================================

/// Maps transport outcomes onto error categories
pub struct ErrorClassifier;

impl ErrorClassifier {
    /// Classify an HTTP status code
    pub fn classify_http_status(status: u16, message: &str, provider: &str) -> LlmError {
        let category = match status {
            429 => ErrorCategory::RateLimit,
            401 | 403 => ErrorCategory::Auth,
            400 | 422 => ErrorCategory::BadRequest,
            404 => ErrorCategory::Unavailable,
            408 => ErrorCategory::Network,
            500..=599 => ErrorCategory::Transient,
            _ => ErrorCategory::Unknown,
        };
        LlmError::with_provider(category, message, provider)
    }

    /// Classify a transport-level failure (no HTTP response received)
    pub fn classify_transport(message: &str, provider: &str) -> LlmError {
        LlmError::with_provider(ErrorCategory::Network, message, provider)
    }
}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum DocgenError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // -------------------------------------------------------------------------
    // Extraction Errors
    // -------------------------------------------------------------------------
    /// Input does not parse under the Python grammar
    #[error("Invalid Python syntax at line {line}, column {column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    // -------------------------------------------------------------------------
    // Provider Errors
    // -------------------------------------------------------------------------
    /// Provider cannot be constructed (no usable credential)
    #[error("Configuration error for {provider}: {message}")]
    Configuration { provider: String, message: String },

    /// Remote generation failed after retries were exhausted
    #[error("Provider error: {0}")]
    Provider(LlmError),

    #[error("Unknown provider: {0}. Supported: offline, deepseek, openai, openrouter")]
    UnknownProvider(String),

    /// Operation exceeded its deadline
    #[error("Timeout after {duration:?}: {operation}")]
    Timeout {
        operation: String,
        duration: Duration,
    },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Template '{name}' unavailable: {reason}")]
    Template { name: String, reason: String },

    #[error("Settings error: {0}")]
    Settings(String),

    // -------------------------------------------------------------------------
    // Input Errors
    // -------------------------------------------------------------------------
    /// Path rejected before any work starts (missing, wrong suffix, not a directory)
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<LlmError> for DocgenError {
    fn from(err: LlmError) -> Self {
        DocgenError::Provider(err)
    }
}

pub type Result<T> = std::result::Result<T, DocgenError>;

// =============================================================================
// Helper Functions
// =============================================================================

impl DocgenError {
    pub fn timeout(operation: impl Into<String>, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    pub fn configuration(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Configuration {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Construction-time failure that permits falling back to the next provider
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }

    pub fn is_syntax(&self) -> bool {
        matches!(self, Self::Syntax { .. })
    }
}

// =============================================================================
// Tests
// =============================================================================
