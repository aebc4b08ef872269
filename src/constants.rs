//! Global Constants
//!
//! Centralized constants for configuration and tuning.
//! All magic numbers should be defined here with documentation.

/// Retry policy defaults for remote providers
pub mod retry {
    /// Total attempts per `generate` call
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

    /// First exponential backoff delay (milliseconds)
    pub const INITIAL_BACKOFF_MS: u64 = 1000;

    /// Maximum delay between retries (seconds)
    pub const MAX_BACKOFF_SECS: u64 = 30;

    /// Fixed delay after a warm-up status (seconds)
    pub const OVERLOAD_DELAY_SECS: u64 = 10;

    /// Backoff multiplier
    pub const BACKOFF_FACTOR: u32 = 2;
}

/// Generation request defaults
pub mod generation {
    pub const DEFAULT_TEMPERATURE: f32 = 0.3;

    pub const DEFAULT_MAX_TOKENS: u32 = 1000;

    /// Upper bound accepted by config validation
    pub const MAX_TOKENS_LIMIT: u32 = 32_768;

    /// Sent by providers that take a system message
    pub const SYSTEM_PROMPT: &str =
        "You are a professional Python developer who writes excellent docstrings.";

    /// `X-Title` header value for OpenRouter
    pub const APP_TITLE: &str = "codex-docgen";
}

/// HTTP/Network constants
pub mod network {
    /// Per-attempt request timeout (seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Connection timeout (seconds)
    pub const CONNECTION_TIMEOUT_SECS: u64 = 10;
}

/// Prompt template constants
pub mod templates {
    pub const DEFAULT_DIR: &str = "prompts";

    pub const FUNCTION_PROMPT: &str = "function_prompt";
    pub const CLASS_PROMPT: &str = "class_prompt";
    pub const README_PROMPT: &str = "readme_prompt";

    pub const FUNCTION_PLACEHOLDER: &str = "{function_code}";
    pub const CLASS_PLACEHOLDER: &str = "{class_code}";
    pub const SOURCE_PLACEHOLDER: &str = "{source_code}";
}

/// File scanning constants
pub mod scanner {
    /// Maximum file size to analyze (1MB)
    pub const DEFAULT_MAX_FILE_SIZE: u64 = 1_048_576;

    /// Extension of files picked up by batch runs
    pub const SOURCE_EXTENSION: &str = "py";

    /// Directories never descended into
    pub const DEFAULT_SKIP_DIRS: &[&str] = &[
        "__pycache__",
        ".venv",
        "venv",
        ".tox",
        ".git",
        "build",
        "dist",
        "site-packages",
    ];
}

/// Batch processing constants
pub mod batch {
    /// Units generated at once (1 = sequential)
    pub const DEFAULT_CONCURRENCY: usize = 1;

    /// Upper bound accepted by config validation
    pub const MAX_CONCURRENCY: usize = 32;
}
