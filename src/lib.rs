//! codex-docgen - AI-Assisted Python Documentation Generator
//!
//! Extracts functions, classes, imports and metrics from Python source with
//! tree-sitter, then generates docstrings per unit through interchangeable
//! LLM providers with retry, backoff and a construction-time fallback chain.
//!
//! ## Quick Start
//!
//! ```ignore
//! use codex_docgen::{Config, GenerationOrchestrator, GenerationRequest, extract_functions};
//!
//! let functions = extract_functions("def add(a, b):\n    return a + b\n")?;
//! let orchestrator = GenerationOrchestrator::from_config(&Config::default())?;
//! let request = GenerationRequest::for_function(&functions[0]);
//! let result = orchestrator.document(&request).await;
//! println!("{}", result.text);
//! ```
//!
//! ## Modules
//!
//! - [`analyzer`]: tree-sitter extraction and file scanning
//! - [`ai`]: providers, prompt templates and the generation orchestrator
//! - [`config`]: layered configuration
//! - [`cli`]: command handlers used by the binary

pub mod ai;
pub mod analyzer;
pub mod cli;
pub mod config;
pub mod constants;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{Config, ConfigLoader};

// Error Types
pub use types::error::{DocgenError, ErrorCategory, LlmError, Result};

// Records
pub use types::{
    ClassRecord, ComplexityMetrics, FunctionRecord, GenerationRequest, GenerationResult,
    ImportKind, ImportRecord, UnitId, UnitKind,
};

// =============================================================================
// AI Re-exports
// =============================================================================

pub use ai::{
    GenerationOrchestrator, LlmProvider, LlmResponse, OfflineProvider, ProviderKind,
    TemplateStore, create_provider,
};

// =============================================================================
// Analyzer Re-exports
// =============================================================================

pub use analyzer::{
    Extractor, PythonExtractor, SourceAnalysis,
    parser::{analyze, analyze_complexity, extract_classes, extract_functions, extract_imports},
    scanner::FileScanner,
};
