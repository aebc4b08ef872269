//! AI Integration Layer
//!
//! Provider abstraction, prompt templates and the generation orchestrator.

pub mod orchestrator;
pub mod prompt;
pub mod provider;
pub mod timeout;

pub use orchestrator::{GenerationOrchestrator, docstring_placeholder, readme_placeholder};
pub use prompt::{PromptBuilder, TemplateName, TemplateStore, render, render_readme};
pub use provider::{
    DefaultProviderFactory, LlmProvider, LlmResponse, OfflineProvider, ProviderFactory,
    ProviderKind, ProviderSettings, RemoteProvider, SharedProvider, TokenUsage, create_provider,
};
pub use timeout::with_timeout_map;
