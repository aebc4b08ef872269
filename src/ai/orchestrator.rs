//! Generation Orchestrator
//!
//! Resolves a provider (explicit or via the fallback chain), renders the
//! prompt, runs generation and turns failures into placeholders so one unit
//! never aborts a batch.
//!
//! Resolution only falls through the chain on *construction* failures. Once
//! a provider exists, its `generate` errors propagate.

use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::prompt::{TemplateName, TemplateStore, render, render_readme};
use super::provider::{
    DefaultProviderFactory, ProviderFactory, ProviderKind, ProviderSettings, SharedProvider,
};
use crate::config::Config;
use crate::types::{DocgenError, GenerationRequest, GenerationResult, Result, UnitKind};

pub struct GenerationOrchestrator {
    factory: Arc<dyn ProviderFactory>,
    chain: Vec<ProviderKind>,
    templates: TemplateStore,
}

impl GenerationOrchestrator {
    pub fn new(factory: Arc<dyn ProviderFactory>, templates: TemplateStore) -> Self {
        Self {
            factory,
            chain: ProviderKind::default_chain(),
            templates,
        }
    }

    /// Production wiring from loaded configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let factory = DefaultProviderFactory::new(ProviderSettings::from(&config.llm))?;
        let templates = TemplateStore::load(&config.templates.dir);
        Ok(Self::new(Arc::new(factory), templates).with_chain(config.llm.fallback_chain.clone()))
    }

    pub fn with_chain(mut self, chain: Vec<ProviderKind>) -> Self {
        self.chain = chain;
        self
    }

    pub fn templates(&self) -> &TemplateStore {
        &self.templates
    }

    /// Explicit selector: construct it or fail. No selector: first chain
    /// entry that constructs. An explicit credential only applies to an
    /// explicit selector.
    pub fn resolve_provider(
        &self,
        selector: Option<ProviderKind>,
        credential: Option<&str>,
    ) -> Result<SharedProvider> {
        if let Some(kind) = selector {
            let provider = self.factory.create(kind, credential)?;
            info!("Using provider {} (model: {})", provider.name(), provider.model());
            return Ok(provider);
        }

        if credential.is_some() {
            warn!("Explicit API key ignored: no provider selected");
        }

        let mut last_error = None;
        for kind in &self.chain {
            match self.factory.create(*kind, None) {
                Ok(provider) => {
                    info!("Using provider {} (model: {})", provider.name(), provider.model());
                    return Ok(provider);
                }
                Err(e) if e.is_configuration() => {
                    warn!("Provider {} unavailable, falling back: {}", kind, e);
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| {
            DocgenError::configuration("fallback chain", "no providers configured")
        }))
    }

    /// Generate documentation text for one unit body.
    pub async fn generate_documentation(
        &self,
        kind: UnitKind,
        body: &str,
        selector: Option<ProviderKind>,
        credential: Option<&str>,
        template: Option<&str>,
    ) -> Result<String> {
        let provider = self.resolve_provider(selector, credential)?;
        let template = match template {
            Some(text) => text.to_string(),
            None => self.templates.get(TemplateName::for_unit(kind)),
        };

        let prompt = render(&template, kind, body);
        let response = provider.generate(&prompt).await?;
        debug!(
            provider = %response.metadata.provider,
            attempts = response.attempts,
            tokens = response.usage.total(),
            elapsed_ms = response.timing.total_ms,
            "Generation finished"
        );
        Ok(response.content.trim().to_string())
    }

    /// Generate for one request; failures become a placeholder.
    pub async fn document(&self, request: &GenerationRequest) -> GenerationResult {
        let outcome = self
            .generate_documentation(
                request.unit_kind,
                &request.body,
                request.provider,
                request.credential.as_deref(),
                request.template.as_deref(),
            )
            .await;

        let (text, succeeded) = match outcome {
            Ok(text) => {
                info!("Documented {}", request.unit_id);
                (text, true)
            }
            Err(e) => {
                warn!("Failed to document {}: {}", request.unit_id, e);
                (docstring_placeholder(&e), false)
            }
        };

        GenerationResult {
            unit_id: request.unit_id.clone(),
            name: request.name.clone(),
            unit_kind: request.unit_kind,
            text,
            original: request.body.clone(),
            succeeded,
        }
    }

    /// Document every request, up to `concurrency` at once, in input order.
    pub async fn document_all(
        &self,
        requests: &[GenerationRequest],
        concurrency: usize,
    ) -> Vec<GenerationResult> {
        stream::iter(requests.iter().map(|request| self.document(request)))
            .buffered(concurrency.max(1))
            .collect()
            .await
    }

    /// README section for a whole source file, or a placeholder.
    pub async fn generate_readme(
        &self,
        source: &str,
        selector: Option<ProviderKind>,
        credential: Option<&str>,
    ) -> String {
        let outcome = async {
            let provider = self.resolve_provider(selector, credential)?;
            let prompt = render_readme(&self.templates.get(TemplateName::Readme), source);
            let response = provider.generate(&prompt).await?;
            Ok::<_, DocgenError>(response.content.trim().to_string())
        }
        .await;

        outcome.unwrap_or_else(|e| {
            warn!("Failed to generate README: {}", e);
            readme_placeholder(&e)
        })
    }
}

pub fn docstring_placeholder(error: &DocgenError) -> String {
    format!(
        "# Error generating docstring: {}\n# Please add documentation manually.",
        error
    )
}

pub fn readme_placeholder(error: &DocgenError) -> String {
    format!("# Error generating README: {}", error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::provider::{LlmProvider, LlmResponse, ResponseMetadata, TokenUsage};
    use crate::types::{ErrorCategory, LlmError, UnitId};
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Echoes the prompt, or fails when it contains "boom"
    struct EchoProvider {
        name: &'static str,
        calls: Arc<AtomicU32>,
    }

    #[async_trait]
    impl LlmProvider for EchoProvider {
        async fn generate(&self, prompt: &str) -> Result<LlmResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if prompt.contains("boom") {
                return Err(DocgenError::Provider(
                    LlmError::with_provider(ErrorCategory::Transient, "HTTP 500: boom", self.name)
                        .attempts(3),
                ));
            }
            Ok(LlmResponse {
                content: format!("  [{}] {}\n", self.name, prompt),
                usage: TokenUsage::default(),
                timing: Default::default(),
                metadata: ResponseMetadata {
                    model: "echo".to_string(),
                    provider: self.name.to_string(),
                },
                attempts: 1,
            })
        }

        fn name(&self) -> &str {
            self.name
        }

        fn model(&self) -> &str {
            "echo"
        }
    }

    /// Fails construction for kinds in `missing`, records what it builds
    struct StubFactory {
        missing: HashSet<ProviderKind>,
        created: Mutex<Vec<ProviderKind>>,
        calls: Arc<AtomicU32>,
    }

    impl StubFactory {
        fn new(missing: &[ProviderKind]) -> Self {
            Self {
                missing: missing.iter().copied().collect(),
                created: Mutex::new(Vec::new()),
                calls: Arc::new(AtomicU32::new(0)),
            }
        }

        fn created(&self) -> Vec<ProviderKind> {
            self.created.lock().unwrap().clone()
        }
    }

    impl ProviderFactory for StubFactory {
        fn create(&self, kind: ProviderKind, _credential: Option<&str>) -> Result<SharedProvider> {
            if self.missing.contains(&kind) {
                return Err(DocgenError::configuration(kind.as_str(), "API key is required"));
            }
            self.created.lock().unwrap().push(kind);
            Ok(Arc::new(EchoProvider {
                name: kind.as_str(),
                calls: self.calls.clone(),
            }))
        }
    }

    fn orchestrator(factory: Arc<StubFactory>) -> GenerationOrchestrator {
        GenerationOrchestrator::new(factory, TemplateStore::builtin())
    }

    fn request(name: &str, body: &str) -> GenerationRequest {
        GenerationRequest {
            unit_id: UnitId::new(UnitKind::Function, name, 1),
            name: name.to_string(),
            unit_kind: UnitKind::Function,
            body: body.to_string(),
            provider: None,
            credential: None,
            template: Some("{function_code}".to_string()),
        }
    }

    #[tokio::test]
    async fn test_chain_skips_unconstructible_provider() {
        let factory = Arc::new(StubFactory::new(&[ProviderKind::DeepSeek]));
        let orch = orchestrator(factory.clone());

        let text = orch
            .generate_documentation(UnitKind::Function, "def f(): pass", None, None, Some("{function_code}"))
            .await
            .unwrap();

        assert_eq!(text, "[openai] def f(): pass");
        assert_eq!(factory.created(), vec![ProviderKind::OpenAi]);
        assert_eq!(factory.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_chain_falls_back_to_offline() {
        let factory = Arc::new(StubFactory::new(&[ProviderKind::DeepSeek, ProviderKind::OpenAi]));
        let provider = orchestrator(factory.clone()).resolve_provider(None, None).unwrap();
        assert_eq!(provider.name(), "offline");
    }

    #[tokio::test]
    async fn test_generate_failure_does_not_fall_through() {
        let factory = Arc::new(StubFactory::new(&[]));
        let orch = orchestrator(factory.clone());

        let err = orch
            .generate_documentation(UnitKind::Function, "boom", None, None, Some("{function_code}"))
            .await
            .unwrap_err();

        assert!(matches!(err, DocgenError::Provider(_)));
        assert_eq!(factory.created(), vec![ProviderKind::DeepSeek]);
    }

    #[tokio::test]
    async fn test_explicit_provider_configuration_error_surfaces() {
        let factory = Arc::new(StubFactory::new(&[ProviderKind::OpenRouter]));
        let err = orchestrator(factory.clone())
            .resolve_provider(Some(ProviderKind::OpenRouter), Some("key"))
            .err()
            .expect("expected error");
        assert!(err.is_configuration());
        assert!(factory.created().is_empty());
    }

    #[tokio::test]
    async fn test_exhausted_chain_reports_last_configuration_error() {
        let factory = Arc::new(StubFactory::new(&ProviderKind::ALL));
        let err = orchestrator(factory).resolve_provider(None, None).err().expect("expected error");
        assert!(err.is_configuration());
    }

    #[tokio::test]
    async fn test_document_turns_failure_into_placeholder() {
        let orch = orchestrator(Arc::new(StubFactory::new(&[])));
        let result = orch.document(&request("f", "boom")).await;

        assert!(!result.succeeded);
        assert!(result.text.starts_with("# Error generating docstring: "));
        assert!(result.text.ends_with("# Please add documentation manually."));
        assert!(result.text.contains("boom"));
        assert_eq!(result.original, "boom");
    }

    #[tokio::test]
    async fn test_document_all_preserves_order_and_continues() {
        let orch = orchestrator(Arc::new(StubFactory::new(&[])));
        let requests = vec![request("a", "one"), request("b", "boom"), request("c", "three")];

        for concurrency in [1, 3] {
            let results = orch.document_all(&requests, concurrency).await;
            let names: Vec<_> = results.iter().map(|r| r.name.as_str()).collect();
            assert_eq!(names, vec!["a", "b", "c"]);
            assert!(results[0].succeeded);
            assert!(!results[1].succeeded);
            assert!(results[2].succeeded);
            assert_eq!(results[2].text, "[deepseek] three");
        }
    }

    #[tokio::test]
    async fn test_builtin_template_used_without_override() {
        let orch = orchestrator(Arc::new(StubFactory::new(&[])));
        let text = orch
            .generate_documentation(UnitKind::Class, "class C: pass", None, None, None)
            .await
            .unwrap();
        assert!(text.contains("class C: pass"));
        assert!(text.contains("PEP-257"));
    }

    #[tokio::test]
    async fn test_readme_placeholder() {
        let orch = orchestrator(Arc::new(StubFactory::new(&ProviderKind::ALL)));
        let text = orch.generate_readme("x = 1", None, None).await;
        assert!(text.starts_with("# Error generating README: "));
    }
}
