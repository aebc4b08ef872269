//! Remote chat-completions provider.
//!
//! One implementation serves every remote service; the differences (endpoint,
//! credential variables, system message, warm-up status, attribution headers)
//! live in a `RemoteSpec`.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::credentials::{CredentialSource, resolve_credential};
use super::endpoints::RemoteSpec;
use super::retry::{FailureKind, RetryDecision, RetryPolicy, RetrySchedule, Sleeper};
use super::transport::{HttpReply, HttpTransport};
use super::{
    LlmProvider, LlmResponse, ProviderSettings, ResponseMetadata, ResponseTiming, TokenUsage,
};
use crate::ai::timeout::with_timeout_map;
use crate::constants::generation;
use crate::types::{DocgenError, ErrorCategory, ErrorClassifier, LlmError, Result};

/// Longest slice of an error body carried into messages
const MAX_ERROR_BODY_CHARS: usize = 200;

pub struct RemoteProvider {
    spec: &'static RemoteSpec,
    /// API key stored securely - never exposed in logs or debug output
    api_key: SecretString,
    model: String,
    temperature: f32,
    max_tokens: u32,
    request_timeout: Duration,
    retry: RetryPolicy,
    http_referer: Option<String>,
    transport: Arc<dyn HttpTransport>,
    sleeper: Arc<dyn Sleeper>,
}

impl std::fmt::Debug for RemoteProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteProvider")
            .field("provider", &self.spec.kind)
            .field("api_key", &"[REDACTED]")
            .field("endpoint", &self.spec.endpoint)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl RemoteProvider {
    /// Construct a provider, failing with a configuration error when no
    /// credential resolves.
    pub fn new(
        spec: &'static RemoteSpec,
        credential: Option<&str>,
        settings: &ProviderSettings,
        credentials: &dyn CredentialSource,
        transport: Arc<dyn HttpTransport>,
        sleeper: Arc<dyn Sleeper>,
    ) -> Result<Self> {
        let api_key = resolve_credential(credential, spec.env_vars, credentials).ok_or_else(|| {
            DocgenError::configuration(
                spec.kind.as_str(),
                format!(
                    "API key is required. Set {} or pass an explicit key",
                    spec.env_vars.join(" or ")
                ),
            )
        })?;

        Ok(Self {
            spec,
            api_key,
            model: settings.model_for(spec.kind, spec.default_model),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
            request_timeout: settings.request_timeout,
            retry: settings.retry.clone(),
            http_referer: settings
                .http_referer
                .clone()
                .filter(|r| !r.trim().is_empty()),
            transport,
            sleeper,
        })
    }

    fn build_request(&self, prompt: &str) -> ChatCompletionRequest {
        let mut messages = Vec::with_capacity(2);
        if self.spec.system_message {
            messages.push(ChatMessage {
                role: "system".to_string(),
                content: generation::SYSTEM_PROMPT.to_string(),
            });
        }
        messages.push(ChatMessage {
            role: "user".to_string(),
            content: prompt.to_string(),
        });

        ChatCompletionRequest {
            model: self.model.clone(),
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }

    fn headers(&self) -> Vec<(String, String)> {
        let mut headers = vec![
            (
                "Authorization".to_string(),
                format!("Bearer {}", self.api_key.expose_secret()),
            ),
            ("Content-Type".to_string(), "application/json".to_string()),
            ("Accept".to_string(), "application/json".to_string()),
        ];
        if self.spec.attribution_headers {
            headers.push(("X-Title".to_string(), generation::APP_TITLE.to_string()));
            if let Some(referer) = &self.http_referer {
                headers.push(("HTTP-Referer".to_string(), referer.clone()));
            }
        }
        headers
    }

    /// Map a non-2xx reply onto a failure kind and its error.
    fn classify_status(&self, reply: &HttpReply) -> (FailureKind, LlmError) {
        let name = self.spec.kind.as_str();
        let message = format!("HTTP {}: {}", reply.status, truncate(&reply.body));

        if self.spec.warmup_status == Some(reply.status) {
            let error = LlmError::with_provider(ErrorCategory::Unavailable, message, name);
            return (FailureKind::Overloaded, error);
        }

        let error = ErrorClassifier::classify_http_status(reply.status, &message, name);
        let kind = if error.is_retryable() {
            FailureKind::Retryable
        } else {
            FailureKind::Terminal
        };
        (kind, error)
    }

    fn parse_reply(&self, reply: &HttpReply) -> std::result::Result<(String, TokenUsage), LlmError> {
        let name = self.spec.kind.as_str();
        let body: ChatCompletionResponse = serde_json::from_str(&reply.body).map_err(|e| {
            LlmError::with_provider(
                ErrorCategory::ParseError,
                format!("Failed to parse response: {}", e),
                name,
            )
        })?;

        let usage = body
            .usage
            .map(|u| TokenUsage::from_openai(u.prompt_tokens, u.completion_tokens))
            .unwrap_or_default();

        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| {
                LlmError::with_provider(ErrorCategory::ParseError, "No content in response", name)
            })?;

        Ok((content, usage))
    }
}

#[async_trait]
impl LlmProvider for RemoteProvider {
    async fn generate(&self, prompt: &str) -> Result<LlmResponse> {
        let name = self.spec.kind.as_str();
        info!(
            "Generating with {} (model: {}, temperature: {})",
            name, self.model, self.temperature
        );

        let body = serde_json::to_value(self.build_request(prompt))?;
        let headers = self.headers();
        let start_time = Instant::now();
        let mut schedule = RetrySchedule::new(self.retry.clone());

        loop {
            let attempt = schedule.begin_attempt();
            debug!(provider = name, attempt, "Sending request");

            let outcome = with_timeout_map(
                self.request_timeout,
                self.transport.post_json(self.spec.endpoint, &headers, &body),
                "LLM request",
            )
            .await;

            let (kind, error) = match outcome {
                Ok(Ok(reply)) if reply.is_success() => match self.parse_reply(&reply) {
                    Ok((content, usage)) => {
                        debug!(provider = name, attempt, "Received response");
                        return Ok(LlmResponse {
                            content,
                            usage,
                            timing: ResponseTiming::from_duration(start_time.elapsed()),
                            metadata: ResponseMetadata {
                                model: self.model.clone(),
                                provider: name.to_string(),
                            },
                            attempts: attempt,
                        });
                    }
                    Err(error) => (FailureKind::Terminal, error),
                },
                Ok(Ok(reply)) => self.classify_status(&reply),
                Ok(Err(transport)) => (
                    FailureKind::Retryable,
                    ErrorClassifier::classify_transport(&transport.message, name),
                ),
                Err(timeout) => (
                    FailureKind::Retryable,
                    LlmError::with_provider(ErrorCategory::Network, timeout.to_string(), name),
                ),
            };

            match schedule.on_failure(kind) {
                RetryDecision::RetryAfter(delay) => {
                    warn!(
                        provider = name,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %error,
                        "Request failed, retrying"
                    );
                    self.sleeper.sleep(delay).await;
                }
                RetryDecision::GiveUp => {
                    return Err(DocgenError::Provider(error.attempts(attempt)));
                }
            }
        }
    }

    fn name(&self) -> &str {
        self.spec.kind.as_str()
    }

    fn model(&self) -> &str {
        &self.model
    }
}

fn truncate(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= MAX_ERROR_BODY_CHARS {
        return trimmed.to_string();
    }
    let mut cut: String = trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect();
    cut.push_str("...");
    cut
}

// Request/Response types

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<UsageInfo>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UsageInfo {
    prompt_tokens: u32,
    completion_tokens: u32,
}
