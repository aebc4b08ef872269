//! Orchestrator + remote providers driven through scripted transports.
//!
//! No network and no real backoff delay: every test injects a
//! `ScriptedTransport` and a `RecordingSleeper`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use codex_docgen::ai::provider::{
    DefaultProviderFactory, HttpReply, ProviderSettings, RecordingSleeper, ScriptedTransport,
    TransportError,
};
use codex_docgen::{
    GenerationOrchestrator, GenerationRequest, ProviderKind, TemplateStore, extract_functions,
};

const SOURCE: &str = "def add(a, b):\n    return a + b\n";

fn completion(text: &str) -> Result<HttpReply, TransportError> {
    Ok(HttpReply {
        status: 200,
        body: serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": text } }],
            "usage": { "prompt_tokens": 12, "completion_tokens": 8 }
        })
        .to_string(),
    })
}

fn status(code: u16) -> Result<HttpReply, TransportError> {
    Ok(HttpReply {
        status: code,
        body: "{\"error\":\"busy\"}".to_string(),
    })
}

struct Harness {
    orchestrator: GenerationOrchestrator,
    transport: Arc<ScriptedTransport>,
    sleeper: Arc<RecordingSleeper>,
}

fn harness(env: &[(&str, &str)], replies: Vec<Result<HttpReply, TransportError>>) -> Harness {
    let env: HashMap<String, String> = env
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let transport = Arc::new(ScriptedTransport::new(replies));
    let sleeper = Arc::new(RecordingSleeper::new());

    let factory = DefaultProviderFactory::with_parts(
        ProviderSettings::default(),
        Arc::new(env),
        transport.clone(),
        sleeper.clone(),
    );

    Harness {
        orchestrator: GenerationOrchestrator::new(Arc::new(factory), TemplateStore::builtin()),
        transport,
        sleeper,
    }
}

fn add_request() -> GenerationRequest {
    let functions = extract_functions(SOURCE).unwrap();
    GenerationRequest::for_function(&functions[0])
}

#[tokio::test]
async fn chain_skips_unconfigured_provider_and_retries_warmup() {
    let h = harness(
        &[("OPENAI_API_KEY", "sk-test")],
        vec![status(503), status(503), completion("  \"\"\"Add two numbers.\"\"\"\n")],
    );

    let result = h.orchestrator.document(&add_request()).await;

    assert!(result.succeeded);
    assert_eq!(result.text, "\"\"\"Add two numbers.\"\"\"");
    assert_eq!(result.original, SOURCE.trim_end());

    let requests = h.transport.requests();
    assert_eq!(requests.len(), 3);
    assert!(requests.iter().all(|r| r.url.contains("api.openai.com")));
    assert!(requests[0].body["messages"][1]["content"]
        .as_str()
        .unwrap()
        .contains("def add(a, b):"));
    assert_eq!(h.sleeper.delays(), vec![Duration::from_secs(10); 2]);
}

#[tokio::test]
async fn exhausted_retries_become_placeholder() {
    let h = harness(&[], vec![status(500), status(502), status(500)]);

    let request = add_request()
        .with_provider(Some(ProviderKind::DeepSeek))
        .with_credential(Some("ds-test".to_string()));
    let result = h.orchestrator.document(&request).await;

    assert!(!result.succeeded);
    assert!(result.text.starts_with("# Error generating docstring:"));
    assert!(result.text.ends_with("# Please add documentation manually."));
    assert_eq!(h.transport.request_count(), 3);
    assert_eq!(
        h.sleeper.delays(),
        vec![Duration::from_secs(1), Duration::from_secs(2)]
    );
}

#[tokio::test]
async fn no_credentials_fall_back_to_offline() {
    let h = harness(&[], Vec::new());

    let result = h.orchestrator.document(&add_request()).await;

    assert!(result.succeeded);
    assert!(result.text.starts_with("\"\"\"Run `add`."));
    assert_eq!(h.transport.request_count(), 0);
}

#[tokio::test]
async fn explicit_provider_without_key_is_not_papered_over() {
    let h = harness(&[], Vec::new());

    let err = h
        .orchestrator
        .generate_documentation(
            codex_docgen::UnitKind::Function,
            SOURCE,
            Some(ProviderKind::OpenRouter),
            None,
            None,
        )
        .await
        .unwrap_err();

    assert!(err.is_configuration());
    assert!(err.to_string().contains("OPENROUTER_API_KEY"));
}

#[tokio::test]
async fn batch_keeps_order_when_one_unit_fails() {
    let h = harness(
        &[("DEEPSEEK_API_KEY", "ds-test")],
        vec![completion("first"), status(401), completion("third")],
    );

    let functions =
        extract_functions("def a():\n    pass\n\ndef b():\n    pass\n\ndef c():\n    pass\n")
            .unwrap();
    let requests: Vec<_> = functions.iter().map(GenerationRequest::for_function).collect();

    let results = h.orchestrator.document_all(&requests, 1).await;

    let texts: Vec<_> = results.iter().map(|r| r.succeeded).collect();
    assert_eq!(texts, vec![true, false, true]);
    assert_eq!(results[0].text, "first");
    assert_eq!(results[2].text, "third");
    assert_eq!(results[1].unit_id.as_str(), "function:b:4");
    assert!(h.sleeper.delays().is_empty());
}

#[tokio::test]
async fn transport_failures_back_off() {
    let h = harness(
        &[("OPENROUTER_API_KEY", "or-test")],
        vec![
            Err(TransportError {
                message: "connection reset".to_string(),
                timed_out: false,
            }),
            completion("ok"),
        ],
    );

    let text = h
        .orchestrator
        .generate_documentation(
            codex_docgen::UnitKind::Function,
            SOURCE,
            Some(ProviderKind::OpenRouter),
            None,
            None,
        )
        .await
        .unwrap();

    assert_eq!(text, "ok");
    let requests = h.transport.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests[0].has_header("X-Title"));
    assert_eq!(requests[0].body["messages"].as_array().unwrap().len(), 1);
    assert_eq!(h.sleeper.delays(), vec![Duration::from_secs(1)]);
}
