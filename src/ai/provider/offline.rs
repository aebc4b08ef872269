//! Offline provider.
//!
//! Never touches the network and never fails: it renders a PEP-257 docstring
//! skeleton from the first `def`/`class` header found in the prompt. Used when
//! no credential is configured and in tests.

use async_trait::async_trait;
use std::time::Instant;
use tracing::debug;

use super::{LlmProvider, LlmResponse, ResponseMetadata, ResponseTiming, TokenUsage};
use crate::types::Result;

const MODEL: &str = "pep257-skeleton";

#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineProvider;

impl OfflineProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl LlmProvider for OfflineProvider {
    async fn generate(&self, prompt: &str) -> Result<LlmResponse> {
        let start_time = Instant::now();
        let content = render_skeleton(prompt);
        debug!(chars = content.len(), "Rendered offline docstring");

        Ok(LlmResponse {
            content,
            usage: TokenUsage::default(),
            timing: ResponseTiming::from_duration(start_time.elapsed()),
            metadata: ResponseMetadata {
                model: MODEL.to_string(),
                provider: "offline".to_string(),
            },
            attempts: 1,
        })
    }

    fn name(&self) -> &str {
        "offline"
    }

    fn model(&self) -> &str {
        MODEL
    }
}

enum Header {
    Function {
        name: String,
        params: Vec<String>,
        is_async: bool,
    },
    Class {
        name: String,
        bases: Vec<String>,
    },
}

/// Deterministic docstring skeleton for the first definition in `prompt`.
pub fn render_skeleton(prompt: &str) -> String {
    let returns = prompt.contains("return ");

    match find_header(prompt) {
        Some(Header::Function {
            name,
            params,
            is_async,
        }) => {
            let mut lines = vec![if is_async {
                format!("Asynchronously run `{}`.", name)
            } else {
                format!("Run `{}`.", name)
            }];
            if !params.is_empty() {
                lines.push(String::new());
                lines.push("Args:".to_string());
                for param in &params {
                    lines.push(format!("    {}: Description of `{}`.", param, param));
                }
            }
            if returns {
                lines.push(String::new());
                lines.push("Returns:".to_string());
                lines.push("    Description of the return value.".to_string());
            }
            wrap_docstring(&lines)
        }
        Some(Header::Class { name, bases }) => {
            let mut lines = vec![format!("Represent a `{}`.", name)];
            if !bases.is_empty() {
                lines.push(String::new());
                lines.push(format!("Extends {}.", bases.join(", ")));
            }
            lines.push(String::new());
            lines.push("Attributes:".to_string());
            lines.push("    Describe the public attributes here.".to_string());
            wrap_docstring(&lines)
        }
        None => wrap_docstring(&["Describe this code.".to_string()]),
    }
}

fn wrap_docstring(lines: &[String]) -> String {
    format!("\"\"\"{}\n\"\"\"", lines.join("\n"))
}

fn find_header(prompt: &str) -> Option<Header> {
    for line in prompt.lines() {
        let trimmed = line.trim_start();

        let (is_async, rest) = match trimmed.strip_prefix("async def ") {
            Some(rest) => (true, Some(rest)),
            None => (false, trimmed.strip_prefix("def ")),
        };
        if let Some(rest) = rest {
            let (name, inner) = split_header(rest);
            if name.is_empty() {
                continue;
            }
            let params = split_top_level(inner)
                .into_iter()
                .filter_map(|p| parameter_name(&p))
                .collect();
            return Some(Header::Function {
                name,
                params,
                is_async,
            });
        }

        if let Some(rest) = trimmed.strip_prefix("class ") {
            let (name, inner) = split_header(rest);
            if name.is_empty() {
                continue;
            }
            let bases = split_top_level(inner)
                .into_iter()
                .filter(|b| !b.contains('='))
                .collect();
            return Some(Header::Class { name, bases });
        }
    }
    None
}

/// `name(args...)...` → (`name`, `args...`)
fn split_header(rest: &str) -> (String, &str) {
    let name: String = rest
        .chars()
        .take_while(|c| c.is_alphanumeric() || *c == '_')
        .collect();

    let inner = rest
        .find('(')
        .map(|open| {
            let after = &rest[open + 1..];
            let mut depth = 0usize;
            for (idx, c) in after.char_indices() {
                match c {
                    '(' | '[' | '{' => depth += 1,
                    ')' | ']' | '}' if depth > 0 => depth -= 1,
                    ')' => return &after[..idx],
                    _ => {}
                }
            }
            after
        })
        .unwrap_or("");

    (name, inner)
}

fn split_top_level(text: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;

    for c in text.chars() {
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(std::mem::take(&mut current));
                continue;
            }
            _ => {}
        }
        current.push(c);
    }
    parts.push(current);

    parts
        .into_iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}

fn parameter_name(param: &str) -> Option<String> {
    let name: String = param
        .trim_start_matches('*')
        .chars()
        .take_while(|c| c.is_alphanumeric() || *c == '_')
        .collect();

    match name.as_str() {
        "" | "self" | "cls" => None,
        _ => Some(name),
    }
}
