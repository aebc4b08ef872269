//! Documentation units and generation request/result types.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ai::provider::ProviderKind;
use crate::types::{ClassRecord, FunctionRecord};

/// Granularity at which documentation is generated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    Function,
    Class,
}

impl UnitKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Class => "class",
        }
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Positional unit identifier: `{kind}:{name}:{start_line}`
///
/// Names alone are not unique (redefinitions, same-named methods), so the
/// start line is part of the identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(String);

impl UnitId {
    pub fn new(kind: UnitKind, name: &str, start_line: usize) -> Self {
        Self(format!("{}:{}:{}", kind, name, start_line))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One unit of work for the orchestrator
///
/// The explicit credential is never serialized and is redacted in debug output.
#[derive(Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub unit_id: UnitId,
    pub name: String,
    pub unit_kind: UnitKind,
    pub body: String,
    /// Explicit provider; `None` walks the fallback chain
    #[serde(default)]
    pub provider: Option<ProviderKind>,
    #[serde(default, skip_serializing)]
    pub credential: Option<String>,
    /// Template text overriding the configured one
    #[serde(default)]
    pub template: Option<String>,
}

impl fmt::Debug for GenerationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationRequest")
            .field("unit_id", &self.unit_id)
            .field("name", &self.name)
            .field("unit_kind", &self.unit_kind)
            .field("body_len", &self.body.len())
            .field("provider", &self.provider)
            .field("credential", &self.credential.as_ref().map(|_| "[REDACTED]"))
            .field("template", &self.template.as_ref().map(|t| t.len()))
            .finish()
    }
}

impl GenerationRequest {
    pub fn for_function(record: &FunctionRecord) -> Self {
        Self {
            unit_id: UnitId::new(UnitKind::Function, &record.name, record.start_line),
            name: record.name.clone(),
            unit_kind: UnitKind::Function,
            body: record.body.clone(),
            provider: None,
            credential: None,
            template: None,
        }
    }

    pub fn for_class(record: &ClassRecord) -> Self {
        Self {
            unit_id: UnitId::new(UnitKind::Class, &record.name, record.start_line),
            name: record.name.clone(),
            unit_kind: UnitKind::Class,
            body: record.body.clone(),
            provider: None,
            credential: None,
            template: None,
        }
    }

    pub fn with_provider(mut self, provider: Option<ProviderKind>) -> Self {
        self.provider = provider;
        self
    }

    pub fn with_credential(mut self, credential: Option<String>) -> Self {
        self.credential = credential.filter(|c| !c.trim().is_empty());
        self
    }

    pub fn with_template(mut self, template: Option<String>) -> Self {
        self.template = template;
        self
    }
}

/// Outcome for one unit; failures carry a readable placeholder in `text`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub unit_id: UnitId,
    pub name: String,
    pub unit_kind: UnitKind,
    pub text: String,
    /// Original body, echoed for traceability
    pub original: String,
    /// False when `text` is an error placeholder
    pub succeeded: bool,
}
