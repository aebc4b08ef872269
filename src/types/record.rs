//! Extraction records produced by a single parse pass.
//!
//! Records are created once per pass and never mutated afterwards; they
//! serialize to plain field mappings for JSON output.

use serde::{Deserialize, Serialize};

/// A function or method definition (including `async def` and nested functions)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionRecord {
    pub name: String,
    /// Positional parameter names, positional-only first
    pub params: Vec<String>,
    /// Rendered defaults aligned to the trailing entries of `params`
    pub defaults: Vec<String>,
    pub kwonly_params: Vec<String>,
    /// Rendered keyword-only defaults, aligned with `kwonly_params`
    pub kwonly_defaults: Vec<Option<String>>,
    pub vararg: Option<String>,
    pub kwarg: Option<String>,
    pub docstring: Option<String>,
    pub body: String,
    pub start_line: usize,
    pub end_line: usize,
    pub has_return: bool,
    pub is_async: bool,
}

impl FunctionRecord {
    /// Render a call signature such as `async fetch(url, retries=3, *, timeout)`
    pub fn signature(&self) -> String {
        let mut parts = Vec::with_capacity(self.params.len() + self.kwonly_params.len() + 2);
        let first_default = self.params.len().saturating_sub(self.defaults.len());

        for (idx, param) in self.params.iter().enumerate() {
            if idx >= first_default {
                parts.push(format!("{}={}", param, self.defaults[idx - first_default]));
            } else {
                parts.push(param.clone());
            }
        }

        match &self.vararg {
            Some(name) => parts.push(format!("*{}", name)),
            None if !self.kwonly_params.is_empty() => parts.push("*".to_string()),
            None => {}
        }

        for (idx, param) in self.kwonly_params.iter().enumerate() {
            match self.kwonly_defaults.get(idx).and_then(|d| d.as_deref()) {
                Some(default) => parts.push(format!("{}={}", param, default)),
                None => parts.push(param.clone()),
            }
        }

        if let Some(name) = &self.kwarg {
            parts.push(format!("**{}", name));
        }

        let signature = format!("{}({})", self.name, parts.join(", "));
        if self.is_async {
            format!("async {}", signature)
        } else {
            signature
        }
    }
}

/// Summary of a method defined directly in a class body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodSummary {
    pub name: String,
    pub is_async: bool,
    pub docstring: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassRecord {
    pub name: String,
    pub bases: Vec<String>,
    pub methods: Vec<MethodSummary>,
    pub docstring: Option<String>,
    pub body: String,
    pub start_line: usize,
    pub end_line: usize,
    pub method_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportKind {
    /// `import x [as y]`
    Import,
    /// `from m import x [as y]`
    FromImport,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRecord {
    pub kind: ImportKind,
    /// Dotted module path; empty for `from . import x`
    pub module: String,
    /// Imported symbol for from-imports (`*` for wildcard imports)
    pub name: Option<String>,
    pub alias: Option<String>,
    /// Leading dots of a relative import
    pub level: usize,
    pub line: usize,
}

/// Aggregate counts for one source text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplexityMetrics {
    pub functions: usize,
    pub classes: usize,
    pub imports: usize,
    pub lines: usize,
    pub characters: usize,
}
