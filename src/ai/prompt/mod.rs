//! Prompt Templates
//!
//! Templates are plain text files (`<dir>/<name>.txt`) with a single
//! placeholder that receives the unit body. A template that cannot be loaded
//! is replaced by a built-in default, so a missing file never fails a unit.
//!
//! Built-in defaults are assembled with `PromptBuilder` so they share one
//! section layout.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::constants::templates as template_constants;
use crate::types::{DocgenError, Result, UnitKind};

/// Prompt section types
#[derive(Debug, Clone)]
pub enum PromptSection {
    /// Role definition with expertise area
    Role { expertise: String, task: String },
    /// Numbered objectives
    Objectives(Vec<String>),
    /// Raw text paragraph
    Text(String),
    /// Code block with language
    Code { language: String, content: String },
}

/// Prompt builder for consistent prompt construction
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    sections: Vec<PromptSection>,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn role(mut self, expertise: &str, task: &str) -> Self {
        self.sections.push(PromptSection::Role {
            expertise: expertise.to_string(),
            task: task.to_string(),
        });
        self
    }

    pub fn objectives(mut self, objectives: Vec<&str>) -> Self {
        self.sections.push(PromptSection::Objectives(
            objectives.into_iter().map(String::from).collect(),
        ));
        self
    }

    pub fn text(mut self, content: &str) -> Self {
        self.sections.push(PromptSection::Text(content.to_string()));
        self
    }

    pub fn code(mut self, language: &str, content: &str) -> Self {
        self.sections.push(PromptSection::Code {
            language: language.to_string(),
            content: content.to_string(),
        });
        self
    }

    /// Build the final prompt string
    pub fn build(self) -> String {
        let mut prompt = String::new();

        for section in self.sections {
            match section {
                PromptSection::Role { expertise, task } => {
                    prompt.push_str(&format!(
                        "You are an expert {} specializing in {}.\n\n",
                        expertise, task
                    ));
                }
                PromptSection::Objectives(objectives) => {
                    prompt.push_str("Your task is to return:\n\n");
                    for (i, obj) in objectives.iter().enumerate() {
                        prompt.push_str(&format!("{}. {}\n", i + 1, obj));
                    }
                    prompt.push('\n');
                }
                PromptSection::Text(content) => {
                    prompt.push_str(&content);
                    prompt.push_str("\n\n");
                }
                PromptSection::Code { language, content } => {
                    prompt.push_str(&format!("```{}\n", language));
                    prompt.push_str(&content);
                    prompt.push_str("\n```\n\n");
                }
            }
        }

        prompt.trim_end().to_string()
    }
}

// =============================================================================
// Named templates
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateName {
    Function,
    Class,
    Readme,
}

impl TemplateName {
    pub const ALL: [TemplateName; 3] = [Self::Function, Self::Class, Self::Readme];

    pub fn for_unit(kind: UnitKind) -> Self {
        match kind {
            UnitKind::Function => Self::Function,
            UnitKind::Class => Self::Class,
        }
    }

    /// File stem under the template directory
    pub fn file_stem(&self) -> &'static str {
        match self {
            Self::Function => template_constants::FUNCTION_PROMPT,
            Self::Class => template_constants::CLASS_PROMPT,
            Self::Readme => template_constants::README_PROMPT,
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            Self::Function => template_constants::FUNCTION_PLACEHOLDER,
            Self::Class => template_constants::CLASS_PLACEHOLDER,
            Self::Readme => template_constants::SOURCE_PLACEHOLDER,
        }
    }

    pub fn builtin(&self) -> String {
        match self {
            Self::Function => docstring_template("function", self.placeholder()),
            Self::Class => docstring_template("class", self.placeholder()),
            Self::Readme => PromptBuilder::new()
                .role("technical writer", "project documentation")
                .objectives(vec![
                    "A short overview of what the module does",
                    "Its main functions and classes with one-line descriptions",
                    "A usage example",
                    "Installation or setup notes if the code implies any",
                ])
                .text("Here is the source code:")
                .code("python", self.placeholder())
                .text("Return the README section in Markdown.")
                .build(),
        }
    }
}

fn docstring_template(unit: &str, placeholder: &str) -> String {
    PromptBuilder::new()
        .role("Python developer and code reviewer", "PEP-257 docstrings")
        .objectives(vec![
            "A complete Python docstring in triple double quotes: a one-line summary, \
             all parameters (with types if obvious), the return value, and raised exceptions",
            "Time and space complexity in Big-O notation",
            "Scope for improvement, if any",
            "Edge cases or limitations, if applicable",
        ])
        .text(&format!("Here is the {} to analyze:", unit))
        .code("python", placeholder)
        .text("Return only the analysis and docstring. Do NOT include the original code.")
        .build()
}

/// Substitute `body` into the placeholder for `kind`; nothing else changes.
pub fn render(template: &str, kind: UnitKind, body: &str) -> String {
    template.replace(TemplateName::for_unit(kind).placeholder(), body)
}

/// Substitute a whole source file into a README template.
pub fn render_readme(template: &str, source: &str) -> String {
    template.replace(TemplateName::Readme.placeholder(), source)
}

// =============================================================================
// Template Store
// =============================================================================

/// Templates resolved once from a directory, with built-in fallbacks
#[derive(Debug, Clone)]
pub struct TemplateStore {
    dir: Option<PathBuf>,
    templates: HashMap<TemplateName, String>,
}

impl TemplateStore {
    /// Load every template from `dir`, substituting defaults for failures.
    pub fn load<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref().to_path_buf();
        let templates = TemplateName::ALL
            .into_iter()
            .map(|name| {
                let text = match read_template(&dir, name) {
                    Ok(text) => {
                        debug!(template = name.file_stem(), "Loaded prompt template");
                        text
                    }
                    Err(e) => {
                        warn!("{}; using built-in default", e);
                        name.builtin()
                    }
                };
                (name, text)
            })
            .collect();

        Self {
            dir: Some(dir),
            templates,
        }
    }

    /// Built-in defaults only
    pub fn builtin() -> Self {
        Self {
            dir: None,
            templates: TemplateName::ALL
                .into_iter()
                .map(|name| (name, name.builtin()))
                .collect(),
        }
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    pub fn get(&self, name: TemplateName) -> String {
        self.templates
            .get(&name)
            .cloned()
            .unwrap_or_else(|| name.builtin())
    }
}

/// Read `<dir>/<name>.txt`; missing or unreadable files are template errors.
pub fn read_template(dir: &Path, name: TemplateName) -> Result<String> {
    let path = dir.join(format!("{}.txt", name.file_stem()));
    std::fs::read_to_string(&path).map_err(|e| DocgenError::Template {
        name: name.file_stem().to_string(),
        reason: format!("{}: {}", path.display(), e),
    })
}
