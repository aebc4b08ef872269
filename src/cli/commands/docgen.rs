//! Docgen Command
//!
//! Per-file pipeline: read a Python file, extract units, generate
//! documentation for each and optionally write the annotated result.
//!
//! Usage:
//!   codex-docgen docgen <file> [-o out.py] [--functions-only | --classes-only]
//!                       [--provider <name>] [--api-key <key>]

use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::ai::{GenerationOrchestrator, ProviderKind};
use crate::analyzer::{SourceAnalysis, parser};
use crate::cli::ui::Output;
use crate::cli::util::{CommandContext, read_python_source};
use crate::types::{GenerationRequest, GenerationResult, Result, UnitKind};

/// Which unit kinds a run documents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitSelection {
    pub functions: bool,
    pub classes: bool,
}

impl UnitSelection {
    pub fn from_flags(functions_only: bool, classes_only: bool) -> Self {
        Self {
            functions: !classes_only,
            classes: !functions_only,
        }
    }
}

impl Default for UnitSelection {
    fn default() -> Self {
        Self::from_flags(false, false)
    }
}

#[derive(Debug, Clone)]
pub struct DocgenOptions {
    pub file: PathBuf,
    pub output: Option<PathBuf>,
    pub selection: UnitSelection,
    pub provider: Option<ProviderKind>,
    pub api_key: Option<String>,
}

/// Results for one source file
#[derive(Debug, Clone)]
pub struct FileReport {
    pub path: PathBuf,
    pub source: String,
    pub results: Vec<GenerationResult>,
}

impl FileReport {
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.succeeded).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }
}

/// Requests for the selected units: functions first, then classes.
pub fn build_requests(
    analysis: &SourceAnalysis,
    selection: UnitSelection,
    provider: Option<ProviderKind>,
    api_key: Option<&str>,
) -> Vec<GenerationRequest> {
    let functions = analysis
        .functions
        .iter()
        .filter(|_| selection.functions)
        .map(GenerationRequest::for_function);
    let classes = analysis
        .classes
        .iter()
        .filter(|_| selection.classes)
        .map(GenerationRequest::for_class);

    functions
        .chain(classes)
        .map(|request| {
            request
                .with_provider(provider)
                .with_credential(api_key.map(String::from))
        })
        .collect()
}

/// Extract and document one file. Syntax errors fail the file; generation
/// errors become placeholders inside the report.
pub async fn document_file(
    orchestrator: &GenerationOrchestrator,
    path: &Path,
    selection: UnitSelection,
    provider: Option<ProviderKind>,
    api_key: Option<&str>,
    concurrency: usize,
) -> Result<FileReport> {
    let source = read_python_source(path)?;
    debug!(path = %path.display(), chars = source.chars().count(), "Processing file");

    let analysis = parser::analyze(&source)?;
    info!(
        "Found {} functions and {} classes in {}",
        analysis.functions.len(),
        analysis.classes.len(),
        path.display()
    );

    let requests = build_requests(&analysis, selection, provider, api_key);
    let results = orchestrator.document_all(&requests, concurrency).await;

    Ok(FileReport {
        path: path.to_path_buf(),
        source,
        results,
    })
}

pub(crate) fn unit_title(kind: UnitKind) -> &'static str {
    match kind {
        UnitKind::Function => "Function",
        UnitKind::Class => "Class",
    }
}

/// Original source followed by a `# Generated Documentation` section.
pub fn render_output(report: &FileReport, generated_at: DateTime<Local>) -> String {
    let mut out = report.source.clone();
    out.push_str("\n\n# Generated Documentation\n");
    out.push_str(&format!(
        "# Generated on: {}\n",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    ));
    out.push_str(&"=".repeat(50));
    out.push('\n');

    for result in &report.results {
        out.push_str(&format!("\n{}: {}\n", unit_title(result.unit_kind), result.name));
        out.push_str(&"-".repeat(30));
        out.push('\n');
        out.push_str(&result.text);
        out.push('\n');
    }
    out
}

pub async fn run(ctx: &CommandContext, options: DocgenOptions, output: &Output) -> Result<()> {
    let report = document_file(
        &ctx.orchestrator,
        &options.file,
        options.selection,
        options.provider,
        options.api_key.as_deref(),
        ctx.config.batch.concurrency,
    )
    .await?;

    if report.results.is_empty() {
        output.info("No functions or classes found to document.");
        return Ok(());
    }

    for result in &report.results {
        let label = format!("{} {}", result.unit_kind, result.name);
        if result.succeeded {
            output.success(&format!("Generated docstring for {}", label));
        } else {
            output.warning(&format!("Could not generate docstring for {}", label));
        }
    }

    output.header(&format!("Generated {} docstrings", report.results.len()));
    for result in &report.results {
        output.section(
            &format!("{}: {}", unit_title(result.unit_kind), result.name),
            &result.text,
        );
    }

    if let Some(path) = &options.output {
        std::fs::write(path, render_output(&report, Local::now()))?;
        output.success(&format!("Results saved to: {}", path.display()));
    }

    Ok(())
}
