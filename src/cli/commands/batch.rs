//! Batch Command
//!
//! Runs the docgen pipeline over every Python file in a directory. A file
//! that fails (unreadable, invalid syntax) is reported and skipped.
//!
//! Usage:
//!   codex-docgen batch <dir> [-r] [--provider <name>] [--api-key <key>]

use std::path::PathBuf;
use tracing::warn;

use super::docgen::{UnitSelection, document_file};
use crate::ai::{GenerationOrchestrator, ProviderKind};
use crate::analyzer::FileScanner;
use crate::cli::ui::Output;
use crate::cli::util::CommandContext;
use crate::config::BatchConfig;
use crate::types::Result;

#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub dir: PathBuf,
    pub recursive: bool,
    pub provider: Option<ProviderKind>,
    pub api_key: Option<String>,
}

/// Aggregate counts over one batch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub files_processed: usize,
    pub files_failed: usize,
    pub units_documented: usize,
    pub units_failed: usize,
}

pub async fn process_directory(
    orchestrator: &GenerationOrchestrator,
    settings: &BatchConfig,
    options: &BatchOptions,
    output: &Output,
) -> Result<BatchSummary> {
    let files = FileScanner::new(&options.dir)
        .recursive(options.recursive || settings.recursive)
        .with_exclude(&settings.exclude)?
        .scan()?;

    let mut summary = BatchSummary::default();
    if files.is_empty() {
        output.info(&format!("No Python files found in {}", options.dir.display()));
        return Ok(summary);
    }
    output.info(&format!("Found {} Python files to process", files.len()));

    for file in &files {
        let outcome = document_file(
            orchestrator,
            &file.path,
            UnitSelection::default(),
            options.provider,
            options.api_key.as_deref(),
            settings.concurrency,
        )
        .await;

        match outcome {
            Ok(report) => {
                summary.files_processed += 1;
                summary.units_documented += report.succeeded();
                summary.units_failed += report.failed();
                output.success(&format!(
                    "{}: {} documented, {} failed",
                    file.path.display(),
                    report.succeeded(),
                    report.failed()
                ));
            }
            Err(e) => {
                warn!("Skipping {}: {}", file.path.display(), e);
                summary.files_failed += 1;
                output.error(&format!("Error processing {}: {}", file.path.display(), e));
            }
        }
    }

    Ok(summary)
}

pub async fn run(ctx: &CommandContext, options: BatchOptions, output: &Output) -> Result<()> {
    let summary =
        process_directory(&ctx.orchestrator, &ctx.config.batch, &options, output).await?;

    output.header("Batch complete");
    output.info(&format!(
        "Files: {} processed, {} failed",
        summary.files_processed, summary.files_failed
    ));
    output.info(&format!(
        "Units: {} documented, {} failed",
        summary.units_documented, summary.units_failed
    ));
    Ok(())
}
