//! Readme Command
//!
//! Generates a README section for a whole Python file.

use std::path::PathBuf;

use crate::ai::ProviderKind;
use crate::cli::ui::Output;
use crate::cli::util::{CommandContext, read_python_source};
use crate::types::Result;

#[derive(Debug, Clone)]
pub struct ReadmeOptions {
    pub file: PathBuf,
    pub output: Option<PathBuf>,
    pub provider: Option<ProviderKind>,
    pub api_key: Option<String>,
}

pub async fn run(ctx: &CommandContext, options: ReadmeOptions, output: &Output) -> Result<()> {
    let source = read_python_source(&options.file)?;
    let readme = ctx
        .orchestrator
        .generate_readme(&source, options.provider, options.api_key.as_deref())
        .await;

    match &options.output {
        Some(path) => {
            std::fs::write(path, format!("{}\n", readme))?;
            output.success(&format!("README saved to: {}", path.display()));
        }
        None => println!("{}", readme),
    }
    Ok(())
}
