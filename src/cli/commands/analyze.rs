//! Analyze Command
//!
//! Prints the extraction records and metrics of one file as JSON.

use std::path::Path;

use crate::analyzer::parser;
use crate::cli::util::read_python_source;
use crate::types::Result;

/// JSON rendering of a full analysis pass over `source`.
pub fn analysis_json(source: &str, pretty: bool) -> Result<String> {
    let analysis = parser::analyze(source)?;
    let json = if pretty {
        serde_json::to_string_pretty(&analysis)?
    } else {
        serde_json::to_string(&analysis)?
    };
    Ok(json)
}

pub fn run(file: &Path, compact: bool) -> Result<()> {
    let source = read_python_source(file)?;
    println!("{}", analysis_json(&source, !compact)?);
    Ok(())
}
