//! Code Analyzer Module
//!
//! - Python extraction (functions, classes, imports, metrics)
//! - File scanning with gitignore support

pub mod parser;
pub mod scanner;

pub use parser::{Extractor, PythonExtractor, SourceAnalysis};
pub use scanner::FileScanner;
