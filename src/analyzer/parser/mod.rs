//! Source Extraction Module
//!
//! Tree-sitter based extraction of functions, classes, imports and metrics
//! from Python source.
//!
//! ```rust,ignore
//! use codex_docgen::analyzer::parser::extract_functions;
//!
//! let functions = extract_functions("def add(a, b):\n    return a + b\n")?;
//! assert_eq!(functions[0].params, vec!["a", "b"]);
//! ```

pub mod literal;
pub mod python;
pub mod traits;

pub use python::PythonExtractor;
pub use traits::{
    Extractor, SourceAnalysis, check_syntax, create_ts_parser, get_node_lines, get_node_text,
};

use crate::types::{ClassRecord, ComplexityMetrics, FunctionRecord, ImportRecord, Result};

/// Run a full extraction pass over `source`.
pub fn analyze(source: &str) -> Result<SourceAnalysis> {
    PythonExtractor::new().analyze(source)
}

pub fn extract_functions(source: &str) -> Result<Vec<FunctionRecord>> {
    PythonExtractor::new().extract_functions(source)
}

pub fn extract_classes(source: &str) -> Result<Vec<ClassRecord>> {
    PythonExtractor::new().extract_classes(source)
}

pub fn extract_imports(source: &str) -> Result<Vec<ImportRecord>> {
    PythonExtractor::new().extract_imports(source)
}

pub fn analyze_complexity(source: &str) -> Result<ComplexityMetrics> {
    PythonExtractor::new().analyze_complexity(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SAMPLE: &str = r#"import os
from typing import List

def hello(name="World"):
    """Say hello."""
    return f"Hello, {name}!"

class Calculator:
    def add(self, a, b):
        return a + b

    async def slow_add(self, a, b):
        def inner():
            return a
        return inner() + b
"#;

    #[test]
    fn test_projections_agree() {
        let metrics = analyze_complexity(SAMPLE).unwrap();
        assert_eq!(metrics.functions, extract_functions(SAMPLE).unwrap().len());
        assert_eq!(metrics.classes, extract_classes(SAMPLE).unwrap().len());
        assert_eq!(metrics.imports, extract_imports(SAMPLE).unwrap().len());
        assert_eq!(metrics.functions, 4);
        assert_eq!(metrics.classes, 1);
        assert_eq!(metrics.imports, 2);
    }

    #[test]
    fn test_every_body_reparses() {
        let analysis = analyze(SAMPLE).unwrap();
        for func in &analysis.functions {
            assert!(analyze(&func.body).is_ok(), "body of {} failed", func.name);
        }
        for class in &analysis.classes {
            assert!(analyze(&class.body).is_ok(), "body of {} failed", class.name);
        }
    }

    #[test]
    fn test_syntax_error_surfaces_from_every_projection() {
        let bad = "def f(:\n";
        assert!(extract_functions(bad).unwrap_err().is_syntax());
        assert!(extract_classes(bad).unwrap_err().is_syntax());
        assert!(extract_imports(bad).unwrap_err().is_syntax());
        assert!(analyze_complexity(bad).unwrap_err().is_syntax());
    }

    /// Escaped string defaults paired with their canonical rendering.
    const STRING_DEFAULTS: [(&str, &str); 5] = [
        ("'s'", "'s'"),
        ("\"it's\"", "\"it's\""),
        ("'\\x41'", "'A'"),
        ("'\\101'", "'A'"),
        ("'\\u00e9'", "'é'"),
    ];

    /// A function with optional docstring and trailing string defaults,
    /// plus the docstring and defaults extraction should report.
    fn documented_function() -> impl Strategy<Value = (String, Option<String>, Vec<String>)> {
        (
            "[a-z]{1,8}",
            0usize..2,
            prop::collection::vec(0..STRING_DEFAULTS.len(), 0..3),
            prop::option::of(("[A-Z][a-z]{1,8}", prop::option::of("[a-z]{1,8}"))),
        )
            .prop_map(|(name, plain, defaults, doc)| {
                let mut params: Vec<String> = (0..plain).map(|i| format!("p{}", i)).collect();
                let mut expected = Vec::new();
                for (i, pick) in defaults.into_iter().enumerate() {
                    let (literal, rendered) = STRING_DEFAULTS[pick];
                    params.push(format!("d{}={}", i, literal));
                    expected.push(rendered.to_string());
                }

                let mut text = format!("def {}_fn({}):\n", name, params.join(", "));
                let docstring = doc.map(|(summary, detail)| match detail {
                    Some(detail) => {
                        text.push_str(&format!(
                            "    \"\"\"{}.\n\n        {}\n    \"\"\"\n",
                            summary, detail
                        ));
                        format!("{}.\n\n{}", summary, detail)
                    }
                    None => {
                        text.push_str(&format!("    \"\"\"{}.\"\"\"\n", summary));
                        format!("{}.", summary)
                    }
                });
                text.push_str("    return 1\n");
                (text, docstring, expected)
            })
    }

    fn generated_module() -> impl Strategy<Value = String> {
        let function = ("[a-z]{1,8}", 0usize..3, any::<bool>()).prop_map(|(name, params, ret)| {
            let params: Vec<String> = (0..params).map(|i| format!("p{}", i)).collect();
            let body = if ret { "return 1" } else { "pass" };
            format!("def {}_fn({}):\n    {}\n", name, params.join(", "), body)
        });
        let documented = documented_function().prop_map(|(text, _, _)| text);
        let class = ("[A-Z][a-z]{0,6}", 0usize..3).prop_map(|(name, methods)| {
            let mut text = format!("class Gen{}:\n", name);
            if methods == 0 {
                text.push_str("    pass\n");
            }
            for i in 0..methods {
                text.push_str(&format!("    def m{}(self):\n        return {}\n", i, i));
            }
            text
        });
        let import = "[a-z]{1,6}".prop_map(|m| format!("import mod_{}\n", m));
        prop::collection::vec(prop_oneof![function, documented, class, import], 0..8)
            .prop_map(|parts| parts.join("\n"))
    }

    proptest! {
        #[test]
        fn prop_counts_match_records(source in generated_module()) {
            let analysis = analyze(&source).unwrap();
            let metrics = analyze_complexity(&source).unwrap();
            prop_assert_eq!(
                extract_functions(&source).unwrap().len() + extract_classes(&source).unwrap().len(),
                metrics.functions + metrics.classes
            );
            prop_assert_eq!(analysis.metrics, metrics);
        }

        #[test]
        fn prop_extraction_is_deterministic(source in generated_module()) {
            prop_assert_eq!(analyze(&source).unwrap(), analyze(&source).unwrap());
        }

        #[test]
        fn prop_docstrings_and_defaults_decoded((source, docstring, defaults) in documented_function()) {
            let functions = extract_functions(&source).unwrap();
            prop_assert_eq!(functions.len(), 1);
            prop_assert_eq!(&functions[0].docstring, &docstring);
            prop_assert_eq!(&functions[0].defaults, &defaults);
        }
    }
}
