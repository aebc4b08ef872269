use serde::Serialize;

use crate::types::{
    ClassRecord, ComplexityMetrics, DocgenError, FunctionRecord, ImportRecord, Result,
};

/// Everything one parse pass produces
///
/// All four projections come from the same tree, so the metric counts always
/// equal the record list lengths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SourceAnalysis {
    pub functions: Vec<FunctionRecord>,
    pub classes: Vec<ClassRecord>,
    pub imports: Vec<ImportRecord>,
    pub metrics: ComplexityMetrics,
}

pub trait Extractor: Send + Sync {
    /// Parse `source` and collect every record in pre-order.
    fn analyze(&self, source: &str) -> Result<SourceAnalysis>;

    fn language(&self) -> &'static str;

    fn extract_functions(&self, source: &str) -> Result<Vec<FunctionRecord>> {
        Ok(self.analyze(source)?.functions)
    }

    fn extract_classes(&self, source: &str) -> Result<Vec<ClassRecord>> {
        Ok(self.analyze(source)?.classes)
    }

    fn extract_imports(&self, source: &str) -> Result<Vec<ImportRecord>> {
        Ok(self.analyze(source)?.imports)
    }

    fn analyze_complexity(&self, source: &str) -> Result<ComplexityMetrics> {
        Ok(self.analyze(source)?.metrics)
    }
}

/// Extract text content from a tree-sitter node.
/// Returns empty string if extraction fails (with debug logging).
#[inline]
pub fn get_node_text<'a>(node: tree_sitter::Node, content: &'a [u8]) -> &'a str {
    node.utf8_text(content).unwrap_or_else(|e| {
        tracing::debug!(
            "UTF-8 extraction failed at {}:{}-{}:{}: {}",
            node.start_position().row + 1,
            node.start_position().column,
            node.end_position().row + 1,
            node.end_position().column,
            e
        );
        ""
    })
}

/// 1-based start and end lines of a node.
pub fn get_node_lines(node: tree_sitter::Node) -> (usize, usize) {
    (node.start_position().row + 1, node.end_position().row + 1)
}

/// Create a tree-sitter parser for the given language.
pub fn create_ts_parser<L: Into<tree_sitter::Language>>(
    language: L,
    lang_name: &str,
) -> Result<tree_sitter::Parser> {
    let mut parser = tree_sitter::Parser::new();
    parser.set_language(&language.into()).map_err(|e| {
        DocgenError::Settings(format!("Failed to set {} language: {}", lang_name, e))
    })?;
    Ok(parser)
}

/// Locate the first `ERROR` or `MISSING` node and turn it into a syntax error.
///
/// Returns `Ok(())` for a clean tree.
pub fn check_syntax(root: tree_sitter::Node, content: &[u8]) -> Result<()> {
    if !root.has_error() {
        return Ok(());
    }

    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            let position = node.start_position();
            let message = if node.is_missing() {
                format!("missing '{}'", node.kind())
            } else {
                let text = get_node_text(node, content);
                let snippet: String = text.lines().next().unwrap_or("").chars().take(40).collect();
                if snippet.trim().is_empty() {
                    "unexpected input".to_string()
                } else {
                    format!("unexpected '{}'", snippet.trim())
                }
            };
            return Err(DocgenError::Syntax {
                line: position.row + 1,
                column: position.column + 1,
                message,
            });
        }

        if !node.has_error() {
            continue;
        }

        // Reverse push keeps document order on the stack
        let mut cursor = node.walk();
        let children: Vec<_> = node.children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }

    Err(DocgenError::Syntax {
        line: root.start_position().row + 1,
        column: root.start_position().column + 1,
        message: "unparseable input".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> tree_sitter::Tree {
        let mut parser = create_ts_parser(tree_sitter_python::LANGUAGE, "Python").unwrap();
        parser.parse(source, None).unwrap()
    }

    #[test]
    fn test_check_syntax_clean() {
        let source = "def f(x):\n    return x\n";
        let tree = parse(source);
        assert!(check_syntax(tree.root_node(), source.as_bytes()).is_ok());
    }

    #[test]
    fn test_check_syntax_reports_position() {
        let source = "x = 1\ndef f(:\n";
        let tree = parse(source);
        let err = check_syntax(tree.root_node(), source.as_bytes()).unwrap_err();
        match err {
            DocgenError::Syntax { line, .. } => assert_eq!(line, 2),
            other => panic!("expected syntax error, got {other:?}"),
        }
    }

    #[test]
    fn test_get_node_lines() {
        let source = "\n\ndef f():\n    pass\n";
        let tree = parse(source);
        let func = tree.root_node().named_child(0).unwrap();
        assert_eq!(get_node_lines(func), (3, 4));
    }
}
