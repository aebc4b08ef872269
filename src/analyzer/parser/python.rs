use tracing::debug;

use super::literal::{
    clean_docstring, decode_str_literal, render_float, render_integer, repr_str,
};
use super::{Extractor, SourceAnalysis, check_syntax, create_ts_parser, get_node_lines, get_node_text};
use crate::types::{
    ClassRecord, ComplexityMetrics, DocgenError, FunctionRecord, ImportKind, ImportRecord,
    MethodSummary, Result,
};

/// Tree-sitter backed extractor for Python source
pub struct PythonExtractor;

impl PythonExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PythonExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for PythonExtractor {
    fn analyze(&self, source: &str) -> Result<SourceAnalysis> {
        // Fresh parser per call: no state survives between inputs
        let mut parser = create_ts_parser(tree_sitter_python::LANGUAGE, "Python")?;
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| DocgenError::Syntax {
                line: 1,
                column: 1,
                message: "parser produced no tree".to_string(),
            })?;

        let root = tree.root_node();
        let content = source.as_bytes();
        check_syntax(root, content)?;

        let mut analysis = SourceAnalysis::default();

        // Pre-order walk with an explicit stack
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            match node.kind() {
                "function_definition" => analysis.functions.push(function_record(node, source)?),
                "class_definition" => analysis.classes.push(class_record(node, source)),
                "import_statement" => collect_direct_imports(node, content, &mut analysis.imports),
                "import_from_statement" | "future_import_statement" => {
                    collect_from_imports(node, content, &mut analysis.imports)
                }
                // Python 2 forms the grammar still accepts
                "print_statement" | "exec_statement" => {
                    let keyword = node.kind().trim_end_matches("_statement");
                    return Err(syntax_error(
                        node,
                        format!("'{}' statement is not valid Python 3", keyword),
                    ));
                }
                _ => {}
            }

            let mut cursor = node.walk();
            let children: Vec<_> = node.named_children(&mut cursor).collect();
            stack.extend(children.into_iter().rev());
        }

        analysis.metrics = ComplexityMetrics {
            functions: analysis.functions.len(),
            classes: analysis.classes.len(),
            imports: analysis.imports.len(),
            lines: count_lines(source),
            characters: source.chars().count(),
        };

        debug!(
            functions = analysis.metrics.functions,
            classes = analysis.metrics.classes,
            imports = analysis.metrics.imports,
            "Extracted Python source"
        );

        Ok(analysis)
    }

    fn language(&self) -> &'static str {
        "python"
    }
}

// =============================================================================
// Functions
// =============================================================================

#[derive(Default)]
struct Parameters {
    params: Vec<String>,
    defaults: Vec<String>,
    kwonly_params: Vec<String>,
    kwonly_defaults: Vec<Option<String>>,
    vararg: Option<String>,
    kwarg: Option<String>,
}

impl Parameters {
    /// A positional parameter without a default may not follow one with a default.
    fn ensure_default_order(&self, node: tree_sitter::Node, keyword_only: bool) -> Result<()> {
        if !keyword_only && !self.defaults.is_empty() {
            return Err(syntax_error(
                node,
                "non-default argument follows default argument".to_string(),
            ));
        }
        Ok(())
    }

    fn push(&mut self, name: String, default: Option<String>, keyword_only: bool) {
        if keyword_only {
            self.kwonly_params.push(name);
            self.kwonly_defaults.push(default);
        } else {
            self.params.push(name);
            if let Some(default) = default {
                self.defaults.push(default);
            }
        }
    }
}

fn function_record(node: tree_sitter::Node, source: &str) -> Result<FunctionRecord> {
    let content = source.as_bytes();
    let name = field_text(node, "name", content);
    let is_async = is_async_definition(node);

    let parameters = node
        .child_by_field_name("parameters")
        .map(|params| parse_parameters(params, content))
        .transpose()?
        .unwrap_or_default();

    let block = node.child_by_field_name("body");
    let docstring = block.and_then(|b| docstring_of(b, content));
    let has_return = block.is_some_and(contains_return);
    let (start_line, end_line) = get_node_lines(node);

    let mut record = FunctionRecord {
        name,
        params: parameters.params,
        defaults: parameters.defaults,
        kwonly_params: parameters.kwonly_params,
        kwonly_defaults: parameters.kwonly_defaults,
        vararg: parameters.vararg,
        kwarg: parameters.kwarg,
        docstring,
        body: String::new(),
        start_line,
        end_line,
        has_return,
        is_async,
    };

    record.body = match source.get(node.byte_range()) {
        Some(text) => text.to_string(),
        None => function_stub(&record),
    };
    Ok(record)
}

fn is_async_definition(node: tree_sitter::Node) -> bool {
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .next()
        .is_some_and(|first| first.kind() == "async")
}

fn parse_parameters(params: tree_sitter::Node, content: &[u8]) -> Result<Parameters> {
    let mut parameters = Parameters::default();
    // Set by a bare `*` or by `*args`
    let mut keyword_only = false;

    let mut cursor = params.walk();
    for child in params.named_children(&mut cursor) {
        match child.kind() {
            "identifier" | "tuple_pattern" => {
                parameters.ensure_default_order(child, keyword_only)?;
                let name = get_node_text(child, content).to_string();
                parameters.push(name, None, keyword_only);
            }
            "typed_parameter" => {
                let mut inner_cursor = child.walk();
                let Some(target) = child.named_children(&mut inner_cursor).next() else {
                    continue;
                };
                match target.kind() {
                    "list_splat_pattern" => {
                        parameters.vararg = Some(splat_name(target, content));
                        keyword_only = true;
                    }
                    "dictionary_splat_pattern" => {
                        parameters.kwarg = Some(splat_name(target, content));
                    }
                    _ => {
                        parameters.ensure_default_order(child, keyword_only)?;
                        let name = get_node_text(target, content).to_string();
                        parameters.push(name, None, keyword_only);
                    }
                }
            }
            "default_parameter" | "typed_default_parameter" => {
                let name = field_text(child, "name", content);
                let default = child
                    .child_by_field_name("value")
                    .map(|value| render_default(value, content));
                parameters.push(name, default, keyword_only);
            }
            "list_splat_pattern" => {
                parameters.vararg = Some(splat_name(child, content));
                keyword_only = true;
            }
            "dictionary_splat_pattern" => {
                parameters.kwarg = Some(splat_name(child, content));
            }
            "keyword_separator" => keyword_only = true,
            _ => {}
        }
    }

    Ok(parameters)
}

fn syntax_error(node: tree_sitter::Node, message: String) -> DocgenError {
    let position = node.start_position();
    DocgenError::Syntax {
        line: position.row + 1,
        column: position.column + 1,
        message,
    }
}

/// Line count with the same separators as Python's `str.splitlines`.
fn count_lines(source: &str) -> usize {
    let mut lines = 0;
    let mut open_line = false;
    let mut chars = source.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                chars.next_if_eq(&'\n');
                lines += 1;
                open_line = false;
            }
            '\n' | '\u{0b}' | '\u{0c}' | '\u{1c}' | '\u{1d}' | '\u{1e}' | '\u{85}'
            | '\u{2028}' | '\u{2029}' => {
                lines += 1;
                open_line = false;
            }
            _ => open_line = true,
        }
    }

    lines + usize::from(open_line)
}

fn splat_name(node: tree_sitter::Node, content: &[u8]) -> String {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .next()
        .map(|inner| get_node_text(inner, content).to_string())
        .unwrap_or_else(|| {
            get_node_text(node, content)
                .trim_start_matches('*')
                .to_string()
        })
}

/// Render a default value: constants canonically, other expressions as source text.
fn render_default(value: tree_sitter::Node, content: &[u8]) -> String {
    let text = get_node_text(value, content);
    match value.kind() {
        "string" => decode_str_literal(text)
            .map(|decoded| repr_str(&decoded))
            .unwrap_or_else(|| text.to_string()),
        "concatenated_string" => concatenated_value(value, content)
            .map(|decoded| repr_str(&decoded))
            .unwrap_or_else(|| normalize_expression(text)),
        "integer" => render_integer(text),
        "float" => render_float(text),
        "true" => "True".to_string(),
        "false" => "False".to_string(),
        "none" => "None".to_string(),
        "ellipsis" => "Ellipsis".to_string(),
        _ => normalize_expression(text),
    }
}

/// Collapse line breaks inside multi-line expressions onto one line.
fn normalize_expression(text: &str) -> String {
    if !text.contains('\n') {
        return text.to_string();
    }
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn concatenated_value(node: tree_sitter::Node, content: &[u8]) -> Option<String> {
    let mut value = String::new();
    let mut cursor = node.walk();
    for part in node.named_children(&mut cursor) {
        if part.kind() == "comment" {
            continue;
        }
        value.push_str(&decode_str_literal(get_node_text(part, content))?);
    }
    Some(value)
}

/// True if a `return` appears in this scope, ignoring nested function bodies.
fn contains_return(block: tree_sitter::Node) -> bool {
    let mut stack = vec![block];
    while let Some(node) = stack.pop() {
        match node.kind() {
            "return_statement" => return true,
            "function_definition" | "lambda" => continue,
            _ => {}
        }
        let mut cursor = node.walk();
        stack.extend(node.named_children(&mut cursor));
    }
    false
}

fn function_stub(record: &FunctionRecord) -> String {
    format!("def {}:\n    ...", record.signature())
        .replacen("def async ", "async def ", 1)
}

// =============================================================================
// Classes
// =============================================================================

fn class_record(node: tree_sitter::Node, source: &str) -> ClassRecord {
    let content = source.as_bytes();
    let name = field_text(node, "name", content);

    let bases = node
        .child_by_field_name("superclasses")
        .map(|args| {
            let mut cursor = args.walk();
            args.named_children(&mut cursor)
                .filter(|arg| {
                    !matches!(
                        arg.kind(),
                        "keyword_argument" | "dictionary_splat" | "comment"
                    )
                })
                .map(|arg| normalize_expression(get_node_text(arg, content)))
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    let block = node.child_by_field_name("body");
    let methods = block.map(|b| direct_methods(b, content)).unwrap_or_default();
    let docstring = block.and_then(|b| docstring_of(b, content));
    let (start_line, end_line) = get_node_lines(node);

    let body = match source.get(node.byte_range()) {
        Some(text) => text.to_string(),
        None => class_stub(&name, &bases),
    };

    ClassRecord {
        method_count: methods.len(),
        name,
        bases,
        methods,
        docstring,
        body,
        start_line,
        end_line,
    }
}

/// Methods defined directly in the class body (decorated ones included).
fn direct_methods(block: tree_sitter::Node, content: &[u8]) -> Vec<MethodSummary> {
    let mut methods = Vec::new();
    let mut cursor = block.walk();

    for statement in block.named_children(&mut cursor) {
        let definition = match statement.kind() {
            "function_definition" => Some(statement),
            "decorated_definition" => statement
                .child_by_field_name("definition")
                .filter(|d| d.kind() == "function_definition"),
            _ => None,
        };

        if let Some(func) = definition {
            methods.push(MethodSummary {
                name: field_text(func, "name", content),
                is_async: is_async_definition(func),
                docstring: func
                    .child_by_field_name("body")
                    .and_then(|b| docstring_of(b, content)),
            });
        }
    }

    methods
}

fn class_stub(name: &str, bases: &[String]) -> String {
    if bases.is_empty() {
        format!("class {}:\n    ...", name)
    } else {
        format!("class {}({}):\n    ...", name, bases.join(", "))
    }
}

// =============================================================================
// Imports
// =============================================================================

fn collect_direct_imports(node: tree_sitter::Node, content: &[u8], out: &mut Vec<ImportRecord>) {
    let line = node.start_position().row + 1;
    let mut cursor = node.walk();

    for name_node in node.children_by_field_name("name", &mut cursor) {
        let (module, alias) = split_alias(name_node, content);
        out.push(ImportRecord {
            kind: ImportKind::Import,
            module,
            name: None,
            alias,
            level: 0,
            line,
        });
    }
}

fn collect_from_imports(node: tree_sitter::Node, content: &[u8], out: &mut Vec<ImportRecord>) {
    let line = node.start_position().row + 1;

    let (module, level) = if node.kind() == "future_import_statement" {
        ("__future__".to_string(), 0)
    } else {
        match node.child_by_field_name("module_name") {
            Some(module) if module.kind() == "relative_import" => relative_module(module, content),
            Some(module) => (dotted(get_node_text(module, content)), 0),
            None => (String::new(), 0),
        }
    };

    let mut cursor = node.walk();
    let names: Vec<_> = node.children_by_field_name("name", &mut cursor).collect();

    if names.is_empty() {
        let mut wildcard_cursor = node.walk();
        let has_wildcard = node
            .named_children(&mut wildcard_cursor)
            .any(|child| child.kind() == "wildcard_import");
        if has_wildcard {
            out.push(ImportRecord {
                kind: ImportKind::FromImport,
                module,
                name: Some("*".to_string()),
                alias: None,
                level,
                line,
            });
        }
        return;
    }

    for name_node in names {
        let (name, alias) = split_alias(name_node, content);
        out.push(ImportRecord {
            kind: ImportKind::FromImport,
            module: module.clone(),
            name: Some(name),
            alias,
            level,
            line,
        });
    }
}

fn relative_module(node: tree_sitter::Node, content: &[u8]) -> (String, usize) {
    let mut level = 0;
    let mut module = String::new();
    let mut cursor = node.walk();

    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "import_prefix" => {
                level = get_node_text(child, content)
                    .chars()
                    .filter(|c| *c == '.')
                    .count()
            }
            "dotted_name" => module = dotted(get_node_text(child, content)),
            _ => {}
        }
    }

    (module, level)
}

/// `(name, alias)` from a `dotted_name` or `aliased_import` node.
fn split_alias(node: tree_sitter::Node, content: &[u8]) -> (String, Option<String>) {
    if node.kind() == "aliased_import" {
        let name = node
            .child_by_field_name("name")
            .map(|n| dotted(get_node_text(n, content)))
            .unwrap_or_default();
        let alias = node
            .child_by_field_name("alias")
            .map(|a| get_node_text(a, content).to_string());
        (name, alias)
    } else {
        (dotted(get_node_text(node, content)), None)
    }
}

fn dotted(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

// =============================================================================
// Shared helpers
// =============================================================================

fn field_text(node: tree_sitter::Node, field: &str, content: &[u8]) -> String {
    node.child_by_field_name(field)
        .map(|n| get_node_text(n, content).to_string())
        .unwrap_or_default()
}

/// First statement of a block, when it is a plain string literal.
fn docstring_of(block: tree_sitter::Node, content: &[u8]) -> Option<String> {
    let mut cursor = block.walk();
    let first = block
        .named_children(&mut cursor)
        .find(|child| child.kind() != "comment")?;

    if first.kind() != "expression_statement" || first.named_child_count() != 1 {
        return None;
    }
    let expr = first.named_child(0)?;

    let raw = match expr.kind() {
        "string" => decode_str_literal(get_node_text(expr, content))?,
        "concatenated_string" => concatenated_value(expr, content)?,
        _ => return None,
    };
    Some(clean_docstring(&raw))
}
