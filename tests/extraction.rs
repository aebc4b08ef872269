//! End-to-end extraction over the public API.

use codex_docgen::{
    DocgenError, ImportKind, analyze, analyze_complexity, extract_classes, extract_functions,
    extract_imports,
};

const MODULE: &str = r#"import os, sys as system
from ..pkg import helper as h
from . import sibling

class Repository(Base, metaclass=Meta):
    """Store records."""

    def __init__(self, path="data", *, strict=False):
        self.path = path

    @property
    def size(self):
        def count():
            return 1
        print(count())

    async def fetch(self, key, retries=3):
        if key:
            for _ in range(retries):
                return await self.load(key)

def top(a, b=None, *args, flag, **kw):
    '''Top level.'''
    return a
"#;

#[test]
fn add_function_scenario() {
    let functions = extract_functions("def add(a, b):\n    return a + b\n").unwrap();

    assert_eq!(functions.len(), 1);
    let add = &functions[0];
    assert_eq!(add.name, "add");
    assert_eq!(add.params, vec!["a", "b"]);
    assert!(add.defaults.is_empty());
    assert!(add.has_return);
    assert!(!add.is_async);
}

#[test]
fn class_scenario() {
    let classes = extract_classes("class C(Base):\n    def m(self): pass\n").unwrap();

    assert_eq!(classes.len(), 1);
    assert_eq!(classes[0].name, "C");
    assert_eq!(classes[0].bases, vec!["Base"]);
    assert_eq!(classes[0].methods.len(), 1);
    assert_eq!(classes[0].methods[0].name, "m");
}

#[test]
fn malformed_input_is_syntax_error() {
    let extractors: [fn(&str) -> Result<(), DocgenError>; 4] = [
        |s| extract_functions(s).map(|_| ()),
        |s| extract_classes(s).map(|_| ()),
        |s| extract_imports(s).map(|_| ()),
        |s| analyze_complexity(s).map(|_| ()),
    ];
    for extract in extractors {
        let err = extract("def f(:\n").unwrap_err();
        assert!(matches!(err, DocgenError::Syntax { .. }), "{}", err);
    }
}

#[test]
fn grammar_accepted_but_invalid_python3_is_rejected() {
    for source in [
        "print 'hi'\n",
        "def run():\n    exec 'x = 1'\n",
        "def f(a=1, b):\n    pass\n",
        "def g(a: int = 1, b: int):\n    pass\n",
    ] {
        let err = analyze(source).unwrap_err();
        assert!(matches!(err, DocgenError::Syntax { .. }), "{}: {}", source, err);
    }
    assert!(analyze("def h(a=1, *, b, c=2):\n    print(a)\n").is_ok());
}

#[test]
fn escaped_defaults_and_docstrings_are_decoded() {
    let source = "def greet(name='\\u00e9l\\u00e8v\\x65', tag='\\101'):\n    \"\"\"Greet.\n\n    \\u00c9l\\u00e8ve.\n    \"\"\"\n    return name\n";
    let functions = extract_functions(source).unwrap();

    assert_eq!(functions[0].defaults, vec!["'élève'", "'A'"]);
    assert_eq!(functions[0].docstring.as_deref(), Some("Greet.\n\nÉlève."));
    assert_eq!(analyze_complexity(source).unwrap().lines, 6);
}

#[test]
fn full_module() {
    let analysis = analyze(MODULE).unwrap();

    let names: Vec<_> = analysis.functions.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["__init__", "size", "count", "fetch", "top"]);

    let size = &analysis.functions[1];
    assert!(!size.has_return, "nested return must not count for the outer function");
    assert!(analysis.functions[2].has_return);

    let fetch = &analysis.functions[3];
    assert!(fetch.is_async);
    assert!(fetch.has_return);
    assert_eq!(fetch.defaults, vec!["3"]);

    let init = &analysis.functions[0];
    assert_eq!(init.defaults, vec!["'data'"]);
    assert_eq!(init.kwonly_params, vec!["strict"]);
    assert_eq!(init.kwonly_defaults, vec![Some("False".to_string())]);

    let top = &analysis.functions[4];
    assert_eq!(top.signature(), "top(a, b=None, *args, flag, **kw)");
    assert_eq!(top.docstring.as_deref(), Some("Top level."));

    let repo = &analysis.classes[0];
    assert_eq!(repo.bases, vec!["Base"]);
    assert_eq!(repo.docstring.as_deref(), Some("Store records."));
    let methods: Vec<_> = repo.methods.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(methods, vec!["__init__", "size", "fetch"]);
    assert_eq!(repo.method_count, 3);

    let imports = &analysis.imports;
    assert_eq!(imports.len(), 4);
    assert_eq!(imports[1].module, "sys");
    assert_eq!(imports[1].alias.as_deref(), Some("system"));
    assert_eq!(imports[2].kind, ImportKind::FromImport);
    assert_eq!(imports[2].module, "pkg");
    assert_eq!(imports[2].level, 2);
    assert_eq!(imports[3].module, "");
    assert_eq!(imports[3].name.as_deref(), Some("sibling"));

    assert_eq!(analysis.metrics.functions, 5);
    assert_eq!(analysis.metrics.classes, 1);
    assert_eq!(analysis.metrics.imports, 4);
}

#[test]
fn bodies_reparse() {
    let analysis = analyze(MODULE).unwrap();

    for function in &analysis.functions {
        assert!(
            extract_functions(&function.body).is_ok(),
            "body of {} does not parse:\n{}",
            function.name,
            function.body
        );
    }
    for class in &analysis.classes {
        let reparsed = extract_classes(&class.body).unwrap();
        assert_eq!(reparsed[0].name, class.name);
    }
}

#[test]
fn extraction_is_deterministic() {
    assert_eq!(analyze(MODULE).unwrap(), analyze(MODULE).unwrap());
}
