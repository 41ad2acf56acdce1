//! Language resolution and per-grammar node-kind tables.
//!
//! Grammars are the built-in ones from `ast-grep-language`, so the kinds
//! below are the tree-sitter node kinds those grammars emit. Languages
//! without a table fall back to kind-name heuristics.

use std::path::Path;

pub use ast_grep_language::SupportLang;

/// Parse a user-supplied language tag (`js`, `javascript`, `py`, `rust`, ...).
pub fn parse_language_hint(hint: &str) -> Option<SupportLang> {
    hint.trim().to_ascii_lowercase().parse().ok()
}

/// Infer the language from a file extension.
pub fn from_path(path: &Path) -> Option<SupportLang> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    from_extension(&ext)
}

/// Infer the language from an extension string (without the dot).
pub fn from_extension(ext: &str) -> Option<SupportLang> {
    let lang = match ext {
        "js" | "mjs" | "cjs" | "jsx" => SupportLang::JavaScript,
        "ts" | "mts" | "cts" => SupportLang::TypeScript,
        "tsx" => SupportLang::Tsx,
        "py" | "pyi" => SupportLang::Python,
        "rs" => SupportLang::Rust,
        "go" => SupportLang::Go,
        "java" => SupportLang::Java,
        "c" | "h" => SupportLang::C,
        "cpp" | "cc" | "cxx" | "hpp" => SupportLang::Cpp,
        "cs" => SupportLang::CSharp,
        "rb" => SupportLang::Ruby,
        "kt" | "kts" => SupportLang::Kotlin,
        "swift" => SupportLang::Swift,
        "lua" => SupportLang::Lua,
        "php" => SupportLang::Php,
        "sh" | "bash" => SupportLang::Bash,
        _ => return None,
    };
    Some(lang)
}

/// Lowercase display name of a language (`javascript`, `python`, ...).
pub fn lang_name(lang: SupportLang) -> String {
    format!("{lang:?}").to_lowercase()
}

/// Leaf kinds that name something and are therefore candidates for renaming.
pub const IDENTIFIER_KINDS: &[&str] = &[
    "identifier",
    "property_identifier",
    "shorthand_property_identifier",
    "shorthand_property_identifier_pattern",
    "type_identifier",
    "field_identifier",
];

/// Leaf kinds that count as a *use* of an imported binding.
///
/// `property_identifier` is excluded: `obj.foo` does not use an import `foo`.
pub const USAGE_KINDS: &[&str] = &["identifier", "type_identifier", "shorthand_property_identifier"];

/// A node kind that introduces names into the enclosing scope.
#[derive(Debug, Clone, Copy)]
pub struct Declarator {
    pub kind: &'static str,
    /// Field holding the declared pattern; `None` means every child pattern.
    pub field: Option<&'static str>,
    pub label: &'static str,
}

const fn decl(kind: &'static str, field: Option<&'static str>, label: &'static str) -> Declarator {
    Declarator { kind, field, label }
}

/// Node-kind tables for one grammar.
#[derive(Debug)]
pub struct LangProfile {
    pub function_kinds: &'static [&'static str],
    pub class_kinds: &'static [&'static str],
    pub method_kinds: &'static [&'static str],
    pub property_kinds: &'static [&'static str],
    pub import_kinds: &'static [&'static str],
    pub scope_kinds: &'static [&'static str],
    pub declarators: &'static [Declarator],
    pub builtins: &'static [&'static str],
    heuristic: bool,
}

impl LangProfile {
    pub fn is_function(&self, kind: &str) -> bool {
        if self.heuristic {
            return (kind.contains("function") || kind.contains("method")) && is_definition_like(kind);
        }
        self.function_kinds.contains(&kind)
    }

    pub fn is_class(&self, kind: &str) -> bool {
        if self.heuristic {
            return kind.contains("class") && is_definition_like(kind);
        }
        self.class_kinds.contains(&kind)
    }

    pub fn is_method(&self, kind: &str) -> bool {
        if self.heuristic {
            return self.is_function(kind);
        }
        self.method_kinds.contains(&kind)
    }

    pub fn is_property(&self, kind: &str) -> bool {
        if self.heuristic {
            return kind.contains("field") && is_definition_like(kind);
        }
        self.property_kinds.contains(&kind)
    }

    pub fn is_import(&self, kind: &str) -> bool {
        if self.heuristic {
            return kind.contains("import")
                && (kind.ends_with("declaration") || kind.ends_with("statement"));
        }
        self.import_kinds.contains(&kind)
    }

    pub fn is_scope(&self, kind: &str) -> bool {
        if self.heuristic {
            return self.is_function(kind) || self.is_class(kind) || kind.ends_with("block");
        }
        self.scope_kinds.contains(&kind)
    }

    pub fn declarator(&self, kind: &str) -> Option<&Declarator> {
        self.declarators.iter().find(|d| d.kind == kind)
    }
}

fn is_definition_like(kind: &str) -> bool {
    kind.ends_with("declaration") || kind.ends_with("definition") || kind.ends_with("item")
}

const JS_BUILTINS: &[&str] = &[
    "console", "window", "document", "globalThis", "Math", "JSON", "Promise", "Array", "Object",
    "String", "Number", "Boolean", "Symbol", "Map", "Set", "Date", "RegExp", "Error",
    "undefined", "NaN", "Infinity", "parseInt", "parseFloat", "setTimeout", "clearTimeout",
    "setInterval", "clearInterval", "require", "module", "exports", "process",
];

static JAVASCRIPT: LangProfile = LangProfile {
    function_kinds: &[
        "function_declaration",
        "generator_function_declaration",
        "function_expression",
        "function",
        "generator_function",
        "arrow_function",
        "method_definition",
    ],
    class_kinds: &["class_declaration", "class"],
    method_kinds: &["method_definition"],
    property_kinds: &["field_definition"],
    import_kinds: &["import_statement"],
    scope_kinds: &[
        "program",
        "function_declaration",
        "generator_function_declaration",
        "function_expression",
        "function",
        "generator_function",
        "arrow_function",
        "method_definition",
        "class_declaration",
        "class",
        "statement_block",
        "for_statement",
        "for_in_statement",
        "catch_clause",
    ],
    declarators: &[
        decl("variable_declarator", Some("name"), "variable"),
        decl("function_declaration", Some("name"), "function"),
        decl("generator_function_declaration", Some("name"), "function"),
        decl("class_declaration", Some("name"), "class"),
        decl("formal_parameters", None, "parameter"),
        decl("arrow_function", Some("parameter"), "parameter"),
        decl("catch_clause", Some("parameter"), "parameter"),
    ],
    builtins: JS_BUILTINS,
    heuristic: false,
};

static TYPESCRIPT: LangProfile = LangProfile {
    function_kinds: &[
        "function_declaration",
        "generator_function_declaration",
        "function_expression",
        "function",
        "generator_function",
        "arrow_function",
        "method_definition",
        "function_signature",
    ],
    class_kinds: &["class_declaration", "abstract_class_declaration", "class"],
    method_kinds: &["method_definition", "method_signature", "abstract_method_signature"],
    property_kinds: &["public_field_definition", "field_definition"],
    import_kinds: &["import_statement"],
    scope_kinds: &[
        "program",
        "function_declaration",
        "generator_function_declaration",
        "function_expression",
        "function",
        "generator_function",
        "arrow_function",
        "method_definition",
        "class_declaration",
        "abstract_class_declaration",
        "class",
        "statement_block",
        "for_statement",
        "for_in_statement",
        "catch_clause",
    ],
    declarators: &[
        decl("variable_declarator", Some("name"), "variable"),
        decl("function_declaration", Some("name"), "function"),
        decl("generator_function_declaration", Some("name"), "function"),
        decl("class_declaration", Some("name"), "class"),
        decl("abstract_class_declaration", Some("name"), "class"),
        decl("interface_declaration", Some("name"), "interface"),
        decl("type_alias_declaration", Some("name"), "type"),
        decl("enum_declaration", Some("name"), "enum"),
        decl("formal_parameters", None, "parameter"),
        decl("arrow_function", Some("parameter"), "parameter"),
        decl("catch_clause", Some("parameter"), "parameter"),
    ],
    builtins: JS_BUILTINS,
    heuristic: false,
};

static PYTHON: LangProfile = LangProfile {
    function_kinds: &["function_definition", "lambda"],
    class_kinds: &["class_definition"],
    method_kinds: &["function_definition"],
    property_kinds: &["expression_statement"],
    import_kinds: &["import_statement", "import_from_statement"],
    scope_kinds: &["module", "function_definition", "class_definition", "lambda"],
    declarators: &[
        decl("function_definition", Some("name"), "function"),
        decl("class_definition", Some("name"), "class"),
        decl("parameters", None, "parameter"),
        decl("lambda_parameters", None, "parameter"),
        decl("assignment", Some("left"), "variable"),
        decl("for_statement", Some("left"), "variable"),
    ],
    builtins: &[
        "print", "len", "range", "enumerate", "zip", "map", "filter", "sorted", "list", "dict",
        "set", "tuple", "str", "int", "float", "bool", "bytes", "object", "type", "isinstance",
        "open", "super", "None", "True", "False", "Exception", "ValueError", "KeyError",
    ],
    heuristic: false,
};

static RUST: LangProfile = LangProfile {
    function_kinds: &["function_item", "function_signature_item", "closure_expression"],
    class_kinds: &["struct_item", "enum_item", "union_item", "trait_item"],
    method_kinds: &["function_item", "function_signature_item"],
    property_kinds: &["field_declaration"],
    import_kinds: &["use_declaration"],
    scope_kinds: &[
        "source_file",
        "function_item",
        "closure_expression",
        "block",
        "impl_item",
        "trait_item",
        "mod_item",
    ],
    declarators: &[
        decl("let_declaration", Some("pattern"), "variable"),
        decl("function_item", Some("name"), "function"),
        decl("struct_item", Some("name"), "struct"),
        decl("enum_item", Some("name"), "enum"),
        decl("union_item", Some("name"), "union"),
        decl("trait_item", Some("name"), "trait"),
        decl("const_item", Some("name"), "constant"),
        decl("static_item", Some("name"), "static"),
        decl("parameters", None, "parameter"),
        decl("closure_parameters", None, "parameter"),
    ],
    builtins: &[
        "Option", "Some", "None", "Result", "Ok", "Err", "Vec", "String", "Box", "Clone",
        "Copy", "Default", "Debug", "Drop", "Iterator", "IntoIterator", "Send", "Sync", "Sized",
        "ToString", "From", "Into",
    ],
    heuristic: false,
};

static GENERIC: LangProfile = LangProfile {
    function_kinds: &[],
    class_kinds: &[],
    method_kinds: &[],
    property_kinds: &[],
    import_kinds: &[],
    scope_kinds: &[],
    declarators: &[],
    builtins: &[],
    heuristic: true,
};

/// Node-kind tables for `lang`, falling back to name heuristics.
pub fn profile(lang: SupportLang) -> &'static LangProfile {
    match lang {
        SupportLang::JavaScript => &JAVASCRIPT,
        SupportLang::TypeScript | SupportLang::Tsx => &TYPESCRIPT,
        SupportLang::Python => &PYTHON,
        SupportLang::Rust => &RUST,
        _ => &GENERIC,
    }
}
