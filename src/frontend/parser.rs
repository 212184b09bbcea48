// src/frontend/parser.rs
//! Tree-sitter pass that turns one Java source file into a `ParsedClass`.
//!
//! Everything Java-specific lives here and in `resolve`; the analysis
//! core only ever sees the extracted facts.

use std::collections::BTreeSet;
use std::ops::Range;
use std::sync::LazyLock;

use log::warn;
use regex::Regex;
use tree_sitter::{Node, Parser};

use super::model::{
    BodyInfo, CallKind, CallSite, CtorDecl, FieldDecl, Import, MethodDecl, Param, ParsedClass,
    simple_name_of,
};

static IDENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z_][A-Za-z0-9_]*").expect("identifier regex"));

const COMMENT_KINDS: [&str; 3] = ["comment", "line_comment", "block_comment"];

/// Parses one class. `expected_name` is the qualified name the caller
/// looked up; it only decides which top-level type is the primary one
/// when the file declares several.
#[must_use]
pub fn parse_source(expected_name: &str, source: &str) -> ParsedClass {
    let mut parser = Parser::new();
    if parser.set_language(tree_sitter_java::language()).is_err() {
        return ParsedClass::degraded(expected_name, source.to_string());
    }

    let Some(tree) = parser.parse(source, None) else {
        return ParsedClass::degraded(expected_name, source.to_string());
    };

    let root = tree.root_node();
    if root.has_error() {
        warn!("Syntax errors in {expected_name}; emitting the class verbatim");
        return ParsedClass::degraded(expected_name, source.to_string());
    }

    let package = find_package(root, source);
    let imports = find_imports(root, source);

    let Some(type_decl) = find_primary_type(root, source, simple_name_of(expected_name)) else {
        return ParsedClass::degraded(expected_name, source.to_string());
    };

    let simple_name = type_decl
        .child_by_field_name("name")
        .map(|n| text(n, source).to_string())
        .unwrap_or_else(|| simple_name_of(expected_name).to_string());
    let name = if package.is_empty() {
        simple_name.clone()
    } else {
        format!("{package}.{simple_name}")
    };

    let supertypes = find_supertypes(type_decl, source, &imports, &package);
    let mut class = ParsedClass {
        name,
        simple_name,
        package,
        source: source.to_string(),
        degraded: false,
        imports,
        supertypes,
        fields: Vec::new(),
        methods: Vec::new(),
        ctors: Vec::new(),
        level_refs: Vec::new(),
    };

    if let Some(body) = type_decl.child_by_field_name("body") {
        collect_members(body, source, &mut class);
    }
    class.level_refs = collect_level_refs(&class);
    class
}

fn text<'a>(node: Node, source: &'a str) -> &'a str {
    node.utf8_text(source.as_bytes()).unwrap_or("")
}

fn is_comment(kind: &str) -> bool {
    COMMENT_KINDS.contains(&kind)
}

fn find_package(root: Node, source: &str) -> String {
    let mut cursor = root.walk();
    for child in root.named_children(&mut cursor) {
        if child.kind() == "package_declaration" {
            let mut inner = child.walk();
            for part in child.named_children(&mut inner) {
                if matches!(part.kind(), "scoped_identifier" | "identifier") {
                    return text(part, source).to_string();
                }
            }
        }
    }
    String::new()
}

fn find_imports(root: Node, source: &str) -> Vec<Import> {
    let mut imports = Vec::new();
    let mut cursor = root.walk();
    for child in root.named_children(&mut cursor) {
        if child.kind() != "import_declaration" {
            continue;
        }
        let decl_text = text(child, source);
        let is_static = decl_text.contains("static ");
        let is_wildcard = decl_text.contains(".*");
        let mut inner = child.walk();
        for part in child.named_children(&mut inner) {
            if matches!(part.kind(), "scoped_identifier" | "identifier") {
                imports.push(Import {
                    path: text(part, source).to_string(),
                    is_static,
                    is_wildcard,
                    span: child.byte_range(),
                });
                break;
            }
        }
    }
    imports
}

/// Picks the top-level type this file is keyed by: the one matching the
/// requested simple name, else the first declared type.
fn find_primary_type<'t>(root: Node<'t>, source: &str, wanted: &str) -> Option<Node<'t>> {
    let mut first = None;
    let mut cursor = root.walk();
    for child in root.named_children(&mut cursor) {
        if !matches!(
            child.kind(),
            "class_declaration" | "interface_declaration" | "enum_declaration"
        ) {
            continue;
        }
        if first.is_none() {
            first = Some(child);
        }
        let declared = child
            .child_by_field_name("name")
            .map(|n| text(n, source))
            .unwrap_or("");
        if declared == wanted {
            return Some(child);
        }
    }
    first
}

fn find_supertypes(
    type_decl: Node,
    source: &str,
    imports: &[Import],
    package: &str,
) -> Vec<String> {
    let mut names = Vec::new();
    if let Some(superclass) = type_decl.child_by_field_name("superclass") {
        push_supertype_names(superclass, source, imports, package, &mut names);
    }
    if let Some(interfaces) = type_decl.child_by_field_name("interfaces") {
        push_supertype_names(interfaces, source, imports, package, &mut names);
    }
    // `interface Foo extends Bar` uses a plain child, not a field.
    let mut cursor = type_decl.walk();
    for child in type_decl.named_children(&mut cursor) {
        if child.kind() == "extends_interfaces" {
            push_supertype_names(child, source, imports, package, &mut names);
        }
    }
    names
}

fn push_supertype_names(
    node: Node,
    source: &str,
    imports: &[Import],
    package: &str,
    out: &mut Vec<String>,
) {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "type_list" => push_supertype_names(child, source, imports, package, out),
            "type_identifier" | "scoped_type_identifier" | "generic_type" => {
                let base = base_type_name(text(child, source));
                if let Some(resolved) = resolve_supertype(&base, imports, package) {
                    if !out.contains(&resolved) {
                        out.push(resolved);
                    }
                }
            }
            _ => {}
        }
    }
}

/// Import-table lookup, falling back to a same-package guess. The guess
/// is verified against the filesystem later by the locator.
fn resolve_supertype(simple: &str, imports: &[Import], package: &str) -> Option<String> {
    if simple.contains('.') {
        return Some(simple.to_string());
    }
    if is_primitive_or_common(simple) {
        return None;
    }
    if let Some(path) = lookup_import(simple, imports) {
        return Some(path);
    }
    if package.is_empty() {
        Some(simple.to_string())
    } else {
        Some(format!("{package}.{simple}"))
    }
}

fn lookup_import(simple: &str, imports: &[Import]) -> Option<String> {
    imports
        .iter()
        .filter(|i| !i.is_static && !i.is_wildcard)
        .find(|i| i.path.ends_with(&format!(".{simple}")))
        .map(|i| i.path.clone())
}

fn collect_members(body: Node, source: &str, class: &mut ParsedClass) {
    let mut cursor = body.walk();
    for member in body.named_children(&mut cursor) {
        match member.kind() {
            "field_declaration" => collect_field(member, source, class),
            "method_declaration" => {
                if let Some(method) = build_method(member, source) {
                    class.methods.push(method);
                }
            }
            "constructor_declaration" => class.ctors.push(build_ctor(member, source)),
            // Nested types keep their text; their members are not modeled.
            _ => {}
        }
    }
}

fn collect_field(field: Node, source: &str, class: &mut ParsedClass) {
    let Some(ty) = field.child_by_field_name("type") else {
        return;
    };
    let ty_text = text(ty, source).to_string();
    let mut cursor = field.walk();
    for declarator in field.named_children(&mut cursor) {
        if declarator.kind() != "variable_declarator" {
            continue;
        }
        if let Some(name) = declarator.child_by_field_name("name") {
            class.fields.push(FieldDecl {
                name: text(name, source).to_string(),
                ty: ty_text.clone(),
            });
        }
    }
}

fn build_method(node: Node, source: &str) -> Option<MethodDecl> {
    let name = text(node.child_by_field_name("name")?, source).to_string();
    let return_type = node
        .child_by_field_name("type")
        .map(|n| text(n, source).to_string())
        .unwrap_or_else(|| "void".to_string());

    let (is_static, has_override) = read_modifiers(node, source);
    let params = read_params(node, source);
    let throws = read_throws(node, source);
    let body_node = node.child_by_field_name("body");
    let body = body_node.map(build_body);
    let calls = body_node
        .map(|b| collect_calls(b, source))
        .unwrap_or_default();

    Some(MethodDecl {
        name,
        params,
        return_type,
        throws,
        is_static,
        has_override,
        span: node.byte_range(),
        body,
        calls,
    })
}

fn build_ctor(node: Node, source: &str) -> CtorDecl {
    let params = read_params(node, source);
    let body_node = node.child_by_field_name("body");
    let body = body_node.map(build_body);
    let explicit_invocation = body_node.and_then(|b| {
        let mut cursor = b.walk();
        let invocation = b
            .named_children(&mut cursor)
            .find(|c| c.kind() == "explicit_constructor_invocation");
        invocation.map(|c| c.byte_range())
    });
    let calls = body_node
        .map(|b| collect_calls(b, source))
        .unwrap_or_default();

    CtorDecl {
        params,
        span: node.byte_range(),
        body,
        explicit_invocation,
        calls,
    }
}

fn read_modifiers(node: Node, source: &str) -> (bool, bool) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "modifiers" {
            let mods = text(child, source);
            let is_static = mods.split_whitespace().any(|m| m == "static");
            let has_override = mods.contains("@Override");
            return (is_static, has_override);
        }
    }
    (false, false)
}

fn read_params(node: Node, source: &str) -> Vec<Param> {
    let Some(params_node) = node.child_by_field_name("parameters") else {
        return Vec::new();
    };
    let mut params = Vec::new();
    let mut cursor = params_node.walk();
    for param in params_node.named_children(&mut cursor) {
        if !matches!(param.kind(), "formal_parameter" | "spread_parameter") {
            continue;
        }
        let ty = param
            .child_by_field_name("type")
            .map(|n| text(n, source).to_string())
            .unwrap_or_default();
        let name = param
            .child_by_field_name("name")
            .map(|n| text(n, source).to_string())
            .unwrap_or_default();
        params.push(Param { name, ty });
    }
    params
}

fn read_throws(node: Node, source: &str) -> Vec<String> {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if child.kind() == "throws" {
            let mut inner = child.walk();
            return child
                .named_children(&mut inner)
                .map(|t| text(t, source).to_string())
                .collect();
        }
    }
    Vec::new()
}

fn build_body(block: Node) -> BodyInfo {
    let mut statements: Vec<Range<usize>> = Vec::new();
    let mut cursor = block.walk();
    for stmt in block.named_children(&mut cursor) {
        if !is_comment(stmt.kind()) {
            statements.push(stmt.byte_range());
        }
    }

    let start_row = block.start_position().row;
    let end_row = block.end_position().row;
    let effective_lines = if end_row > start_row {
        end_row - start_row - 1
    } else {
        usize::from(!statements.is_empty())
    };

    BodyInfo {
        span: block.byte_range(),
        statements,
        effective_lines,
    }
}

/// Collects every call expression in a subtree: method invocations with
/// their qualifier text, and `new Type(...)` creations.
fn collect_calls(node: Node, source: &str) -> Vec<CallSite> {
    let mut calls = Vec::new();
    let mut stack = vec![node];
    // Work-list traversal; deeply nested expressions must not recurse.
    while let Some(current) = stack.pop() {
        match current.kind() {
            "method_invocation" => {
                if let Some(name) = current.child_by_field_name("name") {
                    calls.push(CallSite {
                        qualifier: current
                            .child_by_field_name("object")
                            .map(|o| text(o, source).to_string()),
                        name: text(name, source).to_string(),
                        kind: CallKind::Method,
                    });
                }
            }
            "object_creation_expression" => {
                if let Some(ty) = current.child_by_field_name("type") {
                    calls.push(CallSite {
                        qualifier: None,
                        name: base_type_name(text(ty, source)),
                        kind: CallKind::New,
                    });
                }
            }
            _ => {}
        }
        let mut cursor = current.walk();
        for child in current.named_children(&mut cursor) {
            stack.push(child);
        }
    }
    calls
}

/// Class-level referenced names: project imports, supertypes, field
/// types and method signature types (generic arguments included),
/// resolved through the import table.
fn collect_level_refs(class: &ParsedClass) -> Vec<String> {
    let mut refs: BTreeSet<String> = BTreeSet::new();

    for import in &class.imports {
        if !import.is_static && !import.is_wildcard {
            refs.insert(import.path.clone());
        }
    }
    refs.extend(class.supertypes.iter().cloned());

    let mut type_texts: Vec<&str> = Vec::new();
    for field in &class.fields {
        type_texts.push(&field.ty);
    }
    for method in &class.methods {
        type_texts.push(&method.return_type);
        for param in &method.params {
            type_texts.push(&param.ty);
        }
        for thrown in &method.throws {
            type_texts.push(thrown);
        }
    }
    for ctor in &class.ctors {
        for param in &ctor.params {
            type_texts.push(&param.ty);
        }
    }

    for ty in type_texts {
        for simple in type_names_in(ty) {
            if let Some(path) = lookup_import(&simple, &class.imports) {
                refs.insert(path);
            } else if !class.package.is_empty() && simple.len() > 1 {
                // Unimported type: same-package candidate. Single-letter
                // names are almost always generic parameters, not classes.
                // The graph builder filters non-project guesses and the
                // locator drops the nonexistent ones.
                refs.insert(format!("{}.{simple}", class.package));
            }
        }
    }

    refs.into_iter().collect()
}

/// Base identifier of a type as written: strips generics and arrays,
/// keeps a dotted qualifier.
#[must_use]
pub fn base_type_name(ty: &str) -> String {
    let no_generics = ty.split('<').next().unwrap_or(ty);
    no_generics.trim().trim_end_matches("[]").trim().to_string()
}

/// All type identifiers mentioned in a type string, nested generic
/// arguments included: `Map<String, List<Foo>>` -> Map, String, List, Foo.
fn type_names_in(ty: &str) -> Vec<String> {
    IDENT_RE
        .find_iter(ty)
        .map(|m| m.as_str().to_string())
        .filter(|name| !is_primitive_or_common(name))
        .collect()
}

fn is_primitive_or_common(name: &str) -> bool {
    matches!(
        name,
        "void"
            | "boolean"
            | "byte"
            | "short"
            | "int"
            | "long"
            | "float"
            | "double"
            | "char"
            | "extends"
            | "super"
            | "final"
            | "String"
            | "Object"
            | "Integer"
            | "Long"
            | "Boolean"
            | "Double"
            | "Float"
            | "Character"
            | "Byte"
            | "Short"
            | "Void"
            | "Number"
            | "CharSequence"
            | "Exception"
            | "RuntimeException"
            | "Throwable"
            | "Error"
    )
}
