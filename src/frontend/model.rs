// src/frontend/model.rs
//! Syntax facts the core consumes, extracted once per class.

use std::ops::Range;

#[derive(Debug, Clone)]
pub struct Import {
    pub path: String,
    pub is_static: bool,
    pub is_wildcard: bool,
    /// Byte span of the whole `import ...;` declaration.
    pub span: Range<usize>,
}

#[derive(Debug, Clone)]
pub struct FieldDecl {
    pub name: String,
    /// Declared type as written in source, generics included.
    pub ty: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    /// A method invocation, possibly qualified.
    Method,
    /// A `new Type(...)` expression.
    New,
}

#[derive(Debug, Clone)]
pub struct CallSite {
    /// The qualifier expression text, if any (`this`, a field name, a
    /// chained call, a partially qualified class name).
    pub qualifier: Option<String>,
    /// Callee simple name; for `New`, the created type's base name.
    pub name: String,
    pub kind: CallKind,
}

#[derive(Debug, Clone)]
pub struct BodyInfo {
    /// Byte span of the body block, braces included.
    pub span: Range<usize>,
    /// Byte spans of the block's top-level statements.
    pub statements: Vec<Range<usize>>,
    /// Lines between the braces, the original's "single line method" metric.
    pub effective_lines: usize,
}

#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub ty: String,
}

#[derive(Debug, Clone)]
pub struct MethodDecl {
    pub name: String,
    pub params: Vec<Param>,
    /// Return type as written; `void` for void methods.
    pub return_type: String,
    pub throws: Vec<String>,
    pub is_static: bool,
    pub has_override: bool,
    /// Byte span of the whole declaration (annotations included,
    /// preceding javadoc excluded).
    pub span: Range<usize>,
    pub body: Option<BodyInfo>,
    pub calls: Vec<CallSite>,
}

impl MethodDecl {
    /// Report signature, rendered without modifiers: `int getX()`.
    #[must_use]
    pub fn signature(&self) -> String {
        let params: Vec<&str> = self.params.iter().map(|p| p.ty.as_str()).collect();
        format!("{} {}({})", self.return_type, self.name, params.join(", "))
    }
}

#[derive(Debug, Clone)]
pub struct CtorDecl {
    pub params: Vec<Param>,
    pub span: Range<usize>,
    pub body: Option<BodyInfo>,
    /// Byte span of an explicit `super(...)` / `this(...)` statement.
    pub explicit_invocation: Option<Range<usize>>,
    pub calls: Vec<CallSite>,
}

#[derive(Debug, Clone)]
pub struct ParsedClass {
    /// Fully qualified name.
    pub name: String,
    pub simple_name: String,
    pub package: String,
    pub source: String,
    /// True when the source did not parse cleanly. A degraded class
    /// contributes no graph edges and is rendered verbatim.
    pub degraded: bool,
    pub imports: Vec<Import>,
    /// Declared supertypes/interfaces as resolved qualified names
    /// (import table, else same-package best effort).
    pub supertypes: Vec<String>,
    pub fields: Vec<FieldDecl>,
    pub methods: Vec<MethodDecl>,
    pub ctors: Vec<CtorDecl>,
    /// Classes the declaration surface mentions: imports, supertypes,
    /// field types, method signature types (generic arguments included).
    pub level_refs: Vec<String>,
}

impl ParsedClass {
    /// Placeholder for a class whose source failed to parse.
    #[must_use]
    pub fn degraded(name: &str, source: String) -> Self {
        let simple_name = simple_name_of(name).to_string();
        let package = package_of(name).to_string();
        Self {
            name: name.to_string(),
            simple_name,
            package,
            source,
            degraded: true,
            imports: Vec::new(),
            supertypes: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            ctors: Vec::new(),
            level_refs: Vec::new(),
        }
    }

    #[must_use]
    pub fn declares_method(&self, name: &str) -> bool {
        self.methods.iter().any(|m| m.name == name)
    }

    #[must_use]
    pub fn field_type(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.ty.as_str())
    }

    /// Coarse method identity: `qualified.Class.method`. Overloads of a
    /// name collapse to one node.
    #[must_use]
    pub fn method_id(&self, method: &str) -> String {
        format!("{}.{}", self.name, method)
    }

    /// Identity of this class's constructor node.
    #[must_use]
    pub fn ctor_id(&self) -> String {
        format!("{}.{}", self.name, self.simple_name)
    }
}

/// Last dot-separated segment of a qualified name.
#[must_use]
pub fn simple_name_of(qualified: &str) -> &str {
    qualified.rsplit_once('.').map_or(qualified, |(_, s)| s)
}

/// Everything before the last dot; empty for the default package.
#[must_use]
pub fn package_of(qualified: &str) -> &str {
    qualified.rsplit_once('.').map_or("", |(p, _)| p)
}

/// Owning class of a coarse method identity.
#[must_use]
pub fn class_of_method(method_id: &str) -> &str {
    method_id.rsplit_once('.').map_or(method_id, |(c, _)| c)
}
