// src/reduce/simplify.rs
//! Body stubbing for classes past the body-depth threshold. Signatures
//! stay intact; multi-line bodies collapse to a type-correct default
//! return and a marker comment.

use std::collections::HashSet;

use crate::frontend::model::{BodyInfo, CtorDecl, MethodDecl, ParsedClass};
use crate::frontend::parser::base_type_name;
use crate::reduce::edits::{line_indent, Edit};

pub const OMITTED_MARKER: &str = "// Implementation details omitted";

/// Replacement edits for every surviving method and constructor body.
/// `removed` holds method indices already claimed by another reducer;
/// their bodies are gone, so there is nothing to stub.
#[must_use]
pub fn stub_bodies(class: &ParsedClass, removed: &HashSet<usize>) -> Vec<Edit> {
    let mut edits = Vec::new();

    for (i, method) in class.methods.iter().enumerate() {
        if removed.contains(&i) {
            continue;
        }
        let Some(body) = &method.body else {
            continue;
        };
        if body.effective_lines <= 1 {
            continue;
        }
        push_if_shorter(&mut edits, stub_method(method, body, &class.source));
    }

    for ctor in &class.ctors {
        let Some(body) = &ctor.body else {
            continue;
        };
        if body.effective_lines <= 1 {
            continue;
        }
        push_if_shorter(&mut edits, stub_ctor(ctor, body, &class.source));
    }

    edits
}

/// A stub longer than the body it replaces is no reduction; keep the
/// original text so processed size never exceeds the original.
fn push_if_shorter(edits: &mut Vec<Edit>, edit: Edit) {
    if edit.replacement.len() < edit.span.end - edit.span.start {
        edits.push(edit);
    }
}

fn stub_method(method: &MethodDecl, body: &BodyInfo, source: &str) -> Edit {
    let indent = line_indent(source, method.span.start);
    let mut lines = Vec::new();
    if let Some(value) = default_return(&method.return_type) {
        lines.push(format!("return {value};"));
    }
    lines.push(OMITTED_MARKER.to_string());
    Edit::replace(body.span.clone(), render_block(&indent, &lines))
}

/// Constructors keep their explicit `super(...)`/`this(...)` statement;
/// dropping it would change which superclass constructor runs.
fn stub_ctor(ctor: &CtorDecl, body: &BodyInfo, source: &str) -> Edit {
    let indent = line_indent(source, ctor.span.start);
    let mut lines = Vec::new();
    if let Some(invocation) = &ctor.explicit_invocation {
        if invocation.end <= source.len() {
            lines.push(source[invocation.clone()].to_string());
        }
    }
    lines.push(OMITTED_MARKER.to_string());
    Edit::replace(body.span.clone(), render_block(&indent, &lines))
}

fn render_block(indent: &str, lines: &[String]) -> String {
    let mut out = String::from("{\n");
    for line in lines {
        out.push_str(indent);
        out.push_str("    ");
        out.push_str(line);
        out.push('\n');
    }
    out.push_str(indent);
    out.push('}');
    out
}

fn default_return(return_type: &str) -> Option<&'static str> {
    match base_type_name(return_type).as_str() {
        "void" => None,
        "boolean" => Some("false"),
        "byte" | "short" | "int" | "long" => Some("0"),
        "float" | "double" => Some("0.0"),
        "char" => Some("'\\0'"),
        _ => Some("null"),
    }
}
