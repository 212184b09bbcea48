// src/reduce/accessors.rs
//! Trivial bean-accessor detection. A matched getter or setter carries
//! no information a reader cannot infer from the field list, so it is
//! dropped and its signature recorded instead.

use crate::frontend::model::{MethodDecl, ParsedClass};
use crate::frontend::parser::base_type_name;

/// Indices (into `class.methods`) of trivial accessors, in declaration
/// order. Detection is purely structural, so running it again on a
/// class whose accessors were already removed finds nothing.
#[must_use]
pub fn find_accessors(class: &ParsedClass) -> Vec<usize> {
    class
        .methods
        .iter()
        .enumerate()
        .filter(|(_, method)| is_accessor(method, class))
        .map(|(i, _)| i)
        .collect()
}

fn is_accessor(method: &MethodDecl, class: &ParsedClass) -> bool {
    is_getter(method, class) || is_setter(method, class)
}

fn is_getter(method: &MethodDecl, class: &ParsedClass) -> bool {
    let field = match accessed_field(&method.name, &["get", "is"]) {
        Some(f) => f,
        None => return false,
    };
    if !method.params.is_empty() || method.return_type == "void" {
        return false;
    }
    let Some(field_ty) = class.field_type(&field) else {
        return false;
    };
    if base_type_name(field_ty) != base_type_name(&method.return_type) {
        return false;
    }
    let statements = statement_texts(method, &class.source);
    if statements.len() != 1 {
        return false;
    }
    let body = normalize(&statements[0]);
    body == format!("return{field};") || body == format!("returnthis.{field};")
}

fn is_setter(method: &MethodDecl, class: &ParsedClass) -> bool {
    let field = match accessed_field(&method.name, &["set"]) {
        Some(f) => f,
        None => return false,
    };
    if method.params.len() != 1 {
        return false;
    }
    // Plain void setter, or a builder-style one returning the class.
    let ret = base_type_name(&method.return_type);
    let fluent = ret == class.simple_name || ret.ends_with("Builder");
    if method.return_type != "void" && !fluent {
        return false;
    }
    let Some(field_ty) = class.field_type(&field) else {
        return false;
    };
    let param = &method.params[0];
    if base_type_name(field_ty) != base_type_name(&param.ty) {
        return false;
    }

    let statements = statement_texts(method, &class.source);
    let assignment = match statements.as_slice() {
        [single] => single,
        [first, second] if fluent && normalize(second) == "returnthis;" => first,
        _ => return false,
    };
    let body = normalize(assignment);
    let value = &param.name;
    body == format!("this.{field}={value};") || body == format!("{field}={value};")
}

/// `getX`/`isX`/`setX` -> the bean field name `x`. A bare prefix with no
/// property part is not an accessor name.
fn accessed_field(method_name: &str, prefixes: &[&str]) -> Option<String> {
    for prefix in prefixes {
        if let Some(rest) = method_name.strip_prefix(prefix) {
            let mut chars = rest.chars();
            let first = chars.next()?;
            if !first.is_ascii_uppercase() {
                continue;
            }
            return Some(first.to_ascii_lowercase().to_string() + chars.as_str());
        }
    }
    None
}

fn statement_texts(method: &MethodDecl, source: &str) -> Vec<String> {
    let Some(body) = &method.body else {
        return Vec::new();
    };
    body.statements
        .iter()
        .filter(|span| span.end <= source.len())
        .map(|span| source[span.clone()].to_string())
        .collect()
}

fn normalize(statement: &str) -> String {
    statement.chars().filter(|c| !c.is_whitespace()).collect()
}
