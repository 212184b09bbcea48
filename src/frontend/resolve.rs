// src/frontend/resolve.rs
//! Call-target resolution: maps a call site to a `(class, method)` pair.
//!
//! Resolution is best-effort and explicitly two-valued: `Resolved` or
//! `Unresolved`. A dropped edge only under-approximates reachability;
//! the caller logs it at debug level and moves on. The string-shape
//! heuristics stay inside this module; the core never inspects
//! qualifier text itself.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use super::model::{simple_name_of, CallKind, CallSite, ParsedClass};
use super::parser::base_type_name;

/// Shape guard for the fallback: a dotted identifier chain, nothing else.
static SCOPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_$.]*$").expect("scope regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallTarget {
    Resolved { class: String, method: String },
    Unresolved,
}

/// The candidate universe a resolution runs against: classes discovered
/// so far, plus the project predicate for fully-qualified qualifiers
/// that name classes the graph has not met yet.
pub struct ScopeQuery<'a> {
    pub known: &'a HashSet<String>,
    pub is_project: &'a dyn Fn(&str) -> bool,
}

#[must_use]
pub fn resolve_call(site: &CallSite, class: &ParsedClass, query: &ScopeQuery) -> CallTarget {
    match site.kind {
        CallKind::New => resolve_creation(site, class, query),
        CallKind::Method => resolve_invocation(site, class, query),
    }
}

fn resolve_creation(site: &CallSite, class: &ParsedClass, query: &ScopeQuery) -> CallTarget {
    match resolve_type(&site.name, class, query) {
        Some(target) => CallTarget::Resolved {
            method: simple_name_of(&target).to_string(),
            class: target,
        },
        None => CallTarget::Unresolved,
    }
}

fn resolve_invocation(site: &CallSite, class: &ParsedClass, query: &ScopeQuery) -> CallTarget {
    let Some(qualifier) = site.qualifier.as_deref() else {
        // Unqualified: an own-class call when the class declares the
        // method, otherwise a static import or inherited member we
        // cannot pin down.
        if class.declares_method(&site.name) {
            return resolved(&class.name, &site.name);
        }
        return CallTarget::Unresolved;
    };

    if qualifier == "this" {
        return resolved(&class.name, &site.name);
    }
    if qualifier == "super" {
        if let Some(parent) = class.supertypes.first() {
            if query.known.contains(parent) || (query.is_project)(parent) {
                return resolved(parent, &site.name);
            }
        }
        return CallTarget::Unresolved;
    }

    match resolve_qualifier(qualifier, class, query) {
        Some(target) => resolved(&target, &site.name),
        None => CallTarget::Unresolved,
    }
}

fn resolved(class: &str, method: &str) -> CallTarget {
    CallTarget::Resolved {
        class: class.to_string(),
        method: method.to_string(),
    }
}

fn resolve_qualifier(qualifier: &str, class: &ParsedClass, query: &ScopeQuery) -> Option<String> {
    // A field of the current class: resolve through its declared type.
    if let Some(field_ty) = class.field_type(qualifier) {
        let base = base_type_name(field_ty);
        if let Some(target) = resolve_type(&base, class, query) {
            return Some(target);
        }
    }

    // A class named directly: a bare static call or a fully qualified
    // one. Dotted names go through here too so the heuristic below never
    // cuts a real class name at its last segment.
    if !qualifier.contains('(') {
        if let Some(target) = resolve_type(qualifier, class, query) {
            return Some(target);
        }
    }

    heuristic_scope(qualifier, class, query.known)
}

/// Simple or qualified type name -> fully qualified class name, via the
/// import table, the known-class set, the same-package guess, or the
/// project predicate for already-qualified names.
fn resolve_type(name: &str, class: &ParsedClass, query: &ScopeQuery) -> Option<String> {
    if name.contains('.') {
        if query.known.contains(name) || (query.is_project)(name) {
            return Some(name.to_string());
        }
        return None;
    }
    if let Some(path) = class
        .imports
        .iter()
        .filter(|i| !i.is_static && !i.is_wildcard)
        .find(|i| i.path.ends_with(&format!(".{name}")))
    {
        return Some(path.path.clone());
    }
    // Same-package classes are never imported; accept the guess when it
    // falls inside the project and the name is class-shaped. The locator
    // drops it later if no such file exists.
    if !class.package.is_empty() {
        let guess = format!("{}.{name}", class.package);
        let class_shaped = name.chars().next().is_some_and(char::is_uppercase);
        if query.known.contains(&guess) || (class_shaped && (query.is_project)(&guess)) {
            return Some(guess);
        }
    }
    if query.known.contains(name) {
        return Some(name.to_string());
    }
    None
}

/// Last-resort scope determination for qualifier expressions symbol
/// resolution gave up on: strips a trailing call, cuts at the last dot,
/// then matches the remainder against the known-class set. Produces no
/// answer rather than a guess when the shape is not a name chain.
fn heuristic_scope(scope: &str, class: &ParsedClass, known: &HashSet<String>) -> Option<String> {
    let candidate = if let Some(paren) = scope.find('(') {
        let expr = &scope[..paren];
        match expr.rfind('.') {
            Some(dot) => &expr[..dot],
            None => expr,
        }
    } else if let Some(dot) = scope.rfind('.') {
        &scope[..dot]
    } else {
        scope
    };
    let candidate = candidate.trim();

    if candidate.is_empty() || !SCOPE_RE.is_match(candidate) {
        return None;
    }
    // A chain rooted in a field: attribute the call to the field's type.
    // Coarse, but better than dropping the whole chain.
    if let Some(field_ty) = class.field_type(candidate) {
        let base = base_type_name(field_ty);
        if let Some(path) = class
            .imports
            .iter()
            .filter(|i| !i.is_static && !i.is_wildcard)
            .find(|i| i.path.ends_with(&format!(".{base}")))
        {
            return Some(path.path.clone());
        }
    }
    if known.contains(candidate) {
        return Some(candidate.to_string());
    }
    let suffix = format!(".{candidate}");
    if let Some(hit) = known.iter().find(|k| k.ends_with(&suffix)) {
        return Some(hit.clone());
    }
    if !class.package.is_empty() {
        let guess = format!("{}.{candidate}", class.package);
        if known.contains(&guess) {
            return Some(guess);
        }
    }
    None
}
