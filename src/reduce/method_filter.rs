// src/reduce/method_filter.rs
//! Drops methods the reachability pass never marked live, except the
//! ones external machinery calls behind the analysis's back.

use std::collections::HashSet;

use crate::analysis::ReachableSet;
use crate::frontend::model::{MethodDecl, ParsedClass};

#[derive(Debug, Default)]
pub struct FilterOutcome {
    /// Indices into `class.methods` of the removed methods.
    pub removed: Vec<usize>,
    /// Their report signatures, in declaration order.
    pub signatures: Vec<String>,
}

/// Selects unreachable methods for removal. `claimed` holds indices the
/// accessor reducer already took; those never appear here, so a bean
/// getter lands in exactly one record.
#[must_use]
pub fn filter_methods(
    class: &ParsedClass,
    reachable: &ReachableSet,
    is_entry: bool,
    claimed: &HashSet<usize>,
) -> FilterOutcome {
    let mut outcome = FilterOutcome::default();
    if is_entry {
        return outcome;
    }

    for (i, method) in class.methods.iter().enumerate() {
        if claimed.contains(&i) {
            continue;
        }
        if is_protected(method, class) {
            continue;
        }
        if reachable.contains(&class.method_id(&method.name)) {
            continue;
        }
        outcome.removed.push(i);
        outcome.signatures.push(method.signature());
    }
    outcome
}

/// Methods the JVM, a framework, or a polymorphic call site may invoke
/// without an edge in the call graph.
fn is_protected(method: &MethodDecl, class: &ParsedClass) -> bool {
    if method.name == class.simple_name {
        return true;
    }
    if method.has_override {
        return true;
    }
    if matches!(method.name.as_str(), "equals" | "hashCode" | "toString") {
        return true;
    }
    is_main(method)
}

fn is_main(method: &MethodDecl) -> bool {
    method.name == "main"
        && method.is_static
        && method.params.len() == 1
        && matches!(method.params[0].ty.as_str(), "String[]" | "String...")
}
