// src/reduce/mod.rs
//! Per-class content reduction: accessor elision, unreachable-method
//! removal, body stubbing, and import trimming, all expressed as byte
//! edits against the original source.

pub mod accessors;
pub mod edits;
pub mod method_filter;
pub mod simplify;

use std::collections::HashSet;

use crate::analysis::ReachableSet;
use crate::config::Config;
use crate::frontend::ParsedClass;
use edits::Edit;

/// What reduction did to one class: the rendered text plus the two
/// removal records the report lists.
#[derive(Debug)]
pub struct ReducedClass {
    pub text: String,
    pub omitted_accessors: Vec<String>,
    pub removed_methods: Vec<String>,
}

/// Runs the reduction stack on one class. A degraded class passes
/// through verbatim; there are no spans to edit safely.
#[must_use]
pub fn reduce_class(
    class: &ParsedClass,
    config: &Config,
    reachable: &ReachableSet,
    depth: usize,
) -> ReducedClass {
    if class.degraded {
        return ReducedClass {
            text: class.source.clone(),
            omitted_accessors: Vec::new(),
            removed_methods: Vec::new(),
        };
    }

    let is_entry = class.name == config.entry_class;
    let mut all_edits: Vec<Edit> = Vec::new();
    let mut claimed: HashSet<usize> = HashSet::new();
    let mut omitted_accessors = Vec::new();

    // Accessor elision applies everywhere, entry class included; only
    // the reachability filter below exempts the entry class.
    if config.omit_accessors {
        for index in accessors::find_accessors(class) {
            let method = &class.methods[index];
            omitted_accessors.push(method.signature());
            all_edits.push(Edit::remove(edits::expand_removal(
                &class.source,
                method.span.clone(),
            )));
            claimed.insert(index);
        }
    }

    let mut removed_methods = Vec::new();
    if config.remove_unreachable {
        let outcome = method_filter::filter_methods(class, reachable, is_entry, &claimed);
        for &index in &outcome.removed {
            let method = &class.methods[index];
            all_edits.push(Edit::remove(edits::expand_removal(
                &class.source,
                method.span.clone(),
            )));
            claimed.insert(index);
        }
        removed_methods = outcome.signatures;
    }

    if !is_entry && !config.keeps_full_bodies(&class.name, depth) {
        all_edits.extend(simplify::stub_bodies(class, &claimed));
    }

    if config.trims_imports() {
        for import in &class.imports {
            if !import.is_static && !config.keeps_import(&import.path) {
                all_edits.push(Edit::remove(edits::expand_removal(
                    &class.source,
                    import.span.clone(),
                )));
            }
        }
    }

    ReducedClass {
        text: edits::apply(&class.source, all_edits),
        omitted_accessors,
        removed_methods,
    }
}
