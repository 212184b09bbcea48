// src/pipeline.rs
//! Run orchestration: class graph, call graph waves, reachability,
//! retained-class selection, per-class reduction, and report assembly.
//!
//! Per-class failures are logged and skipped; only configuration and
//! entry-class problems abort a run.

use std::collections::HashSet;

use log::{debug, info, warn};

use crate::analysis::{essential, reach, CallGraph, CallGraphBuilder, ClassGraphBuilder};
use crate::config::Config;
use crate::error::{Result, SliceError};
use crate::frontend::model::class_of_method;
use crate::frontend::Frontend;
use crate::reduce;
use crate::report::{ClassSection, RemovedMember, SliceReport};
use crate::tokens::TokenStats;

/// Runs the whole slice.
///
/// # Errors
/// Returns an error when the configuration is invalid or the entry
/// class's source cannot be found or read.
pub fn run(config: &Config) -> Result<SliceReport> {
    config.validate()?;

    let frontend = Frontend::new(config);
    let Some(entry) = frontend.class(&config.entry_class) else {
        return Err(SliceError::ClassNotFound(config.entry_class.clone()));
    };

    let mut class_builder = ClassGraphBuilder::new(config, &frontend);
    class_builder.expand(&config.entry_class, 0);
    info!(
        "Class graph: {} classes from {}",
        class_builder.graph().len(),
        config.entry_class
    );

    let call_graph = build_call_graph(config, &frontend, &mut class_builder);
    let class_graph = class_builder.into_graph();

    let reachable = reach::propagate(&entry, &call_graph);
    debug!("{} reachable method nodes", reachable.len());

    let mut retained: HashSet<String> = if config.remove_unreachable {
        let mut owners: HashSet<String> = HashSet::new();
        owners.insert(entry.name.clone());
        for method_id in reachable.iter() {
            let owner = class_of_method(method_id);
            if class_graph.contains(owner) {
                owners.insert(owner.to_string());
            }
            // A live method also drags in every class it references.
            if let Some(refs) = call_graph.referenced_classes(method_id) {
                for class in refs {
                    if class_graph.contains(class) {
                        owners.insert(class.clone());
                    }
                }
            }
        }
        owners
    } else {
        class_graph.known_set()
    };
    retained = essential::complete(&retained, &frontend, config);

    // Essential completion can pull in a supertype the depth bound cut
    // off; it renders after everything the graph placed.
    let overflow_depth = class_graph
        .ordered()
        .last()
        .map_or(0, |(_, depth)| depth + 1);

    let mut ordered: Vec<(String, usize)> = retained
        .iter()
        .map(|name| {
            let depth = class_graph.depth(name).unwrap_or(overflow_depth);
            (name.clone(), depth)
        })
        .collect();
    ordered.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));

    let mut stats = TokenStats::default();
    let mut sections = Vec::new();
    let mut omitted_accessors = Vec::new();
    let mut removed_methods = Vec::new();

    for (name, depth) in ordered {
        let Some(class) = frontend.class(&name) else {
            warn!("Retained class {name} has no source; skipped");
            continue;
        };
        let reduced = reduce::reduce_class(&class, config, &reachable, depth);
        let class_stats = TokenStats::of_class(&class.source, &reduced.text);
        stats.absorb(class_stats);
        for signature in reduced.omitted_accessors {
            omitted_accessors.push(RemovedMember {
                class: name.clone(),
                signature,
            });
        }
        for signature in reduced.removed_methods {
            removed_methods.push(RemovedMember {
                class: name.clone(),
                signature,
            });
        }
        sections.push(ClassSection {
            name,
            depth,
            text: reduced.text,
            stats: class_stats,
        });
    }

    Ok(SliceReport {
        entry_class: config.entry_class.clone(),
        sections,
        stats,
        omitted_accessors,
        removed_methods,
        imports_trimmed: config.trims_imports(),
        show_accessors: config.show_accessors && config.omit_accessors,
        show_removed: config.show_removed && config.remove_unreachable,
    })
}

/// Scans in waves: targets the resolver names that the reference BFS
/// never saw are absorbed into the class graph and scanned next round.
fn build_call_graph(
    config: &Config,
    frontend: &Frontend,
    class_builder: &mut ClassGraphBuilder,
) -> CallGraph {
    let builder = CallGraphBuilder::new(config, frontend);
    let mut call_graph = CallGraph::default();
    let mut scanned: HashSet<String> = HashSet::new();

    loop {
        let known = class_builder.graph().known_set();
        let wave: Vec<(String, usize)> = class_builder
            .graph()
            .ordered()
            .into_iter()
            .filter(|(name, _)| !scanned.contains(name))
            .collect();
        if wave.is_empty() {
            break;
        }
        for (name, _) in &wave {
            scanned.insert(name.clone());
        }

        let result = builder.scan(&wave, &known);
        call_graph.merge(result.graph);
        for (class, depth) in result.discovered {
            class_builder.absorb(&class, depth);
        }
    }
    call_graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn write(root: &Path, class: &str, body: &str) {
        let rel = format!("{}.java", class.replace('.', "/"));
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, body).unwrap();
    }

    #[test]
    fn test_missing_entry_class_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.project_root = dir.path().to_path_buf();
        config.entry_class = "com.example.Ghost".to_string();

        assert!(run(&config).is_err());
    }

    #[test]
    fn test_lone_entry_class() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "com.example.App",
            "package com.example;\n\npublic class App {\n    public static void main(String[] args) {\n    }\n}\n",
        );
        let mut config = Config::default();
        config.project_root = dir.path().to_path_buf();
        config.entry_class = "com.example.App".to_string();

        let report = run(&config).unwrap();
        assert_eq!(report.sections.len(), 1);
        assert_eq!(report.sections[0].name, "com.example.App");
        assert!(report.removed_methods.is_empty());
    }
}
