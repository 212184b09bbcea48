// src/analysis/call_graph.rs
//! Method-level call graph. Each class is scanned independently (in
//! parallel) for call sites; edges use the coarse `Class.method`
//! identity, so overloads of one name collapse to a single node.

use std::collections::{HashMap, HashSet};

use log::debug;
use rayon::prelude::*;

use crate::config::Config;
use crate::frontend::{resolve, CallTarget, Frontend, ScopeQuery};

#[derive(Debug, Default)]
pub struct CallGraph {
    /// Caller method id -> callee method ids.
    calls: HashMap<String, HashSet<String>>,
    /// Caller method id -> classes its resolved call targets live in.
    /// Feeds retained-class selection: a live method drags in every
    /// class it references.
    class_refs: HashMap<String, HashSet<String>>,
}

impl CallGraph {
    #[must_use]
    pub fn callees(&self, method_id: &str) -> Option<&HashSet<String>> {
        self.calls.get(method_id)
    }

    #[must_use]
    pub fn referenced_classes(&self, method_id: &str) -> Option<&HashSet<String>> {
        self.class_refs.get(method_id)
    }

    pub fn method_ids(&self) -> impl Iterator<Item = &str> {
        self.calls.keys().map(String::as_str)
    }

    fn record_method(&mut self, caller_id: String) {
        self.calls.entry(caller_id).or_default();
    }

    fn record_edge(&mut self, caller_id: &str, class: String, method: String) {
        let callee_id = format!("{class}.{method}");
        self.calls
            .entry(caller_id.to_string())
            .or_default()
            .insert(callee_id);
        self.class_refs
            .entry(caller_id.to_string())
            .or_default()
            .insert(class);
    }

    pub fn merge(&mut self, other: CallGraph) {
        for (caller, callees) in other.calls {
            self.calls.entry(caller).or_default().extend(callees);
        }
        for (class, refs) in other.class_refs {
            self.class_refs.entry(class).or_default().extend(refs);
        }
    }
}

/// One scan wave: the edges found plus project classes the resolved
/// targets named that the class graph has not met yet.
pub struct ScanResult {
    pub graph: CallGraph,
    pub discovered: Vec<(String, usize)>,
}

pub struct CallGraphBuilder<'a> {
    config: &'a Config,
    frontend: &'a Frontend,
}

impl<'a> CallGraphBuilder<'a> {
    #[must_use]
    pub fn new(config: &'a Config, frontend: &'a Frontend) -> Self {
        Self { config, frontend }
    }

    /// Scans the given classes against the known-class set. Classes the
    /// front end cannot produce (or produces degraded) contribute no
    /// edges; those failures were already logged where they happened.
    #[must_use]
    pub fn scan(&self, classes: &[(String, usize)], known: &HashSet<String>) -> ScanResult {
        let partials: Vec<(CallGraph, Vec<(String, usize)>)> = classes
            .par_iter()
            .map(|(name, depth)| self.scan_class(name, *depth, known))
            .collect();

        let mut graph = CallGraph::default();
        let mut discovered: Vec<(String, usize)> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        for (partial, found) in partials {
            graph.merge(partial);
            for (class, depth) in found {
                if seen.insert(class.clone()) {
                    discovered.push((class, depth));
                }
            }
        }
        discovered.sort();
        ScanResult { graph, discovered }
    }

    fn scan_class(
        &self,
        class_name: &str,
        depth: usize,
        known: &HashSet<String>,
    ) -> (CallGraph, Vec<(String, usize)>) {
        let mut graph = CallGraph::default();
        let mut discovered = Vec::new();

        let Some(class) = self.frontend.class(class_name) else {
            return (graph, discovered);
        };
        if class.degraded {
            return (graph, discovered);
        }

        let is_project = |name: &str| self.config.is_project_class(name);
        let query = ScopeQuery {
            known,
            is_project: &is_project,
        };

        for method in &class.methods {
            let caller_id = class.method_id(&method.name);
            graph.record_method(caller_id.clone());
            for site in &method.calls {
                self.record_call(
                    &mut graph,
                    &mut discovered,
                    &caller_id,
                    &class,
                    site,
                    &query,
                    depth,
                    known,
                );
            }
        }
        for ctor in &class.ctors {
            let caller_id = class.ctor_id();
            graph.record_method(caller_id.clone());
            for site in &ctor.calls {
                self.record_call(
                    &mut graph,
                    &mut discovered,
                    &caller_id,
                    &class,
                    site,
                    &query,
                    depth,
                    known,
                );
            }
        }

        (graph, discovered)
    }

    #[allow(clippy::too_many_arguments)]
    fn record_call(
        &self,
        graph: &mut CallGraph,
        discovered: &mut Vec<(String, usize)>,
        caller_id: &str,
        class: &crate::frontend::ParsedClass,
        site: &crate::frontend::model::CallSite,
        query: &ScopeQuery,
        depth: usize,
        known: &HashSet<String>,
    ) {
        match resolve::resolve_call(site, class, query) {
            CallTarget::Resolved {
                class: target_class,
                method,
            } => {
                if !self.config.is_project_class(&target_class) {
                    return;
                }
                if !known.contains(&target_class) {
                    discovered.push((target_class.clone(), depth + 1));
                }
                graph.record_edge(caller_id, target_class, method);
            }
            CallTarget::Unresolved => {
                debug!("Unresolved call {} from {caller_id}", site.name);
            }
        }
    }
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

    fn fixture() -> (tempfile::TempDir, Config) {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "com.example.App",
            r#"package com.example;

import com.example.util.Helper;

public class App {
    private Helper helper;

    public App() {
        this.helper = new Helper();
    }

    public void run() {
        helper.assist();
        Registry.lookup();
    }
}
"#,
        );
        write(
            dir.path(),
            "com.example.util.Helper",
            r#"package com.example.util;

public class Helper {
    public void assist() {
    }
}
"#,
        );
        let mut config = Config::default();
        config.project_root = dir.path().to_path_buf();
        config.entry_class = "com.example.App".to_string();
        config.project_prefixes = vec!["com.example".to_string()];
        (dir, config)
    }

    #[test]
    fn test_edges_and_ctor_targets() {
        let (dir, config) = fixture();
        let frontend = Frontend::new(&config);
        let known: HashSet<String> = ["com.example.App", "com.example.util.Helper"]
            .iter()
            .map(ToString::to_string)
            .collect();

        let builder = CallGraphBuilder::new(&config, &frontend);
        let result = builder.scan(&[("com.example.App".to_string(), 0)], &known);

        let ctor_callees = result.graph.callees("com.example.App.App").unwrap();
        assert!(ctor_callees.contains("com.example.util.Helper.Helper"));

        let run_callees = result.graph.callees("com.example.App.run").unwrap();
        assert!(run_callees.contains("com.example.util.Helper.assist"));
        drop(dir);
    }

    #[test]
    fn test_class_refs_keyed_by_caller_method() {
        let (dir, config) = fixture();
        let frontend = Frontend::new(&config);
        let known: HashSet<String> = ["com.example.App", "com.example.util.Helper"]
            .iter()
            .map(ToString::to_string)
            .collect();

        let builder = CallGraphBuilder::new(&config, &frontend);
        let result = builder.scan(&[("com.example.App".to_string(), 0)], &known);

        let run_refs = result.graph.referenced_classes("com.example.App.run").unwrap();
        assert!(run_refs.contains("com.example.util.Helper"));
        let ctor_refs = result.graph.referenced_classes("com.example.App.App").unwrap();
        assert!(ctor_refs.contains("com.example.util.Helper"));
        drop(dir);
    }

    #[test]
    fn test_discovery_reports_unknown_project_classes() {
        let (dir, config) = fixture();
        let frontend = Frontend::new(&config);
        // Helper is absent from the known set, so resolving through the
        // import table discovers it for the next wave.
        let known: HashSet<String> = ["com.example.App".to_string()].into_iter().collect();

        let builder = CallGraphBuilder::new(&config, &frontend);
        let result = builder.scan(&[("com.example.App".to_string(), 0)], &known);

        // Helper through its import, Registry through the same-package
        // guess; both are new to the known set.
        assert_eq!(
            result.discovered,
            vec![
                ("com.example.Registry".to_string(), 1),
                ("com.example.util.Helper".to_string(), 1),
            ]
        );
        drop(dir);
    }

    #[test]
    fn test_methods_without_calls_still_have_nodes() {
        let (dir, config) = fixture();
        let frontend = Frontend::new(&config);
        let known: HashSet<String> = ["com.example.util.Helper".to_string()]
            .into_iter()
            .collect();

        let builder = CallGraphBuilder::new(&config, &frontend);
        let result = builder.scan(&[("com.example.util.Helper".to_string(), 1)], &known);

        let callees = result.graph.callees("com.example.util.Helper.assist").unwrap();
        assert!(callees.is_empty());
        drop(dir);
    }
}
