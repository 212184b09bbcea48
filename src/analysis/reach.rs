// src/analysis/reach.rs
//! Reachability fixed point over the call graph.
//!
//! Everything declared on the entry class is live by definition, plus
//! two synthesized roots for the external invocations the source never
//! shows: `Entry.main` and the entry constructor.

use std::collections::{HashSet, VecDeque};

use log::debug;

use super::call_graph::CallGraph;
use crate::frontend::ParsedClass;

#[derive(Debug, Default)]
pub struct ReachableSet {
    methods: HashSet<String>,
}

impl ReachableSet {
    #[must_use]
    pub fn contains(&self, method_id: &str) -> bool {
        self.methods.contains(method_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.methods.iter().map(String::as_str)
    }
}

/// Seeds from the entry class and closes over the call graph's edges.
#[must_use]
pub fn propagate(entry: &ParsedClass, graph: &CallGraph) -> ReachableSet {
    let mut queue: VecDeque<String> = VecDeque::new();

    for method in &entry.methods {
        queue.push_back(entry.method_id(&method.name));
    }
    queue.push_back(entry.method_id("main"));
    queue.push_back(entry.ctor_id());
    // Nodes recorded under the entry class that declaration scanning
    // missed (nested types, degraded parses) are seeded too.
    let prefix = format!("{}.", entry.name);
    for id in graph.method_ids() {
        if id.starts_with(&prefix) {
            queue.push_back(id.to_string());
        }
    }

    let mut reachable = ReachableSet::default();
    while let Some(id) = queue.pop_front() {
        if !reachable.methods.insert(id.clone()) {
            continue;
        }
        if let Some(callees) = graph.callees(&id) {
            for callee in callees {
                if !reachable.methods.contains(callee) {
                    queue.push_back(callee.clone());
                }
            }
        }
    }
    debug!("{} reachable methods", reachable.len());
    reachable
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::call_graph::CallGraphBuilder;
    use crate::config::Config;
    use crate::frontend::Frontend;
    use std::fs;
    use std::path::Path;

    fn write(root: &Path, class: &str, body: &str) {
        let rel = format!("{}.java", class.replace('.', "/"));
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, body).unwrap();
    }

    #[test]
    fn test_transitive_closure_and_dead_method() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "com.example.App",
            r#"package com.example;

import com.example.Helper;

public class App {
    public static void main(String[] args) {
        Helper.used();
    }
}
"#,
        );
        write(
            dir.path(),
            "com.example.Helper",
            r#"package com.example;

public class Helper {
    public static void used() {
        chained();
    }

    public static void chained() {
    }

    public static void unused() {
    }
}
"#,
        );

        let mut config = Config::default();
        config.project_root = dir.path().to_path_buf();
        config.entry_class = "com.example.App".to_string();
        let frontend = Frontend::new(&config);
        let known: std::collections::HashSet<String> =
            ["com.example.App", "com.example.Helper"]
                .iter()
                .map(ToString::to_string)
                .collect();
        let classes = vec![
            ("com.example.App".to_string(), 0),
            ("com.example.Helper".to_string(), 1),
        ];
        let result = CallGraphBuilder::new(&config, &frontend).scan(&classes, &known);
        let entry = frontend.class("com.example.App").unwrap();

        let reachable = propagate(&entry, &result.graph);
        assert!(reachable.contains("com.example.App.main"));
        assert!(reachable.contains("com.example.Helper.used"));
        assert!(reachable.contains("com.example.Helper.chained"));
        assert!(!reachable.contains("com.example.Helper.unused"));
        drop(dir);
    }

    #[test]
    fn test_entry_roots_synthesized() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "com.example.App",
            "package com.example;\npublic class App {}\n",
        );
        let mut config = Config::default();
        config.project_root = dir.path().to_path_buf();
        config.entry_class = "com.example.App".to_string();
        let frontend = Frontend::new(&config);
        let entry = frontend.class("com.example.App").unwrap();

        let reachable = propagate(&entry, &CallGraph::default());
        assert!(reachable.contains("com.example.App.main"));
        assert!(reachable.contains("com.example.App.App"));
        drop(dir);
    }
}
