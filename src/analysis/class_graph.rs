// src/analysis/class_graph.rs
//! Class dependency graph: BFS over "what does this class's declaration
//! surface mention", with shortest-path depth tracking.

use std::collections::{HashMap, HashSet, VecDeque};

use log::warn;

use crate::config::Config;
use crate::frontend::Frontend;

/// Read-only snapshot of the discovered classes and their BFS depths.
/// Depth is the shortest in-project reference distance from the entry
/// class; once assigned it only ever decreases.
#[derive(Debug, Default, Clone)]
pub struct ClassGraph {
    depths: HashMap<String, usize>,
}

impl ClassGraph {
    #[must_use]
    pub fn depth(&self, class_name: &str) -> Option<usize> {
        self.depths.get(class_name).copied()
    }

    #[must_use]
    pub fn contains(&self, class_name: &str) -> bool {
        self.depths.contains_key(class_name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.depths.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.depths.is_empty()
    }

    /// Classes sorted by (depth, name) for deterministic downstream order.
    #[must_use]
    pub fn ordered(&self) -> Vec<(String, usize)> {
        let mut classes: Vec<(String, usize)> = self
            .depths
            .iter()
            .map(|(name, depth)| (name.clone(), *depth))
            .collect();
        classes.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        classes
    }

    #[must_use]
    pub fn known_set(&self) -> HashSet<String> {
        self.depths.keys().cloned().collect()
    }
}

/// Owns the depth map during construction; downstream stages only ever
/// see the finished `ClassGraph` snapshot.
pub struct ClassGraphBuilder<'a> {
    config: &'a Config,
    frontend: &'a Frontend,
    graph: ClassGraph,
}

impl<'a> ClassGraphBuilder<'a> {
    #[must_use]
    pub fn new(config: &'a Config, frontend: &'a Frontend) -> Self {
        Self {
            config,
            frontend,
            graph: ClassGraph::default(),
        }
    }

    /// BFS from a seed at the given depth. A class reached again via a
    /// shorter path has its depth lowered and is re-expanded; cycles are
    /// absorbed because a class already at its minimum depth is skipped.
    pub fn expand(&mut self, seed: &str, depth: usize) {
        let mut queue: VecDeque<(String, usize)> = VecDeque::new();
        queue.push_back((seed.to_string(), depth));

        while let Some((name, current_depth)) = queue.pop_front() {
            if !self.config.is_project_class(&name) {
                continue;
            }
            if self.config.max_depth >= 0 && current_depth > self.config.max_depth as usize {
                continue;
            }
            if let Some(&known) = self.graph.depths.get(&name) {
                if known <= current_depth {
                    continue;
                }
            }

            // Unlocatable or unreadable classes never enter the graph.
            let Some(class) = self.frontend.class(&name) else {
                continue;
            };
            self.graph.depths.insert(name.clone(), current_depth);

            for import in &class.imports {
                if import.is_wildcard && self.config.is_project_class(&import.path) {
                    warn!(
                        "Wildcard import {}.* in {name} is not traversed",
                        import.path
                    );
                }
            }

            for referenced in &class.level_refs {
                if !self.config.is_project_class(referenced) {
                    continue;
                }
                let next = current_depth + 1;
                let shorter = self
                    .graph
                    .depths
                    .get(referenced)
                    .map_or(true, |&known| known > next);
                if shorter {
                    queue.push_back((referenced.clone(), next));
                }
            }
        }
    }

    /// Folds in a class discovered by the call-graph pass. The depth is
    /// never lowered below what the reference BFS already established.
    pub fn absorb(&mut self, class_name: &str, depth: usize) {
        if self.graph.contains(class_name) {
            return;
        }
        self.expand(class_name, depth);
    }

    #[must_use]
    pub fn graph(&self) -> &ClassGraph {
        &self.graph
    }

    #[must_use]
    pub fn into_graph(self) -> ClassGraph {
        self.graph
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
        let package = class.rsplit_once('.').map_or("", |(p, _)| p);
        let content = format!("package {package};\n\n{body}\n");
        fs::write(path, content).unwrap();
    }

    fn config_for(dir: &Path, entry: &str) -> Config {
        let mut config = Config::default();
        config.project_root = dir.to_path_buf();
        config.entry_class = entry.to_string();
        config.project_prefixes = vec!["com.example".to_string()];
        config
    }

    #[test]
    fn test_depths_are_shortest_paths() {
        let dir = tempfile::tempdir().unwrap();
        // App -> Middle -> Far, and App -> Far directly.
        write(
            dir.path(),
            "com.example.App",
            "import com.example.Middle;\nimport com.example.Far;\npublic class App {}",
        );
        write(
            dir.path(),
            "com.example.Middle",
            "import com.example.Far;\npublic class Middle {}",
        );
        write(dir.path(), "com.example.Far", "public class Far {}");

        let config = config_for(dir.path(), "com.example.App");
        let frontend = Frontend::new(&config);
        let mut builder = ClassGraphBuilder::new(&config, &frontend);
        builder.expand("com.example.App", 0);
        let graph = builder.into_graph();

        assert_eq!(graph.depth("com.example.App"), Some(0));
        assert_eq!(graph.depth("com.example.Middle"), Some(1));
        assert_eq!(graph.depth("com.example.Far"), Some(1));
    }

    #[test]
    fn test_cycles_terminate() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "com.example.A",
            "import com.example.B;\npublic class A {}",
        );
        write(
            dir.path(),
            "com.example.B",
            "import com.example.A;\npublic class B {}",
        );

        let config = config_for(dir.path(), "com.example.A");
        let frontend = Frontend::new(&config);
        let mut builder = ClassGraphBuilder::new(&config, &frontend);
        builder.expand("com.example.A", 0);
        let graph = builder.into_graph();

        assert_eq!(graph.len(), 2);
        assert_eq!(graph.depth("com.example.B"), Some(1));
    }

    #[test]
    fn test_max_depth_zero_keeps_only_entry() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "com.example.App",
            "import com.example.Util;\npublic class App {}",
        );
        write(dir.path(), "com.example.Util", "public class Util {}");

        let mut config = config_for(dir.path(), "com.example.App");
        config.max_depth = 0;
        let frontend = Frontend::new(&config);
        let mut builder = ClassGraphBuilder::new(&config, &frontend);
        builder.expand("com.example.App", 0);
        let graph = builder.into_graph();

        assert_eq!(graph.len(), 1);
        assert!(!graph.contains("com.example.Util"));
    }

    #[test]
    fn test_missing_class_dropped() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "com.example.App",
            "import com.example.Ghost;\npublic class App {}",
        );

        let config = config_for(dir.path(), "com.example.App");
        let frontend = Frontend::new(&config);
        let mut builder = ClassGraphBuilder::new(&config, &frontend);
        builder.expand("com.example.App", 0);
        let graph = builder.into_graph();

        assert_eq!(graph.len(), 1);
        assert!(!graph.contains("com.example.Ghost"));
    }

    #[test]
    fn test_excluded_package_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "com.example.App",
            "import com.example.generated.Proto;\npublic class App {}",
        );
        write(
            dir.path(),
            "com.example.generated.Proto",
            "public class Proto {}",
        );

        let mut config = config_for(dir.path(), "com.example.App");
        config.excluded_packages = vec!["com.example.generated".to_string()];
        let frontend = Frontend::new(&config);
        let mut builder = ClassGraphBuilder::new(&config, &frontend);
        builder.expand("com.example.App", 0);
        let graph = builder.into_graph();

        assert!(!graph.contains("com.example.generated.Proto"));
    }

    #[test]
    fn test_absorb_never_lowers_known_depth() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "com.example.App", "public class App {}");
        write(dir.path(), "com.example.Late", "public class Late {}");

        let config = config_for(dir.path(), "com.example.App");
        let frontend = Frontend::new(&config);
        let mut builder = ClassGraphBuilder::new(&config, &frontend);
        builder.expand("com.example.App", 0);
        builder.absorb("com.example.Late", 3);
        builder.absorb("com.example.Late", 1);
        let graph = builder.into_graph();

        assert_eq!(graph.depth("com.example.Late"), Some(3));
    }
}
