// src/frontend/mod.rs
//! The Java source front end: file location, parsing, and call-target
//! resolution. The analysis core consumes classes only through this
//! module's narrow surface, so everything language-specific stays here.

pub mod locator;
pub mod model;
pub mod parser;
pub mod resolve;

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, OnceLock};

use log::warn;

use crate::config::Config;
pub use locator::FileLocator;
pub use model::ParsedClass;
pub use resolve::{CallTarget, ScopeQuery};

type CacheCell = Arc<OnceLock<Option<Arc<ParsedClass>>>>;

/// Front-end facade: a file locator plus a parse cache populated at most
/// once per class name and shared across workers. Constructed explicitly
/// and passed by reference; there is no global instance.
pub struct Frontend {
    locator: FileLocator,
    cache: Mutex<HashMap<String, CacheCell>>,
}

impl Frontend {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        let mut roots = vec![config.project_root.clone()];
        roots.extend(config.source_dirs.iter().cloned());
        Self {
            locator: FileLocator::new(&roots),
            cache: Mutex::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn locate(&self, class_name: &str) -> Option<PathBuf> {
        self.locator.locate(class_name)
    }

    /// Locates, reads, and parses a class, once. Returns `None` when the
    /// source file cannot be found or read; a file that parses with
    /// errors still comes back (degraded) so it can be rendered verbatim.
    #[must_use]
    pub fn class(&self, class_name: &str) -> Option<Arc<ParsedClass>> {
        let cell = self.cache_cell(class_name);
        cell.get_or_init(|| self.load(class_name)).clone()
    }

    fn cache_cell(&self, class_name: &str) -> CacheCell {
        let mut cache = match self.cache.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        cache.entry(class_name.to_string()).or_default().clone()
    }

    fn load(&self, class_name: &str) -> Option<Arc<ParsedClass>> {
        let Some(path) = self.locator.locate(class_name) else {
            warn!("No source file found for class {class_name}");
            return None;
        };
        let source = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) => {
                warn!("Failed to read {}: {e}", path.display());
                return None;
            }
        };
        Some(Arc::new(parser::parse_source(class_name, &source)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn project(files: &[(&str, &str)]) -> (tempfile::TempDir, Config) {
        let dir = tempfile::tempdir().unwrap();
        for (rel, content) in files {
            let path = dir.path().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        let mut config = Config::default();
        config.project_root = dir.path().to_path_buf();
        config.entry_class = "com.example.App".to_string();
        (dir, config)
    }

    #[test]
    fn test_class_is_parsed_once_and_cached() {
        let (dir, config) = project(&[(
            "com/example/App.java",
            "package com.example;\npublic class App { void run() {} }\n",
        )]);
        let frontend = Frontend::new(&config);

        let first = frontend.class("com.example.App").unwrap();
        let second = frontend.class("com.example.App").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.methods.len(), 1);
        drop(dir);
    }

    #[test]
    fn test_missing_class_cached_as_none() {
        let (dir, config) = project(&[]);
        let frontend = Frontend::new(&config);
        assert!(frontend.class("com.example.Ghost").is_none());
        assert!(frontend.class("com.example.Ghost").is_none());
        drop(dir);
    }
}
