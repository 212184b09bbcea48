// src/frontend/locator.rs
//! Maps qualified class names to source files.
//!
//! The source roots are walked once up front; lookups afterwards are
//! index hits. Both hits and misses are cached so that repeated lookups
//! of the same class (class graph, call graph, essential completion)
//! never touch the filesystem twice.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use log::debug;
use walkdir::WalkDir;

pub struct FileLocator {
    /// File stem -> every `.java` file with that stem.
    index: HashMap<String, Vec<PathBuf>>,
    cache: Mutex<HashMap<String, Option<PathBuf>>>,
}

impl FileLocator {
    #[must_use]
    pub fn new(roots: &[PathBuf]) -> Self {
        let mut index: HashMap<String, Vec<PathBuf>> = HashMap::new();
        for root in roots {
            for entry in WalkDir::new(root)
                .into_iter()
                .filter_map(std::result::Result::ok)
                .filter(|e| e.file_type().is_file())
            {
                let path = entry.path();
                if path.extension().and_then(|e| e.to_str()) != Some("java") {
                    continue;
                }
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    index
                        .entry(stem.to_string())
                        .or_default()
                        .push(path.to_path_buf());
                }
            }
        }
        debug!("Indexed {} distinct class file names", index.len());
        Self {
            index,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Finds the source file for a qualified class name. Nested classes
    /// (`Outer.Inner`) have no file of their own and come back `None`.
    #[must_use]
    pub fn locate(&self, class_name: &str) -> Option<PathBuf> {
        if let Ok(cache) = self.cache.lock() {
            if let Some(hit) = cache.get(class_name) {
                return hit.clone();
            }
        }

        let found = self.search(class_name);
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(class_name.to_string(), found.clone());
        }
        found
    }

    fn search(&self, class_name: &str) -> Option<PathBuf> {
        let simple = class_name.rsplit('.').next().unwrap_or(class_name);
        let candidates = self.index.get(simple)?;

        let suffix = format!("{}.java", class_name.replace('.', "/"));
        if let Some(exact) = candidates
            .iter()
            .find(|p| normalized(p).ends_with(&suffix))
        {
            return Some(exact.clone());
        }

        // Nonstandard layout: accept a lone stem match.
        if candidates.len() == 1 {
            return Some(candidates[0].clone());
        }
        None
    }
}

fn normalized(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_locate_by_package_path() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "src/com/example/App.java", "class App {}");
        write(dir.path(), "src/com/other/App.java", "class App {}");

        let locator = FileLocator::new(&[dir.path().to_path_buf()]);
        let found = locator.locate("com.example.App").unwrap();
        assert!(normalized(&found).ends_with("com/example/App.java"));
    }

    #[test]
    fn test_lone_stem_match_accepted() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "odd/layout/Helper.java", "class Helper {}");

        let locator = FileLocator::new(&[dir.path().to_path_buf()]);
        assert!(locator.locate("com.example.Helper").is_some());
    }

    #[test]
    fn test_missing_class_is_none_and_cached() {
        let dir = tempfile::tempdir().unwrap();
        let locator = FileLocator::new(&[dir.path().to_path_buf()]);
        assert!(locator.locate("com.example.Ghost").is_none());
        assert!(locator.locate("com.example.Ghost").is_none());
    }
}
