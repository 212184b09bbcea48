// src/analysis/essential.rs
//! Essential-dependency completion: a retained class drags in its
//! supertype chain so that rendered `extends`/`implements` clauses
//! never dangle.

use std::collections::HashSet;

use log::warn;

use crate::config::Config;
use crate::frontend::Frontend;

/// Closes the retained set over in-project supertypes. Supertypes whose
/// source cannot be produced are skipped with a warning; the slice stays
/// usable without them.
#[must_use]
pub fn complete(retained: &HashSet<String>, frontend: &Frontend, config: &Config) -> HashSet<String> {
    let mut result = retained.clone();
    let mut stack: Vec<String> = retained.iter().cloned().collect();

    while let Some(name) = stack.pop() {
        let Some(class) = frontend.class(&name) else {
            continue;
        };
        for supertype in &class.supertypes {
            if !config.is_project_class(supertype) || result.contains(supertype) {
                continue;
            }
            if frontend.class(supertype).is_none() {
                warn!("Supertype {supertype} of {name} has no source; skipped");
                continue;
            }
            result.insert(supertype.clone());
            stack.push(supertype.clone());
        }
    }
    result
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
    fn test_supertype_chain_retained() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "com.example.Child",
            "package com.example;\npublic class Child extends Parent {}\n",
        );
        write(
            dir.path(),
            "com.example.Parent",
            "package com.example;\npublic class Parent extends Grandparent {}\n",
        );
        write(
            dir.path(),
            "com.example.Grandparent",
            "package com.example;\npublic class Grandparent {}\n",
        );

        let mut config = Config::default();
        config.project_root = dir.path().to_path_buf();
        config.entry_class = "com.example.Child".to_string();
        let frontend = Frontend::new(&config);

        let retained: HashSet<String> = ["com.example.Child".to_string()].into_iter().collect();
        let completed = complete(&retained, &frontend, &config);

        assert!(completed.contains("com.example.Parent"));
        assert!(completed.contains("com.example.Grandparent"));
        assert_eq!(completed.len(), 3);
        drop(dir);
    }

    #[test]
    fn test_missing_supertype_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "com.example.Child",
            "package com.example;\npublic class Child extends Ghost {}\n",
        );

        let mut config = Config::default();
        config.project_root = dir.path().to_path_buf();
        config.entry_class = "com.example.Child".to_string();
        let frontend = Frontend::new(&config);

        let retained: HashSet<String> = ["com.example.Child".to_string()].into_iter().collect();
        let completed = complete(&retained, &frontend, &config);

        assert_eq!(completed.len(), 1);
        drop(dir);
    }
}
