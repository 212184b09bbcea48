// src/config.rs
//! Run configuration: `jslice.toml` merged with CLI overrides.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Result, SliceError};

pub const CONFIG_FILE: &str = "jslice.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Root of the Java project under analysis.
    pub project_root: PathBuf,
    /// Fully qualified name of the entry class.
    pub entry_class: String,
    /// Extra source roots besides the conventional ones under `project_root`.
    pub source_dirs: Vec<PathBuf>,
    /// Package prefixes that count as "in-project". Empty means: derive
    /// from the entry class's package.
    pub project_prefixes: Vec<String>,
    /// Package prefixes excluded from traversal.
    pub excluded_packages: Vec<String>,
    /// Maximum class-graph BFS depth. Negative = unbounded.
    pub max_depth: i32,
    /// Classes deeper than this keep only stub method bodies. Negative =
    /// always keep full bodies.
    pub body_depth: i32,
    /// Classes that always keep full bodies regardless of depth.
    pub keep_bodies: Vec<String>,
    /// Remove trivial bean getters/setters.
    pub omit_accessors: bool,
    /// Remove methods not reachable from the entry class.
    pub remove_unreachable: bool,
    /// List removed unreachable method signatures in the report.
    pub show_removed: bool,
    /// List omitted accessor signatures in the report.
    pub show_accessors: bool,
    /// Import lines with these prefixes are trimmed from rendered classes.
    pub skip_import_prefixes: Vec<String>,
    /// Import prefixes kept even when a skip prefix matches.
    pub keep_import_prefixes: Vec<String>,
    /// Report output path.
    pub output: PathBuf,
    /// Reports below this many bytes are echoed in full to stdout.
    pub echo_threshold: usize,
    /// Copy small reports to the system clipboard.
    pub copy: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project_root: PathBuf::from("."),
            entry_class: String::new(),
            source_dirs: Vec::new(),
            project_prefixes: Vec::new(),
            excluded_packages: Vec::new(),
            max_depth: -1,
            body_depth: -1,
            keep_bodies: Vec::new(),
            omit_accessors: true,
            remove_unreachable: true,
            show_removed: true,
            show_accessors: true,
            skip_import_prefixes: Vec::new(),
            keep_import_prefixes: Vec::new(),
            output: PathBuf::from("slice.md"),
            echo_threshold: 100_000,
            copy: false,
        }
    }
}

impl Config {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads `jslice.toml` from the given project root, if present.
    /// A malformed file is reported as a fatal configuration error.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        if !path.exists() {
            let mut config = Self::default();
            config.project_root = root.to_path_buf();
            return Ok(config);
        }

        let text = fs::read_to_string(&path).map_err(|source| SliceError::Io {
            source,
            path: path.clone(),
        })?;
        let mut config: Config = toml::from_str(&text)
            .map_err(|e| SliceError::Config(format!("{}: {e}", path.display())))?;
        if config.project_root == PathBuf::from(".") {
            config.project_root = root.to_path_buf();
        }
        Ok(config)
    }

    /// Validates the configuration before a run.
    ///
    /// # Errors
    /// Returns an error when the entry class is unset or the project root
    /// does not exist. These are the only fatal failures; everything else
    /// is recovered per class.
    pub fn validate(&self) -> Result<()> {
        if self.entry_class.is_empty() {
            return Err(SliceError::Config("entry class is not set".into()));
        }
        if !self.project_root.exists() {
            return Err(SliceError::Config(format!(
                "project root does not exist: {}",
                self.project_root.display()
            )));
        }
        Ok(())
    }

    /// Package prefixes that define "in-project", falling back to the
    /// entry class's own package when none are configured.
    #[must_use]
    pub fn effective_prefixes(&self) -> Vec<String> {
        if !self.project_prefixes.is_empty() {
            return self.project_prefixes.clone();
        }
        match self.entry_class.rsplit_once('.') {
            Some((package, _)) => vec![package.to_string()],
            None => vec![self.entry_class.clone()],
        }
    }

    #[must_use]
    pub fn is_project_class(&self, class_name: &str) -> bool {
        let in_project = self
            .effective_prefixes()
            .iter()
            .any(|prefix| class_name.starts_with(prefix.as_str()));
        in_project && !self.is_excluded(class_name)
    }

    #[must_use]
    pub fn is_excluded(&self, class_name: &str) -> bool {
        self.excluded_packages
            .iter()
            .any(|prefix| class_name.starts_with(prefix.as_str()))
    }

    /// True when the class keeps full method bodies at the given depth.
    #[must_use]
    pub fn keeps_full_bodies(&self, class_name: &str, depth: usize) -> bool {
        if self.keep_bodies.iter().any(|c| c == class_name) {
            return true;
        }
        if self.body_depth < 0 {
            return true;
        }
        depth <= self.body_depth as usize
    }

    /// True when a rendered class should keep the given import line.
    #[must_use]
    pub fn keeps_import(&self, import_path: &str) -> bool {
        if self
            .keep_import_prefixes
            .iter()
            .any(|prefix| import_path.starts_with(prefix.as_str()))
        {
            return true;
        }
        !self
            .skip_import_prefixes
            .iter()
            .any(|prefix| import_path.starts_with(prefix.as_str()))
    }

    #[must_use]
    pub fn trims_imports(&self) -> bool {
        !self.skip_import_prefixes.is_empty()
    }
}
