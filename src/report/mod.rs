// src/report/mod.rs
//! Markdown report assembly. The renderer only formats what the
//! pipeline determined; it makes no decisions of its own.

use std::fmt::Write as _;

use crate::tokens::TokenStats;

/// One retained class, already reduced to its rendered text.
#[derive(Debug)]
pub struct ClassSection {
    pub name: String,
    pub depth: usize,
    pub text: String,
    pub stats: TokenStats,
}

/// A removed member, keyed by the class it was removed from.
#[derive(Debug)]
pub struct RemovedMember {
    pub class: String,
    pub signature: String,
}

/// Everything one run produced. `sections` arrive ordered by
/// (depth, name); the renderer preserves that order.
#[derive(Debug)]
pub struct SliceReport {
    pub entry_class: String,
    pub sections: Vec<ClassSection>,
    pub stats: TokenStats,
    pub omitted_accessors: Vec<RemovedMember>,
    pub removed_methods: Vec<RemovedMember>,
    pub imports_trimmed: bool,
    pub show_accessors: bool,
    pub show_removed: bool,
}

impl SliceReport {
    /// The full Markdown document.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("# Code Context Analysis\n\n");
        let _ = writeln!(out, "Entry class: `{}`\n", self.entry_class);

        out.push_str("## Token Statistics\n\n");
        let _ = writeln!(out, "- Original: {} tokens", self.stats.original);
        let _ = writeln!(out, "- Processed: {} tokens", self.stats.processed);
        let _ = writeln!(
            out,
            "- Saved: {} tokens ({:.2}%)",
            self.stats.saved(),
            self.stats.percentage()
        );
        out.push('\n');

        if self.imports_trimmed {
            out.push_str("> Imports matching the configured prefixes were trimmed from the rendered classes.\n\n");
        }
        if self.show_accessors && !self.omitted_accessors.is_empty() {
            out.push_str(
                "> Trivial accessors were omitted; their signatures are listed at the end.\n\n",
            );
        }

        out.push_str("## Classes\n\n");
        for section in &self.sections {
            let _ = writeln!(out, "### {}\n", section.name);
            out.push_str("```java\n");
            out.push_str(&section.text);
            if !section.text.ends_with('\n') {
                out.push('\n');
            }
            out.push_str("```\n\n");
        }

        if self.show_accessors && !self.omitted_accessors.is_empty() {
            out.push_str("## Omitted Accessors\n\n");
            render_members(&mut out, &self.omitted_accessors);
        }
        if self.show_removed && !self.removed_methods.is_empty() {
            out.push_str("## Removed Unreachable Methods\n\n");
            render_members(&mut out, &self.removed_methods);
        }

        out
    }

    /// Short console digest for reports too large to echo in full.
    #[must_use]
    pub fn render_summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Sliced {} classes from {}",
            self.sections.len(),
            self.entry_class
        );
        let _ = writeln!(
            out,
            "Tokens: {} -> {} ({:.2}% saved)",
            self.stats.original,
            self.stats.processed,
            self.stats.percentage()
        );

        let dependencies: Vec<&ClassSection> = self
            .sections
            .iter()
            .filter(|s| s.name != self.entry_class)
            .collect();
        if !dependencies.is_empty() {
            out.push_str("Dependencies:\n");
            for section in dependencies.iter().take(10) {
                let _ = writeln!(out, "  {} (depth {})", section.name, section.depth);
            }
            if dependencies.len() > 10 {
                let _ = writeln!(out, "  ... and {} more", dependencies.len() - 10);
            }
        }
        out
    }
}

fn render_members(out: &mut String, members: &[RemovedMember]) {
    for member in members {
        let _ = writeln!(out, "- `{}`: `{}`", member.class, member.signature);
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SliceReport {
        SliceReport {
            entry_class: "com.example.App".to_string(),
            sections: vec![
                ClassSection {
                    name: "com.example.App".to_string(),
                    depth: 0,
                    text: "public class App {}\n".to_string(),
                    stats: TokenStats {
                        original: 120,
                        processed: 100,
                    },
                },
                ClassSection {
                    name: "com.example.Helper".to_string(),
                    depth: 1,
                    text: "public class Helper {}\n".to_string(),
                    stats: TokenStats {
                        original: 80,
                        processed: 50,
                    },
                },
            ],
            stats: TokenStats {
                original: 200,
                processed: 150,
            },
            omitted_accessors: vec![RemovedMember {
                class: "com.example.Helper".to_string(),
                signature: "int getX()".to_string(),
            }],
            removed_methods: vec![RemovedMember {
                class: "com.example.Helper".to_string(),
                signature: "void unused()".to_string(),
            }],
            imports_trimmed: true,
            show_accessors: true,
            show_removed: true,
        }
    }

    #[test]
    fn test_render_sections_present() {
        let text = sample().render();
        assert!(text.starts_with("# Code Context Analysis\n"));
        assert!(text.contains("## Token Statistics"));
        assert!(text.contains("- Saved: 50 tokens (25.00%)"));
        assert!(text.contains("### com.example.App"));
        assert!(text.contains("```java\npublic class App {}\n```"));
        assert!(text.contains("## Omitted Accessors"));
        assert!(text.contains("- `com.example.Helper`: `int getX()`"));
        assert!(text.contains("## Removed Unreachable Methods"));
    }

    #[test]
    fn test_disabled_lists_are_suppressed() {
        let mut report = sample();
        report.show_accessors = false;
        report.show_removed = false;
        let text = report.render();
        assert!(!text.contains("## Omitted Accessors"));
        assert!(!text.contains("## Removed Unreachable Methods"));
    }

    #[test]
    fn test_summary_lists_dependencies() {
        let summary = sample().render_summary();
        assert!(summary.contains("Sliced 2 classes from com.example.App"));
        assert!(summary.contains("Tokens: 200 -> 150 (25.00% saved)"));
        assert!(summary.contains("  com.example.Helper (depth 1)"));
    }
}
