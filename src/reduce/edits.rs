// src/reduce/edits.rs
//! Byte-span text surgery. Every reduction decision for a class is
//! collected as an edit against the original source and applied in one
//! sorted pass, so earlier removals never invalidate later spans.

use std::ops::Range;

#[derive(Debug, Clone)]
pub struct Edit {
    pub span: Range<usize>,
    pub replacement: String,
}

impl Edit {
    #[must_use]
    pub fn remove(span: Range<usize>) -> Self {
        Self {
            span,
            replacement: String::new(),
        }
    }

    #[must_use]
    pub fn replace(span: Range<usize>, replacement: String) -> Self {
        Self { span, replacement }
    }
}

/// Applies the edits in span order. An edit overlapping one already
/// applied is dropped; overlaps only arise when two reducers claim the
/// same member, and the first claim wins.
#[must_use]
pub fn apply(source: &str, mut edits: Vec<Edit>) -> String {
    edits.sort_by(|a, b| {
        a.span
            .start
            .cmp(&b.span.start)
            .then(a.span.end.cmp(&b.span.end))
    });

    let mut out = String::with_capacity(source.len());
    let mut cursor = 0usize;
    for edit in edits {
        if edit.span.start < cursor || edit.span.end > source.len() {
            continue;
        }
        out.push_str(&source[cursor..edit.span.start]);
        out.push_str(&edit.replacement);
        cursor = edit.span.end;
    }
    out.push_str(&source[cursor..]);
    out
}

/// Widens a member's span for removal: back to the start of its line,
/// over the contiguous comment block above it, over one blank line, and
/// forward past the trailing newline. Keeps the surrounding text from
/// collapsing into doubled blank lines.
#[must_use]
pub fn expand_removal(source: &str, span: Range<usize>) -> Range<usize> {
    let mut start = line_start(source, span.start);
    loop {
        if start == 0 {
            break;
        }
        let prev_start = line_start(source, start - 1);
        let prev_line = source[prev_start..start - 1].trim();
        let comment_like = prev_line.starts_with("//")
            || prev_line.starts_with("/*")
            || prev_line.starts_with('*');
        if comment_like {
            start = prev_start;
        } else {
            break;
        }
    }
    if start > 0 {
        let prev_start = line_start(source, start - 1);
        if source[prev_start..start - 1].trim().is_empty() {
            start = prev_start;
        }
    }

    let bytes = source.as_bytes();
    let mut end = span.end;
    while end < bytes.len() && matches!(bytes[end], b' ' | b'\t' | b'\r') {
        end += 1;
    }
    if end < bytes.len() && bytes[end] == b'\n' {
        end += 1;
    }
    start..end
}

fn line_start(source: &str, pos: usize) -> usize {
    source[..pos].rfind('\n').map_or(0, |i| i + 1)
}

/// Leading whitespace of the line the span starts on.
#[must_use]
pub fn line_indent(source: &str, pos: usize) -> String {
    let start = line_start(source, pos);
    source[start..]
        .chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_in_span_order() {
        let source = "aaa bbb ccc";
        let edits = vec![
            Edit::replace(8..11, "C".to_string()),
            Edit::remove(0..4),
        ];
        assert_eq!(apply(source, edits), "bbb C");
    }

    #[test]
    fn test_overlapping_edit_dropped() {
        let source = "one two three";
        let edits = vec![Edit::remove(0..7), Edit::remove(4..9)];
        assert_eq!(apply(source, edits), " three");
    }

    #[test]
    fn test_expand_removal_swallows_comment_and_blank_line() {
        let source = "class A {\n\n    // trivial getter\n    int getX() { return x; }\n}\n";
        let method_start = source.find("int getX").unwrap();
        let method_end = source.find("}\n}").unwrap() + 1;
        let expanded = expand_removal(source, method_start..method_end);
        assert_eq!(apply(source, vec![Edit::remove(expanded)]), "class A {\n}\n");
    }

    #[test]
    fn test_line_indent() {
        let source = "class A {\n    void run() {}\n}\n";
        let pos = source.find("void").unwrap();
        assert_eq!(line_indent(source, pos), "    ");
    }
}
