//! Deterministic textual cleanup of Python source fragments.
//!
//! The stripping is purely textual: `#` inside a string literal is treated as
//! a comment start, and any `'''`/`"""` pair is removed as a documentation
//! block wherever it appears.

use once_cell::sync::Lazy;
use regex::Regex;

static LINE_COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"#[^\n]*").expect("line comment pattern is valid"));

static DOC_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"'''[\s\S]*?'''|"""[\s\S]*?""""#).expect("doc block pattern is valid")
});

static BLANK_LINES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\n\s*\n)+").expect("blank line pattern is valid"));

/// Normalize a source fragment for prompt inclusion.
///
/// Applies, in order: line comment removal, triple-quoted block removal,
/// collapse of interior horizontal whitespace, collapse of blank-line runs,
/// and a final trim. The result is a fixpoint: normalizing it again is a no-op.
pub fn normalize(text: &str) -> String {
    let without_comments = LINE_COMMENT.replace_all(text, "");
    let without_docs = strip_doc_blocks(&without_comments);
    let collapsed = collapse_interior_whitespace(&without_docs);
    let compacted = BLANK_LINES.replace_all(&collapsed, "\n");
    compacted.trim().to_string()
}

// Removing one block can splice quotes into a new pair, so repeat until none is left.
fn strip_doc_blocks(text: &str) -> String {
    let mut current = text.to_string();
    while DOC_BLOCK.is_match(&current) {
        current = DOC_BLOCK.replace_all(&current, "").into_owned();
    }
    current
}

fn is_horizontal(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// Replace every run of spaces/tabs that sits between two non-whitespace
/// characters with a single space. Leading indentation and trailing runs are kept.
fn collapse_interior_whitespace(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if !is_horizontal(c) {
            out.push(c);
            i += 1;
            continue;
        }

        let run_start = i;
        while i < chars.len() && is_horizontal(chars[i]) {
            i += 1;
        }

        let before = run_start.checked_sub(1).map(|p| chars[p]);
        let after = chars.get(i).copied();
        let interior = matches!(before, Some(b) if !b.is_whitespace())
            && matches!(after, Some(a) if !a.is_whitespace());

        if interior {
            out.push(' ');
        } else {
            out.extend(&chars[run_start..i]);
        }
    }

    out
}
