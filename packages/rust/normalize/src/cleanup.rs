//! Text cleanup passes applied to every extracted field.
//!
//! Each pass is a function `&str -> String`. The pipeline repeats until the
//! text stops changing, which makes normalization idempotent.

use std::sync::LazyLock;

use jobscrape_shared::Field;
use regex::Regex;

// ---------------------------------------------------------------------------
// Duplicate-collapse rules
// ---------------------------------------------------------------------------

/// Collapse a field value whose separator-delimited segments repeat their
/// neighbour, e.g. `"Berlin, Berlin"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollapseRule {
    pub field: Field,
    pub separator: char,
    /// Inserted between the kept segments.
    pub joiner: &'static str,
}

/// Rules applied by [`run_pipeline`].
pub const COLLAPSE_RULES: &[CollapseRule] = &[
    CollapseRule {
        field: Field::Location,
        separator: ',',
        joiner: ", ",
    },
    CollapseRule {
        field: Field::Location,
        separator: '·',
        joiner: " · ",
    },
];

/// Run all cleanup passes for `field` until the text is stable.
pub(crate) fn run_pipeline(field: Field, text: &str) -> String {
    let mut current = collapse_whitespace(text);

    loop {
        let mut next = current.clone();
        for rule in COLLAPSE_RULES.iter().filter(|r| r.field == field) {
            next = collapse_repeats(&next, rule);
        }
        next = collapse_whitespace(&next);

        if next == current {
            return current;
        }
        current = next;
    }
}

// ---------------------------------------------------------------------------
// Pass 1: Whitespace
// ---------------------------------------------------------------------------

/// Trim, and collapse every whitespace run (newlines included) to one space.
fn collapse_whitespace(text: &str) -> String {
    static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

    WS_RE.replace_all(text.trim(), " ").into_owned()
}

// ---------------------------------------------------------------------------
// Pass 2: Repeated segments
// ---------------------------------------------------------------------------

/// Drop every segment equal to the one before it. Text without a repeat is
/// returned untouched, separator spacing included.
fn collapse_repeats(text: &str, rule: &CollapseRule) -> String {
    if !text.contains(rule.separator) {
        return text.to_string();
    }

    let segments: Vec<&str> = text.split(rule.separator).map(str::trim).collect();
    let mut kept: Vec<&str> = Vec::with_capacity(segments.len());
    for &segment in &segments {
        if kept.last() == Some(&segment) {
            continue;
        }
        kept.push(segment);
    }

    if kept.len() == segments.len() {
        text.to_string()
    } else {
        kept.join(rule.joiner)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
