//! Job title.

use jobscrape_shared::Field;

use crate::strategy::{FieldChain, FieldPolicy, FirstMatch, ScanMatches, char_len, contains_any};

/// Phrases that mark a heading as page chrome rather than a job title.
const NON_JOB_MARKERS: &[&str] = &["Sign up"];

/// Accepts trimmed titles longer than two characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct TitlePolicy;

impl FieldPolicy for TitlePolicy {
    fn accept(&self, candidate: &str) -> Option<String> {
        let text = candidate.trim();
        if char_len(text) > 2 && !contains_any(text, NON_JOB_MARKERS) {
            Some(text.to_string())
        } else {
            None
        }
    }
}

pub(super) fn chain() -> FieldChain {
    FieldChain::new(Field::Title, TitlePolicy)
        .with(FirstMatch {
            name: "data-job-title",
            selector: "h2[data-job-title]",
        })
        .with(FirstMatch {
            name: "top-card-title",
            selector: ".job-details-jobs-unified-top-card__job-title",
        })
        .with(FirstMatch {
            name: "first-h1",
            selector: "h1",
        })
        .with(ScanMatches {
            name: "substantial-h2",
            selector: r#"h2:not([class*="show-more"])"#,
            keep: |text| char_len(text) > 5,
        })
}
