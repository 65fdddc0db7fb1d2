//! Employer name.

use jobscrape_shared::Field;

use crate::strategy::{FieldChain, FieldPolicy, FirstMatch, ScanMatches, char_len};

/// Words that follow "View" in link text pointing at a company page without
/// naming it ("View company page", "View all jobs at ...").
const PLACEHOLDER_OBJECTS: &[&str] = &["all", "company", "jobs", "more", "page", "profile"];

const COMPANY_LINK: &str = r#"a[href*="/company/"]"#;

/// Keeps the first line of the candidate; it must be longer than one
/// character and not a "View ..." placeholder.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompanyPolicy;

impl FieldPolicy for CompanyPolicy {
    fn accept(&self, candidate: &str) -> Option<String> {
        let first_line = candidate.trim().lines().next()?.trim();
        if char_len(first_line) > 1 && !is_placeholder(first_line) {
            Some(first_line.to_string())
        } else {
            None
        }
    }
}

/// "View" as a whole first word followed by a placeholder object. Names that
/// merely start with or contain "View" ("ViewSonic", "Skyview") are kept.
fn is_placeholder(text: &str) -> bool {
    let mut words = text.split_whitespace();
    words.next().is_some_and(|w| w.eq_ignore_ascii_case("view"))
        && words
            .next()
            .is_some_and(|w| PLACEHOLDER_OBJECTS.iter().any(|o| w.eq_ignore_ascii_case(o)))
}

pub(super) fn chain() -> FieldChain {
    FieldChain::new(Field::Company, CompanyPolicy)
        .with(FirstMatch {
            name: "company-link",
            selector: COMPANY_LINK,
        })
        .with(FirstMatch {
            name: "top-card-company",
            selector: ".job-details-jobs-unified-top-card__company-name",
        })
        .with(ScanMatches {
            name: "any-company-link",
            selector: COMPANY_LINK,
            keep: |text| char_len(text) > 1 && !is_placeholder(text),
        })
}
