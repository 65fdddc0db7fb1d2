//! Posting description.

use jobscrape_shared::Field;

use crate::strategy::{
    FieldChain, FieldPolicy, FirstMatch, LargestMatch, ScanMatches, char_len, contains_any,
    take_chars,
};

/// Shorter text is a teaser or a label, not a description.
const MIN_LEN: usize = 50;

/// Accepted descriptions are cut to this many characters.
pub const MAX_LEN: usize = 1500;

/// Block-level fallbacks need more content than the primary hook.
const MIN_BLOCK_LEN: usize = 100;

/// Blocks longer than this are whole-page wrappers.
const MAX_BLOCK_LEN: usize = 3000;

const UPSELL: &[&str] = &["Premium"];

/// Accepts text over the minimum length that is not an upsell panel,
/// capped at [`MAX_LEN`] characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct DescriptionPolicy;

impl FieldPolicy for DescriptionPolicy {
    fn accept(&self, candidate: &str) -> Option<String> {
        let text = candidate.trim();
        if char_len(text) > MIN_LEN && !contains_any(text, UPSELL) {
            Some(take_chars(text, MAX_LEN))
        } else {
            None
        }
    }
}

pub(super) fn chain() -> FieldChain {
    FieldChain::new(Field::Description, DescriptionPolicy)
        .with(FirstMatch {
            name: "show-more-markup",
            selector: "div.show-more-less-html__markup",
        })
        .with(ScanMatches {
            name: "description-block",
            selector: r#"div[class*="description"], div[class*="show-more"]"#,
            keep: |text| {
                char_len(text) > MIN_BLOCK_LEN && !contains_any(text, &["Premium", "Search"])
            },
        })
        .with(LargestMatch {
            name: "largest-block",
            selector: "div",
            keep: |text| {
                let len = char_len(text);
                len > MIN_BLOCK_LEN
                    && len < MAX_BLOCK_LEN
                    && !contains_any(text, &["Search", "Premium", "Sign"])
            },
        })
}
