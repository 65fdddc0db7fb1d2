//! Work location or employment mode.

use jobscrape_shared::Field;

use crate::strategy::{FieldChain, FieldPolicy, LabelInText, LineScan, char_len, contains_any};

/// Closed set of employment-mode labels, in priority order.
pub const MODE_LABELS: &[&str] = &["Remote", "On-site", "Hybrid"];

/// Lines containing these are navigation, not a place.
const NOISE: &[&str] = &["Search", "Premium"];

/// Location lines are shorter than this many characters.
const MAX_LINE_LEN: usize = 50;

/// Accepts a mode label, or a short single line with a `,` separator
/// ("Berlin, Germany").
#[derive(Debug, Clone, Copy, Default)]
pub struct LocationPolicy;

impl FieldPolicy for LocationPolicy {
    fn accept(&self, candidate: &str) -> Option<String> {
        let text = candidate.trim();
        if MODE_LABELS.contains(&text) || is_location_line(text) {
            Some(text.to_string())
        } else {
            None
        }
    }
}

fn is_location_line(line: &str) -> bool {
    !line.contains('\n')
        && line.contains(',')
        && char_len(line) < MAX_LINE_LEN
        && !contains_any(line, NOISE)
}

pub(super) fn chain() -> FieldChain {
    FieldChain::new(Field::Location, LocationPolicy)
        .with(LabelInText {
            name: "employment-mode",
            labels: MODE_LABELS,
        })
        .with(LineScan {
            name: "separator-line",
            keep: is_location_line,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_accepts_modes_and_places() {
        let p = LocationPolicy;
        assert_eq!(p.accept("Hybrid"), Some("Hybrid".into()));
        assert_eq!(p.accept(" Berlin, Germany "), Some("Berlin, Germany".into()));
    }

    #[test]
    fn policy_rejects_noise_and_long_lines() {
        let p = LocationPolicy;
        assert_eq!(p.accept("Search jobs, people, companies"), None);
        assert_eq!(p.accept("Berlin"), None);
        let long = format!("Berlin, {}", "x".repeat(60));
        assert_eq!(p.accept(&long), None);
    }
}
