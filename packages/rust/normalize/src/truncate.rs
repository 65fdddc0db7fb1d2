//! Description shortening.

use jobscrape_shared::{Field, FieldOutcome, JobRecord};

/// Separator between the summary and the metadata tail of a description.
pub const DESCRIPTION_DELIMITER: char = '·';

/// Longest summary kept before an ellipsis is added.
pub const MAX_SUMMARY_CHARS: usize = 150;

pub const ELLIPSIS: &str = "...";

/// Shorten a description to its first delimiter-separated segment, cut to
/// [`MAX_SUMMARY_CHARS`] characters plus [`ELLIPSIS`].
///
/// Empty input (or an empty first segment) yields the description sentinel.
pub fn truncate(description: &str) -> String {
    summary(description).unwrap_or_else(|| Field::Description.sentinel().to_string())
}

/// Apply [`truncate`] to a record's description in place. An unresolved
/// description stays unresolved.
pub fn truncate_record(record: &mut JobRecord) {
    let description = std::mem::take(&mut record.description);
    record.description = match description.as_deref().and_then(summary) {
        Some(text) => FieldOutcome::Resolved(text),
        None => FieldOutcome::Unresolved,
    };
}

fn summary(description: &str) -> Option<String> {
    let head = description
        .split_once(DESCRIPTION_DELIMITER)
        .map_or(description, |(head, _)| head)
        .trim();

    if head.is_empty() {
        return None;
    }

    if head.chars().count() > MAX_SUMMARY_CHARS {
        let cut: String = head.chars().take(MAX_SUMMARY_CHARS).collect();
        Some(format!("{cut}{ELLIPSIS}"))
    } else {
        Some(head.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_first_segment() {
        assert_eq!(truncate("Great team · Remote · Apply now"), "Great team");
    }

    #[test]
    fn empty_is_sentinel() {
        assert_eq!(truncate(""), "No description available");
        assert_eq!(truncate("   "), "No description available");
        assert_eq!(truncate(" · Remote"), "No description available");
    }

    #[test]
    fn long_segment_gets_ellipsis() {
        let long = "x".repeat(200);
        let out = truncate(&long);
        assert_eq!(out.chars().count(), 153);
        assert!(out.ends_with("..."));
        assert_eq!(&out[..150], &long[..150]);
    }

    #[test]
    fn exactly_max_is_untouched() {
        let exact = "y".repeat(150);
        assert_eq!(truncate(&exact), exact);
    }

    #[test]
    fn cuts_on_characters_not_bytes() {
        let long = "ü".repeat(160);
        let out = truncate(&format!("{long} · tail"));
        assert_eq!(out.chars().count(), 153);
        assert!(out.starts_with("üü"));
    }

    #[test]
    fn output_never_exceeds_bound() {
        let inputs = [
            String::new(),
            "short".to_string(),
            "a ".repeat(400),
            format!("{} · {}", "b".repeat(151), "c".repeat(10)),
            "· · ·".to_string(),
        ];
        for input in &inputs {
            assert!(truncate(input).chars().count() <= MAX_SUMMARY_CHARS + ELLIPSIS.len());
        }
    }

    #[test]
    fn record_description_is_shortened() {
        let mut record = JobRecord {
            description: FieldOutcome::from_text("Build APIs · Berlin · 3 days ago"),
            ..Default::default()
        };
        truncate_record(&mut record);
        assert_eq!(record.description.as_deref(), Some("Build APIs"));

        let mut empty_head = JobRecord {
            description: FieldOutcome::from_text("· Berlin"),
            ..Default::default()
        };
        truncate_record(&mut empty_head);
        assert_eq!(empty_head.description, FieldOutcome::Unresolved);
    }
}
