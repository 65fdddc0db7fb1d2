//! Duplicate suppression on (title, company).

use std::collections::HashSet;

use jobscrape_shared::{Batch, FieldOutcome};
use tracing::debug;

/// Keep the first record for each exact (title, company) pair.
///
/// Comparison is case-sensitive on the already-normalized values, so run
/// this after [`crate::normalize_batch`].
pub fn dedup(batch: Batch) -> Batch {
    let before = batch.len();
    let mut seen: HashSet<(FieldOutcome, FieldOutcome)> = HashSet::with_capacity(before);

    let kept: Batch = batch
        .into_iter()
        .filter(|record| seen.insert((record.title.clone(), record.company.clone())))
        .collect();

    if kept.len() < before {
        debug!(removed = before - kept.len(), "dropped duplicate postings");
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobscrape_shared::JobRecord;

    fn record(title: &str, company: &str, description: &str) -> JobRecord {
        JobRecord {
            title: FieldOutcome::from_text(title),
            company: FieldOutcome::from_text(company),
            location: FieldOutcome::from_text("Remote"),
            description: FieldOutcome::from_text(description),
        }
    }

    #[test]
    fn first_occurrence_wins() {
        let batch = vec![
            record("Backend Engineer", "Acme", "first"),
            record("Backend Engineer", "Acme", "second"),
        ];
        let out = dedup(batch);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].description.as_deref(), Some("first"));
    }

    #[test]
    fn order_is_preserved() {
        let batch = vec![
            record("A", "X", ""),
            record("B", "X", ""),
            record("A", "X", ""),
            record("C", "Y", ""),
            record("B", "X", ""),
        ];
        let titles: Vec<_> = dedup(batch)
            .iter()
            .map(|r| r.title.as_deref().unwrap_or_default().to_string())
            .collect();
        assert_eq!(titles, vec!["A", "B", "C"]);
    }

    #[test]
    fn comparison_is_case_sensitive_and_pairwise() {
        let batch = vec![
            record("Backend Engineer", "Acme", ""),
            record("backend engineer", "Acme", ""),
            record("Backend Engineer", "Acme GmbH", ""),
        ];
        assert_eq!(dedup(batch).len(), 3);
    }
}
