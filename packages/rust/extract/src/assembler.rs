//! Builds one [`JobRecord`] from the currently open posting.

use jobscrape_shared::{Field, JobRecord, Result};

use crate::extractor::FieldExtractor;
use crate::session::PageView;

/// Resolves all four fields of a posting.
#[derive(Debug, Default)]
pub struct RecordAssembler {
    extractor: FieldExtractor,
}

impl RecordAssembler {
    pub fn new(extractor: FieldExtractor) -> Self {
        Self { extractor }
    }

    pub fn extractor(&self) -> &FieldExtractor {
        &self.extractor
    }

    /// Extract every field of the current posting.
    ///
    /// Missing data never fails: an unrecoverable field is `Unresolved`.
    /// Errors come only from the session.
    pub fn assemble(&self, page: &dyn PageView) -> Result<JobRecord> {
        let mut record = JobRecord::default();
        for field in Field::ALL {
            let outcome = self.extractor.extract(field, page)?;
            *record.field_mut(field) = outcome.map_text(|text| text.trim().to_string());
        }
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::HtmlPageSession;
    use crate::strategy::testing::FakePage;
    use jobscrape_shared::FieldOutcome;

    fn load_fixture(name: &str) -> HtmlPageSession {
        let path = format!("../../../fixtures/html/{name}");
        let content = std::fs::read_to_string(&path)
            .unwrap_or_else(|_| panic!("missing fixture: {path}"));
        let mut session = HtmlPageSession::new();
        session.load_html(&content);
        session
    }

    #[test]
    fn empty_page_yields_all_sentinels() {
        let record = RecordAssembler::default().assemble(&FakePage::new()).unwrap();
        for field in Field::ALL {
            assert_eq!(record.field(field), &FieldOutcome::Unresolved);
            assert_eq!(record.cell(field), field.sentinel());
        }
        assert!(!record.is_accepted());
    }

    #[test]
    fn top_card_posting() {
        let record = RecordAssembler::default()
            .assemble(&load_fixture("top_card.html"))
            .unwrap();

        assert_eq!(record.title.as_deref(), Some("Working Student Software Engineer"));
        assert_eq!(record.company.as_deref(), Some("Orca Systems"));
        assert_eq!(record.location.as_deref(), Some("Hybrid"));
        let description = record.description.as_deref().unwrap();
        assert!(description.starts_with("About the job"));
        assert!(!description.contains("Premium"));
    }

    #[test]
    fn fallback_posting() {
        let record = RecordAssembler::default()
            .assemble(&load_fixture("fallback.html"))
            .unwrap();

        // No title hooks and a show-more h2: the substantial h2 is used.
        assert_eq!(record.title.as_deref(), Some("Backend Engineer (Rust)"));
        // First company link is a placeholder; the scan finds the real one.
        assert_eq!(record.company.as_deref(), Some("HeyJobs"));
        assert_eq!(record.location.as_deref(), Some("Berlin, Berlin, Germany"));
        assert!(record.description.as_deref().unwrap().contains("payments platform"));
    }

    #[test]
    fn signup_wall_is_not_a_record() {
        let record = RecordAssembler::default()
            .assemble(&load_fixture("signup_wall.html"))
            .unwrap();

        assert_eq!(record.title, FieldOutcome::Unresolved);
        assert_eq!(record.company, FieldOutcome::Unresolved);
        assert!(!record.is_accepted());
    }

    #[test]
    fn every_field_is_always_populated() {
        for name in ["top_card.html", "fallback.html", "signup_wall.html"] {
            let record = RecordAssembler::default()
                .assemble(&load_fixture(name))
                .unwrap();
            for cell in record.cells() {
                assert!(!cell.trim().is_empty(), "{name}: empty cell");
            }
        }
    }
}
