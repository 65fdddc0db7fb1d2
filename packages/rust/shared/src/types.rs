//! Core domain types for extracted job listings.

use serde::Serialize;

// ---------------------------------------------------------------------------
// Field
// ---------------------------------------------------------------------------

/// One column of a job record, in export order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Company,
    Location,
    Description,
}

impl Field {
    /// All fields in their fixed column order.
    pub const ALL: [Field; 4] = [
        Field::Title,
        Field::Company,
        Field::Location,
        Field::Description,
    ];

    /// Column header used in tabular export.
    pub fn column(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Company => "company",
            Field::Location => "location",
            Field::Description => "description",
        }
    }

    /// Placeholder rendered when the field could not be resolved.
    pub fn sentinel(self) -> &'static str {
        match self {
            Field::Title => "Unknown Title",
            Field::Company => "Unknown Company",
            Field::Location => "Unknown Location",
            Field::Description => "No description available",
        }
    }

    /// Look a field up by its column header (case-insensitive, trimmed).
    pub fn from_column(name: &str) -> Option<Field> {
        let name = name.trim();
        Field::ALL
            .into_iter()
            .find(|f| f.column().eq_ignore_ascii_case(name))
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.column())
    }
}

// ---------------------------------------------------------------------------
// FieldOutcome
// ---------------------------------------------------------------------------

/// Result of recovering one field: real text, or nothing usable.
///
/// Sentinel strings never appear inside a `Resolved` value produced by the
/// extractor; they are rendered only when a record is serialized.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum FieldOutcome {
    Resolved(String),
    #[default]
    Unresolved,
}

impl FieldOutcome {
    /// Trim `text`; empty text is `Unresolved`.
    pub fn from_text(text: impl AsRef<str>) -> Self {
        let trimmed = text.as_ref().trim();
        if trimmed.is_empty() {
            Self::Unresolved
        } else {
            Self::Resolved(trimmed.to_string())
        }
    }

    /// Parse a serialized cell: the field's sentinel (or an empty cell) maps
    /// back to `Unresolved`.
    pub fn from_cell(field: Field, cell: &str) -> Self {
        if cell.trim() == field.sentinel() {
            Self::Unresolved
        } else {
            Self::from_text(cell)
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    /// Borrow the resolved text, if any.
    pub fn as_deref(&self) -> Option<&str> {
        match self {
            Self::Resolved(s) => Some(s),
            Self::Unresolved => None,
        }
    }

    /// Text for serialization: the value or the field's sentinel.
    pub fn render(&self, field: Field) -> &str {
        self.as_deref().unwrap_or(field.sentinel())
    }

    /// Rewrite the resolved text; an empty result becomes `Unresolved`.
    pub fn map_text(self, f: impl FnOnce(&str) -> String) -> Self {
        match self {
            Self::Resolved(s) => Self::from_text(f(&s)),
            Self::Unresolved => Self::Unresolved,
        }
    }
}

// ---------------------------------------------------------------------------
// JobRecord
// ---------------------------------------------------------------------------

/// One employment listing recovered from one posting.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobRecord {
    pub title: FieldOutcome,
    pub company: FieldOutcome,
    pub location: FieldOutcome,
    pub description: FieldOutcome,
}

/// An ordered, bounded collection of records from one run.
pub type Batch = Vec<JobRecord>;

impl JobRecord {
    pub fn field(&self, field: Field) -> &FieldOutcome {
        match field {
            Field::Title => &self.title,
            Field::Company => &self.company,
            Field::Location => &self.location,
            Field::Description => &self.description,
        }
    }

    pub fn field_mut(&mut self, field: Field) -> &mut FieldOutcome {
        match field {
            Field::Title => &mut self.title,
            Field::Company => &mut self.company,
            Field::Location => &mut self.location,
            Field::Description => &mut self.description,
        }
    }

    /// The acceptance gate: title and company must both be resolved.
    pub fn is_accepted(&self) -> bool {
        self.title.is_resolved() && self.company.is_resolved()
    }

    /// Rendered cell for `field` (value or sentinel).
    pub fn cell(&self, field: Field) -> &str {
        self.field(field).render(field)
    }

    /// All cells in column order.
    pub fn cells(&self) -> [&str; 4] {
        Field::ALL.map(|f| self.cell(f))
    }

    /// Borrowed row with sentinels filled in, for serde-based writers.
    pub fn row(&self) -> JobRow<'_> {
        JobRow {
            title: self.cell(Field::Title),
            company: self.cell(Field::Company),
            location: self.cell(Field::Location),
            description: self.cell(Field::Description),
        }
    }
}

impl std::fmt::Display for JobRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} @ {}",
            self.cell(Field::Title),
            self.cell(Field::Company)
        )
    }
}

/// Serialized view of a [`JobRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct JobRow<'a> {
    pub title: &'a str,
    pub company: &'a str,
    pub location: &'a str,
    pub description: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, company: &str) -> JobRecord {
        JobRecord {
            title: FieldOutcome::from_text(title),
            company: FieldOutcome::from_text(company),
            ..Default::default()
        }
    }

    #[test]
    fn unresolved_fields_render_sentinels() {
        let rec = JobRecord::default();
        assert_eq!(
            rec.cells(),
            [
                "Unknown Title",
                "Unknown Company",
                "Unknown Location",
                "No description available"
            ]
        );
    }

    #[test]
    fn from_text_trims_and_rejects_blank() {
        assert_eq!(
            FieldOutcome::from_text("  Rust Dev \n"),
            FieldOutcome::Resolved("Rust Dev".into())
        );
        assert_eq!(FieldOutcome::from_text(" \t "), FieldOutcome::Unresolved);
    }

    #[test]
    fn from_cell_maps_sentinel_back() {
        assert_eq!(
            FieldOutcome::from_cell(Field::Company, "Unknown Company"),
            FieldOutcome::Unresolved
        );
        // Another field's sentinel is just text.
        assert!(FieldOutcome::from_cell(Field::Title, "Unknown Company").is_resolved());
    }

    #[test]
    fn acceptance_requires_title_and_company() {
        assert!(record("Backend Engineer", "Acme").is_accepted());
        assert!(!record("", "Acme").is_accepted());
        assert!(!record("Backend Engineer", "").is_accepted());
    }

    #[test]
    fn map_text_to_empty_unresolves() {
        let out = FieldOutcome::from_text("abc").map_text(|_| "   ".into());
        assert_eq!(out, FieldOutcome::Unresolved);
    }

    #[test]
    fn row_serializes_with_sentinels() {
        let rec = record("Backend Engineer", "Acme");
        let json = serde_json::to_value(rec.row()).expect("serialize");
        assert_eq!(json["title"], "Backend Engineer");
        assert_eq!(json["location"], "Unknown Location");
    }

    #[test]
    fn field_lookup_by_column() {
        assert_eq!(Field::from_column(" Company "), Some(Field::Company));
        assert_eq!(Field::from_column("salary"), None);
    }
}
