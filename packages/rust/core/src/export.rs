//! Tabular and JSON export of a batch, and CSV import for re-formatting.
//!
//! The CSV dialect is deliberately small: one header row, a single-character
//! delimiter, fields quoted with `"` and embedded quotes doubled.

use std::io::{self, Write};
use std::mem::take;
use std::path::Path;

use jobscrape_shared::{Batch, Field, FieldOutcome, JobRecord, JobScrapeError, Result};
use tracing::{debug, info, warn};

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// When a cell is wrapped in quotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuoteStyle {
    /// Only cells containing the delimiter, a quote or a line break.
    #[default]
    Minimal,
    /// Every cell, header included.
    Always,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    pub delimiter: char,
    pub quote: QuoteStyle,
}

impl ExportOptions {
    /// Minimal quoting with `delimiter`; used for the formatted table.
    pub fn formatted(delimiter: char) -> Self {
        Self {
            delimiter,
            quote: QuoteStyle::Minimal,
        }
    }

    /// Quote everything; used for the raw table.
    pub fn raw(delimiter: char) -> Self {
        Self {
            delimiter,
            quote: QuoteStyle::Always,
        }
    }
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self::formatted(',')
    }
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

fn needs_quotes(cell: &str, delimiter: char) -> bool {
    cell.contains(delimiter) || cell.contains('"') || cell.contains('\n') || cell.contains('\r')
}

fn write_row<W: Write>(w: &mut W, cells: &[&str], opts: &ExportOptions) -> io::Result<()> {
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            write!(w, "{}", opts.delimiter)?;
        }
        let quote = match opts.quote {
            QuoteStyle::Always => true,
            QuoteStyle::Minimal => needs_quotes(cell, opts.delimiter),
        };
        if quote {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            write!(w, "{cell}")?;
        }
    }
    writeln!(w)
}

/// Write the header and one row per record. Unresolved fields are written as
/// their sentinel text.
pub fn write_csv<W: Write>(w: &mut W, batch: &[JobRecord], opts: &ExportOptions) -> io::Result<()> {
    write_row(w, &Field::ALL.map(Field::column), opts)?;
    for record in batch {
        write_row(w, &record.cells(), opts)?;
    }
    Ok(())
}

/// Render a batch as CSV text.
pub fn to_csv_string(batch: &[JobRecord], opts: &ExportOptions) -> String {
    let mut buf: Vec<u8> = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = write_csv(&mut buf, batch, opts);

    match String::from_utf8(buf) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(&e.into_bytes()).into_owned(),
    }
}

/// Write `batch` to `path`. An empty batch still produces a header-only file.
pub fn export_csv(batch: &[JobRecord], path: &Path, opts: &ExportOptions) -> Result<()> {
    if batch.is_empty() {
        warn!(path = %path.display(), "batch is empty, writing header only");
    }
    ensure_parent(path)?;
    std::fs::write(path, to_csv_string(batch, opts)).map_err(|e| JobScrapeError::io(path, e))?;
    info!(path = %path.display(), rows = batch.len(), "wrote table");
    Ok(())
}

/// Write `batch` as a pretty JSON array of row objects.
pub fn export_json(batch: &[JobRecord], path: &Path) -> Result<()> {
    let rows: Vec<_> = batch.iter().map(JobRecord::row).collect();
    let json = serde_json::to_string_pretty(&rows)
        .map_err(|e| JobScrapeError::Export(format!("failed to serialize batch: {e}")))?;

    ensure_parent(path)?;
    std::fs::write(path, json).map_err(|e| JobScrapeError::io(path, e))?;
    info!(path = %path.display(), rows = batch.len(), "wrote json");
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(|e| JobScrapeError::io(parent, e))
        }
        _ => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

/// Split CSV text into rows of cells. Tolerates quoted fields, doubled quotes
/// and CRLF line endings; blank lines are skipped.
pub fn parse_rows(text: &str, delimiter: char) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            c if c == delimiter && !in_quotes => row.push(take(&mut field)),
            '\n' | '\r' if !in_quotes => {
                if ch == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                row.push(take(&mut field));
                if row.len() == 1 && row[0].is_empty() {
                    row.clear();
                } else {
                    rows.push(take(&mut row));
                }
            }
            _ => field.push(ch),
        }
    }

    // Trailing row without a final newline.
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }

    rows
}

/// Parse CSV text with a header row into records.
///
/// Columns are matched by header name, so their order does not matter.
/// Sentinel cells come back as `Unresolved`.
pub fn parse_csv(text: &str, delimiter: char) -> Result<Batch> {
    let mut rows = parse_rows(text, delimiter).into_iter();
    let header = rows
        .next()
        .ok_or_else(|| JobScrapeError::validation("table has no header row"))?;

    let mut columns = Vec::with_capacity(Field::ALL.len());
    for field in Field::ALL {
        let idx = header
            .iter()
            .position(|name| Field::from_column(name) == Some(field))
            .ok_or_else(|| JobScrapeError::validation(format!("missing column '{field}'")))?;
        columns.push((field, idx));
    }

    let mut batch = Batch::new();
    for (line, row) in rows.enumerate() {
        if row.len() != header.len() {
            return Err(JobScrapeError::validation(format!(
                "row {} has {} cells, expected {}",
                line + 2,
                row.len(),
                header.len()
            )));
        }
        let mut record = JobRecord::default();
        for &(field, idx) in &columns {
            *record.field_mut(field) = FieldOutcome::from_cell(field, &row[idx]);
        }
        batch.push(record);
    }

    debug!(rows = batch.len(), "parsed table");
    Ok(batch)
}

/// Read a previously exported table from `path`.
pub fn read_csv(path: &Path, delimiter: char) -> Result<Batch> {
    let text = std::fs::read_to_string(path).map_err(|e| JobScrapeError::io(path, e))?;
    parse_csv(text.trim_start_matches('\u{feff}'), delimiter)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, company: &str, location: &str, description: &str) -> JobRecord {
        JobRecord {
            title: FieldOutcome::from_text(title),
            company: FieldOutcome::from_text(company),
            location: FieldOutcome::from_text(location),
            description: FieldOutcome::from_text(description),
        }
    }

    fn temp_dir() -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("jobscrape-export-test-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn minimal_quoting_only_where_needed() {
        let batch = vec![record("Rust Dev", "Acme", "Berlin, Germany", "Say \"hi\"")];
        let csv = to_csv_string(&batch, &ExportOptions::default());
        assert_eq!(
            csv,
            "title,company,location,description\nRust Dev,Acme,\"Berlin, Germany\",\"Say \"\"hi\"\"\"\n"
        );
    }

    #[test]
    fn raw_export_quotes_every_cell() {
        let batch = vec![record("Rust Dev", "Acme", "Remote", "")];
        let csv = to_csv_string(&batch, &ExportOptions::raw(','));
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines[0], r#""title","company","location","description""#);
        assert_eq!(lines[1], r#""Rust Dev","Acme","Remote","No description available""#);
    }

    #[test]
    fn custom_delimiter() {
        let batch = vec![record("Dev", "Acme", "Berlin, Germany", "a;b")];
        let csv = to_csv_string(&batch, &ExportOptions::formatted(';'));
        assert!(csv.starts_with("title;company;location;description\n"));
        assert!(csv.contains("Dev;Acme;Berlin, Germany;\"a;b\""));
    }

    #[test]
    fn empty_batch_writes_header_only() {
        let dir = temp_dir();
        let path = dir.join("out").join("jobs.csv");
        export_csv(&[], &path, &ExportOptions::default()).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "title,company,location,description\n"
        );
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn parse_rows_handles_quotes_and_crlf() {
        let rows = parse_rows("a,\"b,c\"\r\n\"x\"\"y\",\"multi\nline\"\r\n\r\n", ',');
        assert_eq!(
            rows,
            vec![
                vec!["a".to_string(), "b,c".to_string()],
                vec!["x\"y".to_string(), "multi\nline".to_string()],
            ]
        );
    }

    #[test]
    fn parse_rows_keeps_unterminated_last_row() {
        let rows = parse_rows("a,b\nc,d", ',');
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], vec!["c".to_string(), "d".to_string()]);
    }

    #[test]
    fn import_maps_sentinels_and_reorders_columns() {
        let text = "company,title,description,location\n\
                    Acme,Rust Dev,No description available,Unknown Location\n\
                    Unknown Company,Go Dev,Builds things,Remote\n";
        let batch = parse_csv(text, ',').unwrap();

        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].title.as_deref(), Some("Rust Dev"));
        assert_eq!(batch[0].company.as_deref(), Some("Acme"));
        assert_eq!(batch[0].location, FieldOutcome::Unresolved);
        assert_eq!(batch[0].description, FieldOutcome::Unresolved);
        assert!(!batch[1].is_accepted());
    }

    #[test]
    fn import_rejects_bad_tables() {
        assert!(matches!(parse_csv("", ','), Err(JobScrapeError::Validation { .. })));

        let err = parse_csv("title,company,location\nA,B,C\n", ',').unwrap_err();
        assert!(err.to_string().contains("description"));

        let err = parse_csv("title,company,location,description\nA,B\n", ',').unwrap_err();
        assert!(err.to_string().contains("row 2"));
    }

    #[test]
    fn exported_table_reads_back() {
        let dir = temp_dir();
        let path = dir.join("jobs.csv");
        let batch = vec![
            record("Rust Dev", "Acme", "Berlin, Germany", "Line \"one\"\nline two"),
            record("Go Dev", "Globex", "", ""),
        ];
        export_csv(&batch, &path, &ExportOptions::raw(',')).unwrap();
        assert_eq!(read_csv(&path, ',').unwrap(), batch);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn json_export_uses_sentinels() {
        let dir = temp_dir();
        let path = dir.join("jobs.json");
        export_json(&[record("Rust Dev", "Acme", "", "")], &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value[0]["title"], "Rust Dev");
        assert_eq!(value[0]["location"], "Unknown Location");
        let _ = std::fs::remove_dir_all(&dir);
    }
}
