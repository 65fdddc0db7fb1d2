//! The page session boundary.
//!
//! Browser lifecycle, login and navigation live outside this crate. The
//! extractor only needs a read-only view of the currently open posting
//! ([`PageView`]); the batch collector additionally needs to open postings and
//! wait for them to settle ([`PageSession`]).
//!
//! [`HtmlPageSession`] is the built-in session: each posting is a saved
//! rendered-page snapshot on disk, queried with `scraper`.

use std::cmp::Ordering;
use std::fmt;
use std::iter::Peekable;
use std::path::{Path, PathBuf};
use std::str::Chars;
use std::time::Duration;

use jobscrape_shared::{JobScrapeError, Result};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// Read-only access to the currently open posting.
pub trait PageView {
    /// Text content of every element matching `selector`, in document order.
    /// An empty list is a normal answer, not an error.
    fn query(&self, selector: &str) -> Result<Vec<String>>;

    /// Whole-page text snapshot, one rendered line per line.
    fn current_text(&self) -> Result<String>;
}

/// A page session able to activate postings one at a time.
pub trait PageSession: PageView {
    /// Identifies one posting (a card, a URL, a snapshot file...).
    type Handle: fmt::Display;

    /// Make `handle` the current posting.
    fn open(&mut self, handle: &Self::Handle) -> Result<()>;

    /// Block until the current posting has settled, or `timeout` elapses.
    /// Returns `false` on timeout.
    fn wait_until_loaded(&mut self, timeout: Duration) -> Result<bool>;
}

// ---------------------------------------------------------------------------
// Snapshot-backed session
// ---------------------------------------------------------------------------

/// A saved rendered posting page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub path: PathBuf,
}

impl Snapshot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// List the `*.html` snapshots in `dir`, in natural file-name order
/// (`2.html` before `10.html`) so the encounter order is stable across runs.
pub fn discover_snapshots(dir: &Path) -> Result<Vec<Snapshot>> {
    let entries = std::fs::read_dir(dir).map_err(|e| JobScrapeError::io(dir, e))?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| JobScrapeError::io(dir, e))?.path();
        let is_html = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm"));
        if path.is_file() && is_html {
            paths.push(path);
        }
    }
    paths.sort_by(|a, b| natural_cmp(&a.to_string_lossy(), &b.to_string_lossy()));

    debug!(dir = %dir.display(), count = paths.len(), "discovered posting snapshots");
    Ok(paths.into_iter().map(Snapshot::new).collect())
}

/// Compare strings treating each run of ASCII digits as one number.
fn natural_cmp(a: &str, b: &str) -> Ordering {
    let (mut a, mut b) = (a.chars().peekable(), b.chars().peekable());
    loop {
        match (a.peek().copied(), b.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let (da, db) = (take_digits(&mut a), take_digits(&mut b));
                let (ta, tb) = (da.trim_start_matches('0'), db.trim_start_matches('0'));
                let ord = ta
                    .len()
                    .cmp(&tb.len())
                    .then_with(|| ta.cmp(tb))
                    .then_with(|| da.len().cmp(&db.len()));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(x), Some(y)) => {
                if x != y {
                    return x.cmp(&y);
                }
                a.next();
                b.next();
            }
        }
    }
}

fn take_digits(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut digits = String::new();
    while let Some(c) = chars.next_if(char::is_ascii_digit) {
        digits.push(c);
    }
    digits
}

/// Session over rendered HTML snapshots.
#[derive(Default)]
pub struct HtmlPageSession {
    page: Option<Html>,
}

impl HtmlPageSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current posting with an in-memory document.
    pub fn load_html(&mut self, html: &str) {
        self.page = Some(Html::parse_document(html));
    }

    fn page(&self) -> Result<&Html> {
        self.page
            .as_ref()
            .ok_or_else(|| JobScrapeError::session("no posting is open"))
    }
}

impl PageView for HtmlPageSession {
    fn query(&self, selector: &str) -> Result<Vec<String>> {
        let page = self.page()?;
        let sel = Selector::parse(selector)
            .map_err(|e| JobScrapeError::parse(format!("invalid selector '{selector}': {e}")))?;

        Ok(page.select(&sel).map(inner_text).collect())
    }

    fn current_text(&self) -> Result<String> {
        let page = self.page()?;
        let body_sel = Selector::parse("body")
            .map_err(|e| JobScrapeError::parse(format!("invalid selector 'body': {e}")))?;

        let root = page
            .select(&body_sel)
            .next()
            .unwrap_or_else(|| page.root_element());
        Ok(inner_text(root))
    }
}

impl PageSession for HtmlPageSession {
    type Handle = Snapshot;

    fn open(&mut self, handle: &Snapshot) -> Result<()> {
        // Never answer queries from the previous posting.
        self.page = None;

        // Saved pages are not always UTF-8; undecodable bytes become U+FFFD.
        let bytes = std::fs::read(&handle.path).map_err(|e| JobScrapeError::io(&handle.path, e))?;
        self.load_html(&String::from_utf8_lossy(&bytes));
        Ok(())
    }

    fn wait_until_loaded(&mut self, _timeout: Duration) -> Result<bool> {
        // A snapshot is already rendered; it counts as loaded once it has
        // any visible text at all.
        Ok(!self.current_text()?.is_empty())
    }
}

// ---------------------------------------------------------------------------
// Rendered text
// ---------------------------------------------------------------------------

/// Elements that start a new rendered line.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr",
    "li", "main", "nav", "ol", "p", "pre", "section", "table", "td", "th", "tr", "ul",
];

/// Elements whose content is never rendered.
const HIDDEN_TAGS: &[&str] = &["script", "style", "noscript", "template", "head"];

/// Approximate the browser's `innerText`: block elements break lines,
/// whitespace inside a line collapses, blank lines disappear.
pub fn inner_text(el: ElementRef<'_>) -> String {
    let mut raw = String::new();
    collect_text(el, &mut raw);

    raw.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn collect_text(el: ElementRef<'_>, out: &mut String) {
    for child in el.children() {
        if let Some(child_el) = ElementRef::wrap(child) {
            let tag = child_el.value().name();
            if HIDDEN_TAGS.contains(&tag) {
                continue;
            }
            let block = BLOCK_TAGS.contains(&tag);
            if block {
                out.push('\n');
            }
            collect_text(child_el, out);
            if block {
                out.push('\n');
            }
        } else if let Some(text) = child.value().as_text() {
            // Source line breaks inside a text node are not rendered.
            out.extend(text.chars().map(|c| if c == '\n' || c == '\r' { ' ' } else { c }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><head><title>t</title><style>.x{}</style></head><body>
        <nav>Search <b>Jobs</b></nav>
        <h1>  Rust   Engineer </h1>
        <a href="/company/acme/">Acme<br>12k followers</a>
        <script>var hidden = 1;</script>
        <p>Berlin,   Germany</p>
    </body></html>"#;

    fn session() -> HtmlPageSession {
        let mut s = HtmlPageSession::new();
        s.load_html(PAGE);
        s
    }

    #[test]
    fn query_returns_collapsed_text() {
        let s = session();
        assert_eq!(s.query("h1").unwrap(), vec!["Rust Engineer".to_string()]);
    }

    #[test]
    fn query_breaks_lines_on_block_tags() {
        let s = session();
        let links = s.query(r#"a[href*="/company/"]"#).unwrap();
        assert_eq!(links, vec!["Acme\n12k followers".to_string()]);
    }

    #[test]
    fn query_with_no_match_is_empty() {
        let s = session();
        assert!(s.query("h2[data-job-title]").unwrap().is_empty());
    }

    #[test]
    fn invalid_selector_is_parse_error() {
        let s = session();
        let err = s.query("h1[").unwrap_err();
        assert!(matches!(err, JobScrapeError::Parse { .. }));
    }

    #[test]
    fn current_text_skips_hidden_content() {
        let text = session().current_text().unwrap();
        assert!(text.contains("Berlin, Germany"));
        assert!(!text.contains("hidden"));
        assert!(!text.contains(".x{}"));
        assert!(text.lines().any(|l| l == "Rust Engineer"));
    }

    #[test]
    fn queries_fail_before_any_posting_is_open() {
        let s = HtmlPageSession::new();
        assert!(matches!(s.query("h1"), Err(JobScrapeError::Session(_))));
    }

    #[test]
    fn empty_snapshot_never_settles() {
        let mut s = HtmlPageSession::new();
        s.load_html("<html><body>   </body></html>");
        assert!(!s.wait_until_loaded(Duration::from_millis(10)).unwrap());
    }

    #[test]
    fn open_and_discover_snapshots() {
        let dir = std::env::temp_dir().join(format!(
            "jobscrape-session-test-{}",
            uuid::Uuid::now_v7()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("b.html"), "<body><h1>Second</h1></body>").unwrap();
        std::fs::write(dir.join("a.html"), "<body><h1>First</h1></body>").unwrap();
        std::fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let snapshots = discover_snapshots(&dir).unwrap();
        assert_eq!(snapshots.len(), 2);
        assert!(snapshots[0].path.ends_with("a.html"));

        let mut s = HtmlPageSession::new();
        s.open(&snapshots[1]).unwrap();
        assert!(s.wait_until_loaded(Duration::from_secs(1)).unwrap());
        assert_eq!(s.query("h1").unwrap(), vec!["Second".to_string()]);

        let missing = Snapshot::new(dir.join("missing.html"));
        assert!(matches!(s.open(&missing), Err(JobScrapeError::Io { .. })));
        // The previous posting is gone after a failed open.
        assert!(s.query("h1").is_err());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn natural_order_compares_numbers() {
        assert_eq!(natural_cmp("2.html", "10.html"), Ordering::Less);
        assert_eq!(natural_cmp("job-9.html", "job-10.html"), Ordering::Less);
        assert_eq!(natural_cmp("a.html", "b.html"), Ordering::Less);
        assert_eq!(natural_cmp("02.html", "2.html"), Ordering::Greater);
        assert_eq!(natural_cmp("x1.html", "x1.html"), Ordering::Equal);
    }

    #[test]
    fn numbered_snapshots_discovered_in_natural_order() {
        let dir = std::env::temp_dir().join(format!(
            "jobscrape-session-order-{}",
            uuid::Uuid::now_v7()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        for n in [10, 2, 1] {
            std::fs::write(dir.join(format!("{n}.html")), "<body>x</body>").unwrap();
        }

        let names: Vec<_> = discover_snapshots(&dir)
            .unwrap()
            .iter()
            .map(|s| s.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["1.html", "2.html", "10.html"]);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn non_utf8_snapshot_still_opens() {
        let dir = std::env::temp_dir().join(format!(
            "jobscrape-session-latin1-{}",
            uuid::Uuid::now_v7()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("latin1.html");
        // "Café Müller" in Latin-1.
        let mut bytes = b"<body><h1>Rust Engineer</h1><a href=\"/company/x/\">Caf".to_vec();
        bytes.extend_from_slice(&[0xE9, b' ', b'M', 0xFC, b'l', b'l', b'e', b'r']);
        bytes.extend_from_slice(b"</a></body>");
        std::fs::write(&path, bytes).unwrap();

        let mut s = HtmlPageSession::new();
        s.open(&Snapshot::new(&path)).unwrap();
        assert_eq!(s.query("h1").unwrap(), vec!["Rust Engineer".to_string()]);
        let company = s.query(r#"a[href*="/company/"]"#).unwrap();
        assert!(company[0].starts_with("Caf\u{FFFD}"));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
