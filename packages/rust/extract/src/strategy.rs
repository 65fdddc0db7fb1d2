//! Extraction strategies, field policies and the chains that order them.
//!
//! A strategy is an independent, read-only probe that produces at most one
//! candidate string for a field. A [`FieldChain`] is plain data: a policy plus
//! a prioritized list of strategies. The extractor walks the chain and keeps
//! the first candidate the policy accepts.

use jobscrape_shared::{Field, Result};

use crate::session::PageView;

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// One probe for one field.
///
/// `Ok(None)` is a probe miss and simply falls through to the next strategy;
/// `Err` means the session itself failed and aborts the posting.
pub trait ExtractionStrategy {
    /// Short name used in traces.
    fn name(&self) -> &str;

    /// Look for a candidate value on the current page.
    fn probe(&self, page: &dyn PageView) -> Result<Option<String>>;
}

/// Field-specific validity check.
///
/// Returns the (possibly refined) value when the candidate is acceptable.
pub trait FieldPolicy {
    fn accept(&self, candidate: &str) -> Option<String>;
}

// ---------------------------------------------------------------------------
// Generic probes
// ---------------------------------------------------------------------------

/// Text of the first element matching a selector.
#[derive(Debug, Clone)]
pub struct FirstMatch {
    pub name: &'static str,
    pub selector: &'static str,
}

impl ExtractionStrategy for FirstMatch {
    fn name(&self) -> &str {
        self.name
    }

    fn probe(&self, page: &dyn PageView) -> Result<Option<String>> {
        let first = page.query(self.selector)?.into_iter().next();
        Ok(first.filter(|text| !text.trim().is_empty()))
    }
}

/// Text of the first matching element that passes `keep`.
#[derive(Debug, Clone)]
pub struct ScanMatches {
    pub name: &'static str,
    pub selector: &'static str,
    pub keep: fn(&str) -> bool,
}

impl ExtractionStrategy for ScanMatches {
    fn name(&self) -> &str {
        self.name
    }

    fn probe(&self, page: &dyn PageView) -> Result<Option<String>> {
        Ok(page
            .query(self.selector)?
            .into_iter()
            .find(|text| (self.keep)(text.trim())))
    }
}

/// Longest matching element text that passes `keep`.
#[derive(Debug, Clone)]
pub struct LargestMatch {
    pub name: &'static str,
    pub selector: &'static str,
    pub keep: fn(&str) -> bool,
}

impl ExtractionStrategy for LargestMatch {
    fn name(&self) -> &str {
        self.name
    }

    fn probe(&self, page: &dyn PageView) -> Result<Option<String>> {
        let mut best: Option<String> = None;
        let mut best_len = 0;

        for text in page.query(self.selector)? {
            let len = char_len(text.trim());
            // Strictly longer: ties keep the earlier element.
            if len > best_len && (self.keep)(text.trim()) {
                best_len = len;
                best = Some(text);
            }
        }

        Ok(best)
    }
}

/// First label from a closed set that appears anywhere in the page text.
#[derive(Debug, Clone)]
pub struct LabelInText {
    pub name: &'static str,
    pub labels: &'static [&'static str],
}

impl ExtractionStrategy for LabelInText {
    fn name(&self) -> &str {
        self.name
    }

    fn probe(&self, page: &dyn PageView) -> Result<Option<String>> {
        let text = page.current_text()?;
        Ok(self
            .labels
            .iter()
            .find(|label| text.contains(**label))
            .map(|label| (*label).to_string()))
    }
}

/// First line of the page text that passes `keep`.
#[derive(Debug, Clone)]
pub struct LineScan {
    pub name: &'static str,
    pub keep: fn(&str) -> bool,
}

impl ExtractionStrategy for LineScan {
    fn name(&self) -> &str {
        self.name
    }

    fn probe(&self, page: &dyn PageView) -> Result<Option<String>> {
        let text = page.current_text()?;
        Ok(text
            .lines()
            .find(|line| (self.keep)(line))
            .map(|line| line.trim().to_string()))
    }
}

// ---------------------------------------------------------------------------
// FieldChain
// ---------------------------------------------------------------------------

/// Ordered strategies for one field, plus the policy their candidates must pass.
pub struct FieldChain {
    field: Field,
    policy: Box<dyn FieldPolicy>,
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl FieldChain {
    /// An empty chain; every extraction resolves to `Unresolved` until
    /// strategies are pushed.
    pub fn new(field: Field, policy: impl FieldPolicy + 'static) -> Self {
        Self {
            field,
            policy: Box::new(policy),
            strategies: Vec::new(),
        }
    }

    /// Append a strategy at the lowest priority.
    pub fn push(&mut self, strategy: impl ExtractionStrategy + 'static) -> &mut Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    /// Builder form of [`FieldChain::push`].
    pub fn with(mut self, strategy: impl ExtractionStrategy + 'static) -> Self {
        self.push(strategy);
        self
    }

    /// Insert a strategy at `index` (0 = highest priority). Indices past the
    /// end append.
    pub fn insert(&mut self, index: usize, strategy: impl ExtractionStrategy + 'static) {
        let index = index.min(self.strategies.len());
        self.strategies.insert(index, Box::new(strategy));
    }

    pub fn field(&self) -> Field {
        self.field
    }

    pub fn policy(&self) -> &dyn FieldPolicy {
        self.policy.as_ref()
    }

    pub fn strategies(&self) -> impl Iterator<Item = &dyn ExtractionStrategy> {
        self.strategies.iter().map(|s| s.as_ref())
    }

    /// Strategy names in priority order.
    pub fn strategy_names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }
}

impl std::fmt::Debug for FieldChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldChain")
            .field("field", &self.field)
            .field("strategies", &self.strategy_names())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Text helpers
// ---------------------------------------------------------------------------

/// Length in characters, not bytes.
pub(crate) fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Keep at most `max` characters.
pub(crate) fn take_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// True if `text` contains any of `phrases`.
pub(crate) fn contains_any(text: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|p| text.contains(p))
}
