//! Per-field extraction over strategy chains.

use jobscrape_shared::{Field, FieldOutcome, Result};
use tracing::{debug, trace};

use crate::fields;
use crate::session::PageView;
use crate::strategy::FieldChain;

/// Holds one chain per field and resolves fields against a page.
#[derive(Debug)]
pub struct FieldExtractor {
    chains: [FieldChain; 4],
}

impl FieldExtractor {
    /// Extractor with the built-in chains for every field.
    pub fn new() -> Self {
        Self {
            chains: Field::ALL.map(fields::default_chain),
        }
    }

    /// Replace the chain for `chain.field()`.
    pub fn with_chain(mut self, chain: FieldChain) -> Self {
        let idx = slot(chain.field());
        self.chains[idx] = chain;
        self
    }

    pub fn chain(&self, field: Field) -> &FieldChain {
        &self.chains[slot(field)]
    }

    /// Mutable access for reordering or extending a chain in place.
    pub fn chain_mut(&mut self, field: Field) -> &mut FieldChain {
        &mut self.chains[slot(field)]
    }

    /// Run the chain for `field` and return the first accepted candidate.
    ///
    /// Probe misses and rejected candidates fall through; a field where every
    /// strategy falls through is `Unresolved`. Only session failures are
    /// returned as errors.
    pub fn extract(&self, field: Field, page: &dyn PageView) -> Result<FieldOutcome> {
        let chain = self.chain(field);

        for strategy in chain.strategies() {
            let Some(candidate) = strategy.probe(page)? else {
                trace!(%field, strategy = strategy.name(), "probe miss");
                continue;
            };

            match chain.policy().accept(&candidate) {
                Some(value) => {
                    debug!(%field, strategy = strategy.name(), "field resolved");
                    return Ok(FieldOutcome::Resolved(value));
                }
                None => {
                    trace!(%field, strategy = strategy.name(), "candidate rejected by policy");
                }
            }
        }

        debug!(%field, "no strategy produced a valid value");
        Ok(FieldOutcome::Unresolved)
    }
}

impl Default for FieldExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn slot(field: Field) -> usize {
    match field {
        Field::Title => 0,
        Field::Company => 1,
        Field::Location => 2,
        Field::Description => 3,
    }
}
