//! Built-in strategy chains, one module per field.
//!
//! Selectors target the listing site's detail pane. Its markup shifts between
//! postings, so every chain runs from the most specific hook down to a broad
//! heuristic over the rendered text.

mod company;
mod description;
mod location;
mod title;

use jobscrape_shared::Field;

use crate::strategy::FieldChain;

pub use company::CompanyPolicy;
pub use description::DescriptionPolicy;
pub use location::LocationPolicy;
pub use title::TitlePolicy;

/// The default chain for `field`.
pub fn default_chain(field: Field) -> FieldChain {
    match field {
        Field::Title => title::chain(),
        Field::Company => company::chain(),
        Field::Location => location::chain(),
        Field::Description => description::chain(),
    }
}
