//! Invoice field extraction module.
//!
//! A single parameterized pipeline handles both tariff groups; the
//! group-specific field sets are selected by [`crate::models::TariffGroup`]
//! rather than by separate code paths.

pub mod history;
pub mod invoice;
pub mod number;
pub mod patterns;

pub use history::extract_history;
pub use invoice::{ExtractionResult, InvoiceExtractor};
pub use number::{normalize_text, parse_br_number};
