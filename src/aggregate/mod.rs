//! School counts by postal code and by postal code + school type.
//!
//! This module groups the deduplicated table at both granularities and
//! finds the postal codes with the fewest and most schools.

pub mod extremes;
pub mod summary;
pub mod types;

pub use extremes::extremes;
pub use summary::{count_by_postal_code, count_by_postal_code_and_category};
pub use types::{CategoryRow, CategorySummary, Extremes, PostalSummary, SummaryRow};
