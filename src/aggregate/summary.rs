use std::collections::BTreeMap;

use tracing::info;

use crate::aggregate::types::{CategorySummary, PostalSummary};
use crate::error::Result;
use crate::plz::Plz;
use crate::table::SchoolTable;

/// Counts rows per postal code.
///
/// Every postal code is normalized to [`Plz`]; a value that does not parse
/// aborts with [`crate::error::PipelineError::KeyType`] naming the data row
/// (1-based, header excluded).
pub fn count_by_postal_code(table: &SchoolTable, postal_column: &str) -> Result<PostalSummary> {
    let idx = table.column_index(postal_column)?;
    let mut counts: BTreeMap<Plz, usize> = BTreeMap::new();

    for (i, row) in table.rows().iter().enumerate() {
        let plz = Plz::parse(row.get(idx).unwrap_or(""), &row_location(i))?;
        *counts.entry(plz).or_default() += 1;
    }

    info!(
        postal_codes = counts.len(),
        schools = table.len(),
        "Summarized schools by postal code"
    );
    Ok(PostalSummary { counts })
}

/// Counts rows per (postal code, category) pair.
pub fn count_by_postal_code_and_category(
    table: &SchoolTable,
    postal_column: &str,
    category_column: &str,
) -> Result<CategorySummary> {
    let plz_idx = table.column_index(postal_column)?;
    let cat_idx = table.column_index(category_column)?;
    let mut counts: BTreeMap<(Plz, String), usize> = BTreeMap::new();

    for (i, row) in table.rows().iter().enumerate() {
        let plz = Plz::parse(row.get(plz_idx).unwrap_or(""), &row_location(i))?;
        let category = row.get(cat_idx).unwrap_or("").to_string();
        *counts.entry((plz, category)).or_default() += 1;
    }

    info!(groups = counts.len(), "Summarized schools by postal code and type");
    Ok(CategorySummary { counts })
}

fn row_location(index: usize) -> String {
    format!("row {}", index + 1)
}
