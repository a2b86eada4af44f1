//! Natural-key deduplication.

use std::collections::HashSet;

use tracing::info;

use crate::error::Result;
use crate::table::SchoolTable;

/// Keeps the first row for each distinct value of `key_column`.
///
/// Retained rows keep their relative order. The input table is left as is.
pub fn deduplicate(table: &SchoolTable, key_column: &str) -> Result<SchoolTable> {
    let idx = table.column_index(key_column)?;
    let mut seen: HashSet<&str> = HashSet::with_capacity(table.len());
    let mut deduped = SchoolTable::new(table.headers().clone());

    for row in table.rows() {
        let key = row.get(idx).unwrap_or("");
        if seen.insert(key) {
            deduped.push(row.clone());
        }
    }

    info!(
        key = key_column,
        before = table.len(),
        after = deduped.len(),
        dropped = table.len() - deduped.len(),
        "Removed duplicate rows"
    );
    Ok(deduped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use csv::StringRecord;

    fn table(rows: &[[&str; 3]]) -> SchoolTable {
        SchoolTable::with_rows(
            StringRecord::from(vec!["BSN", "PLZ", "Schultyp"]),
            rows.iter().map(|r| StringRecord::from(r.to_vec())).collect(),
        )
    }

    #[test]
    fn test_first_occurrence_wins() {
        let input = table(&[
            ["A1", "10115", "Grundschule"],
            ["A2", "10115", "Gymnasium"],
            ["A1", "10117", "Sekundarschule"],
        ]);

        let deduped = deduplicate(&input, "BSN").unwrap();
        assert_eq!(deduped.len(), 2);
        assert_eq!(&deduped.rows()[0][2], "Grundschule");
        assert_eq!(&deduped.rows()[1][0], "A2");
        assert_eq!(input.len(), 3);
    }

    #[test]
    fn test_order_follows_first_occurrence() {
        let input = table(&[
            ["C", "1", "x"],
            ["A", "1", "x"],
            ["C", "1", "x"],
            ["B", "1", "x"],
            ["A", "1", "x"],
        ]);

        let deduped = deduplicate(&input, "BSN").unwrap();
        let ids: Vec<_> = deduped.column("BSN").unwrap().collect();
        assert_eq!(ids, vec!["C", "A", "B"]);
    }

    #[test]
    fn test_no_duplicates_is_identity() {
        let input = table(&[["A", "1", "x"], ["B", "2", "y"]]);
        assert_eq!(deduplicate(&input, "BSN").unwrap(), input);
    }

    #[test]
    fn test_missing_key_column() {
        let input = table(&[["A", "1", "x"]]);
        assert!(matches!(
            deduplicate(&input, "Schulnummer"),
            Err(PipelineError::MissingColumn { .. })
        ));
    }
}
