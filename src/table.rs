//! In-memory school table.
//!
//! Rows are kept as raw [`StringRecord`]s so every column other than the
//! key, postal code and category passes through byte-for-byte.

use csv::StringRecord;

use crate::error::{PipelineError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchoolTable {
    headers: StringRecord,
    rows: Vec<StringRecord>,
}

impl SchoolTable {
    pub fn new(headers: StringRecord) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn with_rows(headers: StringRecord, rows: Vec<StringRecord>) -> Self {
        Self { headers, rows }
    }

    pub fn headers(&self) -> &StringRecord {
        &self.headers
    }

    pub fn rows(&self) -> &[StringRecord] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<StringRecord> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn push(&mut self, row: StringRecord) {
        self.rows.push(row);
    }

    pub fn extend(&mut self, rows: impl IntoIterator<Item = StringRecord>) {
        self.rows.extend(rows);
    }

    /// Position of `name` in the header row.
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| PipelineError::missing_column(name))
    }

    /// Iterates over the values of one column, in row order.
    pub fn column<'a>(&'a self, name: &str) -> Result<impl Iterator<Item = &'a str> + use<'a>> {
        let idx = self.column_index(name)?;
        Ok(self.rows.iter().map(move |row| row.get(idx).unwrap_or("")))
    }

    pub fn header_names(&self) -> Vec<String> {
        self.headers.iter().map(str::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SchoolTable {
        SchoolTable::with_rows(
            StringRecord::from(vec!["BSN", "PLZ", "Schultyp"]),
            vec![
                StringRecord::from(vec!["01G01", "10115", "Grundschule"]),
                StringRecord::from(vec!["01Y02", "10117", "Gymnasium"]),
            ],
        )
    }

    #[test]
    fn test_column_index() {
        let table = sample();
        assert_eq!(table.column_index("PLZ").unwrap(), 1);
        assert!(matches!(
            table.column_index("Bezirk"),
            Err(PipelineError::MissingColumn { column }) if column == "Bezirk"
        ));
    }

    #[test]
    fn test_column_values_in_row_order() {
        let table = sample();
        let values: Vec<_> = table.column("Schultyp").unwrap().collect();
        assert_eq!(values, vec!["Grundschule", "Gymnasium"]);
    }

    #[test]
    fn test_len_and_empty() {
        let mut table = SchoolTable::new(StringRecord::from(vec!["BSN"]));
        assert!(table.is_empty());
        table.push(StringRecord::from(vec!["X"]));
        assert_eq!(table.len(), 1);
    }
}
