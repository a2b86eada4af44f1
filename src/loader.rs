//! Discovery and parsing of the school CSV extracts.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use tracing::{debug, info};

use crate::error::{PipelineError, Result};
use crate::table::SchoolTable;

/// Lists the `.csv` files directly inside `dir`, sorted by file name.
///
/// Subdirectories are not descended into, so an output directory living
/// next to the extracts is never picked up as input.
pub fn discover_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(dir).map_err(|e| PipelineError::io(dir, e))? {
        let entry = entry.map_err(|e| PipelineError::io(dir, e))?;
        let path = entry.path();

        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("csv") {
            continue;
        }
        files.push(path);
    }

    if files.is_empty() {
        return Err(PipelineError::NoInputFiles {
            dir: dir.to_path_buf(),
        });
    }

    files.sort();
    Ok(files)
}

/// Reads one extract, header row included.
pub fn read_table(path: &Path, delimiter: u8) -> Result<SchoolTable> {
    let file = File::open(path).map_err(|e| PipelineError::io(path, e))?;
    let mut rdr = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_reader(file);

    let headers = rdr
        .headers()
        .map_err(|e| PipelineError::csv(path, e))?
        .clone();
    let mut table = SchoolTable::new(headers);

    for result in rdr.records() {
        table.push(result.map_err(|e| PipelineError::csv(path, e))?);
    }

    debug!(path = %path.display(), rows = table.len(), "Read CSV extract");
    Ok(table)
}

/// Reads every file and concatenates them in the given order.
///
/// All files must share the first file's header row exactly (same names in
/// the same order); anything else is a [`PipelineError::SchemaMismatch`].
pub fn load_tables(paths: &[PathBuf], delimiter: u8) -> Result<SchoolTable> {
    let mut unified: Option<SchoolTable> = None;

    for path in paths {
        let table = read_table(path, delimiter)?;

        match unified.as_mut() {
            None => unified = Some(table),
            Some(acc) => {
                if acc.headers() != table.headers() {
                    return Err(PipelineError::SchemaMismatch {
                        path: path.clone(),
                        expected: acc.header_names(),
                        found: table.header_names(),
                    });
                }
                acc.extend(table.into_rows());
            }
        }
    }

    unified.ok_or_else(|| PipelineError::EmptyInput {
        what: "a unified table",
    })
}

/// Loads and concatenates every extract found in `dir`.
#[tracing::instrument(skip_all, fields(dir = %dir.display()))]
pub fn load_directory(dir: &Path, delimiter: u8) -> Result<SchoolTable> {
    let files = discover_csv_files(dir)?;
    let table = load_tables(&files, delimiter)?;

    info!(files = files.len(), rows = table.len(), "Loaded school extracts");
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_discover_only_csv_files_sorted() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "b.csv", "BSN\n");
        write(dir.path(), "a.csv", "BSN\n");
        write(dir.path(), "notes.txt", "ignored");
        fs::create_dir(dir.path().join("Output.csv")).unwrap();

        let files = discover_csv_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.csv", "b.csv"]);
    }

    #[test]
    fn test_discover_empty_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = discover_csv_files(dir.path()).unwrap_err();
        assert!(matches!(err, PipelineError::NoInputFiles { .. }));
    }

    #[test]
    fn test_discover_missing_directory_is_io_error() {
        let err = discover_csv_files(Path::new("/nonexistent/schulen")).unwrap_err();
        assert!(matches!(err, PipelineError::Io { .. }));
    }

    #[test]
    fn test_read_table_uses_delimiter() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "mitte.csv",
            "BSN;PLZ;Schultyp\n01G01;10115;Grundschule\n",
        );

        let table = read_table(&path, b';').unwrap();
        assert_eq!(table.header_names(), vec!["BSN", "PLZ", "Schultyp"]);
        assert_eq!(table.len(), 1);
        assert_eq!(&table.rows()[0][2], "Grundschule");
    }

    #[test]
    fn test_read_table_ragged_row_is_csv_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "bad.csv", "BSN;PLZ\n01G01;10115;extra\n");

        let err = read_table(&path, b';').unwrap_err();
        assert!(matches!(err, PipelineError::Csv { .. }));
    }

    #[test]
    fn test_load_tables_concatenates_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let a = write(dir.path(), "a.csv", "BSN;PLZ\nA1;10115\nA2;10117\n");
        let b = write(dir.path(), "b.csv", "BSN;PLZ\nB1;12043\n");

        let table = load_tables(&[a, b], b';').unwrap();
        let ids: Vec<_> = table.column("BSN").unwrap().collect();
        assert_eq!(ids, vec!["A1", "A2", "B1"]);
    }

    #[test]
    fn test_load_tables_rejects_differing_headers() {
        let dir = tempfile::tempdir().unwrap();
        let a = write(dir.path(), "a.csv", "BSN;PLZ\nA1;10115\n");
        let b = write(dir.path(), "b.csv", "PLZ;BSN\n10117;B1\n");

        let err = load_tables(&[a, b.clone()], b';').unwrap_err();
        match err {
            PipelineError::SchemaMismatch {
                path,
                expected,
                found,
            } => {
                assert_eq!(path, b);
                assert_eq!(expected, vec!["BSN", "PLZ"]);
                assert_eq!(found, vec!["PLZ", "BSN"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
