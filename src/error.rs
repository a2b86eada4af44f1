//! Error taxonomy for the aggregation pipeline.
//!
//! Every stage returns [`PipelineError`]; nothing is recovered locally, so
//! the first error aborts the run.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = PipelineError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("invalid GeoJSON in {path}: {source}")]
    GeoJson {
        path: PathBuf,
        #[source]
        source: Box<geojson::Error>,
    },

    #[error("JSON error in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(
        "{path} has columns [{}] but earlier files have [{}]",
        .found.join(";"),
        .expected.join(";")
    )]
    SchemaMismatch {
        path: PathBuf,
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("column `{column}` not found")]
    MissingColumn { column: String },

    #[error("cannot compute {what} of an empty input")]
    EmptyInput { what: &'static str },

    #[error("postal code {value:?} at {location} is not an integer in 0..=99999")]
    KeyType { value: String, location: String },

    #[error("no .csv files found in {dir}")]
    NoInputFiles { dir: PathBuf },

    #[error("{path} is not a GeoJSON FeatureCollection")]
    NotAFeatureCollection { path: PathBuf },

    #[error("invalid configuration: {message}")]
    Config { message: String },
}

impl PipelineError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PipelineError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        PipelineError::Csv {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn missing_column(column: &str) -> Self {
        PipelineError::MissingColumn {
            column: column.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_mismatch_message_lists_both_headers() {
        let err = PipelineError::SchemaMismatch {
            path: PathBuf::from("b.csv"),
            expected: vec!["BSN".into(), "PLZ".into()],
            found: vec!["BSN".into(), "Ort".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("b.csv"));
        assert!(msg.contains("[BSN;Ort]"));
        assert!(msg.contains("[BSN;PLZ]"));
    }

    #[test]
    fn test_key_type_message_quotes_value() {
        let err = PipelineError::KeyType {
            value: "abc".into(),
            location: "row 3".into(),
        };
        assert_eq!(
            err.to_string(),
            "postal code \"abc\" at row 3 is not an integer in 0..=99999"
        );
    }
}
