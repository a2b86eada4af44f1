//! Pipeline configuration.
//!
//! Stored as a JSON object on disk; every field is optional and falls back
//! to the defaults used for the Berlin school extracts:
//! ```json
//! {
//!   "input_dir": "extracts",
//!   "boundaries": "plz.geojson",
//!   "output_dir": "Output",
//!   "delimiter": ";",
//!   "columns": { "school_id": "BSN", "postal_code": "PLZ" },
//!   "boundary_key": "plz",
//!   "write_policy": "skip_existing"
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{PipelineError, Result};

/// Column names in the school extracts and in the generated artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Columns {
    /// Natural key, unique per school.
    pub school_id: String,
    pub postal_code: String,
    /// School type.
    pub category: String,
    /// Name of the count column written to the summary and joined artifacts.
    pub count: String,
}

impl Default for Columns {
    fn default() -> Self {
        Self {
            school_id: "BSN".to_string(),
            postal_code: "PLZ".to_string(),
            category: "Schultyp".to_string(),
            count: "Anzahl".to_string(),
        }
    }
}

/// What the writer does when the output directory already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WritePolicy {
    /// Leave the existing directory untouched and write nothing.
    #[default]
    SkipExisting,
    /// Replace the existing directory with freshly written artifacts.
    Overwrite,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub input_dir: PathBuf,
    pub boundaries: PathBuf,
    pub output_dir: PathBuf,
    pub delimiter: char,
    pub columns: Columns,
    /// Postal-code property on the boundary features.
    pub boundary_key: String,
    pub write_policy: WritePolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            boundaries: PathBuf::from("plz.geojson"),
            output_dir: PathBuf::from("Output"),
            delimiter: ';',
            columns: Columns::default(),
            boundary_key: "plz".to_string(),
            write_policy: WritePolicy::default(),
        }
    }
}

impl PipelineConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| PipelineError::io(path, e))?;
        let config: PipelineConfig =
            serde_json::from_str(&content).map_err(|source| PipelineError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// The delimiter as the single byte the CSV reader and writer expect.
    pub fn delimiter_byte(&self) -> Result<u8> {
        u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| PipelineError::Config {
                message: format!("delimiter {:?} is not a single ASCII character", self.delimiter),
            })
    }

    pub fn validate(&self) -> Result<()> {
        self.delimiter_byte()?;

        let columns = [
            ("school_id", &self.columns.school_id),
            ("postal_code", &self.columns.postal_code),
            ("category", &self.columns.category),
            ("count", &self.columns.count),
            ("boundary_key", &self.boundary_key),
        ];
        if let Some((field, _)) = columns.iter().find(|(_, name)| name.trim().is_empty()) {
            return Err(PipelineError::Config {
                message: format!("{field} must not be empty"),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_berlin_extracts() {
        let config = PipelineConfig::default();
        assert_eq!(config.columns.school_id, "BSN");
        assert_eq!(config.columns.postal_code, "PLZ");
        assert_eq!(config.columns.category, "Schultyp");
        assert_eq!(config.columns.count, "Anzahl");
        assert_eq!(config.boundary_key, "plz");
        assert_eq!(config.delimiter_byte().unwrap(), b';');
        assert_eq!(config.write_policy, WritePolicy::SkipExisting);
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"output_dir": "out", "columns": {{"category": "Typ"}}, "write_policy": "overwrite"}}"#
        )
        .unwrap();

        let config = PipelineConfig::load(file.path()).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.columns.category, "Typ");
        assert_eq!(config.columns.school_id, "BSN");
        assert_eq!(config.write_policy, WritePolicy::Overwrite);
        assert_eq!(config.input_dir, PathBuf::from("."));
    }

    #[test]
    fn test_load_rejects_multibyte_delimiter() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"delimiter": "§"}}"#).unwrap();

        let err = PipelineConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, PipelineError::Config { .. }));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = PipelineConfig::load(Path::new("/nonexistent/schulen.json")).unwrap_err();
        assert!(matches!(err, PipelineError::Io { .. }));
    }

    #[test]
    fn test_validate_rejects_empty_column_name() {
        let mut config = PipelineConfig::default();
        config.columns.postal_code = String::new();
        assert!(config.validate().is_err());
    }
}
