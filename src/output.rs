//! Persistence of the run's three artifacts.
//!
//! Artifacts are written into a hidden staging directory beside the target
//! and moved into place with one rename, so a failed run never leaves a
//! half-written output directory behind.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, WriterBuilder};
use tracing::{debug, info, warn};

use crate::aggregate::{PostalSummary, SummaryRow};
use crate::config::{Columns, WritePolicy};
use crate::error::{PipelineError, Result};
use crate::spatial::JoinedBoundaries;
use crate::table::SchoolTable;

pub const SCHOOLS_FILE: &str = "alle_schulen.csv";
pub const SUMMARY_FILE: &str = "Schulen_Zusammenfassung.csv";
pub const BOUNDARIES_FILE: &str = "Schulen_nach_PLZ.geojson";

/// Everything the writer persists for one run.
pub struct Artifacts<'a> {
    pub schools: &'a SchoolTable,
    pub summary: &'a PostalSummary,
    pub joined: &'a JoinedBoundaries,
    pub columns: &'a Columns,
    pub delimiter: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    Written { dir: PathBuf, files: Vec<PathBuf> },
    /// The output directory already existed and was left untouched.
    Skipped { dir: PathBuf },
}

/// Writes all artifacts into `output_dir` according to `policy`.
#[tracing::instrument(skip_all, fields(output_dir = %output_dir.display(), ?policy))]
pub fn write_artifacts(
    output_dir: &Path,
    artifacts: &Artifacts<'_>,
    policy: WritePolicy,
) -> Result<WriteOutcome> {
    let exists = output_dir.exists();
    if exists && policy == WritePolicy::SkipExisting {
        warn!("Output directory already exists, nothing written");
        return Ok(WriteOutcome::Skipped {
            dir: output_dir.to_path_buf(),
        });
    }

    let parent = match output_dir.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let staging = tempfile::Builder::new()
        .prefix(".schulen_plz-")
        .tempdir_in(parent)
        .map_err(|e| PipelineError::io(parent, e))?;

    let written = [
        write_schools(&staging.path().join(SCHOOLS_FILE), artifacts)?,
        write_summary(&staging.path().join(SUMMARY_FILE), artifacts)?,
        write_boundaries(&staging.path().join(BOUNDARIES_FILE), artifacts.joined)?,
    ];

    if exists {
        fs::remove_dir_all(output_dir).map_err(|e| PipelineError::io(output_dir, e))?;
        debug!("Removed previous output directory");
    }
    fs::rename(staging.path(), output_dir).map_err(|e| PipelineError::io(output_dir, e))?;

    let files: Vec<PathBuf> = written
        .iter()
        .filter_map(|p| p.file_name())
        .map(|name| output_dir.join(name))
        .collect();

    info!(files = files.len(), replaced = exists, "Wrote output artifacts");
    Ok(WriteOutcome::Written {
        dir: output_dir.to_path_buf(),
        files,
    })
}

fn write_schools(path: &Path, artifacts: &Artifacts<'_>) -> Result<PathBuf> {
    let file = File::create(path).map_err(|e| PipelineError::io(path, e))?;
    let mut writer = WriterBuilder::new()
        .delimiter(artifacts.delimiter)
        .from_writer(BufWriter::new(file));

    writer
        .write_record(artifacts.schools.headers())
        .map_err(|e| PipelineError::csv(path, e))?;
    for row in artifacts.schools.rows() {
        writer
            .write_record(row)
            .map_err(|e| PipelineError::csv(path, e))?;
    }
    writer.flush().map_err(|e| PipelineError::io(path, e))?;

    debug!(path = %path.display(), rows = artifacts.schools.len(), "Wrote school table");
    Ok(path.to_path_buf())
}

fn write_summary(path: &Path, artifacts: &Artifacts<'_>) -> Result<PathBuf> {
    let file = File::create(path).map_err(|e| PipelineError::io(path, e))?;
    let mut writer = WriterBuilder::new()
        .delimiter(artifacts.delimiter)
        .has_headers(false)
        .from_writer(BufWriter::new(file));

    writer
        .write_record([&artifacts.columns.postal_code, &artifacts.columns.count])
        .map_err(|e| PipelineError::csv(path, e))?;
    for row in artifacts.summary.rows() {
        writer
            .serialize(&row)
            .map_err(|e| PipelineError::csv(path, e))?;
    }
    writer.flush().map_err(|e| PipelineError::io(path, e))?;

    debug!(path = %path.display(), rows = artifacts.summary.len(), "Wrote postal-code summary");
    Ok(path.to_path_buf())
}

fn write_boundaries(path: &Path, joined: &JoinedBoundaries) -> Result<PathBuf> {
    let file = File::create(path).map_err(|e| PipelineError::io(path, e))?;
    let mut out = BufWriter::new(file);

    serde_json::to_writer(&mut out, &joined.collection).map_err(|source| PipelineError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    out.flush().map_err(|e| PipelineError::io(path, e))?;

    debug!(path = %path.display(), features = joined.len(), "Wrote joined boundaries");
    Ok(path.to_path_buf())
}

/// Reads a postal-code summary artifact back into memory.
///
/// Columns are taken by position, so the header names do not matter.
pub fn read_summary(path: &Path, delimiter: u8) -> Result<PostalSummary> {
    let file = File::open(path).map_err(|e| PipelineError::io(path, e))?;
    let mut rdr = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_reader(file);

    let mut summary = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|e| PipelineError::csv(path, e))?;
        let row: SummaryRow = record
            .deserialize(None)
            .map_err(|e| PipelineError::csv(path, e))?;
        summary.push((row.plz, row.count));
    }

    Ok(summary.into_iter().collect())
}
