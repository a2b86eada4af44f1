//! The batch job: load, deduplicate, aggregate, join, write.
//!
//! Stages run strictly in order and the first error aborts the run, so no
//! artifact is written unless every earlier stage succeeded.

use tracing::info;

use crate::aggregate::{
    CategorySummary, Extremes, PostalSummary, count_by_postal_code,
    count_by_postal_code_and_category, extremes,
};
use crate::config::PipelineConfig;
use crate::dedup::deduplicate;
use crate::error::Result;
use crate::loader::load_directory;
use crate::output::{Artifacts, WriteOutcome, write_artifacts};
use crate::plz::Plz;
use crate::spatial::{JoinColumns, join_summary, load_boundaries};
use crate::table::SchoolTable;

/// Everything computed from the school extracts alone.
#[derive(Debug, Clone)]
pub struct Summaries {
    /// Rows before deduplication.
    pub loaded_rows: usize,
    pub schools: SchoolTable,
    pub by_postal_code: PostalSummary,
    pub by_category: CategorySummary,
    pub extremes: Extremes<Plz>,
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub summaries: Summaries,
    pub polygons: usize,
    pub matched_polygons: usize,
    pub outcome: WriteOutcome,
}

/// Loads, deduplicates and aggregates the extracts without touching the
/// boundary file or the output directory.
#[tracing::instrument(skip_all, fields(input_dir = %config.input_dir.display()))]
pub fn summarize(config: &PipelineConfig) -> Result<Summaries> {
    config.validate()?;
    let delimiter = config.delimiter_byte()?;
    let columns = &config.columns;

    let loaded = load_directory(&config.input_dir, delimiter)?;
    let schools = deduplicate(&loaded, &columns.school_id)?;

    let by_postal_code = count_by_postal_code(&schools, &columns.postal_code)?;
    let by_category =
        count_by_postal_code_and_category(&schools, &columns.postal_code, &columns.category)?;
    let extremes = extremes(by_postal_code.as_map())?;

    Ok(Summaries {
        loaded_rows: loaded.len(),
        schools,
        by_postal_code,
        by_category,
        extremes,
    })
}

/// Runs the whole job and writes the artifacts.
#[tracing::instrument(skip_all, fields(output_dir = %config.output_dir.display()))]
pub fn run(config: &PipelineConfig) -> Result<RunReport> {
    let summaries = summarize(config)?;
    let columns = &config.columns;

    let boundaries = load_boundaries(&config.boundaries)?;
    let joined = join_summary(
        &boundaries,
        &summaries.by_postal_code,
        &JoinColumns {
            boundary_key: &config.boundary_key,
            postal_code: &columns.postal_code,
            count: &columns.count,
        },
    )?;

    let outcome = write_artifacts(
        &config.output_dir,
        &Artifacts {
            schools: &summaries.schools,
            summary: &summaries.by_postal_code,
            joined: &joined,
            columns,
            delimiter: config.delimiter_byte()?,
        },
        config.write_policy,
    )?;

    info!(
        schools = summaries.schools.len(),
        postal_codes = summaries.by_postal_code.len(),
        polygons = joined.len(),
        "Pipeline finished"
    );

    Ok(RunReport {
        polygons: joined.len(),
        matched_polygons: joined.matched(),
        summaries,
        outcome,
    })
}
