use std::fs;
use std::path::Path;

use calamine::{DataType, Range};
use tracing::{debug, info, instrument};

use crate::error::{Result, ToolError};
use crate::io::ods_read;
use crate::merge::merge;
use crate::model::AggregateStats;
use crate::normalize::{normalize_geslab, normalize_insa};
use crate::report::{compute_stats, render_report};

/// Aggregates the two exports from raw ODS bytes into the report text and
/// its summary counters.
///
/// This is a pure function of its two inputs: every invocation builds fresh
/// mappings and identical bytes always yield an identical report.
#[instrument(level = "info", skip_all, fields(cnrs_len = cnrs_bytes.len(), insa_len = insa_bytes.len()))]
pub fn aggregate(cnrs_bytes: &[u8], insa_bytes: &[u8]) -> Result<(String, AggregateStats)> {
    let cnrs_range = ods_read::read_first_sheet(cnrs_bytes)?;
    let insa_range = ods_read::read_first_sheet(insa_bytes)?;
    aggregate_ranges(&cnrs_range, &insa_range)
}

/// Aggregates the two exports from already-decoded cell ranges.
pub fn aggregate_ranges(
    cnrs: &Range<DataType>,
    insa: &Range<DataType>,
) -> Result<(String, AggregateStats)> {
    let cnrs_mapping = normalize_geslab(cnrs)?;
    let insa_mapping = normalize_insa(insa)?;
    let merged = merge(&cnrs_mapping, &insa_mapping);
    debug!(
        cnrs_codes = cnrs_mapping.len(),
        insa_codes = insa_mapping.len(),
        merged_codes = merged.len(),
        "mappings merged"
    );

    let stats = compute_stats(&cnrs_mapping, &insa_mapping, &merged);
    Ok((render_report(&merged), stats))
}

/// Reads both export files, writes the report next to them, and returns the
/// summary counters for display.
#[instrument(
    level = "info",
    skip_all,
    fields(cnrs = %cnrs.display(), insa = %insa.display(), output = %output.display())
)]
pub fn aggregate_files(cnrs: &Path, insa: &Path, output: &Path) -> Result<AggregateStats> {
    // Both inputs are checked before any processing starts.
    if !cnrs.exists() {
        return Err(ToolError::MissingInput(cnrs.to_path_buf()));
    }
    if !insa.exists() {
        return Err(ToolError::MissingInput(insa.to_path_buf()));
    }

    let cnrs_bytes = fs::read(cnrs)?;
    let insa_bytes = fs::read(insa)?;
    let (report_text, stats) = aggregate(&cnrs_bytes, &insa_bytes)?;
    fs::write(output, report_text)?;
    info!(
        merged_codes = stats.merged_codes,
        total_amount = stats.total_amount,
        "report written"
    );
    Ok(stats)
}
