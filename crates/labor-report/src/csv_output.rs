//! Final merged table writer.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use labor_ingest::format_numeric;
use labor_model::MergedRecord;
use labor_model::columns::OUTPUT_COLUMNS;

use crate::common::{OutputBatch, write_atomically};

/// Render one record in output column order.
pub fn record_fields(record: &MergedRecord) -> [String; 11] {
    [
        record.series_id.to_string(),
        record.state.clone(),
        record.state_code.clone(),
        record.county_name.clone(),
        record.county_code.clone(),
        record.month.to_string(),
        record.year.to_string(),
        record.date.format("%Y-%m-%d").to_string(),
        record.indicator.to_string(),
        format_numeric(record.value),
        format_numeric(record.population),
    ]
}

/// Write the header row and every record as CSV to `out`.
pub fn render_merged_csv<W: Write>(out: W, records: &[MergedRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer
        .write_record(OUTPUT_COLUMNS)
        .context("write header")?;
    for record in records {
        writer
            .write_record(record_fields(record))
            .with_context(|| format!("write record {}", record.series_id))?;
    }
    writer.flush().context("flush csv")?;
    Ok(())
}

/// Stage the merged table as part of a larger output set.
pub fn stage_merged_csv(
    batch: &mut OutputBatch,
    path: &Path,
    records: &[MergedRecord],
) -> Result<()> {
    batch
        .stage(path, |out| render_merged_csv(out, records))
        .with_context(|| format!("write merged table {}", path.display()))
}

/// Write the merged table to `path`. The file appears only once complete.
pub fn write_merged_csv(path: &Path, records: &[MergedRecord]) -> Result<()> {
    write_atomically(path, |out| render_merged_csv(out, records))
        .with_context(|| format!("write merged table {}", path.display()))?;
    info!(path = %path.display(), rows = records.len(), "merged table written");
    Ok(())
}
