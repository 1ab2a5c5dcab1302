//! Identifier list for the external retrieval step.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use labor_model::SeriesId;

use crate::common::OutputBatch;

/// Stage the identifier list, one identifier per line in the given order.
pub fn stage_series_list(batch: &mut OutputBatch, path: &Path, ids: &[SeriesId]) -> Result<()> {
    batch.stage(path, |out| {
        for id in ids {
            writeln!(out, "{id}").with_context(|| format!("write {}", path.display()))?;
        }
        Ok(())
    })
}

/// Write the identifier list on its own.
pub fn write_series_list(path: &Path, ids: &[SeriesId]) -> Result<()> {
    let mut batch = OutputBatch::new();
    stage_series_list(&mut batch, path, ids)?;
    batch.commit()?;
    info!(path = %path.display(), identifiers = ids.len(), "series list written");
    Ok(())
}
