//! JSON run manifest.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::common::{OutputBatch, write_atomically};

/// One input file and the rows it contributed after trimming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestSource {
    pub name: String,
    pub path: PathBuf,
    pub rows: usize,
    pub periods: usize,
}

/// Row counts per stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageCounts {
    pub entities: usize,
    pub series_ids: usize,
    pub indicator_rows: usize,
    pub indicator_missing_values: usize,
    pub indicator_invalid_series: usize,
    pub population_rows: usize,
    pub reconciled_rows: usize,
    pub matched_rows: usize,
    pub unmatched_rows: usize,
    pub historical_unmatched_rows: usize,
    pub merged_rows: usize,
    pub excluded_rows: usize,
}

/// Summary of one `build` run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunManifest {
    pub version: String,
    pub output: Option<PathBuf>,
    pub latest_year: Option<i32>,
    pub sources: Vec<ManifestSource>,
    pub counts: StageCounts,
    /// Composite keys with no population in a historical year.
    pub historical_unmatched_keys: Vec<String>,
    /// County codes missing from the entity table in a historical year.
    #[serde(default)]
    pub historical_missing_counties: Vec<String>,
}

impl RunManifest {
    pub fn new(output: Option<PathBuf>) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            output,
            latest_year: None,
            sources: Vec::new(),
            counts: StageCounts::default(),
            historical_unmatched_keys: Vec::new(),
            historical_missing_counties: Vec::new(),
        }
    }
}

fn render_manifest(out: &mut dyn Write, manifest: &RunManifest) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, manifest).context("serialize manifest")?;
    writeln!(out).context("write manifest")?;
    Ok(())
}

/// Stage the manifest as pretty-printed JSON.
pub fn stage_manifest(batch: &mut OutputBatch, path: &Path, manifest: &RunManifest) -> Result<()> {
    batch
        .stage(path, |out| render_manifest(out, manifest))
        .with_context(|| format!("write manifest {}", path.display()))
}

/// Write the manifest as pretty-printed JSON.
pub fn write_manifest(path: &Path, manifest: &RunManifest) -> Result<()> {
    write_atomically(path, |out| render_manifest(out, manifest))
        .with_context(|| format!("write manifest {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_round_trips_through_json() {
        let mut manifest = RunManifest::new(Some(PathBuf::from("out/merged.csv")));
        manifest.latest_year = Some(2024);
        manifest.counts.merged_rows = 12;
        manifest.sources.push(ManifestSource {
            name: "indicators".to_string(),
            path: PathBuf::from("lau.xlsx"),
            rows: 352,
            periods: 300,
        });
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("manifest.json");
        write_manifest(&path, &manifest).expect("write");
        let text = std::fs::read_to_string(&path).expect("read");
        let parsed: RunManifest = serde_json::from_str(&text).expect("parse");
        assert_eq!(parsed, manifest);
    }
}
