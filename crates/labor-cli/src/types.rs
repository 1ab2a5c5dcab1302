use std::path::PathBuf;

use labor_transform::{AlignStats, MergeStats, ReconcileReport};

/// One wide source after trimming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSummary {
    pub name: String,
    pub path: PathBuf,
    pub rows: usize,
    pub periods: usize,
}

#[derive(Debug)]
pub struct SeriesResult {
    pub entities: usize,
    pub indicators: usize,
    pub identifiers: usize,
    pub output: PathBuf,
}

#[derive(Debug)]
pub struct BuildResult {
    pub state: String,
    pub entities: usize,
    pub series_ids: usize,
    pub sources: Vec<SourceSummary>,
    pub population_rows: usize,
    pub align: AlignStats,
    pub reconcile: ReconcileReport,
    pub merge: MergeStats,
    pub output_dir: PathBuf,
    /// Written files; empty on a dry run.
    pub outputs: Vec<PathBuf>,
    pub dry_run: bool,
}

impl BuildResult {
    pub fn has_historical_gaps(&self) -> bool {
        self.reconcile.has_historical_gaps()
    }
}
