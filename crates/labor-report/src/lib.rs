//! Output writers for the county labor series pipeline.
//!
//! - **series_list**: identifier list handed to the external retrieval step
//! - **csv_output**: the final merged table
//! - **manifest**: JSON run summary
//!
//! Every file is written through a temporary sibling and renamed into place.
//! An [`OutputBatch`] stages several files and moves them in together, so a
//! failed run leaves none of them behind.

pub mod common;
pub mod csv_output;
pub mod manifest;
pub mod series_list;

pub use common::{OutputBatch, write_atomically};
pub use csv_output::{record_fields, render_merged_csv, stage_merged_csv, write_merged_csv};
pub use manifest::{ManifestSource, RunManifest, StageCounts, stage_manifest, write_manifest};
pub use series_list::{stage_series_list, write_series_list};
