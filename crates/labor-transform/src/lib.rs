//! Transformation stages for the county labor series pipeline.
//!
//! - **series**: identifier builder (entities x indicators)
//! - **wide**: trim, label and join wide tables, then unpivot them to long form
//! - **align**: split period labels and slice identifiers into the long schemas
//! - **reconcile**: composite keys bridging county codes and area names
//! - **merge**: final left join to population and row-level exclusion
//!
//! Stages exchange [`LongFrame`]s, Polars DataFrames tagged with their source.

pub mod align;
pub mod data_utils;
mod error;
pub mod frame;
pub mod merge;
pub mod reconcile;
pub mod series;
pub mod wide;

// === Error Types ===
pub use error::{Result, TransformError};

// === Stages ===
pub use align::{AlignStats, align_indicators, align_population, split_period, year_gaps};
pub use frame::LongFrame;
pub use merge::{MergeStats, merge};
pub use reconcile::{
    PopulationIndex, ReconcileReport, composite_key, normalize_entity_name, reconcile,
};
pub use series::build_series_ids;
pub use wide::{WideRow, WideTable, join_wide, normalize_wide, pivot_long, unpivot};
