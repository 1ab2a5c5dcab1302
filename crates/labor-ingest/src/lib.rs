//! Source ingestion for the county labor series pipeline.
//!
//! This crate loads the entity code table and reads every wide source file
//! into an untyped [`RawGrid`]:
//!
//! - **Delimited text**: census extracts and code lists via `csv`
//! - **Spreadsheets**: statistics exports and population tables via `calamine`
//! - **Value helpers**: numeric coercion and Polars cell rendering
//!
//! No header interpretation happens here; trimming and labelling belong to
//! the reshape stage.

mod delimited;
mod entity_codes;
mod error;
mod grid;
pub mod polars_utils;
mod source;
mod spreadsheet;

// === Error Types ===
pub use error::{IngestError, Result};

// === Grids ===
pub use grid::{RawGrid, is_blank_row, normalize_cell, normalize_label};

// === Readers ===
pub use delimited::read_delimited_grid;
pub use entity_codes::{ENTITY_CODE_DELIMITER, load_entity_codes};
pub use source::{SourceFormat, read_source_grid, resolve_path};
pub use spreadsheet::{cell_to_string, read_spreadsheet_grid};

// === Value Helpers ===
pub use polars_utils::{any_to_f64, any_to_string, format_numeric, parse_numeric};
