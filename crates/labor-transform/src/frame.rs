//! Long-format frame passed between stages.
//!
//! [`LongFrame`] wraps a Polars DataFrame with the name of the source it was
//! reshaped from, so stage logs and summaries can report provenance.

use polars::prelude::DataFrame;

/// A long table produced by one pipeline stage.
#[derive(Debug, Clone)]
pub struct LongFrame {
    /// Source or stage name (e.g. "indicators", "population").
    pub source: String,
    /// The rows as a Polars DataFrame.
    pub data: DataFrame,
}

impl LongFrame {
    pub fn new(source: impl Into<String>, data: DataFrame) -> Self {
        Self {
            source: source.into(),
            data,
        }
    }

    /// Returns the number of rows in the frame.
    pub fn record_count(&self) -> usize {
        self.data.height()
    }
}
