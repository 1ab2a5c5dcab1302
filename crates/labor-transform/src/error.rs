//! Error types for the transformation stages.

use thiserror::Error;

use labor_model::ModelError;

/// Errors raised while building identifiers, reshaping, or reconciling.
///
/// Every variant is fatal for the run. Row-level problems (unparseable values,
/// unmatched keys, bad dates) are counted in stage statistics instead.
#[derive(Debug, Error)]
pub enum TransformError {
    /// Trimmed grid does not have the shape its spec describes.
    #[error("structural mismatch in {source_name}: {reason}")]
    StructuralMismatch { source_name: String, reason: String },

    /// Generated identifier count differs from entities x indicators.
    #[error("identifier count {actual} does not match {entities} entities x {indicators} indicators")]
    IdentifierCount {
        actual: usize,
        entities: usize,
        indicators: usize,
    },

    /// Entity table size differs from the configured expectation.
    #[error("entity table has {actual} entities, expected {expected}")]
    EntityCount { expected: usize, actual: usize },

    /// Entity or identifier failed model validation.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// The same key appears twice where keys must be unique.
    #[error("duplicate key '{key}' in {source_name}")]
    DuplicateKey { source_name: String, key: String },

    /// A period column appears in more than one joined table.
    #[error("period '{period}' appears in both {first} and {second}")]
    OverlappingPeriod {
        period: String,
        first: String,
        second: String,
    },

    /// Period label does not pack month and year on separate lines.
    #[error("period label '{label}' does not split into month and year")]
    InvalidPeriodLabel { label: String },

    /// Required column missing from a long table.
    #[error("column '{column}' not found")]
    MissingColumn { column: String },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl TransformError {
    pub(crate) fn structural(source_name: &str, reason: impl Into<String>) -> Self {
        Self::StructuralMismatch {
            source_name: source_name.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<polars::prelude::PolarsError> for TransformError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for transformation stages.
pub type Result<T> = std::result::Result<T, TransformError>;
