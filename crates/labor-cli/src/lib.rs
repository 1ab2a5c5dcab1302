//! CLI library components for the county labor series pipeline.

pub mod config;
pub mod logging;
pub mod pipeline;
pub mod types;
