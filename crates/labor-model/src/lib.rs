pub mod columns;
pub mod enums;
pub mod error;
pub mod ids;
pub mod options;
pub mod record;

pub use enums::{INDICATOR_SUFFIX_LEN, Indicator, Month};
pub use error::{ModelError, Result};
pub use ids::{
    COUNTY_CODE_WIDTH, DEFAULT_SERIES_PREFIX, EntityCode, STATE_CODE_WIDTH, SeriesId, pad_code,
};
pub use options::{ColumnLayout, SourceSpec, TrimSpec};
pub use record::MergedRecord;
