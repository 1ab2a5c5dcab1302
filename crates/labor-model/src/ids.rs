#![deny(unsafe_code)]

use std::fmt;

use crate::enums::{INDICATOR_SUFFIX_LEN, Indicator};
use crate::{ModelError, Result};

/// Series prefix for county-level local area unemployment statistics.
pub const DEFAULT_SERIES_PREFIX: &str = "LAUCN";

/// Width of a zero-padded state code.
pub const STATE_CODE_WIDTH: usize = 2;

/// Width of a zero-padded county code.
pub const COUNTY_CODE_WIDTH: usize = 3;

/// Zero-pad a numeric code to `width` digits.
///
/// Codes wider than `width` are rejected rather than truncated, and so is
/// anything that is not made of ASCII digits.
pub fn pad_code(raw: &str, width: usize) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|ch| ch.is_ascii_digit()) {
        return None;
    }
    if trimmed.len() > width {
        return None;
    }
    Some(format!("{trimmed:0>width$}"))
}

/// One row of the entity code table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub struct EntityCode {
    /// State postal abbreviation (e.g. "OH").
    pub state: String,
    /// Two-digit state code.
    pub state_code: String,
    /// Three-digit county code.
    pub county_code: String,
    /// County display name (e.g. "Adams County").
    pub county_name: String,
}

impl EntityCode {
    /// Build an entity from raw table cells, zero-padding both codes.
    pub fn new(
        state: impl Into<String>,
        state_code: &str,
        county_code: &str,
        county_name: impl Into<String>,
    ) -> Result<Self> {
        let state_code = pad_code(state_code, STATE_CODE_WIDTH)
            .ok_or_else(|| ModelError::InvalidStateCode(state_code.to_string()))?;
        let county_code = pad_code(county_code, COUNTY_CODE_WIDTH)
            .ok_or_else(|| ModelError::InvalidCountyCode(county_code.to_string()))?;
        Ok(Self {
            state: state.into().trim().to_string(),
            state_code,
            county_code,
            county_name: county_name.into().trim().to_string(),
        })
    }
}

/// Fixed-width series identifier:
/// `<prefix><2-digit state><3-digit county><10-digit indicator suffix>`.
///
/// Only [`SeriesId::parse`] and [`SeriesId::compose`] construct one, so the
/// code slices below always fall inside the string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SeriesId(String);

impl SeriesId {
    /// Compose the identifier for one entity and indicator.
    pub fn compose(prefix: &str, entity: &EntityCode, indicator: Indicator) -> Result<Self> {
        let state_code = pad_code(&entity.state_code, STATE_CODE_WIDTH)
            .ok_or_else(|| ModelError::InvalidStateCode(entity.state_code.clone()))?;
        let county_code = pad_code(&entity.county_code, COUNTY_CODE_WIDTH)
            .ok_or_else(|| ModelError::InvalidCountyCode(entity.county_code.clone()))?;
        Self::parse(
            format!("{prefix}{state_code}{county_code}{}", indicator.suffix()),
            prefix,
        )
    }

    /// Validate an existing identifier against `prefix`.
    pub fn parse(value: impl Into<String>, prefix: &str) -> Result<Self> {
        let value = value.into().trim().to_string();
        let invalid = |reason| ModelError::InvalidSeriesId {
            value: value.clone(),
            reason,
        };
        let Some(rest) = value.strip_prefix(prefix) else {
            return Err(invalid("missing series prefix"));
        };
        if rest.len() != STATE_CODE_WIDTH + COUNTY_CODE_WIDTH + INDICATOR_SUFFIX_LEN {
            return Err(invalid("unexpected length"));
        }
        if !rest.chars().all(|ch| ch.is_ascii_digit()) {
            return Err(invalid("non-digit code"));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn code_start(&self) -> usize {
        self.0.len() - (STATE_CODE_WIDTH + COUNTY_CODE_WIDTH + INDICATOR_SUFFIX_LEN)
    }

    /// The two-digit state code.
    pub fn state_code(&self) -> &str {
        let start = self.code_start();
        &self.0[start..start + STATE_CODE_WIDTH]
    }

    /// The three-digit county code, sliced at `[prefix + 2, prefix + 5)`.
    pub fn county_code(&self) -> &str {
        let start = self.code_start() + STATE_CODE_WIDTH;
        &self.0[start..start + COUNTY_CODE_WIDTH]
    }

    /// The ten-digit indicator suffix.
    pub fn suffix(&self) -> &str {
        &self.0[self.0.len() - INDICATOR_SUFFIX_LEN..]
    }

    pub fn indicator(&self) -> Result<Indicator> {
        Indicator::from_suffix(self.suffix())
    }
}

impl fmt::Display for SeriesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
