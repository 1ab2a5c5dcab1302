//! Schema alignment of the unpivoted tables.
//!
//! Indicator rows get their packed period label split into month and year,
//! and their county code and indicator name sliced out of the series
//! identifier. Population rows are renamed into the population schema.

use std::collections::BTreeSet;

use polars::prelude::DataFrame;
use tracing::{info, warn};

use labor_model::SeriesId;
use labor_model::columns::{
    COUNTYFP, GEOGRAPHIC_AREA, INDICATOR, MONTH, PERIOD, POPULATION, SERIES_ID, VALUE, YEAR,
};

use crate::data_utils::{float_column, float_values, string_column, string_values};
use crate::error::{Result, TransformError};
use crate::frame::LongFrame;

/// Row counts from aligning the indicator table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlignStats {
    pub input_rows: usize,
    /// Rows without a reported value (typically the in-progress year).
    pub missing_values: usize,
    /// Rows whose key is not a valid series identifier for a known indicator.
    pub invalid_series_rows: usize,
    pub output_rows: usize,
}

/// Split a two-line period label (`"Jan\n2015"`) into month and year text.
pub fn split_period(label: &str) -> Option<(&str, &str)> {
    let (month, year) = label.split_once('\n')?;
    let month = month.trim();
    let year = year.trim();
    if month.is_empty() || year.is_empty() {
        return None;
    }
    Some((month, year))
}

/// Align the unpivoted indicator export to
/// `{Series ID, COUNTYFP, Month, Year, Indicator, Value}`.
///
/// Rows with a missing value are dropped. Rows whose series identifier does
/// not validate are skipped with one warning per identifier. A period label
/// that does not split is fatal.
pub fn align_indicators(
    long: &LongFrame,
    key_column: &str,
    prefix: &str,
) -> Result<(LongFrame, AlignStats)> {
    let keys = string_values(&long.data, key_column)?;
    let periods = string_values(&long.data, PERIOD)?;
    let values = float_values(&long.data, VALUE)?;

    let mut stats = AlignStats {
        input_rows: keys.len(),
        ..AlignStats::default()
    };
    let mut rejected: BTreeSet<String> = BTreeSet::new();
    let mut series_ids = Vec::new();
    let mut county_codes = Vec::new();
    let mut months = Vec::new();
    let mut years = Vec::new();
    let mut indicators = Vec::new();
    let mut out_values = Vec::new();

    for ((key, period), value) in keys.into_iter().zip(periods).zip(values) {
        let (month, year) = split_period(&period)
            .ok_or_else(|| TransformError::InvalidPeriodLabel {
                label: period.clone(),
            })?;
        let parsed = SeriesId::parse(key.as_str(), prefix)
            .and_then(|id| id.indicator().map(|indicator| (id, indicator)));
        let (id, indicator) = match parsed {
            Ok(parsed) => parsed,
            Err(error) => {
                if rejected.insert(key.clone()) {
                    warn!(source = %long.source, key = %key, %error, "skipping unrecognized series");
                }
                stats.invalid_series_rows += 1;
                continue;
            }
        };
        let Some(value) = value else {
            stats.missing_values += 1;
            continue;
        };
        county_codes.push(id.county_code().to_string());
        series_ids.push(id.as_str().to_string());
        months.push(month.to_string());
        years.push(year.to_string());
        indicators.push(indicator.as_str().to_string());
        out_values.push(Some(value));
    }
    stats.output_rows = series_ids.len();

    let data = DataFrame::new(vec![
        string_column(SERIES_ID, series_ids),
        string_column(COUNTYFP, county_codes),
        string_column(MONTH, months),
        string_column(YEAR, years),
        string_column(INDICATOR, indicators),
        float_column(VALUE, out_values),
    ])?;
    info!(
        source = %long.source,
        input = stats.input_rows,
        missing_values = stats.missing_values,
        invalid_series = stats.invalid_series_rows,
        output = stats.output_rows,
        "indicator rows aligned"
    );
    Ok((LongFrame::new(long.source.clone(), data), stats))
}

/// Years missing inside the covered range, ascending.
pub fn year_gaps<'a>(years: impl IntoIterator<Item = &'a str>) -> Vec<i32> {
    let years: BTreeSet<i32> = years
        .into_iter()
        .filter_map(|year| year.trim().parse().ok())
        .collect();
    let (Some(first), Some(last)) = (years.first(), years.last()) else {
        return Vec::new();
    };
    (*first..=*last).filter(|year| !years.contains(year)).collect()
}

/// Align the unpivoted population table to `{Geographic Area, Year, Population}`.
///
/// Missing populations stay null; the merge drops them. Gaps in year coverage
/// are logged.
pub fn align_population(long: &LongFrame, key_column: &str) -> Result<LongFrame> {
    let areas = string_values(&long.data, key_column)?;
    let years = string_values(&long.data, PERIOD)?;
    let populations = float_values(&long.data, VALUE)?;

    let gaps = year_gaps(years.iter().map(String::as_str));
    if !gaps.is_empty() {
        warn!(source = %long.source, missing_years = ?gaps, "population years are not contiguous");
    }

    let data = DataFrame::new(vec![
        string_column(GEOGRAPHIC_AREA, areas),
        string_column(YEAR, years),
        float_column(POPULATION, populations),
    ])?;
    info!(source = %long.source, rows = data.height(), "population rows aligned");
    Ok(LongFrame::new(long.source.clone(), data))
}
