use chrono::NaiveDate;

use crate::enums::{Indicator, Month};
use crate::ids::SeriesId;

/// One fully resolved output row: an indicator value for a county and month,
/// joined to the county's population for that year.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedRecord {
    pub series_id: SeriesId,
    pub state: String,
    pub state_code: String,
    pub county_name: String,
    pub county_code: String,
    pub month: Month,
    pub year: i32,
    /// First day of `month` in `year`.
    pub date: NaiveDate,
    pub indicator: Indicator,
    pub value: f64,
    pub population: f64,
}

impl MergedRecord {
    /// Derive the calendar date for a year and month.
    pub fn period_date(year: i32, month: Month) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, month.number(), 1)
    }
}
