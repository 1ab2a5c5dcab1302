//! Final left join of reconciled indicator rows to population.

use tracing::info;

use labor_model::columns::{
    COUNTYFP, COUNTYNAME, INDICATOR, JOIN_KEY, MONTH, SERIES_ID, STATE, STATEFP, VALUE, YEAR,
};
use labor_model::{Indicator, MergedRecord, Month, SeriesId};

use crate::data_utils::{float_values, string_values};
use crate::error::Result;
use crate::frame::LongFrame;
use crate::reconcile::PopulationIndex;

/// Row counts from the merge. Each excluded row is counted once, under the
/// first reason that applies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub input_rows: usize,
    pub missing_population: usize,
    pub missing_value: usize,
    pub missing_county: usize,
    pub invalid_date: usize,
    pub output_rows: usize,
}

impl MergeStats {
    pub fn excluded(&self) -> usize {
        self.missing_population + self.missing_value + self.missing_county + self.invalid_date
    }
}

/// Join reconciled rows to population on the composite key.
///
/// Only fully resolved rows survive: population, value and county name present
/// and a date derivable from month and year.
pub fn merge(
    reconciled: &LongFrame,
    population: &PopulationIndex,
    prefix: &str,
) -> Result<(Vec<MergedRecord>, MergeStats)> {
    let data = &reconciled.data;
    let series_ids = string_values(data, SERIES_ID)?;
    let states = string_values(data, STATE)?;
    let state_codes = string_values(data, STATEFP)?;
    let county_names = string_values(data, COUNTYNAME)?;
    let county_codes = string_values(data, COUNTYFP)?;
    let months = string_values(data, MONTH)?;
    let years = string_values(data, YEAR)?;
    let indicators = string_values(data, INDICATOR)?;
    let values = float_values(data, VALUE)?;
    let keys = string_values(data, JOIN_KEY)?;

    let mut stats = MergeStats {
        input_rows: series_ids.len(),
        ..MergeStats::default()
    };
    let mut records = Vec::with_capacity(series_ids.len());

    for idx in 0..series_ids.len() {
        let Some(population) = population.get(&keys[idx]) else {
            stats.missing_population += 1;
            continue;
        };
        let Some(value) = values[idx] else {
            stats.missing_value += 1;
            continue;
        };
        if county_names[idx].is_empty() {
            stats.missing_county += 1;
            continue;
        }
        let month = months[idx].parse::<Month>().ok();
        let year = years[idx].parse::<i32>().ok();
        let (Some(month), Some(year)) = (month, year) else {
            stats.invalid_date += 1;
            continue;
        };
        let Some(date) = MergedRecord::period_date(year, month) else {
            stats.invalid_date += 1;
            continue;
        };
        let series_id = SeriesId::parse(series_ids[idx].as_str(), prefix)?;
        let indicator = indicators[idx].parse::<Indicator>()?;
        records.push(MergedRecord {
            series_id,
            state: states[idx].clone(),
            state_code: state_codes[idx].clone(),
            county_name: county_names[idx].clone(),
            county_code: county_codes[idx].clone(),
            month,
            year,
            date,
            indicator,
            value,
            population,
        });
    }
    stats.output_rows = records.len();

    info!(
        input = stats.input_rows,
        missing_population = stats.missing_population,
        missing_value = stats.missing_value,
        missing_county = stats.missing_county,
        invalid_date = stats.invalid_date,
        output = stats.output_rows,
        "rows merged"
    );
    Ok((records, stats))
}

#[cfg(test)]
mod tests {
    use polars::prelude::DataFrame;

    use labor_model::columns::{GEOGRAPHIC_AREA, POPULATION};

    use super::*;
    use crate::data_utils::{float_column, string_column};

    const ADAMS_2015: &str = "Adams County, OH2015";

    struct Row {
        name: &'static str,
        month: &'static str,
        year: &'static str,
        value: Option<f64>,
        key: &'static str,
    }

    fn resolved() -> Row {
        Row {
            name: "Adams County",
            month: "Jan",
            year: "2015",
            value: Some(5.2),
            key: ADAMS_2015,
        }
    }

    fn reconciled(rows: &[Row]) -> LongFrame {
        let n = rows.len();
        let text = |f: fn(&Row) -> &'static str| -> Vec<String> {
            rows.iter().map(|row| f(row).to_string()).collect()
        };
        let data = DataFrame::new(vec![
            string_column(SERIES_ID, vec!["LAUCN390010000000003".to_string(); n]),
            string_column(STATE, vec!["OH".to_string(); n]),
            string_column(STATEFP, vec!["39".to_string(); n]),
            string_column(COUNTYNAME, text(|row| row.name)),
            string_column(COUNTYFP, vec!["001".to_string(); n]),
            string_column(MONTH, text(|row| row.month)),
            string_column(YEAR, text(|row| row.year)),
            string_column(INDICATOR, vec!["Unemployment Rate".to_string(); n]),
            float_column(VALUE, rows.iter().map(|row| row.value).collect()),
            string_column(JOIN_KEY, text(|row| row.key)),
        ])
        .expect("frame");
        LongFrame::new("indicators", data)
    }

    fn population() -> PopulationIndex {
        let data = DataFrame::new(vec![
            string_column(GEOGRAPHIC_AREA, vec![".Adams County, Ohio".to_string()]),
            string_column(YEAR, vec!["2015".to_string()]),
            float_column(POPULATION, vec![Some(27905.0)]),
        ])
        .expect("frame");
        PopulationIndex::build(&LongFrame::new("population", data), "OH").expect("index")
    }

    #[test]
    fn each_exclusion_reason_is_counted_once() {
        let frame = reconciled(&[
            resolved(),
            Row {
                key: "Nowhere County, OH2015",
                ..resolved()
            },
            Row {
                value: None,
                ..resolved()
            },
            Row {
                name: "",
                ..resolved()
            },
            Row {
                month: "Annual",
                ..resolved()
            },
            Row {
                year: "20x5",
                ..resolved()
            },
        ]);
        let (records, stats) = merge(&frame, &population(), "LAUCN").expect("merge");
        assert_eq!(
            stats,
            MergeStats {
                input_rows: 6,
                missing_population: 1,
                missing_value: 1,
                missing_county: 1,
                invalid_date: 2,
                output_rows: 1,
            }
        );
        assert_eq!(stats.excluded() + stats.output_rows, stats.input_rows);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].month, Month::Jan);
        assert_eq!(records[0].date.to_string(), "2015-01-01");
        assert_eq!(records[0].population, 27905.0);
    }

    #[test]
    fn missing_population_takes_precedence() {
        // An unmatched row with no value is counted once, as missing population.
        let frame = reconciled(&[Row {
            key: "",
            value: None,
            name: "",
            ..resolved()
        }]);
        let (records, stats) = merge(&frame, &population(), "LAUCN").expect("merge");
        assert!(records.is_empty());
        assert_eq!(stats.missing_population, 1);
        assert_eq!(stats.excluded(), 1);
    }
}
