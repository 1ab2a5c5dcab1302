//! Key reconciliation between indicator rows and population rows.
//!
//! Indicator rows are keyed by county code, population rows by free-text
//! area name. Both sides are brought to the same composite key
//! `<entity name>, <STATE><year>` through [`composite_key`], the only place
//! where name formatting differences are handled.

use std::collections::{BTreeMap, BTreeSet};

use polars::prelude::DataFrame;
use tracing::{info, warn};

use labor_model::EntityCode;
use labor_model::columns::{
    COUNTYFP, COUNTYNAME, GEOGRAPHIC_AREA, INDICATOR, JOIN_KEY, MONTH, POPULATION, SERIES_ID,
    STATE, STATEFP, VALUE, YEAR,
};

use crate::data_utils::{float_column, float_values, string_column, string_values};
use crate::error::{Result, TransformError};
use crate::frame::LongFrame;

/// Normalize an entity name for key comparison.
///
/// Keeps the first comma-delimited segment, deletes periods and collapses
/// whitespace: `".Adams County, Ohio"` becomes `"Adams County"`.
pub fn normalize_entity_name(raw: &str) -> String {
    let first = raw.split(',').next().unwrap_or_default();
    first
        .replace('.', "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Composite join key, e.g. `Adams County, OH2015`.
pub fn composite_key(name: &str, state: &str, year: &str) -> String {
    format!("{}, {}{}", normalize_entity_name(name), state.trim(), year.trim())
}

/// Population values by composite key.
#[derive(Debug, Clone, Default)]
pub struct PopulationIndex {
    pub source: String,
    values: BTreeMap<String, Option<f64>>,
}

impl PopulationIndex {
    /// Index an aligned population frame. Two rows collapsing to the same key
    /// is fatal.
    pub fn build(population: &LongFrame, state: &str) -> Result<Self> {
        let areas = string_values(&population.data, GEOGRAPHIC_AREA)?;
        let years = string_values(&population.data, YEAR)?;
        let values = float_values(&population.data, POPULATION)?;

        let mut index = BTreeMap::new();
        for ((area, year), value) in areas.iter().zip(&years).zip(values) {
            let key = composite_key(area, state, year);
            if index.insert(key.clone(), value).is_some() {
                return Err(TransformError::DuplicateKey {
                    source_name: population.source.clone(),
                    key,
                });
            }
        }
        Ok(Self {
            source: population.source.clone(),
            values: index,
        })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Population for a key, `None` when the key is absent or the value missing.
    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Outcome of reconciling indicator rows against the population index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub rows: usize,
    pub matched_rows: usize,
    pub unmatched_rows: usize,
    /// Rows whose county code is not in the entity table.
    pub missing_entity_rows: usize,
    /// Unmatched rows in years before the latest indicator year.
    pub historical_unmatched_rows: usize,
    pub historical_unmatched_keys: Vec<String>,
    /// County codes with no entity row in a historical year.
    pub historical_missing_counties: Vec<String>,
    pub latest_year: Option<i32>,
}

impl ReconcileReport {
    pub fn has_historical_gaps(&self) -> bool {
        self.historical_unmatched_rows > 0
    }
}

/// Rows before the latest year, or with a year that does not parse, are
/// historical.
fn is_historical(year: &str, latest_year: Option<i32>) -> bool {
    match (year.parse::<i32>(), latest_year) {
        (Ok(year), Some(latest)) => year < latest,
        _ => true,
    }
}

/// Attach entity fields and the composite key to aligned indicator rows.
///
/// Rows for a county missing from the entity table keep empty entity fields
/// and an empty key. Unmatched rows in the latest indicator year are
/// expected; in earlier years they are warned about and counted, whether the
/// county is missing from the entity table or the key from the population.
pub fn reconcile(
    indicators: &LongFrame,
    entities: &[EntityCode],
    population: &PopulationIndex,
) -> Result<(LongFrame, ReconcileReport)> {
    let mut by_county: BTreeMap<&str, &EntityCode> = BTreeMap::new();
    for entity in entities {
        if by_county
            .insert(entity.county_code.as_str(), entity)
            .is_some()
        {
            return Err(TransformError::DuplicateKey {
                source_name: "entity codes".to_string(),
                key: entity.county_code.clone(),
            });
        }
    }

    if population.is_empty() {
        warn!(source = %population.source, "population index is empty");
    }

    let data = &indicators.data;
    let county_codes = string_values(data, COUNTYFP)?;
    let years = string_values(data, YEAR)?;
    let latest_year = years.iter().filter_map(|year| year.parse::<i32>().ok()).max();

    let mut report = ReconcileReport {
        rows: county_codes.len(),
        latest_year,
        ..ReconcileReport::default()
    };
    let mut historical_keys = BTreeSet::new();
    let mut historical_counties = BTreeSet::new();
    let mut states = Vec::with_capacity(report.rows);
    let mut state_codes = Vec::with_capacity(report.rows);
    let mut county_names = Vec::with_capacity(report.rows);
    let mut keys = Vec::with_capacity(report.rows);

    for (county_code, year) in county_codes.iter().zip(&years) {
        let Some(entity) = by_county.get(county_code.as_str()) else {
            report.missing_entity_rows += 1;
            report.unmatched_rows += 1;
            if is_historical(year, latest_year) {
                report.historical_unmatched_rows += 1;
                if historical_counties.insert(county_code.clone()) {
                    warn!(
                        county_code = %county_code,
                        "no entity for county code in historical period"
                    );
                }
            }
            states.push(String::new());
            state_codes.push(String::new());
            county_names.push(String::new());
            keys.push(String::new());
            continue;
        };
        let key = composite_key(&entity.county_name, &entity.state, year);
        if population.contains(&key) {
            report.matched_rows += 1;
        } else {
            report.unmatched_rows += 1;
            if is_historical(year, latest_year) {
                report.historical_unmatched_rows += 1;
                if historical_keys.insert(key.clone()) {
                    warn!(key = %key, "no population for historical period");
                }
            }
        }
        states.push(entity.state.clone());
        state_codes.push(entity.state_code.clone());
        county_names.push(entity.county_name.clone());
        keys.push(key);
    }
    report.historical_unmatched_keys = historical_keys.into_iter().collect();
    report.historical_missing_counties = historical_counties.into_iter().collect();

    let out = DataFrame::new(vec![
        string_column(SERIES_ID, string_values(data, SERIES_ID)?),
        string_column(STATE, states),
        string_column(STATEFP, state_codes),
        string_column(COUNTYNAME, county_names),
        string_column(COUNTYFP, county_codes),
        string_column(MONTH, string_values(data, MONTH)?),
        string_column(YEAR, years),
        string_column(INDICATOR, string_values(data, INDICATOR)?),
        float_column(VALUE, float_values(data, VALUE)?),
        string_column(JOIN_KEY, keys),
    ])?;

    info!(
        rows = report.rows,
        matched = report.matched_rows,
        unmatched = report.unmatched_rows,
        historical_unmatched = report.historical_unmatched_rows,
        missing_entities = report.missing_entity_rows,
        latest_year = ?report.latest_year,
        "keys reconciled"
    );
    Ok((LongFrame::new(indicators.source.clone(), out), report))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_suffix_and_periods() {
        assert_eq!(normalize_entity_name(".Adams County, Ohio"), "Adams County");
        assert_eq!(normalize_entity_name("Adams County."), "Adams County");
        assert_eq!(normalize_entity_name("  Van  Wert County "), "Van Wert County");
        assert_eq!(normalize_entity_name("St. Marys"), "St Marys");
    }

    #[test]
    fn composite_key_is_identical_across_sources() {
        let from_codes = composite_key("Adams County", "OH", "2015");
        let from_census = composite_key(".Adams County, Ohio", "OH", "2015");
        assert_eq!(from_codes, "Adams County, OH2015");
        assert_eq!(from_codes, from_census);
        assert_ne!(from_codes, composite_key("Adams County", "OH", "2016"));
    }

    fn indicator_frame(rows: &[(&str, &str)]) -> LongFrame {
        let n = rows.len();
        let data = DataFrame::new(vec![
            string_column(
                SERIES_ID,
                rows.iter()
                    .map(|(county, _)| format!("LAUCN39{county}0000000003"))
                    .collect(),
            ),
            string_column(
                COUNTYFP,
                rows.iter().map(|(county, _)| (*county).to_string()).collect(),
            ),
            string_column(MONTH, vec!["Jan".to_string(); n]),
            string_column(YEAR, rows.iter().map(|(_, year)| (*year).to_string()).collect()),
            string_column(INDICATOR, vec!["Unemployment Rate".to_string(); n]),
            float_column(VALUE, vec![Some(5.0); n]),
        ])
        .expect("frame");
        LongFrame::new("indicators", data)
    }

    fn population_index(rows: &[(&str, &str)]) -> PopulationIndex {
        let data = DataFrame::new(vec![
            string_column(
                GEOGRAPHIC_AREA,
                rows.iter().map(|(area, _)| (*area).to_string()).collect(),
            ),
            string_column(YEAR, rows.iter().map(|(_, year)| (*year).to_string()).collect()),
            float_column(POPULATION, vec![Some(100.0); rows.len()]),
        ])
        .expect("frame");
        PopulationIndex::build(&LongFrame::new("population", data), "OH").expect("index")
    }

    #[test]
    fn missing_entity_in_historical_year_is_counted() {
        let indicators = indicator_frame(&[
            ("001", "2015"),
            ("003", "2015"),
            ("001", "2016"),
            ("003", "2016"),
        ]);
        let entities = vec![EntityCode::new("OH", "39", "1", "Adams County").expect("adams")];
        let population = population_index(&[
            ("Adams County, Ohio", "2015"),
            ("Adams County, Ohio", "2016"),
        ]);

        let (reconciled, report) = reconcile(&indicators, &entities, &population).expect("reconcile");
        assert_eq!(report.matched_rows, 2);
        assert_eq!(report.missing_entity_rows, 2);
        assert_eq!(report.unmatched_rows, 2);
        // Only the 2015 row is historical; 2016 is the latest year.
        assert_eq!(report.historical_unmatched_rows, 1);
        assert_eq!(report.historical_missing_counties, vec!["003".to_string()]);
        assert!(report.historical_unmatched_keys.is_empty());
        assert!(report.has_historical_gaps());

        let names = string_values(&reconciled.data, COUNTYNAME).expect("names");
        assert_eq!(names, vec!["Adams County", "", "Adams County", ""]);
    }

    #[test]
    fn missing_entity_in_latest_year_is_silent() {
        let indicators = indicator_frame(&[("001", "2016"), ("003", "2016")]);
        let entities = vec![EntityCode::new("OH", "39", "1", "Adams County").expect("adams")];
        let population = population_index(&[("Adams County, Ohio", "2016")]);

        let (_, report) = reconcile(&indicators, &entities, &population).expect("reconcile");
        assert_eq!(report.missing_entity_rows, 1);
        assert!(!report.has_historical_gaps());
        assert!(report.historical_missing_counties.is_empty());
    }

    #[test]
    fn duplicate_population_keys_are_fatal() {
        let data = DataFrame::new(vec![
            string_column(
                GEOGRAPHIC_AREA,
                vec!["Adams County, Ohio".to_string(), ".Adams County".to_string()],
            ),
            string_column(YEAR, vec!["2010".to_string(), "2010".to_string()]),
            float_column(POPULATION, vec![Some(1.0), Some(2.0)]),
        ])
        .expect("frame");
        let error = PopulationIndex::build(&LongFrame::new("population", data), "OH")
            .expect_err("duplicate");
        assert!(
            matches!(error, TransformError::DuplicateKey { key, .. } if key == "Adams County, OH2010")
        );
    }
}
