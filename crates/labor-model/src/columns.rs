//! Column names shared by the long tables and the final output.

pub const SERIES_ID: &str = "Series ID";
pub const STATE: &str = "STATE";
pub const STATEFP: &str = "STATEFP";
pub const COUNTYNAME: &str = "COUNTYNAME";
pub const COUNTYFP: &str = "COUNTYFP";
pub const MONTH: &str = "Month";
pub const YEAR: &str = "Year";
pub const DATE: &str = "Date";
pub const INDICATOR: &str = "Indicator";
pub const VALUE: &str = "Value";
pub const POPULATION: &str = "Population";

/// Period label column produced by the reshape, before alignment.
pub const PERIOD: &str = "Period";

/// Entity column of the population tables.
pub const GEOGRAPHIC_AREA: &str = "Geographic Area";

/// Composite reconciliation key.
pub const JOIN_KEY: &str = "Join Key";

/// Final output schema, in order.
pub const OUTPUT_COLUMNS: [&str; 11] = [
    SERIES_ID, STATE, STATEFP, COUNTYNAME, COUNTYFP, MONTH, YEAR, DATE, INDICATOR, VALUE,
    POPULATION,
];
