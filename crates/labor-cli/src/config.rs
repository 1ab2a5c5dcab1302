//! Pipeline configuration.
//!
//! A run is described by a [`PipelineConfig`]: where the entity code table
//! lives, the state it covers, and one [`SourceSpec`] per wide source. The
//! built-in [`PipelineConfig::ohio`] reproduces the published Ohio layouts;
//! any of it can be replaced by a TOML file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use labor_ingest::ENTITY_CODE_DELIMITER;
use labor_model::{ColumnLayout, DEFAULT_SERIES_PREFIX, SourceSpec, TrimSpec};

/// Entity column label shared by the population tables.
pub const POPULATION_KEY_COLUMN: &str = "Geographic Area";

/// Series column label of the indicator export.
pub const INDICATOR_KEY_COLUMN: &str = "Series ID";

fn default_prefix() -> String {
    DEFAULT_SERIES_PREFIX.to_string()
}

fn default_entity_delimiter() -> char {
    char::from(ENTITY_CODE_DELIMITER)
}

/// The state every entity belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StateConfig {
    /// Postal abbreviation used in composite keys (e.g. "OH").
    pub abbrev: String,
    /// Full name as the population tables spell it (e.g. "Ohio").
    pub name: String,
}

/// Output file names inside the output directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct OutputNames {
    pub merged: String,
    pub series_list: String,
    pub manifest: String,
}

impl Default for OutputNames {
    fn default() -> Self {
        Self {
            merged: "OH_M_BLS_series.csv".to_string(),
            series_list: "bls_series.txt".to_string(),
            manifest: "manifest.json".to_string(),
        }
    }
}

/// Everything a `build` run needs to know about its inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    #[serde(default = "default_prefix")]
    pub series_prefix: String,
    /// Entity count the code table must have, when known.
    #[serde(default)]
    pub expected_entities: Option<usize>,
    pub entity_codes: PathBuf,
    #[serde(default = "default_entity_delimiter")]
    pub entity_delimiter: char,
    pub state: StateConfig,
    pub indicators: SourceSpec,
    /// Population tables, joined on their key before the reshape.
    pub population: Vec<SourceSpec>,
    #[serde(default)]
    pub output: OutputNames,
}

fn year_columns(first: u16, last: u16) -> impl Iterator<Item = String> {
    (first..=last).map(|year| year.to_string())
}

fn population_layout(years: (u16, u16), trailing_artifacts: usize) -> ColumnLayout {
    let mut columns = vec![POPULATION_KEY_COLUMN.to_string(), String::new()];
    columns.extend(year_columns(years.0, years.1));
    columns.extend(std::iter::repeat_n(String::new(), trailing_artifacts));
    ColumnLayout::Explicit { columns }
}

impl PipelineConfig {
    /// Layouts of the published Ohio files.
    ///
    /// Each census table has three title rows, a header, and the state total
    /// as its first data row; the 2000-2009 table omits the state name from
    /// its area labels.
    pub fn ohio() -> Self {
        let population_trim = |trailing| TrimSpec::new(3, trailing).with_skip_data_rows(1);
        Self {
            state: StateConfig {
                abbrev: "OH".to_string(),
                name: "Ohio".to_string(),
            },
            series_prefix: default_prefix(),
            expected_entities: Some(88),
            entity_codes: PathBuf::from("st39_oh_cou2020.txt"),
            entity_delimiter: default_entity_delimiter(),
            indicators: SourceSpec::new(
                "indicators",
                "SeriesReport.xlsx",
                ColumnLayout::Header,
                INDICATOR_KEY_COLUMN,
            )
            .with_trim(TrimSpec::new(3, 0)),
            population: vec![
                SourceSpec::new(
                    "population_2000s",
                    "population/co-est00int-01-39.csv",
                    population_layout((2000, 2009), 2),
                    POPULATION_KEY_COLUMN,
                )
                .with_trim(population_trim(8))
                .with_key_suffix(", Ohio"),
                SourceSpec::new(
                    "population_2010s",
                    "population/co-est2020int-pop-39.xlsx",
                    population_layout((2010, 2019), 1),
                    POPULATION_KEY_COLUMN,
                )
                .with_trim(population_trim(6)),
                SourceSpec::new(
                    "population_2020s",
                    "population/co-est2024-pop-39.xlsx",
                    population_layout((2020, 2024), 0),
                    POPULATION_KEY_COLUMN,
                )
                .with_trim(population_trim(6)),
            ],
            output: OutputNames::default(),
        }
    }

    /// Parse a TOML configuration.
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).context("parse pipeline config")?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text =
            fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("load {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.state.abbrev.trim().is_empty() {
            bail!("state abbreviation is empty");
        }
        if self.series_prefix.trim().is_empty() {
            bail!("series prefix is empty");
        }
        if !self.entity_delimiter.is_ascii() {
            bail!("entity delimiter '{}' is not ASCII", self.entity_delimiter);
        }
        if self.population.is_empty() {
            bail!("no population tables configured");
        }
        Ok(())
    }

    /// Entity table delimiter as a byte.
    pub fn entity_delimiter_byte(&self) -> Result<u8> {
        u8::try_from(self.entity_delimiter)
            .with_context(|| format!("entity delimiter '{}' is not ASCII", self.entity_delimiter))
    }

    /// Every configured source, indicators first.
    pub fn sources(&self) -> impl Iterator<Item = &SourceSpec> {
        std::iter::once(&self.indicators).chain(self.population.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ohio_layout_widths() {
        let config = PipelineConfig::ohio();
        let widths: Vec<Option<usize>> = config
            .population
            .iter()
            .map(SourceSpec::explicit_width)
            .collect();
        assert_eq!(widths, vec![Some(14), Some(13), Some(7)]);
        assert_eq!(config.population[0].trim.head_rows(), 5);
        assert_eq!(config.population[0].trim.trailing_rows, 8);
        assert_eq!(config.indicators.trim.head_rows(), 4);
        assert_eq!(config.sources().count(), 4);
        config.validate().expect("valid");
    }

    #[test]
    fn ohio_defaults_round_trip_through_toml() {
        let config = PipelineConfig::ohio();
        let text = toml::to_string(&config).expect("serialize");
        let parsed = PipelineConfig::from_toml(&text).expect("parse");
        assert_eq!(parsed, config);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = PipelineConfig::from_toml(
            r#"
            entity_codes = "codes.txt"

            [state]
            abbrev = "OH"
            name = "Ohio"

            [indicators]
            name = "indicators"
            path = "lau.csv"
            key_column = "Series ID"
            layout = { kind = "header" }

            [[population]]
            name = "population"
            path = "pop.csv"
            key_column = "Geographic Area"
            layout = { kind = "header" }
            "#,
        )
        .expect("config");
        assert_eq!(config.series_prefix, DEFAULT_SERIES_PREFIX);
        assert_eq!(config.entity_delimiter, '|');
        assert_eq!(config.expected_entities, None);
        assert_eq!(config.output, OutputNames::default());
    }

    #[test]
    fn empty_population_list_is_rejected() {
        let error = PipelineConfig::from_toml(
            r#"
            entity_codes = "codes.txt"
            population = []

            [state]
            abbrev = "OH"
            name = "Ohio"

            [indicators]
            name = "indicators"
            path = "lau.csv"
            key_column = "Series ID"
            layout = { kind = "header" }
            "#,
        )
        .expect_err("no population");
        assert!(error.to_string().contains("population"));
    }
}
