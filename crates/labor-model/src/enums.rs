//! Categorical values carried through the pipeline.
//!
//! Indicators and months are low-cardinality labels in the source files.
//! Modelling them as enums keeps output rendering stable and comparisons cheap.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ModelError;

/// Length of the indicator suffix that terminates every series identifier.
pub const INDICATOR_SUFFIX_LEN: usize = 10;

/// Local area unemployment statistics measure.
///
/// Each indicator owns a fixed 10-digit measure code that closes a county
/// series identifier (e.g. `LAUCN390330000000003` is the unemployment rate for
/// Crawford County, Ohio).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Indicator {
    UnemploymentRate,
    Unemployment,
    Employment,
    LaborForce,
}

impl Indicator {
    /// Identifier emission order: one block per indicator.
    pub const ALL: [Indicator; 4] = [
        Indicator::UnemploymentRate,
        Indicator::Employment,
        Indicator::Unemployment,
        Indicator::LaborForce,
    ];

    /// Returns the 10-digit measure code.
    pub fn suffix(&self) -> &'static str {
        match self {
            Indicator::UnemploymentRate => "0000000003",
            Indicator::Unemployment => "0000000004",
            Indicator::Employment => "0000000005",
            Indicator::LaborForce => "0000000006",
        }
    }

    /// Returns the display name written to the `Indicator` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Indicator::UnemploymentRate => "Unemployment Rate",
            Indicator::Unemployment => "Unemployment",
            Indicator::Employment => "Employment",
            Indicator::LaborForce => "Labor Force",
        }
    }

    /// Looks up an indicator from its 10-digit measure code.
    pub fn from_suffix(suffix: &str) -> Result<Self, ModelError> {
        Self::ALL
            .into_iter()
            .find(|indicator| indicator.suffix() == suffix)
            .ok_or_else(|| ModelError::UnknownIndicator(suffix.to_string()))
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Indicator {
    type Err = ModelError;

    /// Parse a display name (case-insensitive) into an `Indicator`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();

        match normalized.as_str() {
            "UNEMPLOYMENT RATE" => Ok(Indicator::UnemploymentRate),
            "UNEMPLOYMENT" => Ok(Indicator::Unemployment),
            "EMPLOYMENT" => Ok(Indicator::Employment),
            "LABOR FORCE" => Ok(Indicator::LaborForce),
            _ => Err(ModelError::UnknownIndicator(s.to_string())),
        }
    }
}

/// Calendar month as abbreviated in the export's period labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Month {
    Jan,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::Jan,
        Month::Feb,
        Month::Mar,
        Month::Apr,
        Month::May,
        Month::Jun,
        Month::Jul,
        Month::Aug,
        Month::Sep,
        Month::Oct,
        Month::Nov,
        Month::Dec,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Month::Jan => "Jan",
            Month::Feb => "Feb",
            Month::Mar => "Mar",
            Month::Apr => "Apr",
            Month::May => "May",
            Month::Jun => "Jun",
            Month::Jul => "Jul",
            Month::Aug => "Aug",
            Month::Sep => "Sep",
            Month::Oct => "Oct",
            Month::Nov => "Nov",
            Month::Dec => "Dec",
        }
    }

    /// Month number, 1 through 12.
    pub fn number(&self) -> u32 {
        match self {
            Month::Jan => 1,
            Month::Feb => 2,
            Month::Mar => 3,
            Month::Apr => 4,
            Month::May => 5,
            Month::Jun => 6,
            Month::Jul => 7,
            Month::Aug => 8,
            Month::Sep => 9,
            Month::Oct => 10,
            Month::Nov => 11,
            Month::Dec => 12,
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Month {
    type Err = ModelError;

    /// Accepts the three-letter abbreviation or the full month name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let prefix: String = trimmed.chars().take(3).collect();
        let month = Self::ALL
            .into_iter()
            .find(|month| month.as_str().eq_ignore_ascii_case(&prefix))
            .ok_or_else(|| ModelError::UnknownMonth(s.to_string()))?;
        let full = full_month_name(month);
        if trimmed.len() == 3 || trimmed.eq_ignore_ascii_case(full) {
            Ok(month)
        } else {
            Err(ModelError::UnknownMonth(s.to_string()))
        }
    }
}

fn full_month_name(month: Month) -> &'static str {
    match month {
        Month::Jan => "January",
        Month::Feb => "February",
        Month::Mar => "March",
        Month::Apr => "April",
        Month::May => "May",
        Month::Jun => "June",
        Month::Jul => "July",
        Month::Aug => "August",
        Month::Sep => "September",
        Month::Oct => "October",
        Month::Nov => "November",
        Month::Dec => "December",
    }
}
