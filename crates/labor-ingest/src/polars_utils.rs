//! Polars AnyValue utility functions.
//!
//! Helpers for reading long-table cells back out of DataFrames and for the
//! numeric coercion applied to raw source cells.

use polars::prelude::AnyValue;

/// Converts a Polars AnyValue to a String representation.
/// Returns empty string for Null, formats floats without trailing zeros.
pub fn any_to_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        other => other.to_string(),
    }
}

/// Converts an AnyValue to f64, returning None for non-numeric or null values.
pub fn any_to_f64(value: AnyValue<'_>) -> Option<f64> {
    match value {
        AnyValue::Null => None,
        AnyValue::Int32(v) => Some(f64::from(v)),
        AnyValue::Int64(v) => Some(v as f64),
        AnyValue::UInt32(v) => Some(f64::from(v)),
        AnyValue::UInt64(v) => Some(v as f64),
        AnyValue::Float32(v) => Some(f64::from(v)),
        AnyValue::Float64(v) => Some(v),
        AnyValue::String(s) => parse_numeric(s),
        AnyValue::StringOwned(s) => parse_numeric(&s),
        _ => None,
    }
}

/// Formats a floating-point number as a string without trailing zeros.
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

/// Parses a source cell as f64.
///
/// Thousands separators and whitespace are stripped first. Anything that still
/// fails to parse, including empty cells and footnote markers, is `None`; a
/// failed parse never becomes zero.
pub fn parse_numeric(value: &str) -> Option<f64> {
    let cleaned: String = value
        .chars()
        .filter(|ch| *ch != ',' && !ch.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_numeric_strips_separators_and_whitespace() {
        assert_eq!(parse_numeric("1,234"), Some(1234.0));
        assert_eq!(parse_numeric(" 12 345 "), Some(12345.0));
        assert_eq!(parse_numeric("5.2"), Some(5.2));
        assert_eq!(parse_numeric("-"), None);
        assert_eq!(parse_numeric("(P)"), None);
        assert_eq!(parse_numeric(""), None);
        assert_eq!(parse_numeric("NaN"), None);
    }

    #[test]
    fn format_numeric_drops_trailing_zeros() {
        assert_eq!(format_numeric(1234.0), "1234");
        assert_eq!(format_numeric(5.20), "5.2");
        assert_eq!(format_numeric(100.0), "100");
        assert_eq!(format_numeric(0.5), "0.5");
    }

    #[test]
    fn any_to_string_handles_nulls_and_floats() {
        assert_eq!(any_to_string(AnyValue::Null), "");
        assert_eq!(any_to_string(AnyValue::Float64(7.0)), "7");
        assert_eq!(any_to_string(AnyValue::String("Jan")), "Jan");
        assert_eq!(any_to_f64(AnyValue::String("2,000")), Some(2000.0));
    }
}
