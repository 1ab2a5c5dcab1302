//! Wide-to-long reshape and its inverse.

use std::collections::BTreeMap;

use polars::prelude::DataFrame;

use labor_ingest::{format_numeric, parse_numeric};
use labor_model::columns::{PERIOD, VALUE};

use super::{WideRow, WideTable};
use crate::data_utils::{float_column, float_values, string_column, string_values};
use crate::error::{Result, TransformError};
use crate::frame::LongFrame;

/// Unpivot a wide table into `{<key column>, Period, Value}` rows.
///
/// Rows come out period-major: every entity for the first period, then every
/// entity for the next. Cells that do not parse as numbers become nulls; no
/// row is dropped here.
pub fn unpivot(table: &WideTable) -> Result<LongFrame> {
    let capacity = table.rows.len() * table.periods.len();
    let mut keys = Vec::with_capacity(capacity);
    let mut periods = Vec::with_capacity(capacity);
    let mut values = Vec::with_capacity(capacity);

    for (idx, period) in table.periods.iter().enumerate() {
        for row in &table.rows {
            keys.push(row.key.clone());
            periods.push(period.clone());
            values.push(row.cells.get(idx).and_then(|cell| parse_numeric(cell)));
        }
    }

    let data = DataFrame::new(vec![
        string_column(&table.key_column, keys),
        string_column(PERIOD, periods),
        float_column(VALUE, values),
    ])?;
    Ok(LongFrame::new(table.source.clone(), data))
}

/// Pivot a long frame back to wide form.
///
/// Keys and periods keep their first-seen order. Values are rendered without
/// trailing zeros and nulls become empty cells.
pub fn pivot_long(long: &LongFrame, key_column: &str) -> Result<WideTable> {
    let keys = string_values(&long.data, key_column)?;
    let periods = string_values(&long.data, PERIOD)?;
    let values = float_values(&long.data, VALUE)?;

    let mut period_order: Vec<String> = Vec::new();
    let mut period_index: BTreeMap<String, usize> = BTreeMap::new();
    let mut key_order: Vec<String> = Vec::new();
    let mut cells: BTreeMap<String, BTreeMap<usize, String>> = BTreeMap::new();

    for ((key, period), value) in keys.into_iter().zip(periods).zip(values) {
        let next = period_index.len();
        let column = *period_index.entry(period.clone()).or_insert_with(|| {
            period_order.push(period);
            next
        });
        let row = cells.entry(key.clone()).or_insert_with(|| {
            key_order.push(key.clone());
            BTreeMap::new()
        });
        if row
            .insert(column, value.map(format_numeric).unwrap_or_default())
            .is_some()
        {
            return Err(TransformError::DuplicateKey {
                source_name: long.source.clone(),
                key: format!("{key} / {}", period_order[column]),
            });
        }
    }

    let rows = key_order
        .into_iter()
        .map(|key| {
            let mut row_cells = cells.remove(&key).unwrap_or_default();
            let cells = (0..period_order.len())
                .map(|idx| row_cells.remove(&idx).unwrap_or_default())
                .collect();
            WideRow { key, cells }
        })
        .collect();

    Ok(WideTable {
        source: long.source.clone(),
        key_column: key_column.to_string(),
        periods: period_order,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unpivot_is_period_major() {
        let table = WideTable {
            source: "population".to_string(),
            key_column: "Geographic Area".to_string(),
            periods: vec!["2010".to_string(), "2011".to_string()],
            rows: vec![
                WideRow {
                    key: "A".to_string(),
                    cells: vec!["1".to_string(), "2".to_string()],
                },
                WideRow {
                    key: "B".to_string(),
                    cells: vec!["(X)".to_string(), "4".to_string()],
                },
            ],
        };
        let long = unpivot(&table).expect("unpivot");
        assert_eq!(long.record_count(), 4);
        assert_eq!(
            string_values(&long.data, "Geographic Area").expect("keys"),
            vec!["A", "B", "A", "B"]
        );
        assert_eq!(
            float_values(&long.data, VALUE).expect("values"),
            vec![Some(1.0), None, Some(2.0), Some(4.0)]
        );

        let wide = pivot_long(&long, "Geographic Area").expect("pivot");
        assert_eq!(wide.rows[1].cells, vec!["", "4"]);
    }
}
