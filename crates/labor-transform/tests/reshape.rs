//! Tests for the wide-to-long reshape.

use proptest::prelude::*;

use labor_ingest::RawGrid;
use labor_model::columns::{PERIOD, VALUE};
use labor_model::{ColumnLayout, SourceSpec};
use labor_transform::data_utils::{float_values, string_values};
use labor_transform::{WideRow, WideTable, normalize_wide, pivot_long, unpivot};

fn grid(rows: &[&[&str]]) -> RawGrid {
    RawGrid::from_rows(
        rows.iter()
            .map(|row| row.iter().map(|cell| (*cell).to_string()).collect())
            .collect(),
    )
}

#[test]
fn population_row_unpivots_with_separators_stripped() {
    let raw = grid(&[
        &["Geographic Area", "2010", "2011"],
        &["Test County, Ohio", "1,234", "1,300"],
    ]);
    let spec = SourceSpec::new(
        "population_2010s",
        "co-est2020int-pop-39.xlsx",
        ColumnLayout::Header,
        "Geographic Area",
    );
    let table = normalize_wide(&raw, &spec).expect("normalize");
    let long = unpivot(&table).expect("unpivot");

    assert_eq!(long.record_count(), 2);
    assert_eq!(
        string_values(&long.data, "Geographic Area").expect("areas"),
        vec!["Test County, Ohio", "Test County, Ohio"]
    );
    assert_eq!(
        string_values(&long.data, PERIOD).expect("periods"),
        vec!["2010", "2011"]
    );
    assert_eq!(
        float_values(&long.data, VALUE).expect("values"),
        vec![Some(1234.0), Some(1300.0)]
    );
}

#[test]
fn unparseable_cells_stay_as_missing_rows() {
    let raw = grid(&[
        &["Geographic Area", "2010", "2011"],
        &["Test County, Ohio", "(X)", ""],
    ]);
    let spec = SourceSpec::new("population", "p.csv", ColumnLayout::Header, "Geographic Area");
    let long = unpivot(&normalize_wide(&raw, &spec).expect("normalize")).expect("unpivot");
    assert_eq!(
        float_values(&long.data, VALUE).expect("values"),
        vec![None, None]
    );
}

fn wide_table() -> impl Strategy<Value = WideTable> {
    (1usize..6, 1usize..8).prop_flat_map(|(entities, periods)| {
        proptest::collection::vec(
            proptest::collection::vec(proptest::option::of(0u32..5_000_000), periods),
            entities,
        )
        .prop_map(move |cells| WideTable {
            source: "population".to_string(),
            key_column: "Geographic Area".to_string(),
            periods: (0..periods).map(|idx| (2000 + idx).to_string()).collect(),
            rows: cells
                .into_iter()
                .enumerate()
                .map(|(idx, row)| WideRow {
                    key: format!("County {idx}, Ohio"),
                    cells: row
                        .into_iter()
                        .map(|cell| cell.map(|v| v.to_string()).unwrap_or_default())
                        .collect(),
                })
                .collect(),
        })
    })
}

proptest! {
    #[test]
    fn pivot_restores_unpivoted_table(table in wide_table()) {
        let long = unpivot(&table).expect("unpivot");
        prop_assert_eq!(long.record_count(), table.rows.len() * table.periods.len());
        let restored = pivot_long(&long, &table.key_column).expect("pivot");
        prop_assert_eq!(restored, table);
    }
}
