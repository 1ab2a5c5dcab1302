//! Wide table normalization.
//!
//! Every wide source (the indicator export and the three population tables)
//! goes through [`normalize_wide`], driven only by its [`SourceSpec`]: trim
//! noise rows, label columns, drop artifact columns, and key each row. The
//! population tables are then combined with [`join_wide`] before the unpivot.

mod unpivot;

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, warn};

use labor_ingest::{RawGrid, is_blank_row, normalize_cell, normalize_label};
use labor_model::{ColumnLayout, SourceSpec};

use crate::error::{Result, TransformError};

pub use unpivot::{pivot_long, unpivot};

/// One entity row of a wide table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WideRow {
    pub key: String,
    /// Raw cell text, one per period in [`WideTable::periods`] order.
    pub cells: Vec<String>,
}

/// A trimmed, labelled wide table: one row per entity, one column per period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WideTable {
    pub source: String,
    pub key_column: String,
    pub periods: Vec<String>,
    pub rows: Vec<WideRow>,
}

impl WideTable {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

fn is_artifact_label(label: &str) -> bool {
    label.is_empty() || label.starts_with("Unnamed")
}

/// Index one past the last non-blank cell in any of `rows`.
fn content_width(rows: &[Vec<String>]) -> usize {
    rows.iter()
        .filter_map(|row| row.iter().rposition(|cell| !cell.trim().is_empty()))
        .map(|idx| idx + 1)
        .max()
        .unwrap_or(0)
}

/// Trim and label a raw grid according to `spec`.
///
/// Fails with a structural mismatch when nothing is left after trimming, when
/// the grid width disagrees with an explicit layout, when the key column is
/// missing, or when a period label repeats. Keys must be unique.
pub fn normalize_wide(grid: &RawGrid, spec: &SourceSpec) -> Result<WideTable> {
    let trim = &spec.trim;
    let head = trim.head_rows();
    if grid.height() < head + trim.trailing_rows {
        return Err(TransformError::structural(
            &spec.name,
            format!(
                "{} rows cannot hold {} head rows and {} trailing rows",
                grid.height(),
                head,
                trim.trailing_rows
            ),
        ));
    }
    let body = &grid.rows[head..grid.height() - trim.trailing_rows];
    if body.iter().all(|row| is_blank_row(row)) {
        return Err(TransformError::structural(
            &spec.name,
            "no data rows left after trimming",
        ));
    }

    let labels: Vec<String> = match &spec.layout {
        ColumnLayout::Header => {
            if !trim.header_row {
                return Err(TransformError::structural(
                    &spec.name,
                    "header layout requires a header row",
                ));
            }
            grid.rows[trim.leading_rows]
                .iter()
                .map(String::as_str)
                .map(normalize_label)
                .collect()
        }
        ColumnLayout::Explicit { columns } => {
            let labels: Vec<String> = columns
                .iter()
                .map(String::as_str)
                .map(normalize_label)
                .collect();
            let extent = content_width(body);
            if extent > labels.len() {
                return Err(TransformError::structural(
                    &spec.name,
                    format!("data spans {extent} columns but layout names {}", labels.len()),
                ));
            }
            let required = labels
                .iter()
                .rposition(|label| !is_artifact_label(label))
                .map_or(0, |idx| idx + 1);
            if grid.width() < required {
                return Err(TransformError::structural(
                    &spec.name,
                    format!("grid has {} columns, layout requires {required}", grid.width()),
                ));
            }
            labels
        }
    };

    let key_column = normalize_label(&spec.key_column);
    let key_idx = labels
        .iter()
        .position(|label| *label == key_column)
        .ok_or_else(|| {
            TransformError::structural(&spec.name, format!("key column '{key_column}' not found"))
        })?;

    let mut seen = BTreeSet::new();
    let mut period_indices = Vec::new();
    let mut periods = Vec::new();
    for (idx, label) in labels.iter().enumerate() {
        if idx == key_idx || is_artifact_label(label) {
            continue;
        }
        if !seen.insert(label.as_str()) {
            return Err(TransformError::structural(
                &spec.name,
                format!("duplicate column label '{label}'"),
            ));
        }
        period_indices.push(idx);
        periods.push(label.clone());
    }
    if periods.is_empty() {
        return Err(TransformError::structural(&spec.name, "no period columns"));
    }

    let cell = |row: &[String], idx: usize| {
        row.get(idx)
            .map(String::as_str)
            .map(normalize_cell)
            .unwrap_or_default()
    };
    let mut keys = BTreeSet::new();
    let mut rows = Vec::with_capacity(body.len());
    for (offset, row) in body.iter().enumerate() {
        if is_blank_row(row) {
            continue;
        }
        let mut key = cell(row, key_idx);
        if key.is_empty() {
            warn!(
                source = %spec.name,
                row = head + offset + 1,
                "skipping row without an entity key"
            );
            continue;
        }
        if let Some(suffix) = &spec.key_suffix {
            key.push_str(suffix);
        }
        if !keys.insert(key.clone()) {
            return Err(TransformError::DuplicateKey {
                source_name: spec.name.clone(),
                key,
            });
        }
        let cells = period_indices.iter().map(|idx| cell(row, *idx)).collect();
        rows.push(WideRow { key, cells });
    }

    debug!(
        source = %spec.name,
        head_rows = head,
        trailing_rows = trim.trailing_rows,
        artifact_columns = labels.len() - periods.len() - 1,
        periods = periods.len(),
        rows = rows.len(),
        "wide table trimmed"
    );

    Ok(WideTable {
        source: spec.name.clone(),
        key_column,
        periods,
        rows,
    })
}

/// Inner-join wide tables horizontally on their entity key.
///
/// Rows keep the first table's order and key column. A period label present in
/// more than one table is fatal. Entities missing from any table are dropped
/// with a warning.
pub fn join_wide(name: &str, tables: &[WideTable]) -> Result<WideTable> {
    let Some((first, rest)) = tables.split_first() else {
        return Err(TransformError::structural(name, "no tables to join"));
    };

    let mut owners: BTreeMap<&str, &str> = BTreeMap::new();
    let mut periods = Vec::new();
    for table in tables {
        for period in &table.periods {
            if let Some(owner) = owners.insert(period.as_str(), table.source.as_str()) {
                return Err(TransformError::OverlappingPeriod {
                    period: period.clone(),
                    first: owner.to_string(),
                    second: table.source.clone(),
                });
            }
            periods.push(period.clone());
        }
    }

    let lookups: Vec<BTreeMap<&str, &WideRow>> = rest
        .iter()
        .map(|table| table.rows.iter().map(|row| (row.key.as_str(), row)).collect())
        .collect();

    let mut rows = Vec::with_capacity(first.rows.len());
    for row in &first.rows {
        let matches: Vec<Option<&&WideRow>> = lookups
            .iter()
            .map(|lookup| lookup.get(row.key.as_str()))
            .collect();
        if let Some(missing) = matches.iter().position(Option::is_none) {
            warn!(
                key = %row.key,
                missing_from = %rest[missing].source,
                "dropping entity not present in every table"
            );
            continue;
        }
        let mut cells = row.cells.clone();
        for other in matches.into_iter().flatten() {
            cells.extend(other.cells.iter().cloned());
        }
        rows.push(WideRow {
            key: row.key.clone(),
            cells,
        });
    }

    let first_keys: BTreeSet<&str> = first.rows.iter().map(|row| row.key.as_str()).collect();
    for table in rest {
        for row in &table.rows {
            if !first_keys.contains(row.key.as_str()) {
                warn!(
                    key = %row.key,
                    source = %table.source,
                    missing_from = %first.source,
                    "dropping entity not present in every table"
                );
            }
        }
    }

    debug!(
        source = name,
        tables = tables.len(),
        periods = periods.len(),
        rows = rows.len(),
        "wide tables joined"
    );

    Ok(WideTable {
        source: name.to_string(),
        key_column: first.key_column.clone(),
        periods,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use labor_model::TrimSpec;

    fn grid(rows: &[&[&str]]) -> RawGrid {
        RawGrid::from_rows(
            rows.iter()
                .map(|row| row.iter().map(|cell| (*cell).to_string()).collect())
                .collect(),
        )
    }

    fn table(source: &str, periods: &[&str], rows: &[(&str, &[&str])]) -> WideTable {
        WideTable {
            source: source.to_string(),
            key_column: "Geographic Area".to_string(),
            periods: periods.iter().map(|p| (*p).to_string()).collect(),
            rows: rows
                .iter()
                .map(|(key, cells)| WideRow {
                    key: (*key).to_string(),
                    cells: cells.iter().map(|c| (*c).to_string()).collect(),
                })
                .collect(),
        }
    }

    #[test]
    fn header_layout_drops_noise_and_artifacts() {
        let raw = grid(&[
            &["Labor Force Data", "", ""],
            &["Series ID", "Jan\n2015", "Unnamed: 2"],
            &["LAUCN390010000000003", "5.1", "x"],
            &["", "", ""],
            &["Source: BLS", "", ""],
        ]);
        let spec = SourceSpec::new("indicators", "lau.xlsx", ColumnLayout::Header, "Series ID")
            .with_trim(TrimSpec::new(1, 1));
        let table = normalize_wide(&raw, &spec).expect("normalize");
        assert_eq!(table.periods, vec!["Jan\n2015"]);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].key, "LAUCN390010000000003");
        assert_eq!(table.rows[0].cells, vec!["5.1"]);
    }

    #[test]
    fn explicit_layout_skips_state_row_and_appends_suffix() {
        let raw = grid(&[
            &["title", "", "", ""],
            &["area", "", "2000", "2001"],
            &[".Ohio", "", "11,353,140", "11,387,404"],
            &[".Adams County", "", "27,330", "27,500"],
            &["footnote", "", "", ""],
        ]);
        let spec = SourceSpec::new(
            "population_2000s",
            "co-est00int-01-39.csv",
            ColumnLayout::explicit(["Geographic Area", "", "2000", "2001"]),
            "Geographic Area",
        )
        .with_trim(TrimSpec::new(1, 1).with_skip_data_rows(1))
        .with_key_suffix(", Ohio");
        let table = normalize_wide(&raw, &spec).expect("normalize");
        assert_eq!(table.periods, vec!["2000", "2001"]);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].key, ".Adams County, Ohio");
        assert_eq!(table.rows[0].cells, vec!["27,330", "27,500"]);
    }

    #[test]
    fn explicit_layout_rejects_wider_data() {
        let raw = grid(&[&["area", "2000", "2001"], &["Adams County", "1", "2"]]);
        let spec = SourceSpec::new(
            "population",
            "p.csv",
            ColumnLayout::explicit(["Geographic Area", "2000"]),
            "Geographic Area",
        );
        let error = normalize_wide(&raw, &spec).expect_err("too wide");
        assert!(matches!(error, TransformError::StructuralMismatch { .. }));
    }

    #[test]
    fn over_trimming_is_structural() {
        let raw = grid(&[&["Series ID", "Jan\n2015"], &["x", "1"]]);
        let spec = SourceSpec::new("indicators", "lau.csv", ColumnLayout::Header, "Series ID")
            .with_trim(TrimSpec::new(1, 1));
        let error = normalize_wide(&raw, &spec).expect_err("over trimmed");
        assert!(matches!(error, TransformError::StructuralMismatch { .. }));
    }

    #[test]
    fn missing_key_column_is_structural() {
        let raw = grid(&[&["Area", "2010"], &["Adams County", "1"]]);
        let spec = SourceSpec::new("population", "p.csv", ColumnLayout::Header, "Geographic Area");
        let error = normalize_wide(&raw, &spec).expect_err("no key");
        assert!(
            matches!(error, TransformError::StructuralMismatch { reason, .. } if reason.contains("Geographic Area"))
        );
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let raw = grid(&[
            &["Geographic Area", "2010"],
            &["Adams County", "1"],
            &["Adams County", "2"],
        ]);
        let spec = SourceSpec::new("population", "p.csv", ColumnLayout::Header, "Geographic Area");
        let error = normalize_wide(&raw, &spec).expect_err("duplicate");
        assert!(matches!(error, TransformError::DuplicateKey { key, .. } if key == "Adams County"));
    }

    #[test]
    fn join_concatenates_periods_and_drops_partial_entities() {
        let early = table(
            "2000s",
            &["2000"],
            &[("Adams County, Ohio", &["1"]), ("Allen County, Ohio", &["2"])],
        );
        let late = table("2010s", &["2010"], &[("Adams County, Ohio", &["3"])]);
        let joined = join_wide("population", &[early, late]).expect("join");
        assert_eq!(joined.periods, vec!["2000", "2010"]);
        assert_eq!(joined.rows.len(), 1);
        assert_eq!(joined.rows[0].cells, vec!["1", "3"]);
    }

    #[test]
    fn join_rejects_overlapping_periods() {
        let a = table("a", &["2010"], &[("X", &["1"])]);
        let b = table("b", &["2010"], &[("X", &["2"])]);
        let error = join_wide("population", &[a, b]).expect_err("overlap");
        assert!(matches!(
            error,
            TransformError::OverlappingPeriod { period, first, second }
                if period == "2010" && first == "a" && second == "b"
        ));
    }
}
