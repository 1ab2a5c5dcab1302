//! Spreadsheet readers (xlsx, xls, xlsb, ods).

use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use tracing::debug;

use crate::error::{IngestError, Result};
use crate::grid::{RawGrid, normalize_cell};

/// Render a workbook cell as text.
///
/// Numbers use the shortest round-trip form, so `1234.0` becomes `1234`.
pub fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => normalize_cell(s),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        other => normalize_cell(&other.to_string()),
    }
}

/// Read one worksheet into a raw grid.
///
/// Uses `sheet` when given, otherwise the first worksheet. The used range of
/// a sheet may not start at A1; leading empty rows and columns are restored
/// so row offsets match what a spreadsheet viewer shows.
pub fn read_spreadsheet_grid(path: &Path, sheet: Option<&str>) -> Result<RawGrid> {
    if !path.exists() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let mut workbook = open_workbook_auto(path).map_err(|error| IngestError::Spreadsheet {
        path: path.to_path_buf(),
        message: error.to_string(),
    })?;

    let sheet_names = workbook.sheet_names().to_vec();
    let sheet_name = match sheet {
        Some(name) => sheet_names
            .iter()
            .find(|candidate| candidate.as_str() == name)
            .cloned()
            .ok_or_else(|| IngestError::SheetNotFound {
                path: path.to_path_buf(),
                sheet: name.to_string(),
            })?,
        None => sheet_names
            .first()
            .cloned()
            .ok_or_else(|| IngestError::EmptySource {
                path: path.to_path_buf(),
            })?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|error| IngestError::Spreadsheet {
            path: path.to_path_buf(),
            message: error.to_string(),
        })?;
    let (row_offset, col_offset) = range
        .start()
        .map(|(row, col)| (row as usize, col as usize))
        .unwrap_or((0, 0));
    debug!(
        path = %path.display(),
        sheet = %sheet_name,
        rows = range.height(),
        columns = range.width(),
        row_offset,
        col_offset,
        "read worksheet"
    );

    let mut rows: Vec<Vec<String>> = vec![Vec::new(); row_offset];
    for sheet_row in range.rows() {
        let mut row = vec![String::new(); col_offset];
        row.extend(sheet_row.iter().map(cell_to_string));
        rows.push(row);
    }
    let grid = RawGrid::from_rows(rows);
    if grid.is_empty() {
        return Err(IngestError::EmptySource {
            path: path.to_path_buf(),
        });
    }
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_cells_render_without_trailing_zeros() {
        assert_eq!(cell_to_string(&Data::Float(1234.0)), "1234");
        assert_eq!(cell_to_string(&Data::Float(5.2)), "5.2");
        assert_eq!(cell_to_string(&Data::Int(42)), "42");
        assert_eq!(cell_to_string(&Data::Empty), "");
        assert_eq!(
            cell_to_string(&Data::String(" Jan\n2015 ".to_string())),
            "Jan\n2015"
        );
    }

    #[test]
    fn missing_workbook_is_reported() {
        let error = read_spreadsheet_grid(Path::new("/nonexistent/book.xlsx"), None)
            .expect_err("missing");
        assert!(matches!(error, IngestError::FileNotFound { .. }));
    }
}
