//! Untyped cell grids as read from source files.

/// A rectangular grid of text cells with no header interpretation.
///
/// Readers produce grids verbatim; trimming header and footer noise and
/// labelling columns is left to the reshape stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawGrid {
    pub rows: Vec<Vec<String>>,
}

impl RawGrid {
    /// Build a grid, padding short rows with empty cells to the widest row.
    pub fn from_rows(rows: Vec<Vec<String>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { rows }
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.rows.first().map(Vec::len).unwrap_or(0)
    }

    /// True when the grid has no rows or only zero-width rows.
    pub fn is_empty(&self) -> bool {
        self.width() == 0
    }
}

/// Trim a raw cell and drop a stray byte-order mark.
pub fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Normalize a header label.
///
/// Whitespace runs inside each line collapse to one space, but line breaks
/// survive: period labels pack month and year on separate lines.
pub fn normalize_label(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    let lines: Vec<String> = trimmed
        .lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect();
    lines.join("\n")
}

/// True when every cell in the row is blank.
pub fn is_blank_row(row: &[String]) -> bool {
    row.iter().all(|value| value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| (*value).to_string()).collect()
    }

    #[test]
    fn from_rows_pads_to_widest_row() {
        let grid = RawGrid::from_rows(vec![row(&["a"]), row(&["b", "c", "d"])]);
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.rows[0], row(&["a", "", ""]));
        assert_eq!(grid.rows[1][2], "d");
        assert!(!grid.is_empty());
        assert!(RawGrid::from_rows(vec![Vec::new(), Vec::new()]).is_empty());
    }

    #[test]
    fn normalize_label_keeps_line_breaks() {
        assert_eq!(normalize_label(" Jan\r\n2015 "), "Jan\n2015");
        assert_eq!(normalize_label("Geographic   Area"), "Geographic Area");
        assert_eq!(normalize_label("\u{feff}Series ID"), "Series ID");
    }

    #[test]
    fn blank_rows_are_detected() {
        assert!(is_blank_row(&row(&["", "  "])));
        assert!(!is_blank_row(&row(&["", "x"])));
    }
}
