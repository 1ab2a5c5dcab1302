//! Delimited text readers.

use std::path::Path;

use csv::ReaderBuilder;

use crate::error::{IngestError, Result, io_error};
use crate::grid::{RawGrid, normalize_cell};

/// Read a delimited text file into a raw grid.
///
/// No header handling happens here: the first record is row 0. Records may
/// have different lengths; the grid is padded to the widest one. Bytes that
/// are not valid UTF-8 are replaced rather than rejected, since census
/// extracts are occasionally Latin-1 encoded.
pub fn read_delimited_grid(path: &Path, delimiter: u8) -> Result<RawGrid> {
    let file = std::fs::File::open(path).map_err(|error| io_error(path, error))?;
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(file);
    let mut rows = Vec::new();
    for record in reader.byte_records() {
        let record = record.map_err(|source| IngestError::CsvParse {
            path: path.to_path_buf(),
            source,
        })?;
        let row: Vec<String> = record
            .iter()
            .map(|field| normalize_cell(&String::from_utf8_lossy(field)))
            .collect();
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
    use std::io::Write;

    #[test]
    fn reads_ragged_rows_without_headers() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "title\nA,B,C\n1,\" 2,000 \",3\n").expect("write");
        let grid = read_delimited_grid(file.path(), b',').expect("read grid");
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.rows[0], vec!["title", "", ""]);
        assert_eq!(grid.rows[2], vec!["1", "2,000", "3"]);
    }

    #[test]
    fn empty_file_is_an_error() {
        let file = tempfile::NamedTempFile::new().expect("temp file");
        let error = read_delimited_grid(file.path(), b',').expect_err("empty");
        assert!(matches!(error, IngestError::EmptySource { .. }));
    }

    #[test]
    fn missing_file_is_reported() {
        let error = read_delimited_grid(Path::new("/nonexistent/grid.csv"), b',')
            .expect_err("missing");
        assert!(matches!(error, IngestError::FileNotFound { .. }));
    }
}
