//! Format dispatch for wide source files.

use std::path::{Path, PathBuf};

use tracing::info;

use labor_model::SourceSpec;

use crate::delimited::read_delimited_grid;
use crate::error::{IngestError, Result};
use crate::grid::RawGrid;
use crate::spreadsheet::read_spreadsheet_grid;

/// Physical format of a source file, decided from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Delimited,
    Spreadsheet,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" | "txt" | "tsv" => Some(Self::Delimited),
            "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => Some(Self::Spreadsheet),
            _ => None,
        }
    }
}

/// Resolve `path` against `base_dir` unless it is already absolute.
pub fn resolve_path(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

/// Read the raw grid for one source spec.
pub fn read_source_grid(spec: &SourceSpec, base_dir: &Path) -> Result<RawGrid> {
    let path = resolve_path(base_dir, &spec.path);
    let format = SourceFormat::from_path(&path)
        .ok_or_else(|| IngestError::UnsupportedFormat { path: path.clone() })?;
    let grid = match format {
        SourceFormat::Delimited => {
            let delimiter = match (spec.delimiter, path.extension().and_then(|e| e.to_str())) {
                (Some(delimiter), _) => delimiter,
                (None, Some(ext)) if ext.eq_ignore_ascii_case("tsv") => '\t',
                (None, _) => ',',
            };
            let delimiter = u8::try_from(delimiter).map_err(|_| IngestError::UnsupportedFormat {
                path: path.clone(),
            })?;
            read_delimited_grid(&path, delimiter)?
        }
        SourceFormat::Spreadsheet => read_spreadsheet_grid(&path, spec.sheet.as_deref())?,
    };
    info!(
        source = %spec.name,
        path = %path.display(),
        rows = grid.height(),
        columns = grid.width(),
        "source loaded"
    );
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_from_extension() {
        assert_eq!(
            SourceFormat::from_path(Path::new("co-est00int-01-39.csv")),
            Some(SourceFormat::Delimited)
        );
        assert_eq!(
            SourceFormat::from_path(Path::new("co-est2024-pop-39.XLSX")),
            Some(SourceFormat::Spreadsheet)
        );
        assert_eq!(SourceFormat::from_path(Path::new("notes.pdf")), None);
        assert_eq!(SourceFormat::from_path(Path::new("no_extension")), None);
    }

    #[test]
    fn relative_paths_resolve_against_base() {
        let base = Path::new("/data");
        assert_eq!(
            resolve_path(base, Path::new("population/a.csv")),
            PathBuf::from("/data/population/a.csv")
        );
        assert_eq!(
            resolve_path(base, Path::new("/abs/a.csv")),
            PathBuf::from("/abs/a.csv")
        );
    }
}
