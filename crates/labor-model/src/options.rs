//! Declarative descriptions of the wide source tables.
//!
//! Every wide source goes through the same reshape; what differs between them
//! is captured here: how many noise rows surround the data, how columns are
//! labelled, and which column holds the entity key.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

/// Rows to discard around the data body of a raw grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrimSpec {
    /// Title and note rows before the header row.
    #[serde(default)]
    pub leading_rows: usize,
    /// Whether a header row follows the leading rows.
    #[serde(default = "default_true")]
    pub header_row: bool,
    /// Aggregate rows directly after the header (e.g. the state total).
    #[serde(default)]
    pub skip_data_rows: usize,
    /// Footnote rows at the end of the grid.
    #[serde(default)]
    pub trailing_rows: usize,
}

impl Default for TrimSpec {
    fn default() -> Self {
        Self {
            leading_rows: 0,
            header_row: true,
            skip_data_rows: 0,
            trailing_rows: 0,
        }
    }
}

impl TrimSpec {
    pub fn new(leading_rows: usize, trailing_rows: usize) -> Self {
        Self {
            leading_rows,
            trailing_rows,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_skip_data_rows(mut self, rows: usize) -> Self {
        self.skip_data_rows = rows;
        self
    }

    #[must_use]
    pub fn without_header(mut self) -> Self {
        self.header_row = false;
        self
    }

    /// Rows removed before the first data row.
    pub fn head_rows(&self) -> usize {
        self.leading_rows + usize::from(self.header_row) + self.skip_data_rows
    }
}

/// How the columns of a trimmed grid get their labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnLayout {
    /// Labels come from the header row. Blank and `Unnamed: n` cells are artifacts.
    Header,
    /// One label per column position. A blank label marks an artifact column.
    Explicit { columns: Vec<String> },
}

impl ColumnLayout {
    pub fn explicit<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Explicit {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }
}

/// A single wide source table and the recipe to reshape it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceSpec {
    /// Short name used in logs and summaries.
    pub name: String,
    pub path: PathBuf,
    /// Field delimiter for text sources. Defaults to `,`.
    #[serde(default)]
    pub delimiter: Option<char>,
    /// Worksheet for spreadsheet sources. Defaults to the first sheet.
    #[serde(default)]
    pub sheet: Option<String>,
    /// Label of the entity column after layout is applied.
    pub key_column: String,
    /// Text appended to every key (used when one table omits the state name).
    #[serde(default)]
    pub key_suffix: Option<String>,
    #[serde(default)]
    pub trim: TrimSpec,
    pub layout: ColumnLayout,
}

impl SourceSpec {
    pub fn new(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        layout: ColumnLayout,
        key_column: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            delimiter: None,
            sheet: None,
            trim: TrimSpec::default(),
            layout,
            key_column: key_column.into(),
            key_suffix: None,
        }
    }

    #[must_use]
    pub fn with_trim(mut self, trim: TrimSpec) -> Self {
        self.trim = trim;
        self
    }

    #[must_use]
    pub fn with_key_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.key_suffix = Some(suffix.into());
        self
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    /// Expected grid width for explicit layouts, artifact columns included.
    pub fn explicit_width(&self) -> Option<usize> {
        match &self.layout {
            ColumnLayout::Header => None,
            ColumnLayout::Explicit { columns } => Some(columns.len()),
        }
    }
}
