//! Entity code table loading.
//!
//! The census county code list is pipe-delimited with a header row:
//! `STATE|STATEFP|COUNTYFP|COUNTYNS|COUNTYNAME|CLASSFP|FUNCSTAT`. Only the
//! state and county identification columns are used.

use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use serde::Deserialize;
use tracing::debug;

use labor_model::EntityCode;

use crate::error::{IngestError, Result, io_error};

/// Default delimiter of the county code list.
pub const ENTITY_CODE_DELIMITER: u8 = b'|';

#[derive(Debug, Deserialize)]
struct EntityCodeRow {
    #[serde(rename = "STATE")]
    state: String,
    #[serde(rename = "STATEFP")]
    state_code: String,
    #[serde(rename = "COUNTYFP")]
    county_code: String,
    #[serde(rename = "COUNTYNAME")]
    county_name: String,
}

/// Load the entity code table, zero-padding state and county codes.
///
/// Fails on the first row whose codes cannot be padded to their fixed width.
pub fn load_entity_codes(path: &Path, delimiter: u8) -> Result<Vec<EntityCode>> {
    let file = std::fs::File::open(path).map_err(|error| io_error(path, error))?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|source| IngestError::CsvParse {
            path: path.to_path_buf(),
            source,
        })?
        .clone();
    let mut record = StringRecord::new();
    let mut entities = Vec::new();
    loop {
        let more = reader
            .read_record(&mut record)
            .map_err(|source| IngestError::CsvParse {
                path: path.to_path_buf(),
                source,
            })?;
        if !more {
            break;
        }
        let row: EntityCodeRow =
            record
                .deserialize(Some(&headers))
                .map_err(|source| IngestError::CsvParse {
                    path: path.to_path_buf(),
                    source,
                })?;
        let line = record.position().map(csv::Position::line).unwrap_or(0);
        let entity = EntityCode::new(
            row.state,
            &row.state_code,
            &row.county_code,
            row.county_name,
        )
        .map_err(|source| IngestError::InvalidEntity {
            path: path.to_path_buf(),
            line,
            source,
        })?;
        entities.push(entity);
    }
    if entities.is_empty() {
        return Err(IngestError::EmptySource {
            path: path.to_path_buf(),
        });
    }
    debug!(path = %path.display(), entities = entities.len(), "loaded entity codes");
    Ok(entities)
}
