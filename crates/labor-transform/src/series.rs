//! Series identifier builder.

use std::collections::BTreeSet;

use tracing::info;

use labor_model::{EntityCode, Indicator, SeriesId};

use crate::error::{Result, TransformError};

/// Build one identifier per (entity, indicator) pair.
///
/// Output is grouped in indicator blocks, each listing every entity in table
/// order. Fails on any code that does not pad to its fixed width, when the
/// entity count differs from `expected_entities`, or when the distinct
/// identifiers do not number exactly `entities x indicators`.
pub fn build_series_ids(
    entities: &[EntityCode],
    indicators: &[Indicator],
    prefix: &str,
    expected_entities: Option<usize>,
) -> Result<Vec<SeriesId>> {
    if let Some(expected) = expected_entities
        && expected != entities.len()
    {
        return Err(TransformError::EntityCount {
            expected,
            actual: entities.len(),
        });
    }

    let mut ids = Vec::with_capacity(entities.len() * indicators.len());
    for indicator in indicators {
        for entity in entities {
            ids.push(SeriesId::compose(prefix, entity, *indicator)?);
        }
    }

    let distinct: BTreeSet<&SeriesId> = ids.iter().collect();
    if distinct.len() != entities.len() * indicators.len() {
        return Err(TransformError::IdentifierCount {
            actual: distinct.len(),
            entities: entities.len(),
            indicators: indicators.len(),
        });
    }

    info!(
        entities = entities.len(),
        indicators = indicators.len(),
        identifiers = ids.len(),
        "series identifiers built"
    );
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use labor_model::{DEFAULT_SERIES_PREFIX, ModelError};

    fn entity(county: &str) -> EntityCode {
        EntityCode::new("OH", "39", county, format!("County {county}")).expect("entity")
    }

    #[test]
    fn two_counties_one_indicator() {
        let ids = build_series_ids(
            &[entity("001"), entity("003")],
            &[Indicator::UnemploymentRate],
            DEFAULT_SERIES_PREFIX,
            None,
        )
        .expect("ids");
        let ids: Vec<&str> = ids.iter().map(SeriesId::as_str).collect();
        assert_eq!(ids, vec!["LAUCN390010000000003", "LAUCN390030000000003"]);
    }

    #[test]
    fn blocks_follow_indicator_order() {
        let ids = build_series_ids(
            &[entity("1"), entity("3")],
            &Indicator::ALL,
            DEFAULT_SERIES_PREFIX,
            Some(2),
        )
        .expect("ids");
        assert_eq!(ids.len(), 8);
        let indicators: Vec<Indicator> = ids
            .iter()
            .map(|id| id.indicator().expect("indicator"))
            .collect();
        assert_eq!(&indicators[..2], &[Indicator::ALL[0], Indicator::ALL[0]]);
        assert_eq!(&indicators[6..], &[Indicator::ALL[3], Indicator::ALL[3]]);
        assert_eq!(ids[1].county_code(), "003");
    }

    #[test]
    fn duplicate_entity_violates_count() {
        let error = build_series_ids(
            &[entity("001"), entity("001")],
            &Indicator::ALL,
            DEFAULT_SERIES_PREFIX,
            None,
        )
        .expect_err("duplicate");
        assert!(matches!(
            error,
            TransformError::IdentifierCount {
                actual: 4,
                entities: 2,
                indicators: 4
            }
        ));
    }

    #[test]
    fn wide_county_code_fails() {
        let bad = EntityCode {
            state: "OH".to_string(),
            state_code: "39".to_string(),
            county_code: "1001".to_string(),
            county_name: "Too Wide".to_string(),
        };
        let error = build_series_ids(&[bad], &Indicator::ALL, DEFAULT_SERIES_PREFIX, None)
            .expect_err("wide code");
        assert!(matches!(
            error,
            TransformError::Model(ModelError::InvalidCountyCode(code)) if code == "1001"
        ));
    }

    #[test]
    fn unexpected_entity_count_fails() {
        let error = build_series_ids(
            &[entity("001")],
            &Indicator::ALL,
            DEFAULT_SERIES_PREFIX,
            Some(88),
        )
        .expect_err("count");
        assert!(matches!(
            error,
            TransformError::EntityCount {
                expected: 88,
                actual: 1
            }
        ));
    }
}
