//! Wire encoder: `GroupByQuery` -> JSON
//!
//! Encoding is a pure function of the query. All invariants were enforced
//! when the query was built, so no checks happen here.

use crate::config::EncoderConfig;
use crate::error::EncodeError;
use crate::model::GroupByQuery;
use serde_json::Value;
use tracing::trace;

/// Encode into a JSON value tree
pub fn to_value(query: &GroupByQuery) -> Result<Value, EncodeError> {
    Ok(serde_json::to_value(query)?)
}

/// Encode as compact JSON
pub fn to_string(query: &GroupByQuery) -> Result<String, EncodeError> {
    let json = serde_json::to_string(query)?;
    trace!("Encoded groupBy query on {} ({} bytes)", query.data_source(), json.len());
    Ok(json)
}

/// Encode as indented JSON
pub fn to_string_pretty(query: &GroupByQuery) -> Result<String, EncodeError> {
    let json = serde_json::to_string_pretty(query)?;
    trace!("Encoded groupBy query on {} ({} bytes)", query.data_source(), json.len());
    Ok(json)
}

/// Encode as JSON bytes
pub fn to_vec(query: &GroupByQuery) -> Result<Vec<u8>, EncodeError> {
    let json = serde_json::to_vec(query)?;
    trace!("Encoded groupBy query on {} ({} bytes)", query.data_source(), json.len());
    Ok(json)
}

/// Encode using the output style from `config`
pub fn encode(query: &GroupByQuery, config: &EncoderConfig) -> Result<String, EncodeError> {
    if config.pretty {
        to_string_pretty(query)
    } else {
        to_string(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimension::Dimension;
    use druidq_core::{Interval, PredefinedGranularity};

    fn query() -> GroupByQuery {
        GroupByQuery::builder()
            .data_source("sample_datasource")
            .granularity(PredefinedGranularity::Day)
            .dimensions(vec![
                Dimension::simple("country").unwrap(),
                Dimension::simple("device").unwrap(),
            ])
            .interval(Interval::from_millis(1_325_376_000_000, 1_325_548_800_000).unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn test_compact_key_order() {
        let json = to_string(&query()).unwrap();
        assert_eq!(
            json,
            concat!(
                r#"{"queryType":"groupBy","dataSource":"sample_datasource","granularity":"day","#,
                r#""dimensions":["country","device"],"#,
                r#""intervals":["2012-01-01T00:00:00.000Z/2012-01-03T00:00:00.000Z"]}"#
            )
        );
    }

    #[test]
    fn test_pretty_and_compact_agree() {
        let query = query();
        let compact = encode(&query, &EncoderConfig::default()).unwrap();
        let pretty = encode(&query, &EncoderConfig { pretty: true }).unwrap();

        assert!(pretty.contains('\n'));
        let a: Value = serde_json::from_str(&compact).unwrap();
        let b: Value = serde_json::from_str(&pretty).unwrap();
        assert_eq!(a, b);
        assert_eq!(to_value(&query).unwrap(), a);
        assert_eq!(to_vec(&query).unwrap(), compact.into_bytes());
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let query = query();
        assert_eq!(to_string(&query).unwrap(), to_string(&query).unwrap());
        assert_eq!(query.to_json().unwrap(), to_string(&query.clone()).unwrap());
    }
}
