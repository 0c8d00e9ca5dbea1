//! Row timestamps and watermark values
//!
//! A row is positioned in time by the most recent of its date keys. The
//! resolved value is a string in [`WATERMARK_FORMAT`] so that watermarks
//! compare lexically.

use crate::entities::EntityDefinition;
use crate::error::{Error, Result};
use crate::types::{JsonValue, Row};
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

/// Watermark timestamp format (ISO-8601, second precision, UTC)
pub const WATERMARK_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Parse an ISO-8601 date or date-time
///
/// Accepts RFC 3339 with any offset, naive date-times (read as UTC, with or
/// without fractional seconds) and bare dates (midnight UTC).
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Normalize an ISO-8601 date or date-time to the watermark format
pub fn normalize_timestamp(value: &str) -> Option<String> {
    parse_timestamp(value).map(|dt| dt.format(WATERMARK_FORMAT).to_string())
}

/// Normalize a date-time to RFC 3339 UTC, keeping sub-second precision
pub fn to_rfc3339_utc(value: &str) -> Option<String> {
    parse_timestamp(value).map(|dt| dt.to_rfc3339_opts(SecondsFormat::AutoSi, true))
}

/// Format epoch milliseconds as a watermark
///
/// Milliseconds are truncated to whole seconds.
pub fn epoch_millis_to_timestamp(millis: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp(millis.div_euclid(1000), 0)
        .map(|dt| dt.format(WATERMARK_FORMAT).to_string())
}

/// Whether a last-touched value falls before the sync threshold
///
/// Values that both parse as timestamps compare as instants, so a naive
/// `2020-01-01T00:00:00` equals a threshold of `2020-01-01T00:00:00Z`.
/// Anything else compares lexically.
pub fn is_before(last_touched: &str, threshold: &str) -> bool {
    match (parse_timestamp(last_touched), parse_timestamp(threshold)) {
        (Some(touched), Some(threshold)) => touched < threshold,
        _ => last_touched < threshold,
    }
}

/// A date key value as found in a row
enum DateValue<'a> {
    Number(&'a serde_json::Number),
    Text(&'a str),
}

/// Resolve the "last touched" timestamp of a row
///
/// Returns `Ok(None)` for entities without date keys. Null values count as
/// absent; a row where every date key is absent is a data contract
/// violation, as is mixing numeric and string dates in one row.
pub fn resolve_last_touched(definition: &EntityDefinition, row: &Row) -> Result<Option<String>> {
    if !definition.is_incremental() {
        return Ok(None);
    }

    let mut values = Vec::with_capacity(definition.date_keys.len());
    for key in definition.date_keys {
        match row.get(*key) {
            None | Some(JsonValue::Null) => {}
            Some(JsonValue::Number(n)) => values.push((*key, DateValue::Number(n))),
            Some(JsonValue::String(s)) => values.push((*key, DateValue::Text(s))),
            Some(other) => {
                return Err(Error::invalid_date(
                    definition.name,
                    *key,
                    format!("unsupported value {other}"),
                ))
            }
        }
    }

    if values.is_empty() {
        return Err(Error::missing_date_key(definition.name));
    }

    if definition.epoch_millisecond_timestamp {
        let mut latest: Option<(&str, i64)> = None;
        for (key, value) in &values {
            let DateValue::Number(n) = value else {
                return Err(Error::invalid_date(
                    definition.name,
                    *key,
                    "expected epoch milliseconds",
                ));
            };
            let millis = epoch_millis(n).ok_or_else(|| {
                Error::invalid_date(definition.name, *key, format!("{n} is not an integer"))
            })?;
            if latest.map_or(true, |(_, l)| millis > l) {
                latest = Some((*key, millis));
            }
        }
        let Some((key, millis)) = latest else {
            return Err(Error::missing_date_key(definition.name));
        };
        return epoch_millis_to_timestamp(millis).map(Some).ok_or_else(|| {
            Error::invalid_date(definition.name, key, format!("{millis} is out of range"))
        });
    }

    let numeric = values.iter().filter(|(_, v)| matches!(v, DateValue::Number(_))).count();
    if numeric > 0 && numeric < values.len() {
        let (key, _) = &values[0];
        return Err(Error::invalid_date(
            definition.name,
            *key,
            "date keys mix numbers and strings",
        ));
    }

    if numeric > 0 {
        let mut latest: Option<&serde_json::Number> = None;
        for (_, value) in &values {
            if let DateValue::Number(n) = value {
                let larger = latest.map_or(true, |l| as_f64(n) > as_f64(l));
                if larger {
                    latest = Some(n);
                }
            }
        }
        return Ok(latest.map(ToString::to_string));
    }

    Ok(values
        .iter()
        .filter_map(|(_, v)| match v {
            DateValue::Text(s) => Some(*s),
            DateValue::Number(_) => None,
        })
        .max()
        .map(ToString::to_string))
}

fn epoch_millis(n: &serde_json::Number) -> Option<i64> {
    if let Some(i) = n.as_i64() {
        return Some(i);
    }
    n.as_f64()
        .filter(|f| f.fract() == 0.0 && f.abs() < 9.0e15)
        .map(|f| f as i64)
}

fn as_f64(n: &serde_json::Number) -> f64 {
    n.as_f64().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::EntityRegistry;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use test_case::test_case;

    fn row(value: JsonValue) -> Row {
        value.as_object().cloned().unwrap()
    }

    fn definition(name: &str) -> EntityDefinition {
        EntityRegistry::builtin().get(name).cloned().unwrap()
    }

    #[test_case("2020-01-01T00:00:00Z", "2020-01-01T00:00:00Z" ; "rfc3339 utc")]
    #[test_case("2020-01-01T02:00:00+02:00", "2020-01-01T00:00:00Z" ; "rfc3339 offset")]
    #[test_case("2020-01-01T00:00:00.123456", "2020-01-01T00:00:00Z" ; "naive fractional")]
    #[test_case("2020-01-01 12:30:00", "2020-01-01T12:30:00Z" ; "space separated")]
    #[test_case("2020-01-01", "2020-01-01T00:00:00Z" ; "bare date")]
    fn test_normalize_timestamp(input: &str, expected: &str) {
        assert_eq!(normalize_timestamp(input).as_deref(), Some(expected));
    }

    #[test]
    fn test_normalize_timestamp_rejects_garbage() {
        assert!(normalize_timestamp("not a date").is_none());
        assert!(normalize_timestamp("").is_none());
    }

    #[test]
    fn test_to_rfc3339_utc() {
        assert_eq!(
            to_rfc3339_utc("2013-08-08T20:41:06").as_deref(),
            Some("2013-08-08T20:41:06Z")
        );
        assert_eq!(
            to_rfc3339_utc("2013-08-08T20:41:06.500").as_deref(),
            Some("2013-08-08T20:41:06.500Z")
        );
    }

    #[test]
    fn test_epoch_millis_to_timestamp() {
        assert_eq!(
            epoch_millis_to_timestamp(1_609_459_200_000).as_deref(),
            Some("2021-01-01T00:00:00Z")
        );
        assert_eq!(
            epoch_millis_to_timestamp(1_609_459_200_999).as_deref(),
            Some("2021-01-01T00:00:00Z")
        );
    }

    #[test_case("2020-01-01T00:00:00", "2020-01-01T00:00:00Z", false ; "naive at threshold")]
    #[test_case("2020-01-01T00:00:00.250", "2020-01-01T00:00:00Z", false ; "fraction in start second")]
    #[test_case("2019-12-31T23:59:59", "2020-01-01T00:00:00Z", true ; "naive before threshold")]
    #[test_case("2020-01-01T01:00:00+02:00", "2020-01-01T00:00:00Z", true ; "offset before threshold")]
    #[test_case("2021-01-01T00:00:00Z", "2021-01-01T00:00:00Z", false ; "equal watermark")]
    #[test_case("1500", "1600", true ; "unparseable falls back to lexical")]
    fn test_is_before(last_touched: &str, threshold: &str, expected: bool) {
        assert_eq!(is_before(last_touched, threshold), expected);
    }

    #[test]
    fn test_resolve_takes_latest_iso_date() {
        let lists = definition("lists");
        let resolved = resolve_last_touched(
            &lists,
            &row(json!({"created": "2019-01-01T00:00:00", "last_updated": "2019-06-01T00:00:00"})),
        )
        .unwrap();
        assert_eq!(resolved.as_deref(), Some("2019-06-01T00:00:00"));
    }

    #[test]
    fn test_resolve_with_single_present_key() {
        let lists = definition("lists");
        let resolved =
            resolve_last_touched(&lists, &row(json!({"created": "2021-01-01T00:00:00"}))).unwrap();
        assert_eq!(resolved.as_deref(), Some("2021-01-01T00:00:00"));
    }

    #[test]
    fn test_resolve_null_counts_as_absent() {
        let lists = definition("lists");
        let resolved = resolve_last_touched(
            &lists,
            &row(json!({"created": "2021-01-01T00:00:00", "last_updated": null})),
        )
        .unwrap();
        assert_eq!(resolved.as_deref(), Some("2021-01-01T00:00:00"));
    }

    #[test]
    fn test_resolve_missing_every_date_key() {
        let lists = definition("lists");
        let err = resolve_last_touched(&lists, &row(json!({"name": "no-dates"}))).unwrap_err();
        assert!(matches!(err, Error::MissingDateKey { entity } if entity == "lists"));
    }

    #[test]
    fn test_resolve_epoch_millis() {
        let segments = definition("segments");
        let resolved = resolve_last_touched(
            &segments,
            &row(json!({
                "creation_date": 1_577_836_800_000_i64,
                "modification_date": 1_609_459_200_000_i64
            })),
        )
        .unwrap();
        assert_eq!(resolved.as_deref(), Some("2021-01-01T00:00:00Z"));
    }

    #[test]
    fn test_resolve_epoch_rejects_strings() {
        let segments = definition("segments");
        let err = resolve_last_touched(
            &segments,
            &row(json!({"creation_date": "2021-01-01T00:00:00Z"})),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidDateValue { .. }));
    }

    #[test]
    fn test_resolve_mixed_types_rejected() {
        let lists = definition("lists");
        let err = resolve_last_touched(
            &lists,
            &row(json!({"created": 1_609_459_200, "last_updated": "2021-01-01T00:00:00"})),
        )
        .unwrap_err();
        assert!(err.is_data_contract());
    }

    #[test]
    fn test_resolve_full_sync_entity() {
        let full = EntityDefinition {
            name: "audiences",
            primary_keys: &["id"],
            date_keys: &[],
            transform: None,
            epoch_millisecond_timestamp: false,
        };
        assert_eq!(resolve_last_touched(&full, &row(json!({"id": 1}))).unwrap(), None);
    }
}
