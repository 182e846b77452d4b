//! Literal coercion: turn a literal substring into a typed `sea_query::Value`
//! using the declared type of the field it is compared against.

use chrono::{NaiveDate, NaiveDateTime};
use sea_query::Value;

use crate::error::OdataError;
use crate::model::FieldType;

/// Format accepted for datetime literals, e.g. `2021-01-01T06:01:00`.
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
/// Fallback accepted for datetime literals carrying fractional seconds.
const DATETIME_FRACTIONAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
/// Format accepted for date literals, e.g. `2021-01-01`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Coerce a raw literal to the field's declared type.
///
/// Datetime and date literals must match their fixed formats; a mismatch
/// is a user error. Integer and boolean literals are parsed when the text
/// parses cleanly and otherwise passed through as strings, leaving the
/// final word to the backend's affinity rules. Strings pass through
/// unchanged.
pub fn coerce(ty: FieldType, raw: &str) -> Result<Value, OdataError> {
    match ty {
        FieldType::DateTime => parse_datetime(raw).map(Value::from),
        FieldType::Date => NaiveDate::parse_from_str(raw, DATE_FORMAT)
            .map(Value::from)
            .map_err(|_| coercion_failure(raw, DATE_FORMAT)),
        FieldType::Integer => Ok(raw
            .parse::<i64>()
            .map(Value::from)
            .unwrap_or_else(|_| Value::from(raw))),
        FieldType::Boolean => match raw {
            "true" => Ok(Value::from(true)),
            "false" => Ok(Value::from(false)),
            _ => Ok(Value::from(raw)),
        },
        FieldType::String => Ok(Value::from(raw)),
    }
}

fn parse_datetime(raw: &str) -> Result<NaiveDateTime, OdataError> {
    NaiveDateTime::parse_from_str(raw, DATETIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(raw, DATETIME_FRACTIONAL_FORMAT))
        .map_err(|_| coercion_failure(raw, DATETIME_FORMAT))
}

fn coercion_failure(value: &str, expected: &str) -> OdataError {
    OdataError::LiteralCoercionFailure {
        value: value.to_string(),
        expected: expected.to_string(),
    }
}
