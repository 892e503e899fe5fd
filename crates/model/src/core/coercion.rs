use crate::core::{kind::ValueKind, value::Value};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use criteria_syntax::Literal;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
#[error("cannot read '{text}' as {kind}")]
pub struct CoercionError {
    pub kind: ValueKind,
    pub text: String,
}

/// Coerces operand text into a value of `kind`.
///
/// Integers are base 10, floats decimal (NaN rejected), booleans `true`/`false` in any
/// case, date/times ISO-8601 and enum variants case-insensitive. Strings are verbatim.
pub fn coerce(text: &str, kind: &ValueKind) -> Result<Value, CoercionError> {
    let invalid = || CoercionError {
        kind: kind.clone(),
        text: text.to_string(),
    };

    match kind {
        ValueKind::String => Ok(Value::String(text.to_string())),
        ValueKind::Integer => text.parse::<i64>().map(Value::Int).map_err(|_| invalid()),
        ValueKind::Float => match text.parse::<f64>() {
            Ok(v) if !v.is_nan() => Ok(Value::Float(v)),
            _ => Err(invalid()),
        },
        ValueKind::Boolean => match text.to_ascii_lowercase().as_str() {
            "true" => Ok(Value::Boolean(true)),
            "false" => Ok(Value::Boolean(false)),
            _ => Err(invalid()),
        },
        ValueKind::DateTime => parse_datetime(text).map(Value::DateTime).ok_or_else(invalid),
        ValueKind::Enum(variants) => variants
            .iter()
            .find(|v| v.eq_ignore_ascii_case(text))
            .map(|v| Value::Enum(v.clone()))
            .ok_or_else(invalid),
    }
}

/// Coerces a typed or textual literal. Typed literals that already fit the kind skip
/// the text round trip.
pub fn coerce_literal(literal: &Literal, kind: &ValueKind) -> Result<Value, CoercionError> {
    match (literal, kind) {
        (Literal::Integer(i), ValueKind::Integer) => Ok(Value::Int(*i)),
        (Literal::Integer(i), ValueKind::Float) => Ok(Value::Float(*i as f64)),
        (Literal::Float(f), ValueKind::Float) if !f.is_nan() => Ok(Value::Float(*f)),
        (Literal::Boolean(b), ValueKind::Boolean) => Ok(Value::Boolean(*b)),
        _ => coerce(&literal.to_text(), kind),
    }
}

/// RFC 3339, or a naive date/time read as UTC.
pub fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    parse_naive_datetime(raw).map(|naive| DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc))
}

fn parse_naive_datetime(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f"))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}
