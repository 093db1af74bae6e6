//! Binding JSON inputs to the parameter types the server declared.
//!
//! The statement is prepared first so Postgres resolves the function from its
//! own signature; each input is then converted to the type reported for its
//! placeholder and bound with exactly that type. A number therefore reaches an
//! `int4` parameter as `int4`, a string reaches a `date` parameter as `date`
//! and `null` is a NULL of whatever type the parameter has.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use sqlx::encode::IsNull;
use sqlx::postgres::types::PgInterval;
use sqlx::postgres::{PgArgumentBuffer, PgTypeInfo};
use sqlx::types::Json;
use sqlx::{Encode, Postgres, Type, TypeInfo};
use uuid::Uuid;

use crate::kind::{PgKind, ScalarKind};
use crate::DbError;

// ---------------------------------------------------------------------------
// Converted values
// ---------------------------------------------------------------------------

/// An input converted to the Rust type sqlx encodes for its parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Null,
    Bool(bool),
    Int2(i16),
    Int4(i32),
    Int8(i64),
    Float4(f32),
    Float8(f64),
    Numeric(Decimal),
    /// Text-like types and enum labels.
    Text(String),
    Json(Value),
    Uuid(Uuid),
    Bytea(Vec<u8>),
    Date(NaiveDate),
    Time(NaiveTime),
    Timestamp(NaiveDateTime),
    TimestampTz(DateTime<Utc>),
    Interval(PgInterval),
    Array(ArrayParam),
}

/// One-dimensional arrays; `None` elements are SQL NULLs.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayParam {
    Bool(Vec<Option<bool>>),
    Int2(Vec<Option<i16>>),
    Int4(Vec<Option<i32>>),
    Int8(Vec<Option<i64>>),
    Float4(Vec<Option<f32>>),
    Float8(Vec<Option<f64>>),
    Numeric(Vec<Option<Decimal>>),
    Text(Vec<Option<String>>),
    Uuid(Vec<Option<Uuid>>),
    Date(Vec<Option<NaiveDate>>),
}

fn put<'q, T: Encode<'q, Postgres>>(value: &T, buf: &mut PgArgumentBuffer) -> IsNull {
    value.encode_by_ref(buf)
}

impl ParamValue {
    fn encode(&self, buf: &mut PgArgumentBuffer) -> IsNull {
        match self {
            Self::Null => IsNull::Yes,
            Self::Bool(v) => put(v, buf),
            Self::Int2(v) => put(v, buf),
            Self::Int4(v) => put(v, buf),
            Self::Int8(v) => put(v, buf),
            Self::Float4(v) => put(v, buf),
            Self::Float8(v) => put(v, buf),
            Self::Numeric(v) => put(v, buf),
            Self::Text(v) => put(v, buf),
            Self::Json(v) => put(&Json(v), buf),
            Self::Uuid(v) => put(v, buf),
            Self::Bytea(v) => put(v, buf),
            Self::Date(v) => put(v, buf),
            Self::Time(v) => put(v, buf),
            Self::Timestamp(v) => put(v, buf),
            Self::TimestampTz(v) => put(v, buf),
            Self::Interval(v) => put(v, buf),
            Self::Array(ArrayParam::Bool(v)) => put(v, buf),
            Self::Array(ArrayParam::Int2(v)) => put(v, buf),
            Self::Array(ArrayParam::Int4(v)) => put(v, buf),
            Self::Array(ArrayParam::Int8(v)) => put(v, buf),
            Self::Array(ArrayParam::Float4(v)) => put(v, buf),
            Self::Array(ArrayParam::Float8(v)) => put(v, buf),
            Self::Array(ArrayParam::Numeric(v)) => put(v, buf),
            Self::Array(ArrayParam::Text(v)) => put(v, buf),
            Self::Array(ArrayParam::Uuid(v)) => put(v, buf),
            Self::Array(ArrayParam::Date(v)) => put(v, buf),
        }
    }
}

// ---------------------------------------------------------------------------
// Bound parameter
// ---------------------------------------------------------------------------

/// A converted input carrying the parameter type the server declared.
///
/// `produces` reports that type, so the statement is always sent with the
/// function's own parameter types rather than ones guessed from the JSON.
#[derive(Debug, Clone)]
pub(crate) struct PgParam {
    ty: PgTypeInfo,
    value: ParamValue,
}

impl Type<Postgres> for PgParam {
    // Unused: `produces` always reports the declared type.
    fn type_info() -> PgTypeInfo {
        <String as Type<Postgres>>::type_info()
    }

    fn compatible(_ty: &PgTypeInfo) -> bool {
        true
    }
}

impl<'q> Encode<'q, Postgres> for PgParam {
    fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> IsNull {
        self.value.encode(buf)
    }

    fn produces(&self) -> Option<PgTypeInfo> {
        Some(self.ty.clone())
    }
}

/// Convert `value` for the parameter at 1-based `position` declared as `ty`.
pub(crate) fn bind_param(value: &Value, ty: &PgTypeInfo, position: usize) -> Result<PgParam, DbError> {
    let value = coerce(value, PgKind::of(ty), ty.name(), position)?;
    Ok(PgParam {
        ty: ty.clone(),
        value,
    })
}

// ---------------------------------------------------------------------------
// Coercion
// ---------------------------------------------------------------------------

enum Mismatch {
    Invalid(String),
    Unsupported,
}

fn invalid(value: &Value) -> Mismatch {
    Mismatch::Invalid(format!("cannot convert {value}"))
}

/// Convert one JSON input for a parameter of the given kind.
pub fn coerce(value: &Value, kind: PgKind, type_name: &str, position: usize) -> Result<ParamValue, DbError> {
    if value.is_null() {
        return Ok(ParamValue::Null);
    }

    let converted = match kind {
        PgKind::Scalar(scalar) => coerce_scalar(value, scalar),
        // element OIDs are checked server-side, so only TEXT[] takes strings
        PgKind::Array(ScalarKind::Text) if type_name != "TEXT[]" => Err(Mismatch::Unsupported),
        PgKind::Array(element) => coerce_array(value, element).map(ParamValue::Array),
    };

    converted.map_err(|mismatch| match mismatch {
        Mismatch::Invalid(reason) => DbError::InvalidParameter {
            position,
            type_name: type_name.to_owned(),
            reason,
        },
        Mismatch::Unsupported => DbError::UnsupportedParameterType {
            position,
            type_name: type_name.to_owned(),
        },
    })
}

fn coerce_scalar(value: &Value, kind: ScalarKind) -> Result<ParamValue, Mismatch> {
    match kind {
        ScalarKind::Bool => boolean(value).map(ParamValue::Bool),
        ScalarKind::Int2 => narrow(value).map(ParamValue::Int2),
        ScalarKind::Int4 => narrow(value).map(ParamValue::Int4),
        ScalarKind::Int8 => integer(value).map(ParamValue::Int8),
        ScalarKind::Float4 => float(value).map(|f| ParamValue::Float4(f as f32)),
        ScalarKind::Float8 => float(value).map(ParamValue::Float8),
        ScalarKind::Numeric => numeric(value).map(ParamValue::Numeric),
        ScalarKind::Text | ScalarKind::Enum => Ok(ParamValue::Text(text(value))),
        ScalarKind::Json => Ok(ParamValue::Json(match value {
            Value::String(s) => serde_json::from_str(s).unwrap_or_else(|_| value.clone()),
            _ => value.clone(),
        })),
        ScalarKind::Uuid => parse(value, |s| Uuid::parse_str(s).ok()).map(ParamValue::Uuid),
        ScalarKind::Bytea => bytes(value).map(ParamValue::Bytea),
        ScalarKind::Date => {
            parse(value, |s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()).map(ParamValue::Date)
        }
        ScalarKind::Time => {
            parse(value, |s| NaiveTime::parse_from_str(s, "%H:%M:%S%.f").ok()).map(ParamValue::Time)
        }
        ScalarKind::Timestamp => parse(value, naive_datetime).map(ParamValue::Timestamp),
        ScalarKind::TimestampTz => parse(value, |s| {
            DateTime::parse_from_rfc3339(s)
                .map(|t| t.with_timezone(&Utc))
                .ok()
                .or_else(|| naive_datetime(s).map(|t| t.and_utc()))
        })
        .map(ParamValue::TimestampTz),
        ScalarKind::Interval => interval(value).map(ParamValue::Interval),
        ScalarKind::Void | ScalarKind::Other => Err(Mismatch::Unsupported),
    }
}

fn collect<T>(
    items: &[Value],
    kind: ScalarKind,
    pick: fn(ParamValue) -> Option<T>,
) -> Result<Vec<Option<T>>, Mismatch> {
    items
        .iter()
        .map(|item| match item {
            Value::Null => Ok(None),
            _ => coerce_scalar(item, kind).map(pick),
        })
        .collect()
}

macro_rules! collect_as {
    ($items:expr, $kind:expr, $variant:ident) => {
        ArrayParam::$variant(collect($items, $kind, |p| match p {
            ParamValue::$variant(v) => Some(v),
            _ => None,
        })?)
    };
}

fn coerce_array(value: &Value, element: ScalarKind) -> Result<ArrayParam, Mismatch> {
    let Value::Array(items) = value else {
        return Err(invalid(value));
    };
    let array = match element {
        ScalarKind::Bool => collect_as!(items, element, Bool),
        ScalarKind::Int2 => collect_as!(items, element, Int2),
        ScalarKind::Int4 => collect_as!(items, element, Int4),
        ScalarKind::Int8 => collect_as!(items, element, Int8),
        ScalarKind::Float4 => collect_as!(items, element, Float4),
        ScalarKind::Float8 => collect_as!(items, element, Float8),
        ScalarKind::Numeric => collect_as!(items, element, Numeric),
        ScalarKind::Text => collect_as!(items, element, Text),
        ScalarKind::Uuid => collect_as!(items, element, Uuid),
        ScalarKind::Date => collect_as!(items, element, Date),
        _ => return Err(Mismatch::Unsupported),
    };
    Ok(array)
}

fn boolean(value: &Value) -> Result<bool, Mismatch> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::String(s) => match s.to_ascii_lowercase().as_str() {
            "t" | "true" | "y" | "yes" | "on" | "1" => Ok(true),
            "f" | "false" | "n" | "no" | "off" | "0" => Ok(false),
            _ => Err(invalid(value)),
        },
        _ => Err(invalid(value)),
    }
}

fn integer(value: &Value) -> Result<i64, Mismatch> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && f.abs() < 9.2e18).map(|f| f as i64))
            .ok_or_else(|| invalid(value)),
        Value::String(s) => s.trim().parse().map_err(|_| invalid(value)),
        _ => Err(invalid(value)),
    }
}

fn narrow<T: TryFrom<i64>>(value: &Value) -> Result<T, Mismatch> {
    let wide = integer(value)?;
    T::try_from(wide).map_err(|_| Mismatch::Invalid(format!("{wide} is out of range")))
}

fn float(value: &Value) -> Result<f64, Mismatch> {
    match value {
        Value::Number(n) => n.as_f64().ok_or_else(|| invalid(value)),
        Value::String(s) => s.trim().parse().map_err(|_| invalid(value)),
        _ => Err(invalid(value)),
    }
}

fn numeric(value: &Value) -> Result<Decimal, Mismatch> {
    let literal = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_owned(),
        _ => return Err(invalid(value)),
    };
    Decimal::from_str(&literal)
        .or_else(|_| Decimal::from_scientific(&literal))
        .map_err(|_| invalid(value))
}

/// String form of any input: strings as-is, everything else as JSON text.
fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn parse<T>(value: &Value, convert: impl Fn(&str) -> Option<T>) -> Result<T, Mismatch> {
    match value {
        Value::String(s) => convert(s.trim()).ok_or_else(|| invalid(value)),
        _ => Err(invalid(value)),
    }
}

fn naive_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// `"\x..."` hex strings decode as hex, other strings as their UTF-8 bytes,
/// arrays as one byte per element.
fn bytes(value: &Value) -> Result<Vec<u8>, Mismatch> {
    match value {
        Value::String(s) => match s.strip_prefix("\\x") {
            Some(digits) => hex::decode(digits).map_err(|_| invalid(value)),
            None => Ok(s.as_bytes().to_vec()),
        },
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_u64()
                    .and_then(|b| u8::try_from(b).ok())
                    .ok_or_else(|| invalid(value))
            })
            .collect(),
        _ => Err(invalid(value)),
    }
}

/// `{"months": .., "days": .., "microseconds": ..}`, each part optional.
fn interval(value: &Value) -> Result<PgInterval, Mismatch> {
    let Value::Object(parts) = value else {
        return Err(invalid(value));
    };
    let part = |key: &str| parts.get(key).map_or(Ok(0), integer);
    Ok(PgInterval {
        months: i32::try_from(part("months")?).map_err(|_| invalid(value))?,
        days: i32::try_from(part("days")?).map_err(|_| invalid(value))?,
        microseconds: part("microseconds")?,
    })
}
