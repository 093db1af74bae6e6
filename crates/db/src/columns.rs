//! Decoding result columns into JSON.
//!
//! Numeric values come back as strings so no precision is lost; bytea as a
//! `\x`-prefixed hex string; intervals as `{months, days, microseconds}`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde_json::{json, Number, Value};
use sqlx::postgres::types::PgInterval;
use sqlx::postgres::PgRow;
use sqlx::{Column, Decode, Postgres, Row, Type, TypeInfo, ValueRef};
use uuid::Uuid;

use crate::kind::{PgKind, ScalarKind};
use crate::DbError;

fn float(v: f64) -> Value {
    Number::from_f64(v).map(Value::Number).unwrap_or(Value::Null)
}

fn decimal(d: Decimal) -> Value {
    Value::String(d.to_string())
}

fn interval(i: PgInterval) -> Value {
    json!({ "months": i.months, "days": i.days, "microseconds": i.microseconds })
}

/// Decode column `index` of `row` into JSON.
pub(crate) fn decode_column(row: &PgRow, index: usize) -> Result<Value, DbError> {
    let column = &row.columns()[index];
    let ty = column.type_info();
    let kind = PgKind::of(ty);

    // void-returning functions yield a single column with no usable value
    if kind == PgKind::Scalar(ScalarKind::Void) || row.try_get_raw(index)?.is_null() {
        return Ok(Value::Null);
    }

    let decoded = match kind {
        PgKind::Scalar(scalar) => decode_scalar(row, index, scalar)?,
        PgKind::Array(element) => decode_array(row, index, element)?,
    };
    decoded.ok_or_else(|| DbError::UnsupportedColumnType {
        column: column.name().to_owned(),
        type_name: ty.name().to_owned(),
    })
}

fn decode_scalar(row: &PgRow, index: usize, kind: ScalarKind) -> Result<Option<Value>, DbError> {
    let value = match kind {
        ScalarKind::Void => Value::Null,
        ScalarKind::Bool => Value::Bool(row.try_get(index)?),
        ScalarKind::Int2 => Value::from(row.try_get::<i16, _>(index)?),
        ScalarKind::Int4 => Value::from(row.try_get::<i32, _>(index)?),
        ScalarKind::Int8 => Value::from(row.try_get::<i64, _>(index)?),
        ScalarKind::Float4 => float(f64::from(row.try_get::<f32, _>(index)?)),
        ScalarKind::Float8 => float(row.try_get::<f64, _>(index)?),
        ScalarKind::Numeric => decimal(row.try_get(index)?),
        ScalarKind::Text => Value::String(row.try_get(index)?),
        // enum labels are sent as plain text
        ScalarKind::Enum => Value::String(row.try_get_unchecked(index)?),
        ScalarKind::Json => row.try_get::<Value, _>(index)?,
        ScalarKind::Uuid => Value::String(row.try_get::<Uuid, _>(index)?.to_string()),
        ScalarKind::Bytea => {
            Value::String(format!("\\x{}", hex::encode(row.try_get::<Vec<u8>, _>(index)?)))
        }
        ScalarKind::Date => Value::String(row.try_get::<NaiveDate, _>(index)?.to_string()),
        ScalarKind::Time => Value::String(row.try_get::<NaiveTime, _>(index)?.to_string()),
        ScalarKind::Timestamp => Value::String(
            row.try_get::<NaiveDateTime, _>(index)?
                .format("%Y-%m-%dT%H:%M:%S%.f")
                .to_string(),
        ),
        ScalarKind::TimestampTz => {
            Value::String(row.try_get::<DateTime<Utc>, _>(index)?.to_rfc3339())
        }
        ScalarKind::Interval => interval(row.try_get(index)?),
        ScalarKind::Other => return Ok(None),
    };
    Ok(Some(value))
}

fn decode_array(row: &PgRow, index: usize, element: ScalarKind) -> Result<Option<Value>, DbError> {
    let value = match element {
        ScalarKind::Bool => array(row, index, Value::Bool)?,
        ScalarKind::Int2 => array::<i16>(row, index, Value::from)?,
        ScalarKind::Int4 => array::<i32>(row, index, Value::from)?,
        ScalarKind::Int8 => array::<i64>(row, index, Value::from)?,
        ScalarKind::Float4 => array(row, index, |v: f32| float(f64::from(v)))?,
        ScalarKind::Float8 => array(row, index, float)?,
        ScalarKind::Numeric => array(row, index, decimal)?,
        ScalarKind::Text => array(row, index, Value::String)?,
        ScalarKind::Json => array(row, index, |v: Value| v)?,
        ScalarKind::Uuid => array(row, index, |v: Uuid| Value::String(v.to_string()))?,
        ScalarKind::Date => array(row, index, |v: NaiveDate| Value::String(v.to_string()))?,
        ScalarKind::TimestampTz => {
            array(row, index, |v: DateTime<Utc>| Value::String(v.to_rfc3339()))?
        }
        _ => return Ok(None),
    };
    Ok(Some(value))
}

/// Decode a one-dimensional array, NULL elements becoming `null`.
fn array<T>(row: &PgRow, index: usize, to_json: impl Fn(T) -> Value) -> Result<Value, DbError>
where
    Vec<Option<T>>: for<'r> Decode<'r, Postgres> + Type<Postgres>,
{
    let items: Vec<Option<T>> = row.try_get(index)?;
    Ok(Value::Array(
        items
            .into_iter()
            .map(|item| item.map(&to_json).unwrap_or(Value::Null))
            .collect(),
    ))
}
