//! Classification of Postgres types into the shapes this crate converts.

use sqlx::postgres::{PgTypeInfo, PgTypeKind};
use sqlx::TypeInfo;

/// A scalar Postgres type, keyed off its type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Void,
    Bool,
    Int2,
    Int4,
    Int8,
    Float4,
    Float8,
    Numeric,
    Text,
    Json,
    Uuid,
    Bytea,
    Date,
    Time,
    Timestamp,
    TimestampTz,
    Interval,
    /// A user-defined enum; values travel as their label.
    Enum,
    /// Anything else.
    Other,
}

impl ScalarKind {
    pub fn from_type_name(name: &str) -> Self {
        match name {
            "VOID" => Self::Void,
            "BOOL" => Self::Bool,
            "INT2" => Self::Int2,
            "INT4" => Self::Int4,
            "INT8" => Self::Int8,
            "FLOAT4" => Self::Float4,
            "FLOAT8" => Self::Float8,
            "NUMERIC" => Self::Numeric,
            "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" | "CITEXT" => Self::Text,
            "JSON" | "JSONB" => Self::Json,
            "UUID" => Self::Uuid,
            "BYTEA" => Self::Bytea,
            "DATE" => Self::Date,
            "TIME" => Self::Time,
            "TIMESTAMP" => Self::Timestamp,
            "TIMESTAMPTZ" => Self::TimestampTz,
            "INTERVAL" => Self::Interval,
            _ => Self::Other,
        }
    }
}

/// A scalar type or a one-dimensional array of one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PgKind {
    Scalar(ScalarKind),
    Array(ScalarKind),
}

impl PgKind {
    /// Classify a type reported by the server.
    pub fn of(ty: &PgTypeInfo) -> Self {
        Self::from_name(ty.name(), matches!(ty.kind(), PgTypeKind::Enum(_)))
    }

    /// Classify by name; sqlx names arrays `ELEM[]`.
    pub fn from_name(name: &str, is_enum: bool) -> Self {
        if is_enum {
            return Self::Scalar(ScalarKind::Enum);
        }
        match name.strip_suffix("[]") {
            Some(element) => Self::Array(ScalarKind::from_type_name(element)),
            None => Self::Scalar(ScalarKind::from_type_name(name)),
        }
    }
}
