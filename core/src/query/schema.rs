//! Field schemas describing what a list query may touch

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::errors::{DomainError, DomainResult};

/// Storage type of a queryable field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Text,
    Number,
    Integer,
    Boolean,
    DateTime,
    Uuid,
}

/// A field that can appear in filters and sort keys
#[derive(Debug, PartialEq, Eq)]
pub struct Field {
    /// Name used in query strings and JSON documents
    pub name: &'static str,
    /// Column name in the relational store
    pub column: &'static str,
    pub ty: FieldType,
}

impl Field {
    pub const fn new(name: &'static str, column: &'static str, ty: FieldType) -> Self {
        Self { name, column, ty }
    }
}

/// Queryable surface of one entity
#[derive(Debug)]
pub struct Schema {
    /// Singular resource name used in error messages
    pub resource: &'static str,
    pub table: &'static str,
    pub fields: &'static [Field],
    /// Fields whose repeated query parameters form a membership test
    pub multi_value_fields: &'static [&'static str],
    /// SQL condition every read adds (rows invisible to normal queries)
    pub hidden_clause: Option<&'static str>,
}

impl Schema {
    pub fn field(&self, name: &str) -> Option<&'static Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Looks up a field the caller knows exists
    pub fn require(&self, name: &str) -> DomainResult<&'static Field> {
        self.field(name).ok_or_else(|| {
            DomainError::internal(format!("{} has no queryable field {}", self.resource, name))
        })
    }

    pub fn allows_multiple(&self, name: &str) -> bool {
        self.multi_value_fields.contains(&name)
    }
}

/// A typed value used in predicates
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Text(String),
    Number(f64),
    Integer(i64),
    Boolean(bool),
    DateTime(DateTime<Utc>),
    Uuid(Uuid),
}

impl FieldType {
    /// Parses a raw query string value; failure is reported as a cast error on `field`
    pub fn cast(&self, field: &str, raw: &str) -> DomainResult<Scalar> {
        let raw = raw.trim();
        let cast_error = || DomainError::Cast {
            field: field.to_string(),
            value: raw.to_string(),
        };

        match self {
            FieldType::Text => Ok(Scalar::Text(raw.to_string())),
            FieldType::Number => raw
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .map(Scalar::Number)
                .ok_or_else(cast_error),
            FieldType::Integer => raw.parse::<i64>().map(Scalar::Integer).map_err(|_| cast_error()),
            FieldType::Boolean => match raw.to_lowercase().as_str() {
                "true" | "1" => Ok(Scalar::Boolean(true)),
                "false" | "0" => Ok(Scalar::Boolean(false)),
                _ => Err(cast_error()),
            },
            FieldType::DateTime => parse_datetime(raw).map(Scalar::DateTime).ok_or_else(cast_error),
            FieldType::Uuid => Uuid::parse_str(raw).map(Scalar::Uuid).map_err(|_| cast_error()),
        }
    }
}

fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

impl Scalar {
    /// Reads a JSON document value as `ty`; `None` for null or mismatched values
    pub fn from_json(ty: FieldType, value: &Value) -> Option<Scalar> {
        match (ty, value) {
            (FieldType::Text, Value::String(s)) => Some(Scalar::Text(s.clone())),
            (FieldType::Number, Value::Number(n)) => n.as_f64().map(Scalar::Number),
            (FieldType::Integer, Value::Number(n)) => n.as_i64().map(Scalar::Integer),
            (FieldType::Boolean, Value::Bool(b)) => Some(Scalar::Boolean(*b)),
            (FieldType::DateTime, Value::String(s)) => parse_datetime(s).map(Scalar::DateTime),
            (FieldType::Uuid, Value::String(s)) => Uuid::parse_str(s).ok().map(Scalar::Uuid),
            _ => None,
        }
    }

    /// Orders two scalars of compatible types
    pub fn compare(&self, other: &Scalar) -> Option<Ordering> {
        match (self, other) {
            (Scalar::Text(a), Scalar::Text(b)) => Some(a.cmp(b)),
            (Scalar::Number(a), Scalar::Number(b)) => a.partial_cmp(b),
            (Scalar::Integer(a), Scalar::Integer(b)) => Some(a.cmp(b)),
            (Scalar::Number(a), Scalar::Integer(b)) => a.partial_cmp(&(*b as f64)),
            (Scalar::Integer(a), Scalar::Number(b)) => (*a as f64).partial_cmp(b),
            (Scalar::Boolean(a), Scalar::Boolean(b)) => Some(a.cmp(b)),
            (Scalar::DateTime(a), Scalar::DateTime(b)) => Some(a.cmp(b)),
            (Scalar::Uuid(a), Scalar::Uuid(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}
