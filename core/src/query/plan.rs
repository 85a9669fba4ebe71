//! Storage-agnostic query plan

use serde_json::{Map, Value};

use super::schema::{Field, Scalar, Schema};

/// Internal revision counter hidden from default projections
pub const VERSION_FIELD: &str = "version";

/// Comparison applied by a predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
}

impl FilterOp {
    /// Maps a bracket suffix such as `gte` to an operator
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "gt" => Some(FilterOp::Gt),
            "gte" => Some(FilterOp::Gte),
            "lt" => Some(FilterOp::Lt),
            "lte" => Some(FilterOp::Lte),
            _ => None,
        }
    }

    pub fn sql(&self) -> &'static str {
        match self {
            FilterOp::Eq => "=",
            FilterOp::Gt => ">",
            FilterOp::Gte => ">=",
            FilterOp::Lt => "<",
            FilterOp::Lte => "<=",
            FilterOp::In => "IN",
        }
    }
}

/// `field op value(s)`
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub field: &'static Field,
    pub op: FilterOp,
    /// One value, or several for [`FilterOp::In`]
    pub values: Vec<Scalar>,
}

impl Predicate {
    pub fn new(field: &'static Field, op: FilterOp, value: Scalar) -> Self {
        Self {
            field,
            op,
            values: vec![value],
        }
    }

    pub fn eq(field: &'static Field, value: Scalar) -> Self {
        Self::new(field, FilterOp::Eq, value)
    }

    pub fn one_of(field: &'static Field, values: Vec<Scalar>) -> Self {
        Self {
            field,
            op: FilterOp::In,
            values,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SortKey {
    pub field: &'static Field,
    pub descending: bool,
}

/// Which top-level document fields survive serialization
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    Include(Vec<String>),
    Exclude(Vec<String>),
}

impl Default for Projection {
    fn default() -> Self {
        Projection::Exclude(vec![VERSION_FIELD.to_string()])
    }
}

impl Projection {
    /// Applies the projection to a serialized document; `id` is always kept
    pub fn apply(&self, document: Value) -> Value {
        let Value::Object(map) = document else {
            return document;
        };

        let projected: Map<String, Value> = match self {
            Projection::Include(fields) => map
                .into_iter()
                .filter(|(key, _)| key == "id" || fields.iter().any(|f| f == key))
                .collect(),
            Projection::Exclude(fields) => map
                .into_iter()
                .filter(|(key, _)| !fields.iter().any(|f| f == key))
                .collect(),
        };

        Value::Object(projected)
    }
}

/// Filter, order, projection and window of one read
#[derive(Debug, Clone)]
pub struct QueryPlan {
    pub schema: &'static Schema,
    pub predicates: Vec<Predicate>,
    pub sort: Vec<SortKey>,
    pub projection: Projection,
    pub skip: u64,
    /// `None` reads every matching row
    pub limit: Option<u64>,
}

impl QueryPlan {
    /// Unfiltered, unsorted, unbounded plan
    pub fn new(schema: &'static Schema) -> Self {
        Self {
            schema,
            predicates: Vec::new(),
            sort: Vec::new(),
            projection: Projection::default(),
            skip: 0,
            limit: None,
        }
    }

    pub fn with_sort(mut self, field: &'static Field, descending: bool) -> Self {
        self.sort.push(SortKey { field, descending });
        self
    }
}
