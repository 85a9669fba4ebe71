//! Evaluation of a plan against serialized documents

use std::cmp::Ordering;

use serde_json::Value;

use super::plan::{FilterOp, Predicate, QueryPlan};
use super::schema::{Field, Scalar};

impl Predicate {
    /// True when the document satisfies the predicate.
    ///
    /// Array fields match when any element does.
    pub fn matches(&self, document: &Value) -> bool {
        match document.get(self.field.name) {
            Some(Value::Array(items)) => items.iter().any(|item| self.matches_value(item)),
            Some(value) => self.matches_value(value),
            None => false,
        }
    }

    fn matches_value(&self, value: &Value) -> bool {
        let Some(actual) = Scalar::from_json(self.field.ty, value) else {
            return false;
        };

        match self.op {
            FilterOp::In | FilterOp::Eq => self
                .values
                .iter()
                .any(|expected| actual.compare(expected) == Some(Ordering::Equal)),
            op => self.values.first().is_some_and(|expected| {
                matches!(
                    (op, actual.compare(expected)),
                    (FilterOp::Gt, Some(Ordering::Greater))
                        | (FilterOp::Gte, Some(Ordering::Greater | Ordering::Equal))
                        | (FilterOp::Lt, Some(Ordering::Less))
                        | (FilterOp::Lte, Some(Ordering::Less | Ordering::Equal))
                )
            }),
        }
    }
}

impl QueryPlan {
    pub fn matches(&self, document: &Value) -> bool {
        self.predicates.iter().all(|predicate| predicate.matches(document))
    }

    /// Orders two documents by the plan's sort keys
    pub fn compare_documents(&self, a: &Value, b: &Value) -> Ordering {
        for key in &self.sort {
            let ordering = compare_field(key.field, a, b);
            let ordering = if key.descending { ordering.reverse() } else { ordering };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }

    /// Filters, sorts and windows `(item, document)` pairs, returning the items
    pub fn select<T>(&self, rows: Vec<(T, Value)>) -> Vec<T> {
        let mut rows: Vec<(T, Value)> = rows
            .into_iter()
            .filter(|(_, document)| self.matches(document))
            .collect();

        rows.sort_by(|(_, a), (_, b)| self.compare_documents(a, b));

        let skip = usize::try_from(self.skip).unwrap_or(usize::MAX);
        let limit = self
            .limit
            .map(|limit| usize::try_from(limit).unwrap_or(usize::MAX))
            .unwrap_or(usize::MAX);

        rows.into_iter().skip(skip).take(limit).map(|(item, _)| item).collect()
    }
}

/// Missing values sort before present ones
fn compare_field(field: &Field, a: &Value, b: &Value) -> Ordering {
    let left = a.get(field.name).and_then(|v| Scalar::from_json(field.ty, v));
    let right = b.get(field.name).and_then(|v| Scalar::from_json(field.ty, v));

    match (left, right) {
        (Some(l), Some(r)) => l.compare(&r).unwrap_or(Ordering::Equal),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
