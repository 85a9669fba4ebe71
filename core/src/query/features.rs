//! Chained filter / sort / select / paginate builder

use tracing::debug;

use crate::errors::DomainResult;

use super::params::{ParamEntry, QueryParams};
use super::plan::{FilterOp, Predicate, Projection, QueryPlan, SortKey};
use super::schema::Schema;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 100;
pub const DEFAULT_SORT: &str = "-createdAt";

/// Keys consumed by sort, field selection and pagination
pub const RESERVED_PARAMS: [&str; 4] = ["page", "sort", "limit", "fields"];

/// Builds a [`QueryPlan`] from request parameters.
///
/// Steps run in a fixed order:
///
/// ```ignore
/// let plan = QueryFeatures::new(Tour::schema(), &params)
///     .filter()?
///     .sort()
///     .limit_fields()
///     .paginate()
///     .build();
/// ```
pub struct QueryFeatures {
    entries: Vec<ParamEntry>,
    plan: QueryPlan,
}

impl QueryFeatures {
    pub fn new(schema: &'static Schema, params: &QueryParams) -> Self {
        Self {
            entries: params.entries(|field| schema.allows_multiple(field)),
            plan: QueryPlan::new(schema),
        }
    }

    /// Adds a predicate that always applies (e.g. the parent of a nested route)
    pub fn with_base(mut self, predicate: Predicate) -> Self {
        self.plan.predicates.push(predicate);
        self
    }

    /// Turns the non-reserved parameters into typed predicates.
    ///
    /// Unknown fields and unknown operator suffixes are ignored; a value that
    /// does not parse as the field's type is a cast error.
    pub fn filter(mut self) -> DomainResult<Self> {
        let schema = self.plan.schema;

        for entry in &self.entries {
            if RESERVED_PARAMS.contains(&entry.field.as_str()) {
                continue;
            }
            let Some(field) = schema.field(&entry.field) else {
                debug!(resource = schema.resource, field = %entry.field, "ignoring unknown filter field");
                continue;
            };

            let op = match entry.operator.as_deref() {
                None => FilterOp::Eq,
                Some(suffix) => match FilterOp::from_suffix(suffix) {
                    Some(op) => op,
                    None => continue,
                },
            };

            let values = entry
                .values
                .iter()
                .map(|raw| field.ty.cast(field.name, raw))
                .collect::<DomainResult<Vec<_>>>()?;

            let predicate = if values.len() > 1 {
                Predicate::one_of(field, values)
            } else {
                Predicate {
                    field,
                    op,
                    values,
                }
            };
            self.plan.predicates.push(predicate);
        }

        Ok(self)
    }

    /// Comma separated sort keys, `-` for descending; defaults to newest first
    pub fn sort(mut self) -> Self {
        let schema = self.plan.schema;
        let raw = self.reserved("sort").unwrap_or(DEFAULT_SORT);

        let mut keys: Vec<SortKey> = split_list(raw)
            .filter_map(|key| {
                let (name, descending) = match key.strip_prefix('-') {
                    Some(name) => (name, true),
                    None => (key, false),
                };
                schema.field(name).map(|field| SortKey { field, descending })
            })
            .collect();

        if keys.is_empty() {
            keys = split_list(DEFAULT_SORT)
                .filter_map(|key| key.strip_prefix('-'))
                .filter_map(|name| schema.field(name))
                .map(|field| SortKey {
                    field,
                    descending: true,
                })
                .collect();
        }

        self.plan.sort = keys;
        self
    }

    /// Comma separated field list; all `-` prefixed entries make an exclusion list
    pub fn limit_fields(mut self) -> Self {
        let Some(raw) = self.reserved("fields") else {
            return self;
        };

        let requested: Vec<&str> = split_list(raw).collect();
        if requested.is_empty() {
            return self;
        }

        self.plan.projection = if requested.iter().all(|f| f.starts_with('-')) {
            Projection::Exclude(
                requested
                    .iter()
                    .map(|f| f.trim_start_matches('-').to_string())
                    .collect(),
            )
        } else {
            Projection::Include(
                requested
                    .iter()
                    .filter(|f| !f.starts_with('-'))
                    .map(|f| f.to_string())
                    .collect(),
            )
        };
        self
    }

    /// `skip = (page - 1) * limit`; non-positive or non-numeric values use the defaults
    pub fn paginate(mut self) -> Self {
        let page = self.positive("page").unwrap_or(DEFAULT_PAGE);
        let limit = self.positive("limit").unwrap_or(DEFAULT_LIMIT);

        self.plan.skip = (page - 1).saturating_mul(limit);
        self.plan.limit = Some(limit);
        self
    }

    pub fn build(self) -> QueryPlan {
        self.plan
    }

    fn reserved(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.field == name && entry.operator.is_none())
            .and_then(|entry| entry.values.last())
            .map(String::as_str)
    }

    fn positive(&self, name: &str) -> Option<u64> {
        self.reserved(name)
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .filter(|value| *value > 0)
    }
}

fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|item| !item.is_empty())
}
