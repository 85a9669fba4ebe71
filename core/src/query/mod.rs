//! Query-feature builder
//!
//! Turns the flat key/value pairs of a list request into a [`QueryPlan`]:
//! filter predicates, sort keys, a field projection and a page window.
//! The plan is storage agnostic; the MySQL repositories render it to SQL
//! and the in-memory store evaluates it against serialized documents.

mod document;
mod features;
mod params;
mod plan;
mod schema;

#[cfg(test)]
mod tests;

pub use features::{QueryFeatures, DEFAULT_LIMIT, DEFAULT_PAGE, DEFAULT_SORT, RESERVED_PARAMS};
pub use params::{ParamEntry, QueryParams};
pub use plan::{FilterOp, Predicate, Projection, QueryPlan, SortKey, VERSION_FIELD};
pub use schema::{Field, FieldType, Scalar, Schema};
