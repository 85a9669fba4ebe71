//! Rendering of a `QueryPlan` into parameterized MySQL

use sqlx::{MySql, QueryBuilder};

use tours_core::query::{FilterOp, Predicate, QueryPlan, Scalar};

/// Builds `SELECT {columns} FROM {table} WHERE ... ORDER BY ... LIMIT ? OFFSET ?`.
///
/// Values are always bound, never spliced; column and table names come from
/// the static schema. The hidden-row clause of the schema is always applied.
pub fn select_query(plan: &QueryPlan, columns: &str) -> QueryBuilder<'static, MySql> {
    let mut builder = QueryBuilder::new(format!("SELECT {} FROM {}", columns, plan.schema.table));
    push_where(&mut builder, plan.schema.hidden_clause, &plan.predicates);

    if !plan.sort.is_empty() {
        builder.push(" ORDER BY ");
        let mut order = builder.separated(", ");
        for key in &plan.sort {
            order.push(format!(
                "{} {}",
                key.field.column,
                if key.descending { "DESC" } else { "ASC" }
            ));
        }
    }

    match plan.limit {
        Some(limit) => {
            builder.push(" LIMIT ").push_bind(limit);
            if plan.skip > 0 {
                builder.push(" OFFSET ").push_bind(plan.skip);
            }
        }
        // MySQL has no OFFSET without LIMIT
        None if plan.skip > 0 => {
            builder
                .push(" LIMIT ")
                .push_bind(u64::MAX)
                .push(" OFFSET ")
                .push_bind(plan.skip);
        }
        None => {}
    }

    builder
}

fn push_where(
    builder: &mut QueryBuilder<'static, MySql>,
    hidden_clause: Option<&str>,
    predicates: &[Predicate],
) {
    let mut first = true;
    let mut next_clause = |builder: &mut QueryBuilder<'static, MySql>| {
        builder.push(if first { " WHERE " } else { " AND " });
        first = false;
    };

    if let Some(clause) = hidden_clause {
        next_clause(builder);
        builder.push(clause);
    }

    for predicate in predicates {
        if predicate.values.is_empty() {
            continue;
        }
        next_clause(builder);
        builder.push(predicate.field.column);

        match predicate.op {
            FilterOp::In => {
                builder.push(" IN (");
                let mut values = builder.separated(", ");
                for value in &predicate.values {
                    bind_scalar_separated(&mut values, value);
                }
                builder.push(")");
            }
            op => {
                builder.push(format!(" {} ", op.sql()));
                bind_scalar(builder, &predicate.values[0]);
            }
        }
    }
}

fn bind_scalar(builder: &mut QueryBuilder<'static, MySql>, value: &Scalar) {
    match value.clone() {
        Scalar::Text(v) => builder.push_bind(v),
        Scalar::Number(v) => builder.push_bind(v),
        Scalar::Integer(v) => builder.push_bind(v),
        Scalar::Boolean(v) => builder.push_bind(v),
        Scalar::DateTime(v) => builder.push_bind(v),
        Scalar::Uuid(v) => builder.push_bind(v.to_string()),
    };
}

fn bind_scalar_separated<Sep: std::fmt::Display>(
    values: &mut sqlx::query_builder::Separated<'_, 'static, MySql, Sep>,
    value: &Scalar,
) {
    match value.clone() {
        Scalar::Text(v) => values.push_bind(v),
        Scalar::Number(v) => values.push_bind(v),
        Scalar::Integer(v) => values.push_bind(v),
        Scalar::Boolean(v) => values.push_bind(v),
        Scalar::DateTime(v) => values.push_bind(v),
        Scalar::Uuid(v) => values.push_bind(v.to_string()),
    };
}
