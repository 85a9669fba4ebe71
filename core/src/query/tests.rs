use chrono::{Duration, TimeZone, Utc};
use serde_json::{json, Value};

use super::*;
use crate::errors::DomainError;

static FIELDS: [Field; 6] = [
    Field::new("name", "name", FieldType::Text),
    Field::new("price", "price", FieldType::Number),
    Field::new("duration", "duration", FieldType::Integer),
    Field::new("difficulty", "difficulty", FieldType::Text),
    Field::new("createdAt", "created_at", FieldType::DateTime),
    Field::new("guides", "guides", FieldType::Uuid),
];

static SCHEMA: Schema = Schema {
    resource: "tour",
    table: "tours",
    fields: &FIELDS,
    multi_value_fields: &["duration", "difficulty", "price"],
    hidden_clause: None,
};

fn plan_for(query: &str) -> QueryPlan {
    QueryFeatures::new(&SCHEMA, &QueryParams::parse(query))
        .filter()
        .expect("filter should succeed")
        .sort()
        .limit_fields()
        .paginate()
        .build()
}

fn documents(count: usize) -> Vec<(usize, Value)> {
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    (0..count)
        .map(|i| {
            let doc = json!({
                "id": format!("doc-{i}"),
                "name": format!("Tour {i}"),
                "price": (i as f64) * 100.0,
                "duration": (i % 10) as i64,
                "difficulty": if i % 2 == 0 { "easy" } else { "difficult" },
                "createdAt": (base + Duration::days(i as i64)).to_rfc3339(),
                "version": 0,
            });
            (i, doc)
        })
        .collect()
}

#[test]
fn test_gte_suffix_becomes_at_least_predicate() {
    let plan = plan_for("price[gte]=100");

    assert_eq!(plan.predicates.len(), 1);
    let predicate = &plan.predicates[0];
    assert_eq!(predicate.field.name, "price");
    assert_eq!(predicate.op, FilterOp::Gte);
    assert_eq!(predicate.values, vec![Scalar::Number(100.0)]);

    assert!(predicate.matches(&json!({"price": 100.0})));
    assert!(predicate.matches(&json!({"price": 497})));
    assert!(!predicate.matches(&json!({"price": 99.5})));
}

#[test]
fn test_all_comparison_suffixes() {
    let plan = plan_for("price[gt]=1&price[lt]=9&duration[gte]=2&duration[lte]=5");
    let ops: Vec<FilterOp> = plan.predicates.iter().map(|p| p.op).collect();
    assert_eq!(ops, vec![FilterOp::Gt, FilterOp::Lt, FilterOp::Gte, FilterOp::Lte]);
}

#[test]
fn test_reserved_keys_are_not_filters() {
    let plan = plan_for("page=2&sort=price&limit=5&fields=name&difficulty=easy");
    assert_eq!(plan.predicates.len(), 1);
    assert_eq!(plan.predicates[0].field.name, "difficulty");
    assert_eq!(plan.predicates[0].values, vec![Scalar::Text("easy".into())]);
}

#[test]
fn test_unknown_fields_and_operators_are_dropped() {
    let plan = plan_for("secretSauce=1&price[ne]=5&name=Tour%201");
    assert_eq!(plan.predicates.len(), 1);
    assert_eq!(plan.predicates[0].field.name, "name");
}

#[test]
fn test_uncastable_value_is_cast_error() {
    let err = QueryFeatures::new(&SCHEMA, &QueryParams::parse("price[gte]=cheap"))
        .filter()
        .err()
        .expect("cast should fail");

    match err {
        DomainError::Cast { field, value } => {
            assert_eq!(field, "price");
            assert_eq!(value, "cheap");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_whitelisted_repeats_become_membership() {
    let plan = plan_for("duration=5&duration=9&name=a&name=b");

    let duration = plan.predicates.iter().find(|p| p.field.name == "duration").unwrap();
    assert_eq!(duration.op, FilterOp::In);
    assert_eq!(duration.values, vec![Scalar::Integer(5), Scalar::Integer(9)]);

    let name = plan.predicates.iter().find(|p| p.field.name == "name").unwrap();
    assert_eq!(name.op, FilterOp::Eq);
    assert_eq!(name.values, vec![Scalar::Text("b".into())]);
}

#[test]
fn test_pagination_skips_and_limits() {
    let plan = plan_for("page=2&limit=10");
    assert_eq!(plan.skip, 10);
    assert_eq!(plan.limit, Some(10));

    let selected = plan_for("page=2&limit=10&sort=price").select(documents(25));
    assert_eq!(selected, (10..20).collect::<Vec<_>>());

    let last_page = plan_for("page=3&limit=10&sort=price").select(documents(25));
    assert_eq!(last_page.len(), 5);
}

#[test]
fn test_pagination_defaults() {
    let plan = plan_for("");
    assert_eq!(plan.skip, 0);
    assert_eq!(plan.limit, Some(DEFAULT_LIMIT));

    let plan = plan_for("page=zero&limit=-4");
    assert_eq!(plan.skip, 0);
    assert_eq!(plan.limit, Some(100));

    let plan = plan_for("page=0&limit=0");
    assert_eq!(plan.skip, 0);
    assert_eq!(plan.limit, Some(100));
}

#[test]
fn test_default_sort_is_newest_first() {
    let plan = plan_for("");
    assert_eq!(plan.sort.len(), 1);
    assert_eq!(plan.sort[0].field.name, "createdAt");
    assert!(plan.sort[0].descending);

    let selected = plan.select(documents(5));
    assert_eq!(selected, vec![4, 3, 2, 1, 0]);
}

#[test]
fn test_multi_key_sort() {
    let plan = plan_for("sort=difficulty,-price");
    let selected = plan.select(documents(6));
    // difficult: 5, 3, 1 then easy: 4, 2, 0
    assert_eq!(selected, vec![5, 3, 1, 4, 2, 0]);
}

#[test]
fn test_unknown_sort_keys_fall_back_to_default() {
    let plan = plan_for("sort=-bogus");
    assert_eq!(plan.sort[0].field.name, "createdAt");
    assert!(plan.sort[0].descending);
}

#[test]
fn test_field_selection_include() {
    let plan = plan_for("fields=name,price");
    assert_eq!(
        plan.projection,
        Projection::Include(vec!["name".into(), "price".into()])
    );

    let projected = plan.projection.apply(documents(1).remove(0).1);
    let keys: Vec<&String> = projected.as_object().unwrap().keys().collect();
    assert_eq!(keys.len(), 3);
    assert_eq!(projected["id"], "doc-0");
    assert!(projected.get("difficulty").is_none());
}

#[test]
fn test_field_selection_exclude() {
    let plan = plan_for("fields=-difficulty,-price");
    let projected = plan.projection.apply(documents(1).remove(0).1);
    assert!(projected.get("difficulty").is_none());
    assert!(projected.get("price").is_none());
    assert!(projected.get("version").is_some());
}

#[test]
fn test_default_projection_hides_version() {
    let plan = plan_for("");
    let projected = plan.projection.apply(documents(1).remove(0).1);
    assert!(projected.get("version").is_none());
    assert!(projected.get("name").is_some());
}

#[test]
fn test_base_predicate_precedes_parsed_filters() {
    let guide = uuid::Uuid::new_v4();
    let field = SCHEMA.require("guides").unwrap();
    let plan = QueryFeatures::new(&SCHEMA, &QueryParams::parse("price[lt]=500"))
        .with_base(Predicate::eq(field, Scalar::Uuid(guide)))
        .filter()
        .unwrap()
        .build();

    assert_eq!(plan.predicates[0].field.name, "guides");
    assert!(plan.matches(&json!({"guides": [uuid::Uuid::new_v4(), guide], "price": 10})));
    assert!(!plan.matches(&json!({"guides": [], "price": 10})));
}

#[test]
fn test_date_filters_accept_plain_dates() {
    let plan = plan_for("createdAt[gte]=2024-01-03");
    let selected = plan.select(documents(5));
    assert_eq!(selected, vec![4, 3, 2]);
}
