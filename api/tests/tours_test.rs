//! Integration tests for the tours resource and its query features

mod common;

use actix_web::test;
use serde_json::{json, Value};
use uuid::Uuid;

use common::{bearer, tour_body, TestContext};
use tours_api::create_app;
use tours_core::domain::entities::Role;

async fn seed_tours(ctx: &TestContext) {
    ctx.tour("The Forest Hiker", 397.0).await;
    ctx.tour("The Sea Explorer", 497.0).await;
    ctx.tour("The Snow Adventurer", 997.0).await;
    ctx.tour("The City Wanderer", 1197.0).await;
}

#[actix_web::test]
async fn test_list_envelope_and_filters() {
    let ctx = TestContext::new();
    seed_tours(&ctx).await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::get().uri("/api/v1/tours").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["results"], 4);
    assert!(body["requestedAt"].as_str().is_some());
    let first = &body["data"]["data"][0];
    assert!(first.get("version").is_none());
    assert_eq!(first["durationWeeks"], json!(5.0 / 7.0));

    let req = test::TestRequest::get()
        .uri("/api/v1/tours?price%5Blt%5D=1000&sort=price")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["results"], 3);
    let names: Vec<&str> = body["data"]["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|tour| tour["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec!["The Forest Hiker", "The Sea Explorer", "The Snow Adventurer"]
    );
}

#[actix_web::test]
async fn test_field_selection_and_pagination() {
    let ctx = TestContext::new();
    seed_tours(&ctx).await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/tours?fields=name,price&sort=-price&page=2&limit=2")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["results"], 2);
    let page = body["data"]["data"].as_array().unwrap();
    assert_eq!(page[0]["name"], "The Sea Explorer");
    assert_eq!(page[1]["name"], "The Forest Hiker");
    let mut keys: Vec<&String> = page[0].as_object().unwrap().keys().collect();
    keys.sort();
    assert_eq!(keys, vec!["id", "name", "price"]);
}

#[actix_web::test]
async fn test_top_five_cheap_alias() {
    let ctx = TestContext::new();
    seed_tours(&ctx).await;
    ctx.tour("The Park Camper", 1497.0).await;
    ctx.tour("The Sports Lover", 2997.0).await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/tours/top-5-cheap")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["results"], 5);
    let tours = body["data"]["data"].as_array().unwrap();
    assert_eq!(tours[0]["name"], "The Forest Hiker");
    assert!(tours[0].get("imageCover").is_none());
    assert!(tours[0].get("difficulty").is_some());
}

#[actix_web::test]
async fn test_secret_tours_are_hidden() {
    let ctx = TestContext::new();
    ctx.tour("The Forest Hiker", 397.0).await;
    let mut secret = tour_body("The Secret Retreat", 597.0);
    secret["secretTour"] = json!(true);
    let hidden = ctx.tour_from(secret).await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::get().uri("/api/v1/tours").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["results"], 1);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/tours/{}", hidden.id))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 404);
}

#[actix_web::test]
async fn test_get_tour_errors() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::get().uri("/api/v1/tours/abc").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Invalid _id: abc.");

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/tours/{}", Uuid::new_v4()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "No tour found with that ID");
}

#[actix_web::test]
async fn test_get_tour_populates_guides() {
    let ctx = TestContext::new();
    let (guide, _) = ctx.user("Lisa Brown", "lisa@example.com", Role::LeadGuide).await;
    let mut body = tour_body("The Forest Hiker", 397.0);
    body["guides"] = json!([guide.id]);
    let tour = ctx.tour_from(body).await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/tours/{}", tour.id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let doc = &body["data"]["data"];
    assert_eq!(doc["slug"], "the-forest-hiker");
    assert_eq!(doc["guides"][0]["name"], "Lisa Brown");
    assert_eq!(doc["guides"][0]["role"], "lead-guide");
    assert!(doc["guides"][0].get("passwordHash").is_none());
    assert_eq!(doc["reviews"], json!([]));
}

#[actix_web::test]
async fn test_tour_writes_require_manager_role() {
    let ctx = TestContext::new();
    let (_, user_token) = ctx.user("Laura Wilson", "laura@example.com", Role::User).await;
    let (_, lead_token) = ctx.user("Lisa Brown", "lisa@example.com", Role::LeadGuide).await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/tours")
        .set_json(tour_body("The Test Tour", 100.0))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 401);

    let req = test::TestRequest::post()
        .uri("/api/v1/tours")
        .insert_header(bearer(&user_token))
        .set_json(tour_body("The Test Tour", 100.0))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 403);

    let req = test::TestRequest::post()
        .uri("/api/v1/tours")
        .insert_header(bearer(&lead_token))
        .set_json(tour_body("The Test Tour", 100.0))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    let body: Value = test::read_body_json(resp).await;
    let id = body["data"]["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["data"]["slug"], "the-test-tour");
    assert_eq!(body["data"]["data"]["ratingsAverage"], 4.5);

    let req = test::TestRequest::post()
        .uri("/api/v1/tours")
        .insert_header(bearer(&lead_token))
        .set_json(tour_body("The Test Tour", 150.0))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["message"],
        "Duplicate field value: \"The Test Tour\". Please use another value!"
    );

    let req = test::TestRequest::patch()
        .uri(&format!("/api/v1/tours/{}", id))
        .insert_header(bearer(&lead_token))
        .set_json(json!({"price": 120}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["data"]["price"], 120.0);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/tours/{}", id))
        .insert_header(bearer(&lead_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 204);
    assert!(test::read_body(resp).await.is_empty());

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/tours/{}", id))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 404);
}

#[actix_web::test]
async fn test_tour_validation_messages() {
    let ctx = TestContext::new();
    let (_, admin_token) = ctx.user("Admin Person", "admin@example.com", Role::Admin).await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let mut body = tour_body("The Test Tour", 100.0);
    body["difficulty"] = json!("extreme");
    body["priceDiscount"] = json!(200);
    let req = test::TestRequest::post()
        .uri("/api/v1/tours")
        .insert_header(bearer(&admin_token))
        .set_json(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("Difficulty must be either: easy, medium or difficult"));
}

#[actix_web::test]
async fn test_request_body_is_sanitized() {
    let ctx = TestContext::new();
    let (_, admin_token) = ctx.user("Admin Person", "admin@example.com", Role::Admin).await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let mut body = tour_body("The Test Tour", 100.0);
    body["summary"] = json!("<script>alert('x')</script> Great tour");
    body["$where"] = json!("1 == 1");
    let req = test::TestRequest::post()
        .uri("/api/v1/tours")
        .insert_header(bearer(&admin_token))
        .set_json(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["data"]["data"]["summary"],
        "&lt;script&gt;alert('x')&lt;/script&gt; Great tour"
    );
}
