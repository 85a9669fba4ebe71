//! Integration tests for checkout, the payment webhook and booking administration

mod common;

use actix_web::test;
use chrono::Utc;
use serde_json::{json, Value};

use common::{bearer, jwt_cookie, TestContext};
use tours_api::create_app;
use tours_core::domain::entities::Role;
use tours_infra::payment::{signature_header, MockPaymentGateway};

fn completed_event(tour_id: &str, email: &str, amount: i64) -> Vec<u8> {
    serde_json::to_vec(&json!({
        "id": "evt_1",
        "type": "checkout.session.completed",
        "data": {"object": {
            "id": "cs_test_1",
            "client_reference_id": tour_id,
            "customer_email": email,
            "amount_total": amount
        }}
    }))
    .unwrap()
}

fn signed(payload: &[u8]) -> String {
    signature_header(
        payload,
        MockPaymentGateway::DEFAULT_WEBHOOK_SECRET,
        Utc::now().timestamp(),
    )
    .unwrap()
}

#[actix_web::test]
async fn test_checkout_session_requires_login() {
    let ctx = TestContext::new();
    let tour = ctx.tour("The Forest Hiker", 397.0).await;
    let (_, token) = ctx.user("Laura Wilson", "laura@example.com", Role::User).await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let uri = format!("/api/v1/bookings/checkout-session/{}", tour.id);
    let req = test::TestRequest::get().uri(&uri).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 401);

    let req = test::TestRequest::get()
        .uri(&uri)
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "success");
    assert!(body["session"]["id"].as_str().unwrap().starts_with("cs_"));
    assert!(body["session"]["url"]
        .as_str()
        .unwrap()
        .ends_with("/my-tours?alert=booking"));
}

#[actix_web::test]
async fn test_webhook_records_booking() {
    let ctx = TestContext::new();
    let tour = ctx.tour("The Forest Hiker", 397.0).await;
    let (_, user_token) = ctx.user("Laura Wilson", "laura@example.com", Role::User).await;
    let (_, admin_token) = ctx.user("Admin Person", "admin@example.com", Role::Admin).await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let payload = completed_event(&tour.id.to_string(), "laura@example.com", 39700);
    let req = test::TestRequest::post()
        .uri("/webhook-checkout")
        .insert_header(("content-type", "application/json"))
        .insert_header(("stripe-signature", signed(&payload)))
        .set_payload(payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"received": true}));

    let req = test::TestRequest::get()
        .uri("/api/v1/bookings")
        .insert_header(bearer(&admin_token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["results"], 1);
    let booking = &body["data"]["data"][0];
    assert_eq!(booking["price"], 397.0);
    assert_eq!(booking["paid"], true);
    assert_eq!(booking["tour"]["name"], "The Forest Hiker");
    assert_eq!(booking["user"]["email"], "laura@example.com");

    let req = test::TestRequest::get()
        .uri("/my-tours")
        .cookie(jwt_cookie(&user_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let html = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(html.contains("The Forest Hiker"));
}

#[actix_web::test]
async fn test_webhook_rejects_bad_signature() {
    let ctx = TestContext::new();
    let tour = ctx.tour("The Forest Hiker", 397.0).await;
    let (laura, _) = ctx.user("Laura Wilson", "laura@example.com", Role::User).await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let payload = completed_event(&tour.id.to_string(), "laura@example.com", 39700);
    let forged = signature_header(&payload, "whsec_wrong", Utc::now().timestamp()).unwrap();
    let req = test::TestRequest::post()
        .uri("/webhook-checkout")
        .insert_header(("stripe-signature", forged))
        .set_payload(payload.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["message"].as_str().unwrap().starts_with("Webhook error:"));

    let req = test::TestRequest::post()
        .uri("/webhook-checkout")
        .set_payload(payload)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 400);

    assert!(ctx.state.bookings.my_tours(laura.id).await.unwrap().is_empty());
}

#[actix_web::test]
async fn test_other_events_are_acknowledged() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let payload = br#"{"type":"payment_intent.created","data":{"object":{}}}"#.to_vec();
    let req = test::TestRequest::post()
        .uri("/webhook-checkout")
        .insert_header(("stripe-signature", signed(&payload)))
        .set_payload(payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
}

#[actix_web::test]
async fn test_booking_admin_routes_are_restricted() {
    let ctx = TestContext::new();
    let tour = ctx.tour("The Forest Hiker", 397.0).await;
    let (laura, user_token) = ctx.user("Laura Wilson", "laura@example.com", Role::User).await;
    let (_, lead_token) = ctx.user("Lisa Brown", "lisa@example.com", Role::LeadGuide).await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/bookings")
        .insert_header(bearer(&user_token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 403);

    let req = test::TestRequest::post()
        .uri("/api/v1/bookings")
        .insert_header(bearer(&lead_token))
        .set_json(json!({"tour": tour.id, "user": laura.id, "price": 350}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    let body: Value = test::read_body_json(resp).await;
    let id = body["data"]["data"]["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::patch()
        .uri(&format!("/api/v1/bookings/{}", id))
        .insert_header(bearer(&lead_token))
        .set_json(json!({"paid": false}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["data"]["paid"], false);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/bookings/{}", id))
        .insert_header(bearer(&lead_token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 204);
}
