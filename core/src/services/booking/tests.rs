use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;

use super::*;
use crate::domain::entities::{Booking, Entity, NewTour, Tour, User};
use crate::errors::DomainError;
use crate::query::QueryParams;
use crate::repositories::{InMemoryRepository, Repository};
use crate::services::mocks::FakeGateway;

struct Fixture {
    service: BookingService,
    gateway: FakeGateway,
    bookings: Arc<InMemoryRepository<Booking>>,
    tour: Tour,
    user: User,
}

async fn fixture() -> Fixture {
    let tours = Arc::new(InMemoryRepository::<Tour>::new());
    let users = Arc::new(InMemoryRepository::<User>::new());
    let bookings = Arc::new(InMemoryRepository::<Booking>::new());
    let gateway = FakeGateway::default();

    let tour = Tour::from_input(NewTour {
        name: Some("The Northern Lights".to_string()),
        duration: Some(3),
        max_group_size: Some(12),
        difficulty: Some("easy".to_string()),
        price: Some(1497.0),
        summary: Some("Enjoy the Northern Lights in one of the best places in the world".to_string()),
        image_cover: Some("tour-9-cover.jpg".to_string()),
        ..Default::default()
    })
    .unwrap();
    tours.insert(&tour).await.unwrap();

    let user = User::new("Ayla Cornell", "ayla@example.com", "hash");
    users.seed([user.clone()]).await;

    Fixture {
        service: BookingService::new(
            bookings.clone(),
            tours,
            users,
            Arc::new(gateway.clone()),
        ),
        gateway,
        bookings,
        tour,
        user,
    }
}

fn completed(tour: &Tour, email: &str) -> Vec<u8> {
    serde_json::to_vec(&json!({
        "id": "cs_test_1",
        "client_reference_id": tour.id.to_string(),
        "customer_email": email,
        "amount_total": 149700,
    }))
    .unwrap()
}

#[tokio::test]
async fn test_checkout_session_describes_the_tour() {
    let f = fixture().await;
    let urls = CheckoutUrls::new("http://localhost:3000/");

    let session = f.service.checkout_session(f.tour.id, &f.user, &urls).await.unwrap();
    assert_eq!(session.id, "cs_test_1");

    let request = f.gateway.requests.lock().unwrap()[0].clone();
    assert_eq!(request.tour_id, f.tour.id.to_string());
    assert_eq!(request.tour_name, "The Northern Lights Tour");
    assert_eq!(request.unit_amount(), 149700);
    assert_eq!(request.customer_email, "ayla@example.com");
    assert_eq!(request.success_url, "http://localhost:3000/my-tours?alert=booking");
    assert_eq!(request.cancel_url, "http://localhost:3000/tour/the-northern-lights");
}

#[tokio::test]
async fn test_checkout_for_unknown_tour_is_not_found() {
    let f = fixture().await;
    let err = f
        .service
        .checkout_session(Uuid::new_v4(), &f.user, &CheckoutUrls::new("http://x"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}

#[tokio::test]
async fn test_completed_checkout_records_booking() {
    let f = fixture().await;

    let booking = f
        .service
        .complete_checkout(&completed(&f.tour, "ayla@example.com"), "valid")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(booking.tour, f.tour.id);
    assert_eq!(booking.user, f.user.id);
    assert_eq!(booking.price, 1497.0);
    assert!(booking.paid);
    assert_eq!(f.bookings.len().await, 1);

    let tours = f.service.my_tours(f.user.id).await.unwrap();
    assert_eq!(tours.len(), 1);
    assert_eq!(tours[0].id, f.tour.id);
}

#[tokio::test]
async fn test_bad_signature_is_a_webhook_error() {
    let f = fixture().await;
    let err = f
        .service
        .complete_checkout(&completed(&f.tour, "ayla@example.com"), "forged")
        .await
        .unwrap_err();
    assert!(err.to_string().starts_with("Webhook error:"));
    assert!(f.bookings.is_empty().await);
}

#[tokio::test]
async fn test_checkout_for_unknown_customer_is_not_found() {
    let f = fixture().await;
    let err = f
        .service
        .complete_checkout(&completed(&f.tour, "nobody@example.com"), "valid")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "No user found with that ID");
}

#[tokio::test]
async fn test_checkout_for_unknown_tour_records_nothing() {
    let f = fixture().await;
    let mut missing = f.tour.clone();
    missing.id = Uuid::new_v4();

    let err = f
        .service
        .complete_checkout(&completed(&missing, "ayla@example.com"), "valid")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "No tour found with that ID");
    assert!(f.bookings.is_empty().await);
}

#[tokio::test]
async fn test_my_tours_is_empty_without_bookings() {
    let f = fixture().await;
    assert!(f.service.my_tours(f.user.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_admin_listing_populates_references() {
    let f = fixture().await;
    f.service
        .complete_checkout(&completed(&f.tour, "ayla@example.com"), "valid")
        .await
        .unwrap();

    let documents = f.service.list(&QueryParams::new()).await.unwrap();
    assert_eq!(documents[0]["tour"]["name"], json!("The Northern Lights"));
    assert_eq!(documents[0]["user"]["email"], json!("ayla@example.com"));
}
