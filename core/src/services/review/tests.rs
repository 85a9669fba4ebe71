use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;

use super::*;
use crate::domain::entities::{Entity, NewReview, NewTour, Review, ReviewPatch, Tour, User};
use crate::errors::DomainError;
use crate::query::QueryParams;
use crate::repositories::{InMemoryRepository, Repository};

struct Fixture {
    service: ReviewService,
    tours: Arc<InMemoryRepository<Tour>>,
    tour: Tour,
    alice: User,
    bob: User,
}

async fn fixture() -> Fixture {
    let tours = Arc::new(InMemoryRepository::<Tour>::new());
    let users = Arc::new(InMemoryRepository::<User>::new());
    let reviews = Arc::new(InMemoryRepository::<Review>::new());

    let tour = Tour::from_input(NewTour {
        name: Some("The Park Camper".to_string()),
        duration: Some(10),
        max_group_size: Some(15),
        difficulty: Some("medium".to_string()),
        price: Some(1497.0),
        summary: Some("Breathing in Nature in America's most spectacular National Parks".to_string()),
        image_cover: Some("tour-5-cover.jpg".to_string()),
        ..Default::default()
    })
    .unwrap();
    tours.insert(&tour).await.unwrap();

    let alice = User::new("Alice Walker", "alice@example.com", "hash");
    let bob = User::new("Bob Marley", "bob@example.com", "hash");
    users.seed([alice.clone(), bob.clone()]).await;

    Fixture {
        service: ReviewService::new(reviews, tours.clone(), users),
        tours,
        tour,
        alice,
        bob,
    }
}

fn input(rating: f64) -> NewReview {
    NewReview {
        review: Some("Loved it".to_string()),
        rating: Some(rating),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_nested_create_takes_tour_from_route_and_user_from_session() {
    let f = fixture().await;
    let mut body = input(4.0);
    body.user = Some(Uuid::new_v4());

    let review = f.service.create(&f.alice, Some(f.tour.id), body).await.unwrap();

    assert_eq!(review.tour, f.tour.id);
    assert_eq!(review.user, f.alice.id);
}

#[tokio::test]
async fn test_ratings_follow_every_write() {
    let f = fixture().await;

    let first = f.service.create(&f.alice, Some(f.tour.id), input(4.0)).await.unwrap();
    f.service.create(&f.bob, Some(f.tour.id), input(5.0)).await.unwrap();
    let tour = f.tours.find_by_id(f.tour.id).await.unwrap().unwrap();
    assert_eq!((tour.ratings_quantity, tour.ratings_average), (2, 4.5));

    f.service
        .update(first.id, ReviewPatch { rating: Some(3.0), ..Default::default() })
        .await
        .unwrap();
    let tour = f.tours.find_by_id(f.tour.id).await.unwrap().unwrap();
    assert_eq!(tour.ratings_average, 4.0);

    f.service.delete(first.id).await.unwrap();
    let tour = f.tours.find_by_id(f.tour.id).await.unwrap().unwrap();
    assert_eq!((tour.ratings_quantity, tour.ratings_average), (1, 5.0));
}

#[tokio::test]
async fn test_average_is_rounded_and_resets_when_empty() {
    let f = fixture().await;
    let a = f.service.create(&f.alice, Some(f.tour.id), input(4.0)).await.unwrap();
    let b = f.service.create(&f.bob, Some(f.tour.id), input(4.75)).await.unwrap();
    let tour = f.tours.find_by_id(f.tour.id).await.unwrap().unwrap();
    assert_eq!(tour.ratings_average, 4.4);

    f.service.delete(a.id).await.unwrap();
    f.service.delete(b.id).await.unwrap();
    let tour = f.tours.find_by_id(f.tour.id).await.unwrap().unwrap();
    assert_eq!((tour.ratings_quantity, tour.ratings_average), (0, 4.5));
}

#[tokio::test]
async fn test_second_review_of_same_tour_is_rejected() {
    let f = fixture().await;
    f.service.create(&f.alice, Some(f.tour.id), input(4.0)).await.unwrap();

    let err = f
        .service
        .create(&f.alice, Some(f.tour.id), input(2.0))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::BusinessRule { .. }));
}

#[tokio::test]
async fn test_review_of_unknown_tour_is_not_found() {
    let f = fixture().await;
    let err = f
        .service
        .create(&f.alice, Some(Uuid::new_v4()), input(4.0))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "No tour found with that ID");
}

#[tokio::test]
async fn test_review_without_tour_fails_validation() {
    let f = fixture().await;
    let err = f.service.create(&f.alice, None, input(4.0)).await.unwrap_err();
    assert!(matches!(err, DomainError::Validation { .. }));
}

#[tokio::test]
async fn test_nested_list_is_scoped_and_populated() {
    let f = fixture().await;
    f.service.create(&f.alice, Some(f.tour.id), input(4.0)).await.unwrap();

    let documents = f.service.list(&QueryParams::new(), Some(f.tour.id)).await.unwrap();
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0]["user"]["name"], json!("Alice Walker"));
    assert!(documents[0]["user"].get("email").is_none());

    let elsewhere = f.service.list(&QueryParams::new(), Some(Uuid::new_v4())).await.unwrap();
    assert!(elsewhere.is_empty());
}
