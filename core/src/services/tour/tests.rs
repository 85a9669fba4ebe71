use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use super::*;
use crate::domain::entities::{Entity, NewTour, Review, Role, Tour, User};
use crate::query::QueryParams;
use crate::repositories::{InMemoryRepository, Repository};

struct Fixture {
    service: TourService,
    tours: Arc<InMemoryRepository<Tour>>,
    reviews: Arc<InMemoryRepository<Review>>,
    guide: User,
    reviewer: User,
}

async fn fixture() -> Fixture {
    let tours = Arc::new(InMemoryRepository::<Tour>::new());
    let users = Arc::new(InMemoryRepository::<User>::new());
    let reviews = Arc::new(InMemoryRepository::<Review>::new());

    let guide = User::new("Miyah Myles", "miyah@example.com", "hash").with_role(Role::LeadGuide);
    let reviewer = User::new("Lourdes Browning", "lourdes@example.com", "hash");
    users.seed([guide.clone(), reviewer.clone()]).await;

    Fixture {
        service: TourService::new(tours.clone(), users, reviews.clone()),
        tours,
        reviews,
        guide,
        reviewer,
    }
}

fn tour_with_guide(name: &str, guide: Uuid) -> Tour {
    Tour::from_input(NewTour {
        name: Some(name.to_string()),
        duration: Some(9),
        max_group_size: Some(8),
        difficulty: Some("difficult".to_string()),
        price: Some(1997.0),
        summary: Some("Snow adventure".to_string()),
        image_cover: Some("tour-3-cover.jpg".to_string()),
        guides: vec![guide, Uuid::new_v4()],
        ..Default::default()
    })
    .unwrap()
}

#[tokio::test]
async fn test_list_populates_known_guides() {
    let f = fixture().await;
    f.tours
        .insert(&tour_with_guide("The Snow Adventurer", f.guide.id))
        .await
        .unwrap();

    let documents = f.service.list(&QueryParams::new()).await.unwrap();
    let guides = documents[0]["guides"].as_array().unwrap();

    assert_eq!(guides.len(), 1);
    assert_eq!(guides[0]["name"], json!("Miyah Myles"));
    assert_eq!(guides[0]["role"], json!("lead-guide"));
    assert!(guides[0].get("passwordHash").is_none());
}

#[tokio::test]
async fn test_detail_includes_reviews_with_reviewer() {
    let f = fixture().await;
    let tour = tour_with_guide("The Snow Adventurer", f.guide.id);
    f.tours.insert(&tour).await.unwrap();
    f.reviews
        .insert(&Review {
            id: Uuid::new_v4(),
            review: "Amazing!".to_string(),
            rating: 5.0,
            tour: tour.id,
            user: f.reviewer.id,
            created_at: Utc::now(),
            version: 0,
        })
        .await
        .unwrap();

    let detail = f.service.detail(tour.id).await.unwrap();
    let document = detail.to_document();

    assert_eq!(document["reviews"][0]["user"]["name"], json!("Lourdes Browning"));
    assert_eq!(detail.guides().len(), 1);
    assert_eq!(detail.reviewer_name(&detail.reviews[0]), Some("Lourdes Browning"));
}

#[tokio::test]
async fn test_detail_by_slug_skips_secret_tours() {
    let f = fixture().await;
    let mut tour = tour_with_guide("The Hidden Valley", f.guide.id);
    tour.secret_tour = true;
    f.tours.insert(&tour).await.unwrap();

    assert!(f.service.detail_by_slug("the-hidden-valley").await.unwrap().is_none());
    assert!(f.service.detail_by_slug("nothing-here").await.unwrap().is_none());
}

#[tokio::test]
async fn test_overview_lists_public_tours() {
    let f = fixture().await;
    f.tours
        .insert(&tour_with_guide("The Snow Adventurer", f.guide.id))
        .await
        .unwrap();
    assert_eq!(f.service.overview().await.unwrap().len(), 1);
}
