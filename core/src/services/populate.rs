//! Read-time population of references between documents

use std::collections::HashMap;

use serde_json::{json, Value};
use uuid::Uuid;

use crate::domain::entities::{Booking, Entity, Review, Tour, User};
use crate::errors::DomainResult;
use crate::repositories::{TourRepository, UserRepository};

pub type UserIndex = HashMap<Uuid, User>;
pub type TourIndex = HashMap<Uuid, Tour>;

pub async fn users_by_id(
    users: &dyn UserRepository,
    ids: impl IntoIterator<Item = Uuid>,
) -> DomainResult<UserIndex> {
    let mut ids: Vec<Uuid> = ids.into_iter().collect();
    ids.sort_unstable();
    ids.dedup();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    Ok(users
        .find_by_ids(&ids)
        .await?
        .into_iter()
        .map(|user| (user.id, user))
        .collect())
}

pub async fn tours_by_id(
    tours: &dyn TourRepository,
    ids: impl IntoIterator<Item = Uuid>,
) -> DomainResult<TourIndex> {
    let mut ids: Vec<Uuid> = ids.into_iter().collect();
    ids.sort_unstable();
    ids.dedup();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    Ok(tours
        .find_by_ids(&ids)
        .await?
        .into_iter()
        .map(|tour| (tour.id, tour))
        .collect())
}

/// Tour document with `guides` replaced by guide profiles; unknown ids are dropped
pub fn tour_document(tour: &Tour, users: &UserIndex) -> Value {
    let mut document = tour.to_document();
    let guides: Vec<Value> = tour
        .guides
        .iter()
        .filter_map(|id| users.get(id))
        .map(User::guide_profile)
        .collect();
    set_field(&mut document, "guides", Value::Array(guides));
    document
}

/// Review document with `user` replaced by the reviewer's public profile
pub fn review_document(review: &Review, users: &UserIndex) -> Value {
    let mut document = review.to_document();
    if let Some(user) = users.get(&review.user) {
        set_field(&mut document, "user", user.public_profile());
    }
    document
}

/// Booking document with `tour` and `user` summaries
pub fn booking_document(booking: &Booking, tours: &TourIndex, users: &UserIndex) -> Value {
    let mut document = booking.to_document();
    if let Some(tour) = tours.get(&booking.tour) {
        set_field(&mut document, "tour", json!({ "id": tour.id, "name": tour.name }));
    }
    if let Some(user) = users.get(&booking.user) {
        set_field(
            &mut document,
            "user",
            json!({ "id": user.id, "name": user.name, "email": user.email }),
        );
    }
    document
}

fn set_field(document: &mut Value, key: &str, value: Value) {
    if let Value::Object(map) = document {
        map.insert(key.to_string(), value);
    }
}
