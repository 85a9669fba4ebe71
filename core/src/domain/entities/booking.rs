//! Booking entity: a paid seat on a tour.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::errors::{DomainResult, ValidationErrors};
use crate::query::{Field, FieldType, Schema};

use super::Entity;

static BOOKING_FIELDS: [Field; 6] = [
    Field::new("id", "id", FieldType::Uuid),
    Field::new("tour", "tour_id", FieldType::Uuid),
    Field::new("user", "user_id", FieldType::Uuid),
    Field::new("price", "price", FieldType::Number),
    Field::new("paid", "paid", FieldType::Boolean),
    Field::new("createdAt", "created_at", FieldType::DateTime),
];

pub static BOOKING_SCHEMA: Schema = Schema {
    resource: "booking",
    table: "bookings",
    fields: &BOOKING_FIELDS,
    multi_value_fields: &[],
    hidden_clause: None,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub tour: Uuid,
    pub user: Uuid,
    pub price: f64,
    pub paid: bool,
    pub created_at: DateTime<Utc>,
    pub version: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewBooking {
    pub tour: Option<Uuid>,
    pub user: Option<Uuid>,
    pub price: Option<f64>,
    pub paid: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingPatch {
    pub price: Option<f64>,
    pub paid: Option<bool>,
}

impl Booking {
    pub fn new(tour: Uuid, user: Uuid, price: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            tour,
            user,
            price,
            paid: true,
            created_at: Utc::now(),
            version: 0,
        }
    }
}

impl Entity for Booking {
    type Input = NewBooking;
    type Patch = BookingPatch;

    fn schema() -> &'static Schema {
        &BOOKING_SCHEMA
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn from_input(input: NewBooking) -> DomainResult<Self> {
        let mut errors = ValidationErrors::new();
        errors.check(input.tour.is_none(), "Booking must belong to a Tour!");
        errors.check(input.user.is_none(), "Booking must belong to a User!");
        errors.check(input.price.is_none(), "Booking must have a price.");
        errors.into_result()?;

        let mut booking = Booking::new(
            input.tour.unwrap_or_default(),
            input.user.unwrap_or_default(),
            input.price.unwrap_or_default(),
        );
        if let Some(paid) = input.paid {
            booking.paid = paid;
        }
        booking.validate()?;
        Ok(booking)
    }

    fn apply_patch(&mut self, patch: BookingPatch) -> DomainResult<()> {
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(paid) = patch.paid {
            self.paid = paid;
        }
        self.validate()
    }

    fn validate(&self) -> DomainResult<()> {
        let mut errors = ValidationErrors::new();
        errors.check(
            !self.price.is_finite() || self.price < 0.0,
            "Booking must have a price.",
        );
        errors.into_result()
    }

    fn to_document(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    fn touch(&mut self) {
        self.version += 1;
    }
}
