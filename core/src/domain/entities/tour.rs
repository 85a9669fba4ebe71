//! Tour entity: a bookable trip with its itinerary and rating aggregate.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::errors::{DomainResult, ValidationErrors};
use crate::query::{Field, FieldType, Schema};

use super::{Entity, UniqueKey};

pub const DEFAULT_RATINGS_AVERAGE: f64 = 4.5;

static TOUR_FIELDS: [Field; 14] = [
    Field::new("id", "id", FieldType::Uuid),
    Field::new("name", "name", FieldType::Text),
    Field::new("slug", "slug", FieldType::Text),
    Field::new("duration", "duration", FieldType::Integer),
    Field::new("maxGroupSize", "max_group_size", FieldType::Integer),
    Field::new("difficulty", "difficulty", FieldType::Text),
    Field::new("ratingsAverage", "ratings_average", FieldType::Number),
    Field::new("ratingsQuantity", "ratings_quantity", FieldType::Integer),
    Field::new("price", "price", FieldType::Number),
    Field::new("priceDiscount", "price_discount", FieldType::Number),
    Field::new("summary", "summary", FieldType::Text),
    Field::new("imageCover", "image_cover", FieldType::Text),
    Field::new("secretTour", "secret_tour", FieldType::Boolean),
    Field::new("createdAt", "created_at", FieldType::DateTime),
];

pub static TOUR_SCHEMA: Schema = Schema {
    resource: "tour",
    table: "tours",
    fields: &TOUR_FIELDS,
    multi_value_fields: &[
        "duration",
        "ratingsAverage",
        "ratingsQuantity",
        "maxGroupSize",
        "difficulty",
        "price",
    ],
    hidden_clause: Some("secret_tour = FALSE"),
};

static NON_SLUG_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("slug regex is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Difficult,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Difficult => "difficult",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "difficult" => Some(Difficulty::Difficult),
            _ => None,
        }
    }
}

fn point() -> String {
    "Point".to_string()
}

/// GeoJSON point with optional itinerary metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(rename = "type", default = "point")]
    pub kind: String,
    /// `[longitude, latitude]`
    pub coordinates: [f64; 2],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<u32>,
}

impl GeoPoint {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            kind: point(),
            coordinates: [longitude, latitude],
            address: None,
            description: None,
            day: None,
        }
    }

    fn is_valid(&self) -> bool {
        let [lng, lat] = self.coordinates;
        self.kind == "Point" && (-180.0..=180.0).contains(&lng) && (-90.0..=90.0).contains(&lat)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tour {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    /// Days
    pub duration: u32,
    pub max_group_size: u32,
    pub difficulty: Difficulty,
    pub ratings_average: f64,
    pub ratings_quantity: u32,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_discount: Option<f64>,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub image_cover: String,
    pub images: Vec<String>,
    pub start_dates: Vec<DateTime<Utc>>,
    pub secret_tour: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_location: Option<GeoPoint>,
    pub locations: Vec<GeoPoint>,
    /// Ids of the guiding users
    pub guides: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub version: u32,
}

/// Creation payload as received from clients
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTour {
    pub name: Option<String>,
    pub duration: Option<u32>,
    pub max_group_size: Option<u32>,
    pub difficulty: Option<String>,
    pub ratings_average: Option<f64>,
    pub ratings_quantity: Option<u32>,
    pub price: Option<f64>,
    pub price_discount: Option<f64>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub image_cover: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub start_dates: Vec<DateTime<Utc>>,
    #[serde(default)]
    pub secret_tour: bool,
    pub start_location: Option<GeoPoint>,
    #[serde(default)]
    pub locations: Vec<GeoPoint>,
    #[serde(default)]
    pub guides: Vec<Uuid>,
}

/// Partial update; absent fields keep their value
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TourPatch {
    pub name: Option<String>,
    pub duration: Option<u32>,
    pub max_group_size: Option<u32>,
    pub difficulty: Option<String>,
    pub price: Option<f64>,
    pub price_discount: Option<f64>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub image_cover: Option<String>,
    pub images: Option<Vec<String>>,
    pub start_dates: Option<Vec<DateTime<Utc>>>,
    pub secret_tour: Option<bool>,
    pub start_location: Option<GeoPoint>,
    pub locations: Option<Vec<GeoPoint>>,
    pub guides: Option<Vec<Uuid>>,
}

/// Lowercase, hyphen separated form of a name
pub fn slugify(name: &str) -> String {
    NON_SLUG_CHARS
        .replace_all(&name.to_lowercase(), "-")
        .trim_matches('-')
        .to_string()
}

/// Rounds a rating to one decimal place
pub fn round_rating(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Stored average for `quantity` reviews averaging `average`; no reviews means the default
pub fn aggregate_rating(quantity: u32, average: Option<f64>) -> f64 {
    match (quantity, average) {
        (0, _) | (_, None) => DEFAULT_RATINGS_AVERAGE,
        (_, Some(average)) => round_rating(average),
    }
}

impl Tour {
    pub fn duration_weeks(&self) -> f64 {
        f64::from(self.duration) / 7.0
    }

    fn set_name(&mut self, name: &str) {
        self.name = name.trim().to_string();
        self.slug = slugify(&self.name);
    }
}

/// Parses a difficulty; unknown strings are reported by `validate`
fn parse_difficulty(raw: &str, errors: &mut ValidationErrors) -> Difficulty {
    Difficulty::parse(raw.trim()).unwrap_or_else(|| {
        errors.push("Difficulty must be either: easy, medium or difficult");
        Difficulty::Easy
    })
}

impl Entity for Tour {
    type Input = NewTour;
    type Patch = TourPatch;

    fn schema() -> &'static Schema {
        &TOUR_SCHEMA
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn from_input(input: NewTour) -> DomainResult<Self> {
        let mut errors = ValidationErrors::new();

        errors.check(input.name.is_none(), "A tour must have a name");
        errors.check(input.duration.is_none(), "A tour must have a duration");
        errors.check(input.max_group_size.is_none(), "A tour must have a group size");
        errors.check(input.price.is_none(), "A tour must have a price");
        errors.check(input.summary.is_none(), "A tour must have a summary");
        errors.check(input.image_cover.is_none(), "A tour must have a cover image");

        let difficulty = match input.difficulty.as_deref() {
            Some(raw) => parse_difficulty(raw, &mut errors),
            None => {
                errors.push("A tour must have a difficulty");
                Difficulty::Easy
            }
        };
        errors.into_result()?;

        let mut tour = Tour {
            id: Uuid::new_v4(),
            name: String::new(),
            slug: String::new(),
            duration: input.duration.unwrap_or_default(),
            max_group_size: input.max_group_size.unwrap_or_default(),
            difficulty,
            ratings_average: round_rating(input.ratings_average.unwrap_or(DEFAULT_RATINGS_AVERAGE)),
            ratings_quantity: input.ratings_quantity.unwrap_or_default(),
            price: input.price.unwrap_or_default(),
            price_discount: input.price_discount,
            summary: input.summary.unwrap_or_default().trim().to_string(),
            description: input.description.map(|d| d.trim().to_string()),
            image_cover: input.image_cover.unwrap_or_default(),
            images: input.images,
            start_dates: input.start_dates,
            secret_tour: input.secret_tour,
            start_location: input.start_location,
            locations: input.locations,
            guides: input.guides,
            created_at: Utc::now(),
            version: 0,
        };
        tour.set_name(input.name.as_deref().unwrap_or_default());
        tour.validate()?;
        Ok(tour)
    }

    fn apply_patch(&mut self, patch: TourPatch) -> DomainResult<()> {
        let mut errors = ValidationErrors::new();

        if let Some(name) = patch.name {
            self.set_name(&name);
        }
        if let Some(raw) = patch.difficulty {
            self.difficulty = parse_difficulty(&raw, &mut errors);
        }
        errors.into_result()?;

        if let Some(duration) = patch.duration {
            self.duration = duration;
        }
        if let Some(size) = patch.max_group_size {
            self.max_group_size = size;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(discount) = patch.price_discount {
            self.price_discount = Some(discount);
        }
        if let Some(summary) = patch.summary {
            self.summary = summary.trim().to_string();
        }
        if let Some(description) = patch.description {
            self.description = Some(description.trim().to_string());
        }
        if let Some(cover) = patch.image_cover {
            self.image_cover = cover;
        }
        if let Some(images) = patch.images {
            self.images = images;
        }
        if let Some(dates) = patch.start_dates {
            self.start_dates = dates;
        }
        if let Some(secret) = patch.secret_tour {
            self.secret_tour = secret;
        }
        if let Some(start) = patch.start_location {
            self.start_location = Some(start);
        }
        if let Some(locations) = patch.locations {
            self.locations = locations;
        }
        if let Some(guides) = patch.guides {
            self.guides = guides;
        }

        self.validate()
    }

    fn validate(&self) -> DomainResult<()> {
        let mut errors = ValidationErrors::new();
        let name_len = self.name.chars().count();

        errors.check(self.name.is_empty(), "A tour must have a name");
        errors.check(name_len > 40, "A tour name must have less or equal to 40 characters");
        errors.check(
            name_len > 0 && name_len < 5,
            "A tour name must have more or equal to 5 characters",
        );
        errors.check(self.duration == 0, "A tour must have a duration");
        errors.check(self.max_group_size == 0, "A tour must have a group size");
        errors.check(
            !(1.0..=5.0).contains(&self.ratings_average),
            "A tour must have a rating between 1 to 5",
        );
        errors.check(
            !self.price.is_finite() || self.price <= 0.0,
            "A tour must have a price",
        );
        if let Some(discount) = self.price_discount {
            errors.check(
                discount >= self.price || discount < 0.0,
                format!("Discount price ({}) should be below the regular price", discount),
            );
        }
        errors.check(self.summary.is_empty(), "A tour must have a summary");
        errors.check(self.image_cover.trim().is_empty(), "A tour must have a cover image");
        errors.check(
            self.start_location.iter().chain(self.locations.iter()).any(|p| !p.is_valid()),
            "Locations must be GeoJSON points with valid coordinates",
        );
        errors.into_result()
    }

    fn to_document(&self) -> Value {
        let mut document = serde_json::to_value(self).unwrap_or(Value::Null);
        if let Value::Object(map) = &mut document {
            map.insert("durationWeeks".to_string(), Value::from(self.duration_weeks()));
        }
        document
    }

    fn touch(&mut self) {
        self.version += 1;
    }

    fn unique_keys(&self) -> Vec<UniqueKey> {
        vec![UniqueKey::new("name", self.name.clone())]
    }

    fn is_hidden(&self) -> bool {
        self.secret_tour
    }
}
