use askama::Template;

use tours_core::domain::entities::{Tour, User};
use tours_core::services::TourDetail;

use super::{render, Page, PageResult};

fn next_date(tour: &Tour) -> String {
    tour.start_dates
        .first()
        .map(|date| date.format("%B %Y").to_string())
        .unwrap_or_else(|| "To be announced".to_string())
}

fn start_description(tour: &Tour) -> &str {
    tour.start_location
        .as_ref()
        .and_then(|point| point.description.as_deref())
        .unwrap_or("")
}

struct TourCard<'a> {
    tour: &'a Tour,
    start: &'a str,
    next_date: String,
    stops: usize,
}

#[derive(Template)]
#[template(path = "overview.html")]
struct OverviewTemplate<'a> {
    page: Page<'a>,
    cards: Vec<TourCard<'a>>,
}

/// Card grid of tours; used by the overview and the booked-tours page
pub fn overview_page(
    title: &str,
    tours: &[Tour],
    user: Option<&User>,
    alert: Option<&str>,
) -> PageResult {
    let cards = tours
        .iter()
        .map(|tour| TourCard {
            tour,
            start: start_description(tour),
            next_date: next_date(tour),
            stops: tour.locations.len(),
        })
        .collect();
    render(&OverviewTemplate {
        page: Page::new(title, user).with_alert(alert),
        cards,
    })
}

struct GuideRow<'a> {
    guide: &'a User,
    label: &'static str,
}

struct ReviewCard<'a> {
    name: &'a str,
    text: &'a str,
    stars: Vec<&'static str>,
}

#[derive(Template)]
#[template(path = "tour.html")]
struct TourTemplate<'a> {
    page: Page<'a>,
    tour: &'a Tour,
    start: &'a str,
    next_date: String,
    paragraphs: Vec<&'a str>,
    guides: Vec<GuideRow<'a>>,
    reviews: Vec<ReviewCard<'a>>,
}

/// Detail page; the booking button needs a session
pub fn tour_page(detail: &TourDetail, user: Option<&User>) -> PageResult {
    let tour = &detail.tour;
    let guides = detail
        .guides()
        .into_iter()
        .map(|guide| GuideRow {
            guide,
            label: match guide.role.as_str() {
                "lead-guide" => "Lead guide",
                _ => "Tour guide",
            },
        })
        .collect();
    let reviews = detail
        .reviews
        .iter()
        .map(|review| ReviewCard {
            name: detail.reviewer_name(review).unwrap_or("Former user"),
            text: &review.review,
            stars: (1..=5)
                .map(|star| if review.rating >= f64::from(star) { "active" } else { "inactive" })
                .collect(),
        })
        .collect();

    render(&TourTemplate {
        page: Page::new(format!("{} Tour", tour.name), user),
        tour,
        start: start_description(tour),
        next_date: next_date(tour),
        paragraphs: tour
            .description
            .as_deref()
            .unwrap_or("")
            .split('\n')
            .filter(|paragraph| !paragraph.trim().is_empty())
            .collect(),
        guides,
        reviews,
    })
}
