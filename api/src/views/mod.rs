//! Server-rendered HTML pages.
//!
//! Templates live in `api/templates` and extend `base.html`; askama escapes
//! every interpolated value. Each page function fills a template struct and
//! renders it to a complete document.

mod account;
mod tours;

pub use account::{account_page, login_page, signup_page};
pub use tours::{overview_page, tour_page};

use askama::Template;

use tours_core::domain::entities::User;

use crate::handlers::ApiError;

/// Banner shown after the payment provider redirects back
pub const BOOKING_ALERT: &str = "Your booking was successful! Please check your email for a \
     confirmation. If your booking doesn't show up here immediately, please come back later.";

pub type PageResult = Result<String, ApiError>;

/// Maps the `alert` query value to its banner text
pub fn alert_message(alert: Option<&str>) -> Option<&'static str> {
    match alert {
        Some("booking") => Some(BOOKING_ALERT),
        _ => None,
    }
}

/// Values every page hands to `base.html`
pub struct Page<'a> {
    pub title: String,
    pub user: Option<&'a User>,
    pub alert: Option<&'a str>,
}

impl<'a> Page<'a> {
    pub fn new(title: impl Into<String>, user: Option<&'a User>) -> Self {
        Self {
            title: title.into(),
            user,
            alert: None,
        }
    }

    pub fn with_alert(mut self, alert: Option<&'a str>) -> Self {
        self.alert = alert;
        self
    }
}

fn render<T: Template>(template: &T) -> PageResult {
    template
        .render()
        .map_err(|e| ApiError::Internal(format!("template rendering failed: {e}")))
}

#[derive(Template)]
#[template(path = "error.html")]
struct ErrorTemplate<'a> {
    page: Page<'a>,
    message: &'a str,
}

pub fn error_page(message: &str, user: Option<&User>) -> PageResult {
    render(&ErrorTemplate {
        page: Page::new("Something went wrong!", user),
        message,
    })
}
