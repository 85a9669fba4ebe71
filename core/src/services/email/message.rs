//! Templated transactional emails

use askama::Template;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::entities::User;
use crate::errors::{DomainError, DomainResult};

static TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("valid tag regex"));
static BLOCK_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)</(p|h1|h2|div|tr|li)>|<br\s*/?>").expect("valid block regex"));

const WELCOME_SUBJECT: &str = "Welcome to the Natours Family!";
const RESET_SUBJECT: &str = "Your password reset token (valid for only 10 minutes)";

/// A rendered message ready for a transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
    /// Plain-text alternative derived from `html`
    pub text: String,
}

#[derive(Template)]
#[template(path = "email/welcome.html")]
struct WelcomeTemplate<'a> {
    subject: &'a str,
    first_name: &'a str,
    url: &'a str,
}

#[derive(Template)]
#[template(path = "email/password_reset.html")]
struct PasswordResetTemplate<'a> {
    subject: &'a str,
    first_name: &'a str,
    url: &'a str,
}

/// Message templates
pub struct Email;

impl Email {
    pub fn welcome(user: &User, url: &str) -> DomainResult<EmailMessage> {
        let template = WelcomeTemplate {
            subject: WELCOME_SUBJECT,
            first_name: user.first_name(),
            url,
        };
        message(user, WELCOME_SUBJECT, template.render())
    }

    pub fn password_reset(user: &User, url: &str) -> DomainResult<EmailMessage> {
        let template = PasswordResetTemplate {
            subject: RESET_SUBJECT,
            first_name: user.first_name(),
            url,
        };
        message(user, RESET_SUBJECT, template.render())
    }
}

fn message(
    user: &User,
    subject: &str,
    html: askama::Result<String>,
) -> DomainResult<EmailMessage> {
    let html = html.map_err(|e| DomainError::internal(format!("email template: {e}")))?;
    Ok(EmailMessage {
        to: user.email.clone(),
        subject: subject.to_string(),
        text: html_to_text(&html),
        html,
    })
}

/// Strips markup, keeping one line per block element
pub fn html_to_text(html: &str) -> String {
    let without_head = match (html.find("<head>"), html.find("</head>")) {
        (Some(start), Some(end)) if end > start => {
            format!("{}{}", &html[..start], &html[end + "</head>".len()..])
        }
        _ => html.to_string(),
    };
    let with_breaks = BLOCK_END.replace_all(&without_head, "\n");
    let plain = TAGS
        .replace_all(&with_breaks, "")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&#39;", "'")
        .replace("&amp;", "&");
    plain
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
