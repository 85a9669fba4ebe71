//! Outbound email port and the message templates

mod message;
mod traits;

pub use message::{html_to_text, Email, EmailMessage};
pub use traits::EmailServiceTrait;
