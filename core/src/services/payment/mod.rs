//! Outbound payment gateway port

mod traits;
mod types;

pub use traits::PaymentGatewayTrait;
pub use types::{CheckoutRequest, CheckoutSession, CompletedCheckout};
