//! Business services containing domain logic and use cases.

pub mod auth;
pub mod booking;
pub mod crud;
pub mod email;
pub mod payment;
pub mod populate;
pub mod rate_limit;
pub mod review;
pub mod token;
pub mod tour;
pub mod user;

#[cfg(test)]
pub(crate) mod mocks;

// Re-export commonly used types
pub use auth::{AuthService, AuthServiceConfig, SignupInput};
pub use booking::{BookingService, CheckoutUrls};
pub use crud::{CrudService, Listing};
pub use email::{Email, EmailMessage, EmailServiceTrait};
pub use payment::{CheckoutRequest, CheckoutSession, CompletedCheckout, PaymentGatewayTrait};
pub use rate_limit::{RateLimitDecision, RateLimiterTrait};
pub use review::ReviewService;
pub use token::{Claims, TokenService, TokenServiceConfig};
pub use tour::{TourDetail, TourService};
pub use user::{UpdateMeInput, UserService};
