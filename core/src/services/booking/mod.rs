//! Checkout and bookings

mod service;

#[cfg(test)]
mod tests;

pub use service::{BookingService, CheckoutUrls};
