//! Tour reads with guides and reviews populated

mod service;

#[cfg(test)]
mod tests;

pub use service::{TourDetail, TourService};
