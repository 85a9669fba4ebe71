//! Reviews and the tour rating aggregate they drive

mod service;

#[cfg(test)]
mod tests;

pub use service::ReviewService;
