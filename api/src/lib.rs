//! # Natours API
//!
//! HTTP layer of the tour-booking backend: the `/api/v1` JSON resources,
//! the server-rendered pages, the payment webhook and the middleware chain
//! in front of them.

pub mod app;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod views;

pub use app::create_app;
pub use state::{AppPorts, AppState};
