//! Self-service account operations and user administration

mod service;


pub use service::{UpdateMeInput, UserService};
