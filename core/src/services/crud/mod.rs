//! Generic create / read / update / delete operations

mod service;


pub use service::{CrudService, Listing};
