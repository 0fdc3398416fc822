//! Locations
//!
//! Physical sites of a restaurant, with contact details and business hours.

pub mod errors;
pub mod models;
pub(crate) mod repository;
pub mod service;

pub use errors::LocationsServiceError;
pub use service::*;
