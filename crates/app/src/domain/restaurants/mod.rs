//! Restaurants
//!
//! A restaurant is the tenancy boundary: every other entity belongs to
//! exactly one restaurant and is isolated by row-level security.

pub mod data;
pub mod errors;
pub mod records;
mod repository;
pub mod service;

pub use errors::RestaurantsServiceError;
pub use service::*;
