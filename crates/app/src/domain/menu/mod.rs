//! Menu
//!
//! Menu items and their categories. Items are soft-deactivated rather than
//! deleted so historical order lines keep a valid reference.

pub mod errors;
pub mod models;
pub(crate) mod repositories;
pub mod service;

pub use errors::MenuServiceError;
pub use service::*;
