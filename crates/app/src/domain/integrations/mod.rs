//! Integrations
//!
//! Third-party provider connections (delivery, email, messaging, payment).
//! Credentials are held in zeroizing buffers in memory and never logged.

pub mod errors;
pub mod models;
pub(crate) mod repository;
pub mod service;

pub use errors::IntegrationsServiceError;
pub use service::*;
