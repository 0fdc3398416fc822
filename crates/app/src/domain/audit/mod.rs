//! Audit
//!
//! Append-only log of staff actions. Entries are never updated or deleted
//! by the application role.

pub mod errors;
pub mod models;
pub(crate) mod repository;
pub mod service;

pub use errors::AuditServiceError;
pub use service::*;
