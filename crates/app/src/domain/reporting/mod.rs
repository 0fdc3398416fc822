//! Reporting
//!
//! Dashboard and report aggregation. Rows are fetched with slim read-only
//! queries and reduced in memory by pure rollup functions.

pub mod errors;
pub(crate) mod repository;
pub mod rollup;
pub mod service;

pub use errors::ReportingServiceError;
pub use service::*;
