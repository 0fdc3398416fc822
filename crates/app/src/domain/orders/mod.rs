//! Orders
//!
//! Order intake and lifecycle. Status changes follow a fixed transition
//! table; totals are computed from menu item prices at creation time and
//! never recalculated afterwards.

pub mod errors;
pub mod models;
pub(crate) mod repositories;
pub mod service;
pub mod status;

pub use errors::OrdersServiceError;
pub use service::*;
pub use status::OrderStatus;
