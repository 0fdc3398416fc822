//! Orders service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::{domain::orders::status::OrderStatus, ids::MenuItemId};

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("order record already exists")]
    AlreadyExists,

    #[error("order record not found")]
    NotFound,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("an order must contain at least one item")]
    EmptyOrder,

    #[error("menu items not found: {}", format_ids(ids))]
    MenuItemsNotFound { ids: Vec<MenuItemId> },

    #[error("menu items unavailable: {}", names.join(", "))]
    MenuItemsUnavailable { names: Vec<String> },

    #[error("invalid status transition from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("cannot cancel order in {status} status")]
    NotCancellable { status: OrderStatus },

    #[error("storage error")]
    Sql(#[source] Error),
}

fn format_ids(ids: &[MenuItemId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<Error> for OrdersServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}
