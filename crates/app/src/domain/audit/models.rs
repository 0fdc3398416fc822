//! Audit Models

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use thiserror::Error;
use uuid::Uuid;

use crate::ids::{AuditLogId, StaffId};

/// The kind of record an audit entry refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditResource {
    Order,
    MenuItem,
    Category,
    Staff,
    Integration,
    Location,
}

impl AuditResource {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Order => "order",
            Self::MenuItem => "menu_item",
            Self::Category => "category",
            Self::Staff => "staff",
            Self::Integration => "integration",
            Self::Location => "location",
        }
    }
}

impl fmt::Display for AuditResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown audit resource: {0}")]
pub struct ParseAuditResourceError(pub String);

impl FromStr for AuditResource {
    type Err = ParseAuditResourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "order" => Ok(Self::Order),
            "menu_item" => Ok(Self::MenuItem),
            "category" => Ok(Self::Category),
            "staff" => Ok(Self::Staff),
            "integration" => Ok(Self::Integration),
            "location" => Ok(Self::Location),
            other => Err(ParseAuditResourceError(other.to_string())),
        }
    }
}

/// Audit Entry Model
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub uuid: AuditLogId,
    pub action: String,
    pub staff_uuid: StaffId,
    pub resource: AuditResource,
    pub resource_uuid: Uuid,
    pub details: serde_json::Value,
    pub created_at: Timestamp,
}

/// New Audit Entry Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewAuditEntry {
    pub uuid: AuditLogId,
    pub action: String,
    pub staff_uuid: StaffId,
    pub resource: AuditResource,
    pub resource_uuid: Uuid,
    pub details: serde_json::Value,
}
