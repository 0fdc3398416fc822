//! Location Models

use jiff::Timestamp;

use crate::ids::LocationId;

/// Location Record
#[derive(Debug, Clone)]
pub struct LocationRecord {
    pub uuid: LocationId,
    pub name: String,
    pub slug: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub phone: String,
    pub email: String,
    pub is_active: bool,
    /// Opening hours keyed by weekday, stored as-is.
    pub business_hours: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// New Location Model
#[derive(Debug, Clone)]
pub struct NewLocation {
    pub uuid: LocationId,
    pub name: String,
    pub slug: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub phone: String,
    pub email: String,
    pub business_hours: serde_json::Value,
}

/// Partial location update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct LocationUpdate {
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub business_hours: Option<serde_json::Value>,
}
