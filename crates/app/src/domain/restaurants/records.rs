//! Restaurant Records

use jiff::Timestamp;

use crate::ids::RestaurantId;

/// Restaurant Record
#[derive(Debug, Clone)]
pub struct RestaurantRecord {
    /// Unique restaurant identifier.
    pub uuid: RestaurantId,

    /// Human-readable restaurant name.
    pub name: String,

    /// Row creation timestamp.
    pub created_at: Timestamp,

    /// Last update timestamp.
    pub updated_at: Timestamp,
}
