//! Restaurant Data

use crate::ids::RestaurantId;

/// New Restaurant Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewRestaurant {
    /// UUID to assign to the restaurant row.
    pub uuid: RestaurantId,

    /// Restaurant name to persist.
    pub name: String,
}
