//! Menu Models

use jiff::Timestamp;

use crate::ids::{CategoryId, MenuItemId};

/// Menu Item Model
#[derive(Debug, Clone)]
pub struct MenuItem {
    pub uuid: MenuItemId,
    pub category_uuid: Option<CategoryId>,
    pub name: String,
    pub description: Option<String>,
    /// Price in minor currency units (cents).
    pub price: u64,
    pub is_active: bool,
    pub is_available: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl MenuItem {
    /// Whether the item may appear on a new order.
    #[must_use]
    pub fn is_orderable(&self) -> bool {
        self.is_active && self.is_available
    }
}

/// New Menu Item Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewMenuItem {
    pub uuid: MenuItemId,
    pub category_uuid: Option<CategoryId>,
    pub name: String,
    pub description: Option<String>,
    pub price: u64,
}

/// Partial menu item update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MenuItemUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category_uuid: Option<CategoryId>,
    pub price: Option<u64>,
}

/// Menu item listing filters; `None` fields are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MenuItemFilters {
    pub category_uuid: Option<CategoryId>,
    pub is_active: Option<bool>,
    pub is_available: Option<bool>,
}

/// Category Model
#[derive(Debug, Clone)]
pub struct Category {
    pub uuid: CategoryId,
    pub name: String,
    pub description: Option<String>,
    pub display_order: i32,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// New Category Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewCategory {
    pub uuid: CategoryId,
    pub name: String,
    pub description: Option<String>,
    pub display_order: i32,
}
