//! Staff Models

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use thiserror::Error;

use crate::ids::StaffId;

/// Role of a staff member within one restaurant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaffRole {
    Owner,
    Manager,
    Staff,
    Kitchen,
}

impl StaffRole {
    pub const ALL: [Self; 4] = [Self::Owner, Self::Manager, Self::Staff, Self::Kitchen];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Manager => "manager",
            Self::Staff => "staff",
            Self::Kitchen => "kitchen",
        }
    }

    /// Owners and managers administer the restaurant.
    #[must_use]
    pub fn is_admin(self) -> bool {
        matches!(self, Self::Owner | Self::Manager)
    }
}

impl fmt::Display for StaffRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown staff role: {0}")]
pub struct ParseStaffRoleError(pub String);

impl FromStr for StaffRole {
    type Err = ParseStaffRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(Self::Owner),
            "manager" => Ok(Self::Manager),
            "staff" => Ok(Self::Staff),
            "kitchen" => Ok(Self::Kitchen),
            other => Err(ParseStaffRoleError(other.to_string())),
        }
    }
}

/// The full permission set; there are exactly these three switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StaffPermissions {
    pub can_manage_orders: bool,
    pub can_manage_menu: bool,
    pub can_view_reports: bool,
}

impl StaffPermissions {
    /// Everything granted; the default for owners.
    #[must_use]
    pub fn all() -> Self {
        Self {
            can_manage_orders: true,
            can_manage_menu: true,
            can_view_reports: true,
        }
    }
}

/// Partial permissions update; `None` switches are left unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PermissionsUpdate {
    pub can_manage_orders: Option<bool>,
    pub can_manage_menu: Option<bool>,
    pub can_view_reports: Option<bool>,
}

/// Staff Record
#[derive(Debug, Clone)]
pub struct StaffRecord {
    pub uuid: StaffId,
    pub email: String,
    pub name: String,
    pub role: StaffRole,
    pub permissions: StaffPermissions,
    pub is_active: bool,
    pub last_login: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// New Staff Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewStaff {
    pub uuid: StaffId,
    pub email: String,
    pub name: String,
    pub role: StaffRole,
    pub permissions: StaffPermissions,
}

/// Partial profile update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaffProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Staff listing filters; `None` fields are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StaffFilters {
    pub role: Option<StaffRole>,
    pub is_active: Option<bool>,
}

/// Headcount summary for one restaurant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StaffStats {
    pub total: u64,
    /// Owners and managers.
    pub admins: u64,
    /// Everyone else.
    pub members: u64,
    pub active: u64,
}
