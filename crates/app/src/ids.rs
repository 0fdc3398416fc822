//! Typed entity identifiers.
//!
//! Every persisted entity gets its own id newtype around a UUIDv7 so that a
//! staff id can never be passed where an order id is expected. Conversions to
//! and from the raw [`Uuid`] are explicit at the persistence boundary.

use std::fmt::{Display, Formatter, Result as FmtResult};

use uuid::Uuid;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a fresh, time-ordered id.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            #[must_use]
            pub const fn into_uuid(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
                Display::fmt(&self.0, f)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self::from_uuid(uuid)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.into_uuid()
            }
        }
    };
}

entity_id!(
    /// Identifies a restaurant, the tenancy boundary for everything else.
    RestaurantId
);

entity_id!(
    /// Identifies a menu category within a restaurant.
    CategoryId
);

entity_id!(
    /// Identifies a menu item within a restaurant.
    MenuItemId
);

entity_id!(
    /// Identifies a customer order.
    OrderId
);

entity_id!(
    /// Identifies a single line on an order.
    OrderItemId
);

entity_id!(
    /// Identifies a staff member within a restaurant.
    StaffId
);

entity_id!(
    /// Identifies an audit log entry.
    AuditLogId
);

entity_id!(
    /// Identifies a third-party integration configured for a restaurant.
    IntegrationId
);

entity_id!(
    /// Identifies a physical restaurant location.
    LocationId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_ids_are_unique() {
        assert_ne!(OrderId::new(), OrderId::new());
    }

    #[test]
    fn uuid_round_trip_preserves_value() {
        let uuid = Uuid::now_v7();
        let id = RestaurantId::from_uuid(uuid);

        assert_eq!(id.into_uuid(), uuid);
        assert_eq!(RestaurantId::from(uuid), id);
        assert_eq!(Uuid::from(id), uuid);
    }

    #[test]
    fn display_matches_inner_uuid() {
        let uuid = Uuid::now_v7();
        let id = StaffId::from_uuid(uuid);

        assert_eq!(id.to_string(), uuid.to_string());
    }

    #[test]
    fn new_ids_are_time_ordered() {
        // UUIDv7 embeds a millisecond timestamp in the high bits, so ids
        // generated in sequence sort in generation order (ties allowed
        // within the same millisecond).
        let first = AuditLogId::new();
        let second = AuditLogId::new();

        assert!(first <= second);
    }
}
