//! Order Models

use jiff::Timestamp;

use crate::{
    domain::orders::status::OrderStatus,
    ids::{MenuItemId, OrderId, OrderItemId},
};

/// Order Model
#[derive(Debug, Clone)]
pub struct Order {
    pub uuid: OrderId,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub phone: String,
    pub delivery_address: Option<String>,
    pub notes: Option<String>,
    /// Total in minor currency units, fixed at creation time.
    pub total: u64,
    pub status: OrderStatus,
    pub items: Vec<OrderItem>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Order Item Model
///
/// `price` is a snapshot of the menu item price at order time.
#[derive(Debug, Clone)]
pub struct OrderItem {
    pub uuid: OrderItemId,
    pub order_uuid: OrderId,
    pub menu_item_uuid: MenuItemId,
    pub quantity: u32,
    pub price: u64,
    pub notes: Option<String>,
}

/// New Order Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub uuid: OrderId,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub phone: String,
    pub delivery_address: Option<String>,
    pub notes: Option<String>,
    pub items: Vec<NewOrderItem>,
}

/// New Order Item Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrderItem {
    pub uuid: OrderItemId,
    pub menu_item_uuid: MenuItemId,
    pub quantity: u32,
    pub notes: Option<String>,
}

/// Order listing filters; `None` fields are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OrderFilters {
    pub status: Option<OrderStatus>,
    pub from: Option<Timestamp>,
    pub to: Option<Timestamp>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Reporting window for order statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsPeriod {
    Today,
    Last7Days,
    Last30Days,
}

impl StatsPeriod {
    /// Start of the window, measured back from `now` in UTC.
    #[must_use]
    pub fn start(self, now: Timestamp) -> Timestamp {
        match self {
            Self::Today => {
                let today = now.to_zoned(jiff::tz::TimeZone::UTC).date();
                today
                    .to_zoned(jiff::tz::TimeZone::UTC)
                    .map_or(now, |start_of_day| start_of_day.timestamp())
            }
            Self::Last7Days => now - jiff::SignedDuration::from_hours(7 * 24),
            Self::Last30Days => now - jiff::SignedDuration::from_hours(30 * 24),
        }
    }
}

/// Aggregate order statistics for one restaurant within a period.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderStats {
    pub total_orders: u64,
    /// Revenue from completed orders only, in minor currency units.
    pub revenue: u64,
    /// Revenue divided by completed order count; zero when nothing completed.
    pub average_order_value: u64,
    pub by_status: StatusBreakdown,
}

/// Per-status order counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusBreakdown {
    pub pending: u64,
    pub confirmed: u64,
    pub preparing: u64,
    pub ready: u64,
    pub out_for_delivery: u64,
    pub completed: u64,
    pub cancelled: u64,
}

impl StatusBreakdown {
    pub fn bump(&mut self, status: OrderStatus) {
        match status {
            OrderStatus::Pending => self.pending += 1,
            OrderStatus::Confirmed => self.confirmed += 1,
            OrderStatus::Preparing => self.preparing += 1,
            OrderStatus::Ready => self.ready += 1,
            OrderStatus::OutForDelivery => self.out_for_delivery += 1,
            OrderStatus::Completed => self.completed += 1,
            OrderStatus::Cancelled => self.cancelled += 1,
        }
    }

    #[must_use]
    pub fn get(&self, status: OrderStatus) -> u64 {
        match status {
            OrderStatus::Pending => self.pending,
            OrderStatus::Confirmed => self.confirmed,
            OrderStatus::Preparing => self.preparing,
            OrderStatus::Ready => self.ready,
            OrderStatus::OutForDelivery => self.out_for_delivery,
            OrderStatus::Completed => self.completed,
            OrderStatus::Cancelled => self.cancelled,
        }
    }
}
