//! Pure report reductions.
//!
//! All bucketing is done in UTC.

use jiff::{Timestamp, civil::Date, tz::TimeZone};
use rustc_hash::FxHashMap;

use crate::{domain::orders::status::OrderStatus, ids::MenuItemId};

/// How many items the menu report returns.
pub const TOP_ITEMS_LIMIT: usize = 20;

/// The slice of an order the reports need.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderDigest {
    pub status: OrderStatus,
    pub total: u64,
    pub created_at: Timestamp,
}

/// One order line from a completed order, joined with its menu item name.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedLine {
    pub menu_item_uuid: MenuItemId,
    pub name: String,
    pub quantity: u64,
    pub price: u64,
}

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardSnapshot {
    pub todays_orders: u64,
    /// Completed revenue only, in minor currency units.
    pub todays_revenue: u64,
    pub active_orders: u64,
    pub active_menu_items: u64,
}

/// Reporting window length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportPeriod {
    Last7Days,
    Last30Days,
    Last90Days,
}

impl ReportPeriod {
    #[must_use]
    pub fn days(self) -> i64 {
        match self {
            Self::Last7Days => 7,
            Self::Last30Days => 30,
            Self::Last90Days => 90,
        }
    }

    #[must_use]
    pub fn start(self, now: Timestamp) -> Timestamp {
        now - jiff::SignedDuration::from_hours(self.days() * 24)
    }
}

/// One day's slice of the sales report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailySales {
    pub date: Date,
    pub orders: u64,
    /// Completed revenue only.
    pub revenue: u64,
}

/// Sales over a reporting window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalesReport {
    pub total_orders: u64,
    /// Completed revenue only.
    pub total_revenue: u64,
    /// Revenue divided by completed order count; zero when nothing completed.
    pub average_order_value: u64,
    pub daily: Vec<DailySales>,
    /// Order counts bucketed by UTC hour of creation.
    pub hourly: [u64; 24],
}

impl Default for SalesReport {
    fn default() -> Self {
        Self {
            total_orders: 0,
            total_revenue: 0,
            average_order_value: 0,
            daily: Vec::new(),
            hourly: [0; 24],
        }
    }
}

/// One row of the menu report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopItem {
    pub menu_item_uuid: MenuItemId,
    pub name: String,
    pub quantity: u64,
    pub revenue: u64,
    /// Revenue divided by quantity.
    pub average_price: u64,
}

fn utc_date(ts: Timestamp) -> Date {
    ts.to_zoned(TimeZone::UTC).date()
}

fn utc_hour(ts: Timestamp) -> usize {
    usize::try_from(ts.to_zoned(TimeZone::UTC).hour()).unwrap_or(0)
}

/// Order count and completed revenue for orders created on `date`.
#[must_use]
pub fn day_totals(digests: &[OrderDigest], date: Date) -> (u64, u64) {
    let mut orders = 0;
    let mut revenue: u64 = 0;

    for digest in digests {
        if utc_date(digest.created_at) != date {
            continue;
        }

        orders += 1;

        if digest.status == OrderStatus::Completed {
            revenue = revenue.saturating_add(digest.total);
        }
    }

    (orders, revenue)
}

/// Reduces order digests into the sales report.
#[must_use]
pub fn sales_report(digests: &[OrderDigest]) -> SalesReport {
    let mut report = SalesReport::default();
    let mut completed = 0_u64;
    let mut by_date: FxHashMap<Date, DailySales> = FxHashMap::default();

    for digest in digests {
        report.total_orders += 1;
        report.hourly[utc_hour(digest.created_at)] += 1;

        let date = utc_date(digest.created_at);
        let day = by_date.entry(date).or_insert(DailySales {
            date,
            orders: 0,
            revenue: 0,
        });
        day.orders += 1;

        if digest.status == OrderStatus::Completed {
            completed += 1;
            report.total_revenue = report.total_revenue.saturating_add(digest.total);
            day.revenue = day.revenue.saturating_add(digest.total);
        }
    }

    report.average_order_value = if completed == 0 {
        0
    } else {
        report.total_revenue / completed
    };

    report.daily = by_date.into_values().collect();
    report.daily.sort_by_key(|day| day.date);

    report
}

/// Reduces completed order lines into the top-selling items, by quantity.
#[must_use]
pub fn menu_report(lines: &[CompletedLine]) -> Vec<TopItem> {
    let mut by_item: FxHashMap<MenuItemId, TopItem> = FxHashMap::default();

    for line in lines {
        let item = by_item
            .entry(line.menu_item_uuid)
            .or_insert_with(|| TopItem {
                menu_item_uuid: line.menu_item_uuid,
                name: line.name.clone(),
                quantity: 0,
                revenue: 0,
                average_price: 0,
            });

        item.quantity = item.quantity.saturating_add(line.quantity);
        item.revenue = item
            .revenue
            .saturating_add(line.price.saturating_mul(line.quantity));
    }

    let mut items: Vec<TopItem> = by_item.into_values().collect();

    for item in &mut items {
        item.average_price = if item.quantity == 0 {
            0
        } else {
            item.revenue / item.quantity
        };
    }

    items.sort_by(|a, b| b.quantity.cmp(&a.quantity).then(a.name.cmp(&b.name)));
    items.truncate(TOP_ITEMS_LIMIT);

    items
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(time: &str) -> Timestamp {
        time.parse().expect("test timestamp should parse")
    }

    fn digest(status: OrderStatus, total: u64, time: &str) -> OrderDigest {
        OrderDigest {
            status,
            total,
            created_at: at(time),
        }
    }

    #[test]
    fn sales_report_of_nothing_is_all_zero() {
        let report = sales_report(&[]);

        assert_eq!(report, SalesReport::default());
    }

    #[test]
    fn sales_report_counts_all_orders_but_only_completed_revenue() {
        let report = sales_report(&[
            digest(OrderStatus::Completed, 3000, "2026-08-28T12:30:00Z"),
            digest(OrderStatus::Completed, 1000, "2026-08-28T19:05:00Z"),
            digest(OrderStatus::Cancelled, 9999, "2026-08-28T12:45:00Z"),
            digest(OrderStatus::Pending, 500, "2026-08-29T12:10:00Z"),
        ]);

        assert_eq!(report.total_orders, 4);
        assert_eq!(report.total_revenue, 4000);
        assert_eq!(report.average_order_value, 2000);

        assert_eq!(report.daily.len(), 2);
        assert_eq!(report.daily[0].date, "2026-08-28".parse().unwrap());
        assert_eq!(report.daily[0].orders, 3);
        assert_eq!(report.daily[0].revenue, 4000);
        assert_eq!(report.daily[1].orders, 1);
        assert_eq!(report.daily[1].revenue, 0);

        assert_eq!(report.hourly[12], 3);
        assert_eq!(report.hourly[19], 1);
        assert_eq!(report.hourly.iter().sum::<u64>(), 4);
    }

    #[test]
    fn sales_report_bucketing_is_utc() {
        let report = sales_report(&[digest(
            OrderStatus::Pending,
            100,
            "2026-08-28T23:59:59Z",
        )]);

        assert_eq!(report.daily[0].date, "2026-08-28".parse().unwrap());
        assert_eq!(report.hourly[23], 1);
    }

    #[test]
    fn day_totals_only_count_the_requested_date() {
        let digests = [
            digest(OrderStatus::Completed, 3000, "2026-08-28T12:00:00Z"),
            digest(OrderStatus::Pending, 1000, "2026-08-28T13:00:00Z"),
            digest(OrderStatus::Completed, 700, "2026-08-27T13:00:00Z"),
        ];

        let (orders, revenue) = day_totals(&digests, "2026-08-28".parse().unwrap());

        assert_eq!(orders, 2);
        assert_eq!(revenue, 3000);
    }

    #[test]
    fn menu_report_ranks_by_quantity_and_derives_average_price() {
        let pizza = MenuItemId::new();
        let salad = MenuItemId::new();

        let lines = [
            CompletedLine {
                menu_item_uuid: pizza,
                name: "Margherita".to_string(),
                quantity: 2,
                price: 1250,
            },
            CompletedLine {
                menu_item_uuid: pizza,
                name: "Margherita".to_string(),
                quantity: 3,
                price: 1350,
            },
            CompletedLine {
                menu_item_uuid: salad,
                name: "Caprese".to_string(),
                quantity: 4,
                price: 800,
            },
        ];

        let report = menu_report(&lines);

        assert_eq!(report.len(), 2);
        assert_eq!(report[0].menu_item_uuid, pizza);
        assert_eq!(report[0].quantity, 5);
        assert_eq!(report[0].revenue, 2 * 1250 + 3 * 1350);
        assert_eq!(report[0].average_price, (2 * 1250 + 3 * 1350) / 5);
        assert_eq!(report[1].menu_item_uuid, salad);
    }

    #[test]
    fn revenue_sums_saturate_instead_of_wrapping() {
        let report = sales_report(&[
            digest(OrderStatus::Completed, u64::MAX, "2026-08-28T12:00:00Z"),
            digest(OrderStatus::Completed, 10, "2026-08-28T13:00:00Z"),
        ]);

        assert_eq!(report.total_revenue, u64::MAX);
        assert_eq!(report.daily[0].revenue, u64::MAX);

        let pizza = MenuItemId::new();
        let items = menu_report(&[
            CompletedLine {
                menu_item_uuid: pizza,
                name: "Margherita".to_string(),
                quantity: 2,
                price: u64::MAX,
            },
            CompletedLine {
                menu_item_uuid: pizza,
                name: "Margherita".to_string(),
                quantity: 1,
                price: 100,
            },
        ]);

        assert_eq!(items[0].revenue, u64::MAX);
        assert_eq!(items[0].average_price, u64::MAX / 3);
    }

    #[test]
    fn menu_report_is_capped() {
        let lines: Vec<CompletedLine> = (0..30)
            .map(|i| CompletedLine {
                menu_item_uuid: MenuItemId::new(),
                name: format!("Item {i}"),
                quantity: 1,
                price: 100,
            })
            .collect();

        assert_eq!(menu_report(&lines).len(), TOP_ITEMS_LIMIT);
    }
}
