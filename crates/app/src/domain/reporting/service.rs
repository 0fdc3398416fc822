//! Reporting service.

use async_trait::async_trait;
use jiff::{SignedDuration, Timestamp, tz::TimeZone};
use mockall::automock;

use crate::{
    database::Db,
    domain::{
        orders::repositories::PgOrdersRepository,
        reporting::{
            errors::ReportingServiceError,
            repository::PgReportingRepository,
            rollup::{self, DashboardSnapshot, ReportPeriod, SalesReport, TopItem},
        },
    },
    ids::RestaurantId,
};

#[derive(Debug, Clone)]
pub struct PgReportingService {
    db: Db,
    repository: PgReportingRepository,
    orders_repository: PgOrdersRepository,
}

impl PgReportingService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgReportingRepository::new(),
            orders_repository: PgOrdersRepository::new(),
        }
    }
}

fn start_of_utc_day(now: Timestamp) -> Timestamp {
    let today = now.to_zoned(TimeZone::UTC).date();

    today
        .to_zoned(TimeZone::UTC)
        .map_or(now, |start_of_day| start_of_day.timestamp())
}

#[async_trait]
impl ReportingService for PgReportingService {
    async fn dashboard(
        &self,
        restaurant: RestaurantId,
    ) -> Result<DashboardSnapshot, ReportingServiceError> {
        let mut tx = self.db.begin_restaurant_transaction(restaurant).await?;

        let now = Timestamp::now();
        let from = start_of_utc_day(now);
        let to = from + SignedDuration::from_hours(24);

        let digests = self.repository.order_digests(&mut tx, from, to).await?;
        let active_orders = self.orders_repository.count_active(&mut tx).await?;
        let active_menu_items = self.repository.count_active_menu_items(&mut tx).await?;

        tx.commit().await?;

        let today = now.to_zoned(TimeZone::UTC).date();
        let (todays_orders, todays_revenue) = rollup::day_totals(&digests, today);

        Ok(DashboardSnapshot {
            todays_orders,
            todays_revenue,
            active_orders: u64::try_from(active_orders).unwrap_or(0),
            active_menu_items: u64::try_from(active_menu_items).unwrap_or(0),
        })
    }

    async fn sales(
        &self,
        restaurant: RestaurantId,
        period: ReportPeriod,
    ) -> Result<SalesReport, ReportingServiceError> {
        let mut tx = self.db.begin_restaurant_transaction(restaurant).await?;

        let now = Timestamp::now();
        let digests = self
            .repository
            .order_digests(&mut tx, period.start(now), now)
            .await?;

        tx.commit().await?;

        Ok(rollup::sales_report(&digests))
    }

    async fn menu(
        &self,
        restaurant: RestaurantId,
        period: ReportPeriod,
    ) -> Result<Vec<TopItem>, ReportingServiceError> {
        let mut tx = self.db.begin_restaurant_transaction(restaurant).await?;

        let now = Timestamp::now();
        let lines = self
            .repository
            .completed_lines(&mut tx, period.start(now), now)
            .await?;

        tx.commit().await?;

        Ok(rollup::menu_report(&lines))
    }
}

#[automock]
#[async_trait]
/// Read-only aggregation over one restaurant's data.
pub trait ReportingService: Send + Sync {
    /// Today's headline numbers plus current active counts.
    async fn dashboard(
        &self,
        restaurant: RestaurantId,
    ) -> Result<DashboardSnapshot, ReportingServiceError>;

    /// Daily sales series and hourly histogram over the period.
    async fn sales(
        &self,
        restaurant: RestaurantId,
        period: ReportPeriod,
    ) -> Result<SalesReport, ReportingServiceError>;

    /// Top-selling menu items over the period, by quantity.
    async fn menu(
        &self,
        restaurant: RestaurantId,
        period: ReportPeriod,
    ) -> Result<Vec<TopItem>, ReportingServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::{
            menu::{MenuService, models::NewMenuItem},
            orders::{
                OrdersService,
                models::{NewOrder, NewOrderItem},
                status::OrderStatus,
            },
        },
        ids::{MenuItemId, OrderId, OrderItemId},
        test::TestContext,
    };

    use super::*;

    async fn seeded_item(ctx: &TestContext, name: &str, price: u64) -> MenuItemId {
        let uuid = MenuItemId::new();

        ctx.menu
            .create_item(
                ctx.restaurant,
                NewMenuItem {
                    uuid,
                    category_uuid: None,
                    name: name.to_string(),
                    description: None,
                    price,
                },
            )
            .await
            .expect("menu item should be created");

        uuid
    }

    async fn completed_order(ctx: &TestContext, item: MenuItemId, quantity: u32) {
        let order = ctx
            .orders
            .create_order(
                ctx.restaurant,
                NewOrder {
                    uuid: OrderId::new(),
                    customer_name: "Ada Castillo".to_string(),
                    customer_email: None,
                    phone: "555-0100".to_string(),
                    delivery_address: None,
                    notes: None,
                    items: vec![NewOrderItem {
                        uuid: OrderItemId::new(),
                        menu_item_uuid: item,
                        quantity,
                        notes: None,
                    }],
                },
                ctx.staff_uuid,
            )
            .await
            .expect("order should be created");

        for status in [
            OrderStatus::Confirmed,
            OrderStatus::Preparing,
            OrderStatus::Ready,
            OrderStatus::Completed,
        ] {
            ctx.orders
                .update_status(ctx.restaurant, order.uuid, status, ctx.staff_uuid)
                .await
                .expect("status update should succeed");
        }
    }

    #[tokio::test]
    async fn dashboard_is_all_zero_for_an_empty_restaurant() -> TestResult {
        let ctx = TestContext::new().await;

        let snapshot = ctx.reporting.dashboard(ctx.restaurant).await?;

        assert_eq!(snapshot, DashboardSnapshot::default());

        Ok(())
    }

    #[tokio::test]
    async fn dashboard_counts_todays_orders_and_active_rows() -> TestResult {
        let ctx = TestContext::new().await;
        let margherita = seeded_item(&ctx, "Margherita", 1000).await;

        completed_order(&ctx, margherita, 2).await;

        ctx.orders
            .create_order(
                ctx.restaurant,
                NewOrder {
                    uuid: OrderId::new(),
                    customer_name: "Ada Castillo".to_string(),
                    customer_email: None,
                    phone: "555-0100".to_string(),
                    delivery_address: None,
                    notes: None,
                    items: vec![NewOrderItem {
                        uuid: OrderItemId::new(),
                        menu_item_uuid: margherita,
                        quantity: 1,
                        notes: None,
                    }],
                },
                ctx.staff_uuid,
            )
            .await?;

        let snapshot = ctx.reporting.dashboard(ctx.restaurant).await?;

        assert_eq!(snapshot.todays_orders, 2);
        assert_eq!(snapshot.todays_revenue, 2000);
        assert_eq!(snapshot.active_orders, 1);
        assert_eq!(snapshot.active_menu_items, 1);

        Ok(())
    }

    #[tokio::test]
    async fn sales_report_reflects_created_orders() -> TestResult {
        let ctx = TestContext::new().await;
        let margherita = seeded_item(&ctx, "Margherita", 1500).await;

        completed_order(&ctx, margherita, 2).await;

        let report = ctx
            .reporting
            .sales(ctx.restaurant, ReportPeriod::Last7Days)
            .await?;

        assert_eq!(report.total_orders, 1);
        assert_eq!(report.total_revenue, 3000);
        assert_eq!(report.average_order_value, 3000);
        assert_eq!(report.daily.len(), 1);
        assert_eq!(report.hourly.iter().sum::<u64>(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn menu_report_ranks_completed_items() -> TestResult {
        let ctx = TestContext::new().await;
        let margherita = seeded_item(&ctx, "Margherita", 1000).await;
        let tiramisu = seeded_item(&ctx, "Tiramisu", 600).await;

        completed_order(&ctx, margherita, 3).await;
        completed_order(&ctx, tiramisu, 1).await;

        let report = ctx
            .reporting
            .menu(ctx.restaurant, ReportPeriod::Last30Days)
            .await?;

        assert_eq!(report.len(), 2);
        assert_eq!(report[0].name, "Margherita");
        assert_eq!(report[0].quantity, 3);
        assert_eq!(report[0].revenue, 3000);
        assert_eq!(report[1].name, "Tiramisu");

        Ok(())
    }

    #[tokio::test]
    async fn reports_are_scoped_to_one_restaurant() -> TestResult {
        let ctx = TestContext::new().await;
        let other = ctx.create_restaurant("Other Place").await?;
        let margherita = seeded_item(&ctx, "Margherita", 1000).await;

        completed_order(&ctx, margherita, 1).await;

        let report = ctx.reporting.sales(other, ReportPeriod::Last7Days).await?;

        assert_eq!(report.total_orders, 0);

        Ok(())
    }
}
