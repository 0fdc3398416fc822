//! Orders service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use rustc_hash::FxHashMap;
use serde_json::json;

use crate::{
    database::Db,
    domain::{
        audit::{
            AuditService,
            models::{AuditResource, NewAuditEntry},
        },
        menu::repositories::PgMenuItemsRepository,
        orders::{
            errors::OrdersServiceError,
            models::{NewOrder, Order, OrderFilters, OrderItem, OrderStats, StatsPeriod},
            repositories::{PgOrderItemsRepository, PgOrdersRepository},
            status::OrderStatus,
        },
    },
    ids::{AuditLogId, OrderId, RestaurantId, StaffId},
    notifications::{NotificationQueue, OrderNotification},
};

pub struct PgOrdersService {
    db: Db,
    orders_repository: PgOrdersRepository,
    items_repository: PgOrderItemsRepository,
    menu_items_repository: PgMenuItemsRepository,
    audit: Arc<dyn AuditService>,
    notifications: NotificationQueue,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db, audit: Arc<dyn AuditService>, notifications: NotificationQueue) -> Self {
        Self {
            db,
            orders_repository: PgOrdersRepository::new(),
            items_repository: PgOrderItemsRepository::new(),
            menu_items_repository: PgMenuItemsRepository::new(),
            audit,
            notifications,
        }
    }

    /// Audit failures are logged and swallowed; they never fail the
    /// order operation they describe.
    async fn record_audit(&self, restaurant: RestaurantId, entry: NewAuditEntry) {
        if let Err(error) = self.audit.record(restaurant, entry).await {
            tracing::warn!(%error, "failed to record audit entry");
        }
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    #[tracing::instrument(skip(self, order), fields(%restaurant, order = %order.uuid))]
    async fn create_order(
        &self,
        restaurant: RestaurantId,
        order: NewOrder,
        staff: StaffId,
    ) -> Result<Order, OrdersServiceError> {
        if order.items.is_empty() {
            return Err(OrdersServiceError::EmptyOrder);
        }

        let mut tx = self.db.begin_restaurant_transaction(restaurant).await?;

        let requested: Vec<_> = order.items.iter().map(|item| item.menu_item_uuid).collect();

        let menu_items = self
            .menu_items_repository
            .get_items(&mut tx, &requested)
            .await?;

        let by_uuid: FxHashMap<_, _> = menu_items
            .iter()
            .map(|item| (item.uuid, item))
            .collect();

        let missing: Vec<_> = requested
            .iter()
            .copied()
            .filter(|uuid| !by_uuid.contains_key(uuid))
            .collect();

        if !missing.is_empty() {
            return Err(OrdersServiceError::MenuItemsNotFound { ids: missing });
        }

        let unavailable: Vec<_> = menu_items
            .iter()
            .filter(|item| !item.is_orderable())
            .map(|item| item.name.clone())
            .collect();

        if !unavailable.is_empty() {
            return Err(OrdersServiceError::MenuItemsUnavailable { names: unavailable });
        }

        let mut total: u64 = 0;
        let mut lines = Vec::with_capacity(order.items.len());

        for item in &order.items {
            let price = by_uuid[&item.menu_item_uuid].price;
            total = price
                .checked_mul(u64::from(item.quantity))
                .and_then(|line_total| total.checked_add(line_total))
                .ok_or(OrdersServiceError::InvalidData)?;
            lines.push((item.clone(), price));
        }

        // The order row and its lines commit together or not at all.
        let mut created = self
            .orders_repository
            .create_order(&mut tx, &order, total)
            .await?;

        created.items = self
            .items_repository
            .create_order_items(&mut tx, order.uuid, &lines)
            .await?;

        tx.commit().await?;

        self.record_audit(
            restaurant,
            NewAuditEntry {
                uuid: AuditLogId::new(),
                action: "order.placed".to_string(),
                staff_uuid: staff,
                resource: AuditResource::Order,
                resource_uuid: created.uuid.into_uuid(),
                details: json!({
                    "total": created.total,
                    "items": created.items.len(),
                }),
            },
        )
        .await;

        self.notifications.enqueue(OrderNotification::Placed {
            restaurant,
            order: created.uuid,
            phone: created.phone.clone(),
            email: created.customer_email.clone(),
        });

        Ok(created)
    }

    async fn get_order(
        &self,
        restaurant: RestaurantId,
        order: OrderId,
    ) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin_restaurant_transaction(restaurant).await?;

        let mut found = self.orders_repository.get_order(&mut tx, order).await?;

        found.items = self
            .items_repository
            .items_for_orders(&mut tx, &[order])
            .await?;

        tx.commit().await?;

        Ok(found)
    }

    async fn list_orders(
        &self,
        restaurant: RestaurantId,
        filters: OrderFilters,
    ) -> Result<Vec<Order>, OrdersServiceError> {
        let mut tx = self.db.begin_restaurant_transaction(restaurant).await?;

        let orders = self.orders_repository.list_orders(&mut tx, filters).await?;

        let uuids: Vec<_> = orders.iter().map(|order| order.uuid).collect();
        let items = self
            .items_repository
            .items_for_orders(&mut tx, &uuids)
            .await?;

        tx.commit().await?;

        Ok(attach_items(orders, items))
    }

    #[tracing::instrument(skip(self), fields(%restaurant, %order, %status))]
    async fn update_status(
        &self,
        restaurant: RestaurantId,
        order: OrderId,
        status: OrderStatus,
        staff: StaffId,
    ) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin_restaurant_transaction(restaurant).await?;

        let current = self.orders_repository.get_order(&mut tx, order).await?;

        if !current.status.can_transition_to(status) {
            return Err(OrdersServiceError::InvalidTransition {
                from: current.status,
                to: status,
            });
        }

        let mut updated = self
            .orders_repository
            .update_status(&mut tx, order, status)
            .await?;

        updated.items = self
            .items_repository
            .items_for_orders(&mut tx, &[order])
            .await?;

        tx.commit().await?;

        self.record_audit(
            restaurant,
            NewAuditEntry {
                uuid: AuditLogId::new(),
                action: "order.status_changed".to_string(),
                staff_uuid: staff,
                resource: AuditResource::Order,
                resource_uuid: order.into_uuid(),
                details: json!({
                    "from": current.status.as_str(),
                    "to": status.as_str(),
                }),
            },
        )
        .await;

        self.notifications.enqueue(OrderNotification::StatusChanged {
            restaurant,
            order,
            status,
        });

        Ok(updated)
    }

    #[tracing::instrument(skip(self, reason), fields(%restaurant, %order))]
    async fn cancel_order(
        &self,
        restaurant: RestaurantId,
        order: OrderId,
        reason: String,
        staff: StaffId,
    ) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin_restaurant_transaction(restaurant).await?;

        let current = self.orders_repository.get_order(&mut tx, order).await?;

        if !current.status.is_cancellable() {
            return Err(OrdersServiceError::NotCancellable {
                status: current.status,
            });
        }

        let note = format!("Cancellation reason: {reason}");
        let notes = match current.notes {
            Some(existing) => Some(format!("{existing}\n{note}")),
            None => Some(note),
        };

        let mut cancelled = self
            .orders_repository
            .cancel_order(&mut tx, order, notes)
            .await?;

        cancelled.items = self
            .items_repository
            .items_for_orders(&mut tx, &[order])
            .await?;

        tx.commit().await?;

        self.record_audit(
            restaurant,
            NewAuditEntry {
                uuid: AuditLogId::new(),
                action: "order.cancelled".to_string(),
                staff_uuid: staff,
                resource: AuditResource::Order,
                resource_uuid: order.into_uuid(),
                details: json!({
                    "from": current.status.as_str(),
                    "reason": reason,
                }),
            },
        )
        .await;

        self.notifications.enqueue(OrderNotification::StatusChanged {
            restaurant,
            order,
            status: OrderStatus::Cancelled,
        });

        Ok(cancelled)
    }

    async fn order_stats(
        &self,
        restaurant: RestaurantId,
        period: StatsPeriod,
    ) -> Result<OrderStats, OrdersServiceError> {
        let mut tx = self.db.begin_restaurant_transaction(restaurant).await?;

        let since = period.start(jiff::Timestamp::now());
        let orders = self.orders_repository.orders_since(&mut tx, since).await?;

        tx.commit().await?;

        let mut stats = OrderStats::default();

        for order in &orders {
            stats.total_orders += 1;
            stats.by_status.bump(order.status);

            if order.status == OrderStatus::Completed {
                stats.revenue = stats.revenue.saturating_add(order.total);
            }
        }

        let completed = stats.by_status.completed;
        stats.average_order_value = if completed == 0 {
            0
        } else {
            stats.revenue / completed
        };

        Ok(stats)
    }
}

fn attach_items(orders: Vec<Order>, items: Vec<OrderItem>) -> Vec<Order> {
    let mut by_order: FxHashMap<OrderId, Vec<OrderItem>> = FxHashMap::default();

    for item in items {
        by_order.entry(item.order_uuid).or_default().push(item);
    }

    orders
        .into_iter()
        .map(|mut order| {
            order.items = by_order.remove(&order.uuid).unwrap_or_default();
            order
        })
        .collect()
}

#[automock]
#[async_trait]
/// Order intake, lifecycle transitions, and per-restaurant statistics.
pub trait OrdersService: Send + Sync {
    /// Creates a new order in `pending` status.
    ///
    /// The total is the sum of the current menu prices times quantities;
    /// each line stores its unit price snapshot. Items must exist and be
    /// both active and available.
    async fn create_order(
        &self,
        restaurant: RestaurantId,
        order: NewOrder,
        staff: StaffId,
    ) -> Result<Order, OrdersServiceError>;

    /// Retrieves one order with its lines.
    async fn get_order(
        &self,
        restaurant: RestaurantId,
        order: OrderId,
    ) -> Result<Order, OrdersServiceError>;

    /// Lists orders matching the given filters, newest first.
    async fn list_orders(
        &self,
        restaurant: RestaurantId,
        filters: OrderFilters,
    ) -> Result<Vec<Order>, OrdersServiceError>;

    /// Moves an order to `status` when the transition table allows it.
    async fn update_status(
        &self,
        restaurant: RestaurantId,
        order: OrderId,
        status: OrderStatus,
        staff: StaffId,
    ) -> Result<Order, OrdersServiceError>;

    /// Cancels an order, recording the reason in its notes.
    async fn cancel_order(
        &self,
        restaurant: RestaurantId,
        order: OrderId,
        reason: String,
        staff: StaffId,
    ) -> Result<Order, OrdersServiceError>;

    /// Aggregate statistics over orders created within the period.
    async fn order_stats(
        &self,
        restaurant: RestaurantId,
        period: StatsPeriod,
    ) -> Result<OrderStats, OrdersServiceError>;
}
