//! Orders Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as, query_scalar};

use crate::{
    domain::{
        menu::repositories::{try_get_cents, try_into_cents},
        orders::{
            models::{NewOrder, Order, OrderFilters},
            status::OrderStatus,
        },
    },
    ids::OrderId,
};

const LIST_ORDERS_SQL: &str = include_str!("../sql/list_orders.sql");
const GET_ORDER_SQL: &str = include_str!("../sql/get_order.sql");
const CREATE_ORDER_SQL: &str = include_str!("../sql/create_order.sql");
const UPDATE_ORDER_STATUS_SQL: &str = include_str!("../sql/update_order_status.sql");
const CANCEL_ORDER_SQL: &str = include_str!("../sql/cancel_order.sql");
const ORDERS_IN_RANGE_SQL: &str = include_str!("../sql/orders_in_range.sql");
const COUNT_ACTIVE_ORDERS_SQL: &str = include_str!("../sql/count_active_orders.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Rows come back without their items; callers join those separately.
    pub(crate) async fn list_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        filters: OrderFilters,
    ) -> Result<Vec<Order>, sqlx::Error> {
        query_as::<Postgres, Order>(LIST_ORDERS_SQL)
            .bind(filters.status.map(OrderStatus::as_str))
            .bind(filters.from.map(SqlxTimestamp::from))
            .bind(filters.to.map(SqlxTimestamp::from))
            .bind(filters.limit)
            .bind(filters.offset)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderId,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: &NewOrder,
        total: u64,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(CREATE_ORDER_SQL)
            .bind(order.uuid.into_uuid())
            .bind(&order.customer_name)
            .bind(&order.customer_email)
            .bind(&order.phone)
            .bind(&order.delivery_address)
            .bind(&order.notes)
            .bind(try_into_cents(total)?)
            .bind(OrderStatus::Pending.as_str())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderId,
        status: OrderStatus,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(UPDATE_ORDER_STATUS_SQL)
            .bind(order.into_uuid())
            .bind(status.as_str())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn cancel_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderId,
        notes: Option<String>,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(CANCEL_ORDER_SQL)
            .bind(order.into_uuid())
            .bind(notes)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn orders_since(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        since: Timestamp,
    ) -> Result<Vec<Order>, sqlx::Error> {
        query_as::<Postgres, Order>(ORDERS_IN_RANGE_SQL)
            .bind(SqlxTimestamp::from(since))
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn count_active(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<i64, sqlx::Error> {
        query_scalar::<Postgres, i64>(COUNT_ACTIVE_ORDERS_SQL)
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for Order {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let status: String = row.try_get("status")?;
        let status = status
            .parse::<OrderStatus>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "status".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            uuid: OrderId::from_uuid(row.try_get("uuid")?),
            customer_name: row.try_get("customer_name")?,
            customer_email: row.try_get("customer_email")?,
            phone: row.try_get("phone")?,
            delivery_address: row.try_get("delivery_address")?,
            notes: row.try_get("notes")?,
            total: try_get_cents(row, "total")?,
            status,
            items: Vec::new(),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
