//! Order Items Repository

use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};
use uuid::Uuid;

use crate::{
    domain::{
        menu::repositories::{try_get_cents, try_into_cents},
        orders::models::{NewOrderItem, OrderItem},
    },
    ids::{MenuItemId, OrderId, OrderItemId},
};

const ITEMS_FOR_ORDERS_SQL: &str = include_str!("../sql/items_for_orders.sql");
const CREATE_ORDER_ITEMS_SQL: &str = include_str!("../sql/create_order_items.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrderItemsRepository;

impl PgOrderItemsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn items_for_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        orders: &[OrderId],
    ) -> Result<Vec<OrderItem>, sqlx::Error> {
        let uuids: Vec<Uuid> = orders.iter().copied().map(OrderId::into_uuid).collect();

        query_as::<Postgres, OrderItem>(ITEMS_FOR_ORDERS_SQL)
            .bind(uuids)
            .fetch_all(&mut **tx)
            .await
    }

    /// Inserts all lines for one order in a single multi-row statement.
    ///
    /// `items` pairs each line with the unit price snapshot taken from the
    /// menu at order time.
    pub(crate) async fn create_order_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderId,
        items: &[(NewOrderItem, u64)],
    ) -> Result<Vec<OrderItem>, sqlx::Error> {
        let mut uuids = Vec::with_capacity(items.len());
        let mut menu_item_uuids = Vec::with_capacity(items.len());
        let mut quantities = Vec::with_capacity(items.len());
        let mut prices = Vec::with_capacity(items.len());
        let mut notes = Vec::with_capacity(items.len());

        for (item, price) in items {
            uuids.push(item.uuid.into_uuid());
            menu_item_uuids.push(item.menu_item_uuid.into_uuid());
            quantities.push(i32::try_from(item.quantity).map_err(|e| {
                sqlx::Error::ColumnDecode {
                    index: "quantity".to_string(),
                    source: Box::new(e),
                }
            })?);
            prices.push(try_into_cents(*price)?);
            notes.push(item.notes.clone());
        }

        query_as::<Postgres, OrderItem>(CREATE_ORDER_ITEMS_SQL)
            .bind(order.into_uuid())
            .bind(uuids)
            .bind(menu_item_uuids)
            .bind(quantities)
            .bind(prices)
            .bind(notes)
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for OrderItem {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let quantity: i32 = row.try_get("quantity")?;
        let quantity = u32::try_from(quantity).map_err(|e| sqlx::Error::ColumnDecode {
            index: "quantity".to_string(),
            source: Box::new(e),
        })?;

        Ok(Self {
            uuid: OrderItemId::from_uuid(row.try_get("uuid")?),
            order_uuid: OrderId::from_uuid(row.try_get("order_uuid")?),
            menu_item_uuid: MenuItemId::from_uuid(row.try_get("menu_item_uuid")?),
            quantity,
            price: try_get_cents(row, "price")?,
            notes: row.try_get("notes")?,
        })
    }
}
