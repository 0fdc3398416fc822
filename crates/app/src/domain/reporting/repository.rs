//! Reporting Repository
//!
//! Slim read-only projections over orders and menu items; nothing here
//! mutates state.

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as, query_scalar};

use crate::{
    domain::{
        menu::repositories::try_get_cents,
        orders::status::OrderStatus,
        reporting::rollup::{CompletedLine, OrderDigest},
    },
    ids::MenuItemId,
};

const ORDER_DIGESTS_SQL: &str = include_str!("sql/order_digests.sql");
const COMPLETED_LINES_SQL: &str = include_str!("sql/completed_lines.sql");
const COUNT_ACTIVE_MENU_ITEMS_SQL: &str = include_str!("sql/count_active_menu_items.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgReportingRepository;

impl PgReportingRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn order_digests(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<Vec<OrderDigest>, sqlx::Error> {
        query_as::<Postgres, OrderDigest>(ORDER_DIGESTS_SQL)
            .bind(SqlxTimestamp::from(from))
            .bind(SqlxTimestamp::from(to))
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn completed_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<Vec<CompletedLine>, sqlx::Error> {
        query_as::<Postgres, CompletedLine>(COMPLETED_LINES_SQL)
            .bind(SqlxTimestamp::from(from))
            .bind(SqlxTimestamp::from(to))
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn count_active_menu_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<i64, sqlx::Error> {
        query_scalar::<Postgres, i64>(COUNT_ACTIVE_MENU_ITEMS_SQL)
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for OrderDigest {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let status: String = row.try_get("status")?;
        let status = status
            .parse::<OrderStatus>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "status".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            status,
            total: try_get_cents(row, "total")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for CompletedLine {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let quantity: i32 = row.try_get("quantity")?;
        let quantity = u64::try_from(quantity).map_err(|e| sqlx::Error::ColumnDecode {
            index: "quantity".to_string(),
            source: Box::new(e),
        })?;

        Ok(Self {
            menu_item_uuid: MenuItemId::from_uuid(row.try_get("menu_item_uuid")?),
            name: row.try_get("name")?,
            quantity,
            price: try_get_cents(row, "price")?,
        })
    }
}
