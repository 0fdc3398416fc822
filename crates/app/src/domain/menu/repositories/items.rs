//! Menu Items Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};
use uuid::Uuid;

use crate::{
    domain::menu::models::{MenuItem, MenuItemFilters, MenuItemUpdate, NewMenuItem},
    ids::{CategoryId, MenuItemId},
};

const LIST_MENU_ITEMS_SQL: &str = include_str!("../sql/list_menu_items.sql");
const GET_MENU_ITEM_SQL: &str = include_str!("../sql/get_menu_item.sql");
const GET_MENU_ITEMS_SQL: &str = include_str!("../sql/get_menu_items.sql");
const CREATE_MENU_ITEM_SQL: &str = include_str!("../sql/create_menu_item.sql");
const UPDATE_MENU_ITEM_SQL: &str = include_str!("../sql/update_menu_item.sql");
const SET_MENU_ITEM_AVAILABILITY_SQL: &str =
    include_str!("../sql/set_menu_item_availability.sql");
const SET_MENU_ITEM_ACTIVE_SQL: &str = include_str!("../sql/set_menu_item_active.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgMenuItemsRepository;

impl PgMenuItemsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        filters: MenuItemFilters,
    ) -> Result<Vec<MenuItem>, sqlx::Error> {
        query_as::<Postgres, MenuItem>(LIST_MENU_ITEMS_SQL)
            .bind(filters.category_uuid.map(CategoryId::into_uuid))
            .bind(filters.is_active)
            .bind(filters.is_available)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        item: MenuItemId,
    ) -> Result<MenuItem, sqlx::Error> {
        query_as::<Postgres, MenuItem>(GET_MENU_ITEM_SQL)
            .bind(item.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Fetch all items whose uuid is in `items`; silently skips unknown ids.
    pub(crate) async fn get_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        items: &[MenuItemId],
    ) -> Result<Vec<MenuItem>, sqlx::Error> {
        let uuids: Vec<Uuid> = items.iter().copied().map(MenuItemId::into_uuid).collect();

        query_as::<Postgres, MenuItem>(GET_MENU_ITEMS_SQL)
            .bind(uuids)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn create_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        item: NewMenuItem,
    ) -> Result<MenuItem, sqlx::Error> {
        query_as::<Postgres, MenuItem>(CREATE_MENU_ITEM_SQL)
            .bind(item.uuid.into_uuid())
            .bind(item.category_uuid.map(CategoryId::into_uuid))
            .bind(item.name)
            .bind(item.description)
            .bind(try_into_cents(item.price)?)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        item: MenuItemId,
        update: MenuItemUpdate,
    ) -> Result<MenuItem, sqlx::Error> {
        let price = update.price.map(try_into_cents).transpose()?;

        query_as::<Postgres, MenuItem>(UPDATE_MENU_ITEM_SQL)
            .bind(item.into_uuid())
            .bind(update.name)
            .bind(update.description)
            .bind(update.category_uuid.map(CategoryId::into_uuid))
            .bind(price)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn set_availability(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        item: MenuItemId,
        available: bool,
    ) -> Result<MenuItem, sqlx::Error> {
        query_as::<Postgres, MenuItem>(SET_MENU_ITEM_AVAILABILITY_SQL)
            .bind(item.into_uuid())
            .bind(available)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn set_active(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        item: MenuItemId,
        active: bool,
    ) -> Result<MenuItem, sqlx::Error> {
        query_as::<Postgres, MenuItem>(SET_MENU_ITEM_ACTIVE_SQL)
            .bind(item.into_uuid())
            .bind(active)
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for MenuItem {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: MenuItemId::from_uuid(row.try_get("uuid")?),
            category_uuid: row
                .try_get::<Option<Uuid>, _>("category_uuid")?
                .map(CategoryId::from_uuid),
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            price: try_get_cents(row, "price")?,
            is_active: row.try_get("is_active")?,
            is_available: row.try_get("is_available")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

pub(crate) fn try_get_cents(row: &PgRow, col: &str) -> Result<u64, sqlx::Error> {
    let cents_i64: i64 = row.try_get(col)?;

    u64::try_from(cents_i64).map_err(|e| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}

pub(crate) fn try_into_cents(cents: u64) -> Result<i64, sqlx::Error> {
    i64::try_from(cents).map_err(|e| sqlx::Error::ColumnDecode {
        index: "price".to_string(),
        source: Box::new(e),
    })
}
