//! Categories Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::{
    domain::menu::models::{Category, NewCategory},
    ids::CategoryId,
};

const LIST_CATEGORIES_SQL: &str = include_str!("../sql/list_categories.sql");
const GET_CATEGORY_SQL: &str = include_str!("../sql/get_category.sql");
const CREATE_CATEGORY_SQL: &str = include_str!("../sql/create_category.sql");
const SET_CATEGORY_ACTIVE_SQL: &str = include_str!("../sql/set_category_active.sql");
const SET_CATEGORY_DISPLAY_ORDER_SQL: &str =
    include_str!("../sql/set_category_display_order.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCategoriesRepository;

impl PgCategoriesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_categories(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        is_active: Option<bool>,
    ) -> Result<Vec<Category>, sqlx::Error> {
        query_as::<Postgres, Category>(LIST_CATEGORIES_SQL)
            .bind(is_active)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_category(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        category: CategoryId,
    ) -> Result<Category, sqlx::Error> {
        query_as::<Postgres, Category>(GET_CATEGORY_SQL)
            .bind(category.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_category(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        category: NewCategory,
    ) -> Result<Category, sqlx::Error> {
        query_as::<Postgres, Category>(CREATE_CATEGORY_SQL)
            .bind(category.uuid.into_uuid())
            .bind(category.name)
            .bind(category.description)
            .bind(category.display_order)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn set_active(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        category: CategoryId,
        active: bool,
    ) -> Result<Category, sqlx::Error> {
        query_as::<Postgres, Category>(SET_CATEGORY_ACTIVE_SQL)
            .bind(category.into_uuid())
            .bind(active)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn set_display_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        category: CategoryId,
        display_order: i32,
    ) -> Result<Category, sqlx::Error> {
        query_as::<Postgres, Category>(SET_CATEGORY_DISPLAY_ORDER_SQL)
            .bind(category.into_uuid())
            .bind(display_order)
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for Category {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CategoryId::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            display_order: row.try_get("display_order")?,
            is_active: row.try_get("is_active")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
