//! Restaurants Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, PgPool, Postgres, Row, postgres::PgRow, query_as};

use crate::{
    domain::restaurants::{data::NewRestaurant, records::RestaurantRecord},
    ids::RestaurantId,
};

const CREATE_RESTAURANT_SQL: &str = include_str!("sql/create_restaurant.sql");
const GET_RESTAURANT_SQL: &str = include_str!("sql/get_restaurant.sql");

/// PostgreSQL-backed restaurants repository.
///
/// Restaurants are the tenancy root, so this repository works directly on
/// the pool rather than on a restaurant-scoped transaction.
#[derive(Debug, Clone)]
pub(crate) struct PgRestaurantsRepository {
    pool: PgPool,
}

impl PgRestaurantsRepository {
    #[must_use]
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub(crate) async fn create_restaurant(
        &self,
        restaurant: NewRestaurant,
    ) -> Result<RestaurantRecord, sqlx::Error> {
        query_as::<Postgres, RestaurantRecord>(CREATE_RESTAURANT_SQL)
            .bind(restaurant.uuid.into_uuid())
            .bind(restaurant.name)
            .fetch_one(&self.pool)
            .await
    }

    pub(crate) async fn get_restaurant(
        &self,
        restaurant: RestaurantId,
    ) -> Result<RestaurantRecord, sqlx::Error> {
        query_as::<Postgres, RestaurantRecord>(GET_RESTAURANT_SQL)
            .bind(restaurant.into_uuid())
            .fetch_one(&self.pool)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for RestaurantRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: RestaurantId::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
