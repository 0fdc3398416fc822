//! Locations Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::{
    domain::locations::models::{LocationRecord, LocationUpdate, NewLocation},
    ids::LocationId,
};

const LIST_LOCATIONS_SQL: &str = include_str!("sql/list_locations.sql");
const GET_LOCATION_SQL: &str = include_str!("sql/get_location.sql");
const GET_LOCATION_BY_SLUG_SQL: &str = include_str!("sql/get_location_by_slug.sql");
const CREATE_LOCATION_SQL: &str = include_str!("sql/create_location.sql");
const UPDATE_LOCATION_SQL: &str = include_str!("sql/update_location.sql");
const SET_LOCATION_ACTIVE_SQL: &str = include_str!("sql/set_location_active.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgLocationsRepository;

impl PgLocationsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_locations(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        is_active: Option<bool>,
    ) -> Result<Vec<LocationRecord>, sqlx::Error> {
        query_as::<Postgres, LocationRecord>(LIST_LOCATIONS_SQL)
            .bind(is_active)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_location(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        location: LocationId,
    ) -> Result<LocationRecord, sqlx::Error> {
        query_as::<Postgres, LocationRecord>(GET_LOCATION_SQL)
            .bind(location.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_by_slug(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        slug: &str,
    ) -> Result<LocationRecord, sqlx::Error> {
        query_as::<Postgres, LocationRecord>(GET_LOCATION_BY_SLUG_SQL)
            .bind(slug)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_location(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        location: NewLocation,
    ) -> Result<LocationRecord, sqlx::Error> {
        query_as::<Postgres, LocationRecord>(CREATE_LOCATION_SQL)
            .bind(location.uuid.into_uuid())
            .bind(location.name)
            .bind(location.slug)
            .bind(location.address)
            .bind(location.city)
            .bind(location.state)
            .bind(location.zip_code)
            .bind(location.phone)
            .bind(location.email)
            .bind(location.business_hours)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_location(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        location: LocationId,
        update: LocationUpdate,
    ) -> Result<LocationRecord, sqlx::Error> {
        query_as::<Postgres, LocationRecord>(UPDATE_LOCATION_SQL)
            .bind(location.into_uuid())
            .bind(update.name)
            .bind(update.address)
            .bind(update.city)
            .bind(update.state)
            .bind(update.zip_code)
            .bind(update.phone)
            .bind(update.email)
            .bind(update.business_hours)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn set_active(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        location: LocationId,
        active: bool,
    ) -> Result<LocationRecord, sqlx::Error> {
        query_as::<Postgres, LocationRecord>(SET_LOCATION_ACTIVE_SQL)
            .bind(location.into_uuid())
            .bind(active)
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for LocationRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: LocationId::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            slug: row.try_get("slug")?,
            address: row.try_get("address")?,
            city: row.try_get("city")?,
            state: row.try_get("state")?,
            zip_code: row.try_get("zip_code")?,
            phone: row.try_get("phone")?,
            email: row.try_get("email")?,
            is_active: row.try_get("is_active")?,
            business_hours: row.try_get("business_hours")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
