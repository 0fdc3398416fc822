//! Staff Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::{
    domain::staff::models::{
        NewStaff, PermissionsUpdate, StaffFilters, StaffPermissions, StaffProfileUpdate,
        StaffRecord, StaffRole,
    },
    ids::StaffId,
};

const LIST_STAFF_SQL: &str = include_str!("sql/list_staff.sql");
const GET_STAFF_SQL: &str = include_str!("sql/get_staff.sql");
const FIND_STAFF_BY_EMAIL_SQL: &str = include_str!("sql/find_staff_by_email.sql");
const CREATE_STAFF_SQL: &str = include_str!("sql/create_staff.sql");
const UPDATE_STAFF_ROLE_SQL: &str = include_str!("sql/update_staff_role.sql");
const UPDATE_STAFF_PERMISSIONS_SQL: &str = include_str!("sql/update_staff_permissions.sql");
const UPDATE_STAFF_PROFILE_SQL: &str = include_str!("sql/update_staff_profile.sql");
const SET_STAFF_ACTIVE_SQL: &str = include_str!("sql/set_staff_active.sql");
const TOUCH_LAST_LOGIN_SQL: &str = include_str!("sql/touch_last_login.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgStaffRepository;

impl PgStaffRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_staff(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        filters: StaffFilters,
    ) -> Result<Vec<StaffRecord>, sqlx::Error> {
        query_as::<Postgres, StaffRecord>(LIST_STAFF_SQL)
            .bind(filters.role.map(StaffRole::as_str))
            .bind(filters.is_active)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_staff(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        staff: StaffId,
    ) -> Result<StaffRecord, sqlx::Error> {
        query_as::<Postgres, StaffRecord>(GET_STAFF_SQL)
            .bind(staff.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn find_by_email(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        email: &str,
    ) -> Result<Option<StaffRecord>, sqlx::Error> {
        query_as::<Postgres, StaffRecord>(FIND_STAFF_BY_EMAIL_SQL)
            .bind(email)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn create_staff(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        staff: NewStaff,
    ) -> Result<StaffRecord, sqlx::Error> {
        query_as::<Postgres, StaffRecord>(CREATE_STAFF_SQL)
            .bind(staff.uuid.into_uuid())
            .bind(staff.email)
            .bind(staff.name)
            .bind(staff.role.as_str())
            .bind(staff.permissions.can_manage_orders)
            .bind(staff.permissions.can_manage_menu)
            .bind(staff.permissions.can_view_reports)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_role(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        staff: StaffId,
        role: StaffRole,
    ) -> Result<StaffRecord, sqlx::Error> {
        query_as::<Postgres, StaffRecord>(UPDATE_STAFF_ROLE_SQL)
            .bind(staff.into_uuid())
            .bind(role.as_str())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_permissions(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        staff: StaffId,
        update: PermissionsUpdate,
    ) -> Result<StaffRecord, sqlx::Error> {
        query_as::<Postgres, StaffRecord>(UPDATE_STAFF_PERMISSIONS_SQL)
            .bind(staff.into_uuid())
            .bind(update.can_manage_orders)
            .bind(update.can_manage_menu)
            .bind(update.can_view_reports)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_profile(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        staff: StaffId,
        update: StaffProfileUpdate,
    ) -> Result<StaffRecord, sqlx::Error> {
        query_as::<Postgres, StaffRecord>(UPDATE_STAFF_PROFILE_SQL)
            .bind(staff.into_uuid())
            .bind(update.name)
            .bind(update.email)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn set_active(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        staff: StaffId,
        active: bool,
    ) -> Result<StaffRecord, sqlx::Error> {
        query_as::<Postgres, StaffRecord>(SET_STAFF_ACTIVE_SQL)
            .bind(staff.into_uuid())
            .bind(active)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn touch_last_login(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        staff: StaffId,
    ) -> Result<StaffRecord, sqlx::Error> {
        query_as::<Postgres, StaffRecord>(TOUCH_LAST_LOGIN_SQL)
            .bind(staff.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for StaffRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let role: String = row.try_get("role")?;
        let role = role
            .parse::<StaffRole>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "role".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            uuid: StaffId::from_uuid(row.try_get("uuid")?),
            email: row.try_get("email")?,
            name: row.try_get("name")?,
            role,
            permissions: StaffPermissions {
                can_manage_orders: row.try_get("can_manage_orders")?,
                can_manage_menu: row.try_get("can_manage_menu")?,
                can_view_reports: row.try_get("can_view_reports")?,
            },
            is_active: row.try_get("is_active")?,
            last_login: row
                .try_get::<Option<SqlxTimestamp>, _>("last_login")?
                .map(SqlxTimestamp::to_jiff),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
