//! Audit Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};
use uuid::Uuid;

use crate::{
    domain::audit::models::{AuditEntry, AuditResource, NewAuditEntry},
    ids::{AuditLogId, StaffId},
};

const RECORD_AUDIT_SQL: &str = include_str!("sql/record_audit.sql");
const AUDIT_FOR_RESOURCE_SQL: &str = include_str!("sql/audit_for_resource.sql");
const AUDIT_FOR_STAFF_SQL: &str = include_str!("sql/audit_for_staff.sql");
const RECENT_AUDIT_SQL: &str = include_str!("sql/recent_audit.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgAuditRepository;

impl PgAuditRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn record(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        entry: NewAuditEntry,
    ) -> Result<AuditEntry, sqlx::Error> {
        query_as::<Postgres, AuditEntry>(RECORD_AUDIT_SQL)
            .bind(entry.uuid.into_uuid())
            .bind(entry.action)
            .bind(entry.staff_uuid.into_uuid())
            .bind(entry.resource.as_str())
            .bind(entry.resource_uuid)
            .bind(entry.details)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn for_resource(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        resource: AuditResource,
        resource_uuid: Uuid,
    ) -> Result<Vec<AuditEntry>, sqlx::Error> {
        query_as::<Postgres, AuditEntry>(AUDIT_FOR_RESOURCE_SQL)
            .bind(resource.as_str())
            .bind(resource_uuid)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn for_staff(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        staff: StaffId,
    ) -> Result<Vec<AuditEntry>, sqlx::Error> {
        query_as::<Postgres, AuditEntry>(AUDIT_FOR_STAFF_SQL)
            .bind(staff.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn recent(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        limit: i64,
    ) -> Result<Vec<AuditEntry>, sqlx::Error> {
        query_as::<Postgres, AuditEntry>(RECENT_AUDIT_SQL)
            .bind(limit)
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for AuditEntry {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let resource: String = row.try_get("resource_type")?;
        let resource = resource
            .parse::<AuditResource>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "resource_type".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            uuid: AuditLogId::from_uuid(row.try_get("uuid")?),
            action: row.try_get("action")?,
            staff_uuid: StaffId::from_uuid(row.try_get("staff_uuid")?),
            resource,
            resource_uuid: row.try_get("resource_uuid")?,
            details: row.try_get("details")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
