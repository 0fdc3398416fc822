//! Audit service.

use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::{
    database::Db,
    domain::audit::{
        errors::AuditServiceError,
        models::{AuditEntry, AuditResource, NewAuditEntry},
        repository::PgAuditRepository,
    },
    ids::{RestaurantId, StaffId},
};

#[derive(Debug, Clone)]
pub struct PgAuditService {
    db: Db,
    repository: PgAuditRepository,
}

impl PgAuditService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgAuditRepository::new(),
        }
    }
}

#[async_trait]
impl AuditService for PgAuditService {
    async fn record(
        &self,
        restaurant: RestaurantId,
        entry: NewAuditEntry,
    ) -> Result<AuditEntry, AuditServiceError> {
        let mut tx = self.db.begin_restaurant_transaction(restaurant).await?;

        let recorded = self.repository.record(&mut tx, entry).await?;

        tx.commit().await?;

        Ok(recorded)
    }

    async fn for_resource(
        &self,
        restaurant: RestaurantId,
        resource: AuditResource,
        resource_uuid: Uuid,
    ) -> Result<Vec<AuditEntry>, AuditServiceError> {
        let mut tx = self.db.begin_restaurant_transaction(restaurant).await?;

        let entries = self
            .repository
            .for_resource(&mut tx, resource, resource_uuid)
            .await?;

        tx.commit().await?;

        Ok(entries)
    }

    async fn for_staff(
        &self,
        restaurant: RestaurantId,
        staff: StaffId,
    ) -> Result<Vec<AuditEntry>, AuditServiceError> {
        let mut tx = self.db.begin_restaurant_transaction(restaurant).await?;

        let entries = self.repository.for_staff(&mut tx, staff).await?;

        tx.commit().await?;

        Ok(entries)
    }

    async fn recent(
        &self,
        restaurant: RestaurantId,
        limit: i64,
    ) -> Result<Vec<AuditEntry>, AuditServiceError> {
        let mut tx = self.db.begin_restaurant_transaction(restaurant).await?;

        let entries = self.repository.recent(&mut tx, limit).await?;

        tx.commit().await?;

        Ok(entries)
    }
}

#[automock]
#[async_trait]
/// Append-only audit trail of staff actions.
pub trait AuditService: Send + Sync {
    /// Records a new audit entry.
    async fn record(
        &self,
        restaurant: RestaurantId,
        entry: NewAuditEntry,
    ) -> Result<AuditEntry, AuditServiceError>;

    /// Entries touching one resource, newest first.
    async fn for_resource(
        &self,
        restaurant: RestaurantId,
        resource: AuditResource,
        resource_uuid: Uuid,
    ) -> Result<Vec<AuditEntry>, AuditServiceError>;

    /// Entries recorded by one staff member, newest first.
    async fn for_staff(
        &self,
        restaurant: RestaurantId,
        staff: StaffId,
    ) -> Result<Vec<AuditEntry>, AuditServiceError>;

    /// The most recent entries for a restaurant.
    async fn recent(
        &self,
        restaurant: RestaurantId,
        limit: i64,
    ) -> Result<Vec<AuditEntry>, AuditServiceError>;
}
