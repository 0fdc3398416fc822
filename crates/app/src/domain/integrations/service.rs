//! Integrations service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::integrations::{
        errors::IntegrationsServiceError,
        models::{
            Credentials, IntegrationFilters, IntegrationRecord, IntegrationStatus, NewIntegration,
            TestOutcome,
        },
        repository::PgIntegrationsRepository,
    },
    ids::{IntegrationId, RestaurantId},
};

#[derive(Debug, Clone)]
pub struct PgIntegrationsService {
    db: Db,
    repository: PgIntegrationsRepository,
}

impl PgIntegrationsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgIntegrationsRepository::new(),
        }
    }
}

#[async_trait]
impl IntegrationsService for PgIntegrationsService {
    async fn list_integrations(
        &self,
        restaurant: RestaurantId,
        filters: IntegrationFilters,
    ) -> Result<Vec<IntegrationRecord>, IntegrationsServiceError> {
        let mut tx = self.db.begin_restaurant_transaction(restaurant).await?;

        let integrations = self.repository.list_integrations(&mut tx, filters).await?;

        tx.commit().await?;

        Ok(integrations)
    }

    async fn get_by_slug(
        &self,
        restaurant: RestaurantId,
        slug: &str,
    ) -> Result<IntegrationRecord, IntegrationsServiceError> {
        let mut tx = self.db.begin_restaurant_transaction(restaurant).await?;

        let integration = self.repository.get_by_slug(&mut tx, slug).await?;

        tx.commit().await?;

        Ok(integration)
    }

    #[tracing::instrument(skip(self, integration), fields(%restaurant, slug = %integration.slug))]
    async fn create_integration(
        &self,
        restaurant: RestaurantId,
        integration: NewIntegration,
    ) -> Result<IntegrationRecord, IntegrationsServiceError> {
        let mut tx = self.db.begin_restaurant_transaction(restaurant).await?;

        let created = self
            .repository
            .create_integration(&mut tx, integration)
            .await?;

        tx.commit().await?;

        Ok(created)
    }

    #[tracing::instrument(skip(self), fields(%restaurant, %integration, enabled))]
    async fn set_enabled(
        &self,
        restaurant: RestaurantId,
        integration: IntegrationId,
        enabled: bool,
    ) -> Result<IntegrationRecord, IntegrationsServiceError> {
        let mut tx = self.db.begin_restaurant_transaction(restaurant).await?;

        let updated = self
            .repository
            .set_enabled(&mut tx, integration, enabled)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    #[tracing::instrument(skip(self, credentials), fields(%restaurant, %integration))]
    async fn update_credentials(
        &self,
        restaurant: RestaurantId,
        integration: IntegrationId,
        credentials: Credentials,
    ) -> Result<IntegrationRecord, IntegrationsServiceError> {
        let mut tx = self.db.begin_restaurant_transaction(restaurant).await?;

        let updated = self
            .repository
            .update_credentials(&mut tx, integration, &credentials)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    #[tracing::instrument(skip(self, error), fields(%restaurant, %integration, %status))]
    async fn set_status(
        &self,
        restaurant: RestaurantId,
        integration: IntegrationId,
        status: IntegrationStatus,
        error: Option<String>,
    ) -> Result<IntegrationRecord, IntegrationsServiceError> {
        let mut tx = self.db.begin_restaurant_transaction(restaurant).await?;

        let updated = self
            .repository
            .set_status(&mut tx, integration, status, error)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    #[tracing::instrument(skip(self, outcome), fields(%restaurant, %integration, status = %outcome.status))]
    async fn record_test(
        &self,
        restaurant: RestaurantId,
        integration: IntegrationId,
        outcome: TestOutcome,
    ) -> Result<IntegrationRecord, IntegrationsServiceError> {
        let mut tx = self.db.begin_restaurant_transaction(restaurant).await?;

        let updated = self
            .repository
            .record_test(&mut tx, integration, outcome.status, outcome.error)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }
}

#[automock]
#[async_trait]
/// Third-party provider connections for one restaurant.
pub trait IntegrationsService: Send + Sync {
    /// Lists integrations matching the given filters.
    async fn list_integrations(
        &self,
        restaurant: RestaurantId,
        filters: IntegrationFilters,
    ) -> Result<Vec<IntegrationRecord>, IntegrationsServiceError>;

    /// Looks an integration up by its slug.
    async fn get_by_slug(
        &self,
        restaurant: RestaurantId,
        slug: &str,
    ) -> Result<IntegrationRecord, IntegrationsServiceError>;

    /// Registers a new integration, disabled and inactive.
    async fn create_integration(
        &self,
        restaurant: RestaurantId,
        integration: NewIntegration,
    ) -> Result<IntegrationRecord, IntegrationsServiceError>;

    /// Enables or disables an integration, moving its status with it.
    async fn set_enabled(
        &self,
        restaurant: RestaurantId,
        integration: IntegrationId,
        enabled: bool,
    ) -> Result<IntegrationRecord, IntegrationsServiceError>;

    /// Replaces the stored credential set.
    async fn update_credentials(
        &self,
        restaurant: RestaurantId,
        integration: IntegrationId,
        credentials: Credentials,
    ) -> Result<IntegrationRecord, IntegrationsServiceError>;

    /// Overrides the connection status, optionally recording an error.
    async fn set_status(
        &self,
        restaurant: RestaurantId,
        integration: IntegrationId,
        status: IntegrationStatus,
        error: Option<String>,
    ) -> Result<IntegrationRecord, IntegrationsServiceError>;

    /// Stores the outcome of a connection probe.
    async fn record_test(
        &self,
        restaurant: RestaurantId,
        integration: IntegrationId,
        outcome: TestOutcome,
    ) -> Result<IntegrationRecord, IntegrationsServiceError>;
}
