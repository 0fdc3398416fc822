//! Locations service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::locations::{
        errors::LocationsServiceError,
        models::{LocationRecord, LocationUpdate, NewLocation},
        repository::PgLocationsRepository,
    },
    ids::{LocationId, RestaurantId},
};

#[derive(Debug, Clone)]
pub struct PgLocationsService {
    db: Db,
    repository: PgLocationsRepository,
}

impl PgLocationsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgLocationsRepository::new(),
        }
    }
}

#[async_trait]
impl LocationsService for PgLocationsService {
    async fn list_locations(
        &self,
        restaurant: RestaurantId,
        is_active: Option<bool>,
    ) -> Result<Vec<LocationRecord>, LocationsServiceError> {
        let mut tx = self.db.begin_restaurant_transaction(restaurant).await?;

        let locations = self.repository.list_locations(&mut tx, is_active).await?;

        tx.commit().await?;

        Ok(locations)
    }

    async fn get_location(
        &self,
        restaurant: RestaurantId,
        location: LocationId,
    ) -> Result<LocationRecord, LocationsServiceError> {
        let mut tx = self.db.begin_restaurant_transaction(restaurant).await?;

        let location = self.repository.get_location(&mut tx, location).await?;

        tx.commit().await?;

        Ok(location)
    }

    async fn get_by_slug(
        &self,
        restaurant: RestaurantId,
        slug: &str,
    ) -> Result<LocationRecord, LocationsServiceError> {
        let mut tx = self.db.begin_restaurant_transaction(restaurant).await?;

        let location = self.repository.get_by_slug(&mut tx, slug).await?;

        tx.commit().await?;

        Ok(location)
    }

    #[tracing::instrument(skip(self, location), fields(%restaurant, slug = %location.slug))]
    async fn create_location(
        &self,
        restaurant: RestaurantId,
        location: NewLocation,
    ) -> Result<LocationRecord, LocationsServiceError> {
        let mut tx = self.db.begin_restaurant_transaction(restaurant).await?;

        let created = self.repository.create_location(&mut tx, location).await?;

        tx.commit().await?;

        Ok(created)
    }

    #[tracing::instrument(skip(self, update), fields(%restaurant, %location))]
    async fn update_location(
        &self,
        restaurant: RestaurantId,
        location: LocationId,
        update: LocationUpdate,
    ) -> Result<LocationRecord, LocationsServiceError> {
        let mut tx = self.db.begin_restaurant_transaction(restaurant).await?;

        let updated = self
            .repository
            .update_location(&mut tx, location, update)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    #[tracing::instrument(skip(self), fields(%restaurant, %location, active))]
    async fn set_active(
        &self,
        restaurant: RestaurantId,
        location: LocationId,
        active: bool,
    ) -> Result<LocationRecord, LocationsServiceError> {
        let mut tx = self.db.begin_restaurant_transaction(restaurant).await?;

        let updated = self.repository.set_active(&mut tx, location, active).await?;

        tx.commit().await?;

        Ok(updated)
    }
}

#[automock]
#[async_trait]
/// Physical site management for one restaurant.
pub trait LocationsService: Send + Sync {
    /// Lists locations, optionally filtered by active state.
    async fn list_locations(
        &self,
        restaurant: RestaurantId,
        is_active: Option<bool>,
    ) -> Result<Vec<LocationRecord>, LocationsServiceError>;

    /// Retrieves one location.
    async fn get_location(
        &self,
        restaurant: RestaurantId,
        location: LocationId,
    ) -> Result<LocationRecord, LocationsServiceError>;

    /// Looks a location up by its slug.
    async fn get_by_slug(
        &self,
        restaurant: RestaurantId,
        slug: &str,
    ) -> Result<LocationRecord, LocationsServiceError>;

    /// Creates a new location.
    async fn create_location(
        &self,
        restaurant: RestaurantId,
        location: NewLocation,
    ) -> Result<LocationRecord, LocationsServiceError>;

    /// Applies a partial update to a location.
    async fn update_location(
        &self,
        restaurant: RestaurantId,
        location: LocationId,
        update: LocationUpdate,
    ) -> Result<LocationRecord, LocationsServiceError>;

    /// Activates or deactivates a location.
    async fn set_active(
        &self,
        restaurant: RestaurantId,
        location: LocationId,
        active: bool,
    ) -> Result<LocationRecord, LocationsServiceError>;
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use crate::test::TestContext;

    use super::*;

    fn downtown(uuid: LocationId, slug: &str) -> NewLocation {
        NewLocation {
            uuid,
            name: "Downtown".to_string(),
            slug: slug.to_string(),
            address: "12 Via Roma".to_string(),
            city: "Portland".to_string(),
            state: "OR".to_string(),
            zip_code: "97201".to_string(),
            phone: "555-0100".to_string(),
            email: "downtown@example.com".to_string(),
            business_hours: json!({ "mon": "11:00-22:00" }),
        }
    }

    #[tokio::test]
    async fn create_location_returns_active_record() -> TestResult {
        let ctx = TestContext::new().await;
        let uuid = LocationId::new();

        let location = ctx
            .locations
            .create_location(ctx.restaurant, downtown(uuid, "downtown"))
            .await?;

        assert_eq!(location.uuid, uuid);
        assert!(location.is_active);
        assert_eq!(location.business_hours["mon"], "11:00-22:00");

        Ok(())
    }

    #[tokio::test]
    async fn duplicate_slug_in_one_restaurant_returns_already_exists() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.locations
            .create_location(ctx.restaurant, downtown(LocationId::new(), "downtown"))
            .await?;

        let result = ctx
            .locations
            .create_location(ctx.restaurant, downtown(LocationId::new(), "downtown"))
            .await;

        assert!(
            matches!(result, Err(LocationsServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn same_slug_is_allowed_in_different_restaurants() -> TestResult {
        let ctx = TestContext::new().await;
        let other = ctx.create_restaurant("Other Place").await?;

        ctx.locations
            .create_location(ctx.restaurant, downtown(LocationId::new(), "downtown"))
            .await?;
        ctx.locations
            .create_location(other, downtown(LocationId::new(), "downtown"))
            .await?;

        Ok(())
    }

    #[tokio::test]
    async fn update_location_leaves_unset_fields_unchanged() -> TestResult {
        let ctx = TestContext::new().await;
        let uuid = LocationId::new();

        ctx.locations
            .create_location(ctx.restaurant, downtown(uuid, "downtown"))
            .await?;

        let updated = ctx
            .locations
            .update_location(
                ctx.restaurant,
                uuid,
                LocationUpdate {
                    phone: Some("555-0199".to_string()),
                    ..LocationUpdate::default()
                },
            )
            .await?;

        assert_eq!(updated.phone, "555-0199");
        assert_eq!(updated.address, "12 Via Roma");
        assert_eq!(updated.city, "Portland");

        Ok(())
    }

    #[tokio::test]
    async fn list_locations_can_exclude_inactive_sites() -> TestResult {
        let ctx = TestContext::new().await;
        let uuid = LocationId::new();

        ctx.locations
            .create_location(ctx.restaurant, downtown(uuid, "downtown"))
            .await?;
        ctx.locations
            .create_location(
                ctx.restaurant,
                NewLocation {
                    name: "Riverside".to_string(),
                    ..downtown(LocationId::new(), "riverside")
                },
            )
            .await?;

        ctx.locations.set_active(ctx.restaurant, uuid, false).await?;

        let active = ctx
            .locations
            .list_locations(ctx.restaurant, Some(true))
            .await?;

        assert_eq!(active.len(), 1);
        assert_eq!(active[0].slug, "riverside");

        Ok(())
    }
}
