//! Restaurants service.

use async_trait::async_trait;
use mockall::automock;
use sqlx::PgPool;

use crate::{
    domain::restaurants::{
        data::NewRestaurant, errors::RestaurantsServiceError, records::RestaurantRecord,
        repository::PgRestaurantsRepository,
    },
    ids::RestaurantId,
};

#[derive(Debug, Clone)]
pub struct PgRestaurantsService {
    repository: PgRestaurantsRepository,
}

impl PgRestaurantsService {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PgRestaurantsRepository::new(pool),
        }
    }
}

#[async_trait]
impl RestaurantsService for PgRestaurantsService {
    async fn create_restaurant(
        &self,
        restaurant: NewRestaurant,
    ) -> Result<RestaurantRecord, RestaurantsServiceError> {
        self.repository
            .create_restaurant(restaurant)
            .await
            .map_err(Into::into)
    }

    async fn get_restaurant(
        &self,
        restaurant: RestaurantId,
    ) -> Result<RestaurantRecord, RestaurantsServiceError> {
        self.repository
            .get_restaurant(restaurant)
            .await
            .map_err(Into::into)
    }
}

#[automock]
#[async_trait]
/// Restaurant (tenant) persistence operations.
pub trait RestaurantsService: Send + Sync {
    /// Creates a new restaurant.
    async fn create_restaurant(
        &self,
        restaurant: NewRestaurant,
    ) -> Result<RestaurantRecord, RestaurantsServiceError>;

    /// Retrieves a restaurant by id.
    async fn get_restaurant(
        &self,
        restaurant: RestaurantId,
    ) -> Result<RestaurantRecord, RestaurantsServiceError>;
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use testresult::TestResult;

    use crate::test::TestContext;

    use super::*;

    #[tokio::test]
    async fn create_restaurant_returns_correct_uuid_and_name() -> TestResult {
        let ctx = TestContext::new().await;
        let svc = PgRestaurantsService::new(ctx.db.pool().clone());

        let uuid = RestaurantId::new();

        let restaurant = svc
            .create_restaurant(NewRestaurant {
                uuid,
                name: "Trattoria Da Mario".to_string(),
            })
            .await?;

        assert_eq!(restaurant.uuid, uuid);
        assert_eq!(restaurant.name, "Trattoria Da Mario");

        Ok(())
    }

    #[tokio::test]
    async fn create_restaurant_timestamps_are_set() -> TestResult {
        let ctx = TestContext::new().await;
        let svc = PgRestaurantsService::new(ctx.db.pool().clone());

        let before = Timestamp::now();

        let restaurant = svc
            .create_restaurant(NewRestaurant {
                uuid: RestaurantId::new(),
                name: "Timestamp Test".to_string(),
            })
            .await?;

        let after = Timestamp::now();

        assert!(restaurant.created_at >= before);
        assert!(restaurant.created_at <= after);

        Ok(())
    }

    #[tokio::test]
    async fn create_restaurant_duplicate_uuid_returns_already_exists() -> TestResult {
        let ctx = TestContext::new().await;
        let svc = PgRestaurantsService::new(ctx.db.pool().clone());

        let uuid = RestaurantId::new();

        svc.create_restaurant(NewRestaurant {
            uuid,
            name: "First".to_string(),
        })
        .await?;

        let result = svc
            .create_restaurant(NewRestaurant {
                uuid,
                name: "Second".to_string(),
            })
            .await;

        assert!(
            matches!(result, Err(RestaurantsServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn get_restaurant_unknown_uuid_returns_not_found() {
        let ctx = TestContext::new().await;
        let svc = PgRestaurantsService::new(ctx.db.pool().clone());

        let result = svc.get_restaurant(RestaurantId::new()).await;

        assert!(
            matches!(result, Err(RestaurantsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }
}
