//! Menu service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::menu::{
        errors::MenuServiceError,
        models::{Category, MenuItem, MenuItemFilters, MenuItemUpdate, NewCategory, NewMenuItem},
        repositories::{PgCategoriesRepository, PgMenuItemsRepository},
    },
    ids::{CategoryId, MenuItemId, RestaurantId},
};

#[derive(Debug, Clone)]
pub struct PgMenuService {
    db: Db,
    items_repository: PgMenuItemsRepository,
    categories_repository: PgCategoriesRepository,
}

impl PgMenuService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            items_repository: PgMenuItemsRepository::new(),
            categories_repository: PgCategoriesRepository::new(),
        }
    }
}

#[async_trait]
impl MenuService for PgMenuService {
    async fn list_items(
        &self,
        restaurant: RestaurantId,
        filters: MenuItemFilters,
    ) -> Result<Vec<MenuItem>, MenuServiceError> {
        let mut tx = self.db.begin_restaurant_transaction(restaurant).await?;

        let items = self.items_repository.list_items(&mut tx, filters).await?;

        tx.commit().await?;

        Ok(items)
    }

    async fn get_item(
        &self,
        restaurant: RestaurantId,
        item: MenuItemId,
    ) -> Result<MenuItem, MenuServiceError> {
        let mut tx = self.db.begin_restaurant_transaction(restaurant).await?;

        let item = self.items_repository.get_item(&mut tx, item).await?;

        tx.commit().await?;

        Ok(item)
    }

    #[tracing::instrument(skip(self), fields(%restaurant, item = %item.uuid))]
    async fn create_item(
        &self,
        restaurant: RestaurantId,
        item: NewMenuItem,
    ) -> Result<MenuItem, MenuServiceError> {
        let mut tx = self.db.begin_restaurant_transaction(restaurant).await?;

        let created = self.items_repository.create_item(&mut tx, item).await?;

        tx.commit().await?;

        Ok(created)
    }

    #[tracing::instrument(skip(self, update), fields(%restaurant, %item))]
    async fn update_item(
        &self,
        restaurant: RestaurantId,
        item: MenuItemId,
        update: MenuItemUpdate,
    ) -> Result<MenuItem, MenuServiceError> {
        let mut tx = self.db.begin_restaurant_transaction(restaurant).await?;

        let updated = self
            .items_repository
            .update_item(&mut tx, item, update)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn toggle_item_availability(
        &self,
        restaurant: RestaurantId,
        item: MenuItemId,
    ) -> Result<MenuItem, MenuServiceError> {
        let mut tx = self.db.begin_restaurant_transaction(restaurant).await?;

        let current = self.items_repository.get_item(&mut tx, item).await?;

        let updated = self
            .items_repository
            .set_availability(&mut tx, item, !current.is_available)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    #[tracing::instrument(skip(self), fields(%restaurant, %item))]
    async fn deactivate_item(
        &self,
        restaurant: RestaurantId,
        item: MenuItemId,
    ) -> Result<MenuItem, MenuServiceError> {
        let mut tx = self.db.begin_restaurant_transaction(restaurant).await?;

        let updated = self
            .items_repository
            .set_active(&mut tx, item, false)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn list_categories(
        &self,
        restaurant: RestaurantId,
        is_active: Option<bool>,
    ) -> Result<Vec<Category>, MenuServiceError> {
        let mut tx = self.db.begin_restaurant_transaction(restaurant).await?;

        let categories = self
            .categories_repository
            .list_categories(&mut tx, is_active)
            .await?;

        tx.commit().await?;

        Ok(categories)
    }

    async fn get_category(
        &self,
        restaurant: RestaurantId,
        category: CategoryId,
    ) -> Result<Category, MenuServiceError> {
        let mut tx = self.db.begin_restaurant_transaction(restaurant).await?;

        let category = self
            .categories_repository
            .get_category(&mut tx, category)
            .await?;

        tx.commit().await?;

        Ok(category)
    }

    #[tracing::instrument(skip(self), fields(%restaurant, category = %category.uuid))]
    async fn create_category(
        &self,
        restaurant: RestaurantId,
        category: NewCategory,
    ) -> Result<Category, MenuServiceError> {
        let mut tx = self.db.begin_restaurant_transaction(restaurant).await?;

        let created = self
            .categories_repository
            .create_category(&mut tx, category)
            .await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn set_category_active(
        &self,
        restaurant: RestaurantId,
        category: CategoryId,
        active: bool,
    ) -> Result<Category, MenuServiceError> {
        let mut tx = self.db.begin_restaurant_transaction(restaurant).await?;

        let updated = self
            .categories_repository
            .set_active(&mut tx, category, active)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn reorder_categories(
        &self,
        restaurant: RestaurantId,
        ordering: Vec<(CategoryId, i32)>,
    ) -> Result<Vec<Category>, MenuServiceError> {
        let mut tx = self.db.begin_restaurant_transaction(restaurant).await?;

        let mut updated = Vec::with_capacity(ordering.len());

        for (category, display_order) in ordering {
            updated.push(
                self.categories_repository
                    .set_display_order(&mut tx, category, display_order)
                    .await?,
            );
        }

        tx.commit().await?;

        Ok(updated)
    }
}

#[automock]
#[async_trait]
/// Menu items and category management for one restaurant.
pub trait MenuService: Send + Sync {
    /// Lists menu items matching the given filters.
    async fn list_items(
        &self,
        restaurant: RestaurantId,
        filters: MenuItemFilters,
    ) -> Result<Vec<MenuItem>, MenuServiceError>;

    /// Retrieves a single menu item.
    async fn get_item(
        &self,
        restaurant: RestaurantId,
        item: MenuItemId,
    ) -> Result<MenuItem, MenuServiceError>;

    /// Creates a new menu item.
    async fn create_item(
        &self,
        restaurant: RestaurantId,
        item: NewMenuItem,
    ) -> Result<MenuItem, MenuServiceError>;

    /// Applies a partial update to a menu item.
    async fn update_item(
        &self,
        restaurant: RestaurantId,
        item: MenuItemId,
        update: MenuItemUpdate,
    ) -> Result<MenuItem, MenuServiceError>;

    /// Flips the availability flag on a menu item.
    async fn toggle_item_availability(
        &self,
        restaurant: RestaurantId,
        item: MenuItemId,
    ) -> Result<MenuItem, MenuServiceError>;

    /// Soft-deletes a menu item by clearing its active flag.
    async fn deactivate_item(
        &self,
        restaurant: RestaurantId,
        item: MenuItemId,
    ) -> Result<MenuItem, MenuServiceError>;

    /// Lists categories, optionally filtered by active state.
    async fn list_categories(
        &self,
        restaurant: RestaurantId,
        is_active: Option<bool>,
    ) -> Result<Vec<Category>, MenuServiceError>;

    /// Retrieves a single category.
    async fn get_category(
        &self,
        restaurant: RestaurantId,
        category: CategoryId,
    ) -> Result<Category, MenuServiceError>;

    /// Creates a new category.
    async fn create_category(
        &self,
        restaurant: RestaurantId,
        category: NewCategory,
    ) -> Result<Category, MenuServiceError>;

    /// Sets the active flag on a category.
    async fn set_category_active(
        &self,
        restaurant: RestaurantId,
        category: CategoryId,
        active: bool,
    ) -> Result<Category, MenuServiceError>;

    /// Applies new display positions to the given categories in one transaction.
    async fn reorder_categories(
        &self,
        restaurant: RestaurantId,
        ordering: Vec<(CategoryId, i32)>,
    ) -> Result<Vec<Category>, MenuServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test::TestContext;

    use super::*;

    fn margherita(uuid: MenuItemId) -> NewMenuItem {
        NewMenuItem {
            uuid,
            category_uuid: None,
            name: "Margherita".to_string(),
            description: Some("Tomato, mozzarella, basil".to_string()),
            price: 1250,
        }
    }

    #[tokio::test]
    async fn create_item_returns_created_item() -> TestResult {
        let ctx = TestContext::new().await;
        let uuid = MenuItemId::new();

        let item = ctx
            .menu
            .create_item(ctx.restaurant, margherita(uuid))
            .await?;

        assert_eq!(item.uuid, uuid);
        assert_eq!(item.name, "Margherita");
        assert_eq!(item.price, 1250);
        assert!(item.is_active);
        assert!(item.is_available);

        Ok(())
    }

    #[tokio::test]
    async fn create_item_duplicate_uuid_returns_already_exists() -> TestResult {
        let ctx = TestContext::new().await;
        let uuid = MenuItemId::new();

        ctx.menu
            .create_item(ctx.restaurant, margherita(uuid))
            .await?;

        let result = ctx.menu.create_item(ctx.restaurant, margherita(uuid)).await;

        assert!(
            matches!(result, Err(MenuServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn create_item_unknown_category_returns_invalid_reference() {
        let ctx = TestContext::new().await;

        let result = ctx
            .menu
            .create_item(
                ctx.restaurant,
                NewMenuItem {
                    category_uuid: Some(CategoryId::new()),
                    ..margherita(MenuItemId::new())
                },
            )
            .await;

        assert!(
            matches!(result, Err(MenuServiceError::InvalidReference)),
            "expected InvalidReference, got {result:?}"
        );
    }

    #[tokio::test]
    async fn get_item_unknown_uuid_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.menu.get_item(ctx.restaurant, MenuItemId::new()).await;

        assert!(
            matches!(result, Err(MenuServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn get_item_is_invisible_to_other_restaurants() -> TestResult {
        let ctx = TestContext::new().await;
        let other = ctx.create_restaurant("Other Place").await?;
        let uuid = MenuItemId::new();

        ctx.menu
            .create_item(ctx.restaurant, margherita(uuid))
            .await?;

        let result = ctx.menu.get_item(other, uuid).await;

        assert!(
            matches!(result, Err(MenuServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn update_item_leaves_unset_fields_unchanged() -> TestResult {
        let ctx = TestContext::new().await;
        let uuid = MenuItemId::new();

        ctx.menu
            .create_item(ctx.restaurant, margherita(uuid))
            .await?;

        let updated = ctx
            .menu
            .update_item(
                ctx.restaurant,
                uuid,
                MenuItemUpdate {
                    price: Some(1350),
                    ..MenuItemUpdate::default()
                },
            )
            .await?;

        assert_eq!(updated.price, 1350);
        assert_eq!(updated.name, "Margherita");
        assert_eq!(
            updated.description.as_deref(),
            Some("Tomato, mozzarella, basil")
        );

        Ok(())
    }

    #[tokio::test]
    async fn toggle_item_availability_flips_flag_both_ways() -> TestResult {
        let ctx = TestContext::new().await;
        let uuid = MenuItemId::new();

        ctx.menu
            .create_item(ctx.restaurant, margherita(uuid))
            .await?;

        let toggled = ctx.menu.toggle_item_availability(ctx.restaurant, uuid).await?;
        assert!(!toggled.is_available);

        let toggled = ctx.menu.toggle_item_availability(ctx.restaurant, uuid).await?;
        assert!(toggled.is_available);

        Ok(())
    }

    #[tokio::test]
    async fn deactivate_item_keeps_row_but_clears_active_flag() -> TestResult {
        let ctx = TestContext::new().await;
        let uuid = MenuItemId::new();

        ctx.menu
            .create_item(ctx.restaurant, margherita(uuid))
            .await?;

        let deactivated = ctx.menu.deactivate_item(ctx.restaurant, uuid).await?;

        assert!(!deactivated.is_active);
        assert!(!deactivated.is_orderable());

        let fetched = ctx.menu.get_item(ctx.restaurant, uuid).await?;
        assert!(!fetched.is_active);

        Ok(())
    }

    #[tokio::test]
    async fn list_items_applies_filters() -> TestResult {
        let ctx = TestContext::new().await;
        let active_uuid = MenuItemId::new();
        let inactive_uuid = MenuItemId::new();

        ctx.menu
            .create_item(ctx.restaurant, margherita(active_uuid))
            .await?;
        ctx.menu
            .create_item(
                ctx.restaurant,
                NewMenuItem {
                    name: "Quattro Formaggi".to_string(),
                    ..margherita(inactive_uuid)
                },
            )
            .await?;
        ctx.menu.deactivate_item(ctx.restaurant, inactive_uuid).await?;

        let active = ctx
            .menu
            .list_items(
                ctx.restaurant,
                MenuItemFilters {
                    is_active: Some(true),
                    ..MenuItemFilters::default()
                },
            )
            .await?;

        assert_eq!(active.len(), 1);
        assert_eq!(active[0].uuid, active_uuid);

        let all = ctx
            .menu
            .list_items(ctx.restaurant, MenuItemFilters::default())
            .await?;

        assert_eq!(all.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn categories_order_by_display_order_then_name() -> TestResult {
        let ctx = TestContext::new().await;

        let mains = CategoryId::new();
        let starters = CategoryId::new();

        ctx.menu
            .create_category(
                ctx.restaurant,
                NewCategory {
                    uuid: mains,
                    name: "Mains".to_string(),
                    description: None,
                    display_order: 2,
                },
            )
            .await?;
        ctx.menu
            .create_category(
                ctx.restaurant,
                NewCategory {
                    uuid: starters,
                    name: "Starters".to_string(),
                    description: None,
                    display_order: 1,
                },
            )
            .await?;

        let categories = ctx.menu.list_categories(ctx.restaurant, None).await?;

        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].uuid, starters);
        assert_eq!(categories[1].uuid, mains);

        Ok(())
    }

    #[tokio::test]
    async fn reorder_categories_applies_all_positions() -> TestResult {
        let ctx = TestContext::new().await;

        let first = CategoryId::new();
        let second = CategoryId::new();

        for (uuid, name, display_order) in
            [(first, "Drinks", 1), (second, "Desserts", 2)]
        {
            ctx.menu
                .create_category(
                    ctx.restaurant,
                    NewCategory {
                        uuid,
                        name: name.to_string(),
                        description: None,
                        display_order,
                    },
                )
                .await?;
        }

        ctx.menu
            .reorder_categories(ctx.restaurant, vec![(first, 2), (second, 1)])
            .await?;

        let categories = ctx.menu.list_categories(ctx.restaurant, None).await?;

        assert_eq!(categories[0].uuid, second);
        assert_eq!(categories[1].uuid, first);

        Ok(())
    }
}
