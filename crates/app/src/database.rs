//! Database connection management

use sqlx::{PgPool, Postgres, Transaction, query};

use crate::ids::RestaurantId;

/// SQL used to set restaurant context for row-level security.
pub const SET_RESTAURANT_CONTEXT_SQL: &str =
    "SELECT set_config('app.current_restaurant_uuid', $1, true)";

#[derive(Debug, Clone)]
pub struct Db {
    pool: PgPool,
}

impl Db {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Begin a transaction scoped to one restaurant's rows via RLS policies.
    ///
    /// # Errors
    ///
    /// Returns an error when starting the transaction or setting restaurant
    /// context fails.
    pub async fn begin_restaurant_transaction(
        &self,
        restaurant: RestaurantId,
    ) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        query(SET_RESTAURANT_CONTEXT_SQL)
            .bind(restaurant.into_uuid().to_string())
            .execute(&mut *tx)
            .await?;

        Ok(tx)
    }
}

/// Connect to `PostgreSQL`.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPool::connect(database_url).await
}

/// Apply all pending migrations.
///
/// # Errors
///
/// Returns an error when a migration fails to apply.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}
