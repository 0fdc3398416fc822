//! Test context for service-level integration tests.

use std::sync::Arc;

use sqlx::{Connection, PgConnection, PgPool, query};

use crate::{
    database::Db,
    domain::{
        audit::{AuditService, PgAuditService},
        integrations::PgIntegrationsService,
        locations::PgLocationsService,
        menu::PgMenuService,
        orders::PgOrdersService,
        reporting::PgReportingService,
        restaurants::{
            PgRestaurantsService, RestaurantsService, RestaurantsServiceError, data::NewRestaurant,
        },
        staff::PgStaffService,
    },
    ids::{RestaurantId, StaffId},
    notifications::{NotificationQueue, TracingSink},
};

use super::db::TestDb;

/// Name of the non-superuser app role used for RLS testing.
const APP_ROLE: &str = "mesa_app_test";
const APP_ROLE_PASSWORD: &str = "mesa_app_test_pass";

pub struct TestContext {
    pub db: TestDb,
    pub restaurant: RestaurantId,
    /// An acting staff id for operations that record who performed them.
    /// Audit entries store it without a foreign key, so no row is needed.
    pub staff_uuid: StaffId,
    pub menu: PgMenuService,
    pub orders: PgOrdersService,
    pub staff: PgStaffService,
    pub audit: PgAuditService,
    pub integrations: PgIntegrationsService,
    pub locations: PgLocationsService,
    pub reporting: PgReportingService,
    app_db: Db,
}

impl TestContext {
    pub async fn new() -> Self {
        let test_db = TestDb::new().await;

        // Build a non-superuser app pool so RLS policies are enforced.
        // The superuser pool is only used for administrative setup (restaurant creation).
        let app_pool = Self::setup_app_pool(&test_db).await;
        let db = Db::new(app_pool);

        let restaurant = RestaurantId::new();

        PgRestaurantsService::new(test_db.pool().clone())
            .create_restaurant(NewRestaurant {
                uuid: restaurant,
                name: "Test Restaurant".to_string(),
            })
            .await
            .expect("Failed to create default test restaurant");

        let audit = PgAuditService::new(db.clone());
        let notifications = NotificationQueue::spawn(Arc::new(TracingSink));

        Self {
            menu: PgMenuService::new(db.clone()),
            orders: PgOrdersService::new(
                db.clone(),
                Arc::new(audit.clone()) as Arc<dyn AuditService>,
                notifications,
            ),
            staff: PgStaffService::new(db.clone()),
            audit,
            integrations: PgIntegrationsService::new(db.clone()),
            locations: PgLocationsService::new(db.clone()),
            reporting: PgReportingService::new(db.clone()),
            restaurant,
            staff_uuid: StaffId::new(),
            db: test_db,
            app_db: db,
        }
    }

    /// Build an orders service backed by a caller-supplied audit service,
    /// sharing this context's restricted application pool.
    pub fn orders_with_audit(&self, audit: Arc<dyn AuditService>) -> PgOrdersService {
        PgOrdersService::new(
            self.app_db.clone(),
            audit,
            NotificationQueue::spawn(Arc::new(TracingSink)),
        )
    }

    /// Create an additional restaurant — useful for RLS isolation tests.
    pub async fn create_restaurant(
        &self,
        name: &str,
    ) -> Result<RestaurantId, RestaurantsServiceError> {
        let uuid = RestaurantId::new();

        PgRestaurantsService::new(self.db.pool().clone())
            .create_restaurant(NewRestaurant {
                uuid,
                name: name.to_string(),
            })
            .await?;

        Ok(uuid)
    }

    /// Create a non-superuser role (once per server) and return a pool connected as it.
    ///
    /// PostgreSQL superusers bypass RLS even with `FORCE ROW LEVEL SECURITY`, so service
    /// tests that exercise isolation must connect via this restricted role.
    async fn setup_app_pool(test_db: &TestDb) -> PgPool {
        // `superuser_url` points at the test database as the superuser.
        let su_url = &test_db.superuser_url;

        // Derive a base URL pointing at the `postgres` maintenance database for
        // server-level DDL (CREATE ROLE is server-scoped, not database-scoped).
        let postgres_url = su_url.rsplit_once('/').map(|x| x.0).unwrap_or(su_url);
        let postgres_url = format!("{postgres_url}/postgres");

        let mut server_conn = PgConnection::connect(&postgres_url)
            .await
            .expect("Failed to connect to postgres database for role setup");

        // Create the app role. Multiple parallel tests may race here; treat
        // "role already exists" (42710) or the underlying unique violation (23505)
        // as success — the role is present either way.
        let create_result = query(&format!(
            "CREATE ROLE {APP_ROLE} WITH LOGIN PASSWORD '{APP_ROLE_PASSWORD}' \
               NOSUPERUSER NOCREATEDB NOCREATEROLE"
        ))
        .execute(&mut server_conn)
        .await;

        if let Err(sqlx::Error::Database(ref e)) = create_result {
            if !matches!(e.code().as_deref(), Some("42710") | Some("23505")) {
                create_result.expect("Failed to create app role");
            }
        } else {
            create_result.expect("Failed to create app role");
        }

        // Grant CONNECT on the test database.
        query(&format!(
            "GRANT CONNECT ON DATABASE \"{}\" TO {APP_ROLE}",
            test_db.name
        ))
        .execute(&mut server_conn)
        .await
        .expect("Failed to grant CONNECT on test database");

        server_conn
            .close()
            .await
            .expect("Failed to close server connection");

        // Within the test database, grant schema and table privileges.
        let mut db_conn = PgConnection::connect(su_url)
            .await
            .expect("Failed to connect to test database for privilege setup");

        for stmt in [
            format!("GRANT USAGE ON SCHEMA public TO {APP_ROLE}"),
            format!(
                "GRANT SELECT, INSERT, UPDATE, DELETE ON ALL TABLES IN SCHEMA public TO {APP_ROLE}"
            ),
            format!("GRANT USAGE, SELECT ON ALL SEQUENCES IN SCHEMA public TO {APP_ROLE}"),
        ] {
            query(&stmt)
                .execute(&mut db_conn)
                .await
                .expect("Failed to grant table privileges to app role");
        }

        db_conn
            .close()
            .await
            .expect("Failed to close db connection");

        // Connect as the non-superuser role.
        let app_url = su_url.replacen(
            "mesa_test:mesa_test_password",
            &format!("{APP_ROLE}:{APP_ROLE_PASSWORD}"),
            1,
        );

        PgPool::connect(&app_url)
            .await
            .expect("Failed to create app pool")
    }
}
