//! Per-test database provisioning.
//!
//! Every test in this crate shares a single PostgreSQL container; each
//! [`TestDb`] creates its own database inside it, applies the migrations,
//! and drops the database again when it goes out of scope. Isolation is
//! database-level: services commit real transactions, and clean state comes
//! from the fresh database rather than from rollback, so tests need no
//! special setup beyond constructing a `TestDb` (usually via `TestContext`).

use std::sync::atomic::{AtomicU64, Ordering};

use sqlx::{Connection, PgConnection, PgPool};
use testcontainers::{ContainerAsync, ImageExt, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres as PostgresImage;
use tokio::sync::OnceCell;

const SUPERUSER: &str = "mesa_test";
const SUPERUSER_PASSWORD: &str = "mesa_test_password";

/// The shared server: one container for the whole test process.
///
/// Lives in a static and is never dropped; the container goes away with the
/// process.
struct PgServer {
    _container: ContainerAsync<PostgresImage>,
    host: String,
    port: u16,
}

static SERVER: OnceCell<PgServer> = OnceCell::const_new();

/// Databases are numbered so concurrent tests never collide on a name.
static NEXT_DATABASE: AtomicU64 = AtomicU64::new(0);

impl PgServer {
    async fn start() -> Self {
        let container = PostgresImage::default()
            .with_user(SUPERUSER)
            .with_password(SUPERUSER_PASSWORD)
            .with_db_name("postgres")
            .with_env_var("POSTGRES_INITDB_ARGS", "--auth-host=trust")
            .start()
            .await
            .expect("postgres container should start");

        let port = container
            .get_host_port_ipv4(5432)
            .await
            .expect("postgres container should expose port 5432");

        let host = std::env::var("TESTCONTAINERS_HOST_OVERRIDE")
            .unwrap_or_else(|_| "localhost".to_string());

        Self {
            _container: container,
            host,
            port,
        }
    }

    fn url(&self, database: &str) -> String {
        format!(
            "postgresql://{SUPERUSER}:{SUPERUSER_PASSWORD}@{}:{}/{database}",
            self.host, self.port
        )
    }
}

async fn server() -> &'static PgServer {
    SERVER.get_or_init(PgServer::start).await
}

/// Best-effort drop of a test database. The container disappears with the
/// process, so a failure here only leaves a stale database behind while the
/// suite is still running.
async fn drop_database(admin_url: &str, name: &str) {
    let Ok(mut conn) = PgConnection::connect(admin_url).await else {
        return;
    };

    let _ = sqlx::query(&format!("DROP DATABASE IF EXISTS \"{name}\""))
        .execute(&mut conn)
        .await;

    let _ = conn.close().await;
}

/// One freshly migrated database inside the shared container.
#[derive(Debug)]
pub struct TestDb {
    pub pool: PgPool,
    pub name: String,

    /// Superuser URL of this database. `TestContext` swaps the credentials
    /// out of it to connect as the restricted app role.
    pub(super) superuser_url: String,

    /// Superuser URL of the `postgres` maintenance database, used to drop
    /// this database on `Drop`.
    admin_url: String,
}

impl TestDb {
    /// Creates and migrates a new database with a process-unique name.
    pub async fn new() -> Self {
        let server = server().await;

        let pid = std::process::id();
        let seq = NEXT_DATABASE.fetch_add(1, Ordering::Relaxed);
        let name = format!("mesa_{pid}_{seq}");

        let admin_url = server.url("postgres");

        let mut conn = PgConnection::connect(&admin_url)
            .await
            .expect("admin connection should succeed");

        sqlx::query(&format!("CREATE DATABASE \"{name}\""))
            .execute(&mut conn)
            .await
            .expect("test database should be created");

        conn.close().await.expect("admin connection should close");

        let superuser_url = server.url(&name);

        let pool = PgPool::connect(&superuser_url)
            .await
            .expect("pool should connect to the test database");

        sqlx::migrate!("../../migrations")
            .run(&pool)
            .await
            .expect("migrations should apply to the test database");

        Self {
            pool,
            name,
            superuser_url,
            admin_url,
        }
    }

    /// Returns the superuser connection pool for this database.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        // Runs inside the test's runtime. If the runtime is already shutting
        // down, the database is left for the container teardown to take with
        // it.
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            return;
        };

        let admin_url = self.admin_url.clone();
        let name = std::mem::take(&mut self.name);

        handle.spawn(async move {
            drop_database(&admin_url, &name).await;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn each_test_db_is_migrated_and_uniquely_named() {
        let first = TestDb::new().await;
        let second = TestDb::new().await;

        assert_ne!(first.name, second.name);

        for db in [&first, &second] {
            let orders_tables: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM information_schema.tables \
                 WHERE table_schema = 'public' AND table_name = 'orders'",
            )
            .fetch_one(db.pool())
            .await
            .expect("schema query should succeed");

            assert_eq!(orders_tables, 1, "migrations should have run in {}", db.name);
        }
    }

    #[tokio::test]
    async fn writes_do_not_leak_between_databases() {
        let first = TestDb::new().await;
        let second = TestDb::new().await;

        sqlx::query("INSERT INTO restaurants (uuid, name) VALUES ($1, 'Solo')")
            .bind(uuid::Uuid::now_v7())
            .execute(first.pool())
            .await
            .expect("insert should succeed");

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM restaurants")
            .fetch_one(second.pool())
            .await
            .expect("count should succeed");

        assert_eq!(count, 0);
    }
}
