//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    database::{self, Db},
    domain::{
        audit::{AuditService, PgAuditService},
        integrations::{IntegrationsService, PgIntegrationsService},
        locations::{LocationsService, PgLocationsService},
        menu::{MenuService, PgMenuService},
        orders::{OrdersService, PgOrdersService},
        reporting::{PgReportingService, ReportingService},
        restaurants::{PgRestaurantsService, RestaurantsService},
        staff::{PgStaffService, StaffService},
    },
    notifications::{NotificationQueue, NotificationSink, TracingSink},
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),
}

#[derive(Clone)]
pub struct AppContext {
    pub restaurants: Arc<dyn RestaurantsService>,
    pub menu: Arc<dyn MenuService>,
    pub orders: Arc<dyn OrdersService>,
    pub staff: Arc<dyn StaffService>,
    pub reporting: Arc<dyn ReportingService>,
    pub audit: Arc<dyn AuditService>,
    pub integrations: Arc<dyn IntegrationsService>,
    pub locations: Arc<dyn LocationsService>,
}

impl AppContext {
    /// Build application context from a database URL, delivering
    /// notifications to the logging sink.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails.
    pub async fn from_database_url(url: &str) -> Result<Self, AppInitError> {
        Self::with_sink(url, Arc::new(TracingSink)).await
    }

    /// Build application context with a custom notification sink.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails.
    pub async fn with_sink(
        url: &str,
        sink: Arc<dyn NotificationSink>,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        let db = Db::new(pool.clone());
        let notifications = NotificationQueue::spawn(sink);

        let audit: Arc<dyn AuditService> = Arc::new(PgAuditService::new(db.clone()));

        Ok(Self {
            restaurants: Arc::new(PgRestaurantsService::new(pool)),
            menu: Arc::new(PgMenuService::new(db.clone())),
            orders: Arc::new(PgOrdersService::new(
                db.clone(),
                Arc::clone(&audit),
                notifications,
            )),
            staff: Arc::new(PgStaffService::new(db.clone())),
            reporting: Arc::new(PgReportingService::new(db.clone())),
            integrations: Arc::new(PgIntegrationsService::new(db.clone())),
            locations: Arc::new(PgLocationsService::new(db)),
            audit,
        })
    }
}
