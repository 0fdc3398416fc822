//! Integrations Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::{
    domain::integrations::models::{
        Credentials, IntegrationCategory, IntegrationFilters, IntegrationRecord,
        IntegrationStatus, NewIntegration, Secret,
    },
    ids::IntegrationId,
};

const LIST_INTEGRATIONS_SQL: &str = include_str!("sql/list_integrations.sql");
const GET_INTEGRATION_BY_SLUG_SQL: &str = include_str!("sql/get_integration_by_slug.sql");
const CREATE_INTEGRATION_SQL: &str = include_str!("sql/create_integration.sql");
const SET_INTEGRATION_ENABLED_SQL: &str = include_str!("sql/set_integration_enabled.sql");
const UPDATE_INTEGRATION_CREDENTIALS_SQL: &str =
    include_str!("sql/update_integration_credentials.sql");
const SET_INTEGRATION_STATUS_SQL: &str = include_str!("sql/set_integration_status.sql");
const RECORD_INTEGRATION_TEST_SQL: &str = include_str!("sql/record_integration_test.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgIntegrationsRepository;

impl PgIntegrationsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_integrations(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        filters: IntegrationFilters,
    ) -> Result<Vec<IntegrationRecord>, sqlx::Error> {
        query_as::<Postgres, IntegrationRecord>(LIST_INTEGRATIONS_SQL)
            .bind(filters.category.map(IntegrationCategory::as_str))
            .bind(filters.is_enabled)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_by_slug(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        slug: &str,
    ) -> Result<IntegrationRecord, sqlx::Error> {
        query_as::<Postgres, IntegrationRecord>(GET_INTEGRATION_BY_SLUG_SQL)
            .bind(slug)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_integration(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        integration: NewIntegration,
    ) -> Result<IntegrationRecord, sqlx::Error> {
        query_as::<Postgres, IntegrationRecord>(CREATE_INTEGRATION_SQL)
            .bind(integration.uuid.into_uuid())
            .bind(integration.name)
            .bind(integration.slug)
            .bind(integration.category.as_str())
            .bind(integration.description)
            .bind(integration.settings)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn set_enabled(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        integration: IntegrationId,
        enabled: bool,
    ) -> Result<IntegrationRecord, sqlx::Error> {
        query_as::<Postgres, IntegrationRecord>(SET_INTEGRATION_ENABLED_SQL)
            .bind(integration.into_uuid())
            .bind(enabled)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_credentials(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        integration: IntegrationId,
        credentials: &Credentials,
    ) -> Result<IntegrationRecord, sqlx::Error> {
        query_as::<Postgres, IntegrationRecord>(UPDATE_INTEGRATION_CREDENTIALS_SQL)
            .bind(integration.into_uuid())
            .bind(credentials_to_json(credentials))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn set_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        integration: IntegrationId,
        status: IntegrationStatus,
        error: Option<String>,
    ) -> Result<IntegrationRecord, sqlx::Error> {
        query_as::<Postgres, IntegrationRecord>(SET_INTEGRATION_STATUS_SQL)
            .bind(integration.into_uuid())
            .bind(status.as_str())
            .bind(error)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn record_test(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        integration: IntegrationId,
        status: IntegrationStatus,
        error: Option<String>,
    ) -> Result<IntegrationRecord, sqlx::Error> {
        query_as::<Postgres, IntegrationRecord>(RECORD_INTEGRATION_TEST_SQL)
            .bind(integration.into_uuid())
            .bind(status.as_str())
            .bind(error)
            .fetch_one(&mut **tx)
            .await
    }
}

fn credentials_to_json(credentials: &Credentials) -> serde_json::Value {
    serde_json::Value::Object(
        credentials
            .iter()
            .map(|(key, secret)| {
                (
                    key.clone(),
                    serde_json::Value::String(secret.expose().to_string()),
                )
            })
            .collect(),
    )
}

fn credentials_from_json(value: serde_json::Value) -> Result<Credentials, sqlx::Error> {
    let decode_error = || sqlx::Error::ColumnDecode {
        index: "credentials".to_string(),
        source: "credentials must be an object of strings".into(),
    };

    let serde_json::Value::Object(entries) = value else {
        return Err(decode_error());
    };

    entries
        .into_iter()
        .map(|(key, value)| match value {
            serde_json::Value::String(secret) => Ok((key, Secret::new(secret))),
            _ => Err(decode_error()),
        })
        .collect()
}

impl<'r> FromRow<'r, PgRow> for IntegrationRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let category: String = row.try_get("category")?;
        let category =
            category
                .parse::<IntegrationCategory>()
                .map_err(|e| sqlx::Error::ColumnDecode {
                    index: "category".to_string(),
                    source: Box::new(e),
                })?;

        let status: String = row.try_get("status")?;
        let status = status
            .parse::<IntegrationStatus>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "status".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            uuid: IntegrationId::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            slug: row.try_get("slug")?,
            category,
            description: row.try_get("description")?,
            is_enabled: row.try_get("is_enabled")?,
            status,
            credentials: credentials_from_json(row.try_get("credentials")?)?,
            settings: row.try_get("settings")?,
            last_error: row.try_get("last_error")?,
            last_tested_at: row
                .try_get::<Option<SqlxTimestamp>, _>("last_tested_at")?
                .map(SqlxTimestamp::to_jiff),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
