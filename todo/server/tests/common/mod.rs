#![allow(dead_code)]

use axum::http::{HeaderMap, StatusCode};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};
use serde::Serialize;
use std::collections::BTreeMap;
use testcontainers_modules::testcontainers::runners::AsyncRunner;
use testcontainers_modules::{postgres, testcontainers};

pub async fn setup_container() -> anyhow::Result<testcontainers::ContainerAsync<postgres::Postgres>>
{
    let container = postgres::Postgres::default().start().await?;
    Ok(container)
}

pub async fn setup_db(
    container: &testcontainers::ContainerAsync<postgres::Postgres>,
) -> anyhow::Result<DatabaseConnection> {
    let host = container.get_host().await?;
    let port = container.get_host_port_ipv4(5432).await?;
    let db_url = format!("postgres://postgres:postgres@{}:{}/postgres", host, port);
    let db = Database::connect(&db_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

/// Test context holding a migrated database.
pub struct TestContext {
    // container is kept to ensure it's not dropped
    pub container: testcontainers::ContainerAsync<postgres::Postgres>,
    pub db: DatabaseConnection,
}

/// Starts a PostgreSQL container and runs the migrator against it.
pub async fn setup() -> anyhow::Result<TestContext> {
    // Allow multiple calls to init for tests.
    let _ = tracing_subscriber::fmt().try_init();
    let container = setup_container().await?;
    let db = setup_db(&container).await?;
    Ok(TestContext { container, db })
}

/// HTTP response snapshot for testing JSON endpoints.
#[derive(Debug, Serialize)]
pub struct HttpResponseSnapshot {
    test_context: String,
    status: u16,
    headers: BTreeMap<String, String>,
    body: serde_json::Value,
}

impl HttpResponseSnapshot {
    pub fn new(body: &[u8], status: StatusCode, headers: &HeaderMap, test_context: &str) -> Self {
        let body = if body.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(body).expect("response body should be JSON")
        };
        Self {
            test_context: test_context.to_string(),
            status: status.as_u16(),
            headers: filter_variable_headers(headers),
            body,
        }
    }
}

/// Filter out variable headers from response headers for snapshot testing.
fn filter_variable_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    let variable_headers = ["date", "content-length", "x-request-id"];

    headers
        .iter()
        .filter_map(|(name, value)| {
            let name_str = name.as_str().to_lowercase();
            if variable_headers.contains(&name_str.as_str()) {
                None
            } else {
                value.to_str().ok().map(|v| (name_str, v.to_string()))
            }
        })
        .collect()
}
