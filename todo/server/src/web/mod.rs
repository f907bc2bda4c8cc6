use axum::Router;
use axum::extract::Request;
use migration::MigratorTrait;
use sea_orm::{ConnectOptions, Database};
use std::path::Path;
use std::sync::Arc;
use tower::{Layer, ServiceBuilder, ServiceExt};
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::todo::TodoState;

pub mod api;

/// Builds the full application: JSON API under `/api`, everything else served
/// from `static_dir` with `index.html` as the single-page-app fallback.
///
/// Trailing slashes are trimmed before routing, so `/api/todos/` reaches the
/// same handler as `/api/todos`.
pub fn create_app(state: TodoState, static_dir: &Path) -> NormalizePath<Router> {
    let index = static_dir.join("index.html");
    let entry_page = ServeFile::new(&index);
    let client = ServeDir::new(static_dir).fallback(ServeFile::new(&index));

    let router = Router::new()
        .merge(api::create_api_router(state))
        // A known API path with an unsupported method is still a client route.
        .method_not_allowed_fallback(move |request: Request| entry_page.clone().oneshot(request))
        .fallback_service(client)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));

    NormalizePathLayer::trim_trailing_slash().layer(router)
}

#[tracing::instrument(skip(config))]
pub async fn start_web_server(config: Config) -> anyhow::Result<()> {
    let mut connect_options = ConnectOptions::new(config.database_url());
    connect_options.max_connections(config.db_max_connections);
    let db = Database::connect(connect_options).await?;
    migration::Migrator::up(&db, None).await?;
    tracing::info!("Database migrations applied successfully");

    let server_address = format!("0.0.0.0:{}", &config.port);
    let listener = tokio::net::TcpListener::bind(&server_address).await?;
    tracing::info!("Todo app running on http://{}", server_address);

    let state = TodoState { db: Arc::new(db) };
    let app = create_app(state, &config.static_dir);

    axum::serve(
        listener,
        axum::ServiceExt::<Request>::into_make_service(app),
    )
    .await?;
    Ok(())
}
