use axum::{
    Json, Router,
    extract::{FromRequest, Request, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

use crate::todo::request::{CreateTodoRequest, UpdateTodoRequest};
use crate::todo::{Todo, TodoService, TodoState, ValidationError};

/// JSON body of every error response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable description of what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: String) -> Self {
        Self { error }
    }
}

/// JSON body of the health check.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// `ok` when the store answered, `error` otherwise
    pub status: String,
}

/// Error type for JSON API handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed, missing or oversized input.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// No row matched the requested id.
    #[error("Todo not found")]
    NotFound,
    /// The store could not be reached or the query failed. The message is
    /// what the client sees; the source stays in the logs.
    #[error("{message}")]
    Store {
        message: &'static str,
        #[source]
        source: sea_orm::DbErr,
    },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status_code = match &self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status_code, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

/// JSON body extractor that reports rejections as `400 {error}` instead of
/// axum's plain-text responses.
#[derive(Debug)]
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(request, state)
            .await
            .map_err(|rejection| ValidationError::MalformedBody(rejection.body_text()))?;
        Ok(ApiJson(value))
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check_handler,
        crate::todo::api::get_todos_handler,
        crate::todo::api::create_todo_handler,
        crate::todo::api::update_todo_handler,
        crate::todo::api::delete_todo_handler,
    ),
    components(schemas(
        Todo,
        CreateTodoRequest,
        UpdateTodoRequest,
        ErrorResponse,
        HealthResponse
    )),
    tags(
        (name = "Todos", description = "Todo list management"),
        (name = "Health", description = "Service health")
    )
)]
pub struct ApiDoc;

/// Handler for GET /api/health - Reports whether the store is reachable.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Store is reachable", body = HealthResponse),
        (status = 500, description = "Store is unreachable", body = HealthResponse)
    ),
    tag = "Health"
)]
pub async fn health_check_handler(
    State(state): State<TodoState>,
) -> (StatusCode, Json<HealthResponse>) {
    match TodoService::new(&state.db).ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok".to_string(),
            }),
        ),
        Err(err) => {
            tracing::error!("Health check failed: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(HealthResponse {
                    status: "error".to_string(),
                }),
            )
        }
    }
}

async fn openapi_handler() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Creates the API routes for JSON API endpoints under `/api`.
pub fn create_api_router(state: TodoState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check_handler))
        .route("/openapi.json", get(openapi_handler))
        .merge(crate::todo::api::create_api_router())
        .with_state(state);
    Router::new().nest("/api", api_routes)
}
