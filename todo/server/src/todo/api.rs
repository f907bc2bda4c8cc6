use crate::todo::request::{CreateTodoRequest, UpdateTodoRequest, parse_todo_id};
use crate::todo::{NewTodo, Todo, TodoChanges, TodoService, TodoServiceError, TodoState};
use crate::web::api::{ApiError, ApiJson, ErrorResponse};
use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, patch},
};

/// Maps a service failure to the API error for the given operation.
fn service_error(message: &'static str) -> impl FnOnce(TodoServiceError) -> ApiError {
    move |err| match err {
        TodoServiceError::TodoNotFound(_) => ApiError::NotFound,
        TodoServiceError::Database(source) => {
            tracing::error!("{}: {}", message, source);
            ApiError::Store { message, source }
        }
    }
}

/// Handler for GET /api/todos - Returns all todos, newest first.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/todos",
    responses(
        (status = 200, description = "All todos ordered by id descending", body = [Todo]),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Todos"
)]
pub async fn get_todos_handler(
    State(state): State<TodoState>,
) -> Result<Json<Vec<Todo>>, ApiError> {
    let todos = TodoService::new(&state.db)
        .get_all_todos()
        .await
        .map_err(service_error("Failed to load todos"))?;
    Ok(Json(todos))
}

/// Handler for POST /api/todos - Creates a todo from `{title}`.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    post,
    path = "/api/todos",
    request_body = CreateTodoRequest,
    responses(
        (status = 201, description = "Todo created", body = Todo),
        (status = 400, description = "Invalid title", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Todos"
)]
pub async fn create_todo_handler(
    State(state): State<TodoState>,
    ApiJson(request): ApiJson<CreateTodoRequest>,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let new_todo = NewTodo::try_from(request)?;
    let todo = TodoService::new(&state.db)
        .create_todo(new_todo)
        .await
        .map_err(service_error("Failed to create todo"))?;
    tracing::info!("Created todo {}", todo.id);
    Ok((StatusCode::CREATED, Json(todo)))
}

/// Handler for PATCH /api/todos/{id} - Applies a partial update.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    patch,
    path = "/api/todos/{id}",
    params(
        ("id" = i64, Path, description = "Todo id")
    ),
    request_body = UpdateTodoRequest,
    responses(
        (status = 200, description = "Todo updated", body = Todo),
        (status = 400, description = "Invalid id or body", body = ErrorResponse),
        (status = 404, description = "Todo not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Todos"
)]
pub async fn update_todo_handler(
    State(state): State<TodoState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdateTodoRequest>,
) -> Result<Json<Todo>, ApiError> {
    let id = parse_todo_id(&id)?;
    let changes = TodoChanges::try_from(request)?;
    let id = id.ok_or(ApiError::NotFound)?;
    let todo = TodoService::new(&state.db)
        .update_todo(id, changes)
        .await
        .map_err(service_error("Failed to update todo"))?;
    Ok(Json(todo))
}

/// Handler for DELETE /api/todos/{id} - Deletes a todo.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    delete,
    path = "/api/todos/{id}",
    params(
        ("id" = i64, Path, description = "Todo id")
    ),
    responses(
        (status = 204, description = "Todo deleted"),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 404, description = "Todo not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Todos"
)]
pub async fn delete_todo_handler(
    State(state): State<TodoState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_todo_id(&id)?.ok_or(ApiError::NotFound)?;
    TodoService::new(&state.db)
        .delete_todo(id)
        .await
        .map_err(service_error("Failed to delete todo"))?;
    tracing::info!("Deleted todo {}", id);
    Ok(StatusCode::NO_CONTENT)
}

/// Creates the todo routes. State is supplied by the caller.
pub fn create_api_router() -> Router<TodoState> {
    Router::new()
        .route("/todos", get(get_todos_handler).post(create_todo_handler))
        .route(
            "/todos/{id}",
            patch(update_todo_handler).delete(delete_todo_handler),
        )
}
