use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
use std::path::PathBuf;
use std::sync::Arc;
use todo_server::entities::todos;
use todo_server::todo::TodoState;
use todo_server::web::create_app;
use tower::ServiceExt;
use tower_http::normalize_path::NormalizePath;

/// Create the full app against the shipped client bundle.
fn create_test_app_with(db: DatabaseConnection) -> NormalizePath<Router> {
    let static_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("public");
    create_app(TodoState { db: Arc::new(db) }, &static_dir)
}

/// Create the full app with a store that is never queried.
fn create_test_app() -> NormalizePath<Router> {
    create_test_app_with(MockDatabase::new(DatabaseBackend::Postgres).into_connection())
}

async fn send(
    app: NormalizePath<Router>,
    method: &str,
    uri: &str,
) -> (StatusCode, Option<String>, String) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, content_type, String::from_utf8(body.to_vec()).unwrap())
}

async fn get(uri: &str) -> (StatusCode, Option<String>, String) {
    send(create_test_app(), "GET", uri).await
}

#[tokio::test]
async fn can_serve_client_entry_page() {
    let (status, content_type, body) = get("/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(content_type.unwrap().starts_with("text/html"));
    assert!(body.contains(r#"<script src="/app.js"></script>"#));
}

#[tokio::test]
async fn can_serve_client_script() {
    let (status, content_type, body) = get("/app.js").await;

    assert_eq!(status, StatusCode::OK);
    assert!(content_type.unwrap().contains("javascript"));
    assert!(body.contains("/api/todos"));
}

#[tokio::test]
async fn can_fall_back_to_entry_page_for_client_routes() {
    let (status, _, body) = get("/todos/completed").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#"<form id="todo-form">"#));
}

#[tokio::test]
async fn can_fall_back_to_entry_page_for_get_on_todo_path() {
    let (status, content_type, body) = get("/api/todos/1").await;

    assert_eq!(status, StatusCode::OK);
    assert!(content_type.unwrap().starts_with("text/html"));
    assert!(body.contains(r#"<form id="todo-form">"#));
}

#[tokio::test]
async fn can_list_todos_with_trailing_slash() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<todos::Model>::new()])
        .into_connection();

    let (status, content_type, body) = send(create_test_app_with(db), "GET", "/api/todos/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/json"));
    assert_eq!(body, "[]");
}

#[tokio::test]
async fn can_delete_todo_with_trailing_slash() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection();

    let (status, _, body) = send(create_test_app_with(db), "DELETE", "/api/todos/1/").await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());
}
