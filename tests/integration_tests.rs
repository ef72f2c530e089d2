use axum::{
    body::Bytes,
    http::{header, HeaderValue, Method, StatusCode},
    routing::get,
    Extension, Router,
};
use axum_test::TestServer;
use serde_json::{json, Value};
use tempfile::NamedTempFile;
use todo_backend::{
    database::Database,
    handlers::AppState,
    middleware::Cookies,
    routes::{create_router, with_middleware},
    service::TodoService,
};

async fn create_test_server() -> (TestServer, NamedTempFile) {
    // Create a temporary database file
    let db_file = NamedTempFile::new().unwrap();
    let database_url = format!("sqlite:{}", db_file.path().display());

    let db = Database::new_with_migrations(&database_url).await.unwrap();

    let state = AppState::new(TodoService::new(db));
    let app = create_router(state);

    (TestServer::new(app).unwrap(), db_file)
}

async fn create_todo(server: &TestServer, title: &str) -> Value {
    let response = server
        .post("/api/todos")
        .json(&json!({ "title": title }))
        .await;
    response.assert_status(StatusCode::CREATED);

    let body: Value = response.json();
    body["data"].clone()
}

fn assert_error_envelope(body: &Value, message: &str) {
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], message);
}

#[tokio::test]
async fn test_health_check() {
    let (server, _db_file) = create_test_server().await;

    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["status"], "OK");
    assert!(body["timestamp"].is_string());
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_create_todo() {
    let (server, _db_file) = create_test_server().await;

    let response = server
        .post("/api/todos")
        .json(&json!({ "title": "Buy milk" }))
        .await;
    response.assert_status(StatusCode::CREATED);

    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["title"], "Buy milk");
    assert_eq!(body["data"]["completed"], false);
    assert!(body["data"]["id"].is_i64());
    assert!(body["data"]["createdAt"].is_string());
}

#[tokio::test]
async fn test_create_todo_from_form() {
    let (server, _db_file) = create_test_server().await;

    let response = server
        .post("/api/todos")
        .form(&[("title", "Water plants")])
        .await;
    response.assert_status(StatusCode::CREATED);

    let body: Value = response.json();
    assert_eq!(body["data"]["title"], "Water plants");
}

#[tokio::test]
async fn test_create_todo_validation() {
    let (server, _db_file) = create_test_server().await;

    let response = server
        .post("/api/todos")
        .json(&json!({ "title": "" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_error_envelope(&body, "Invalid title: must not be empty");

    let response = server.post("/api/todos").json(&json!({})).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["status"], "error");

    let response = server
        .post("/api/todos")
        .json(&json!({ "title": 7 }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    // Nothing was written
    let body: Value = server.get("/api/todos").await.json();
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_create_todo_oversized_body() {
    let (server, _db_file) = create_test_server().await;

    let response = server
        .post("/api/todos")
        .json(&json!({ "title": "x".repeat(200 * 1024) }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert_eq!(body["status"], "error");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_create_todo_oversized_body_with_content_length() {
    let (server, _db_file) = create_test_server().await;

    let payload = serde_json::to_vec(&json!({ "title": "x".repeat(200 * 1024) })).unwrap();
    let content_length = HeaderValue::from(payload.len());

    let response = server
        .post("/api/todos")
        .bytes(Bytes::from(payload))
        .content_type("application/json")
        .add_header(header::CONTENT_LENGTH, content_length)
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert_eq!(body["status"], "error");

    let body: Value = server.get("/api/todos").await.json();
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_list_todos_newest_first() {
    let (server, _db_file) = create_test_server().await;

    let first = create_todo(&server, "first").await;
    let second = create_todo(&server, "second").await;

    let response = server.get("/api/todos").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["success"], true);
    let todos = body["data"].as_array().unwrap();
    assert_eq!(todos.len(), 2);
    assert_eq!(todos[0]["id"], second["id"]);
    assert_eq!(todos[1]["id"], first["id"]);
}

#[tokio::test]
async fn test_get_todo_by_id() {
    let (server, _db_file) = create_test_server().await;
    let todo = create_todo(&server, "Read book").await;

    let response = server.get(&format!("/api/todos/{}", todo["id"])).await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"], todo);
}

#[tokio::test]
async fn test_get_nonexistent_todo() {
    let (server, _db_file) = create_test_server().await;

    let response = server.get("/api/todos/999999").await;
    response.assert_status(StatusCode::NOT_FOUND);

    let body: Value = response.json();
    assert_error_envelope(&body, "Todo Not Found");
}

#[tokio::test]
async fn test_invalid_todo_id() {
    let (server, _db_file) = create_test_server().await;

    for path in ["/api/todos/abc", "/api/todos/-1", "/api/todos/99999999999999999999"] {
        let response = server.get(path).await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: Value = response.json();
        assert_eq!(body["status"], "error");
        assert!(body["message"].as_str().unwrap().contains("id"));
    }

    let response = server.delete("/api/todos/abc").await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_todo_completed_only() {
    let (server, _db_file) = create_test_server().await;
    let todo = create_todo(&server, "Walk dog").await;

    let response = server
        .patch(&format!("/api/todos/{}", todo["id"]))
        .json(&json!({ "completed": true }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["title"], "Walk dog");
    assert_eq!(body["data"]["completed"], true);
    assert_eq!(body["data"]["createdAt"], todo["createdAt"]);
}

#[tokio::test]
async fn test_update_todo_validation() {
    let (server, _db_file) = create_test_server().await;
    let todo = create_todo(&server, "Keep title").await;
    let path = format!("/api/todos/{}", todo["id"]);

    let response = server.patch(&path).json(&json!({ "title": "" })).await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = server
        .patch(&path)
        .json(&json!({ "completed": "yes" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = server.get(&path).await.json();
    assert_eq!(body["data"]["title"], "Keep title");
    assert_eq!(body["data"]["completed"], false);
}

#[tokio::test]
async fn test_update_nonexistent_todo() {
    let (server, _db_file) = create_test_server().await;

    let response = server
        .patch("/api/todos/999999")
        .json(&json!({ "title": "ghost" }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);

    let body: Value = response.json();
    assert_error_envelope(&body, "Todo Not Found");

    let body: Value = server.get("/api/todos").await.json();
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_delete_todo() {
    let (server, _db_file) = create_test_server().await;
    let todo = create_todo(&server, "Take out trash").await;
    let path = format!("/api/todos/{}", todo["id"]);

    let response = server.delete(&path).await;
    response.assert_status(StatusCode::NO_CONTENT);
    assert!(response.text().is_empty());

    let response = server.get(&path).await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_nonexistent_todo_is_repeatable() {
    let (server, _db_file) = create_test_server().await;

    for _ in 0..3 {
        let response = server.delete("/api/todos/999999").await;
        response.assert_status(StatusCode::NOT_FOUND);

        let body: Value = response.json();
        assert_error_envelope(&body, "Todo Not Found");
    }
}

#[tokio::test]
async fn test_unknown_route() {
    let (server, _db_file) = create_test_server().await;

    let response = server.get("/api/unknown").await;
    response.assert_status(StatusCode::NOT_FOUND);

    let body: Value = response.json();
    assert_error_envelope(&body, "Route Not Found");
}

#[tokio::test]
async fn test_unrouted_method_uses_error_envelope() {
    let (server, _db_file) = create_test_server().await;
    let todo = create_todo(&server, "Stay put").await;

    let requests = [
        (Method::PUT, format!("/api/todos/{}", todo["id"])),
        (Method::DELETE, "/api/todos".to_string()),
        (Method::POST, "/health".to_string()),
    ];

    for (method, path) in requests {
        let response = server
            .method(method, &path)
            .json(&json!({ "title": "replaced" }))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);

        let body: Value = response.json();
        assert_error_envelope(&body, "Route Not Found");
    }

    let body: Value = server.get(&format!("/api/todos/{}", todo["id"])).await.json();
    assert_eq!(body["data"]["title"], "Stay put");
}

async fn session_cookie(Extension(cookies): Extension<Cookies>) -> String {
    cookies.get("session").unwrap_or_default().to_string()
}

#[tokio::test]
async fn test_cookies_reach_handlers() {
    let app = with_middleware(Router::new().route("/session", get(session_cookie)));
    let server = TestServer::new(app).unwrap();

    let response = server
        .get("/session")
        .add_header(header::COOKIE, HeaderValue::from_static("session=abc; theme=dark"))
        .await;
    response.assert_status_ok();
    assert_eq!(response.text(), "abc");

    let response = server.get("/session").await;
    response.assert_status_ok();
    assert_eq!(response.text(), "");
}

#[tokio::test]
async fn test_requests_with_cookies() {
    let (server, _db_file) = create_test_server().await;

    let response = server
        .post("/api/todos")
        .add_header(header::COOKIE, HeaderValue::from_static("session=abc; theme=dark"))
        .json(&json!({ "title": "With cookies" }))
        .await;
    response.assert_status(StatusCode::CREATED);
}

#[tokio::test]
async fn test_cors_headers() {
    let (server, _db_file) = create_test_server().await;

    let response = server
        .method(Method::OPTIONS, "/api/todos")
        .add_header(header::ORIGIN, HeaderValue::from_static("http://localhost:3000"))
        .add_header(
            header::ACCESS_CONTROL_REQUEST_METHOD,
            HeaderValue::from_static("POST"),
        )
        .await;

    // CORS preflight should be handled
    assert!(response.status_code().is_success());
    assert_eq!(
        response.header(header::ACCESS_CONTROL_ALLOW_ORIGIN),
        HeaderValue::from_static("*")
    );
}
