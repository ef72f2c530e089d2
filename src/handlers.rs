use crate::error::{AppError, AppResult};
use crate::models::{
    ApiResponse, CreateTodoRequest, HealthResponse, Todo, UpdateTodoRequest,
};
use crate::schemas::{TodoId, Validated};
use crate::service::TodoService;
use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use tracing::debug;

#[derive(Clone)]
pub struct AppState {
    pub todos: TodoService,
}

impl AppState {
    pub fn new(todos: TodoService) -> Self {
        Self { todos }
    }
}

pub async fn health_check() -> AppResult<Json<HealthResponse>> {
    Ok(Json(HealthResponse {
        status: "OK".to_string(),
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}

/// POST /api/todos
pub async fn create_todo(
    State(state): State<AppState>,
    Validated(request): Validated<CreateTodoRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Todo>>)> {
    let todo = state.todos.create_todo(&request.title).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(todo))))
}

/// GET /api/todos
pub async fn list_todos(State(state): State<AppState>) -> AppResult<Json<ApiResponse<Vec<Todo>>>> {
    let todos = state.todos.get_todos().await?;
    debug!(count = todos.len(), "Listed todos");

    Ok(Json(ApiResponse::ok(todos)))
}

/// GET /api/todos/:id
pub async fn get_todo(
    State(state): State<AppState>,
    TodoId(id): TodoId,
) -> AppResult<Json<ApiResponse<Todo>>> {
    let todo = state.todos.get_todo_by_id(id).await?;

    Ok(Json(ApiResponse::ok(todo)))
}

/// PATCH /api/todos/:id
pub async fn update_todo(
    State(state): State<AppState>,
    TodoId(id): TodoId,
    Validated(request): Validated<UpdateTodoRequest>,
) -> AppResult<Json<ApiResponse<Todo>>> {
    let todo = state.todos.update_todo(id, &request).await?;

    Ok(Json(ApiResponse::ok(todo)))
}

/// DELETE /api/todos/:id
pub async fn delete_todo(
    State(state): State<AppState>,
    TodoId(id): TodoId,
) -> AppResult<StatusCode> {
    state.todos.delete_todo(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn route_not_found() -> AppError {
    AppError::NotFound("Route Not Found".to_string())
}
