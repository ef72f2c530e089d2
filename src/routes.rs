use crate::handlers::{
    create_todo, delete_todo, get_todo, health_check, list_todos, route_not_found, update_todo,
    AppState,
};
use crate::middleware::parse_cookies;
use axum::{extract::DefaultBodyLimit, middleware, routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Maximum accepted request body (100 KiB).
pub const MAX_BODY_SIZE: usize = 100 * 1024;

pub fn todo_routes() -> Router<AppState> {
    // Unrouted methods on a known path answer like an unknown route
    Router::new()
        .route(
            "/",
            get(list_todos).post(create_todo).fallback(route_not_found),
        )
        .route(
            "/:id",
            get(get_todo)
                .patch(update_todo)
                .delete(delete_todo)
                .fallback(route_not_found),
        )
}

/// Wraps `router` in the global middleware stack.
///
/// The body limit is enforced by the body extractors so an oversized
/// payload is rejected through `AppError` like any other bad input.
pub fn with_middleware(router: Router) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .allow_origin(Any);

    router
        // Middleware stack (last added = outermost)
        .layer(middleware::from_fn(parse_cookies))
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub fn create_router(state: AppState) -> Router {
    let routes = Router::new()
        // Health check
        .route("/health", get(health_check).fallback(route_not_found))

        // Todo routes
        .nest("/api/todos", todo_routes())
        .fallback(route_not_found)
        .with_state(state);

    with_middleware(routes)
}
