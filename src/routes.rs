use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::error::ApiError;
use crate::handlers::{elevated, protected, public};
use crate::middleware::{jwt_auth_middleware, require_admin};
use crate::state::AppState;

/// Full application router
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(public_routes())
        .merge(todo_routes(state.clone()))
        .merge(admin_routes(state.clone()))
        .fallback(not_found)
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .route("/register", post(public::register))
        .route("/login", post(public::login))
}

fn todo_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/todos", get(protected::list_todos))
        .route("/todos/create", post(protected::create_todo))
        .route("/todos/update", put(protected::update_todo))
        .route("/todos/delete", delete(protected::delete_todo))
        .route_layer(from_fn_with_state(state, jwt_auth_middleware))
}

fn admin_routes(state: AppState) -> Router<AppState> {
    // Layers wrap outward: authentication runs first, then the role gate.
    Router::new()
        .route("/admin/todos", delete(elevated::admin_delete_todo))
        .route("/admin/getallusers", get(elevated::list_users))
        .route_layer(from_fn(require_admin))
        .route_layer(from_fn_with_state(state, jwt_auth_middleware))
}

async fn not_found() -> ApiError {
    ApiError::not_found("Route not found")
}
