use axum::extract::{rejection::QueryRejection, Query, State};

use crate::error::ApiError;
use crate::handlers::QueryParams;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

/// DELETE /todos/delete?id= - owners delete their own todos, admins any todo
pub async fn delete_todo(
    State(state): State<AppState>,
    user: AuthUser,
    query: Result<Query<QueryParams>, QueryRejection>,
) -> ApiResult<()> {
    let Query(query) = query?;
    let id = query.todo_id()?;

    let owned = match state.store.find_todo(id).await? {
        Some(todo) => user.is_admin() || todo.user_id == user.user_id(),
        None => false,
    };
    if !owned {
        tracing::warn!("User {} denied delete of todo {}", user.user_id(), id);
        return Err(ApiError::not_found_or_forbidden());
    }

    let scope = (!user.is_admin()).then(|| user.user_id());
    if !state.store.delete_todo(id, scope).await? {
        return Err(ApiError::not_found_or_forbidden());
    }

    tracing::debug!("User {} deleted todo {}", user.user_id(), id);
    Ok(ApiResponse::no_content())
}
