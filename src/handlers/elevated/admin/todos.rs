use axum::extract::{rejection::QueryRejection, Query, State};

use crate::handlers::{MessageResponse, QueryParams};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

/// DELETE /admin/todos?id= - remove any todo by id
pub async fn admin_delete_todo(
    State(state): State<AppState>,
    admin: AuthUser,
    query: Result<Query<QueryParams>, QueryRejection>,
) -> ApiResult<MessageResponse> {
    let Query(query) = query?;
    let id = query.todo_id()?;

    if state.store.delete_todo(id, None).await? {
        tracing::info!("Admin {} deleted todo {}", admin.user_id(), id);
    } else {
        tracing::debug!("Admin {} deleted todo {}: no such row", admin.user_id(), id);
    }

    Ok(ApiResponse::success(MessageResponse::new("Todo deleted")))
}
