use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};
use serde::Deserialize;

use crate::database::models::Todo;
use crate::error::ApiError;
use crate::handlers::QueryParams;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateTodoRequest {
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

/// PUT /todos/update?id= - owner-only edit of title and completion
pub async fn update_todo(
    State(state): State<AppState>,
    user: AuthUser,
    query: Result<Query<QueryParams>, QueryRejection>,
    payload: Result<Json<UpdateTodoRequest>, JsonRejection>,
) -> ApiResult<Todo> {
    let Query(query) = query?;
    let id = query.todo_id()?;
    let Json(payload) = payload?;

    if payload.title.trim().is_empty() {
        return Err(ApiError::bad_request("Title is required"));
    }

    // Ownership check before touching the row. Admins edit only their own todos too.
    match state.store.find_todo(id).await? {
        Some(todo) if todo.user_id == user.user_id() => {}
        _ => {
            tracing::warn!("User {} denied update of todo {}", user.user_id(), id);
            return Err(ApiError::not_found_or_forbidden());
        }
    }

    let updated = state
        .store
        .update_todo(id, user.user_id(), &payload.title, payload.completed)
        .await?
        .ok_or_else(ApiError::not_found_or_forbidden)?;

    Ok(ApiResponse::success(updated))
}
