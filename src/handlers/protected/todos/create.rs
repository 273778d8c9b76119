use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Deserialize;

use crate::database::models::Todo;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateTodoRequest {
    pub title: String,
}

/// POST /todos/create - new todo owned by the caller
pub async fn create_todo(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> ApiResult<Todo> {
    let Json(payload) = payload?;

    if payload.title.trim().is_empty() {
        return Err(ApiError::bad_request("Title is required"));
    }

    let todo = state.store.insert_todo(user.user_id(), &payload.title).await?;
    tracing::debug!("User {} created todo {}", user.user_id(), todo.id);

    Ok(ApiResponse::created(todo))
}
