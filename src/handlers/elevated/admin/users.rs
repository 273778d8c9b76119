use axum::extract::State;

use crate::database::models::UserSummary;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /admin/getallusers - every account without its password hash
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Vec<UserSummary>> {
    let users = state.store.list_users().await?;
    Ok(ApiResponse::success(users))
}
