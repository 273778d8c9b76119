use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

fn invalid_credentials() -> ApiError {
    ApiError::unauthorized("Invalid credentials")
}

/// POST /login - verify credentials and issue a bearer token
///
/// Unknown usernames and wrong passwords produce the same 401 after the same bcrypt work.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<LoginResponse> {
    let Json(payload) = payload?;

    let username = payload.username.trim();

    let user = match state.store.find_user_by_username(username).await? {
        Some(user) => user,
        None => {
            state.passwords.verify_absent(&payload.password).await?;
            tracing::debug!("Login failed: unknown username");
            return Err(invalid_credentials());
        }
    };

    if !state.passwords.verify(&payload.password, &user.password_hash).await? {
        tracing::debug!("Login failed: wrong password for user {}", user.id);
        return Err(invalid_credentials());
    }

    let token = state.tokens.issue(user.id, user.role)?;
    tracing::info!("User {} logged in", user.id);

    Ok(ApiResponse::success(LoginResponse { token }))
}
