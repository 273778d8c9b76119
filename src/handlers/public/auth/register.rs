use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Deserialize;

use crate::auth::Role;
use crate::database::models::NewUser;
use crate::error::ApiError;
use crate::handlers::MessageResponse;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<String>,
}

impl RegisterRequest {
    /// Absent or empty role means `user`; anything else must name a known role.
    fn role(&self) -> Result<Role, ApiError> {
        match self.role.as_deref().map(str::trim) {
            None | Some("") => Ok(Role::default()),
            Some(raw) => raw
                .parse::<Role>()
                .map_err(|_| ApiError::bad_request(format!("Invalid role: {}", raw))),
        }
    }
}

/// POST /register - create an account (role defaults to `user`)
///
/// Any store rejection, a taken username included, is answered with the same 400.
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<MessageResponse> {
    let Json(payload) = payload?;

    let username = payload.username.trim();
    if username.is_empty() {
        return Err(ApiError::bad_request("Username is required"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::bad_request("Password is required"));
    }

    let role = payload.role()?;
    let password_hash = state.passwords.hash(&payload.password).await?;

    let new_user = NewUser {
        username: username.to_string(),
        password_hash,
        role,
    };

    match state.store.insert_user(new_user).await {
        Ok(user) => {
            tracing::info!("Registered user {} ({}) as {}", user.username, user.id, user.role);
            Ok(ApiResponse::created(MessageResponse::new("User registered successfully")))
        }
        Err(e) => {
            tracing::warn!("Registration rejected: {}", e);
            Err(ApiError::bad_request("Username already taken"))
        }
    }
}
