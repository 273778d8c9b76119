use axum::{extract::Request, middleware::Next, response::Response};

use super::auth::AuthUser;
use crate::error::ApiError;

/// Role gate for admin-only routes. Must be layered inside `jwt_auth_middleware`.
pub async fn require_admin(user: AuthUser, request: Request, next: Next) -> Result<Response, ApiError> {
    if !user.is_admin() {
        tracing::warn!(
            "User {} ({}) denied access to {}",
            user.user_id(),
            user.role(),
            request.uri().path()
        );
        return Err(ApiError::forbidden("Forbidden: Admins only"));
    }

    Ok(next.run(request).await)
}
