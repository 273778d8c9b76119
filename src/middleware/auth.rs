use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::auth::{Claims, Role, TokenError};
use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated identity extracted from a verified token.
///
/// Only the authentication middleware creates one, so a handler that takes an
/// `AuthUser` argument can only run behind it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    user_id: i32,
    role: Role,
}

impl AuthUser {
    pub fn user_id(&self) -> i32 {
        self.user_id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id,
            role: claims.role,
        }
    }
}

/// JWT authentication middleware that validates tokens and injects `AuthUser`
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .map(|value| value.to_str().map_err(|_| ApiError::from(TokenError::Invalid)))
        .transpose()?;

    let claims = state.tokens.verify_header(header).map_err(|e| {
        tracing::debug!("Authentication failed for {}: {}", request.uri().path(), e);
        ApiError::from(e)
    })?;

    let auth_user = AuthUser::from(claims);
    tracing::debug!("Authenticated user {} ({})", auth_user.user_id, auth_user.role);

    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<AuthUser>().cloned().ok_or_else(|| {
            // Route wiring bug: handler mounted without the authentication layer.
            tracing::error!("AuthUser requested on {} without authentication middleware", parts.uri.path());
            ApiError::internal_server_error("Authentication context missing")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request as HttpRequest};

    #[tokio::test]
    async fn extracts_injected_user() {
        let request = HttpRequest::builder().uri("/todos").body(Body::empty()).unwrap();
        let (mut parts, _) = request.into_parts();
        parts.extensions.insert(AuthUser::from(Claims {
            user_id: 5,
            role: Role::Admin,
            iat: 0,
            exp: 1,
        }));

        let user = AuthUser::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(user.user_id(), 5);
        assert!(user.is_admin());
    }

    #[tokio::test]
    async fn missing_context_is_a_server_error() {
        let request = HttpRequest::builder().uri("/todos").body(Body::empty()).unwrap();
        let (mut parts, _) = request.into_parts();

        let err = AuthUser::from_request_parts(&mut parts, &()).await.unwrap_err();
        assert_eq!(err.status_code(), 500);
    }
}
