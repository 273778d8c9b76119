//! Token issuance and verification for bearer sessions.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;
use tracing::debug;

use super::{Claims, Role};

/// Fixed lifetime of every issued token.
pub const TOKEN_TTL_MINUTES: i64 = 30;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("missing bearer token")]
    Missing,

    /// Bad signature, malformed token, expired token and sentinel user ids all land here.
    #[error("invalid bearer token")]
    Invalid,

    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// Issues and verifies HS256 tokens with one server-wide secret.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl: Duration::minutes(TOKEN_TTL_MINUTES),
        }
    }

    /// Mint a token for an identity whose password has already been verified.
    pub fn issue(&self, user_id: i32, role: Role) -> Result<String, TokenError> {
        self.issue_at(user_id, role, Utc::now())
    }

    pub fn issue_at(&self, user_id: i32, role: Role, issued_at: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = Claims {
            user_id,
            role,
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
        };

        debug!("Issuing token for user {} ({})", user_id, role);

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify a raw `Authorization` header value.
    pub fn verify_header(&self, header: Option<&str>) -> Result<Claims, TokenError> {
        let header = header.ok_or(TokenError::Missing)?;
        if header.trim().is_empty() {
            return Err(TokenError::Missing);
        }

        let token = header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(TokenError::Invalid)?;

        self.verify(token)
    }

    /// Verify signature and expiry and return the claims exactly as signed.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            debug!("Token rejected: {}", e);
            TokenError::Invalid
        })?;

        let claims = data.claims;

        // The decoder tolerates exp == now; a claim is only valid strictly before expiry.
        if claims.exp <= Utc::now().timestamp() {
            debug!("Token rejected: expired");
            return Err(TokenError::Invalid);
        }

        if claims.user_id == 0 {
            debug!("Token rejected: sentinel user id");
            return Err(TokenError::Invalid);
        }

        Ok(claims)
    }
}
