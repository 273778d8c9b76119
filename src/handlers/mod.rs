// handlers/mod.rs - three security tiers
//
// Public (no auth) → Protected (bearer token) → Elevated (bearer token + admin role)
pub mod elevated;
pub mod protected;
pub mod public;

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// `{ "message": ... }` body used by register and admin deletion.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// Raw query string as ordered pairs. A repeated key resolves to its first value.
#[derive(Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct QueryParams(pub Vec<(String, String)>);

impl QueryParams {
    pub fn first(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// `?id=` addressing a single todo
    pub fn todo_id(&self) -> Result<i32, ApiError> {
        let raw = self
            .first("id")
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ApiError::bad_request("Id is required"))?;

        raw.parse::<i32>()
            .map_err(|_| ApiError::bad_request(format!("Invalid id: {}", raw)))
    }
}
