use std::sync::Arc;

use crate::auth::{PasswordHasher, TokenService};
use crate::database::Store;

/// Shared, read-only dependencies handed to every handler and middleware.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub tokens: Arc<TokenService>,
    pub passwords: PasswordHasher,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, tokens: TokenService, passwords: PasswordHasher) -> Self {
        Self {
            store,
            tokens: Arc::new(tokens),
            passwords,
        }
    }
}
