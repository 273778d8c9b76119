// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Token acquisition plus liveness endpoints.

pub mod auth;
pub mod home;

pub use auth::{login, register};
pub use home::{health, root};
