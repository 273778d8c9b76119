// handlers/elevated/mod.rs - Elevated handlers (admin role required)
//
// Mounted behind `jwt_auth_middleware` and then `require_admin`, so ownership
// never applies here.

pub mod admin;

pub use admin::*;
