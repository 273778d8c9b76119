// handlers/protected/mod.rs - Protected handlers (bearer token required)
//
// Every handler here takes an `AuthUser`, which only exists after
// `jwt_auth_middleware` accepted the request. Non-admin callers are confined
// to their own rows.

pub mod todos;

pub use todos::*;
