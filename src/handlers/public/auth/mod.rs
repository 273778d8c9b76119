// handlers/public/auth/mod.rs - credential entry points
//
// POST /register creates an account, POST /login exchanges credentials for a bearer token.

pub mod login;
pub mod register;

pub use login::login;
pub use register::register;
