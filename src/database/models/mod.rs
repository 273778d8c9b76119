pub mod todo;
pub mod user;

pub use todo::{Todo, TodoFilter};
pub use user::{NewUser, User, UserSummary};
