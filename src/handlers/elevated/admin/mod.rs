pub mod todos;
pub mod users;

pub use todos::admin_delete_todo;
pub use users::list_users;
