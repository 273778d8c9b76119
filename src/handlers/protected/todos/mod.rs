pub mod create;
pub mod delete;
pub mod list;
pub mod update;

pub use create::create_todo;
pub use delete::delete_todo;
pub use list::list_todos;
pub use update::update_todo;
