use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::database::manager::DatabaseError;
use crate::database::models::{NewUser, Todo, TodoFilter, User, UserSummary};
use crate::database::repository::{Store, TodoStore, UserStore};

/// In-process store with the same constraints as the Postgres schema:
/// unique usernames and todos that must reference an existing user.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

#[derive(Default)]
struct Tables {
    users: BTreeMap<i32, User>,
    todos: BTreeMap<i32, Todo>,
    last_user_id: i32,
    last_todo_id: i32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        let mut tables = self.tables.write().await;

        if tables.users.values().any(|u| u.username == user.username) {
            return Err(DatabaseError::UniqueViolation("users_username_key".to_string()));
        }

        tables.last_user_id += 1;
        let row = User {
            id: tables.last_user_id,
            username: user.username,
            password_hash: user.password_hash,
            role: user.role,
        };
        tables.users.insert(row.id, row.clone());
        Ok(row)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.username == username).cloned())
    }

    async fn list_users(&self) -> Result<Vec<UserSummary>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().map(UserSummary::from).collect())
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn list_todos(&self, filter: TodoFilter) -> Result<Vec<Todo>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables
            .todos
            .values()
            .filter(|todo| filter.matches(todo))
            .cloned()
            .collect())
    }

    async fn find_todo(&self, id: i32) -> Result<Option<Todo>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.todos.get(&id).cloned())
    }

    async fn insert_todo(&self, owner: i32, title: &str) -> Result<Todo, DatabaseError> {
        let mut tables = self.tables.write().await;

        if !tables.users.contains_key(&owner) {
            return Err(DatabaseError::ForeignKeyViolation("todos_user_id_fkey".to_string()));
        }

        tables.last_todo_id += 1;
        let row = Todo {
            id: tables.last_todo_id,
            title: title.to_string(),
            completed: false,
            user_id: owner,
        };
        tables.todos.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update_todo(
        &self,
        id: i32,
        owner: i32,
        title: &str,
        completed: bool,
    ) -> Result<Option<Todo>, DatabaseError> {
        let mut tables = self.tables.write().await;

        match tables.todos.get_mut(&id) {
            Some(todo) if todo.user_id == owner => {
                todo.title = title.to_string();
                todo.completed = completed;
                Ok(Some(todo.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete_todo(&self, id: i32, owner: Option<i32>) -> Result<bool, DatabaseError> {
        let mut tables = self.tables.write().await;

        let allowed = match (tables.todos.get(&id), owner) {
            (Some(todo), Some(owner)) => todo.user_id == owner,
            (Some(_), None) => true,
            (None, _) => false,
        };

        if allowed {
            tables.todos.remove(&id);
        }
        Ok(allowed)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}
