use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{NewUser, Todo, TodoFilter, User, UserSummary};

/// Credential store
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new account. Duplicate usernames fail with `UniqueViolation`.
    async fn insert_user(&self, user: NewUser) -> Result<User, DatabaseError>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError>;

    async fn list_users(&self) -> Result<Vec<UserSummary>, DatabaseError>;
}

/// Todo store. Every call touches a single row or a single filtered read.
#[async_trait]
pub trait TodoStore: Send + Sync {
    async fn list_todos(&self, filter: TodoFilter) -> Result<Vec<Todo>, DatabaseError>;

    async fn find_todo(&self, id: i32) -> Result<Option<Todo>, DatabaseError>;

    /// Insert a todo for `owner`. An unknown owner fails with `ForeignKeyViolation`.
    async fn insert_todo(&self, owner: i32, title: &str) -> Result<Todo, DatabaseError>;

    /// Update title/completed of the todo `id` owned by `owner`. `None` when no such row.
    async fn update_todo(
        &self,
        id: i32,
        owner: i32,
        title: &str,
        completed: bool,
    ) -> Result<Option<Todo>, DatabaseError>;

    /// Delete todo `id`, restricted to `owner` when given. Returns whether a row was removed.
    async fn delete_todo(&self, id: i32, owner: Option<i32>) -> Result<bool, DatabaseError>;
}

#[async_trait]
pub trait Store: UserStore + TodoStore {
    async fn ping(&self) -> Result<(), DatabaseError>;
}

const TODO_COLUMNS: &str = "id, title, completed, user_id";

/// Postgres-backed store
#[derive(Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgRepository {
    async fn insert_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        let row = sqlx::query_as::<_, User>(
            "INSERT INTO users (username, password, role) VALUES ($1, $2, $3) \
             RETURNING id, username, password, role",
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        let row = sqlx::query_as::<_, User>(
            "SELECT id, username, password, role FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn list_users(&self) -> Result<Vec<UserSummary>, DatabaseError> {
        let rows = sqlx::query_as::<_, UserSummary>("SELECT id, username, role FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }
}

#[async_trait]
impl TodoStore for PgRepository {
    async fn list_todos(&self, filter: TodoFilter) -> Result<Vec<Todo>, DatabaseError> {
        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {} FROM todos WHERE TRUE", TODO_COLUMNS));

        if let Some(owner) = filter.owner {
            query.push(" AND user_id = ").push_bind(owner);
        }
        if let Some(completed) = filter.completed {
            query.push(" AND completed = ").push_bind(completed);
        }
        query.push(" ORDER BY id");

        let rows = query.build_query_as::<Todo>().fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn find_todo(&self, id: i32) -> Result<Option<Todo>, DatabaseError> {
        let row = sqlx::query_as::<_, Todo>(&format!("SELECT {} FROM todos WHERE id = $1", TODO_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    async fn insert_todo(&self, owner: i32, title: &str) -> Result<Todo, DatabaseError> {
        let row = sqlx::query_as::<_, Todo>(&format!(
            "INSERT INTO todos (title, user_id) VALUES ($1, $2) RETURNING {}",
            TODO_COLUMNS
        ))
        .bind(title)
        .bind(owner)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update_todo(
        &self,
        id: i32,
        owner: i32,
        title: &str,
        completed: bool,
    ) -> Result<Option<Todo>, DatabaseError> {
        let row = sqlx::query_as::<_, Todo>(&format!(
            "UPDATE todos SET title = $1, completed = $2 WHERE id = $3 AND user_id = $4 RETURNING {}",
            TODO_COLUMNS
        ))
        .bind(title)
        .bind(completed)
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn delete_todo(&self, id: i32, owner: Option<i32>) -> Result<bool, DatabaseError> {
        let result = match owner {
            Some(owner) => {
                sqlx::query("DELETE FROM todos WHERE id = $1 AND user_id = $2")
                    .bind(id)
                    .bind(owner)
                    .execute(&self.pool)
                    .await?
            }
            None => {
                sqlx::query("DELETE FROM todos WHERE id = $1")
                    .bind(id)
                    .execute(&self.pool)
                    .await?
            }
        };

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl Store for PgRepository {
    async fn ping(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }
}
