use async_trait::async_trait;
use thiserror::Error;

use crate::database::models::{NewTodo, Todo, TodoFilter, TodoPatch, TodoStats};

#[derive(Debug, Error)]
pub enum StoreError {
    /// Absent, or owned by another user. The two cases are never distinguished.
    #[error("Todo not found")]
    NotFound,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Durable, owner-scoped storage of todos.
///
/// Every method takes the caller's `user_id` and restricts reads and writes
/// to rows owned by that user.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Newest first; `filter` fields narrow by exact match when present.
    async fn list(&self, user_id: i64, filter: &TodoFilter) -> Result<Vec<Todo>, StoreError>;

    async fn get(&self, user_id: i64, id: i64) -> Result<Todo, StoreError>;

    async fn create(&self, user_id: i64, todo: NewTodo) -> Result<Todo, StoreError>;

    /// Applies only the fields present in `patch` and always refreshes `updated_at`.
    async fn update(&self, user_id: i64, id: i64, patch: TodoPatch) -> Result<Todo, StoreError>;

    async fn delete(&self, user_id: i64, id: i64) -> Result<(), StoreError>;

    async fn count_by_status(&self, user_id: i64) -> Result<TodoStats, StoreError>;

    /// Readiness probe for the backing storage.
    async fn ping(&self) -> Result<(), StoreError>;
}
