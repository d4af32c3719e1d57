use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::database::models::{NewTodo, Todo, TodoFilter, TodoPatch, TodoStats, TodoStatus};
use crate::database::store::{StoreError, TodoStore};

#[derive(Debug, Default)]
struct Inner {
    last_id: i64,
    todos: BTreeMap<i64, Todo>,
}

/// Process-local todo store with the same owner-scoping rules as `PgTodoStore`.
/// Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryTodoStore {
    inner: RwLock<Inner>,
}

impl MemoryTodoStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoStore for MemoryTodoStore {
    async fn list(&self, user_id: i64, filter: &TodoFilter) -> Result<Vec<Todo>, StoreError> {
        let inner = self.inner.read().await;
        let mut todos: Vec<Todo> = inner
            .todos
            .values()
            .filter(|t| t.user_id == user_id)
            .filter(|t| filter.status.as_deref().map_or(true, |s| t.status == s))
            .filter(|t| filter.priority.as_deref().map_or(true, |p| t.priority == p))
            .cloned()
            .collect();

        todos.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(todos)
    }

    async fn get(&self, user_id: i64, id: i64) -> Result<Todo, StoreError> {
        let inner = self.inner.read().await;
        inner
            .todos
            .get(&id)
            .filter(|t| t.user_id == user_id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn create(&self, user_id: i64, todo: NewTodo) -> Result<Todo, StoreError> {
        let mut inner = self.inner.write().await;
        inner.last_id += 1;

        let now = Utc::now();
        let created = Todo {
            id: inner.last_id,
            user_id,
            title: todo.title,
            description: todo.description,
            status: todo.status.as_str().to_string(),
            priority: todo.priority.as_str().to_string(),
            due_date: todo.due_date,
            created_at: now,
            updated_at: now,
        };
        inner.todos.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update(&self, user_id: i64, id: i64, patch: TodoPatch) -> Result<Todo, StoreError> {
        let mut inner = self.inner.write().await;
        let todo = inner
            .todos
            .get_mut(&id)
            .filter(|t| t.user_id == user_id)
            .ok_or(StoreError::NotFound)?;

        patch.apply_to(todo);
        todo.updated_at = Utc::now().max(todo.created_at);
        Ok(todo.clone())
    }

    async fn delete(&self, user_id: i64, id: i64) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let owned = inner.todos.get(&id).is_some_and(|t| t.user_id == user_id);
        if !owned {
            return Err(StoreError::NotFound);
        }
        inner.todos.remove(&id);
        Ok(())
    }

    async fn count_by_status(&self, user_id: i64) -> Result<TodoStats, StoreError> {
        let inner = self.inner.read().await;
        let mut stats = TodoStats::default();
        for todo in inner.todos.values().filter(|t| t.user_id == user_id) {
            stats.total += 1;
            match todo.status.parse::<TodoStatus>() {
                Ok(TodoStatus::Pending) => stats.pending += 1,
                Ok(TodoStatus::InProgress) => stats.in_progress += 1,
                Ok(TodoStatus::Completed) => stats.completed += 1,
                Err(_) => {}
            }
        }
        Ok(stats)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
