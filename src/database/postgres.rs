use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::debug;

use crate::database::models::{NewTodo, Todo, TodoFilter, TodoPatch, TodoStats};
use crate::database::query_builder::{SelectQuery, UpdateQuery};
use crate::database::store::{StoreError, TodoStore};

const INSERT_TODO: &str = "INSERT INTO todos (user_id, title, description, status, priority, due_date, created_at, updated_at) \
     VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
     RETURNING id, user_id, title, description, status, priority, due_date, created_at, updated_at";

const DELETE_TODO: &str = "DELETE FROM todos WHERE id = $1 AND user_id = $2";

const COUNT_BY_STATUS: &str = "SELECT \
        COUNT(*) AS total, \
        COUNT(*) FILTER (WHERE status = 'pending') AS pending, \
        COUNT(*) FILTER (WHERE status = 'in_progress') AS in_progress, \
        COUNT(*) FILTER (WHERE status = 'completed') AS completed \
     FROM todos WHERE user_id = $1";

/// PostgreSQL-backed todo store over a shared connection pool
#[derive(Clone)]
pub struct PgTodoStore {
    pool: PgPool,
}

impl PgTodoStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TodoStore for PgTodoStore {
    async fn list(&self, user_id: i64, filter: &TodoFilter) -> Result<Vec<Todo>, StoreError> {
        let sql = SelectQuery::todos(user_id)
            .status_eq(filter.status.as_deref())
            .priority_eq(filter.priority.as_deref())
            .order_newest_first()
            .to_sql();
        debug!(query = %sql.query, "listing todos");

        let todos = sql.query_as::<Todo>().fetch_all(&self.pool).await?;
        Ok(todos)
    }

    async fn get(&self, user_id: i64, id: i64) -> Result<Todo, StoreError> {
        let sql = SelectQuery::todos(user_id).id_eq(id).to_sql();

        sql.query_as::<Todo>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)
    }

    async fn create(&self, user_id: i64, todo: NewTodo) -> Result<Todo, StoreError> {
        let now = Utc::now();

        let created = sqlx::query_as::<_, Todo>(INSERT_TODO)
            .bind(user_id)
            .bind(&todo.title)
            .bind(&todo.description)
            .bind(todo.status.as_str())
            .bind(todo.priority.as_str())
            .bind(todo.due_date)
            .bind(now)
            .bind(now)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    async fn update(&self, user_id: i64, id: i64, patch: TodoPatch) -> Result<Todo, StoreError> {
        let sql = UpdateQuery::todo(id, user_id, Utc::now()).patch(patch).to_sql();
        debug!(query = %sql.query, "updating todo");

        // Zero rows returned means the todo is missing or belongs to someone else
        sql.query_as::<Todo>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)
    }

    async fn delete(&self, user_id: i64, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query(DELETE_TODO)
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn count_by_status(&self, user_id: i64) -> Result<TodoStats, StoreError> {
        let stats = sqlx::query_as::<_, TodoStats>(COUNT_BY_STATUS)
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(stats)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
