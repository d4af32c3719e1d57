use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    Json,
};

use crate::app::AppState;
use crate::database::models::{CreateTodoRequest, NewTodo, Todo, TodoFilter};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

/// GET /api/todos?status=&priority= - list the caller's todos, newest first
///
/// Filters are exact matches and are not checked against the known status
/// and priority values; an unknown value simply matches nothing.
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    query: Result<Query<TodoFilter>, QueryRejection>,
) -> ApiResult<Vec<Todo>> {
    let Query(filter) = query?;
    let filter = filter.normalized();

    let todos = state.store.list(user.user_id, &filter).await?;
    Ok(ApiResponse::success(todos))
}

/// POST /api/todos - create a todo owned by the caller
///
/// Expected Input:
/// ```json
/// {
///   "title": "string (required, non-empty)",
///   "description": "string (optional)",
///   "status": "pending | in_progress | completed (optional, default pending)",
///   "priority": "low | medium | high (optional, default medium)",
///   "due_date": "RFC 3339 timestamp (optional)"
/// }
/// ```
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> ApiResult<Todo> {
    let Json(payload) = payload?;
    let new_todo = NewTodo::try_from(payload)?;

    let todo = state.store.create(user.user_id, new_todo).await?;
    tracing::info!(user_id = user.user_id, todo_id = todo.id, "created todo");
    Ok(ApiResponse::created(todo))
}
