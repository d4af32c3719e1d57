use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::Serialize;

use crate::app::AppState;
use crate::database::models::{Todo, TodoPatch, UpdateTodoRequest};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

use super::utils::parse_todo_id;

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: &'static str,
}

/// GET /api/todos/:id - fetch one of the caller's todos
pub async fn get(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Todo> {
    let id = parse_todo_id(&id)?;

    let todo = state.store.get(user.user_id, id).await?;
    Ok(ApiResponse::success(todo))
}

/// PUT /api/todos/:id - partial update
///
/// Only fields present in the body are written. `"due_date": null` clears the
/// due date; omitting `due_date` leaves it as is. `updated_at` is refreshed
/// even when the body is `{}`.
pub async fn put(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTodoRequest>, JsonRejection>,
) -> ApiResult<Todo> {
    let id = parse_todo_id(&id)?;
    let Json(payload) = payload?;
    let patch = TodoPatch::try_from(payload)?;

    let todo = state.store.update(user.user_id, id, patch).await?;
    tracing::info!(user_id = user.user_id, todo_id = id, "updated todo");
    Ok(ApiResponse::success(todo))
}

/// DELETE /api/todos/:id - hard delete
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<DeleteResponse> {
    let id = parse_todo_id(&id)?;

    state.store.delete(user.user_id, id).await?;
    tracing::info!(user_id = user.user_id, todo_id = id, "deleted todo");
    Ok(ApiResponse::success(DeleteResponse {
        message: "Todo deleted successfully",
    }))
}
