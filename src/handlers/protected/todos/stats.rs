use axum::extract::State;

use crate::app::AppState;
use crate::database::models::TodoStats;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

/// GET /api/todos/stats - `{total, pending, in_progress, completed}` for the caller
pub async fn get(State(state): State<AppState>, user: AuthUser) -> ApiResult<TodoStats> {
    let stats = state.store.count_by_status(user.user_id).await?;
    Ok(ApiResponse::success(stats))
}
