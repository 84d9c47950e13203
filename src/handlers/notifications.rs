use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};

use crate::state::AppState;
use crate::utils::error::AppResult;
use crate::utils::response::success;

pub async fn list_relevant(State(state): State<AppState>) -> AppResult<Response> {
    let notifications = state.notifications.list_relevant().await?;
    Ok(success(notifications, "Notifications retrieved").into_response())
}

pub async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let notification = state.notifications.mark_read(&id).await?;
    Ok(success(notification, "Notification marked as read").into_response())
}

pub async fn mark_all_read(State(state): State<AppState>) -> AppResult<Response> {
    let result = state.notifications.mark_all_read().await?;
    Ok(success(result, "All notifications marked as read").into_response())
}
