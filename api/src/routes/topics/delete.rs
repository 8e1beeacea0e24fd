//! Topic deletion route.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use services::topic_service::{DeleteMode, TopicService};

use crate::response::{ApiError, ApiResponse};
use crate::routes::topics::common::DeleteTopicReq;
use crate::state::AppState;

/// DELETE /api/topics/{topic_id}?mode=
///
/// Deletes a taxonomy node. Admin only. The mode makes structural loss
/// explicit:
///
/// | Mode | Behavior |
/// |---|---|
/// | *(default)* | Hard-removes the topic only if it has no children; otherwise `409 topic_has_children` and nothing changes |
/// | `cascade` | Archives the topic and its entire descendant subtree |
/// | `reparent` | Reattaches direct children to the topic's own parent, then hard-removes the topic |
///
/// Any other mode value is rejected with `400 invalid_input`.
pub async fn delete_topic(
    State(state): State<AppState>,
    Path(topic_id): Path<String>,
    Query(req): Query<DeleteTopicReq>,
) -> Result<(StatusCode, Json<ApiResponse<()>>), ApiError> {
    let mode = DeleteMode::parse(req.mode.as_deref())?;
    TopicService::delete(state.db(), &topic_id, mode).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success((), "Topic deleted successfully")),
    ))
}
