//! Question deletion route.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use services::content_service::ContentService;

use crate::response::{ApiError, ApiResponse};
use crate::state::AppState;

/// DELETE /api/questions/{question_id}
///
/// Archives the question. Admin only.
pub async fn delete_question(
    State(state): State<AppState>,
    Path(question_id): Path<String>,
) -> Result<(StatusCode, Json<ApiResponse<()>>), ApiError> {
    ContentService::delete_question(state.db(), &question_id).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success((), "Question deleted successfully")),
    ))
}
