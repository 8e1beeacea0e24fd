//! Activity and item deletion routes.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use services::activity_service::ActivityService;

use crate::response::{ApiError, ApiResponse};
use crate::state::AppState;

/// DELETE /api/groups/{group_id}/activities/{activity_id}
///
/// Archives the activity. Admin only.
pub async fn delete_activity(
    State(state): State<AppState>,
    Path((group_id, activity_id)): Path<(String, String)>,
) -> Result<(StatusCode, Json<ApiResponse<()>>), ApiError> {
    ActivityService::delete(state.db(), &group_id, &activity_id).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success((), "Activity deleted successfully")),
    ))
}

/// DELETE /api/groups/{group_id}/activities/{activity_id}/items/{item_id}
///
/// Removes the item and closes the index gap. Admin only.
pub async fn delete_item(
    State(state): State<AppState>,
    Path((group_id, activity_id, item_id)): Path<(String, String, String)>,
) -> Result<(StatusCode, Json<ApiResponse<()>>), ApiError> {
    ActivityService::remove_item(state.db(), &group_id, &activity_id, &item_id).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(
            (),
            "Activity item deleted successfully",
        )),
    ))
}
