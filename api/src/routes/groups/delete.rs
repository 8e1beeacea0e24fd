//! Group deletion and membership removal routes.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use services::group_service::GroupService;

use crate::response::{ApiError, ApiResponse};
use crate::routes::groups::common::MembersRequest;
use crate::state::AppState;

/// DELETE /api/groups/{group_id}
///
/// Archives the group. Admin only.
pub async fn delete_group(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
) -> Result<(StatusCode, Json<ApiResponse<()>>), ApiError> {
    GroupService::delete(state.db(), &group_id).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success((), "Group deleted successfully")),
    ))
}

/// DELETE /api/groups/{group_id}/members
///
/// Remove one or more users from the group. Admin only. A user that is not a
/// member is a `409 conflict` and nobody is removed.
pub async fn remove_members(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
    Json(req): Json<MembersRequest>,
) -> Result<(StatusCode, Json<ApiResponse<()>>), ApiError> {
    GroupService::remove_members(state.db(), &group_id, &req.user_ids).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(
            (),
            "Members removed from group successfully",
        )),
    ))
}
