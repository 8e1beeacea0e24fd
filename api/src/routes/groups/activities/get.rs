//! Activity and item retrieval routes.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use services::activity_service::ActivityService;

use crate::response::{ApiError, ApiResponse};
use crate::routes::common::PageReq;
use crate::routes::groups::activities::common::{
    ActivityListResponse, ActivityResponse, ItemResponse,
};
use crate::state::AppState;

/// GET /api/groups/{group_id}/activities
pub async fn list_activities(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
    Query(req): Query<PageReq>,
) -> Result<(StatusCode, Json<ApiResponse<ActivityListResponse>>), ApiError> {
    let (page, per_page) = req.resolve();
    let (activities, total) =
        ActivityService::list(state.db(), &group_id, page, per_page).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(
            ActivityListResponse {
                activities: activities.into_iter().map(Into::into).collect(),
                page,
                per_page,
                total,
            },
            "Activities retrieved successfully",
        )),
    ))
}

/// GET /api/groups/{group_id}/activities/{activity_id}
pub async fn get_activity(
    State(state): State<AppState>,
    Path((group_id, activity_id)): Path<(String, String)>,
) -> Result<(StatusCode, Json<ApiResponse<ActivityResponse>>), ApiError> {
    let activity = ActivityService::get(state.db(), &group_id, &activity_id).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(
            activity.into(),
            "Activity retrieved successfully",
        )),
    ))
}

/// GET /api/groups/{group_id}/activities/{activity_id}/items
///
/// The checklist in order.
pub async fn list_items(
    State(state): State<AppState>,
    Path((group_id, activity_id)): Path<(String, String)>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<ItemResponse>>>), ApiError> {
    let items = ActivityService::list_items(state.db(), &group_id, &activity_id).await?;
    let items = ItemResponse::from_models(state.db(), items).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(
            items,
            "Activity items retrieved successfully",
        )),
    ))
}
