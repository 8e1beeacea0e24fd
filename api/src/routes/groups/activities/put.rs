//! Activity update and item reorder routes.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use validator::Validate;

use services::activity_service::{ActivityService, UpdateActivity};

use crate::response::{ApiError, ApiResponse};
use crate::routes::groups::activities::common::{
    ActivityResponse, ItemResponse, ReorderItemsRequest, UpdateActivityRequest,
};
use crate::state::AppState;

/// PUT /api/groups/{group_id}/activities/{activity_id}
///
/// Partial update of an activity. Admin only.
pub async fn edit_activity(
    State(state): State<AppState>,
    Path((group_id, activity_id)): Path<(String, String)>,
    Json(req): Json<UpdateActivityRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ActivityResponse>>), ApiError> {
    if let Err(errors) = req.validate() {
        return Err(ApiError::invalid_input(common::format_validation_errors(
            &errors,
        )));
    }

    let activity = ActivityService::update(
        state.db(),
        &group_id,
        &activity_id,
        UpdateActivity {
            title: req.title,
            description: req.description,
            due_date: req.due_date,
        },
    )
    .await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(
            activity.into(),
            "Activity updated successfully",
        )),
    ))
}

/// PUT /api/groups/{group_id}/activities/{activity_id}/items/order
///
/// Atomically reassign item order. Admin only.
///
/// ### Request Body
/// ```json
/// { "item_ids": ["<item-c>", "<item-a>", "<item-b>"] }
/// ```
///
/// The list must contain every item of the activity exactly once; a missing,
/// duplicated or unknown id is rejected with `400 invalid_input` and the
/// stored order is untouched.
pub async fn reorder_items(
    State(state): State<AppState>,
    Path((group_id, activity_id)): Path<(String, String)>,
    Json(req): Json<ReorderItemsRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<ItemResponse>>>), ApiError> {
    let items =
        ActivityService::reorder_items(state.db(), &group_id, &activity_id, &req.item_ids).await?;
    let items = ItemResponse::from_models(state.db(), items).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(
            items,
            "Activity items reordered successfully",
        )),
    ))
}
