//! Activity and item creation routes.

use axum::Extension;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use validator::Validate;

use services::activity_service::{ActivityService, ContentRefs, CreateActivity, CreateItem};

use crate::auth::AuthUser;
use crate::response::{ApiError, ApiResponse};
use crate::routes::groups::activities::common::{
    ActivityResponse, CreateActivityRequest, CreateItemRequest, ItemResponse,
};
use crate::state::AppState;

/// POST /api/groups/{group_id}/activities
///
/// Create an activity in the group. Admin only.
pub async fn create_activity(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(req): Json<CreateActivityRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ActivityResponse>>), ApiError> {
    if let Err(errors) = req.validate() {
        return Err(ApiError::invalid_input(common::format_validation_errors(
            &errors,
        )));
    }

    let activity = ActivityService::create(
        state.db(),
        &group_id,
        CreateActivity {
            title: req.title,
            description: req.description,
            due_date: req.due_date,
            created_by: claims.sub,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            activity.into(),
            "Activity created successfully",
        )),
    ))
}

/// POST /api/groups/{group_id}/activities/{activity_id}/items
///
/// Append an item to the activity checklist. Admin only.
///
/// ### Request Body
/// ```json
/// {
///   "title": "Watch before class",
///   "video_lesson_id": "7c9d2f14-2f6a-4b6e-8a32-94a1c0d5a111"
/// }
/// ```
///
/// Exactly one of `question_id`, `video_lesson_id`, `handout_id`,
/// `exercise_list_id`, `simulated_exam_id` must be populated; zero or two or
/// more are rejected with `400 invalid_input` and no row is persisted. The
/// item is appended at the end of the order.
pub async fn create_item(
    State(state): State<AppState>,
    Path((group_id, activity_id)): Path<(String, String)>,
    Json(req): Json<CreateItemRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ItemResponse>>), ApiError> {
    let item = ActivityService::add_item(
        state.db(),
        &group_id,
        &activity_id,
        CreateItem {
            title: req.title,
            description: req.description,
            refs: ContentRefs {
                question_id: req.question_id,
                video_lesson_id: req.video_lesson_id,
                handout_id: req.handout_id,
                exercise_list_id: req.exercise_list_id,
                simulated_exam_id: req.simulated_exam_id,
            },
        },
    )
    .await?;

    let response = ItemResponse::from_model(state.db(), item).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            response,
            "Activity item created successfully",
        )),
    ))
}
