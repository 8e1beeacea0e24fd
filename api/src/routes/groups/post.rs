//! Group creation and membership assignment routes.

use axum::Extension;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use validator::Validate;

use services::group_service::{CreateGroup, GroupService};

use crate::auth::AuthUser;
use crate::response::{ApiError, ApiResponse};
use crate::routes::groups::common::{CreateGroupRequest, GroupResponse, MembersRequest};
use crate::state::AppState;

/// POST /api/groups
///
/// Create a classroom group. Admin only. Group names are unique; a duplicate
/// is rejected with `409 conflict`.
pub async fn create_group(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(req): Json<CreateGroupRequest>,
) -> Result<(StatusCode, Json<ApiResponse<GroupResponse>>), ApiError> {
    if let Err(errors) = req.validate() {
        return Err(ApiError::invalid_input(common::format_validation_errors(
            &errors,
        )));
    }

    let group = GroupService::create(
        state.db(),
        CreateGroup {
            name: req.name,
            description: req.description,
            created_by: claims.sub,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            group.into(),
            "Group created successfully",
        )),
    ))
}

/// POST /api/groups/{group_id}/members
///
/// Add one or more users to the group. Admin only. The batch is atomic:
/// an unknown user id (`404`) or an existing membership (`409`) leaves the
/// group unchanged.
pub async fn add_members(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
    Json(req): Json<MembersRequest>,
) -> Result<(StatusCode, Json<ApiResponse<()>>), ApiError> {
    GroupService::add_members(state.db(), &group_id, &req.user_ids).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(
            (),
            "Members added to group successfully",
        )),
    ))
}
