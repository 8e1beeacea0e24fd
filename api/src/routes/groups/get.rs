//! Group retrieval routes.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use services::group_service::{GroupFilter, GroupService};

use crate::response::{ApiError, ApiResponse};
use crate::routes::common::PageReq;
use crate::routes::groups::common::{
    GroupDetailResponse, GroupFilterReq, GroupListResponse, GroupResponse, MemberResponse,
};
use crate::state::AppState;

/// GET /api/groups
pub async fn list_groups(
    State(state): State<AppState>,
    Query(req): Query<GroupFilterReq>,
) -> Result<(StatusCode, Json<ApiResponse<GroupListResponse>>), ApiError> {
    let (page, per_page) = PageReq {
        page: req.page,
        per_page: req.per_page,
    }
    .resolve();

    let (groups, total) = GroupService::list(
        state.db(),
        GroupFilter {
            query: req.query,
            page,
            per_page,
        },
    )
    .await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(
            GroupListResponse {
                groups: groups.into_iter().map(Into::into).collect(),
                page,
                per_page,
                total,
            },
            "Groups retrieved successfully",
        )),
    ))
}

/// GET /api/groups/{group_id}
pub async fn get_group(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
) -> Result<(StatusCode, Json<ApiResponse<GroupDetailResponse>>), ApiError> {
    let group = GroupService::get(state.db(), &group_id).await?;
    let member_count = GroupService::member_count(state.db(), group.id).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(
            GroupDetailResponse {
                group: GroupResponse::from(group),
                member_count,
            },
            "Group retrieved successfully",
        )),
    ))
}

/// GET /api/groups/{group_id}/members
pub async fn get_members(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<MemberResponse>>>), ApiError> {
    let members = GroupService::members(state.db(), &group_id).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(
            members.into_iter().map(Into::into).collect(),
            "Members retrieved successfully",
        )),
    ))
}
