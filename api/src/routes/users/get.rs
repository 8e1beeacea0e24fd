//! User listing route.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use sea_orm::{ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use db::models::user::{Column as UserColumn, Entity as UserEntity, Model as UserModel};

use crate::response::{ApiError, ApiResponse};
use crate::routes::common::PageReq;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UserFilterReq {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    /// Matches against username or email.
    pub query: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub admin: bool,
}

impl From<UserModel> for UserResponse {
    fn from(user: UserModel) -> Self {
        Self {
            id: user.public_id,
            username: user.username,
            email: user.email,
            admin: user.admin,
        }
    }
}

#[derive(Serialize)]
pub struct UserListResponse {
    pub users: Vec<UserResponse>,
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
}

/// GET /api/users
///
/// Paginated listing of accounts. Admin only.
pub async fn list_users(
    State(state): State<AppState>,
    Query(req): Query<UserFilterReq>,
) -> Result<(StatusCode, Json<ApiResponse<UserListResponse>>), ApiError> {
    let (page, per_page) = PageReq {
        page: req.page,
        per_page: req.per_page,
    }
    .resolve();

    let mut query = UserEntity::find();
    if let Some(q) = req.query.as_deref() {
        let q = q.trim();
        if !q.is_empty() {
            query = query.filter(
                Condition::any()
                    .add(UserColumn::Username.contains(q))
                    .add(UserColumn::Email.contains(q)),
            );
        }
    }

    let paginator = query
        .order_by_asc(UserColumn::Id)
        .paginate(state.db(), per_page);
    let total = paginator
        .num_items()
        .await
        .map_err(services::error::ServiceError::from)?;
    let users = paginator
        .fetch_page(page.saturating_sub(1))
        .await
        .map_err(services::error::ServiceError::from)?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(
            UserListResponse {
                users: users.into_iter().map(Into::into).collect(),
                page,
                per_page,
                total,
            },
            "Users retrieved successfully",
        )),
    ))
}
