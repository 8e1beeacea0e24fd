//! `/api/exercise-lists` route group.

use axum::Extension;
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::routing::{delete, get, post};
use axum::Router;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use db::models::exercise_list::Model as ExerciseListModel;
use services::content_service::{ContentService, CreateLibraryItem, LibraryFilter};

use crate::auth::AuthUser;
use crate::auth::guards::allow_admin;
use crate::response::{ApiError, ApiResponse};
use crate::routes::common::PageReq;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateExerciseListRequest {
    pub title: String,
    pub description: Option<String>,
    /// Object-storage key of the uploaded sheet.
    pub storage_key: String,
    pub topic_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ExerciseListFilterReq {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub query: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ExerciseListResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub storage_key: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ExerciseListModel> for ExerciseListResponse {
    fn from(list: ExerciseListModel) -> Self {
        Self {
            id: list.public_id,
            title: list.title,
            description: list.description,
            storage_key: list.storage_key,
            is_active: list.is_active,
            created_at: list.created_at,
            updated_at: list.updated_at,
        }
    }
}

#[derive(Serialize)]
pub struct ExerciseListListResponse {
    pub exercise_lists: Vec<ExerciseListResponse>,
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
}

/// POST /api/exercise-lists (admin only)
pub async fn create_exercise_list(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(req): Json<CreateExerciseListRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ExerciseListResponse>>), ApiError> {
    let list = ContentService::create_exercise_list(
        state.db(),
        CreateLibraryItem {
            title: req.title,
            description: req.description,
            location: req.storage_key,
            topic_public_id: req.topic_id,
            created_by: claims.sub,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            list.into(),
            "Exercise list created successfully",
        )),
    ))
}

/// GET /api/exercise-lists
pub async fn list_exercise_lists(
    State(state): State<AppState>,
    Query(req): Query<ExerciseListFilterReq>,
) -> Result<(StatusCode, Json<ApiResponse<ExerciseListListResponse>>), ApiError> {
    let (page, per_page) = PageReq {
        page: req.page,
        per_page: req.per_page,
    }
    .resolve();

    let (lists, total) = ContentService::list_exercise_lists(
        state.db(),
        LibraryFilter {
            query: req.query,
            page,
            per_page,
        },
    )
    .await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(
            ExerciseListListResponse {
                exercise_lists: lists.into_iter().map(Into::into).collect(),
                page,
                per_page,
                total,
            },
            "Exercise lists retrieved successfully",
        )),
    ))
}

/// GET /api/exercise-lists/{list_id}
pub async fn get_exercise_list(
    State(state): State<AppState>,
    Path(list_id): Path<String>,
) -> Result<(StatusCode, Json<ApiResponse<ExerciseListResponse>>), ApiError> {
    let list = ContentService::get_exercise_list(state.db(), &list_id).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(
            list.into(),
            "Exercise list retrieved successfully",
        )),
    ))
}

/// DELETE /api/exercise-lists/{list_id} (admin only)
pub async fn delete_exercise_list(
    State(state): State<AppState>,
    Path(list_id): Path<String>,
) -> Result<(StatusCode, Json<ApiResponse<()>>), ApiError> {
    ContentService::delete_exercise_list(state.db(), &list_id).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(
            (),
            "Exercise list deleted successfully",
        )),
    ))
}

pub fn exercise_list_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_exercise_lists))
        .route(
            "/",
            post(create_exercise_list).route_layer(from_fn(allow_admin)),
        )
        .route("/{list_id}", get(get_exercise_list))
        .route(
            "/{list_id}",
            delete(delete_exercise_list).route_layer(from_fn(allow_admin)),
        )
}
