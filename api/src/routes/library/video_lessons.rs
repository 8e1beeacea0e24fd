//! `/api/video-lessons` route group.

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

use db::models::video_lesson::Model as VideoLessonModel;
use services::content_service::{ContentService, CreateLibraryItem, LibraryFilter};

use crate::auth::AuthUser;
use crate::auth::guards::allow_admin;
use crate::response::{ApiError, ApiResponse};
use crate::routes::common::PageReq;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateVideoLessonRequest {
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    pub topic_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VideoLessonFilterReq {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub query: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VideoLessonResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<VideoLessonModel> for VideoLessonResponse {
    fn from(lesson: VideoLessonModel) -> Self {
        Self {
            id: lesson.public_id,
            title: lesson.title,
            description: lesson.description,
            url: lesson.url,
            is_active: lesson.is_active,
            created_at: lesson.created_at,
            updated_at: lesson.updated_at,
        }
    }
}

#[derive(Serialize)]
pub struct VideoLessonListResponse {
    pub video_lessons: Vec<VideoLessonResponse>,
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
}

/// POST /api/video-lessons (admin only)
pub async fn create_video_lesson(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(req): Json<CreateVideoLessonRequest>,
) -> Result<(StatusCode, Json<ApiResponse<VideoLessonResponse>>), ApiError> {
    let lesson = ContentService::create_video_lesson(
        state.db(),
        CreateLibraryItem {
            title: req.title,
            description: req.description,
            location: req.url,
            topic_public_id: req.topic_id,
            created_by: claims.sub,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            lesson.into(),
            "Video lesson created successfully",
        )),
    ))
}

/// GET /api/video-lessons
pub async fn list_video_lessons(
    State(state): State<AppState>,
    Query(req): Query<VideoLessonFilterReq>,
) -> Result<(StatusCode, Json<ApiResponse<VideoLessonListResponse>>), ApiError> {
    let (page, per_page) = PageReq {
        page: req.page,
        per_page: req.per_page,
    }
    .resolve();

    let (lessons, total) = ContentService::list_video_lessons(
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
            VideoLessonListResponse {
                video_lessons: lessons.into_iter().map(Into::into).collect(),
                page,
                per_page,
                total,
            },
            "Video lessons retrieved successfully",
        )),
    ))
}

/// GET /api/video-lessons/{lesson_id}
pub async fn get_video_lesson(
    State(state): State<AppState>,
    Path(lesson_id): Path<String>,
) -> Result<(StatusCode, Json<ApiResponse<VideoLessonResponse>>), ApiError> {
    let lesson = ContentService::get_video_lesson(state.db(), &lesson_id).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(
            lesson.into(),
            "Video lesson retrieved successfully",
        )),
    ))
}

/// DELETE /api/video-lessons/{lesson_id} (admin only)
pub async fn delete_video_lesson(
    State(state): State<AppState>,
    Path(lesson_id): Path<String>,
) -> Result<(StatusCode, Json<ApiResponse<()>>), ApiError> {
    ContentService::delete_video_lesson(state.db(), &lesson_id).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(
            (),
            "Video lesson deleted successfully",
        )),
    ))
}

pub fn video_lesson_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_video_lessons))
        .route(
            "/",
            post(create_video_lesson).route_layer(from_fn(allow_admin)),
        )
        .route("/{lesson_id}", get(get_video_lesson))
        .route(
            "/{lesson_id}",
            delete(delete_video_lesson).route_layer(from_fn(allow_admin)),
        )
}
