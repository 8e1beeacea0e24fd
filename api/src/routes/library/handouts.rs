//! `/api/handouts` route group.

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

use db::models::handout::Model as HandoutModel;
use services::content_service::{ContentService, CreateLibraryItem, LibraryFilter};

use crate::auth::AuthUser;
use crate::auth::guards::allow_admin;
use crate::response::{ApiError, ApiResponse};
use crate::routes::common::PageReq;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateHandoutRequest {
    pub title: String,
    pub description: Option<String>,
    /// Object-storage key of the uploaded document.
    pub storage_key: String,
    pub topic_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HandoutFilterReq {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub query: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HandoutResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub storage_key: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<HandoutModel> for HandoutResponse {
    fn from(handout: HandoutModel) -> Self {
        Self {
            id: handout.public_id,
            title: handout.title,
            description: handout.description,
            storage_key: handout.storage_key,
            is_active: handout.is_active,
            created_at: handout.created_at,
            updated_at: handout.updated_at,
        }
    }
}

#[derive(Serialize)]
pub struct HandoutListResponse {
    pub handouts: Vec<HandoutResponse>,
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
}

/// POST /api/handouts (admin only)
pub async fn create_handout(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(req): Json<CreateHandoutRequest>,
) -> Result<(StatusCode, Json<ApiResponse<HandoutResponse>>), ApiError> {
    let handout = ContentService::create_handout(
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
            handout.into(),
            "Handout created successfully",
        )),
    ))
}

/// GET /api/handouts
pub async fn list_handouts(
    State(state): State<AppState>,
    Query(req): Query<HandoutFilterReq>,
) -> Result<(StatusCode, Json<ApiResponse<HandoutListResponse>>), ApiError> {
    let (page, per_page) = PageReq {
        page: req.page,
        per_page: req.per_page,
    }
    .resolve();

    let (handouts, total) = ContentService::list_handouts(
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
            HandoutListResponse {
                handouts: handouts.into_iter().map(Into::into).collect(),
                page,
                per_page,
                total,
            },
            "Handouts retrieved successfully",
        )),
    ))
}

/// GET /api/handouts/{handout_id}
pub async fn get_handout(
    State(state): State<AppState>,
    Path(handout_id): Path<String>,
) -> Result<(StatusCode, Json<ApiResponse<HandoutResponse>>), ApiError> {
    let handout = ContentService::get_handout(state.db(), &handout_id).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(
            handout.into(),
            "Handout retrieved successfully",
        )),
    ))
}

/// DELETE /api/handouts/{handout_id} (admin only)
pub async fn delete_handout(
    State(state): State<AppState>,
    Path(handout_id): Path<String>,
) -> Result<(StatusCode, Json<ApiResponse<()>>), ApiError> {
    ContentService::delete_handout(state.db(), &handout_id).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success((), "Handout deleted successfully")),
    ))
}

pub fn handout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_handouts))
        .route("/", post(create_handout).route_layer(from_fn(allow_admin)))
        .route("/{handout_id}", get(get_handout))
        .route(
            "/{handout_id}",
            delete(delete_handout).route_layer(from_fn(allow_admin)),
        )
}
