//! Topic retrieval routes: single fetch, filtered listing, and stats.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Serialize;

use services::topic_service::{TopicFilter, TopicService};

use crate::response::{ApiError, ApiResponse};
use crate::routes::common::PageReq;
use crate::routes::topics::common::{TopicFilterReq, TopicListResponse, TopicResponse};
use crate::state::AppState;

/// GET /api/topics/{topic_id}
pub async fn get_topic(
    State(state): State<AppState>,
    Path(topic_id): Path<String>,
) -> Result<(StatusCode, Json<ApiResponse<TopicResponse>>), ApiError> {
    let topic = TopicService::get(state.db(), &topic_id).await?;

    let parents = TopicService::parent_refs(state.db(), std::slice::from_ref(&topic)).await?;
    let parent_public_id = topic.parent_id.and_then(|id| parents.get(&id).copied());

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(
            TopicResponse::from_model(topic, parent_public_id),
            "Topic retrieved successfully",
        )),
    ))
}

/// GET /api/topics
///
/// Paginated listing of active topics.
///
/// ### Query Parameters
/// - `page` (default 1), `per_page` (default 20, max 100)
/// - `query`: name substring filter
/// - `parent_id`: restrict to direct children of this topic (public id)
pub async fn list_topics(
    State(state): State<AppState>,
    Query(req): Query<TopicFilterReq>,
) -> Result<(StatusCode, Json<ApiResponse<TopicListResponse>>), ApiError> {
    let (page, per_page) = PageReq {
        page: req.page,
        per_page: req.per_page,
    }
    .resolve();

    let (topics, total) = TopicService::list(
        state.db(),
        TopicFilter {
            query: req.query,
            parent_public_id: req.parent_id,
            page,
            per_page,
        },
    )
    .await?;

    let parents = TopicService::parent_refs(state.db(), &topics).await?;
    let topics = topics
        .into_iter()
        .map(|t| {
            let parent_public_id = t.parent_id.and_then(|id| parents.get(&id).copied());
            TopicResponse::from_model(t, parent_public_id)
        })
        .collect();

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(
            TopicListResponse {
                topics,
                page,
                per_page,
                total,
            },
            "Topics retrieved successfully",
        )),
    ))
}

#[derive(Serialize)]
pub struct TopicStatsResponse {
    pub question_count: u64,
    pub median_difficulty: Option<f64>,
}

/// GET /api/topics/{topic_id}/stats
///
/// Question count and median difficulty over active questions tagged with
/// this topic.
pub async fn topic_stats(
    State(state): State<AppState>,
    Path(topic_id): Path<String>,
) -> Result<(StatusCode, Json<ApiResponse<TopicStatsResponse>>), ApiError> {
    let stats = TopicService::stats(state.db(), &topic_id).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(
            TopicStatsResponse {
                question_count: stats.question_count,
                median_difficulty: stats.median_difficulty,
            },
            "Topic stats retrieved successfully",
        )),
    ))
}
