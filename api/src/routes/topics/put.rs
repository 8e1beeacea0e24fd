//! Topic update route.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use validator::Validate;

use services::topic_service::{TopicService, UpdateTopic};

use crate::response::{ApiError, ApiResponse};
use crate::routes::topics::common::{TopicResponse, UpdateTopicRequest};
use crate::state::AppState;

/// PUT /api/topics/{topic_id}
///
/// Partial update. Admin only. Fields present in the request overwrite the
/// stored value; absent fields are untouched. An empty `description` clears
/// it; an empty `parent_id` moves the topic to the root. Reparenting follows
/// the same resolution and uniqueness semantics as creation and refuses any
/// target inside the topic's own subtree.
pub async fn edit_topic(
    State(state): State<AppState>,
    Path(topic_id): Path<String>,
    Json(req): Json<UpdateTopicRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TopicResponse>>), ApiError> {
    if let Err(errors) = req.validate() {
        return Err(ApiError::invalid_input(common::format_validation_errors(
            &errors,
        )));
    }

    let topic = TopicService::update(
        state.db(),
        &topic_id,
        UpdateTopic {
            name: req.name,
            description: req.description,
            parent_public_id: req.parent_id,
        },
    )
    .await?;

    let parents = TopicService::parent_refs(state.db(), std::slice::from_ref(&topic)).await?;
    let parent_public_id = topic.parent_id.and_then(|id| parents.get(&id).copied());

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(
            TopicResponse::from_model(topic, parent_public_id),
            "Topic updated successfully",
        )),
    ))
}
