//! Topic creation route.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use validator::Validate;

use services::topic_service::{CreateTopic, TopicService};

use crate::auth::AuthUser;
use crate::response::{ApiError, ApiResponse};
use crate::routes::topics::common::{CreateTopicRequest, TopicResponse};
use crate::state::AppState;
use axum::Extension;

/// POST /api/topics
///
/// Create a topic, optionally under a parent. Admin only.
///
/// ### Request Body
/// ```json
/// {
///   "name": "Algebra",
///   "description": "Linear and quadratic equations",
///   "parent_id": "5f7f1a9e-7f3e-4e3e-9d40-1c9a1d2b3c4d"
/// }
/// ```
///
/// ### Validation Rules
/// - `name`: required, trimmed non-empty, at most 255 characters
/// - `description`: optional, trimmed non-empty when present, at most 512 characters
/// - `parent_id`: optional public id of an existing topic; absent or empty
///   creates a root topic
///
/// ### Responses
///
/// - `201 Created` with the topic, `parent_id` resolved to the parent's public id
/// - `400 Bad Request` (`invalid_input`) on validation failure
/// - `404 Not Found` (`not_found`) when the referenced parent does not exist
/// - `409 Conflict` (`conflict`) when a sibling already carries the same name
pub async fn create_topic(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(req): Json<CreateTopicRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TopicResponse>>), ApiError> {
    if let Err(errors) = req.validate() {
        return Err(ApiError::invalid_input(common::format_validation_errors(
            &errors,
        )));
    }

    let topic = TopicService::create(
        state.db(),
        CreateTopic {
            name: req.name,
            description: req.description,
            parent_public_id: req.parent_id,
            created_by: claims.sub,
        },
    )
    .await?;

    let parents = TopicService::parent_refs(state.db(), std::slice::from_ref(&topic)).await?;
    let parent_public_id = topic.parent_id.and_then(|id| parents.get(&id).copied());

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            TopicResponse::from_model(topic, parent_public_id),
            "Topic created successfully",
        )),
    ))
}
