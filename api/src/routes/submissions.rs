//! `/api/submissions` route group: the grade write-back for open-ended
//! submissions.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::routing::put;
use axum::Router;
use serde::Deserialize;
use validator::Validate;

use services::submission_service::{GradeSubmission, SubmissionService};

use crate::auth::guards::allow_admin;
use crate::response::{ApiError, ApiResponse};
use crate::routes::questions::common::SubmissionResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct GradeSubmissionRequest {
    #[validate(range(min = 0, max = 100, message = "Score must be between 0 and 100"))]
    pub score: i32,
    pub feedback: Option<String>,
}

/// PUT /api/submissions/{submission_id}/grade
///
/// Writes a grader's score back to an ungraded open-ended submission. Admin
/// only. Closed-ended submissions are graded at insert time, so grading an
/// already-graded submission is a `409 conflict`. The submission passes iff
/// the score reaches the pass mark.
pub async fn grade_submission(
    State(state): State<AppState>,
    Path(submission_id): Path<String>,
    Json(req): Json<GradeSubmissionRequest>,
) -> Result<(StatusCode, Json<ApiResponse<SubmissionResponse>>), ApiError> {
    if let Err(errors) = req.validate() {
        return Err(ApiError::invalid_input(common::format_validation_errors(
            &errors,
        )));
    }

    let submission = SubmissionService::grade(
        state.db(),
        &submission_id,
        GradeSubmission {
            score: req.score,
            feedback: req.feedback,
        },
    )
    .await?;

    let response = SubmissionResponse::from_model(state.db(), submission).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(
            response,
            "Submission graded successfully",
        )),
    ))
}

pub fn submission_routes() -> Router<AppState> {
    Router::new().route(
        "/{submission_id}/grade",
        put(grade_submission).route_layer(from_fn(allow_admin)),
    )
}
