//! Question creation, option creation, and answer submission routes.

use axum::Extension;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use validator::Validate;

use services::content_service::{ContentService, CreateOption, CreateQuestion};
use services::submission_service::{SubmissionService, SubmitAnswer};

use crate::auth::AuthUser;
use crate::response::{ApiError, ApiResponse};
use crate::routes::questions::common::{
    CreateOptionRequest, CreateQuestionRequest, OptionResponse, QuestionResponse,
    SubmissionResponse, SubmitAnswerRequest, topic_refs,
};
use crate::state::AppState;

/// POST /api/questions
///
/// Create a question. Admin only.
///
/// ### Validation Rules
/// - `statement`: required, trimmed non-empty
/// - `question_type`: `"closed"` or `"open"`
/// - `difficulty`: 1 to 5
/// - `topic_id`: optional public id of an existing topic
pub async fn create_question(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(req): Json<CreateQuestionRequest>,
) -> Result<(StatusCode, Json<ApiResponse<QuestionResponse>>), ApiError> {
    if let Err(errors) = req.validate() {
        return Err(ApiError::invalid_input(common::format_validation_errors(
            &errors,
        )));
    }

    let question = ContentService::create_question(
        state.db(),
        CreateQuestion {
            statement: req.statement,
            question_type: req.question_type,
            difficulty: req.difficulty,
            topic_public_id: req.topic_id,
            created_by: claims.sub,
        },
    )
    .await?;

    let topics = topic_refs(state.db(), std::slice::from_ref(&question)).await?;
    let topic_public_id = question.topic_id.and_then(|id| topics.get(&id).copied());

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            QuestionResponse::from_model(question, topic_public_id),
            "Question created successfully",
        )),
    ))
}

/// POST /api/questions/{question_id}/options
///
/// Add an answer choice to a closed-ended question. Admin only.
pub async fn create_option(
    State(state): State<AppState>,
    Path(question_id): Path<String>,
    Json(req): Json<CreateOptionRequest>,
) -> Result<(StatusCode, Json<ApiResponse<OptionResponse>>), ApiError> {
    let option = ContentService::add_option(
        state.db(),
        &question_id,
        CreateOption {
            text: req.text,
            is_correct: req.is_correct,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            OptionResponse::from_model(option, true),
            "Option created successfully",
        )),
    ))
}

/// POST /api/questions/{question_id}/submissions
///
/// Submit an answer.
///
/// Closed-ended questions take `selected_option_id` and are graded on the
/// spot: the submission passes with score 100 iff the chosen option is the
/// one flagged correct, otherwise fails with score 0. Open-ended questions
/// take `answer_text` and stay ungraded until a grader writes a score back.
pub async fn submit_answer(
    State(state): State<AppState>,
    Path(question_id): Path<String>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(req): Json<SubmitAnswerRequest>,
) -> Result<(StatusCode, Json<ApiResponse<SubmissionResponse>>), ApiError> {
    let submission = SubmissionService::submit(
        state.db(),
        &question_id,
        claims.sub,
        SubmitAnswer {
            selected_option_id: req.selected_option_id,
            answer_text: req.answer_text,
        },
    )
    .await?;

    let response = SubmissionResponse::from_model(state.db(), submission).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            response,
            "Submission recorded successfully",
        )),
    ))
}
