//! Question retrieval routes.

use axum::Extension;
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use services::content_service::{ContentService, QuestionFilter};
use services::submission_service::SubmissionService;

use crate::auth::AuthUser;
use crate::response::{ApiError, ApiResponse};
use crate::routes::common::PageReq;
use crate::routes::questions::common::{
    OptionResponse, QuestionDetailResponse, QuestionFilterReq, QuestionListResponse,
    QuestionResponse, SubmissionResponse, topic_refs,
};
use crate::state::AppState;

/// GET /api/questions
pub async fn list_questions(
    State(state): State<AppState>,
    Query(req): Query<QuestionFilterReq>,
) -> Result<(StatusCode, Json<ApiResponse<QuestionListResponse>>), ApiError> {
    let (page, per_page) = PageReq {
        page: req.page,
        per_page: req.per_page,
    }
    .resolve();

    let (questions, total) = ContentService::list_questions(
        state.db(),
        QuestionFilter {
            query: req.query,
            question_type: req.question_type,
            topic_public_id: req.topic_id,
            page,
            per_page,
        },
    )
    .await?;

    let topics = topic_refs(state.db(), &questions).await?;
    let questions = questions
        .into_iter()
        .map(|q| {
            let topic_public_id = q.topic_id.and_then(|id| topics.get(&id).copied());
            QuestionResponse::from_model(q, topic_public_id)
        })
        .collect();

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(
            QuestionListResponse {
                questions,
                page,
                per_page,
                total,
            },
            "Questions retrieved successfully",
        )),
    ))
}

/// GET /api/questions/{question_id}
///
/// Fetch a question with its options. The `is_correct` flag on options is
/// only included for admin callers.
pub async fn get_question(
    State(state): State<AppState>,
    Path(question_id): Path<String>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> Result<(StatusCode, Json<ApiResponse<QuestionDetailResponse>>), ApiError> {
    let (question, options) = ContentService::get_question(state.db(), &question_id).await?;

    let topics = topic_refs(state.db(), std::slice::from_ref(&question)).await?;
    let topic_public_id = question.topic_id.and_then(|id| topics.get(&id).copied());

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(
            QuestionDetailResponse {
                question: QuestionResponse::from_model(question, topic_public_id),
                options: options
                    .into_iter()
                    .map(|o| OptionResponse::from_model(o, claims.admin))
                    .collect(),
            },
            "Question retrieved successfully",
        )),
    ))
}

/// GET /api/questions/{question_id}/submissions
///
/// Admin callers see every submission for the question; regular callers only
/// their own.
pub async fn list_submissions(
    State(state): State<AppState>,
    Path(question_id): Path<String>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<SubmissionResponse>>>), ApiError> {
    let submissions =
        SubmissionService::list_for_question(state.db(), &question_id, claims.sub, claims.admin)
            .await?;

    let mut responses = Vec::with_capacity(submissions.len());
    for submission in submissions {
        responses.push(SubmissionResponse::from_model(state.db(), submission).await?);
    }

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(
            responses,
            "Submissions retrieved successfully",
        )),
    ))
}
