//! `/api/simulated-exams` route group.

use axum::Extension;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::routing::{delete, get, post};
use axum::Router;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use db::models::question::Model as QuestionModel;
use db::models::simulated_exam::Model as SimulatedExamModel;
use services::content_service::{ContentService, CreateSimulatedExam};

use crate::auth::AuthUser;
use crate::auth::guards::allow_admin;
use crate::response::{ApiError, ApiResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateSimulatedExamRequest {
    pub title: String,
    pub description: Option<String>,
    /// Public ids of the bundled questions, in presentation order.
    pub question_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SimulatedExamResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<SimulatedExamModel> for SimulatedExamResponse {
    fn from(exam: SimulatedExamModel) -> Self {
        Self {
            id: exam.public_id,
            title: exam.title,
            description: exam.description,
            is_active: exam.is_active,
            created_at: exam.created_at,
            updated_at: exam.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ExamQuestionResponse {
    pub id: Uuid,
    pub statement: String,
    pub difficulty: i32,
}

impl From<QuestionModel> for ExamQuestionResponse {
    fn from(question: QuestionModel) -> Self {
        Self {
            id: question.public_id,
            statement: question.statement,
            difficulty: question.difficulty,
        }
    }
}

#[derive(Serialize)]
pub struct SimulatedExamDetailResponse {
    #[serde(flatten)]
    pub exam: SimulatedExamResponse,
    pub questions: Vec<ExamQuestionResponse>,
}

/// POST /api/simulated-exams (admin only)
///
/// Creates the exam and its fixed question bundle atomically; every question
/// id must resolve and appear at most once.
pub async fn create_simulated_exam(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(req): Json<CreateSimulatedExamRequest>,
) -> Result<(StatusCode, Json<ApiResponse<SimulatedExamResponse>>), ApiError> {
    let exam = ContentService::create_simulated_exam(
        state.db(),
        CreateSimulatedExam {
            title: req.title,
            description: req.description,
            question_public_ids: req.question_ids,
            created_by: claims.sub,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            exam.into(),
            "Simulated exam created successfully",
        )),
    ))
}

/// GET /api/simulated-exams/{exam_id}
///
/// The exam with its question list in bundle order.
pub async fn get_simulated_exam(
    State(state): State<AppState>,
    Path(exam_id): Path<String>,
) -> Result<(StatusCode, Json<ApiResponse<SimulatedExamDetailResponse>>), ApiError> {
    let (exam, questions) = ContentService::get_simulated_exam(state.db(), &exam_id).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(
            SimulatedExamDetailResponse {
                exam: exam.into(),
                questions: questions.into_iter().map(Into::into).collect(),
            },
            "Simulated exam retrieved successfully",
        )),
    ))
}

/// DELETE /api/simulated-exams/{exam_id} (admin only)
pub async fn delete_simulated_exam(
    State(state): State<AppState>,
    Path(exam_id): Path<String>,
) -> Result<(StatusCode, Json<ApiResponse<()>>), ApiError> {
    ContentService::delete_simulated_exam(state.db(), &exam_id).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(
            (),
            "Simulated exam deleted successfully",
        )),
    ))
}

pub fn simulated_exam_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(create_simulated_exam).route_layer(from_fn(allow_admin)),
        )
        .route("/{exam_id}", get(get_simulated_exam))
        .route(
            "/{exam_id}",
            delete(delete_simulated_exam).route_layer(from_fn(allow_admin)),
        )
}
