//! Question request/response models.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use db::models::question::{Model as QuestionModel, QuestionType};
use db::models::question_option::Model as QuestionOptionModel;
use db::models::question_submission::Model as SubmissionModel;
use db::models::topic::{Column as TopicColumn, Entity as TopicEntity};
use services::error::ServiceResult;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuestionRequest {
    pub statement: String,
    /// `"closed"` or `"open"`.
    pub question_type: String,
    #[validate(range(min = 1, max = 5, message = "Difficulty must be between 1 and 5"))]
    pub difficulty: i32,
    /// Optional topic tag (public id).
    pub topic_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateOptionRequest {
    pub text: String,
    pub is_correct: bool,
}

#[derive(Debug, Deserialize)]
pub struct QuestionFilterReq {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub query: Option<String>,
    pub question_type: Option<String>,
    pub topic_id: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct SubmitAnswerRequest {
    /// Public id of the chosen option; closed-ended questions only.
    pub selected_option_id: Option<String>,
    /// Free-text answer; open-ended questions only.
    pub answer_text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct QuestionResponse {
    pub id: Uuid,
    pub statement: String,
    pub question_type: QuestionType,
    pub difficulty: i32,
    pub topic_id: Option<Uuid>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl QuestionResponse {
    pub fn from_model(question: QuestionModel, topic_public_id: Option<Uuid>) -> Self {
        Self {
            id: question.public_id,
            statement: question.statement,
            question_type: question.question_type,
            difficulty: question.difficulty,
            topic_id: topic_public_id,
            is_active: question.is_active,
            created_at: question.created_at,
            updated_at: question.updated_at,
        }
    }
}

/// Maps internal topic ids to public ids for response building.
pub async fn topic_refs(
    db: &DatabaseConnection,
    questions: &[QuestionModel],
) -> ServiceResult<HashMap<i64, Uuid>> {
    let topic_ids: Vec<i64> = questions.iter().filter_map(|q| q.topic_id).collect();
    if topic_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let topics = TopicEntity::find()
        .filter(TopicColumn::Id.is_in(topic_ids))
        .all(db)
        .await?;
    Ok(topics.into_iter().map(|t| (t.id, t.public_id)).collect())
}

#[derive(Debug, Serialize)]
pub struct OptionResponse {
    pub id: Uuid,
    pub text: String,
    /// Only exposed to admin callers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_correct: Option<bool>,
}

impl OptionResponse {
    pub fn from_model(option: QuestionOptionModel, caller_is_admin: bool) -> Self {
        Self {
            id: option.public_id,
            text: option.text,
            is_correct: caller_is_admin.then_some(option.is_correct),
        }
    }
}

#[derive(Serialize)]
pub struct QuestionDetailResponse {
    #[serde(flatten)]
    pub question: QuestionResponse,
    pub options: Vec<OptionResponse>,
}

#[derive(Serialize)]
pub struct QuestionListResponse {
    pub questions: Vec<QuestionResponse>,
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
}

#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    pub id: Uuid,
    pub selected_option_id: Option<Uuid>,
    pub answer_text: Option<String>,
    pub score: Option<i32>,
    pub passed: Option<bool>,
    pub feedback: Option<String>,
    pub graded_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl SubmissionResponse {
    pub async fn from_model(
        db: &DatabaseConnection,
        submission: SubmissionModel,
    ) -> ServiceResult<Self> {
        let selected_option_id = match submission.selected_option_id {
            Some(option_id) => db::models::QuestionOption::find_by_id(option_id)
                .one(db)
                .await?
                .map(|o| o.public_id),
            None => None,
        };

        Ok(Self {
            id: submission.public_id,
            selected_option_id,
            answer_text: submission.answer_text,
            score: submission.score,
            passed: submission.passed,
            feedback: submission.feedback,
            graded_at: submission.graded_at,
            created_at: submission.created_at,
        })
    }
}
