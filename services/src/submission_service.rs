//! Submission usecases.
//!
//! Closed-ended questions grade synchronously: the submission passes iff the
//! selected option is the one flagged correct, score 100 or 0, no partial
//! credit. Open-ended submissions are stored ungraded; feedback and a score
//! attach later through the grade write-back.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use db::models::question::QuestionType;
use db::models::question_option::Model as QuestionOptionModel;
use db::models::question_submission::{
    self, Column as SubmissionColumn, Entity as SubmissionEntity, Model as SubmissionModel,
};

use crate::content_service::ContentService;
use crate::error::{ServiceError, ServiceResult};

/// Write-back scores at or above this mark count as a pass.
pub const PASS_MARK: i32 = 50;

#[derive(Debug, Clone, Default)]
pub struct SubmitAnswer {
    /// Public id of the chosen option; closed-ended questions only.
    pub selected_option_id: Option<String>,
    /// Free-text answer; open-ended questions only.
    pub answer_text: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct GradeSubmission {
    pub score: i32,
    pub feedback: Option<String>,
}

pub struct SubmissionService;

impl SubmissionService {
    pub async fn submit(
        db: &DatabaseConnection,
        question_public_id: &str,
        user_id: i64,
        params: SubmitAnswer,
    ) -> ServiceResult<SubmissionModel> {
        let question = ContentService::find_question(db, question_public_id).await?;

        let now = Utc::now();
        let mut submission = question_submission::ActiveModel {
            public_id: Set(Uuid::new_v4()),
            question_id: Set(question.id),
            user_id: Set(user_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        match question.question_type {
            QuestionType::Closed => {
                if params.answer_text.is_some() {
                    return Err(ServiceError::invalid(
                        "Closed-ended questions take a selected option, not answer text",
                    ));
                }
                let raw = params.selected_option_id.as_deref().ok_or_else(|| {
                    ServiceError::invalid("Closed-ended questions require a selected option")
                })?;
                let option = Self::resolve_option(db, question.id, raw).await?;

                let passed = option.is_correct;
                submission.selected_option_id = Set(Some(option.id));
                submission.score = Set(Some(if passed { 100 } else { 0 }));
                submission.passed = Set(Some(passed));
                submission.graded_at = Set(Some(now));
            }
            QuestionType::Open => {
                if params.selected_option_id.is_some() {
                    return Err(ServiceError::invalid(
                        "Open-ended questions take answer text, not a selected option",
                    ));
                }
                let text = params
                    .answer_text
                    .as_deref()
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .ok_or_else(|| {
                        ServiceError::invalid("Open-ended questions require answer text")
                    })?;
                submission.answer_text = Set(Some(text.to_owned()));
            }
        }

        submission.insert(db).await.map_err(Into::into)
    }

    pub async fn get(
        db: &DatabaseConnection,
        submission_public_id: &str,
    ) -> ServiceResult<SubmissionModel> {
        let uuid = Uuid::parse_str(submission_public_id.trim())
            .map_err(|_| ServiceError::not_found("Submission not found"))?;
        SubmissionModel::find_by_public_id(db, uuid)
            .await?
            .ok_or_else(|| ServiceError::not_found("Submission not found"))
    }

    /// Admins see every submission for the question; other callers only their
    /// own.
    pub async fn list_for_question(
        db: &DatabaseConnection,
        question_public_id: &str,
        caller_id: i64,
        caller_is_admin: bool,
    ) -> ServiceResult<Vec<SubmissionModel>> {
        let question = ContentService::find_question(db, question_public_id).await?;

        let mut query = SubmissionEntity::find()
            .filter(SubmissionColumn::QuestionId.eq(question.id));
        if !caller_is_admin {
            query = query.filter(SubmissionColumn::UserId.eq(caller_id));
        }

        query
            .order_by_asc(SubmissionColumn::Id)
            .all(db)
            .await
            .map_err(Into::into)
    }

    /// Writes a grader's score back to an ungraded open-ended submission.
    ///
    /// Closed-ended submissions are graded at insert time, so any
    /// already-graded submission conflicts here.
    pub async fn grade(
        db: &DatabaseConnection,
        submission_public_id: &str,
        params: GradeSubmission,
    ) -> ServiceResult<SubmissionModel> {
        if !(0..=100).contains(&params.score) {
            return Err(ServiceError::invalid("Score must be between 0 and 100"));
        }

        let submission = Self::get(db, submission_public_id).await?;
        if submission.is_graded() {
            return Err(ServiceError::conflict("Submission is already graded"));
        }

        let feedback = params
            .feedback
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_owned);

        let now = Utc::now();
        let mut active = submission.into_active_model();
        active.score = Set(Some(params.score));
        active.passed = Set(Some(params.score >= PASS_MARK));
        active.feedback = Set(feedback);
        active.graded_at = Set(Some(now));
        active.updated_at = Set(now);

        active.update(db).await.map_err(Into::into)
    }

    async fn resolve_option(
        db: &DatabaseConnection,
        question_id: i64,
        raw: &str,
    ) -> ServiceResult<QuestionOptionModel> {
        let uuid = Uuid::parse_str(raw.trim())
            .map_err(|_| ServiceError::not_found("Option not found for this question"))?;
        QuestionOptionModel::find_by_public_id(db, uuid)
            .await?
            .filter(|o| o.question_id == question_id)
            .ok_or_else(|| ServiceError::not_found("Option not found for this question"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content_service::{ContentService, CreateOption, CreateQuestion};
    use db::models::user::Model as UserModel;
    use db::test_utils::setup_test_db;

    struct Fixture {
        db: DatabaseConnection,
        user_id: i64,
        closed_id: String,
        open_id: String,
        correct_option: String,
        wrong_option: String,
    }

    async fn setup() -> Fixture {
        let db = setup_test_db().await;
        let user = UserModel::create(&db, "student", "student@example.com", false)
            .await
            .unwrap();
        let author = UserModel::create(&db, "teacher", "teacher@example.com", true)
            .await
            .unwrap();

        let closed = ContentService::create_question(
            &db,
            CreateQuestion {
                statement: "What is 2 + 2?".into(),
                question_type: "closed".into(),
                difficulty: 1,
                topic_public_id: None,
                created_by: author.id,
            },
        )
        .await
        .unwrap();
        let closed_id = closed.public_id.to_string();

        let correct = ContentService::add_option(
            &db,
            &closed_id,
            CreateOption {
                text: "4".into(),
                is_correct: true,
            },
        )
        .await
        .unwrap();
        let wrong = ContentService::add_option(
            &db,
            &closed_id,
            CreateOption {
                text: "5".into(),
                is_correct: false,
            },
        )
        .await
        .unwrap();

        let open = ContentService::create_question(
            &db,
            CreateQuestion {
                statement: "Explain the chain rule.".into(),
                question_type: "open".into(),
                difficulty: 3,
                topic_public_id: None,
                created_by: author.id,
            },
        )
        .await
        .unwrap();

        Fixture {
            db,
            user_id: user.id,
            closed_id,
            open_id: open.public_id.to_string(),
            correct_option: correct.public_id.to_string(),
            wrong_option: wrong.public_id.to_string(),
        }
    }

    #[tokio::test]
    async fn correct_option_passes_with_full_score() {
        let fx = setup().await;

        let submission = SubmissionService::submit(
            &fx.db,
            &fx.closed_id,
            fx.user_id,
            SubmitAnswer {
                selected_option_id: Some(fx.correct_option.clone()),
                answer_text: None,
            },
        )
        .await
        .unwrap();

        assert_eq!(submission.passed, Some(true));
        assert_eq!(submission.score, Some(100));
        assert!(submission.is_graded());
    }

    #[tokio::test]
    async fn wrong_option_fails_with_zero_score() {
        let fx = setup().await;

        let submission = SubmissionService::submit(
            &fx.db,
            &fx.closed_id,
            fx.user_id,
            SubmitAnswer {
                selected_option_id: Some(fx.wrong_option.clone()),
                answer_text: None,
            },
        )
        .await
        .unwrap();

        assert_eq!(submission.passed, Some(false));
        assert_eq!(submission.score, Some(0));
        assert!(submission.is_graded());
    }

    #[tokio::test]
    async fn option_of_another_question_is_not_found() {
        let fx = setup().await;
        let author = UserModel::create(&fx.db, "other", "other@example.com", true)
            .await
            .unwrap();

        let other = ContentService::create_question(
            &fx.db,
            CreateQuestion {
                statement: "What is 3 + 3?".into(),
                question_type: "closed".into(),
                difficulty: 1,
                topic_public_id: None,
                created_by: author.id,
            },
        )
        .await
        .unwrap();
        let foreign_option = ContentService::add_option(
            &fx.db,
            &other.public_id.to_string(),
            CreateOption {
                text: "6".into(),
                is_correct: true,
            },
        )
        .await
        .unwrap();

        let err = SubmissionService::submit(
            &fx.db,
            &fx.closed_id,
            fx.user_id,
            SubmitAnswer {
                selected_option_id: Some(foreign_option.public_id.to_string()),
                answer_text: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn mismatched_payload_for_question_type_is_invalid() {
        let fx = setup().await;

        let err = SubmissionService::submit(
            &fx.db,
            &fx.closed_id,
            fx.user_id,
            SubmitAnswer {
                selected_option_id: None,
                answer_text: Some("four".into()),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));

        let err = SubmissionService::submit(
            &fx.db,
            &fx.open_id,
            fx.user_id,
            SubmitAnswer {
                selected_option_id: Some(fx.correct_option.clone()),
                answer_text: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn open_submission_stays_ungraded_until_write_back() {
        let fx = setup().await;

        let submission = SubmissionService::submit(
            &fx.db,
            &fx.open_id,
            fx.user_id,
            SubmitAnswer {
                selected_option_id: None,
                answer_text: Some("It composes derivatives.".into()),
            },
        )
        .await
        .unwrap();
        assert!(!submission.is_graded());
        assert_eq!(submission.score, None);
        assert_eq!(submission.passed, None);

        let graded = SubmissionService::grade(
            &fx.db,
            &submission.public_id.to_string(),
            GradeSubmission {
                score: 80,
                feedback: Some("Good, mention composition explicitly.".into()),
            },
        )
        .await
        .unwrap();
        assert_eq!(graded.score, Some(80));
        assert_eq!(graded.passed, Some(true));
        assert!(graded.is_graded());

        // A second write-back conflicts.
        let err = SubmissionService::grade(
            &fx.db,
            &graded.public_id.to_string(),
            GradeSubmission {
                score: 10,
                feedback: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn failing_score_sets_passed_false() {
        let fx = setup().await;

        let submission = SubmissionService::submit(
            &fx.db,
            &fx.open_id,
            fx.user_id,
            SubmitAnswer {
                selected_option_id: None,
                answer_text: Some("No idea.".into()),
            },
        )
        .await
        .unwrap();

        let graded = SubmissionService::grade(
            &fx.db,
            &submission.public_id.to_string(),
            GradeSubmission {
                score: 20,
                feedback: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(graded.passed, Some(false));
    }

    #[tokio::test]
    async fn grading_a_closed_submission_conflicts() {
        let fx = setup().await;

        let submission = SubmissionService::submit(
            &fx.db,
            &fx.closed_id,
            fx.user_id,
            SubmitAnswer {
                selected_option_id: Some(fx.correct_option.clone()),
                answer_text: None,
            },
        )
        .await
        .unwrap();

        let err = SubmissionService::grade(
            &fx.db,
            &submission.public_id.to_string(),
            GradeSubmission {
                score: 50,
                feedback: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }
}
