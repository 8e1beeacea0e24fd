//! Content library usecases: questions with options, video lessons, handouts,
//! exercise lists and simulated exam bundles.
//!
//! Library rows are what activity items point at. Everything here is plain
//! request/response plumbing; the only rules are type/difficulty validation on
//! questions and all-or-nothing bundle creation for simulated exams.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use std::str::FromStr;
use uuid::Uuid;

use db::models::exercise_list::{
    self, Column as ExerciseListColumn, Entity as ExerciseListEntity, Model as ExerciseListModel,
};
use db::models::handout::{
    self, Column as HandoutColumn, Entity as HandoutEntity, Model as HandoutModel,
};
use db::models::question::{
    self, Column as QuestionColumn, Entity as QuestionEntity, Model as QuestionModel, QuestionType,
};
use db::models::question_option::{self, Model as QuestionOptionModel};
use db::models::simulated_exam::{self, Model as SimulatedExamModel};
use db::models::simulated_exam_question;
use db::models::topic::Model as TopicModel;
use db::models::video_lesson::{
    self, Column as VideoLessonColumn, Entity as VideoLessonEntity, Model as VideoLessonModel,
};

use crate::error::{ServiceError, ServiceResult};

#[derive(Debug, Clone, Default)]
pub struct CreateQuestion {
    pub statement: String,
    pub question_type: String,
    pub difficulty: i32,
    pub topic_public_id: Option<String>,
    pub created_by: i64,
}

#[derive(Debug, Clone, Default)]
pub struct QuestionFilter {
    pub query: Option<String>,
    pub question_type: Option<String>,
    pub topic_public_id: Option<String>,
    pub page: u64,
    pub per_page: u64,
}

#[derive(Debug, Clone, Default)]
pub struct CreateOption {
    pub text: String,
    pub is_correct: bool,
}

/// Shared creation payload for the three file/url-backed library kinds.
#[derive(Debug, Clone, Default)]
pub struct CreateLibraryItem {
    pub title: String,
    pub description: Option<String>,
    /// URL for video lessons, object-storage key for handouts and exercise lists.
    pub location: String,
    pub topic_public_id: Option<String>,
    pub created_by: i64,
}

#[derive(Debug, Clone, Default)]
pub struct LibraryFilter {
    pub query: Option<String>,
    pub page: u64,
    pub per_page: u64,
}

#[derive(Debug, Clone, Default)]
pub struct CreateSimulatedExam {
    pub title: String,
    pub description: Option<String>,
    pub question_public_ids: Vec<String>,
    pub created_by: i64,
}

pub struct ContentService;

impl ContentService {
    // --- Questions ---

    pub async fn create_question(
        db: &DatabaseConnection,
        params: CreateQuestion,
    ) -> ServiceResult<QuestionModel> {
        let statement = params.statement.trim();
        if statement.is_empty() {
            return Err(ServiceError::invalid("Question statement cannot be empty"));
        }
        let question_type = QuestionType::from_str(params.question_type.trim()).map_err(|_| {
            ServiceError::invalid("Question type must be either 'closed' or 'open'")
        })?;
        if !(1..=5).contains(&params.difficulty) {
            return Err(ServiceError::invalid("Difficulty must be between 1 and 5"));
        }
        let topic_id = Self::resolve_topic_tag(db, params.topic_public_id.as_deref()).await?;

        let now = Utc::now();
        let model = question::ActiveModel {
            public_id: Set(Uuid::new_v4()),
            statement: Set(statement.to_owned()),
            question_type: Set(question_type),
            difficulty: Set(params.difficulty),
            topic_id: Set(topic_id),
            is_active: Set(true),
            created_by: Set(params.created_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        model.insert(db).await.map_err(Into::into)
    }

    pub async fn get_question(
        db: &DatabaseConnection,
        public_id: &str,
    ) -> ServiceResult<(QuestionModel, Vec<QuestionOptionModel>)> {
        let question = Self::find_question(db, public_id).await?;
        let options = question.options(db).await?;
        Ok((question, options))
    }

    pub async fn list_questions(
        db: &DatabaseConnection,
        filter: QuestionFilter,
    ) -> ServiceResult<(Vec<QuestionModel>, u64)> {
        let mut query = QuestionEntity::find().filter(QuestionColumn::IsActive.eq(true));

        if let Some(q) = filter.query.as_deref() {
            let q = q.trim();
            if !q.is_empty() {
                query = query.filter(QuestionColumn::Statement.contains(q));
            }
        }
        if let Some(raw) = filter.question_type.as_deref() {
            let question_type = QuestionType::from_str(raw.trim()).map_err(|_| {
                ServiceError::invalid("Question type must be either 'closed' or 'open'")
            })?;
            query = query.filter(QuestionColumn::QuestionType.eq(question_type));
        }
        if let Some(topic_id) =
            Self::resolve_topic_tag(db, filter.topic_public_id.as_deref()).await?
        {
            query = query.filter(QuestionColumn::TopicId.eq(topic_id));
        }

        let paginator = query
            .order_by_asc(QuestionColumn::Id)
            .paginate(db, filter.per_page);
        let total = paginator.num_items().await?;
        let questions = paginator.fetch_page(filter.page.saturating_sub(1)).await?;

        Ok((questions, total))
    }

    pub async fn delete_question(db: &DatabaseConnection, public_id: &str) -> ServiceResult<()> {
        let question = Self::find_question(db, public_id).await?;
        let mut active = question.into_active_model();
        active.is_active = Set(false);
        active.updated_at = Set(Utc::now());
        active.update(db).await?;
        Ok(())
    }

    /// Attaches an answer choice to a closed-ended question.
    pub async fn add_option(
        db: &DatabaseConnection,
        question_public_id: &str,
        params: CreateOption,
    ) -> ServiceResult<QuestionOptionModel> {
        let question = Self::find_question(db, question_public_id).await?;
        if question.question_type != QuestionType::Closed {
            return Err(ServiceError::invalid(
                "Only closed-ended questions take options",
            ));
        }
        let text = params.text.trim();
        if text.is_empty() {
            return Err(ServiceError::invalid("Option text cannot be empty"));
        }

        let now = Utc::now();
        let option = question_option::ActiveModel {
            public_id: Set(Uuid::new_v4()),
            question_id: Set(question.id),
            text: Set(text.to_owned()),
            is_correct: Set(params.is_correct),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        option.insert(db).await.map_err(Into::into)
    }

    pub(crate) async fn find_question(
        db: &DatabaseConnection,
        public_id: &str,
    ) -> ServiceResult<QuestionModel> {
        let uuid = Uuid::parse_str(public_id.trim())
            .map_err(|_| ServiceError::not_found("Question not found"))?;
        QuestionModel::find_by_public_id(db, uuid)
            .await?
            .filter(|q| q.is_active)
            .ok_or_else(|| ServiceError::not_found("Question not found"))
    }

    // --- Video lessons ---

    pub async fn create_video_lesson(
        db: &DatabaseConnection,
        params: CreateLibraryItem,
    ) -> ServiceResult<VideoLessonModel> {
        let (title, description, topic_id) = Self::validate_library_item(db, &params).await?;

        let now = Utc::now();
        let model = video_lesson::ActiveModel {
            public_id: Set(Uuid::new_v4()),
            title: Set(title),
            description: Set(description),
            url: Set(params.location.trim().to_owned()),
            topic_id: Set(topic_id),
            is_active: Set(true),
            created_by: Set(params.created_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        model.insert(db).await.map_err(Into::into)
    }

    pub async fn get_video_lesson(
        db: &DatabaseConnection,
        public_id: &str,
    ) -> ServiceResult<VideoLessonModel> {
        let uuid = Uuid::parse_str(public_id.trim())
            .map_err(|_| ServiceError::not_found("Video lesson not found"))?;
        VideoLessonModel::find_by_public_id(db, uuid)
            .await?
            .filter(|v| v.is_active)
            .ok_or_else(|| ServiceError::not_found("Video lesson not found"))
    }

    pub async fn list_video_lessons(
        db: &DatabaseConnection,
        filter: LibraryFilter,
    ) -> ServiceResult<(Vec<VideoLessonModel>, u64)> {
        let mut query = VideoLessonEntity::find().filter(VideoLessonColumn::IsActive.eq(true));
        if let Some(q) = filter.query.as_deref() {
            let q = q.trim();
            if !q.is_empty() {
                query = query.filter(VideoLessonColumn::Title.contains(q));
            }
        }
        let paginator = query
            .order_by_asc(VideoLessonColumn::Id)
            .paginate(db, filter.per_page);
        let total = paginator.num_items().await?;
        let lessons = paginator.fetch_page(filter.page.saturating_sub(1)).await?;
        Ok((lessons, total))
    }

    pub async fn delete_video_lesson(
        db: &DatabaseConnection,
        public_id: &str,
    ) -> ServiceResult<()> {
        let lesson = Self::get_video_lesson(db, public_id).await?;
        let mut active = lesson.into_active_model();
        active.is_active = Set(false);
        active.updated_at = Set(Utc::now());
        active.update(db).await?;
        Ok(())
    }

    // --- Handouts ---

    pub async fn create_handout(
        db: &DatabaseConnection,
        params: CreateLibraryItem,
    ) -> ServiceResult<HandoutModel> {
        let (title, description, topic_id) = Self::validate_library_item(db, &params).await?;

        let now = Utc::now();
        let model = handout::ActiveModel {
            public_id: Set(Uuid::new_v4()),
            title: Set(title),
            description: Set(description),
            storage_key: Set(params.location.trim().to_owned()),
            topic_id: Set(topic_id),
            is_active: Set(true),
            created_by: Set(params.created_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        model.insert(db).await.map_err(Into::into)
    }

    pub async fn get_handout(
        db: &DatabaseConnection,
        public_id: &str,
    ) -> ServiceResult<HandoutModel> {
        let uuid = Uuid::parse_str(public_id.trim())
            .map_err(|_| ServiceError::not_found("Handout not found"))?;
        HandoutModel::find_by_public_id(db, uuid)
            .await?
            .filter(|h| h.is_active)
            .ok_or_else(|| ServiceError::not_found("Handout not found"))
    }

    pub async fn list_handouts(
        db: &DatabaseConnection,
        filter: LibraryFilter,
    ) -> ServiceResult<(Vec<HandoutModel>, u64)> {
        let mut query = HandoutEntity::find().filter(HandoutColumn::IsActive.eq(true));
        if let Some(q) = filter.query.as_deref() {
            let q = q.trim();
            if !q.is_empty() {
                query = query.filter(HandoutColumn::Title.contains(q));
            }
        }
        let paginator = query
            .order_by_asc(HandoutColumn::Id)
            .paginate(db, filter.per_page);
        let total = paginator.num_items().await?;
        let handouts = paginator.fetch_page(filter.page.saturating_sub(1)).await?;
        Ok((handouts, total))
    }

    pub async fn delete_handout(db: &DatabaseConnection, public_id: &str) -> ServiceResult<()> {
        let handout = Self::get_handout(db, public_id).await?;
        let mut active = handout.into_active_model();
        active.is_active = Set(false);
        active.updated_at = Set(Utc::now());
        active.update(db).await?;
        Ok(())
    }

    // --- Exercise lists ---

    pub async fn create_exercise_list(
        db: &DatabaseConnection,
        params: CreateLibraryItem,
    ) -> ServiceResult<ExerciseListModel> {
        let (title, description, topic_id) = Self::validate_library_item(db, &params).await?;

        let now = Utc::now();
        let model = exercise_list::ActiveModel {
            public_id: Set(Uuid::new_v4()),
            title: Set(title),
            description: Set(description),
            storage_key: Set(params.location.trim().to_owned()),
            topic_id: Set(topic_id),
            is_active: Set(true),
            created_by: Set(params.created_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        model.insert(db).await.map_err(Into::into)
    }

    pub async fn get_exercise_list(
        db: &DatabaseConnection,
        public_id: &str,
    ) -> ServiceResult<ExerciseListModel> {
        let uuid = Uuid::parse_str(public_id.trim())
            .map_err(|_| ServiceError::not_found("Exercise list not found"))?;
        ExerciseListModel::find_by_public_id(db, uuid)
            .await?
            .filter(|e| e.is_active)
            .ok_or_else(|| ServiceError::not_found("Exercise list not found"))
    }

    pub async fn list_exercise_lists(
        db: &DatabaseConnection,
        filter: LibraryFilter,
    ) -> ServiceResult<(Vec<ExerciseListModel>, u64)> {
        let mut query = ExerciseListEntity::find().filter(ExerciseListColumn::IsActive.eq(true));
        if let Some(q) = filter.query.as_deref() {
            let q = q.trim();
            if !q.is_empty() {
                query = query.filter(ExerciseListColumn::Title.contains(q));
            }
        }
        let paginator = query
            .order_by_asc(ExerciseListColumn::Id)
            .paginate(db, filter.per_page);
        let total = paginator.num_items().await?;
        let lists = paginator.fetch_page(filter.page.saturating_sub(1)).await?;
        Ok((lists, total))
    }

    pub async fn delete_exercise_list(
        db: &DatabaseConnection,
        public_id: &str,
    ) -> ServiceResult<()> {
        let list = Self::get_exercise_list(db, public_id).await?;
        let mut active = list.into_active_model();
        active.is_active = Set(false);
        active.updated_at = Set(Utc::now());
        active.update(db).await?;
        Ok(())
    }

    // --- Simulated exams ---

    /// Creates the exam and its fixed question bundle atomically.
    pub async fn create_simulated_exam(
        db: &DatabaseConnection,
        params: CreateSimulatedExam,
    ) -> ServiceResult<SimulatedExamModel> {
        let title = params.title.trim();
        if title.is_empty() {
            return Err(ServiceError::invalid("Exam title cannot be empty"));
        }
        if params.question_public_ids.is_empty() {
            return Err(ServiceError::invalid(
                "A simulated exam needs at least one question",
            ));
        }

        let mut questions = Vec::with_capacity(params.question_public_ids.len());
        for raw in &params.question_public_ids {
            let question = Self::find_question(db, raw).await?;
            if questions.iter().any(|q: &QuestionModel| q.id == question.id) {
                return Err(ServiceError::invalid(format!(
                    "Question '{raw}' appears more than once in the bundle"
                )));
            }
            questions.push(question);
        }

        let description = params
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_owned);

        let txn = db.begin().await?;
        let now = Utc::now();
        let exam = simulated_exam::ActiveModel {
            public_id: Set(Uuid::new_v4()),
            title: Set(title.to_owned()),
            description: Set(description),
            is_active: Set(true),
            created_by: Set(params.created_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        for (position, question) in questions.iter().enumerate() {
            simulated_exam_question::ActiveModel {
                simulated_exam_id: Set(exam.id),
                question_id: Set(question.id),
                position: Set(position as i32),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }
        txn.commit().await?;

        Ok(exam)
    }

    pub async fn get_simulated_exam(
        db: &DatabaseConnection,
        public_id: &str,
    ) -> ServiceResult<(SimulatedExamModel, Vec<QuestionModel>)> {
        let uuid = Uuid::parse_str(public_id.trim())
            .map_err(|_| ServiceError::not_found("Simulated exam not found"))?;
        let exam = SimulatedExamModel::find_by_public_id(db, uuid)
            .await?
            .filter(|e| e.is_active)
            .ok_or_else(|| ServiceError::not_found("Simulated exam not found"))?;

        let entries = exam.question_entries(db).await?;
        let mut questions = Vec::with_capacity(entries.len());
        for entry in &entries {
            if let Some(question) = QuestionEntity::find_by_id(entry.question_id).one(db).await? {
                questions.push(question);
            }
        }

        Ok((exam, questions))
    }

    pub async fn delete_simulated_exam(
        db: &DatabaseConnection,
        public_id: &str,
    ) -> ServiceResult<()> {
        let (exam, _) = Self::get_simulated_exam(db, public_id).await?;
        let mut active = exam.into_active_model();
        active.is_active = Set(false);
        active.updated_at = Set(Utc::now());
        active.update(db).await?;
        Ok(())
    }

    // --- Shared helpers ---

    async fn validate_library_item(
        db: &DatabaseConnection,
        params: &CreateLibraryItem,
    ) -> ServiceResult<(String, Option<String>, Option<i64>)> {
        let title = params.title.trim();
        if title.is_empty() {
            return Err(ServiceError::invalid("Title cannot be empty"));
        }
        if params.location.trim().is_empty() {
            return Err(ServiceError::invalid("Content location cannot be empty"));
        }
        let description = params
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_owned);
        let topic_id = Self::resolve_topic_tag(db, params.topic_public_id.as_deref()).await?;

        Ok((title.to_owned(), description, topic_id))
    }

    async fn resolve_topic_tag(
        db: &DatabaseConnection,
        raw: Option<&str>,
    ) -> ServiceResult<Option<i64>> {
        let Some(raw) = raw else { return Ok(None) };
        if raw.trim().is_empty() {
            return Ok(None);
        }
        let uuid = Uuid::parse_str(raw.trim())
            .map_err(|_| ServiceError::not_found("Topic not found"))?;
        let topic = TopicModel::find_by_public_id(db, uuid)
            .await?
            .filter(|t| t.is_active)
            .ok_or_else(|| ServiceError::not_found("Topic not found"))?;
        Ok(Some(topic.id))
    }
}
