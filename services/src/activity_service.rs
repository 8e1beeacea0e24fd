//! Activity usecases: group-scoped assignments and their ordered checklist of
//! content items.
//!
//! An item points at exactly one of five content kinds. The request carries up
//! to five optional references; this layer accepts it only when precisely one
//! is populated and derives the stored discriminant from that reference, never
//! from a client-supplied label. Ordering is a dense `(activity, order_index)`
//! sequence, rewritten atomically on reorder.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use db::models::activity::{
    self, Column as ActivityColumn, Entity as ActivityEntity, Model as ActivityModel,
};
use db::models::activity_item::{
    Column as ItemColumn, Entity as ItemEntity, ItemContent, ItemType, Model as ItemModel,
};
use db::models::exercise_list::Model as ExerciseListModel;
use db::models::handout::Model as HandoutModel;
use db::models::question::Model as QuestionModel;
use db::models::simulated_exam::Model as SimulatedExamModel;
use db::models::video_lesson::Model as VideoLessonModel;

use crate::content_service::ContentService;
use crate::error::{ServiceError, ServiceResult};
use crate::group_service::GroupService;

#[derive(Debug, Clone, Default)]
pub struct CreateActivity {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub created_by: i64,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateActivity {
    pub title: Option<String>,
    /// `Some("")` clears the description.
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
}

/// Up to five optional content references from the request; exactly one must
/// be populated.
#[derive(Debug, Clone, Default)]
pub struct ContentRefs {
    pub question_id: Option<String>,
    pub video_lesson_id: Option<String>,
    pub handout_id: Option<String>,
    pub exercise_list_id: Option<String>,
    pub simulated_exam_id: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CreateItem {
    pub title: Option<String>,
    pub description: Option<String>,
    pub refs: ContentRefs,
}

pub struct ActivityService;

impl ActivityService {
    pub async fn create(
        db: &DatabaseConnection,
        group_public_id: &str,
        params: CreateActivity,
    ) -> ServiceResult<ActivityModel> {
        let group = GroupService::get(db, group_public_id).await?;

        let title = params.title.trim();
        if title.is_empty() {
            return Err(ServiceError::invalid("Activity title cannot be empty"));
        }
        let due_date = params
            .due_date
            .ok_or_else(|| ServiceError::invalid("Activity due date is required"))?;
        let description = params
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_owned);

        let now = Utc::now();
        let model = activity::ActiveModel {
            public_id: Set(Uuid::new_v4()),
            group_id: Set(group.id),
            title: Set(title.to_owned()),
            description: Set(description),
            due_date: Set(due_date),
            is_active: Set(true),
            created_by: Set(params.created_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        model.insert(db).await.map_err(Into::into)
    }

    pub async fn get(
        db: &DatabaseConnection,
        group_public_id: &str,
        activity_public_id: &str,
    ) -> ServiceResult<ActivityModel> {
        let group = GroupService::get(db, group_public_id).await?;
        let uuid = Uuid::parse_str(activity_public_id.trim())
            .map_err(|_| ServiceError::not_found("Activity not found"))?;
        ActivityModel::find_by_public_id(db, uuid)
            .await?
            .filter(|a| a.is_active && a.group_id == group.id)
            .ok_or_else(|| ServiceError::not_found("Activity not found"))
    }

    pub async fn list(
        db: &DatabaseConnection,
        group_public_id: &str,
        page: u64,
        per_page: u64,
    ) -> ServiceResult<(Vec<ActivityModel>, u64)> {
        let group = GroupService::get(db, group_public_id).await?;

        let paginator = ActivityEntity::find()
            .filter(ActivityColumn::GroupId.eq(group.id))
            .filter(ActivityColumn::IsActive.eq(true))
            .order_by_asc(ActivityColumn::Id)
            .paginate(db, per_page);
        let total = paginator.num_items().await?;
        let activities = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((activities, total))
    }

    pub async fn update(
        db: &DatabaseConnection,
        group_public_id: &str,
        activity_public_id: &str,
        params: UpdateActivity,
    ) -> ServiceResult<ActivityModel> {
        let activity = Self::get(db, group_public_id, activity_public_id).await?;

        let mut active = activity.into_active_model();
        if let Some(raw) = params.title.as_deref() {
            let title = raw.trim();
            if title.is_empty() {
                return Err(ServiceError::invalid("Activity title cannot be empty"));
            }
            active.title = Set(title.to_owned());
        }
        if let Some(raw) = params.description.as_deref() {
            let description = raw.trim();
            active.description = Set(if description.is_empty() {
                None
            } else {
                Some(description.to_owned())
            });
        }
        if let Some(due) = params.due_date {
            active.due_date = Set(due);
        }
        active.updated_at = Set(Utc::now());

        active.update(db).await.map_err(Into::into)
    }

    pub async fn delete(
        db: &DatabaseConnection,
        group_public_id: &str,
        activity_public_id: &str,
    ) -> ServiceResult<()> {
        let activity = Self::get(db, group_public_id, activity_public_id).await?;

        let mut active = activity.into_active_model();
        active.is_active = Set(false);
        active.updated_at = Set(Utc::now());
        active.update(db).await?;
        Ok(())
    }

    // --- Items ---

    /// Appends an item to the activity's checklist.
    ///
    /// The stored `item_type` is a pure function of the single populated
    /// reference; requests with zero or more than one reference never reach
    /// the database.
    pub async fn add_item(
        db: &DatabaseConnection,
        group_public_id: &str,
        activity_public_id: &str,
        params: CreateItem,
    ) -> ServiceResult<ItemModel> {
        let activity = Self::get(db, group_public_id, activity_public_id).await?;
        let content = Self::resolve_content(db, &params.refs).await?;

        let next_index = ItemEntity::find()
            .filter(ItemColumn::ActivityId.eq(activity.id))
            .count(db)
            .await? as i32;

        let title = params
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_owned);
        let description = params
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_owned);

        ItemModel::new_item(activity.id, next_index, title, description, content)
            .insert(db)
            .await
            .map_err(|err| {
                ServiceError::or_conflict(err, "Another item already holds this position")
            })
    }

    pub async fn list_items(
        db: &DatabaseConnection,
        group_public_id: &str,
        activity_public_id: &str,
    ) -> ServiceResult<Vec<ItemModel>> {
        let activity = Self::get(db, group_public_id, activity_public_id).await?;
        Self::items_in_order(db, activity.id).await
    }

    /// Deletes an item and closes the gap so indices stay dense.
    pub async fn remove_item(
        db: &DatabaseConnection,
        group_public_id: &str,
        activity_public_id: &str,
        item_public_id: &str,
    ) -> ServiceResult<()> {
        let activity = Self::get(db, group_public_id, activity_public_id).await?;
        let item = Self::find_item(db, activity.id, item_public_id).await?;

        let txn = db.begin().await?;
        ItemEntity::delete_by_id(item.id).exec(&txn).await?;

        let remaining = ItemEntity::find()
            .filter(ItemColumn::ActivityId.eq(activity.id))
            .order_by_asc(ItemColumn::OrderIndex)
            .all(&txn)
            .await?;
        for (index, entry) in remaining.into_iter().enumerate() {
            let index = index as i32;
            if entry.order_index != index {
                let mut active = entry.into_active_model();
                active.order_index = Set(index);
                active.updated_at = Set(Utc::now());
                active.update(&txn).await?;
            }
        }

        txn.commit().await?;
        Ok(())
    }

    /// Atomically reassigns indices from a full ordered list of item ids.
    ///
    /// The list must be exactly a permutation of the activity's items; a
    /// missing, duplicated, unknown or malformed id rejects the request
    /// before anything is written.
    pub async fn reorder_items(
        db: &DatabaseConnection,
        group_public_id: &str,
        activity_public_id: &str,
        item_public_ids: &[String],
    ) -> ServiceResult<Vec<ItemModel>> {
        let activity = Self::get(db, group_public_id, activity_public_id).await?;
        let items = Self::items_in_order(db, activity.id).await?;

        if item_public_ids.len() != items.len() {
            return Err(ServiceError::invalid(format!(
                "Reorder list must contain all {} items of this activity exactly once",
                items.len()
            )));
        }

        let by_public_id: HashMap<Uuid, &ItemModel> =
            items.iter().map(|i| (i.public_id, i)).collect();
        let mut seen: HashSet<Uuid> = HashSet::with_capacity(item_public_ids.len());
        let mut ordered: Vec<&ItemModel> = Vec::with_capacity(item_public_ids.len());
        for raw in item_public_ids {
            let uuid = Uuid::parse_str(raw.trim()).map_err(|_| {
                ServiceError::invalid(format!("'{raw}' is not an item of this activity"))
            })?;
            if !seen.insert(uuid) {
                return Err(ServiceError::invalid(format!(
                    "Item '{raw}' appears more than once in the reorder list"
                )));
            }
            let item = by_public_id.get(&uuid).copied().ok_or_else(|| {
                ServiceError::invalid(format!("'{raw}' is not an item of this activity"))
            })?;
            ordered.push(item);
        }

        // Two passes: park every row above the occupied range first, then
        // assign final positions, so the unique (activity, order_index) index
        // never sees a duplicate mid-flight.
        let offset = items.iter().map(|i| i.order_index).max().unwrap_or(-1) + 1;
        let now = Utc::now();
        let txn = db.begin().await?;
        for (position, item) in ordered.iter().enumerate() {
            let mut active = (*item).clone().into_active_model();
            active.order_index = Set(offset + position as i32);
            active.updated_at = Set(now);
            active.update(&txn).await?;
        }
        for (position, item) in ordered.iter().enumerate() {
            let mut active = (*item).clone().into_active_model();
            active.order_index = Set(position as i32);
            active.updated_at = Set(now);
            active.update(&txn).await?;
        }
        txn.commit().await?;

        Self::items_in_order(db, activity.id).await
    }

    /// Resolves the public id of the content row an item points at, for
    /// response building.
    pub async fn content_ref(
        db: &DatabaseConnection,
        item: &ItemModel,
    ) -> ServiceResult<(ItemType, Uuid)> {
        let content = item
            .content()
            .ok_or_else(|| ServiceError::Database(sea_orm::DbErr::Custom(format!(
                "activity item {} violates the single-content invariant",
                item.id
            ))))?;

        let public_id = match content {
            ItemContent::Question(id) => {
                db::models::Question::find_by_id(id)
                    .one(db)
                    .await?
                    .map(|q| q.public_id)
            }
            ItemContent::VideoLesson(id) => {
                db::models::VideoLesson::find_by_id(id)
                    .one(db)
                    .await?
                    .map(|v| v.public_id)
            }
            ItemContent::Handout(id) => {
                db::models::Handout::find_by_id(id)
                    .one(db)
                    .await?
                    .map(|h| h.public_id)
            }
            ItemContent::ExerciseList(id) => {
                db::models::ExerciseList::find_by_id(id)
                    .one(db)
                    .await?
                    .map(|e| e.public_id)
            }
            ItemContent::SimulatedExam(id) => {
                db::models::SimulatedExam::find_by_id(id)
                    .one(db)
                    .await?
                    .map(|s| s.public_id)
            }
        };

        public_id
            .map(|id| (content.item_type(), id))
            .ok_or_else(|| ServiceError::not_found("Referenced content no longer exists"))
    }

    async fn items_in_order(
        db: &DatabaseConnection,
        activity_id: i64,
    ) -> ServiceResult<Vec<ItemModel>> {
        ItemEntity::find()
            .filter(ItemColumn::ActivityId.eq(activity_id))
            .order_by_asc(ItemColumn::OrderIndex)
            .all(db)
            .await
            .map_err(Into::into)
    }

    async fn find_item(
        db: &DatabaseConnection,
        activity_id: i64,
        item_public_id: &str,
    ) -> ServiceResult<ItemModel> {
        let uuid = Uuid::parse_str(item_public_id.trim())
            .map_err(|_| ServiceError::not_found("Activity item not found"))?;
        ItemModel::find_by_public_id(db, uuid)
            .await?
            .filter(|i| i.activity_id == activity_id)
            .ok_or_else(|| ServiceError::not_found("Activity item not found"))
    }

    /// Accepts the references only if precisely one is populated, and turns
    /// that reference into the internal content id.
    async fn resolve_content(
        db: &DatabaseConnection,
        refs: &ContentRefs,
    ) -> ServiceResult<ItemContent> {
        let populated = [
            refs.question_id.as_deref(),
            refs.video_lesson_id.as_deref(),
            refs.handout_id.as_deref(),
            refs.exercise_list_id.as_deref(),
            refs.simulated_exam_id.as_deref(),
        ]
        .iter()
        .flatten()
        .filter(|r| !r.trim().is_empty())
        .count();
        if populated != 1 {
            return Err(ServiceError::invalid(
                "An activity item must reference exactly one content kind",
            ));
        }

        if let Some(raw) = non_empty(refs.question_id.as_deref()) {
            let question: QuestionModel = ContentService::find_question(db, raw).await?;
            return Ok(ItemContent::Question(question.id));
        }
        if let Some(raw) = non_empty(refs.video_lesson_id.as_deref()) {
            let lesson: VideoLessonModel = ContentService::get_video_lesson(db, raw).await?;
            return Ok(ItemContent::VideoLesson(lesson.id));
        }
        if let Some(raw) = non_empty(refs.handout_id.as_deref()) {
            let handout: HandoutModel = ContentService::get_handout(db, raw).await?;
            return Ok(ItemContent::Handout(handout.id));
        }
        if let Some(raw) = non_empty(refs.exercise_list_id.as_deref()) {
            let list: ExerciseListModel = ContentService::get_exercise_list(db, raw).await?;
            return Ok(ItemContent::ExerciseList(list.id));
        }
        if let Some(raw) = non_empty(refs.simulated_exam_id.as_deref()) {
            let (exam, _): (SimulatedExamModel, _) =
                ContentService::get_simulated_exam(db, raw).await?;
            return Ok(ItemContent::SimulatedExam(exam.id));
        }
        Err(ServiceError::invalid(
            "An activity item must reference exactly one content kind",
        ))
    }
}

fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|r| !r.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content_service::{ContentService, CreateLibraryItem, CreateQuestion};
    use crate::group_service::{CreateGroup, GroupService};
    use db::models::user::Model as UserModel;
    use db::test_utils::setup_test_db;

    struct Fixture {
        db: DatabaseConnection,
        group_id: String,
        activity_id: String,
        question_id: String,
        handout_id: String,
        lesson_id: String,
    }

    async fn setup() -> Fixture {
        let db = setup_test_db().await;
        let user = UserModel::create(&db, "teacher", "teacher@example.com", true)
            .await
            .unwrap();

        let group = GroupService::create(
            &db,
            CreateGroup {
                name: "Calculus 1".into(),
                description: None,
                created_by: user.id,
            },
        )
        .await
        .unwrap();
        let group_id = group.public_id.to_string();

        let activity = ActivityService::create(
            &db,
            &group_id,
            CreateActivity {
                title: "Week 1 checklist".into(),
                description: None,
                due_date: Some(Utc::now()),
                created_by: user.id,
            },
        )
        .await
        .unwrap();

        let question = ContentService::create_question(
            &db,
            CreateQuestion {
                statement: "What is 2 + 2?".into(),
                question_type: "closed".into(),
                difficulty: 1,
                topic_public_id: None,
                created_by: user.id,
            },
        )
        .await
        .unwrap();
        let handout = ContentService::create_handout(
            &db,
            CreateLibraryItem {
                title: "Syllabus".into(),
                description: None,
                location: "handouts/syllabus.pdf".into(),
                topic_public_id: None,
                created_by: user.id,
            },
        )
        .await
        .unwrap();
        let lesson = ContentService::create_video_lesson(
            &db,
            CreateLibraryItem {
                title: "Intro lecture".into(),
                description: None,
                location: "https://videos.example.com/intro".into(),
                topic_public_id: None,
                created_by: user.id,
            },
        )
        .await
        .unwrap();

        Fixture {
            db,
            group_id,
            activity_id: activity.public_id.to_string(),
            question_id: question.public_id.to_string(),
            handout_id: handout.public_id.to_string(),
            lesson_id: lesson.public_id.to_string(),
        }
    }

    async fn add(fx: &Fixture, refs: ContentRefs) -> ServiceResult<ItemModel> {
        ActivityService::add_item(
            &fx.db,
            &fx.group_id,
            &fx.activity_id,
            CreateItem {
                title: None,
                description: None,
                refs,
            },
        )
        .await
    }

    #[tokio::test]
    async fn item_requires_exactly_one_content_reference() {
        let fx = setup().await;

        let err = add(&fx, ContentRefs::default()).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));

        let err = add(
            &fx,
            ContentRefs {
                question_id: Some(fx.question_id.clone()),
                handout_id: Some(fx.handout_id.clone()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));

        // Neither attempt persisted a row.
        let items = ActivityService::list_items(&fx.db, &fx.group_id, &fx.activity_id)
            .await
            .unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn item_type_is_derived_from_the_populated_reference() {
        let fx = setup().await;

        let item = add(
            &fx,
            ContentRefs {
                handout_id: Some(fx.handout_id.clone()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(item.item_type, ItemType::Handout);
        assert_eq!(item.order_index, 0);
        let (kind, public_id) = ActivityService::content_ref(&fx.db, &item).await.unwrap();
        assert_eq!(kind, ItemType::Handout);
        assert_eq!(public_id.to_string(), fx.handout_id);
    }

    #[tokio::test]
    async fn unknown_content_reference_is_not_found() {
        let fx = setup().await;

        let err = add(
            &fx,
            ContentRefs {
                question_id: Some(Uuid::new_v4().to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn reorder_reassigns_dense_indices() {
        let fx = setup().await;

        let a = add(
            &fx,
            ContentRefs {
                question_id: Some(fx.question_id.clone()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let b = add(
            &fx,
            ContentRefs {
                handout_id: Some(fx.handout_id.clone()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let c = add(
            &fx,
            ContentRefs {
                video_lesson_id: Some(fx.lesson_id.clone()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(
            (a.order_index, b.order_index, c.order_index),
            (0, 1, 2)
        );

        let reordered = ActivityService::reorder_items(
            &fx.db,
            &fx.group_id,
            &fx.activity_id,
            &[
                c.public_id.to_string(),
                a.public_id.to_string(),
                b.public_id.to_string(),
            ],
        )
        .await
        .unwrap();

        let order: Vec<(Uuid, i32)> = reordered
            .iter()
            .map(|i| (i.public_id, i.order_index))
            .collect();
        assert_eq!(
            order,
            vec![(c.public_id, 0), (a.public_id, 1), (b.public_id, 2)]
        );
    }

    #[tokio::test]
    async fn partial_reorder_list_fails_and_keeps_order() {
        let fx = setup().await;

        let a = add(
            &fx,
            ContentRefs {
                question_id: Some(fx.question_id.clone()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let b = add(
            &fx,
            ContentRefs {
                handout_id: Some(fx.handout_id.clone()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let c = add(
            &fx,
            ContentRefs {
                video_lesson_id: Some(fx.lesson_id.clone()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        // B omitted.
        let err = ActivityService::reorder_items(
            &fx.db,
            &fx.group_id,
            &fx.activity_id,
            &[c.public_id.to_string(), a.public_id.to_string()],
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));

        // A duplicated.
        let err = ActivityService::reorder_items(
            &fx.db,
            &fx.group_id,
            &fx.activity_id,
            &[
                a.public_id.to_string(),
                a.public_id.to_string(),
                c.public_id.to_string(),
            ],
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));

        let items = ActivityService::list_items(&fx.db, &fx.group_id, &fx.activity_id)
            .await
            .unwrap();
        let order: Vec<(Uuid, i32)> = items.iter().map(|i| (i.public_id, i.order_index)).collect();
        assert_eq!(
            order,
            vec![(a.public_id, 0), (b.public_id, 1), (c.public_id, 2)]
        );
    }

    #[tokio::test]
    async fn removing_an_item_re_densifies_indices() {
        let fx = setup().await;

        let a = add(
            &fx,
            ContentRefs {
                question_id: Some(fx.question_id.clone()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let b = add(
            &fx,
            ContentRefs {
                handout_id: Some(fx.handout_id.clone()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let c = add(
            &fx,
            ContentRefs {
                video_lesson_id: Some(fx.lesson_id.clone()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        ActivityService::remove_item(
            &fx.db,
            &fx.group_id,
            &fx.activity_id,
            &b.public_id.to_string(),
        )
        .await
        .unwrap();

        let items = ActivityService::list_items(&fx.db, &fx.group_id, &fx.activity_id)
            .await
            .unwrap();
        let order: Vec<(Uuid, i32)> = items.iter().map(|i| (i.public_id, i.order_index)).collect();
        assert_eq!(order, vec![(a.public_id, 0), (c.public_id, 1)]);
    }
}
