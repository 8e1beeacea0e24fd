use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Discriminant for the five content kinds an item can point at.
///
/// Stored in the `item_type` column as a queryable second line of defense;
/// the authoritative source is which foreign key is populated.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ItemType {
    #[sea_orm(string_value = "question")]
    Question,
    #[sea_orm(string_value = "video_lesson")]
    VideoLesson,
    #[sea_orm(string_value = "handout")]
    Handout,
    #[sea_orm(string_value = "exercise_list")]
    ExerciseList,
    #[sea_orm(string_value = "simulated_exam")]
    SimulatedExam,
}

/// The one content reference an item carries, with the internal id of the
/// referenced row.
///
/// Rows are only ever built through [`Model::new_item`], which takes this sum
/// type, so the stored `item_type` tag and the populated foreign key cannot
/// disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemContent {
    Question(i64),
    VideoLesson(i64),
    Handout(i64),
    ExerciseList(i64),
    SimulatedExam(i64),
}

impl ItemContent {
    pub fn item_type(&self) -> ItemType {
        match self {
            ItemContent::Question(_) => ItemType::Question,
            ItemContent::VideoLesson(_) => ItemType::VideoLesson,
            ItemContent::Handout(_) => ItemType::Handout,
            ItemContent::ExerciseList(_) => ItemType::ExerciseList,
            ItemContent::SimulatedExam(_) => ItemType::SimulatedExam,
        }
    }
}

/// One entry in an activity's ordered checklist.
///
/// Exactly one of the five content foreign keys is non-null, and
/// `(activity_id, order_index)` is unique and dense per activity.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "activity_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub public_id: Uuid,
    pub activity_id: i64,
    pub order_index: i32,
    pub title: Option<String>,
    pub description: Option<String>,
    pub item_type: ItemType,
    pub question_id: Option<i64>,
    pub video_lesson_id: Option<i64>,
    pub handout_id: Option<i64>,
    pub exercise_list_id: Option<i64>,
    pub simulated_exam_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::activity::Entity",
        from = "Column::ActivityId",
        to = "super::activity::Column::Id",
        on_delete = "Cascade"
    )]
    Activity,
}

impl Related<super::activity::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Activity.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// The only way to build an item row: tag and payload are set together
    /// from the same `content` value.
    pub fn new_item(
        activity_id: i64,
        order_index: i32,
        title: Option<String>,
        description: Option<String>,
        content: ItemContent,
    ) -> ActiveModel {
        let (question, lesson, handout, exercises, exam) = match content {
            ItemContent::Question(id) => (Some(id), None, None, None, None),
            ItemContent::VideoLesson(id) => (None, Some(id), None, None, None),
            ItemContent::Handout(id) => (None, None, Some(id), None, None),
            ItemContent::ExerciseList(id) => (None, None, None, Some(id), None),
            ItemContent::SimulatedExam(id) => (None, None, None, None, Some(id)),
        };
        let now = Utc::now();

        ActiveModel {
            public_id: Set(Uuid::new_v4()),
            activity_id: Set(activity_id),
            order_index: Set(order_index),
            title: Set(title),
            description: Set(description),
            item_type: Set(content.item_type()),
            question_id: Set(question),
            video_lesson_id: Set(lesson),
            handout_id: Set(handout),
            exercise_list_id: Set(exercises),
            simulated_exam_id: Set(exam),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
    }

    /// Reconstructs the content reference from the populated foreign key.
    ///
    /// `None` means the row violates the exactly-one invariant, which cannot
    /// happen through [`Model::new_item`] and is rejected by the storage
    /// layer; callers treat it as data corruption.
    pub fn content(&self) -> Option<ItemContent> {
        match (
            self.question_id,
            self.video_lesson_id,
            self.handout_id,
            self.exercise_list_id,
            self.simulated_exam_id,
        ) {
            (Some(id), None, None, None, None) => Some(ItemContent::Question(id)),
            (None, Some(id), None, None, None) => Some(ItemContent::VideoLesson(id)),
            (None, None, Some(id), None, None) => Some(ItemContent::Handout(id)),
            (None, None, None, Some(id), None) => Some(ItemContent::ExerciseList(id)),
            (None, None, None, None, Some(id)) => Some(ItemContent::SimulatedExam(id)),
            _ => None,
        }
    }

    pub async fn find_by_public_id<C: ConnectionTrait>(
        db: &C,
        public_id: Uuid,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::PublicId.eq(public_id))
            .one(db)
            .await
    }
}
