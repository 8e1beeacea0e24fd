use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::QueryOrder;
use serde::{Deserialize, Serialize};

/// A fixed bundle of questions presented as a mock test.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "simulated_exams")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub public_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::simulated_exam_question::Entity")]
    Questions,
}

impl Related<super::simulated_exam_question::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Questions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn find_by_public_id<C: ConnectionTrait>(
        db: &C,
        public_id: Uuid,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::PublicId.eq(public_id))
            .one(db)
            .await
    }

    /// The bundle rows in presentation order.
    pub async fn question_entries<C: ConnectionTrait>(
        &self,
        db: &C,
    ) -> Result<Vec<super::simulated_exam_question::Model>, DbErr> {
        super::simulated_exam_question::Entity::find()
            .filter(super::simulated_exam_question::Column::SimulatedExamId.eq(self.id))
            .order_by_asc(super::simulated_exam_question::Column::Position)
            .all(db)
            .await
    }
}
