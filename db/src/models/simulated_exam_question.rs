use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Position of one question inside a simulated exam bundle.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "simulated_exam_questions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub simulated_exam_id: i64,
    pub question_id: i64,
    pub position: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::simulated_exam::Entity",
        from = "Column::SimulatedExamId",
        to = "super::simulated_exam::Column::Id",
        on_delete = "Cascade"
    )]
    SimulatedExam,
    #[sea_orm(
        belongs_to = "super::question::Entity",
        from = "Column::QuestionId",
        to = "super::question::Column::Id",
        on_delete = "Cascade"
    )]
    Question,
}

impl Related<super::simulated_exam::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SimulatedExam.def()
    }
}

impl Related<super::question::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Question.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
