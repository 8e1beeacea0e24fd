use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A node in the self-referential category tree used to classify content.
///
/// `parent_id` is a weak reference: NULL means root. Sibling names are unique,
/// with every root topic sharing one NULL-parent bucket (enforced by the
/// `idx_topics_parent_name` expression index).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "topics")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub public_id: Uuid,
    pub parent_id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CreatedBy",
        to = "super::user::Column::Id"
    )]
    CreatedBy,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CreatedBy.def()
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

    /// All direct children of `parent_id`, soft-deleted rows included.
    ///
    /// Deletion-mode preconditions count archived rows too: they still hold a
    /// foreign key to the parent, so a hard delete must account for them.
    pub async fn children_of<C: ConnectionTrait>(
        db: &C,
        parent_id: i64,
    ) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::ParentId.eq(parent_id))
            .all(db)
            .await
    }

    pub async fn children_count<C: ConnectionTrait>(db: &C, parent_id: i64) -> Result<u64, DbErr> {
        Entity::find()
            .filter(Column::ParentId.eq(parent_id))
            .count(db)
            .await
    }
}
