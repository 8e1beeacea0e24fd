//! Topic tree usecases.
//!
//! Topics are shared, globally-visible reference data arranged in a
//! self-referential hierarchy. Sibling names are unique per parent, with every
//! root topic sharing one bucket. Deleting a node requires an explicit mode
//! whenever it has children, so structure is never lost silently.

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use sea_orm::ActiveModelTrait;
use uuid::Uuid;

use db::models::question::{Column as QuestionColumn, Entity as QuestionEntity};
use db::models::topic::{self, Column as TopicColumn, Entity as TopicEntity, Model as TopicModel};

use crate::error::{ServiceError, ServiceResult};

pub const MAX_NAME_LEN: usize = 255;
pub const MAX_DESCRIPTION_LEN: usize = 512;

const NAME_CONFLICT: &str = "A topic with this name already exists under the same parent";

#[derive(Debug, Clone, Default)]
pub struct CreateTopic {
    pub name: String,
    pub description: Option<String>,
    /// Parent's public id; absent or empty means a root topic.
    pub parent_public_id: Option<String>,
    pub created_by: i64,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateTopic {
    pub name: Option<String>,
    /// `Some("")` clears the description.
    pub description: Option<String>,
    /// `Some("")` moves the topic to the root.
    pub parent_public_id: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct TopicFilter {
    pub query: Option<String>,
    pub parent_public_id: Option<String>,
    pub page: u64,
    pub per_page: u64,
}

/// The three deletion strategies for a taxonomy node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeleteMode {
    /// Hard-remove a childless node; refuse otherwise.
    #[default]
    Restrict,
    /// Archive the node and its entire descendant subtree.
    Cascade,
    /// Splice the node out: children reattach to its own parent, then the
    /// node is hard-removed.
    Reparent,
}

impl DeleteMode {
    pub fn parse(raw: Option<&str>) -> ServiceResult<Self> {
        match raw.unwrap_or("") {
            "" => Ok(DeleteMode::Restrict),
            "cascade" => Ok(DeleteMode::Cascade),
            "reparent" => Ok(DeleteMode::Reparent),
            other => Err(ServiceError::invalid(format!(
                "Unknown delete mode '{other}'; expected '', 'cascade' or 'reparent'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TopicStats {
    pub question_count: u64,
    pub median_difficulty: Option<f64>,
}

pub struct TopicService;

impl TopicService {
    pub async fn create(db: &DatabaseConnection, params: CreateTopic) -> ServiceResult<TopicModel> {
        let name = normalize_name(&params.name)?;
        let description = match params.description.as_deref() {
            None => None,
            Some(raw) => Some(normalize_description(raw)?),
        };

        let parent = Self::resolve_parent(db, params.parent_public_id.as_deref()).await?;
        let parent_id = parent.as_ref().map(|p| p.id);

        if Self::sibling_exists(db, parent_id, &name, None).await? {
            return Err(ServiceError::conflict(NAME_CONFLICT));
        }

        let now = Utc::now();
        let topic = topic::ActiveModel {
            public_id: Set(Uuid::new_v4()),
            parent_id: Set(parent_id),
            name: Set(name),
            description: Set(description),
            is_active: Set(true),
            created_by: Set(params.created_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        // The unique index still guards the race where a sibling with the
        // same name lands between the pre-check and this insert.
        topic
            .insert(db)
            .await
            .map_err(|err| ServiceError::or_conflict(err, NAME_CONFLICT))
    }

    pub async fn get(db: &DatabaseConnection, public_id: &str) -> ServiceResult<TopicModel> {
        let uuid = Uuid::parse_str(public_id.trim())
            .map_err(|_| ServiceError::not_found("Topic not found"))?;
        TopicModel::find_by_public_id(db, uuid)
            .await?
            .filter(|t| t.is_active)
            .ok_or_else(|| ServiceError::not_found("Topic not found"))
    }

    pub async fn update(
        db: &DatabaseConnection,
        public_id: &str,
        params: UpdateTopic,
    ) -> ServiceResult<TopicModel> {
        let topic = Self::get(db, public_id).await?;

        let name = match params.name.as_deref() {
            Some(raw) => normalize_name(raw)?,
            None => topic.name.clone(),
        };

        let parent_id = match params.parent_public_id.as_deref() {
            None => topic.parent_id,
            Some(raw) if raw.trim().is_empty() => None,
            Some(raw) => {
                let parent = Self::resolve_existing_parent(db, raw).await?;
                Self::ensure_not_descendant(db, topic.id, parent.id).await?;
                Some(parent.id)
            }
        };

        if (parent_id != topic.parent_id || name != topic.name)
            && Self::sibling_exists(db, parent_id, &name, Some(topic.id)).await?
        {
            return Err(ServiceError::conflict(NAME_CONFLICT));
        }

        let mut active = topic.clone().into_active_model();
        active.name = Set(name);
        active.parent_id = Set(parent_id);
        if let Some(raw) = params.description.as_deref() {
            active.description = Set(if raw.trim().is_empty() {
                None
            } else {
                Some(normalize_description(raw)?)
            });
        }
        active.updated_at = Set(Utc::now());

        active
            .update(db)
            .await
            .map_err(|err| ServiceError::or_conflict(err, NAME_CONFLICT))
    }

    pub async fn delete(
        db: &DatabaseConnection,
        public_id: &str,
        mode: DeleteMode,
    ) -> ServiceResult<()> {
        let topic = Self::get(db, public_id).await?;

        match mode {
            DeleteMode::Restrict => {
                if TopicModel::children_count(db, topic.id).await? > 0 {
                    return Err(ServiceError::TopicHasChildren);
                }
                TopicEntity::delete_by_id(topic.id).exec(db).await?;
                Ok(())
            }
            DeleteMode::Cascade => {
                let txn = db.begin().await?;

                let mut subtree = vec![topic.id];
                let mut frontier = vec![topic.id];
                while !frontier.is_empty() {
                    let children = TopicEntity::find()
                        .filter(TopicColumn::ParentId.is_in(frontier.clone()))
                        .all(&txn)
                        .await?;
                    frontier = children.into_iter().map(|c| c.id).collect();
                    subtree.extend(frontier.iter().copied());
                }

                tracing::info!(
                    topic = %topic.public_id,
                    descendants = subtree.len() - 1,
                    "cascade-archiving topic subtree"
                );
                TopicEntity::update_many()
                    .col_expr(TopicColumn::IsActive, Expr::value(false))
                    .col_expr(TopicColumn::UpdatedAt, Expr::value(Utc::now()))
                    .filter(TopicColumn::Id.is_in(subtree))
                    .exec(&txn)
                    .await?;

                txn.commit().await?;
                Ok(())
            }
            DeleteMode::Reparent => {
                let txn = db.begin().await?;

                TopicEntity::update_many()
                    .col_expr(TopicColumn::ParentId, Expr::value(topic.parent_id))
                    .col_expr(TopicColumn::UpdatedAt, Expr::value(Utc::now()))
                    .filter(TopicColumn::ParentId.eq(topic.id))
                    .exec(&txn)
                    .await
                    .map_err(|err| {
                        ServiceError::or_conflict(
                            err,
                            "Reparenting would duplicate a topic name under the new parent",
                        )
                    })?;
                TopicEntity::delete_by_id(topic.id).exec(&txn).await?;

                txn.commit().await?;
                tracing::info!(topic = %topic.public_id, "spliced topic out of the tree");
                Ok(())
            }
        }
    }

    /// Paginated listing of active topics with pass-through filtering.
    pub async fn list(
        db: &DatabaseConnection,
        filter: TopicFilter,
    ) -> ServiceResult<(Vec<TopicModel>, u64)> {
        let mut query = TopicEntity::find().filter(TopicColumn::IsActive.eq(true));

        if let Some(q) = filter.query.as_deref() {
            let q = q.trim();
            if !q.is_empty() {
                query = query.filter(TopicColumn::Name.contains(q));
            }
        }

        if let Some(raw) = filter.parent_public_id.as_deref() {
            if !raw.trim().is_empty() {
                let parent = Self::resolve_existing_parent(db, raw).await?;
                query = query.filter(TopicColumn::ParentId.eq(parent.id));
            }
        }

        let paginator = query
            .order_by_asc(TopicColumn::Id)
            .paginate(db, filter.per_page);
        let total = paginator.num_items().await?;
        let topics = paginator.fetch_page(filter.page.saturating_sub(1)).await?;

        Ok((topics, total))
    }

    /// Maps internal parent ids to their public ids for response building.
    pub async fn parent_refs(
        db: &DatabaseConnection,
        topics: &[TopicModel],
    ) -> ServiceResult<HashMap<i64, Uuid>> {
        let parent_ids: Vec<i64> = topics.iter().filter_map(|t| t.parent_id).collect();
        if parent_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let parents = TopicEntity::find()
            .filter(TopicColumn::Id.is_in(parent_ids))
            .all(db)
            .await?;
        Ok(parents.into_iter().map(|p| (p.id, p.public_id)).collect())
    }

    /// Question count and median difficulty over active questions tagged with
    /// the topic.
    pub async fn stats(db: &DatabaseConnection, public_id: &str) -> ServiceResult<TopicStats> {
        let topic = Self::get(db, public_id).await?;

        let mut difficulties: Vec<i32> = QuestionEntity::find()
            .filter(QuestionColumn::TopicId.eq(topic.id))
            .filter(QuestionColumn::IsActive.eq(true))
            .all(db)
            .await?
            .into_iter()
            .map(|q| q.difficulty)
            .collect();
        difficulties.sort_unstable();

        let n = difficulties.len();
        let median_difficulty = if n == 0 {
            None
        } else if n % 2 == 1 {
            Some(difficulties[n / 2] as f64)
        } else {
            Some((difficulties[n / 2 - 1] + difficulties[n / 2]) as f64 / 2.0)
        };

        Ok(TopicStats {
            question_count: n as u64,
            median_difficulty,
        })
    }

    async fn resolve_parent(
        db: &DatabaseConnection,
        raw: Option<&str>,
    ) -> ServiceResult<Option<TopicModel>> {
        match raw {
            None => Ok(None),
            Some(r) if r.trim().is_empty() => Ok(None),
            Some(r) => Ok(Some(Self::resolve_existing_parent(db, r).await?)),
        }
    }

    async fn resolve_existing_parent(
        db: &DatabaseConnection,
        raw: &str,
    ) -> ServiceResult<TopicModel> {
        let uuid = Uuid::parse_str(raw.trim())
            .map_err(|_| ServiceError::not_found("Parent topic not found"))?;
        TopicModel::find_by_public_id(db, uuid)
            .await?
            .filter(|t| t.is_active)
            .ok_or_else(|| ServiceError::not_found("Parent topic not found"))
    }

    /// Rejects a reparent target inside the topic's own subtree by walking the
    /// target's ancestor chain. Catches direct self-parenting as the trivial
    /// case.
    async fn ensure_not_descendant(
        db: &DatabaseConnection,
        topic_id: i64,
        new_parent_id: i64,
    ) -> ServiceResult<()> {
        let mut current = Some(new_parent_id);
        while let Some(id) = current {
            if id == topic_id {
                return Err(ServiceError::invalid(
                    "A topic cannot be moved under itself or one of its descendants",
                ));
            }
            current = TopicEntity::find_by_id(id)
                .one(db)
                .await?
                .and_then(|t| t.parent_id);
        }
        Ok(())
    }

    /// Name uniqueness check over all rows, archived included, matching the
    /// unique index the database enforces.
    async fn sibling_exists(
        db: &DatabaseConnection,
        parent_id: Option<i64>,
        name: &str,
        exclude_id: Option<i64>,
    ) -> ServiceResult<bool> {
        let mut query = TopicEntity::find().filter(TopicColumn::Name.eq(name));
        query = match parent_id {
            Some(pid) => query.filter(TopicColumn::ParentId.eq(pid)),
            None => query.filter(TopicColumn::ParentId.is_null()),
        };
        if let Some(id) = exclude_id {
            query = query.filter(TopicColumn::Id.ne(id));
        }
        Ok(query.count(db).await? > 0)
    }
}

fn normalize_name(raw: &str) -> ServiceResult<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ServiceError::invalid("Topic name cannot be empty"));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(ServiceError::invalid(format!(
            "Topic name cannot exceed {MAX_NAME_LEN} characters"
        )));
    }
    Ok(name.to_owned())
}

fn normalize_description(raw: &str) -> ServiceResult<String> {
    let description = raw.trim();
    if description.is_empty() {
        return Err(ServiceError::invalid("Topic description cannot be empty"));
    }
    if description.len() > MAX_DESCRIPTION_LEN {
        return Err(ServiceError::invalid(format!(
            "Topic description cannot exceed {MAX_DESCRIPTION_LEN} characters"
        )));
    }
    Ok(description.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use db::models::user::Model as UserModel;
    use db::test_utils::setup_test_db;

    async fn setup() -> (DatabaseConnection, i64) {
        let db = setup_test_db().await;
        let user = UserModel::create(&db, "teacher", "teacher@example.com", true)
            .await
            .expect("Failed to create user");
        (db, user.id)
    }

    fn create_params(name: &str, parent: Option<&TopicModel>, user_id: i64) -> CreateTopic {
        CreateTopic {
            name: name.to_owned(),
            description: None,
            parent_public_id: parent.map(|p| p.public_id.to_string()),
            created_by: user_id,
        }
    }

    #[tokio::test]
    async fn create_trims_name_and_description() {
        let (db, user_id) = setup().await;

        let topic = TopicService::create(
            &db,
            CreateTopic {
                name: "  Algebra  ".into(),
                description: Some("  Linear equations and friends  ".into()),
                parent_public_id: None,
                created_by: user_id,
            },
        )
        .await
        .unwrap();

        assert_eq!(topic.name, "Algebra");
        assert_eq!(
            topic.description.as_deref(),
            Some("Linear equations and friends")
        );
        assert!(topic.parent_id.is_none());
    }

    #[tokio::test]
    async fn create_rejects_blank_name() {
        let (db, user_id) = setup().await;

        for name in ["", "   "] {
            let err = TopicService::create(&db, create_params(name, None, user_id))
                .await
                .unwrap_err();
            assert!(matches!(err, ServiceError::InvalidInput(_)));
        }
    }

    #[tokio::test]
    async fn duplicate_root_names_conflict() {
        let (db, user_id) = setup().await;

        TopicService::create(&db, create_params("Algebra", None, user_id))
            .await
            .unwrap();
        let err = TopicService::create(&db, create_params(" Algebra ", None, user_id))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn duplicate_sibling_names_conflict_but_cousins_do_not() {
        let (db, user_id) = setup().await;

        let maths = TopicService::create(&db, create_params("Maths", None, user_id))
            .await
            .unwrap();
        let physics = TopicService::create(&db, create_params("Physics", None, user_id))
            .await
            .unwrap();

        TopicService::create(&db, create_params("Vectors", Some(&maths), user_id))
            .await
            .unwrap();
        let err = TopicService::create(&db, create_params("Vectors", Some(&maths), user_id))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));

        // Same name under a different parent is fine.
        TopicService::create(&db, create_params("Vectors", Some(&physics), user_id))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn create_with_unknown_parent_is_not_found() {
        let (db, user_id) = setup().await;

        let err = TopicService::create(
            &db,
            CreateTopic {
                name: "Orphan".into(),
                description: None,
                parent_public_id: Some(Uuid::new_v4().to_string()),
                created_by: user_id,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn update_clears_description_with_empty_string() {
        let (db, user_id) = setup().await;

        let topic = TopicService::create(
            &db,
            CreateTopic {
                name: "Geometry".into(),
                description: Some("Shapes".into()),
                parent_public_id: None,
                created_by: user_id,
            },
        )
        .await
        .unwrap();

        let updated = TopicService::update(
            &db,
            &topic.public_id.to_string(),
            UpdateTopic {
                description: Some("".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.description, None);
        assert_eq!(updated.name, "Geometry");
    }

    #[tokio::test]
    async fn update_rejects_moving_under_own_descendant() {
        let (db, user_id) = setup().await;

        let root = TopicService::create(&db, create_params("Root", None, user_id))
            .await
            .unwrap();
        let child = TopicService::create(&db, create_params("Child", Some(&root), user_id))
            .await
            .unwrap();
        let grandchild =
            TopicService::create(&db, create_params("Grandchild", Some(&child), user_id))
                .await
                .unwrap();

        for target in [&root, &child] {
            let err = TopicService::update(
                &db,
                &target.public_id.to_string(),
                UpdateTopic {
                    parent_public_id: Some(grandchild.public_id.to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
            assert!(matches!(err, ServiceError::InvalidInput(_)));
        }

        // Self-parenting is the trivial case of the same rule.
        let err = TopicService::update(
            &db,
            &root.public_id.to_string(),
            UpdateTopic {
                parent_public_id: Some(root.public_id.to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn default_delete_requires_childless_topic() {
        let (db, user_id) = setup().await;

        let parent = TopicService::create(&db, create_params("Parent", None, user_id))
            .await
            .unwrap();
        let child = TopicService::create(&db, create_params("Child", Some(&parent), user_id))
            .await
            .unwrap();

        let err = TopicService::delete(&db, &parent.public_id.to_string(), DeleteMode::Restrict)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::TopicHasChildren));

        // Tree unchanged: both still resolvable.
        TopicService::get(&db, &parent.public_id.to_string())
            .await
            .unwrap();
        TopicService::get(&db, &child.public_id.to_string())
            .await
            .unwrap();

        // The childless leaf goes away for good.
        TopicService::delete(&db, &child.public_id.to_string(), DeleteMode::Restrict)
            .await
            .unwrap();
        let err = TopicService::get(&db, &child.public_id.to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn cascade_delete_archives_entire_subtree() {
        let (db, user_id) = setup().await;

        let root = TopicService::create(&db, create_params("Root", None, user_id))
            .await
            .unwrap();
        let child = TopicService::create(&db, create_params("Child", Some(&root), user_id))
            .await
            .unwrap();
        let grandchild =
            TopicService::create(&db, create_params("Grandchild", Some(&child), user_id))
                .await
                .unwrap();
        let sibling = TopicService::create(&db, create_params("Sibling", None, user_id))
            .await
            .unwrap();

        TopicService::delete(&db, &child.public_id.to_string(), DeleteMode::Cascade)
            .await
            .unwrap();

        for gone in [&child, &grandchild] {
            let err = TopicService::get(&db, &gone.public_id.to_string())
                .await
                .unwrap_err();
            assert!(matches!(err, ServiceError::NotFound(_)));
        }
        TopicService::get(&db, &root.public_id.to_string())
            .await
            .unwrap();
        TopicService::get(&db, &sibling.public_id.to_string())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn reparent_delete_splices_children_one_level_up() {
        let (db, user_id) = setup().await;

        let root = TopicService::create(&db, create_params("Root", None, user_id))
            .await
            .unwrap();
        let middle = TopicService::create(&db, create_params("Middle", Some(&root), user_id))
            .await
            .unwrap();
        let a = TopicService::create(&db, create_params("A", Some(&middle), user_id))
            .await
            .unwrap();
        let b = TopicService::create(&db, create_params("B", Some(&middle), user_id))
            .await
            .unwrap();
        let sibling = TopicService::create(&db, create_params("Sibling", Some(&root), user_id))
            .await
            .unwrap();

        TopicService::delete(&db, &middle.public_id.to_string(), DeleteMode::Reparent)
            .await
            .unwrap();

        let err = TopicService::get(&db, &middle.public_id.to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));

        for orphan in [&a, &b] {
            let moved = TopicService::get(&db, &orphan.public_id.to_string())
                .await
                .unwrap();
            assert_eq!(moved.parent_id, Some(root.id));
        }
        let untouched = TopicService::get(&db, &sibling.public_id.to_string())
            .await
            .unwrap();
        assert_eq!(untouched.parent_id, Some(root.id));
    }

    #[tokio::test]
    async fn reparent_delete_of_root_child_promotes_to_root() {
        let (db, user_id) = setup().await;

        let root = TopicService::create(&db, create_params("Root", None, user_id))
            .await
            .unwrap();
        let child = TopicService::create(&db, create_params("Child", Some(&root), user_id))
            .await
            .unwrap();

        TopicService::delete(&db, &root.public_id.to_string(), DeleteMode::Reparent)
            .await
            .unwrap();

        let promoted = TopicService::get(&db, &child.public_id.to_string())
            .await
            .unwrap();
        assert_eq!(promoted.parent_id, None);
    }

    #[test]
    fn unknown_delete_mode_is_invalid_input() {
        let err = DeleteMode::parse(Some("purge")).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
        assert_eq!(DeleteMode::parse(None).unwrap(), DeleteMode::Restrict);
        assert_eq!(DeleteMode::parse(Some("")).unwrap(), DeleteMode::Restrict);
    }

    #[tokio::test]
    async fn list_filters_by_name_substring_and_parent() {
        let (db, user_id) = setup().await;

        let maths = TopicService::create(&db, create_params("Mathematics", None, user_id))
            .await
            .unwrap();
        TopicService::create(&db, create_params("Algebra", Some(&maths), user_id))
            .await
            .unwrap();
        TopicService::create(&db, create_params("Analysis", Some(&maths), user_id))
            .await
            .unwrap();
        TopicService::create(&db, create_params("History", None, user_id))
            .await
            .unwrap();

        let (all, total) = TopicService::list(
            &db,
            TopicFilter {
                page: 1,
                per_page: 20,
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(total, 4);
        assert_eq!(all.len(), 4);

        let (matched, total) = TopicService::list(
            &db,
            TopicFilter {
                query: Some("Al".into()),
                page: 1,
                per_page: 20,
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(total, 1);
        assert_eq!(matched[0].name, "Algebra");

        let (children, total) = TopicService::list(
            &db,
            TopicFilter {
                parent_public_id: Some(maths.public_id.to_string()),
                page: 1,
                per_page: 20,
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(total, 2);
        assert!(children.iter().all(|t| t.parent_id == Some(maths.id)));
    }
}
