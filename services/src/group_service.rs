//! Classroom/group usecases: group lifecycle and membership batches.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use db::models::group::{self, Column as GroupColumn, Entity as GroupEntity, Model as GroupModel};
use db::models::group_user::{
    self, Column as GroupUserColumn, Entity as GroupUserEntity,
};
use db::models::user::{Column as UserColumn, Entity as UserEntity, Model as UserModel};

use crate::error::{ServiceError, ServiceResult};

#[derive(Debug, Clone, Default)]
pub struct CreateGroup {
    pub name: String,
    pub description: Option<String>,
    pub created_by: i64,
}

#[derive(Debug, Clone, Default)]
pub struct GroupFilter {
    pub query: Option<String>,
    pub page: u64,
    pub per_page: u64,
}

pub struct GroupService;

impl GroupService {
    pub async fn create(db: &DatabaseConnection, params: CreateGroup) -> ServiceResult<GroupModel> {
        let name = params.name.trim();
        if name.is_empty() {
            return Err(ServiceError::invalid("Group name cannot be empty"));
        }

        let description = params
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_owned);

        let now = Utc::now();
        let group = group::ActiveModel {
            public_id: Set(Uuid::new_v4()),
            name: Set(name.to_owned()),
            description: Set(description),
            is_active: Set(true),
            created_by: Set(params.created_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        group
            .insert(db)
            .await
            .map_err(|err| ServiceError::or_conflict(err, "A group with this name already exists"))
    }

    pub async fn get(db: &DatabaseConnection, public_id: &str) -> ServiceResult<GroupModel> {
        let uuid = Uuid::parse_str(public_id.trim())
            .map_err(|_| ServiceError::not_found("Group not found"))?;
        GroupModel::find_by_public_id(db, uuid)
            .await?
            .filter(|g| g.is_active)
            .ok_or_else(|| ServiceError::not_found("Group not found"))
    }

    pub async fn list(
        db: &DatabaseConnection,
        filter: GroupFilter,
    ) -> ServiceResult<(Vec<GroupModel>, u64)> {
        let mut query = GroupEntity::find().filter(GroupColumn::IsActive.eq(true));

        if let Some(q) = filter.query.as_deref() {
            let q = q.trim();
            if !q.is_empty() {
                query = query.filter(GroupColumn::Name.contains(q));
            }
        }

        let paginator = query
            .order_by_asc(GroupColumn::Id)
            .paginate(db, filter.per_page);
        let total = paginator.num_items().await?;
        let groups = paginator.fetch_page(filter.page.saturating_sub(1)).await?;

        Ok((groups, total))
    }

    pub async fn delete(db: &DatabaseConnection, public_id: &str) -> ServiceResult<()> {
        let group = Self::get(db, public_id).await?;

        let mut active = group.into_active_model();
        active.is_active = Set(false);
        active.updated_at = Set(Utc::now());
        active.update(db).await?;
        Ok(())
    }

    /// Adds every listed user to the group, or nobody.
    ///
    /// Each id must resolve to a user and none may already be a member; the
    /// whole batch runs in one transaction so a late failure undoes earlier
    /// inserts.
    pub async fn add_members(
        db: &DatabaseConnection,
        group_public_id: &str,
        user_public_ids: &[String],
    ) -> ServiceResult<()> {
        if user_public_ids.is_empty() {
            return Err(ServiceError::invalid(
                "Request must include a non-empty list of user_ids",
            ));
        }

        let group = Self::get(db, group_public_id).await?;
        let users = Self::resolve_users(db, user_public_ids).await?;

        let txn = db.begin().await?;
        for user in &users {
            if group_user::Model::is_member(&txn, group.id, user.id).await? {
                return Err(ServiceError::conflict(format!(
                    "User '{}' is already a member of this group",
                    user.username
                )));
            }
            let membership = group_user::ActiveModel {
                group_id: Set(group.id),
                user_id: Set(user.id),
                created_at: Set(Utc::now()),
                ..Default::default()
            };
            membership.insert(&txn).await.map_err(|err| {
                ServiceError::or_conflict(err, "User is already a member of this group")
            })?;
        }
        txn.commit().await?;
        Ok(())
    }

    /// Removes every listed user from the group, or nobody.
    pub async fn remove_members(
        db: &DatabaseConnection,
        group_public_id: &str,
        user_public_ids: &[String],
    ) -> ServiceResult<()> {
        if user_public_ids.is_empty() {
            return Err(ServiceError::invalid(
                "Request must include a non-empty list of user_ids",
            ));
        }

        let group = Self::get(db, group_public_id).await?;
        let users = Self::resolve_users(db, user_public_ids).await?;

        let txn = db.begin().await?;
        for user in &users {
            let deleted = GroupUserEntity::delete_many()
                .filter(GroupUserColumn::GroupId.eq(group.id))
                .filter(GroupUserColumn::UserId.eq(user.id))
                .exec(&txn)
                .await?;
            if deleted.rows_affected == 0 {
                return Err(ServiceError::conflict(format!(
                    "User '{}' is not a member of this group",
                    user.username
                )));
            }
        }
        txn.commit().await?;
        Ok(())
    }

    pub async fn members(
        db: &DatabaseConnection,
        group_public_id: &str,
    ) -> ServiceResult<Vec<UserModel>> {
        let group = Self::get(db, group_public_id).await?;

        let memberships = GroupUserEntity::find()
            .filter(GroupUserColumn::GroupId.eq(group.id))
            .all(db)
            .await?;
        let user_ids: Vec<i64> = memberships.iter().map(|m| m.user_id).collect();
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        UserEntity::find()
            .filter(UserColumn::Id.is_in(user_ids))
            .order_by_asc(UserColumn::Id)
            .all(db)
            .await
            .map_err(Into::into)
    }

    pub async fn member_count(db: &DatabaseConnection, group_id: i64) -> ServiceResult<u64> {
        GroupUserEntity::find()
            .filter(GroupUserColumn::GroupId.eq(group_id))
            .count(db)
            .await
            .map_err(Into::into)
    }

    async fn resolve_users(
        db: &DatabaseConnection,
        public_ids: &[String],
    ) -> ServiceResult<Vec<UserModel>> {
        let mut users = Vec::with_capacity(public_ids.len());
        for raw in public_ids {
            let uuid = Uuid::parse_str(raw.trim())
                .map_err(|_| ServiceError::not_found(format!("User '{raw}' does not exist")))?;
            let user = UserModel::find_by_public_id(db, uuid)
                .await?
                .ok_or_else(|| ServiceError::not_found(format!("User '{raw}' does not exist")))?;
            users.push(user);
        }
        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use db::test_utils::setup_test_db;

    async fn setup() -> (DatabaseConnection, UserModel) {
        let db = setup_test_db().await;
        let admin = UserModel::create(&db, "admin", "admin@example.com", true)
            .await
            .unwrap();
        (db, admin)
    }

    #[tokio::test]
    async fn add_members_is_all_or_nothing() {
        let (db, admin) = setup().await;
        let alice = UserModel::create(&db, "alice", "alice@example.com", false)
            .await
            .unwrap();

        let group = GroupService::create(
            &db,
            CreateGroup {
                name: "Calculus 1".into(),
                description: None,
                created_by: admin.id,
            },
        )
        .await
        .unwrap();
        let gid = group.public_id.to_string();

        // Second id does not resolve, so alice must not be added either.
        let err = GroupService::add_members(
            &db,
            &gid,
            &[alice.public_id.to_string(), Uuid::new_v4().to_string()],
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        assert_eq!(GroupService::members(&db, &gid).await.unwrap().len(), 0);

        GroupService::add_members(&db, &gid, &[alice.public_id.to_string()])
            .await
            .unwrap();
        assert_eq!(GroupService::members(&db, &gid).await.unwrap().len(), 1);

        // Re-adding an existing member conflicts.
        let err = GroupService::add_members(&db, &gid, &[alice.public_id.to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn remove_members_requires_membership() {
        let (db, admin) = setup().await;
        let alice = UserModel::create(&db, "alice", "alice@example.com", false)
            .await
            .unwrap();

        let group = GroupService::create(
            &db,
            CreateGroup {
                name: "Physics".into(),
                description: None,
                created_by: admin.id,
            },
        )
        .await
        .unwrap();
        let gid = group.public_id.to_string();

        let err = GroupService::remove_members(&db, &gid, &[alice.public_id.to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn duplicate_group_names_conflict() {
        let (db, admin) = setup().await;

        GroupService::create(
            &db,
            CreateGroup {
                name: "Calculus 1".into(),
                description: None,
                created_by: admin.id,
            },
        )
        .await
        .unwrap();

        let err = GroupService::create(
            &db,
            CreateGroup {
                name: "Calculus 1".into(),
                description: None,
                created_by: admin.id,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }
}
