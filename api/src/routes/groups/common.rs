//! Group request/response models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use db::models::group::Model as GroupModel;
use db::models::user::Model as UserModel;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateGroupRequest {
    #[validate(length(max = 255, message = "Group name cannot exceed 255 characters"))]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MembersRequest {
    /// Public ids of the users to add or remove.
    pub user_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct GroupFilterReq {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub query: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GroupResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<GroupModel> for GroupResponse {
    fn from(group: GroupModel) -> Self {
        Self {
            id: group.public_id,
            name: group.name,
            description: group.description,
            is_active: group.is_active,
            created_at: group.created_at,
            updated_at: group.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MemberResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub admin: bool,
}

impl From<UserModel> for MemberResponse {
    fn from(user: UserModel) -> Self {
        Self {
            id: user.public_id,
            username: user.username,
            email: user.email,
            admin: user.admin,
        }
    }
}

#[derive(Serialize)]
pub struct GroupListResponse {
    pub groups: Vec<GroupResponse>,
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
}

#[derive(Serialize)]
pub struct GroupDetailResponse {
    #[serde(flatten)]
    pub group: GroupResponse,
    pub member_count: u64,
}
