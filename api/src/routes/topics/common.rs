//! Topic request/response models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use db::models::topic::Model as TopicModel;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTopicRequest {
    #[validate(length(max = 255, message = "Topic name cannot exceed 255 characters"))]
    pub name: String,
    #[validate(length(max = 512, message = "Topic description cannot exceed 512 characters"))]
    pub description: Option<String>,
    /// Parent topic's public id; absent or empty creates a root topic.
    pub parent_id: Option<String>,
}

#[derive(Debug, Deserialize, Validate, Default)]
pub struct UpdateTopicRequest {
    #[validate(length(max = 255, message = "Topic name cannot exceed 255 characters"))]
    pub name: Option<String>,
    /// An empty string clears the description.
    #[validate(length(max = 512, message = "Topic description cannot exceed 512 characters"))]
    pub description: Option<String>,
    /// An empty string moves the topic to the root.
    pub parent_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TopicFilterReq {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    /// Name substring filter.
    pub query: Option<String>,
    /// Restrict to children of this parent (public id).
    pub parent_id: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct DeleteTopicReq {
    /// `""` (default), `"cascade"` or `"reparent"`.
    pub mode: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TopicResponse {
    pub id: Uuid,
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TopicResponse {
    /// Internal ids never leave the API; the parent reference is the parent's
    /// public id, resolved by the caller.
    pub fn from_model(topic: TopicModel, parent_public_id: Option<Uuid>) -> Self {
        Self {
            id: topic.public_id,
            parent_id: parent_public_id,
            name: topic.name,
            description: topic.description,
            is_active: topic.is_active,
            created_at: topic.created_at,
            updated_at: topic.updated_at,
        }
    }
}

#[derive(Serialize)]
pub struct TopicListResponse {
    pub topics: Vec<TopicResponse>,
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
}
