//! Activity and activity-item request/response models.

use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use db::models::activity::Model as ActivityModel;
use db::models::activity_item::{ItemType, Model as ItemModel};
use services::activity_service::ActivityService;
use services::error::ServiceResult;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateActivityRequest {
    #[validate(length(max = 255, message = "Activity title cannot exceed 255 characters"))]
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate, Default)]
pub struct UpdateActivityRequest {
    #[validate(length(max = 255, message = "Activity title cannot exceed 255 characters"))]
    pub title: Option<String>,
    /// An empty string clears the description.
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
}

/// Item creation payload: exactly one of the five content references must be
/// populated. The item's type is derived from that reference, never sent by
/// the client.
#[derive(Debug, Deserialize, Default)]
pub struct CreateItemRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub question_id: Option<String>,
    pub video_lesson_id: Option<String>,
    pub handout_id: Option<String>,
    pub exercise_list_id: Option<String>,
    pub simulated_exam_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReorderItemsRequest {
    /// Every item of the activity, in the desired order.
    pub item_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ActivityResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub due_date: DateTime<Utc>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ActivityModel> for ActivityResponse {
    fn from(activity: ActivityModel) -> Self {
        Self {
            id: activity.public_id,
            title: activity.title,
            description: activity.description,
            due_date: activity.due_date,
            is_active: activity.is_active,
            created_at: activity.created_at,
            updated_at: activity.updated_at,
        }
    }
}

#[derive(Serialize)]
pub struct ActivityListResponse {
    pub activities: Vec<ActivityResponse>,
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
}

#[derive(Debug, Serialize)]
pub struct ItemResponse {
    pub id: Uuid,
    pub order_index: i32,
    pub title: Option<String>,
    pub description: Option<String>,
    pub item_type: ItemType,
    /// Public id of the referenced content row.
    pub content_id: Uuid,
}

impl ItemResponse {
    pub async fn from_model(db: &DatabaseConnection, item: ItemModel) -> ServiceResult<Self> {
        let (item_type, content_id) = ActivityService::content_ref(db, &item).await?;
        Ok(Self {
            id: item.public_id,
            order_index: item.order_index,
            title: item.title,
            description: item.description,
            item_type,
            content_id,
        })
    }

    pub async fn from_models(
        db: &DatabaseConnection,
        items: Vec<ItemModel>,
    ) -> ServiceResult<Vec<Self>> {
        let mut responses = Vec::with_capacity(items.len());
        for item in items {
            responses.push(Self::from_model(db, item).await?);
        }
        Ok(responses)
    }
}
