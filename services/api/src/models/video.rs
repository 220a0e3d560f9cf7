//! Video models for the API service

use auth::Owned;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Video entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub thumbnail_url: Option<String>,
    pub duration: Option<f64>,
    pub views: i64,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Owned for Video {
    fn owner_id(&self) -> Uuid {
        self.owner_id
    }
}

/// New video creation payload
#[derive(Debug, Clone)]
pub struct NewVideo {
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub thumbnail_url: Option<String>,
    pub duration: Option<f64>,
}

/// Video update payload
#[derive(Debug, Clone)]
pub struct VideoUpdate {
    pub title: String,
    pub description: String,
    pub thumbnail_url: Option<String>,
}

/// Request for publishing a video whose media is already hosted
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishVideoRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub video_url: String,
    pub thumbnail_url: Option<String>,
    pub duration: Option<f64>,
}

/// Request for editing a video's details
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVideoRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub thumbnail_url: Option<String>,
}

/// Query parameters for video listing
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoQuery {
    /// Only videos owned by this user
    pub user_id: Option<Uuid>,
}
