//! Comment models

use auth::Owned;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Comment left on a video
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub video_id: Uuid,
    pub owner_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Owned for Comment {
    fn owner_id(&self) -> Uuid {
        self.owner_id
    }
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub video_id: Uuid,
    pub owner_id: Uuid,
    pub content: String,
}

/// Body of comment and tweet writes
#[derive(Debug, Clone, Deserialize)]
pub struct ContentRequest {
    #[serde(default)]
    pub content: String,
}
