//! Likes, subscriptions and channel aggregates

use chrono::{DateTime, Utc};
use common::UserProfile;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// What a like points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeTarget {
    Video(Uuid),
    Comment(Uuid),
    Tweet(Uuid),
}

impl LikeTarget {
    pub fn video_id(&self) -> Option<Uuid> {
        match self {
            LikeTarget::Video(id) => Some(*id),
            _ => None,
        }
    }

    pub fn comment_id(&self) -> Option<Uuid> {
        match self {
            LikeTarget::Comment(id) => Some(*id),
            _ => None,
        }
    }

    pub fn tweet_id(&self) -> Option<Uuid> {
        match self {
            LikeTarget::Tweet(id) => Some(*id),
            _ => None,
        }
    }
}

/// A user's like on exactly one video, comment or tweet
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Like {
    pub id: Uuid,
    pub user_id: Uuid,
    pub video_id: Option<Uuid>,
    pub comment_id: Option<Uuid>,
    pub tweet_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// `subscriber_id` follows the channel owned by `channel_id`
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: Uuid,
    pub subscriber_id: Uuid,
    pub channel_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Totals shown on a creator's dashboard
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelStats {
    pub total_views: i64,
    pub total_subscribers: i64,
    pub total_videos: i64,
    pub total_likes: i64,
}

/// Public channel page as seen by the caller
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelProfile {
    #[serde(flatten)]
    pub user: UserProfile,
    pub subscriber_count: i64,
    pub channel_subscribed_to_count: i64,
    pub is_subscribed: bool,
}
