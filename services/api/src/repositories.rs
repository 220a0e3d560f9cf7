//! Repositories for content operations

use async_trait::async_trait;
use common::error::DatabaseResult;
use uuid::Uuid;

use crate::models::{
    ChannelStats, Comment, Like, LikeTarget, NewComment, NewVideo, Subscription, Tweet, Video,
    VideoUpdate,
};

#[cfg(test)]
pub mod memory;
pub mod postgres;

#[cfg(test)]
pub use memory::MemoryContentStore;
pub use postgres::PgContentStore;

/// Persistence for everything users publish and react to
#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn create_video(&self, new_video: NewVideo) -> DatabaseResult<Video>;
    async fn find_video(&self, id: Uuid) -> DatabaseResult<Option<Video>>;
    /// Newest first
    async fn list_videos(&self, owner: Option<Uuid>, published_only: bool)
    -> DatabaseResult<Vec<Video>>;
    async fn update_video(&self, id: Uuid, update: VideoUpdate) -> DatabaseResult<Option<Video>>;
    async fn set_video_published(&self, id: Uuid, published: bool)
    -> DatabaseResult<Option<Video>>;
    async fn record_view(&self, id: Uuid) -> DatabaseResult<Option<Video>>;
    async fn delete_video(&self, id: Uuid) -> DatabaseResult<bool>;

    async fn create_comment(&self, new_comment: NewComment) -> DatabaseResult<Comment>;
    async fn find_comment(&self, id: Uuid) -> DatabaseResult<Option<Comment>>;
    async fn list_comments(&self, video_id: Uuid) -> DatabaseResult<Vec<Comment>>;
    async fn update_comment(&self, id: Uuid, content: &str) -> DatabaseResult<Option<Comment>>;
    async fn delete_comment(&self, id: Uuid) -> DatabaseResult<bool>;

    async fn create_tweet(&self, owner_id: Uuid, content: &str) -> DatabaseResult<Tweet>;
    async fn find_tweet(&self, id: Uuid) -> DatabaseResult<Option<Tweet>>;
    async fn list_tweets(&self, owner_id: Uuid) -> DatabaseResult<Vec<Tweet>>;
    async fn update_tweet(&self, id: Uuid, content: &str) -> DatabaseResult<Option<Tweet>>;
    async fn delete_tweet(&self, id: Uuid) -> DatabaseResult<bool>;

    async fn find_like(&self, user_id: Uuid, target: LikeTarget) -> DatabaseResult<Option<Like>>;
    async fn create_like(&self, user_id: Uuid, target: LikeTarget) -> DatabaseResult<Like>;
    async fn delete_like(&self, id: Uuid) -> DatabaseResult<bool>;
    /// Videos the user liked, most recently liked first
    async fn liked_videos(&self, user_id: Uuid) -> DatabaseResult<Vec<Video>>;

    async fn find_subscription(
        &self,
        subscriber_id: Uuid,
        channel_id: Uuid,
    ) -> DatabaseResult<Option<Subscription>>;
    async fn create_subscription(
        &self,
        subscriber_id: Uuid,
        channel_id: Uuid,
    ) -> DatabaseResult<Subscription>;
    async fn delete_subscription(&self, id: Uuid) -> DatabaseResult<bool>;
    async fn list_subscribers(&self, channel_id: Uuid) -> DatabaseResult<Vec<Subscription>>;
    async fn list_subscriptions(&self, subscriber_id: Uuid) -> DatabaseResult<Vec<Subscription>>;

    /// Aggregate views, videos, subscribers and video likes for a channel
    async fn channel_stats(&self, owner_id: Uuid) -> DatabaseResult<ChannelStats>;
}
