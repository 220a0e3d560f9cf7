//! In-process content store used by tests

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use common::error::DatabaseResult;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::ContentStore;
use crate::models::{
    ChannelStats, Comment, Like, LikeTarget, NewComment, NewVideo, Subscription, Tweet, Video,
    VideoUpdate,
};

#[derive(Debug, Default)]
struct Tables {
    videos: Vec<Video>,
    comments: Vec<Comment>,
    tweets: Vec<Tweet>,
    likes: Vec<Like>,
    subscriptions: Vec<Subscription>,
}

impl Tables {
    /// Drop rows that reference a removed comment
    fn cascade_comment(&mut self, comment_id: Uuid) {
        self.likes.retain(|l| l.comment_id != Some(comment_id));
    }

    fn cascade_video(&mut self, video_id: Uuid) {
        let orphaned: Vec<Uuid> = self
            .comments
            .iter()
            .filter(|c| c.video_id == video_id)
            .map(|c| c.id)
            .collect();
        self.comments.retain(|c| c.video_id != video_id);
        for comment_id in orphaned {
            self.cascade_comment(comment_id);
        }
        self.likes.retain(|l| l.video_id != Some(video_id));
    }
}

/// Content store backed by mutex-guarded vectors, insertion ordered
#[derive(Debug, Clone, Default)]
pub struct MemoryContentStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryContentStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

/// Newest first, matching `ORDER BY created_at DESC`
fn newest_first<T>(rows: impl DoubleEndedIterator<Item = T>) -> Vec<T> {
    rows.rev().collect()
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn create_video(&self, new_video: NewVideo) -> DatabaseResult<Video> {
        let now = Utc::now();
        let video = Video {
            id: Uuid::new_v4(),
            owner_id: new_video.owner_id,
            title: new_video.title,
            description: new_video.description,
            video_url: new_video.video_url,
            thumbnail_url: new_video.thumbnail_url,
            duration: new_video.duration,
            views: 0,
            is_published: true,
            created_at: now,
            updated_at: now,
        };
        self.tables.lock().await.videos.push(video.clone());
        Ok(video)
    }

    async fn find_video(&self, id: Uuid) -> DatabaseResult<Option<Video>> {
        let tables = self.tables.lock().await;
        Ok(tables.videos.iter().find(|v| v.id == id).cloned())
    }

    async fn list_videos(
        &self,
        owner: Option<Uuid>,
        published_only: bool,
    ) -> DatabaseResult<Vec<Video>> {
        let tables = self.tables.lock().await;
        Ok(newest_first(
            tables
                .videos
                .iter()
                .filter(|v| owner.is_none_or(|owner| v.owner_id == owner))
                .filter(|v| !published_only || v.is_published)
                .cloned(),
        ))
    }

    async fn update_video(&self, id: Uuid, update: VideoUpdate) -> DatabaseResult<Option<Video>> {
        let mut tables = self.tables.lock().await;
        Ok(tables.videos.iter_mut().find(|v| v.id == id).map(|video| {
            video.title = update.title;
            video.description = update.description;
            if update.thumbnail_url.is_some() {
                video.thumbnail_url = update.thumbnail_url;
            }
            video.updated_at = Utc::now();
            video.clone()
        }))
    }

    async fn set_video_published(
        &self,
        id: Uuid,
        published: bool,
    ) -> DatabaseResult<Option<Video>> {
        let mut tables = self.tables.lock().await;
        Ok(tables.videos.iter_mut().find(|v| v.id == id).map(|video| {
            video.is_published = published;
            video.updated_at = Utc::now();
            video.clone()
        }))
    }

    async fn record_view(&self, id: Uuid) -> DatabaseResult<Option<Video>> {
        let mut tables = self.tables.lock().await;
        Ok(tables.videos.iter_mut().find(|v| v.id == id).map(|video| {
            video.views += 1;
            video.clone()
        }))
    }

    async fn delete_video(&self, id: Uuid) -> DatabaseResult<bool> {
        let mut tables = self.tables.lock().await;
        let before = tables.videos.len();
        tables.videos.retain(|v| v.id != id);
        if tables.videos.len() == before {
            return Ok(false);
        }
        tables.cascade_video(id);
        Ok(true)
    }

    async fn create_comment(&self, new_comment: NewComment) -> DatabaseResult<Comment> {
        let now = Utc::now();
        let comment = Comment {
            id: Uuid::new_v4(),
            video_id: new_comment.video_id,
            owner_id: new_comment.owner_id,
            content: new_comment.content,
            created_at: now,
            updated_at: now,
        };
        self.tables.lock().await.comments.push(comment.clone());
        Ok(comment)
    }

    async fn find_comment(&self, id: Uuid) -> DatabaseResult<Option<Comment>> {
        let tables = self.tables.lock().await;
        Ok(tables.comments.iter().find(|c| c.id == id).cloned())
    }

    async fn list_comments(&self, video_id: Uuid) -> DatabaseResult<Vec<Comment>> {
        let tables = self.tables.lock().await;
        Ok(newest_first(
            tables
                .comments
                .iter()
                .filter(|c| c.video_id == video_id)
                .cloned(),
        ))
    }

    async fn update_comment(&self, id: Uuid, content: &str) -> DatabaseResult<Option<Comment>> {
        let mut tables = self.tables.lock().await;
        Ok(tables.comments.iter_mut().find(|c| c.id == id).map(|comment| {
            comment.content = content.to_string();
            comment.updated_at = Utc::now();
            comment.clone()
        }))
    }

    async fn delete_comment(&self, id: Uuid) -> DatabaseResult<bool> {
        let mut tables = self.tables.lock().await;
        let before = tables.comments.len();
        tables.comments.retain(|c| c.id != id);
        if tables.comments.len() == before {
            return Ok(false);
        }
        tables.cascade_comment(id);
        Ok(true)
    }

    async fn create_tweet(&self, owner_id: Uuid, content: &str) -> DatabaseResult<Tweet> {
        let now = Utc::now();
        let tweet = Tweet {
            id: Uuid::new_v4(),
            owner_id,
            content: content.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.tables.lock().await.tweets.push(tweet.clone());
        Ok(tweet)
    }

    async fn find_tweet(&self, id: Uuid) -> DatabaseResult<Option<Tweet>> {
        let tables = self.tables.lock().await;
        Ok(tables.tweets.iter().find(|t| t.id == id).cloned())
    }

    async fn list_tweets(&self, owner_id: Uuid) -> DatabaseResult<Vec<Tweet>> {
        let tables = self.tables.lock().await;
        Ok(newest_first(
            tables
                .tweets
                .iter()
                .filter(|t| t.owner_id == owner_id)
                .cloned(),
        ))
    }

    async fn update_tweet(&self, id: Uuid, content: &str) -> DatabaseResult<Option<Tweet>> {
        let mut tables = self.tables.lock().await;
        Ok(tables.tweets.iter_mut().find(|t| t.id == id).map(|tweet| {
            tweet.content = content.to_string();
            tweet.updated_at = Utc::now();
            tweet.clone()
        }))
    }

    async fn delete_tweet(&self, id: Uuid) -> DatabaseResult<bool> {
        let mut tables = self.tables.lock().await;
        let before = tables.tweets.len();
        tables.tweets.retain(|t| t.id != id);
        if tables.tweets.len() == before {
            return Ok(false);
        }
        tables.likes.retain(|l| l.tweet_id != Some(id));
        Ok(true)
    }

    async fn find_like(&self, user_id: Uuid, target: LikeTarget) -> DatabaseResult<Option<Like>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .likes
            .iter()
            .find(|l| {
                l.user_id == user_id
                    && l.video_id == target.video_id()
                    && l.comment_id == target.comment_id()
                    && l.tweet_id == target.tweet_id()
            })
            .cloned())
    }

    async fn create_like(&self, user_id: Uuid, target: LikeTarget) -> DatabaseResult<Like> {
        let like = Like {
            id: Uuid::new_v4(),
            user_id,
            video_id: target.video_id(),
            comment_id: target.comment_id(),
            tweet_id: target.tweet_id(),
            created_at: Utc::now(),
        };
        self.tables.lock().await.likes.push(like.clone());
        Ok(like)
    }

    async fn delete_like(&self, id: Uuid) -> DatabaseResult<bool> {
        let mut tables = self.tables.lock().await;
        let before = tables.likes.len();
        tables.likes.retain(|l| l.id != id);
        Ok(tables.likes.len() != before)
    }

    async fn liked_videos(&self, user_id: Uuid) -> DatabaseResult<Vec<Video>> {
        let tables = self.tables.lock().await;
        Ok(newest_first(
            tables
                .likes
                .iter()
                .filter(|l| l.user_id == user_id)
                .filter_map(|l| l.video_id)
                .filter_map(|id| tables.videos.iter().find(|v| v.id == id).cloned()),
        ))
    }

    async fn find_subscription(
        &self,
        subscriber_id: Uuid,
        channel_id: Uuid,
    ) -> DatabaseResult<Option<Subscription>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .subscriptions
            .iter()
            .find(|s| s.subscriber_id == subscriber_id && s.channel_id == channel_id)
            .cloned())
    }

    async fn create_subscription(
        &self,
        subscriber_id: Uuid,
        channel_id: Uuid,
    ) -> DatabaseResult<Subscription> {
        let subscription = Subscription {
            id: Uuid::new_v4(),
            subscriber_id,
            channel_id,
            created_at: Utc::now(),
        };
        self.tables
            .lock()
            .await
            .subscriptions
            .push(subscription.clone());
        Ok(subscription)
    }

    async fn delete_subscription(&self, id: Uuid) -> DatabaseResult<bool> {
        let mut tables = self.tables.lock().await;
        let before = tables.subscriptions.len();
        tables.subscriptions.retain(|s| s.id != id);
        Ok(tables.subscriptions.len() != before)
    }

    async fn list_subscribers(&self, channel_id: Uuid) -> DatabaseResult<Vec<Subscription>> {
        let tables = self.tables.lock().await;
        Ok(newest_first(
            tables
                .subscriptions
                .iter()
                .filter(|s| s.channel_id == channel_id)
                .cloned(),
        ))
    }

    async fn list_subscriptions(&self, subscriber_id: Uuid) -> DatabaseResult<Vec<Subscription>> {
        let tables = self.tables.lock().await;
        Ok(newest_first(
            tables
                .subscriptions
                .iter()
                .filter(|s| s.subscriber_id == subscriber_id)
                .cloned(),
        ))
    }

    async fn channel_stats(&self, owner_id: Uuid) -> DatabaseResult<ChannelStats> {
        let tables = self.tables.lock().await;
        let owned: Vec<&Video> = tables
            .videos
            .iter()
            .filter(|v| v.owner_id == owner_id)
            .collect();

        Ok(ChannelStats {
            total_views: owned.iter().map(|v| v.views).sum(),
            total_subscribers: tables
                .subscriptions
                .iter()
                .filter(|s| s.channel_id == owner_id)
                .count() as i64,
            total_videos: owned.len() as i64,
            total_likes: tables
                .likes
                .iter()
                .filter(|l| {
                    l.video_id
                        .is_some_and(|id| owned.iter().any(|v| v.id == id))
                })
                .count() as i64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_video(owner_id: Uuid, title: &str) -> NewVideo {
        NewVideo {
            owner_id,
            title: title.to_string(),
            description: "description".to_string(),
            video_url: "https://cdn.example.com/v.mp4".to_string(),
            thumbnail_url: None,
            duration: Some(12.5),
        }
    }

    #[tokio::test]
    async fn test_delete_video_cascades() {
        let store = MemoryContentStore::new();
        let owner = Uuid::new_v4();
        let fan = Uuid::new_v4();

        let video = store.create_video(new_video(owner, "first")).await.unwrap();
        let comment = store
            .create_comment(NewComment {
                video_id: video.id,
                owner_id: fan,
                content: "nice".to_string(),
            })
            .await
            .unwrap();
        store.create_like(fan, LikeTarget::Video(video.id)).await.unwrap();
        store
            .create_like(owner, LikeTarget::Comment(comment.id))
            .await
            .unwrap();

        assert!(store.delete_video(video.id).await.unwrap());
        assert!(store.find_comment(comment.id).await.unwrap().is_none());
        assert!(
            store
                .find_like(owner, LikeTarget::Comment(comment.id))
                .await
                .unwrap()
                .is_none()
        );
        assert!(store.liked_videos(fan).await.unwrap().is_empty());
        assert!(!store.delete_video(video.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_channel_stats() {
        let store = MemoryContentStore::new();
        let owner = Uuid::new_v4();
        let fan = Uuid::new_v4();

        assert_eq!(store.channel_stats(owner).await.unwrap(), ChannelStats::default());

        let first = store.create_video(new_video(owner, "first")).await.unwrap();
        store.create_video(new_video(owner, "second")).await.unwrap();
        store.create_video(new_video(fan, "elsewhere")).await.unwrap();
        store.record_view(first.id).await.unwrap();
        store.record_view(first.id).await.unwrap();
        store.create_like(fan, LikeTarget::Video(first.id)).await.unwrap();
        store.create_subscription(fan, owner).await.unwrap();

        let stats = store.channel_stats(owner).await.unwrap();
        assert_eq!(
            stats,
            ChannelStats {
                total_views: 2,
                total_subscribers: 1,
                total_videos: 2,
                total_likes: 1,
            }
        );
    }

    #[tokio::test]
    async fn test_list_videos_filters() {
        let store = MemoryContentStore::new();
        let owner = Uuid::new_v4();

        let first = store.create_video(new_video(owner, "first")).await.unwrap();
        let second = store.create_video(new_video(owner, "second")).await.unwrap();
        store.set_video_published(first.id, false).await.unwrap();

        let published = store.list_videos(Some(owner), true).await.unwrap();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].id, second.id);

        let all = store.list_videos(None, false).await.unwrap();
        assert_eq!(all.iter().map(|v| v.id).collect::<Vec<_>>(), vec![second.id, first.id]);
    }
}
