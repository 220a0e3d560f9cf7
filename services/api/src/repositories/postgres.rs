//! PostgreSQL content repository

use async_trait::async_trait;
use common::error::{DatabaseError, DatabaseResult};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::ContentStore;
use crate::models::{
    ChannelStats, Comment, Like, LikeTarget, NewComment, NewVideo, Subscription, Tweet, Video,
    VideoUpdate,
};

const VIDEO_COLUMNS: &str = "id, owner_id, title, description, video_url, thumbnail_url, \
                             duration, views, is_published, created_at, updated_at";
const COMMENT_COLUMNS: &str = "id, video_id, owner_id, content, created_at, updated_at";
const TWEET_COLUMNS: &str = "id, owner_id, content, created_at, updated_at";
const LIKE_COLUMNS: &str = "id, user_id, video_id, comment_id, tweet_id, created_at";
const SUBSCRIPTION_COLUMNS: &str = "id, subscriber_id, channel_id, created_at";

/// Content repository for database operations
#[derive(Clone)]
pub struct PgContentStore {
    pool: PgPool,
}

impl PgContentStore {
    /// Create a new content repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn execute_delete(&self, query: &str, id: Uuid) -> DatabaseResult<bool> {
        let result = sqlx::query(query)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl ContentStore for PgContentStore {
    async fn create_video(&self, new_video: NewVideo) -> DatabaseResult<Video> {
        let query = format!(
            r#"
            INSERT INTO videos (id, owner_id, title, description, video_url, thumbnail_url, duration)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {VIDEO_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Video>(&query)
            .bind(Uuid::new_v4())
            .bind(new_video.owner_id)
            .bind(&new_video.title)
            .bind(&new_video.description)
            .bind(&new_video.video_url)
            .bind(&new_video.thumbnail_url)
            .bind(new_video.duration)
            .fetch_one(&self.pool)
            .await
            .map_err(DatabaseError::from_query)
    }

    async fn find_video(&self, id: Uuid) -> DatabaseResult<Option<Video>> {
        let query = format!("SELECT {VIDEO_COLUMNS} FROM videos WHERE id = $1");

        sqlx::query_as::<_, Video>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::Query)
    }

    async fn list_videos(
        &self,
        owner: Option<Uuid>,
        published_only: bool,
    ) -> DatabaseResult<Vec<Video>> {
        let query = format!(
            r#"
            SELECT {VIDEO_COLUMNS} FROM videos
            WHERE ($1::uuid IS NULL OR owner_id = $1)
              AND (NOT $2 OR is_published)
            ORDER BY created_at DESC
            "#
        );

        sqlx::query_as::<_, Video>(&query)
            .bind(owner)
            .bind(published_only)
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::Query)
    }

    async fn update_video(&self, id: Uuid, update: VideoUpdate) -> DatabaseResult<Option<Video>> {
        let query = format!(
            r#"
            UPDATE videos
            SET title = $2, description = $3,
                thumbnail_url = COALESCE($4, thumbnail_url), updated_at = NOW()
            WHERE id = $1
            RETURNING {VIDEO_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Video>(&query)
            .bind(id)
            .bind(&update.title)
            .bind(&update.description)
            .bind(&update.thumbnail_url)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::Query)
    }

    async fn set_video_published(
        &self,
        id: Uuid,
        published: bool,
    ) -> DatabaseResult<Option<Video>> {
        let query = format!(
            "UPDATE videos SET is_published = $2, updated_at = NOW() WHERE id = $1 \
             RETURNING {VIDEO_COLUMNS}"
        );

        sqlx::query_as::<_, Video>(&query)
            .bind(id)
            .bind(published)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::Query)
    }

    async fn record_view(&self, id: Uuid) -> DatabaseResult<Option<Video>> {
        let query =
            format!("UPDATE videos SET views = views + 1 WHERE id = $1 RETURNING {VIDEO_COLUMNS}");

        sqlx::query_as::<_, Video>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::Query)
    }

    async fn delete_video(&self, id: Uuid) -> DatabaseResult<bool> {
        self.execute_delete("DELETE FROM videos WHERE id = $1", id)
            .await
    }

    async fn create_comment(&self, new_comment: NewComment) -> DatabaseResult<Comment> {
        let query = format!(
            r#"
            INSERT INTO comments (id, video_id, owner_id, content)
            VALUES ($1, $2, $3, $4)
            RETURNING {COMMENT_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Comment>(&query)
            .bind(Uuid::new_v4())
            .bind(new_comment.video_id)
            .bind(new_comment.owner_id)
            .bind(&new_comment.content)
            .fetch_one(&self.pool)
            .await
            .map_err(DatabaseError::from_query)
    }

    async fn find_comment(&self, id: Uuid) -> DatabaseResult<Option<Comment>> {
        let query = format!("SELECT {COMMENT_COLUMNS} FROM comments WHERE id = $1");

        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::Query)
    }

    async fn list_comments(&self, video_id: Uuid) -> DatabaseResult<Vec<Comment>> {
        let query = format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE video_id = $1 ORDER BY created_at DESC"
        );

        sqlx::query_as::<_, Comment>(&query)
            .bind(video_id)
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::Query)
    }

    async fn update_comment(&self, id: Uuid, content: &str) -> DatabaseResult<Option<Comment>> {
        let query = format!(
            "UPDATE comments SET content = $2, updated_at = NOW() WHERE id = $1 \
             RETURNING {COMMENT_COLUMNS}"
        );

        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .bind(content)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::Query)
    }

    async fn delete_comment(&self, id: Uuid) -> DatabaseResult<bool> {
        self.execute_delete("DELETE FROM comments WHERE id = $1", id)
            .await
    }

    async fn create_tweet(&self, owner_id: Uuid, content: &str) -> DatabaseResult<Tweet> {
        let query = format!(
            "INSERT INTO tweets (id, owner_id, content) VALUES ($1, $2, $3) \
             RETURNING {TWEET_COLUMNS}"
        );

        sqlx::query_as::<_, Tweet>(&query)
            .bind(Uuid::new_v4())
            .bind(owner_id)
            .bind(content)
            .fetch_one(&self.pool)
            .await
            .map_err(DatabaseError::from_query)
    }

    async fn find_tweet(&self, id: Uuid) -> DatabaseResult<Option<Tweet>> {
        let query = format!("SELECT {TWEET_COLUMNS} FROM tweets WHERE id = $1");

        sqlx::query_as::<_, Tweet>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::Query)
    }

    async fn list_tweets(&self, owner_id: Uuid) -> DatabaseResult<Vec<Tweet>> {
        let query = format!(
            "SELECT {TWEET_COLUMNS} FROM tweets WHERE owner_id = $1 ORDER BY created_at DESC"
        );

        sqlx::query_as::<_, Tweet>(&query)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::Query)
    }

    async fn update_tweet(&self, id: Uuid, content: &str) -> DatabaseResult<Option<Tweet>> {
        let query = format!(
            "UPDATE tweets SET content = $2, updated_at = NOW() WHERE id = $1 \
             RETURNING {TWEET_COLUMNS}"
        );

        sqlx::query_as::<_, Tweet>(&query)
            .bind(id)
            .bind(content)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::Query)
    }

    async fn delete_tweet(&self, id: Uuid) -> DatabaseResult<bool> {
        self.execute_delete("DELETE FROM tweets WHERE id = $1", id)
            .await
    }

    async fn find_like(&self, user_id: Uuid, target: LikeTarget) -> DatabaseResult<Option<Like>> {
        let query = format!(
            r#"
            SELECT {LIKE_COLUMNS} FROM likes
            WHERE user_id = $1
              AND video_id IS NOT DISTINCT FROM $2
              AND comment_id IS NOT DISTINCT FROM $3
              AND tweet_id IS NOT DISTINCT FROM $4
            LIMIT 1
            "#
        );

        sqlx::query_as::<_, Like>(&query)
            .bind(user_id)
            .bind(target.video_id())
            .bind(target.comment_id())
            .bind(target.tweet_id())
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::Query)
    }

    async fn create_like(&self, user_id: Uuid, target: LikeTarget) -> DatabaseResult<Like> {
        let query = format!(
            r#"
            INSERT INTO likes (id, user_id, video_id, comment_id, tweet_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {LIKE_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Like>(&query)
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(target.video_id())
            .bind(target.comment_id())
            .bind(target.tweet_id())
            .fetch_one(&self.pool)
            .await
            .map_err(DatabaseError::from_query)
    }

    async fn delete_like(&self, id: Uuid) -> DatabaseResult<bool> {
        self.execute_delete("DELETE FROM likes WHERE id = $1", id)
            .await
    }

    async fn liked_videos(&self, user_id: Uuid) -> DatabaseResult<Vec<Video>> {
        let query = r#"
            SELECT v.* FROM videos v
            JOIN likes l ON l.video_id = v.id
            WHERE l.user_id = $1
            ORDER BY l.created_at DESC
            "#;

        sqlx::query_as::<_, Video>(query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::Query)
    }

    async fn find_subscription(
        &self,
        subscriber_id: Uuid,
        channel_id: Uuid,
    ) -> DatabaseResult<Option<Subscription>> {
        let query = format!(
            "SELECT {SUBSCRIPTION_COLUMNS} FROM subscriptions \
             WHERE subscriber_id = $1 AND channel_id = $2 LIMIT 1"
        );

        sqlx::query_as::<_, Subscription>(&query)
            .bind(subscriber_id)
            .bind(channel_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::Query)
    }

    async fn create_subscription(
        &self,
        subscriber_id: Uuid,
        channel_id: Uuid,
    ) -> DatabaseResult<Subscription> {
        let query = format!(
            "INSERT INTO subscriptions (id, subscriber_id, channel_id) VALUES ($1, $2, $3) \
             RETURNING {SUBSCRIPTION_COLUMNS}"
        );

        sqlx::query_as::<_, Subscription>(&query)
            .bind(Uuid::new_v4())
            .bind(subscriber_id)
            .bind(channel_id)
            .fetch_one(&self.pool)
            .await
            .map_err(DatabaseError::from_query)
    }

    async fn delete_subscription(&self, id: Uuid) -> DatabaseResult<bool> {
        self.execute_delete("DELETE FROM subscriptions WHERE id = $1", id)
            .await
    }

    async fn list_subscribers(&self, channel_id: Uuid) -> DatabaseResult<Vec<Subscription>> {
        let query = format!(
            "SELECT {SUBSCRIPTION_COLUMNS} FROM subscriptions WHERE channel_id = $1 \
             ORDER BY created_at DESC"
        );

        sqlx::query_as::<_, Subscription>(&query)
            .bind(channel_id)
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::Query)
    }

    async fn list_subscriptions(&self, subscriber_id: Uuid) -> DatabaseResult<Vec<Subscription>> {
        let query = format!(
            "SELECT {SUBSCRIPTION_COLUMNS} FROM subscriptions WHERE subscriber_id = $1 \
             ORDER BY created_at DESC"
        );

        sqlx::query_as::<_, Subscription>(&query)
            .bind(subscriber_id)
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::Query)
    }

    async fn channel_stats(&self, owner_id: Uuid) -> DatabaseResult<ChannelStats> {
        let row = sqlx::query(
            r#"
            SELECT
                (SELECT COALESCE(SUM(views), 0)::BIGINT FROM videos WHERE owner_id = $1) AS total_views,
                (SELECT COUNT(*) FROM videos WHERE owner_id = $1) AS total_videos,
                (SELECT COUNT(*) FROM subscriptions WHERE channel_id = $1) AS total_subscribers,
                (SELECT COUNT(*) FROM likes l JOIN videos v ON l.video_id = v.id
                 WHERE v.owner_id = $1) AS total_likes
            "#,
        )
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(ChannelStats {
            total_views: row.get("total_views"),
            total_subscribers: row.get("total_subscribers"),
            total_videos: row.get("total_videos"),
            total_likes: row.get("total_likes"),
        })
    }
}
