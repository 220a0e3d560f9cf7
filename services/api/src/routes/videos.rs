//! Video handlers

use auth::{ApiResponse, ApiResult, CurrentUser, ensure_owner, validation::require_fields};
use axum::{
    Json,
    extract::{Query, State},
};
use serde_json::{Value, json};
use tracing::info;

use super::{found, visible_video};
use crate::{
    extract::ResourceId,
    models::{NewVideo, PublishVideoRequest, UpdateVideoRequest, Video, VideoQuery, VideoUpdate},
    state::AppState,
};

/// Published videos, optionally for a single owner
pub async fn list_videos(
    State(state): State<AppState>,
    Query(query): Query<VideoQuery>,
) -> ApiResult<ApiResponse<Vec<Video>>> {
    let videos = state.content.list_videos(query.user_id, true).await?;
    Ok(ApiResponse::ok(videos, "Videos fetched successfully"))
}

/// Publish a video whose media is already hosted
pub async fn publish_video(
    State(state): State<AppState>,
    caller: CurrentUser,
    Json(payload): Json<PublishVideoRequest>,
) -> ApiResult<ApiResponse<Video>> {
    require_fields(&[
        ("title", payload.title.as_str()),
        ("description", payload.description.as_str()),
        ("videoUrl", payload.video_url.as_str()),
    ])?;

    let video = state
        .content
        .create_video(NewVideo {
            owner_id: caller.id(),
            title: payload.title.trim().to_string(),
            description: payload.description.trim().to_string(),
            video_url: payload.video_url.trim().to_string(),
            thumbnail_url: payload.thumbnail_url,
            duration: payload.duration,
        })
        .await?;

    info!("User {} published video {}", caller.id(), video.id);
    Ok(ApiResponse::created(video, "Video published successfully"))
}

/// Fetch a video and count the view; unpublished videos are visible to their owner only
pub async fn get_video(
    State(state): State<AppState>,
    caller: CurrentUser,
    ResourceId(id): ResourceId,
) -> ApiResult<ApiResponse<Video>> {
    visible_video(&state, &caller, id).await?;

    let video = found(state.content.record_view(id).await?, "Video")?;
    Ok(ApiResponse::ok(video, "Video fetched successfully"))
}

/// Edit title, description and thumbnail
pub async fn update_video(
    State(state): State<AppState>,
    caller: CurrentUser,
    ResourceId(id): ResourceId,
    Json(payload): Json<UpdateVideoRequest>,
) -> ApiResult<ApiResponse<Video>> {
    let video = found(state.content.find_video(id).await?, "Video")?;
    ensure_owner(&caller, &video)?;

    require_fields(&[
        ("title", payload.title.as_str()),
        ("description", payload.description.as_str()),
    ])?;

    let update = VideoUpdate {
        title: payload.title.trim().to_string(),
        description: payload.description.trim().to_string(),
        thumbnail_url: payload.thumbnail_url,
    };
    let video = found(state.content.update_video(id, update).await?, "Video")?;

    Ok(ApiResponse::ok(video, "Video updated successfully"))
}

pub async fn delete_video(
    State(state): State<AppState>,
    caller: CurrentUser,
    ResourceId(id): ResourceId,
) -> ApiResult<ApiResponse<Value>> {
    let video = found(state.content.find_video(id).await?, "Video")?;
    ensure_owner(&caller, &video)?;

    state.content.delete_video(id).await?;

    info!("User {} deleted video {}", caller.id(), id);
    Ok(ApiResponse::ok(json!({}), "Video deleted successfully"))
}

pub async fn toggle_publish(
    State(state): State<AppState>,
    caller: CurrentUser,
    ResourceId(id): ResourceId,
) -> ApiResult<ApiResponse<Video>> {
    let video = found(state.content.find_video(id).await?, "Video")?;
    ensure_owner(&caller, &video)?;

    let video = found(
        state
            .content
            .set_video_published(id, !video.is_published)
            .await?,
        "Video",
    )?;

    Ok(ApiResponse::ok(video, "Video publish status toggled successfully"))
}
