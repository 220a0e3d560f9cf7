//! Creator dashboard

use auth::{ApiResponse, ApiResult, CurrentUser};
use axum::extract::State;

use crate::{
    models::{ChannelStats, Video},
    state::AppState,
};

/// Totals for the caller's channel; zeros when nothing is uploaded yet
pub async fn channel_stats(
    State(state): State<AppState>,
    caller: CurrentUser,
) -> ApiResult<ApiResponse<ChannelStats>> {
    let stats = state.content.channel_stats(caller.id()).await?;
    Ok(ApiResponse::ok(stats, "Channel stats fetched successfully"))
}

/// All of the caller's videos, published or not
pub async fn channel_videos(
    State(state): State<AppState>,
    caller: CurrentUser,
) -> ApiResult<ApiResponse<Vec<Video>>> {
    let videos = state.content.list_videos(Some(caller.id()), false).await?;
    Ok(ApiResponse::ok(videos, "Channel videos fetched successfully"))
}
