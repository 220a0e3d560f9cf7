//! Public channel page

use auth::{ApiResponse, ApiResult, CurrentUser};
use axum::extract::{Path, State};

use super::found;
use crate::{models::ChannelProfile, state::AppState};

pub async fn channel_profile(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(username): Path<String>,
) -> ApiResult<ApiResponse<ChannelProfile>> {
    let username = username.trim().to_lowercase();
    let user = state
        .users()
        .find_by_username_or_email(&username)
        .await?
        .filter(|user| user.username == username);
    let user = found(user, "Channel")?;

    let subscribers = state.content.list_subscribers(user.id).await?;
    let subscribed_to = state.content.list_subscriptions(user.id).await?;
    let is_subscribed = subscribers.iter().any(|s| s.subscriber_id == caller.id());

    let profile = ChannelProfile {
        user: user.profile(),
        subscriber_count: subscribers.len() as i64,
        channel_subscribed_to_count: subscribed_to.len() as i64,
        is_subscribed,
    };

    Ok(ApiResponse::ok(profile, "Channel fetched successfully"))
}
