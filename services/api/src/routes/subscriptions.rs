//! Channel subscriptions

use auth::{ApiError, ApiResponse, ApiResult, CurrentUser};
use axum::extract::State;
use common::UserProfile;
use serde_json::{Value, json};
use tracing::info;
use uuid::Uuid;

use super::found;
use crate::{extract::ResourceId, state::AppState};

/// Subscribe to a channel, or unsubscribe when already subscribed.
/// Same non-atomic check-then-branch as likes.
pub async fn toggle_subscription(
    State(state): State<AppState>,
    caller: CurrentUser,
    ResourceId(channel_id): ResourceId,
) -> ApiResult<ApiResponse<Value>> {
    if channel_id == caller.id() {
        return Err(ApiError::BadRequest(
            "You cannot subscribe to your own channel".to_string(),
        ));
    }
    found(state.users().find_by_id(channel_id).await?, "Channel")?;

    match state
        .content
        .find_subscription(caller.id(), channel_id)
        .await?
    {
        Some(subscription) => {
            state.content.delete_subscription(subscription.id).await?;
            info!("User {} unsubscribed from {}", caller.id(), channel_id);
            Ok(ApiResponse::ok(
                json!({ "isSubscribed": false }),
                "Unsubscribed successfully",
            ))
        }
        None => {
            let subscription = state
                .content
                .create_subscription(caller.id(), channel_id)
                .await?;
            info!("User {} subscribed to {}", caller.id(), channel_id);
            Ok(ApiResponse::created(
                json!({ "isSubscribed": true, "subscription": subscription }),
                "Subscribed successfully",
            ))
        }
    }
}

/// Profiles of the channel's subscribers
pub async fn channel_subscribers(
    State(state): State<AppState>,
    ResourceId(channel_id): ResourceId,
) -> ApiResult<ApiResponse<Vec<UserProfile>>> {
    let subscriber_ids = state
        .content
        .list_subscribers(channel_id)
        .await?
        .into_iter()
        .map(|s| s.subscriber_id);

    let subscribers = profiles(&state, subscriber_ids).await?;
    Ok(ApiResponse::ok(subscribers, "Subscribers fetched successfully"))
}

/// Profiles of the channels a user follows
pub async fn subscribed_channels(
    State(state): State<AppState>,
    ResourceId(subscriber_id): ResourceId,
) -> ApiResult<ApiResponse<Vec<UserProfile>>> {
    let channel_ids = state
        .content
        .list_subscriptions(subscriber_id)
        .await?
        .into_iter()
        .map(|s| s.channel_id);

    let channels = profiles(&state, channel_ids).await?;
    Ok(ApiResponse::ok(channels, "Subscribed channels fetched successfully"))
}

async fn profiles(
    state: &AppState,
    ids: impl Iterator<Item = Uuid>,
) -> ApiResult<Vec<UserProfile>> {
    let mut profiles = Vec::new();
    for id in ids {
        if let Some(user) = state.users().find_by_id(id).await? {
            profiles.push(user.profile());
        }
    }
    Ok(profiles)
}
