//! API models for request and response payloads

pub mod comment;
pub mod engagement;
pub mod tweet;
pub mod video;

pub use comment::{Comment, ContentRequest, NewComment};
pub use engagement::{ChannelProfile, ChannelStats, Like, LikeTarget, Subscription};
pub use tweet::Tweet;
pub use video::{NewVideo, PublishVideoRequest, UpdateVideoRequest, Video, VideoQuery, VideoUpdate};
