use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Vote cast on a palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackKind {
    /// Counts toward `likes`.
    Like,
    /// Counts toward `dislikes`.
    Dislike,
}

impl FeedbackKind {
    /// Whether this is a like.
    pub fn is_like(self) -> bool {
        matches!(self, Self::Like)
    }
}

/// Body of `POST /feedback`.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct FeedbackRequest {
    /// Id returned by a generating endpoint.
    #[validate(range(min = 1))]
    pub palette_id: u64,
    /// `like` or `dislike`.
    pub feedback: FeedbackKind,
}

/// Generic acknowledgement.
#[derive(Debug, Serialize, ToSchema)]
pub struct ActionResponse {
    /// Human readable confirmation.
    pub message: String,
}

impl ActionResponse {
    /// Acknowledge with `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
