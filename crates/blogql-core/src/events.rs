use serde::{Deserialize, Serialize};

use crate::ids::PostId;
use crate::model::{Comment, Post};

/// What happened to the record carried by a [`StoreEvent`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MutationKind {
    Created,
    Updated,
    Deleted,
}

/// Change notifications fanned out to subscribers.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StoreEvent {
    #[serde(rename = "post")]
    Post { mutation: MutationKind, post: Post },

    #[serde(rename = "comment")]
    Comment {
        mutation: MutationKind,
        comment: Comment,
    },
}

impl StoreEvent {
    /// The post an event belongs to. Comment events route by their parent post.
    pub fn post_id(&self) -> &PostId {
        match self {
            Self::Post { post, .. } => &post.id,
            Self::Comment { comment, .. } => &comment.post,
        }
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Post { .. } => "post",
            Self::Comment { .. } => "comment",
        }
    }
}
