//! Shared vocabulary for blogql: branded ids, the three record types and
//! their patches, and the events emitted when records change.

pub mod events;
pub mod ids;
pub mod model;

pub use events::{MutationKind, StoreEvent};
pub use ids::{CommentId, PostId, UserId};
pub use model::{
    Comment, CommentPatch, NewComment, NewPost, NewUser, Post, PostPatch, User, UserPatch,
};
