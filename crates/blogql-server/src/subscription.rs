use async_graphql::{Context, Result, Subscription, ID};
use futures::Stream;
use tokio_stream::StreamExt;
use tracing::debug;

use crate::errors::store_error;
use crate::schema::Services;
use crate::types::{self, CommentObject, CommentSubscriptionPayload, PostObject, PostSubscriptionPayload};

#[derive(Default)]
pub struct SubscriptionRoot;

#[Subscription]
impl SubscriptionRoot {
    /// Changes to published posts.
    async fn post(&self, ctx: &Context<'_>) -> Result<impl Stream<Item = PostSubscriptionPayload>> {
        let services = ctx.data::<Services>()?;
        debug!("post subscription opened");
        Ok(services
            .events
            .post_events()
            .map(|(mutation, post)| PostSubscriptionPayload {
                mutation: mutation.into(),
                data: PostObject(post),
            }))
    }

    /// Comment changes on one post, which must exist and be published.
    async fn comment(
        &self,
        ctx: &Context<'_>,
        post_id: ID,
    ) -> Result<impl Stream<Item = CommentSubscriptionPayload>> {
        let services = ctx.data::<Services>()?;
        let post = services
            .posts
            .get_published(&types::post_id(post_id))
            .map_err(store_error)?;
        debug!(post_id = %post.id, "comment subscription opened");
        Ok(services
            .events
            .comment_events(post.id)
            .map(|(mutation, comment)| CommentSubscriptionPayload {
                mutation: mutation.into(),
                data: CommentObject(comment),
            }))
    }
}
