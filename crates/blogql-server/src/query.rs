use async_graphql::{Context, Object, Result, ID};

use crate::schema::Services;
use crate::types::{comment_id, post_id, user_id, CommentObject, PostObject, UserObject};

#[derive(Default)]
pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Users whose name contains `query`, case-insensitively; all users without it.
    async fn users(&self, ctx: &Context<'_>, query: Option<String>) -> Result<Vec<UserObject>> {
        let services = ctx.data::<Services>()?;
        Ok(services
            .users
            .list(query.as_deref())
            .into_iter()
            .map(UserObject)
            .collect())
    }

    async fn user(&self, ctx: &Context<'_>, id: ID) -> Result<Option<UserObject>> {
        let services = ctx.data::<Services>()?;
        Ok(services.users.find(&user_id(id)).map(UserObject))
    }

    /// Posts whose title or body contains `query`, case-insensitively.
    async fn posts(&self, ctx: &Context<'_>, query: Option<String>) -> Result<Vec<PostObject>> {
        let services = ctx.data::<Services>()?;
        Ok(services
            .posts
            .list(query.as_deref())
            .into_iter()
            .map(PostObject)
            .collect())
    }

    async fn post(&self, ctx: &Context<'_>, id: ID) -> Result<Option<PostObject>> {
        let services = ctx.data::<Services>()?;
        Ok(services.posts.find(&post_id(id)).map(PostObject))
    }

    async fn comments(&self, ctx: &Context<'_>) -> Result<Vec<CommentObject>> {
        let services = ctx.data::<Services>()?;
        Ok(services
            .comments
            .list()
            .into_iter()
            .map(CommentObject)
            .collect())
    }

    async fn comment(&self, ctx: &Context<'_>, id: ID) -> Result<Option<CommentObject>> {
        let services = ctx.data::<Services>()?;
        Ok(services.comments.find(&comment_id(id)).map(CommentObject))
    }
}
