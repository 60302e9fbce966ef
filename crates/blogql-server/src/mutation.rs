//! Mutation root. Each resolver runs one store write and publishes the
//! resulting events from inside it, so subscribers see changes in the order
//! they were committed.

use async_graphql::{Context, Object, Result, ID};
use blogql_core::MutationKind;

use crate::errors::store_error;
use crate::schema::Services;
use crate::types::{
    comment_id, post_id, user_id, CommentObject, CreateCommentInput, CreatePostInput,
    CreateUserInput, PostObject, UpdateCommentInput, UpdatePostInput, UpdateUserInput, UserObject,
};

#[derive(Default)]
pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn create_user(&self, ctx: &Context<'_>, data: CreateUserInput) -> Result<UserObject> {
        let services = ctx.data::<Services>()?;
        let user = services.users.create(data.into()).map_err(store_error)?;
        Ok(UserObject(user))
    }

    async fn update_user(
        &self,
        ctx: &Context<'_>,
        id: ID,
        data: UpdateUserInput,
    ) -> Result<UserObject> {
        let services = ctx.data::<Services>()?;
        let user = services
            .users
            .update(&user_id(id), data.into())
            .map_err(store_error)?;
        Ok(UserObject(user))
    }

    /// Removes the user with their posts and every comment they wrote or
    /// that was left on their posts.
    async fn delete_user(&self, ctx: &Context<'_>, id: ID) -> Result<UserObject> {
        let services = ctx.data::<Services>()?;
        let removal = services
            .users
            .delete(&user_id(id), |r| services.events.user_removed(r))
            .map_err(store_error)?;
        Ok(UserObject(removal.user))
    }

    async fn create_post(&self, ctx: &Context<'_>, data: CreatePostInput) -> Result<PostObject> {
        let services = ctx.data::<Services>()?;
        let post = services
            .posts
            .create(data.into(), |p| services.events.post_created(p))
            .map_err(store_error)?;
        Ok(PostObject(post))
    }

    async fn update_post(
        &self,
        ctx: &Context<'_>,
        id: ID,
        data: UpdatePostInput,
    ) -> Result<PostObject> {
        let services = ctx.data::<Services>()?;
        let update = services
            .posts
            .update(&post_id(id), data.into(), |u| services.events.post_updated(u))
            .map_err(store_error)?;
        Ok(PostObject(update.post))
    }

    async fn delete_post(&self, ctx: &Context<'_>, id: ID) -> Result<PostObject> {
        let services = ctx.data::<Services>()?;
        let removal = services
            .posts
            .delete(&post_id(id), |r| services.events.post_removed(r))
            .map_err(store_error)?;
        Ok(PostObject(removal.post))
    }

    async fn create_comment(
        &self,
        ctx: &Context<'_>,
        data: CreateCommentInput,
    ) -> Result<CommentObject> {
        let services = ctx.data::<Services>()?;
        let comment = services
            .comments
            .create(data.into(), |c| {
                services.events.comment_changed(MutationKind::Created, c)
            })
            .map_err(store_error)?;
        Ok(CommentObject(comment))
    }

    async fn update_comment(
        &self,
        ctx: &Context<'_>,
        id: ID,
        data: UpdateCommentInput,
    ) -> Result<CommentObject> {
        let services = ctx.data::<Services>()?;
        let comment = services
            .comments
            .update(&comment_id(id), data.into(), |c| {
                services.events.comment_changed(MutationKind::Updated, c)
            })
            .map_err(store_error)?;
        Ok(CommentObject(comment))
    }

    async fn delete_comment(&self, ctx: &Context<'_>, id: ID) -> Result<CommentObject> {
        let services = ctx.data::<Services>()?;
        let comment = services
            .comments
            .delete(&comment_id(id), |c| {
                services.events.comment_changed(MutationKind::Deleted, c)
            })
            .map_err(store_error)?;
        Ok(CommentObject(comment))
    }
}
