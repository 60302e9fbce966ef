//! GraphQL object, input and payload types.
//!
//! Output objects wrap the plain records from `blogql-core`; relation fields
//! resolve through the repos in [`Services`].

use async_graphql::{Context, Enum, InputObject, MaybeUndefined, Object, Result, SimpleObject, ID};
use blogql_core::{
    Comment, CommentId, CommentPatch, MutationKind, NewComment, NewPost, NewUser, Post, PostId,
    PostPatch, User, UserId, UserPatch,
};

use crate::errors::store_error;
use crate::schema::Services;

pub(crate) fn user_id(id: ID) -> UserId {
    UserId::from_raw(id.0)
}

pub(crate) fn post_id(id: ID) -> PostId {
    PostId::from_raw(id.0)
}

pub(crate) fn comment_id(id: ID) -> CommentId {
    CommentId::from_raw(id.0)
}

// ── Output objects ──────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct UserObject(pub User);

#[Object(name = "User")]
impl UserObject {
    async fn id(&self) -> ID {
        ID(self.0.id.to_string())
    }

    async fn name(&self) -> &str {
        &self.0.name
    }

    async fn email(&self) -> &str {
        &self.0.email
    }

    async fn age(&self) -> Option<i32> {
        self.0.age
    }

    async fn posts(&self, ctx: &Context<'_>) -> Result<Vec<PostObject>> {
        let services = ctx.data::<Services>()?;
        Ok(services
            .posts
            .by_author(&self.0.id)
            .into_iter()
            .map(PostObject)
            .collect())
    }

    async fn comments(&self, ctx: &Context<'_>) -> Result<Vec<CommentObject>> {
        let services = ctx.data::<Services>()?;
        Ok(services
            .comments
            .by_author(&self.0.id)
            .into_iter()
            .map(CommentObject)
            .collect())
    }
}

#[derive(Clone, Debug)]
pub struct PostObject(pub Post);

#[Object(name = "Post")]
impl PostObject {
    async fn id(&self) -> ID {
        ID(self.0.id.to_string())
    }

    async fn title(&self) -> &str {
        &self.0.title
    }

    async fn body(&self) -> &str {
        &self.0.body
    }

    async fn published(&self) -> bool {
        self.0.published
    }

    async fn author(&self, ctx: &Context<'_>) -> Result<UserObject> {
        let services = ctx.data::<Services>()?;
        let user = services.users.get(&self.0.author).map_err(store_error)?;
        Ok(UserObject(user))
    }

    async fn comments(&self, ctx: &Context<'_>) -> Result<Vec<CommentObject>> {
        let services = ctx.data::<Services>()?;
        Ok(services
            .comments
            .by_post(&self.0.id)
            .into_iter()
            .map(CommentObject)
            .collect())
    }
}

#[derive(Clone, Debug)]
pub struct CommentObject(pub Comment);

#[Object(name = "Comment")]
impl CommentObject {
    async fn id(&self) -> ID {
        ID(self.0.id.to_string())
    }

    async fn text(&self) -> &str {
        &self.0.text
    }

    async fn author(&self, ctx: &Context<'_>) -> Result<UserObject> {
        let services = ctx.data::<Services>()?;
        let user = services.users.get(&self.0.author).map_err(store_error)?;
        Ok(UserObject(user))
    }

    async fn post(&self, ctx: &Context<'_>) -> Result<PostObject> {
        let services = ctx.data::<Services>()?;
        let post = services.posts.get(&self.0.post).map_err(store_error)?;
        Ok(PostObject(post))
    }
}

// ── Inputs ──────────────────────────────────────────────────────────────────

#[derive(InputObject)]
pub struct CreateUserInput {
    pub name: String,
    pub email: String,
    pub age: Option<i32>,
}

impl From<CreateUserInput> for NewUser {
    fn from(input: CreateUserInput) -> Self {
        Self {
            name: input.name,
            email: input.email,
            age: input.age,
        }
    }
}

/// Omitted fields are left alone; `age: null` clears the age.
#[derive(InputObject)]
pub struct UpdateUserInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: MaybeUndefined<i32>,
}

impl From<UpdateUserInput> for UserPatch {
    fn from(input: UpdateUserInput) -> Self {
        let age = match input.age {
            MaybeUndefined::Undefined => None,
            MaybeUndefined::Null => Some(None),
            MaybeUndefined::Value(age) => Some(Some(age)),
        };
        Self {
            name: input.name,
            email: input.email,
            age,
        }
    }
}

#[derive(InputObject)]
pub struct CreatePostInput {
    pub title: String,
    pub body: String,
    pub published: bool,
    pub author: ID,
}

impl From<CreatePostInput> for NewPost {
    fn from(input: CreatePostInput) -> Self {
        Self {
            title: input.title,
            body: input.body,
            published: input.published,
            author: user_id(input.author),
        }
    }
}

#[derive(InputObject)]
pub struct UpdatePostInput {
    pub title: Option<String>,
    pub body: Option<String>,
    pub published: Option<bool>,
}

impl From<UpdatePostInput> for PostPatch {
    fn from(input: UpdatePostInput) -> Self {
        Self {
            title: input.title,
            body: input.body,
            published: input.published,
        }
    }
}

#[derive(InputObject)]
pub struct CreateCommentInput {
    pub text: String,
    pub author: ID,
    pub post: ID,
}

impl From<CreateCommentInput> for NewComment {
    fn from(input: CreateCommentInput) -> Self {
        Self {
            text: input.text,
            author: user_id(input.author),
            post: post_id(input.post),
        }
    }
}

#[derive(InputObject)]
pub struct UpdateCommentInput {
    pub text: Option<String>,
}

impl From<UpdateCommentInput> for CommentPatch {
    fn from(input: UpdateCommentInput) -> Self {
        Self { text: input.text }
    }
}

// ── Subscription payloads ───────────────────────────────────────────────────

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
pub enum MutationType {
    Created,
    Updated,
    Deleted,
}

impl From<MutationKind> for MutationType {
    fn from(kind: MutationKind) -> Self {
        match kind {
            MutationKind::Created => Self::Created,
            MutationKind::Updated => Self::Updated,
            MutationKind::Deleted => Self::Deleted,
        }
    }
}

/// Event on the `post` channel.
///
/// A `DELETED` payload carries the post as it was when removed. Its scalar
/// fields always resolve. Relation fields are looked up live, so `author` and
/// `comments` fail or come back empty once a cascade has removed the records
/// they point at.
#[derive(SimpleObject)]
pub struct PostSubscriptionPayload {
    pub mutation: MutationType,
    pub data: PostObject,
}

/// Event on the `comment` channel. Relation fields of a `DELETED` payload
/// behave as on [`PostSubscriptionPayload`].
#[derive(SimpleObject)]
pub struct CommentSubscriptionPayload {
    pub mutation: MutationType,
    pub data: CommentObject,
}
