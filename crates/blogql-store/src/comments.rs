use blogql_core::{Comment, CommentId, CommentPatch, NewComment, PostId, UserId};
use tracing::{info, instrument};

use crate::error::StoreError;
use crate::store::{SharedStore, Store};

/// Insert a comment. The author must exist and the post must exist and be
/// published, checked in that order.
pub fn create_comment(store: &mut Store, input: NewComment) -> Result<Comment, StoreError> {
    store.users.require(&input.author)?;
    let post = store.posts.require(&input.post)?;
    if !post.published {
        return Err(StoreError::validation("Post not published"));
    }

    let comment = Comment::from_new(input);
    store.comments.insert(comment.clone())?;
    Ok(comment)
}

pub fn update_comment(
    store: &mut Store,
    id: &CommentId,
    patch: CommentPatch,
) -> Result<Comment, StoreError> {
    let comment = store.comments.require_mut(id)?;
    comment.apply(patch);
    Ok(comment.clone())
}

pub fn delete_comment(store: &mut Store, id: &CommentId) -> Result<Comment, StoreError> {
    store.comments.remove(id)
}

pub struct CommentRepo {
    store: SharedStore,
}

impl CommentRepo {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Vec<Comment> {
        self.store.read(|s| s.comments.iter().cloned().collect())
    }

    pub fn by_author(&self, author: &UserId) -> Vec<Comment> {
        self.store.read(|s| {
            s.comments
                .iter()
                .filter(|c| &c.author == author)
                .cloned()
                .collect()
        })
    }

    pub fn by_post(&self, post: &PostId) -> Vec<Comment> {
        self.store.read(|s| {
            s.comments
                .iter()
                .filter(|c| &c.post == post)
                .cloned()
                .collect()
        })
    }

    pub fn find(&self, id: &CommentId) -> Option<Comment> {
        self.store.read(|s| s.comments.find(id).cloned())
    }

    // Each mutation hands the committed comment to `on_commit` before the
    // write lock is released.

    #[instrument(skip(self, input, on_commit), fields(post_id = %input.post, author = %input.author))]
    pub fn create<F>(&self, input: NewComment, on_commit: F) -> Result<Comment, StoreError>
    where
        F: FnOnce(&Comment),
    {
        let comment = self.store.write(|s| committed(create_comment(s, input), on_commit))?;
        info!(comment_id = %comment.id, "comment created");
        Ok(comment)
    }

    #[instrument(skip(self, patch, on_commit), fields(comment_id = %id))]
    pub fn update<F>(
        &self,
        id: &CommentId,
        patch: CommentPatch,
        on_commit: F,
    ) -> Result<Comment, StoreError>
    where
        F: FnOnce(&Comment),
    {
        self.store.write(|s| committed(update_comment(s, id, patch), on_commit))
    }

    #[instrument(skip(self, on_commit), fields(comment_id = %id))]
    pub fn delete<F>(&self, id: &CommentId, on_commit: F) -> Result<Comment, StoreError>
    where
        F: FnOnce(&Comment),
    {
        let comment = self
            .store
            .write(|s| committed(delete_comment(s, id), on_commit))?;
        info!("comment deleted");
        Ok(comment)
    }
}

fn committed<F>(result: Result<Comment, StoreError>, on_commit: F) -> Result<Comment, StoreError>
where
    F: FnOnce(&Comment),
{
    let comment = result?;
    on_commit(&comment);
    Ok(comment)
}
