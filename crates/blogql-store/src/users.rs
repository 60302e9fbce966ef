use std::collections::HashSet;

use blogql_core::{Comment, NewUser, Post, PostId, User, UserId, UserPatch};
use tracing::{debug, info, instrument};

use crate::error::StoreError;
use crate::store::{SharedStore, Store};

/// Everything removed by [`delete_user`].
#[derive(Clone, Debug)]
pub struct UserRemoval {
    pub user: User,
    pub posts: Vec<Post>,
    pub comments: Vec<Comment>,
}

/// Insert a new user. Emails are unique across users.
pub fn create_user(store: &mut Store, input: NewUser) -> Result<User, StoreError> {
    if store.users.any(|u| u.email == input.email) {
        return Err(StoreError::validation("Email taken"));
    }

    let user = User::from_new(input);
    store.users.insert(user.clone())?;
    Ok(user)
}

/// Apply a patch to an existing user.
///
/// Moving to an email held by another user is rejected; keeping one's own
/// email is not.
pub fn update_user(store: &mut Store, id: &UserId, patch: UserPatch) -> Result<User, StoreError> {
    store.users.require(id)?;

    if let Some(email) = &patch.email {
        if store.users.any(|u| &u.email == email && &u.id != id) {
            return Err(StoreError::validation("Email taken"));
        }
    }

    let user = store.users.require_mut(id)?;
    user.apply(patch);
    Ok(user.clone())
}

/// Remove a user along with their posts, the comments on those posts, and
/// any other comments they wrote.
pub fn delete_user(store: &mut Store, id: &UserId) -> Result<UserRemoval, StoreError> {
    let user = store.users.remove(id)?;

    let posts = store.posts.remove_where(|p| &p.author == id);
    let orphaned: HashSet<&PostId> = posts.iter().map(|p| &p.id).collect();
    let comments = store
        .comments
        .remove_where(|c| &c.author == id || orphaned.contains(&c.post));

    debug!(
        user_id = %id,
        posts = posts.len(),
        comments = comments.len(),
        "user cascade removed dependents"
    );

    Ok(UserRemoval {
        user,
        posts,
        comments,
    })
}

pub struct UserRepo {
    store: SharedStore,
}

impl UserRepo {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// All users, optionally narrowed to names containing `query`.
    pub fn list(&self, query: Option<&str>) -> Vec<User> {
        self.store.read(|s| {
            s.users
                .iter()
                .filter(|u| query.map_or(true, |q| u.name_matches(q)))
                .cloned()
                .collect()
        })
    }

    pub fn find(&self, id: &UserId) -> Option<User> {
        self.store.read(|s| s.users.find(id).cloned())
    }

    #[instrument(skip(self), fields(user_id = %id))]
    pub fn get(&self, id: &UserId) -> Result<User, StoreError> {
        self.store.read(|s| s.users.require(id).cloned())
    }

    #[instrument(skip(self, input))]
    pub fn create(&self, input: NewUser) -> Result<User, StoreError> {
        let user = self.store.write(|s| create_user(s, input))?;
        info!(user_id = %user.id, "user created");
        Ok(user)
    }

    #[instrument(skip(self, patch), fields(user_id = %id))]
    pub fn update(&self, id: &UserId, patch: UserPatch) -> Result<User, StoreError> {
        self.store.write(|s| update_user(s, id, patch))
    }

    /// Delete with cascade. `on_commit` sees everything removed and runs
    /// before the write lock is released.
    #[instrument(skip(self, on_commit), fields(user_id = %id))]
    pub fn delete<F>(&self, id: &UserId, on_commit: F) -> Result<UserRemoval, StoreError>
    where
        F: FnOnce(&UserRemoval),
    {
        let removal = self.store.write(|s| {
            let removal = delete_user(s, id)?;
            on_commit(&removal);
            Ok::<_, StoreError>(removal)
        })?;
        info!(
            posts = removal.posts.len(),
            comments = removal.comments.len(),
            "user deleted"
        );
        Ok(removal)
    }
}
