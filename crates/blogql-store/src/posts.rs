use blogql_core::{Comment, NewPost, Post, PostId, PostPatch, UserId};
use tracing::{info, instrument};

use crate::error::StoreError;
use crate::store::{SharedStore, Store};

/// A post removed by [`delete_post`] together with its comments.
#[derive(Clone, Debug)]
pub struct PostRemoval {
    pub post: Post,
    pub comments: Vec<Comment>,
}

/// Result of [`update_post`]; keeps the prior visibility so callers can tell
/// a publish or unpublish apart from an ordinary edit.
#[derive(Clone, Debug)]
pub struct PostUpdate {
    pub post: Post,
    pub was_published: bool,
}

pub fn create_post(store: &mut Store, input: NewPost) -> Result<Post, StoreError> {
    store.users.require(&input.author)?;

    let post = Post::from_new(input);
    store.posts.insert(post.clone())?;
    Ok(post)
}

pub fn update_post(store: &mut Store, id: &PostId, patch: PostPatch) -> Result<PostUpdate, StoreError> {
    let post = store.posts.require_mut(id)?;
    let was_published = post.published;
    post.apply(patch);
    Ok(PostUpdate {
        post: post.clone(),
        was_published,
    })
}

/// Remove a post and every comment that references it.
pub fn delete_post(store: &mut Store, id: &PostId) -> Result<PostRemoval, StoreError> {
    let post = store.posts.remove(id)?;
    let comments = store.comments.remove_where(|c| &c.post == id);
    Ok(PostRemoval { post, comments })
}

pub struct PostRepo {
    store: SharedStore,
}

impl PostRepo {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// All posts, optionally narrowed to those whose title or body contains `query`.
    pub fn list(&self, query: Option<&str>) -> Vec<Post> {
        self.store.read(|s| {
            s.posts
                .iter()
                .filter(|p| query.map_or(true, |q| p.text_matches(q)))
                .cloned()
                .collect()
        })
    }

    pub fn by_author(&self, author: &UserId) -> Vec<Post> {
        self.store.read(|s| {
            s.posts
                .iter()
                .filter(|p| &p.author == author)
                .cloned()
                .collect()
        })
    }

    pub fn find(&self, id: &PostId) -> Option<Post> {
        self.store.read(|s| s.posts.find(id).cloned())
    }

    #[instrument(skip(self), fields(post_id = %id))]
    pub fn get(&self, id: &PostId) -> Result<Post, StoreError> {
        self.store.read(|s| s.posts.require(id).cloned())
    }

    /// A post that exists and is published; anything else is `NotFound`.
    pub fn get_published(&self, id: &PostId) -> Result<Post, StoreError> {
        self.store.read(|s| {
            s.posts
                .find(id)
                .filter(|p| p.published)
                .cloned()
                .ok_or(StoreError::NotFound { entity: "Post" })
        })
    }

    /// Insert a post. `on_commit` runs under the write lock once the insert
    /// has succeeded, so observers see commits in lock order.
    #[instrument(skip(self, input, on_commit), fields(author = %input.author))]
    pub fn create<F>(&self, input: NewPost, on_commit: F) -> Result<Post, StoreError>
    where
        F: FnOnce(&Post),
    {
        let post = self.store.write(|s| {
            let post = create_post(s, input)?;
            on_commit(&post);
            Ok::<_, StoreError>(post)
        })?;
        info!(post_id = %post.id, published = post.published, "post created");
        Ok(post)
    }

    #[instrument(skip(self, patch, on_commit), fields(post_id = %id))]
    pub fn update<F>(
        &self,
        id: &PostId,
        patch: PostPatch,
        on_commit: F,
    ) -> Result<PostUpdate, StoreError>
    where
        F: FnOnce(&PostUpdate),
    {
        self.store.write(|s| {
            let update = update_post(s, id, patch)?;
            on_commit(&update);
            Ok(update)
        })
    }

    #[instrument(skip(self, on_commit), fields(post_id = %id))]
    pub fn delete<F>(&self, id: &PostId, on_commit: F) -> Result<PostRemoval, StoreError>
    where
        F: FnOnce(&PostRemoval),
    {
        let removal = self.store.write(|s| {
            let removal = delete_post(s, id)?;
            on_commit(&removal);
            Ok::<_, StoreError>(removal)
        })?;
        info!(comments = removal.comments.len(), "post deleted");
        Ok(removal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comments::create_comment;
    use crate::users::create_user;
    use blogql_core::{NewComment, NewUser, User};

    fn store_with_user() -> (Store, User) {
        let mut store = Store::new();
        let user = create_user(
            &mut store,
            NewUser {
                name: "Ada".into(),
                email: "ada@x.com".into(),
                age: None,
            },
        )
        .unwrap();
        (store, user)
    }

    fn new_post(author: &UserId, title: &str, published: bool) -> NewPost {
        NewPost {
            title: title.into(),
            body: format!("{title} body"),
            published,
            author: author.clone(),
        }
    }

    #[test]
    fn create_requires_existing_author() {
        let mut store = Store::new();
        let err = create_post(&mut store, new_post(&UserId::new(), "t", true)).unwrap_err();
        assert_eq!(err.to_string(), "User not found");
        assert!(store.posts.is_empty());
    }

    #[test]
    fn create_assigns_id() {
        let (mut store, user) = store_with_user();
        let post = create_post(&mut store, new_post(&user.id, "Hello", false)).unwrap();
        assert!(post.id.as_str().starts_with("post_"));
        assert_eq!(post.author, user.id);
        assert_eq!(store.posts.len(), 1);
    }

    #[test]
    fn update_missing_post_is_not_found() {
        let mut store = Store::new();
        let err = update_post(&mut store, &PostId::new(), PostPatch::default()).unwrap_err();
        assert_eq!(err, StoreError::NotFound { entity: "Post" });
    }

    #[test]
    fn update_reports_prior_visibility() {
        let (mut store, user) = store_with_user();
        let post = create_post(&mut store, new_post(&user.id, "Draft", false)).unwrap();

        let patch = PostPatch {
            published: Some(true),
            ..Default::default()
        };
        let update = update_post(&mut store, &post.id, patch).unwrap();
        assert!(!update.was_published);
        assert!(update.post.published);
        assert_eq!(update.post.title, "Draft");
        assert_eq!(update.post.body, "Draft body");
    }

    #[test]
    fn delete_removes_only_its_comments() {
        let (mut store, user) = store_with_user();
        let keep = create_post(&mut store, new_post(&user.id, "Keep", true)).unwrap();
        let gone = create_post(&mut store, new_post(&user.id, "Gone", true)).unwrap();
        for post in [&keep, &gone, &gone] {
            create_comment(
                &mut store,
                NewComment {
                    text: "c".into(),
                    author: user.id.clone(),
                    post: post.id.clone(),
                },
            )
            .unwrap();
        }

        let removal = delete_post(&mut store, &gone.id).unwrap();
        assert_eq!(removal.post.id, gone.id);
        assert_eq!(removal.comments.len(), 2);
        assert_eq!(store.posts.len(), 1);
        assert_eq!(store.comments.len(), 1);
        assert!(store.comments.iter().all(|c| c.post == keep.id));
    }

    #[test]
    fn delete_missing_post_is_not_found() {
        let mut store = Store::new();
        assert!(delete_post(&mut store, &PostId::new()).is_err());
    }

    #[test]
    fn repo_list_searches_title_and_body() {
        let shared = SharedStore::default();
        let users = crate::users::UserRepo::new(shared.clone());
        let author = users
            .create(NewUser {
                name: "Ada".into(),
                email: "ada@x.com".into(),
                age: None,
            })
            .unwrap();

        let posts = PostRepo::new(shared);
        posts.create(new_post(&author.id, "Engines", true), |_| {}).unwrap();
        let notes = NewPost {
            title: "Notes".into(),
            body: "about engines".into(),
            published: false,
            author: author.id.clone(),
        };
        posts.create(notes, |_| {}).unwrap();
        posts.create(new_post(&author.id, "Looms", true), |_| {}).unwrap();

        assert_eq!(posts.list(None).len(), 3);
        assert_eq!(posts.list(Some("ENGINE")).len(), 2);
        assert_eq!(posts.by_author(&author.id).len(), 3);
        assert!(posts.by_author(&UserId::new()).is_empty());
    }

    #[test]
    fn get_published_hides_drafts() {
        let shared = SharedStore::default();
        let (store, user) = store_with_user();
        shared.write(|s| *s = store);

        let posts = PostRepo::new(shared);
        let draft = posts.create(new_post(&user.id, "Draft", false), |_| {}).unwrap();
        let live = posts.create(new_post(&user.id, "Live", true), |_| {}).unwrap();

        assert!(posts.get(&draft.id).is_ok());
        assert!(posts.get_published(&draft.id).is_err());
        assert_eq!(posts.get_published(&live.id).unwrap().id, live.id);
        assert!(posts.get_published(&PostId::new()).is_err());
    }

    #[test]
    fn repo_commit_hook_runs_only_on_success() {
        let (store, user) = store_with_user();
        let posts = PostRepo::new(SharedStore::new(store));

        let mut seen = Vec::new();
        let post = posts
            .create(new_post(&user.id, "Hooked", true), |p| seen.push(p.id.clone()))
            .unwrap();
        assert_eq!(seen, [post.id.clone()]);

        let mut called = false;
        let missing = posts.delete(&PostId::new(), |_| called = true);
        assert!(missing.is_err());
        assert!(!called);

        let mut was_published = None;
        let patch = PostPatch {
            published: Some(false),
            ..Default::default()
        };
        posts
            .update(&post.id, patch, |u| was_published = Some(u.was_published))
            .unwrap();
        assert_eq!(was_published, Some(true));
    }
}
