use serde::{Deserialize, Serialize};

use crate::ids::{CommentId, PostId, UserId};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub age: Option<i32>,
}

impl User {
    pub fn from_new(input: NewUser) -> Self {
        Self {
            id: UserId::new(),
            name: input.name,
            email: input.email,
            age: input.age,
        }
    }

    /// Case-insensitive substring match on the name.
    pub fn name_matches(&self, query: &str) -> bool {
        contains_ignore_case(&self.name, query)
    }

    /// Apply the fields present in `patch`. Email uniqueness is the caller's job.
    pub fn apply(&mut self, patch: UserPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(age) = patch.age {
            self.age = age;
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub body: String,
    pub published: bool,
    pub author: UserId,
}

impl Post {
    pub fn from_new(input: NewPost) -> Self {
        Self {
            id: PostId::new(),
            title: input.title,
            body: input.body,
            published: input.published,
            author: input.author,
        }
    }

    /// Case-insensitive substring match on title or body.
    pub fn text_matches(&self, query: &str) -> bool {
        contains_ignore_case(&self.title, query) || contains_ignore_case(&self.body, query)
    }

    pub fn apply(&mut self, patch: PostPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(body) = patch.body {
            self.body = body;
        }
        if let Some(published) = patch.published {
            self.published = published;
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub text: String,
    pub author: UserId,
    pub post: PostId,
}

impl Comment {
    pub fn from_new(input: NewComment) -> Self {
        Self {
            id: CommentId::new(),
            text: input.text,
            author: input.author,
            post: input.post,
        }
    }

    pub fn apply(&mut self, patch: CommentPatch) {
        if let Some(text) = patch.text {
            self.text = text;
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub age: Option<i32>,
}

/// Partial update for a user.
///
/// `age` is doubly optional: `None` leaves the age alone, `Some(None)` clears it.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<Option<i32>>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewPost {
    pub title: String,
    pub body: String,
    pub published: bool,
    pub author: UserId,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PostPatch {
    pub title: Option<String>,
    pub body: Option<String>,
    pub published: Option<bool>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewComment {
    pub text: String,
    pub author: UserId,
    pub post: PostId,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CommentPatch {
    pub text: Option<String>,
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User::from_new(NewUser {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            age: Some(36),
        })
    }

    #[test]
    fn from_new_assigns_fresh_id() {
        let a = user();
        let b = user();
        assert_ne!(a.id, b.id);
        assert_eq!(a.name, "Ada");
    }

    #[test]
    fn empty_user_patch_changes_nothing() {
        let mut u = user();
        let before = u.clone();
        u.apply(UserPatch::default());
        assert_eq!(u, before);
    }

    #[test]
    fn user_patch_applies_only_present_fields() {
        let mut u = user();
        u.apply(UserPatch {
            name: Some("Grace".into()),
            ..Default::default()
        });
        assert_eq!(u.name, "Grace");
        assert_eq!(u.email, "ada@example.com");
        assert_eq!(u.age, Some(36));
    }

    #[test]
    fn user_patch_can_clear_age() {
        let mut u = user();
        u.apply(UserPatch {
            age: Some(None),
            ..Default::default()
        });
        assert_eq!(u.age, None);
    }

    #[test]
    fn post_patch_toggles_published() {
        let mut p = Post::from_new(NewPost {
            title: "Draft".into(),
            body: "...".into(),
            published: false,
            author: UserId::new(),
        });
        p.apply(PostPatch {
            published: Some(true),
            ..Default::default()
        });
        assert!(p.published);
        assert_eq!(p.title, "Draft");
    }

    #[test]
    fn comment_patch_without_text_is_noop() {
        let mut c = Comment::from_new(NewComment {
            text: "nice".into(),
            author: UserId::new(),
            post: PostId::new(),
        });
        c.apply(CommentPatch::default());
        assert_eq!(c.text, "nice");
    }

    #[test]
    fn matching_ignores_case() {
        assert!(user().name_matches("aDa"));
        assert!(!user().name_matches("bob"));

        let p = Post::from_new(NewPost {
            title: "Rust Ownership".into(),
            body: "Borrowing explained".into(),
            published: true,
            author: UserId::new(),
        });
        assert!(p.text_matches("ownership"));
        assert!(p.text_matches("BORROW"));
        assert!(!p.text_matches("lifetimes"));
    }
}
