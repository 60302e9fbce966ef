//! Demo data loaded into a fresh store at startup.

use blogql_core::{NewComment, NewPost, NewUser};

use crate::comments::create_comment;
use crate::error::StoreError;
use crate::posts::create_post;
use crate::store::Store;
use crate::users::create_user;

/// Populate `store` with three users, three posts (one unpublished) and four
/// comments. Goes through the regular handlers so the data obeys every
/// store invariant.
pub fn seed(store: &mut Store) -> Result<(), StoreError> {
    let ada = create_user(
        store,
        NewUser {
            name: "Ada Lovelace".into(),
            email: "ada@example.com".into(),
            age: Some(36),
        },
    )?;
    let alan = create_user(
        store,
        NewUser {
            name: "Alan Turing".into(),
            email: "alan@example.com".into(),
            age: Some(41),
        },
    )?;
    let grace = create_user(
        store,
        NewUser {
            name: "Grace Hopper".into(),
            email: "grace@example.com".into(),
            age: None,
        },
    )?;

    let engine = create_post(
        store,
        NewPost {
            title: "Notes on the Analytical Engine".into(),
            body: "The engine weaves algebraic patterns just as the loom weaves flowers.".into(),
            published: true,
            author: ada.id.clone(),
        },
    )?;
    let computable = create_post(
        store,
        NewPost {
            title: "On Computable Numbers".into(),
            body: "A number is computable if its decimal can be written down by a machine.".into(),
            published: true,
            author: alan.id.clone(),
        },
    )?;
    create_post(
        store,
        NewPost {
            title: "Compiler draft".into(),
            body: "Unfinished notes on translating English into machine code.".into(),
            published: false,
            author: grace.id.clone(),
        },
    )?;

    let comments = [
        ("Poetical science indeed.", &alan, &engine),
        ("Could it compose music?", &grace, &engine),
        ("The halting argument is elegant.", &ada, &computable),
        ("Looking forward to running this.", &grace, &computable),
    ];
    for (text, author, post) in comments {
        create_comment(
            store,
            NewComment {
                text: text.into(),
                author: author.id.clone(),
                post: post.id.clone(),
            },
        )?;
    }

    Ok(())
}
