//! GraphQL API over the blogql store.
//!
//! - **Queries**: `users`, `user`, `posts`, `post`, `comments`, `comment`
//! - **Mutations**: create/update/delete for users, posts and comments
//! - **Subscriptions**: `post`, `comment(postId)`

pub mod errors;
pub mod event_bus;
pub mod mutation;
pub mod query;
pub mod schema;
pub mod server;
pub mod subscription;
pub mod types;

pub use event_bus::EventBus;
pub use schema::{build_schema, BlogSchema, Services};
pub use server::{build_router, start, AppState, ServerConfig, ServerHandle};
