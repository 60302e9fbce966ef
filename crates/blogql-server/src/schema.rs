use async_graphql::Schema;
use blogql_store::{CommentRepo, PostRepo, SharedStore, UserRepo};

use crate::event_bus::EventBus;
use crate::mutation::MutationRoot;
use crate::query::QueryRoot;
use crate::subscription::SubscriptionRoot;

pub type BlogSchema = Schema<QueryRoot, MutationRoot, SubscriptionRoot>;

/// Everything a resolver needs, handed to the schema as context data.
pub struct Services {
    pub users: UserRepo,
    pub posts: PostRepo,
    pub comments: CommentRepo,
    pub events: EventBus,
}

impl Services {
    pub fn new(store: SharedStore, events: EventBus) -> Self {
        Self {
            users: UserRepo::new(store.clone()),
            posts: PostRepo::new(store.clone()),
            comments: CommentRepo::new(store),
            events,
        }
    }
}

pub fn build_schema(store: SharedStore, events: EventBus) -> BlogSchema {
    Schema::build(QueryRoot, MutationRoot, SubscriptionRoot)
        .data(Services::new(store, events))
        .finish()
}

/// The schema in SDL form.
pub fn schema_sdl() -> String {
    build_schema(SharedStore::default(), EventBus::new(1)).sdl()
}
