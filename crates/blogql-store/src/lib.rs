pub mod collection;
pub mod comments;
pub mod error;
pub mod posts;
pub mod seed;
pub mod store;
pub mod users;

pub use collection::{Collection, Record};
pub use comments::CommentRepo;
pub use error::StoreError;
pub use posts::{PostRemoval, PostRepo, PostUpdate};
pub use store::{SharedStore, Store, StoreCounts};
pub use users::{UserRemoval, UserRepo};
