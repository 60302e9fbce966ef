use std::sync::Arc;

use blogql_core::{Comment, Post, User};
use parking_lot::RwLock;
use tracing::info;

use crate::collection::Collection;
use crate::error::StoreError;
use crate::seed;

/// The three collections that make up the in-memory database.
#[derive(Clone, Debug, Default)]
pub struct Store {
    pub users: Collection<User>,
    pub posts: Collection<Post>,
    pub comments: Collection<Comment>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counts(&self) -> StoreCounts {
        StoreCounts {
            users: self.users.len(),
            posts: self.posts.len(),
            comments: self.comments.len(),
        }
    }
}

/// Record counts per collection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StoreCounts {
    pub users: usize,
    pub posts: usize,
    pub comments: usize,
}

/// Thread-safe handle to a [`Store`].
///
/// Reads share the lock; every mutation holds the write lock for its whole
/// check-then-write sequence, so a failed mutation leaves nothing behind.
#[derive(Clone, Default)]
pub struct SharedStore {
    inner: Arc<RwLock<Store>>,
}

impl SharedStore {
    pub fn new(store: Store) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    /// A store populated with the demo data set.
    pub fn seeded() -> Result<Self, StoreError> {
        let mut store = Store::new();
        seed::seed(&mut store)?;
        let counts = store.counts();
        info!(
            users = counts.users,
            posts = counts.posts,
            comments = counts.comments,
            "store seeded"
        );
        Ok(Self::new(store))
    }

    /// Run a closure with shared access to the store.
    pub fn read<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&Store) -> T,
    {
        let store = self.inner.read();
        f(&store)
    }

    /// Run a closure with exclusive access to the store.
    pub fn write<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&mut Store) -> T,
    {
        let mut store = self.inner.write();
        f(&mut store)
    }

    pub fn counts(&self) -> StoreCounts {
        self.read(Store::counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_store_has_no_records() {
        let store = SharedStore::default();
        assert_eq!(store.counts(), StoreCounts::default());
    }

    #[test]
    fn seeded_store_has_demo_data() {
        let store = SharedStore::seeded().unwrap();
        let counts = store.counts();
        assert_eq!(counts.users, 3);
        assert_eq!(counts.posts, 3);
        assert_eq!(counts.comments, 4);
    }

    #[test]
    fn clones_share_state() {
        let a = SharedStore::seeded().unwrap();
        let b = a.clone();
        b.write(|s| {
            s.comments.remove_where(|_| true);
        });
        assert_eq!(a.counts().comments, 0);
    }
}
