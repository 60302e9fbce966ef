use std::fmt;

use blogql_core::{Comment, CommentId, Post, PostId, User, UserId};

use crate::error::StoreError;

/// A record that lives in a [`Collection`], keyed by its id.
pub trait Record {
    type Id: Eq + Clone + fmt::Display;

    /// Human-readable entity name used in error messages.
    const KIND: &'static str;

    fn id(&self) -> &Self::Id;
}

impl Record for User {
    type Id = UserId;
    const KIND: &'static str = "User";

    fn id(&self) -> &UserId {
        &self.id
    }
}

impl Record for Post {
    type Id = PostId;
    const KIND: &'static str = "Post";

    fn id(&self) -> &PostId {
        &self.id
    }
}

impl Record for Comment {
    type Id = CommentId;
    const KIND: &'static str = "Comment";

    fn id(&self) -> &CommentId {
        &self.id
    }
}

/// Insertion-ordered sequence of records with unique ids.
#[derive(Clone, Debug)]
pub struct Collection<T> {
    items: Vec<T>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Record> Collection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn find(&self, id: &T::Id) -> Option<&T> {
        self.items.iter().find(|r| r.id() == id)
    }

    pub fn contains(&self, id: &T::Id) -> bool {
        self.find(id).is_some()
    }

    pub fn any(&self, pred: impl FnMut(&T) -> bool) -> bool {
        self.items.iter().any(pred)
    }

    /// Like [`find`](Self::find), but a miss is a `NotFound` error.
    pub fn require(&self, id: &T::Id) -> Result<&T, StoreError> {
        self.find(id).ok_or(StoreError::NotFound { entity: T::KIND })
    }

    pub fn require_mut(&mut self, id: &T::Id) -> Result<&mut T, StoreError> {
        self.items
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or(StoreError::NotFound { entity: T::KIND })
    }

    /// Append a record. Rejects an id that is already present.
    pub fn insert(&mut self, record: T) -> Result<(), StoreError> {
        if self.contains(record.id()) {
            return Err(StoreError::validation(format!(
                "{} {} already exists",
                T::KIND,
                record.id()
            )));
        }
        self.items.push(record);
        Ok(())
    }

    /// Remove one record by id, keeping the order of the rest.
    pub fn remove(&mut self, id: &T::Id) -> Result<T, StoreError> {
        let index = self
            .items
            .iter()
            .position(|r| r.id() == id)
            .ok_or(StoreError::NotFound { entity: T::KIND })?;
        Ok(self.items.remove(index))
    }

    /// Remove every record matching `pred` and return them in their original order.
    pub fn remove_where(&mut self, pred: impl FnMut(&T) -> bool) -> Vec<T> {
        let (removed, kept): (Vec<T>, Vec<T>) =
            std::mem::take(&mut self.items).into_iter().partition(pred);
        self.items = kept;
        removed
    }
}

impl<'a, T> IntoIterator for &'a Collection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
