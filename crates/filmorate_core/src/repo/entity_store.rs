//! Generic keyed persistence contract for films and users.
//!
//! # Invariants
//! - `create` assigns a fresh identity (starting at 1) that no other call
//!   ever returns, including concurrent calls.
//! - `update` replaces the stored value wholesale and fails with `NotFound`
//!   when the identity does not resolve.
//! - `find_by_id` reports absence as `Ok(None)`, never as an error.

use crate::model::entity::{Entity, EntityId};
use crate::repo::error::RepoResult;
use std::sync::Arc;

/// Storage contract implemented by the in-process and SQLite backends.
pub trait EntityStore<T: Entity> {
    /// Persists a new entity and returns it with identity populated.
    fn create(&self, entity: T) -> RepoResult<T>;
    /// Replaces an existing entity; identity must already be set.
    fn update(&self, entity: T) -> RepoResult<T>;
    fn find_by_id(&self, id: EntityId) -> RepoResult<Option<T>>;
    fn exists_by_id(&self, id: EntityId) -> RepoResult<bool>;
    /// Returns every entity. Ordering is backend specific.
    fn find_all(&self) -> RepoResult<Vec<T>>;
}

impl<T: Entity, S: EntityStore<T> + ?Sized> EntityStore<T> for &S {
    fn create(&self, entity: T) -> RepoResult<T> {
        (**self).create(entity)
    }

    fn update(&self, entity: T) -> RepoResult<T> {
        (**self).update(entity)
    }

    fn find_by_id(&self, id: EntityId) -> RepoResult<Option<T>> {
        (**self).find_by_id(id)
    }

    fn exists_by_id(&self, id: EntityId) -> RepoResult<bool> {
        (**self).exists_by_id(id)
    }

    fn find_all(&self) -> RepoResult<Vec<T>> {
        (**self).find_all()
    }
}

impl<T: Entity, S: EntityStore<T> + ?Sized> EntityStore<T> for Arc<S> {
    fn create(&self, entity: T) -> RepoResult<T> {
        (**self).create(entity)
    }

    fn update(&self, entity: T) -> RepoResult<T> {
        (**self).update(entity)
    }

    fn find_by_id(&self, id: EntityId) -> RepoResult<Option<T>> {
        (**self).find_by_id(id)
    }

    fn exists_by_id(&self, id: EntityId) -> RepoResult<bool> {
        (**self).exists_by_id(id)
    }

    fn find_all(&self) -> RepoResult<Vec<T>> {
        (**self).find_all()
    }
}
