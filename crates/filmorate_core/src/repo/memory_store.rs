//! In-process map-backed `EntityStore`.
//!
//! # Invariants
//! - Identity is taken from an atomic counter while the write lock is held,
//!   so ids never repeat and insertion order equals identity order.
//! - Readers see either the state before or after a write, never a partial
//!   one.

use crate::model::entity::{Entity, EntityId};
use crate::repo::entity_store::EntityStore;
use crate::repo::error::{RepoError, RepoResult};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Map-backed store for one entity kind.
pub struct InMemoryStore<T: Entity> {
    next_id: AtomicI64,
    entries: RwLock<BTreeMap<EntityId, T>>,
}

impl<T: Entity> InMemoryStore<T> {
    pub fn new() -> Self {
        Self {
            next_id: AtomicI64::new(1),
            entries: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn len(&self) -> RepoResult<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> RepoResult<bool> {
        Ok(self.read()?.is_empty())
    }

    fn read(&self) -> RepoResult<RwLockReadGuard<'_, BTreeMap<EntityId, T>>> {
        self.entries
            .read()
            .map_err(|_| RepoError::LockPoisoned(T::KIND.as_str()))
    }

    fn write(&self) -> RepoResult<RwLockWriteGuard<'_, BTreeMap<EntityId, T>>> {
        self.entries
            .write()
            .map_err(|_| RepoError::LockPoisoned(T::KIND.as_str()))
    }
}

impl<T: Entity> Default for InMemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> EntityStore<T> for InMemoryStore<T> {
    fn create(&self, mut entity: T) -> RepoResult<T> {
        if let Some(id) = entity.id() {
            return Err(RepoError::IdAlreadyAssigned { kind: T::KIND, id });
        }

        let mut entries = self.write()?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        entity.assign_id(id);
        entries.insert(id, entity.clone());
        Ok(entity)
    }

    fn update(&self, entity: T) -> RepoResult<T> {
        let id = entity.id().ok_or(RepoError::MissingId(T::KIND))?;

        let mut entries = self.write()?;
        match entries.get_mut(&id) {
            Some(slot) => {
                *slot = entity.clone();
                Ok(entity)
            }
            None => Err(RepoError::NotFound { kind: T::KIND, id }),
        }
    }

    fn find_by_id(&self, id: EntityId) -> RepoResult<Option<T>> {
        Ok(self.read()?.get(&id).cloned())
    }

    fn exists_by_id(&self, id: EntityId) -> RepoResult<bool> {
        Ok(self.read()?.contains_key(&id))
    }

    fn find_all(&self) -> RepoResult<Vec<T>> {
        Ok(self.read()?.values().cloned().collect())
    }
}
