//! In-process `RelationGraph`.
//!
//! # Invariants
//! - One `RwLock` guards likes and friendships together; every mutation is
//!   a single write-locked step, so both directions of a friendship appear
//!   and disappear together.
//! - Empty adjacency sets are pruned, so `like_counts` only lists films with
//!   at least one like.

use crate::model::entity::EntityId;
use crate::model::film::FilmId;
use crate::model::user::UserId;
use crate::projection::friendship;
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::relation_graph::RelationGraph;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
struct RelationState {
    /// film -> users who liked it
    likes: BTreeMap<FilmId, BTreeSet<UserId>>,
    /// user -> friends; stored in both directions
    friends: BTreeMap<UserId, BTreeSet<UserId>>,
}

/// Coarse-locked relation graph for the in-process backend.
#[derive(Debug, Default)]
pub struct InMemoryRelationGraph {
    state: RwLock<RelationState>,
}

impl InMemoryRelationGraph {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RepoResult<RwLockReadGuard<'_, RelationState>> {
        self.state
            .read()
            .map_err(|_| RepoError::LockPoisoned("relation graph"))
    }

    fn write(&self) -> RepoResult<RwLockWriteGuard<'_, RelationState>> {
        self.state
            .write()
            .map_err(|_| RepoError::LockPoisoned("relation graph"))
    }
}

impl RelationGraph for InMemoryRelationGraph {
    fn add_like(&self, film_id: FilmId, user_id: UserId) -> RepoResult<()> {
        self.write()?
            .likes
            .entry(film_id)
            .or_default()
            .insert(user_id);
        Ok(())
    }

    fn remove_like(&self, film_id: FilmId, user_id: UserId) -> RepoResult<()> {
        let mut state = self.write()?;
        remove_from_adjacency(&mut state.likes, film_id, user_id);
        Ok(())
    }

    fn like_count_for(&self, film_id: FilmId) -> RepoResult<u64> {
        let state = self.read()?;
        Ok(state.likes.get(&film_id).map_or(0, |users| users.len() as u64))
    }

    fn like_counts(&self) -> RepoResult<BTreeMap<FilmId, u64>> {
        let state = self.read()?;
        Ok(state
            .likes
            .iter()
            .map(|(film_id, users)| (*film_id, users.len() as u64))
            .collect())
    }

    fn likers_of(&self, film_id: FilmId) -> RepoResult<Vec<UserId>> {
        let state = self.read()?;
        Ok(state
            .likes
            .get(&film_id)
            .map(|users| users.iter().copied().collect())
            .unwrap_or_default())
    }

    fn add_friend(&self, user_id: UserId, other_user_id: UserId) -> RepoResult<()> {
        if user_id == other_user_id {
            return Err(RepoError::SelfFriendship(user_id));
        }

        let mut state = self.write()?;
        state
            .friends
            .entry(user_id)
            .or_default()
            .insert(other_user_id);
        state
            .friends
            .entry(other_user_id)
            .or_default()
            .insert(user_id);
        Ok(())
    }

    fn remove_friend(&self, user_id: UserId, other_user_id: UserId) -> RepoResult<()> {
        let mut state = self.write()?;
        remove_from_adjacency(&mut state.friends, user_id, other_user_id);
        remove_from_adjacency(&mut state.friends, other_user_id, user_id);
        Ok(())
    }

    fn friends_of(&self, user_id: UserId) -> RepoResult<Vec<UserId>> {
        let state = self.read()?;
        Ok(friendship::friend_list(&state.friends, user_id))
    }

    fn common_friends(&self, user_id: UserId, other_id: UserId) -> RepoResult<Vec<UserId>> {
        let state = self.read()?;
        let left = friendship::friend_list(&state.friends, user_id);
        let right = friendship::friend_list(&state.friends, other_id);
        Ok(friendship::common_friends(&left, &right))
    }
}

fn remove_from_adjacency(
    adjacency: &mut BTreeMap<EntityId, BTreeSet<EntityId>>,
    key: EntityId,
    value: EntityId,
) {
    if let Some(set) = adjacency.get_mut(&key) {
        set.remove(&value);
        if set.is_empty() {
            adjacency.remove(&key);
        }
    }
}
