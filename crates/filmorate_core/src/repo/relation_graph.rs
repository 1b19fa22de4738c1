//! Like and friendship edge contract.
//!
//! # Responsibility
//! - Own like edges (user -> film) and friendship edges (user <-> user),
//!   keyed only by identities and independent of entity storage.
//!
//! # Invariants
//! - Edges have set semantics: re-adding is a no-op, removing an absent edge
//!   is a no-op.
//! - Friendship is symmetric and never reflexive.
//! - A failed mutation leaves the edge set exactly as before.
//! - Friend lists are returned in ascending identity order.
//!
//! Referential checks against live films/users belong to the caller; the
//! graph only sees ids. Backends differ for unknown ids: the in-memory graph
//! stores the edge, the SQLite graph fails with a foreign-key `RepoError::Db`.

use crate::model::film::FilmId;
use crate::model::user::UserId;
use crate::projection::friendship;
use crate::repo::error::RepoResult;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Storage contract implemented by the in-process and SQLite graphs.
pub trait RelationGraph {
    fn add_like(&self, film_id: FilmId, user_id: UserId) -> RepoResult<()>;
    fn remove_like(&self, film_id: FilmId, user_id: UserId) -> RepoResult<()>;
    /// Number of distinct users who liked the film.
    fn like_count_for(&self, film_id: FilmId) -> RepoResult<u64>;
    /// Like counts for every film with at least one like.
    fn like_counts(&self) -> RepoResult<BTreeMap<FilmId, u64>>;
    /// Users who liked the film, ascending.
    fn likers_of(&self, film_id: FilmId) -> RepoResult<Vec<UserId>>;

    /// Fails with `RepoError::SelfFriendship` when both ids are equal.
    fn add_friend(&self, user_id: UserId, other_user_id: UserId) -> RepoResult<()>;
    fn remove_friend(&self, user_id: UserId, other_user_id: UserId) -> RepoResult<()>;
    fn friends_of(&self, user_id: UserId) -> RepoResult<Vec<UserId>>;

    /// Friends shared by both users, ascending.
    ///
    /// Backends that can read both lists under one snapshot should override
    /// this.
    fn common_friends(&self, user_id: UserId, other_id: UserId) -> RepoResult<Vec<UserId>> {
        let left = self.friends_of(user_id)?;
        if user_id == other_id {
            return Ok(left);
        }
        let right = self.friends_of(other_id)?;
        Ok(friendship::common_friends(&left, &right))
    }
}

macro_rules! forward_relation_graph {
    ($($wrapper:ty),*) => {$(
        impl<G: RelationGraph + ?Sized> RelationGraph for $wrapper {
            fn add_like(&self, film_id: FilmId, user_id: UserId) -> RepoResult<()> {
                (**self).add_like(film_id, user_id)
            }

            fn remove_like(&self, film_id: FilmId, user_id: UserId) -> RepoResult<()> {
                (**self).remove_like(film_id, user_id)
            }

            fn like_count_for(&self, film_id: FilmId) -> RepoResult<u64> {
                (**self).like_count_for(film_id)
            }

            fn like_counts(&self) -> RepoResult<BTreeMap<FilmId, u64>> {
                (**self).like_counts()
            }

            fn likers_of(&self, film_id: FilmId) -> RepoResult<Vec<UserId>> {
                (**self).likers_of(film_id)
            }

            fn add_friend(&self, user_id: UserId, other_user_id: UserId) -> RepoResult<()> {
                (**self).add_friend(user_id, other_user_id)
            }

            fn remove_friend(&self, user_id: UserId, other_user_id: UserId) -> RepoResult<()> {
                (**self).remove_friend(user_id, other_user_id)
            }

            fn friends_of(&self, user_id: UserId) -> RepoResult<Vec<UserId>> {
                (**self).friends_of(user_id)
            }

            fn common_friends(&self, user_id: UserId, other_id: UserId) -> RepoResult<Vec<UserId>> {
                (**self).common_friends(user_id, other_id)
            }
        }
    )*};
}

forward_relation_graph!(&G, Arc<G>);
