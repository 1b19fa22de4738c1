//! Friend-list and common-friends projections.

use crate::model::user::UserId;
use std::collections::{BTreeMap, BTreeSet};

/// Friends of `user_id` in ascending order, read from a symmetric adjacency
/// map. The user itself is never part of its own list.
pub fn friend_list(adjacency: &BTreeMap<UserId, BTreeSet<UserId>>, user_id: UserId) -> Vec<UserId> {
    adjacency
        .get(&user_id)
        .map(|friends| {
            friends
                .iter()
                .copied()
                .filter(|friend_id| *friend_id != user_id)
                .collect()
        })
        .unwrap_or_default()
}

/// Intersection of two friend lists, ascending and without duplicates.
///
/// Input order does not matter. Intersecting a list with itself returns the
/// whole list.
pub fn common_friends(left: &[UserId], right: &[UserId]) -> Vec<UserId> {
    let right: BTreeSet<UserId> = right.iter().copied().collect();
    let shared: BTreeSet<UserId> = left
        .iter()
        .copied()
        .filter(|friend_id| right.contains(friend_id))
        .collect();
    shared.into_iter().collect()
}
