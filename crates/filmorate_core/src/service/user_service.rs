//! User and friendship use-case service.
//!
//! # Responsibility
//! - Validate and persist users, defaulting the display name to the login.
//! - Maintain symmetric friendships between existing users.
//! - Resolve friend and common-friend lists into user records.
//!
//! # Invariants
//! - Self-friendship is rejected before any lookup or mutation.
//! - Both users must exist before a friendship edge is added or removed.
//! - Friend lists are ordered by ascending user id.

use crate::model::entity::{Entity, EntityKind};
use crate::model::user::{User, UserId};
use crate::repo::entity_store::EntityStore;
use crate::repo::error::RepoError;
use crate::repo::relation_graph::RelationGraph;
use crate::service::error::{ServiceError, ServiceResult};
use log::{info, warn};

/// User service facade over a user store and the relation graph.
pub struct UserService<U, G>
where
    U: EntityStore<User>,
    G: RelationGraph,
{
    users: U,
    graph: G,
}

impl<U, G> UserService<U, G>
where
    U: EntityStore<User>,
    G: RelationGraph,
{
    /// Creates a service using the provided store and graph.
    pub fn new(users: U, graph: G) -> Self {
        Self { users, graph }
    }

    /// Validates and stores a new user.
    ///
    /// # Contract
    /// - A blank display name is replaced by the login.
    /// - Returns the stored user with identity populated.
    pub fn create_user(&self, user: User) -> ServiceResult<User> {
        let result = self.try_create_user(user);
        log_outcome("user_create", &result);
        result
    }

    /// Replaces an existing user wholesale.
    ///
    /// Returns `NotFound` before validating when the id does not resolve.
    pub fn update_user(&self, user: User) -> ServiceResult<User> {
        let result = self.try_update_user(user);
        log_outcome("user_update", &result);
        result
    }

    /// Loads one user; a missing id is `NotFound`.
    pub fn get_user_by_id(&self, id: UserId) -> ServiceResult<User> {
        self.users
            .find_by_id(id)?
            .ok_or_else(|| ServiceError::not_found(User::KIND, id))
    }

    pub fn list_users(&self) -> ServiceResult<Vec<User>> {
        Ok(self.users.find_all()?)
    }

    /// Makes two users friends in both directions. Idempotent.
    pub fn add_friend(&self, user_id: UserId, friend_id: UserId) -> ServiceResult<()> {
        let result = self.try_add_friend(user_id, friend_id);
        log_edge_outcome("friend_add", user_id, friend_id, &result);
        result
    }

    /// Ends a friendship for both users. Removing a missing friendship is a
    /// no-op.
    pub fn remove_friend(&self, user_id: UserId, friend_id: UserId) -> ServiceResult<()> {
        let result = self.try_remove_friend(user_id, friend_id);
        log_edge_outcome("friend_remove", user_id, friend_id, &result);
        result
    }

    /// Friend ids of one user, ascending.
    pub fn friend_ids(&self, user_id: UserId) -> ServiceResult<Vec<UserId>> {
        self.require_user(user_id)?;
        Ok(self.graph.friends_of(user_id)?)
    }

    /// Friend records of one user, ordered by id.
    pub fn get_friends(&self, user_id: UserId) -> ServiceResult<Vec<User>> {
        let ids = self.friend_ids(user_id)?;
        self.resolve_users(&ids)
    }

    /// Ids of users who are friends with both users, ascending.
    ///
    /// Passing the same id twice yields that user's whole friend list.
    pub fn common_friend_ids(&self, user_id: UserId, other_id: UserId) -> ServiceResult<Vec<UserId>> {
        self.require_user(user_id)?;
        self.require_user(other_id)?;
        Ok(self.graph.common_friends(user_id, other_id)?)
    }

    /// Records of users who are friends with both users, ordered by id.
    pub fn get_common_friends(&self, user_id: UserId, other_id: UserId) -> ServiceResult<Vec<User>> {
        let ids = self.common_friend_ids(user_id, other_id)?;
        self.resolve_users(&ids)
    }

    fn try_create_user(&self, mut user: User) -> ServiceResult<User> {
        user.validate()?;
        user.apply_default_name();
        Ok(self.users.create(user)?)
    }

    fn try_update_user(&self, mut user: User) -> ServiceResult<User> {
        let id = user.id.ok_or(ServiceError::MissingId(User::KIND))?;
        if !self.users.exists_by_id(id)? {
            return Err(ServiceError::not_found(User::KIND, id));
        }
        user.validate()?;
        user.apply_default_name();
        Ok(self.users.update(user)?)
    }

    fn try_add_friend(&self, user_id: UserId, friend_id: UserId) -> ServiceResult<()> {
        if user_id == friend_id {
            return Err(ServiceError::SelfFriendship(user_id));
        }
        self.require_user(user_id)?;
        self.require_user(friend_id)?;
        Ok(self.graph.add_friend(user_id, friend_id)?)
    }

    fn try_remove_friend(&self, user_id: UserId, friend_id: UserId) -> ServiceResult<()> {
        self.require_user(user_id)?;
        self.require_user(friend_id)?;
        Ok(self.graph.remove_friend(user_id, friend_id)?)
    }

    fn require_user(&self, id: UserId) -> ServiceResult<()> {
        if self.users.exists_by_id(id)? {
            Ok(())
        } else {
            Err(ServiceError::not_found(User::KIND, id))
        }
    }

    fn resolve_users(&self, ids: &[UserId]) -> ServiceResult<Vec<User>> {
        ids.iter()
            .map(|id| {
                self.users.find_by_id(*id)?.ok_or_else(|| {
                    ServiceError::Storage(RepoError::InvalidData(format!(
                        "friendship edge references missing {} {id}",
                        EntityKind::User
                    )))
                })
            })
            .collect()
    }
}

fn log_outcome(event: &'static str, result: &ServiceResult<User>) {
    match result {
        Ok(user) => info!(
            "event={} module=user_service status=ok user_id={}",
            event,
            user.id.unwrap_or_default()
        ),
        Err(err) => warn!(
            "event={} module=user_service status=error error_code={}",
            event,
            err.code()
        ),
    }
}

fn log_edge_outcome(
    event: &'static str,
    user_id: UserId,
    friend_id: UserId,
    result: &ServiceResult<()>,
) {
    match result {
        Ok(()) => info!(
            "event={} module=user_service status=ok user_id={} friend_id={}",
            event, user_id, friend_id
        ),
        Err(err) => warn!(
            "event={} module=user_service status=error user_id={} friend_id={} error_code={}",
            event,
            user_id,
            friend_id,
            err.code()
        ),
    }
}
