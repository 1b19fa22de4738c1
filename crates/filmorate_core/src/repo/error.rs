//! Repository error shared by every store and graph backend.

use crate::db::DbError;
use crate::model::entity::{EntityId, EntityKind};
use crate::model::user::UserId;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence and contract errors raised by repositories.
#[derive(Debug)]
pub enum RepoError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Update or lookup target does not exist.
    NotFound { kind: EntityKind, id: EntityId },
    /// `update` received an entity without identity.
    MissingId(EntityKind),
    /// `create` received an entity that already carries identity.
    IdAlreadyAssigned { kind: EntityKind, id: EntityId },
    /// Friendship edge from a user to itself.
    SelfFriendship(UserId),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Persisted data cannot be converted to a valid model.
    InvalidData(String),
    /// A writer panicked while holding an in-process store lock.
    LockPoisoned(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::MissingId(kind) => write!(f, "{kind} update requires an id"),
            Self::IdAlreadyAssigned { kind, id } => {
                write!(f, "{kind} create must not carry an id, got {id}")
            }
            Self::SelfFriendship(id) => write!(f, "user {id} cannot befriend itself"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "repository requires table `{table}`")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::LockPoisoned(store) => write!(f, "{store} lock poisoned"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
