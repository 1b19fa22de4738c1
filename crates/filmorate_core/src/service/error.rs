//! Service-level error surface handed to the command layer.

use crate::model::entity::{EntityId, EntityKind};
use crate::model::film::FilmValidationError;
use crate::model::user::{UserId, UserValidationError};
use crate::repo::error::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Coarse classification a transport layer maps to a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Validation,
    Storage,
}

/// Failure of a film/user use-case.
#[derive(Debug)]
pub enum ServiceError {
    /// Referenced film, user, rating or genre does not exist.
    NotFound { kind: EntityKind, id: EntityId },
    InvalidFilm(FilmValidationError),
    InvalidUser(UserValidationError),
    SelfFriendship(UserId),
    /// Explicit popular-list size that is zero or negative.
    InvalidLimit(i64),
    MissingId(EntityKind),
    IdAlreadyAssigned { kind: EntityKind, id: EntityId },
    /// Backend failure, propagated unchanged.
    Storage(RepoError),
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::InvalidFilm(_)
            | Self::InvalidUser(_)
            | Self::SelfFriendship(_)
            | Self::InvalidLimit(_)
            | Self::MissingId(_)
            | Self::IdAlreadyAssigned { .. } => ErrorKind::Validation,
            Self::Storage(_) => ErrorKind::Storage,
        }
    }

    /// Stable code for log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::InvalidFilm(_) => "invalid_film",
            Self::InvalidUser(_) => "invalid_user",
            Self::SelfFriendship(_) => "self_friendship",
            Self::InvalidLimit(_) => "invalid_limit",
            Self::MissingId(_) => "missing_id",
            Self::IdAlreadyAssigned { .. } => "id_already_assigned",
            Self::Storage(_) => "storage",
        }
    }

    pub(crate) fn not_found(kind: EntityKind, id: EntityId) -> Self {
        Self::NotFound { kind, id }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { kind, id } => write!(f, "{kind} with id {id} not found"),
            Self::InvalidFilm(err) => write!(f, "{err}"),
            Self::InvalidUser(err) => write!(f, "{err}"),
            Self::SelfFriendship(id) => write!(f, "user {id} cannot befriend itself"),
            Self::InvalidLimit(value) => {
                write!(f, "popular film count must be positive, got {value}")
            }
            Self::MissingId(kind) => write!(f, "{kind} id is required"),
            Self::IdAlreadyAssigned { kind, id } => {
                write!(f, "new {kind} must not carry an id, got {id}")
            }
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidFilm(err) => Some(err),
            Self::InvalidUser(err) => Some(err),
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { kind, id } => Self::NotFound { kind, id },
            RepoError::MissingId(kind) => Self::MissingId(kind),
            RepoError::IdAlreadyAssigned { kind, id } => Self::IdAlreadyAssigned { kind, id },
            RepoError::SelfFriendship(id) => Self::SelfFriendship(id),
            other => Self::Storage(other),
        }
    }
}

impl From<FilmValidationError> for ServiceError {
    fn from(value: FilmValidationError) -> Self {
        Self::InvalidFilm(value)
    }
}

impl From<UserValidationError> for ServiceError {
    fn from(value: UserValidationError) -> Self {
        Self::InvalidUser(value)
    }
}

#[cfg(test)]
mod tests {
    use super::{ErrorKind, ServiceError};
    use crate::db::DbError;
    use crate::model::entity::EntityKind;
    use crate::repo::error::RepoError;

    #[test]
    fn repo_errors_map_to_service_kinds() {
        let not_found: ServiceError = RepoError::NotFound {
            kind: EntityKind::User,
            id: 9,
        }
        .into();
        assert_eq!(not_found.kind(), ErrorKind::NotFound);

        let self_friend: ServiceError = RepoError::SelfFriendship(4).into();
        assert_eq!(self_friend.kind(), ErrorKind::Validation);

        let storage: ServiceError = RepoError::Db(DbError::UnsupportedSchemaVersion {
            db_version: 9,
            latest_supported: 2,
        })
        .into();
        assert_eq!(storage.kind(), ErrorKind::Storage);
        assert_eq!(storage.code(), "storage");
    }
}
