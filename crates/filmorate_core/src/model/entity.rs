//! Identity contract shared by every stored aggregate.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Numeric identity assigned by a store, starting at 1.
pub type EntityId = i64;

/// Kind tag used in not-found errors and log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Film,
    User,
    Rating,
    Genre,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Film => "film",
            Self::User => "user",
            Self::Rating => "rating",
            Self::Genre => "genre",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregate that an `EntityStore` can persist.
///
/// # Invariants
/// - `id()` is `None` until a store assigns identity on create.
/// - `assign_id` is only called by stores.
pub trait Entity: Clone + Send + Sync + 'static {
    const KIND: EntityKind;

    fn id(&self) -> Option<EntityId>;

    fn assign_id(&mut self, id: EntityId);
}
