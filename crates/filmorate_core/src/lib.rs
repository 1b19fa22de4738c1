//! Core domain logic for Filmorate.
//! This crate is the single source of truth for film/user relation
//! invariants: likes, symmetric friendships and the views derived from them.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod projection;
pub mod repo;
pub mod service;

pub use config::{default_log_level, ConfigError, FilmorateConfig};
pub use logging::{init_logging, LoggingError};
pub use model::catalog::{Genre, GenreId, Rating, RatingId};
pub use model::entity::{Entity, EntityId, EntityKind};
pub use model::film::{Film, FilmId, FilmValidationError};
pub use model::user::{User, UserId, UserValidationError};
pub use projection::popularity::DEFAULT_POPULAR_LIMIT;
pub use repo::catalog_repo::{CatalogRepository, SqliteCatalogRepository, StaticCatalog};
pub use repo::entity_store::EntityStore;
pub use repo::error::{RepoError, RepoResult};
pub use repo::memory_graph::InMemoryRelationGraph;
pub use repo::memory_store::InMemoryStore;
pub use repo::relation_graph::RelationGraph;
pub use repo::sqlite_film::SqliteFilmStore;
pub use repo::sqlite_graph::SqliteRelationGraph;
pub use repo::sqlite_user::SqliteUserStore;
pub use service::error::{ErrorKind, ServiceError, ServiceResult};
pub use service::film_service::{FilmDetails, FilmService};
pub use service::user_service::UserService;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
