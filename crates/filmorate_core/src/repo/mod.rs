//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define storage contracts (`EntityStore`, `RelationGraph`,
//!   `CatalogRepository`) that services are written against.
//! - Provide in-process and SQLite implementations of each contract.
//!
//! # Invariants
//! - Both backends of a contract are observably interchangeable.
//! - Repository APIs return semantic errors (`NotFound`) in addition to
//!   transport errors; storage failures are never swallowed.

pub mod catalog_repo;
pub mod entity_store;
pub mod error;
pub mod memory_graph;
pub mod memory_store;
pub mod relation_graph;
mod schema;
pub mod sqlite_film;
pub mod sqlite_graph;
pub mod sqlite_user;
