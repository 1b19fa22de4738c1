//! Domain model for films, users and the fixed rating/genre catalogs.
//!
//! # Responsibility
//! - Define the value objects that stores persist and services return.
//! - Keep field rules (`validate`) next to the data they constrain.
//!
//! # Invariants
//! - Identities are assigned by stores on create and never change.
//! - Entities are never deleted; updates replace mutable fields wholesale.

pub mod catalog;
pub mod entity;
pub mod film;
pub mod user;
