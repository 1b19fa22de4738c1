//! Core use-case services.
//!
//! # Responsibility
//! - Enforce existence preconditions and domain rules before touching
//!   stores or the relation graph.
//! - Keep callers decoupled from the active storage backend.
//!
//! # Invariants
//! - Services are generic over repository traits and never name a concrete
//!   backend.
//! - A rejected command mutates nothing.

pub mod error;
pub mod film_service;
pub mod user_service;
