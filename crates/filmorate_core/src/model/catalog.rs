//! Fixed rating (MPA) and genre catalogs.
//!
//! Catalog rows are seeded by migration and never mutated at runtime. Films
//! hold only the ids; names are resolved when assembling output.

use serde::{Deserialize, Serialize};

pub type RatingId = i64;
pub type GenreId = i64;

/// Motion-picture rating classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    pub id: RatingId,
    pub name: String,
}

/// Film genre.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: GenreId,
    pub name: String,
}

/// Seed rows shared by the in-process catalog and `0002_catalog_seed.sql`.
pub const RATING_SEED: &[(RatingId, &str)] = &[
    (1, "G"),
    (2, "PG"),
    (3, "PG-13"),
    (4, "R"),
    (5, "NC-17"),
];

pub const GENRE_SEED: &[(GenreId, &str)] = &[
    (1, "Comedy"),
    (2, "Drama"),
    (3, "Animation"),
    (4, "Thriller"),
    (5, "Documentary"),
    (6, "Action"),
];
