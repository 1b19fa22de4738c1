//! Rating and genre catalog lookups.
//!
//! # Invariants
//! - Catalog listings are ordered by ascending id.
//! - Catalogs are read-only at runtime.

use crate::model::catalog::{Genre, GenreId, Rating, RatingId, GENRE_SEED, RATING_SEED};
use crate::repo::error::RepoResult;
use crate::repo::schema::ensure_connection_ready;
use rusqlite::{Connection, OptionalExtension};

/// Read-only access to the rating and genre catalogs.
pub trait CatalogRepository {
    fn ratings(&self) -> RepoResult<Vec<Rating>>;
    fn rating_by_id(&self, id: RatingId) -> RepoResult<Option<Rating>>;
    fn genres(&self) -> RepoResult<Vec<Genre>>;
    fn genre_by_id(&self, id: GenreId) -> RepoResult<Option<Genre>>;
}

impl<C: CatalogRepository + ?Sized> CatalogRepository for &C {
    fn ratings(&self) -> RepoResult<Vec<Rating>> {
        (**self).ratings()
    }

    fn rating_by_id(&self, id: RatingId) -> RepoResult<Option<Rating>> {
        (**self).rating_by_id(id)
    }

    fn genres(&self) -> RepoResult<Vec<Genre>> {
        (**self).genres()
    }

    fn genre_by_id(&self, id: GenreId) -> RepoResult<Option<Genre>> {
        (**self).genre_by_id(id)
    }
}

/// In-process catalog with the same rows the SQLite seed migration inserts.
#[derive(Debug, Default, Clone, Copy)]
pub struct StaticCatalog;

impl CatalogRepository for StaticCatalog {
    fn ratings(&self) -> RepoResult<Vec<Rating>> {
        Ok(RATING_SEED
            .iter()
            .map(|(id, name)| Rating {
                id: *id,
                name: (*name).to_string(),
            })
            .collect())
    }

    fn rating_by_id(&self, id: RatingId) -> RepoResult<Option<Rating>> {
        Ok(self.ratings()?.into_iter().find(|rating| rating.id == id))
    }

    fn genres(&self) -> RepoResult<Vec<Genre>> {
        Ok(GENRE_SEED
            .iter()
            .map(|(id, name)| Genre {
                id: *id,
                name: (*name).to_string(),
            })
            .collect())
    }

    fn genre_by_id(&self, id: GenreId) -> RepoResult<Option<Genre>> {
        Ok(self.genres()?.into_iter().find(|genre| genre.id == id))
    }
}

/// Catalog over the seeded `mpa` and `genres` tables.
pub struct SqliteCatalogRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCatalogRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["mpa", "genres"])?;
        Ok(Self { conn })
    }
}

impl CatalogRepository for SqliteCatalogRepository<'_> {
    fn ratings(&self) -> RepoResult<Vec<Rating>> {
        let mut stmt = self.conn.prepare("SELECT id, name FROM mpa ORDER BY id ASC;")?;
        let ratings = stmt
            .query_map([], |row| {
                Ok(Rating {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ratings)
    }

    fn rating_by_id(&self, id: RatingId) -> RepoResult<Option<Rating>> {
        let rating = self
            .conn
            .query_row("SELECT id, name FROM mpa WHERE id = ?1;", [id], |row| {
                Ok(Rating {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })
            .optional()?;
        Ok(rating)
    }

    fn genres(&self) -> RepoResult<Vec<Genre>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM genres ORDER BY id ASC;")?;
        let genres = stmt
            .query_map([], |row| {
                Ok(Genre {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(genres)
    }

    fn genre_by_id(&self, id: GenreId) -> RepoResult<Option<Genre>> {
        let genre = self
            .conn
            .query_row("SELECT id, name FROM genres WHERE id = ?1;", [id], |row| {
                Ok(Genre {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })
            .optional()?;
        Ok(genre)
    }
}
