//! SQLite-backed film store.
//!
//! # Invariants
//! - Film rows and their `film_genres` links are written in one IMMEDIATE
//!   transaction; a failed write leaves neither behind.
//! - `find_all` returns films in ascending identity order.
//! - Identity comes from `AUTOINCREMENT`, so ids are never reused, even
//!   across connections to the same file.

use crate::model::catalog::GenreId;
use crate::model::entity::{Entity, EntityId};
use crate::model::film::{Film, FilmId};
use crate::repo::entity_store::EntityStore;
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::schema::ensure_connection_ready;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};
use std::collections::{BTreeMap, BTreeSet};

const FILM_SELECT_SQL: &str = "SELECT
    id,
    name,
    description,
    release_date,
    duration,
    mpa_id
FROM films";

/// Film store over a migrated connection.
pub struct SqliteFilmStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteFilmStore<'conn> {
    /// Constructs a store from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["films", "film_genres"])?;
        Ok(Self { conn })
    }
}

impl EntityStore<Film> for SqliteFilmStore<'_> {
    fn create(&self, mut film: Film) -> RepoResult<Film> {
        if let Some(id) = film.id {
            return Err(RepoError::IdAlreadyAssigned {
                kind: Film::KIND,
                id,
            });
        }

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO films (
                name,
                description,
                release_date,
                duration,
                mpa_id
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                film.name.as_str(),
                film.description.as_str(),
                film.release_date,
                film.duration,
                film.rating,
            ],
        )?;
        let id = tx.last_insert_rowid();
        insert_genres(&tx, id, &film.genres)?;
        tx.commit()?;

        film.assign_id(id);
        Ok(film)
    }

    fn update(&self, film: Film) -> RepoResult<Film> {
        let id = film.id.ok_or(RepoError::MissingId(Film::KIND))?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let changed = tx.execute(
            "UPDATE films
             SET
                name = ?1,
                description = ?2,
                release_date = ?3,
                duration = ?4,
                mpa_id = ?5
             WHERE id = ?6;",
            params![
                film.name.as_str(),
                film.description.as_str(),
                film.release_date,
                film.duration,
                film.rating,
                id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                kind: Film::KIND,
                id,
            });
        }

        tx.execute("DELETE FROM film_genres WHERE film_id = ?1;", [id])?;
        insert_genres(&tx, id, &film.genres)?;
        tx.commit()?;

        Ok(film)
    }

    fn find_by_id(&self, id: EntityId) -> RepoResult<Option<Film>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{FILM_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            let mut film = parse_film_row(row)?;
            film.genres = load_genres_for_film(self.conn, id)?;
            return Ok(Some(film));
        }

        Ok(None)
    }

    fn exists_by_id(&self, id: EntityId) -> RepoResult<bool> {
        let found = self
            .conn
            .query_row("SELECT 1 FROM films WHERE id = ?1;", [id], |_| Ok(()))
            .optional()?;
        Ok(found.is_some())
    }

    fn find_all(&self) -> RepoResult<Vec<Film>> {
        let mut genres = load_all_genre_links(self.conn)?;
        let mut stmt = self
            .conn
            .prepare(&format!("{FILM_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut films = Vec::new();

        while let Some(row) = rows.next()? {
            let mut film = parse_film_row(row)?;
            if let Some(id) = film.id {
                film.genres = genres.remove(&id).unwrap_or_default();
            }
            films.push(film);
        }

        Ok(films)
    }
}

fn insert_genres(tx: &Transaction<'_>, film_id: FilmId, genres: &BTreeSet<GenreId>) -> RepoResult<()> {
    let mut stmt = tx.prepare("INSERT INTO film_genres (film_id, genre_id) VALUES (?1, ?2);")?;
    for genre_id in genres {
        stmt.execute(params![film_id, genre_id])?;
    }
    Ok(())
}

fn load_genres_for_film(conn: &Connection, film_id: FilmId) -> RepoResult<BTreeSet<GenreId>> {
    let mut stmt = conn.prepare("SELECT genre_id FROM film_genres WHERE film_id = ?1;")?;
    let genres = stmt
        .query_map([film_id], |row| row.get::<_, GenreId>(0))?
        .collect::<Result<BTreeSet<_>, _>>()?;
    Ok(genres)
}

fn load_all_genre_links(conn: &Connection) -> RepoResult<BTreeMap<FilmId, BTreeSet<GenreId>>> {
    let mut stmt = conn.prepare("SELECT film_id, genre_id FROM film_genres;")?;
    let mut rows = stmt.query([])?;
    let mut links: BTreeMap<FilmId, BTreeSet<GenreId>> = BTreeMap::new();
    while let Some(row) = rows.next()? {
        let film_id: FilmId = row.get(0)?;
        let genre_id: GenreId = row.get(1)?;
        links.entry(film_id).or_default().insert(genre_id);
    }
    Ok(links)
}

fn parse_film_row(row: &Row<'_>) -> RepoResult<Film> {
    let id: FilmId = row.get("id")?;
    let duration: i64 = row.get("duration")?;
    let duration = u32::try_from(duration)
        .ok()
        .filter(|value| *value > 0)
        .ok_or_else(|| {
            RepoError::InvalidData(format!(
                "invalid duration `{duration}` in films.duration for film {id}"
            ))
        })?;

    Ok(Film {
        id: Some(id),
        name: row.get("name")?,
        description: row.get("description")?,
        release_date: row.get("release_date")?,
        duration,
        rating: row.get("mpa_id")?,
        genres: BTreeSet::new(),
    })
}
