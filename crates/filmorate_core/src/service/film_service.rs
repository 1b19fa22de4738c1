//! Film, like and popularity use-case service.
//!
//! # Responsibility
//! - Validate and persist films, including catalog reference checks.
//! - Maintain like edges between existing films and users.
//! - Rank films by popularity and assemble display-ready film details.
//!
//! # Invariants
//! - Film and user existence is checked before any like edge changes.
//! - Popular lists use the configured default size when none is given.

use crate::model::catalog::{Genre, GenreId, Rating, RatingId};
use crate::model::entity::{Entity, EntityKind};
use crate::model::film::{Film, FilmId};
use crate::model::user::{User, UserId};
use crate::projection::popularity::{self, DEFAULT_POPULAR_LIMIT};
use crate::repo::catalog_repo::CatalogRepository;
use crate::repo::entity_store::EntityStore;
use crate::repo::relation_graph::RelationGraph;
use crate::service::error::{ServiceError, ServiceResult};
use log::{debug, info, warn};
use serde::Serialize;

/// Film with catalog references resolved, for output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilmDetails {
    #[serde(flatten)]
    pub film: Film,
    #[serde(rename = "mpa_details")]
    pub rating: Rating,
    #[serde(rename = "genre_details")]
    pub genres: Vec<Genre>,
    pub like_count: u64,
    pub liked_by: Vec<UserId>,
}

/// Film service facade over stores, the relation graph and the catalog.
pub struct FilmService<F, U, G, C>
where
    F: EntityStore<Film>,
    U: EntityStore<User>,
    G: RelationGraph,
    C: CatalogRepository,
{
    films: F,
    users: U,
    graph: G,
    catalog: C,
    popular_default_limit: u32,
}

impl<F, U, G, C> FilmService<F, U, G, C>
where
    F: EntityStore<Film>,
    U: EntityStore<User>,
    G: RelationGraph,
    C: CatalogRepository,
{
    /// Creates a service with the default popular-list size.
    pub fn new(films: F, users: U, graph: G, catalog: C) -> Self {
        Self {
            films,
            users,
            graph,
            catalog,
            popular_default_limit: DEFAULT_POPULAR_LIMIT,
        }
    }

    /// Overrides the list size used when `popular_films` gets no limit.
    pub fn with_popular_default_limit(mut self, limit: u32) -> Self {
        self.popular_default_limit = limit;
        self
    }

    /// Validates and stores a new film.
    pub fn create_film(&self, film: Film) -> ServiceResult<Film> {
        let result = self.try_create_film(film);
        log_outcome("film_create", &result);
        result
    }

    /// Replaces an existing film wholesale, genres included.
    ///
    /// Returns `NotFound` before validating when the id does not resolve.
    pub fn update_film(&self, film: Film) -> ServiceResult<Film> {
        let result = self.try_update_film(film);
        log_outcome("film_update", &result);
        result
    }

    /// Loads one film; a missing id is `NotFound`.
    pub fn get_film_by_id(&self, id: FilmId) -> ServiceResult<Film> {
        self.films
            .find_by_id(id)?
            .ok_or_else(|| ServiceError::not_found(Film::KIND, id))
    }

    pub fn list_films(&self) -> ServiceResult<Vec<Film>> {
        Ok(self.films.find_all()?)
    }

    /// Records that a user likes a film. Liking twice is a no-op.
    pub fn add_like(&self, film_id: FilmId, user_id: UserId) -> ServiceResult<()> {
        let result = self
            .require_like_endpoints(film_id, user_id)
            .and_then(|()| self.graph.add_like(film_id, user_id).map_err(Into::into));
        log_like_outcome("like_add", film_id, user_id, &result);
        result
    }

    /// Withdraws a like. Withdrawing a missing like is a no-op.
    pub fn remove_like(&self, film_id: FilmId, user_id: UserId) -> ServiceResult<()> {
        let result = self
            .require_like_endpoints(film_id, user_id)
            .and_then(|()| self.graph.remove_like(film_id, user_id).map_err(Into::into));
        log_like_outcome("like_remove", film_id, user_id, &result);
        result
    }

    /// Number of distinct users who liked the film.
    pub fn like_count_for(&self, film_id: FilmId) -> ServiceResult<u64> {
        self.require_film(film_id)?;
        Ok(self.graph.like_count_for(film_id)?)
    }

    /// Most-liked films, ties broken by ascending id.
    ///
    /// `None` uses the configured default size; an explicit size must be
    /// positive.
    pub fn popular_films(&self, limit: Option<i64>) -> ServiceResult<Vec<Film>> {
        let limit = popularity::resolve_limit(limit, self.popular_default_limit)
            .map_err(|invalid| ServiceError::InvalidLimit(invalid.0))?;
        let films = self.films.find_all()?;
        let counts = self.graph.like_counts()?;
        let ranked = popularity::popular_films(films, &counts, limit);
        debug!(
            "event=popular_films module=film_service status=ok limit={} returned={}",
            limit,
            ranked.len()
        );
        Ok(ranked)
    }

    /// Film with rating/genre names and like metadata resolved.
    pub fn film_details(&self, id: FilmId) -> ServiceResult<FilmDetails> {
        let film = self.get_film_by_id(id)?;
        let rating = self.rating_by_id(film.rating)?;
        let genres = film
            .genres
            .iter()
            .map(|genre_id| self.genre_by_id(*genre_id))
            .collect::<ServiceResult<Vec<_>>>()?;
        let liked_by = self.graph.likers_of(id)?;

        Ok(FilmDetails {
            film,
            rating,
            genres,
            like_count: liked_by.len() as u64,
            liked_by,
        })
    }

    pub fn list_ratings(&self) -> ServiceResult<Vec<Rating>> {
        Ok(self.catalog.ratings()?)
    }

    pub fn rating_by_id(&self, id: RatingId) -> ServiceResult<Rating> {
        self.catalog
            .rating_by_id(id)?
            .ok_or_else(|| ServiceError::not_found(EntityKind::Rating, id))
    }

    pub fn list_genres(&self) -> ServiceResult<Vec<Genre>> {
        Ok(self.catalog.genres()?)
    }

    pub fn genre_by_id(&self, id: GenreId) -> ServiceResult<Genre> {
        self.catalog
            .genre_by_id(id)?
            .ok_or_else(|| ServiceError::not_found(EntityKind::Genre, id))
    }

    fn try_create_film(&self, film: Film) -> ServiceResult<Film> {
        film.validate()?;
        self.require_catalog_refs(&film)?;
        Ok(self.films.create(film)?)
    }

    fn try_update_film(&self, film: Film) -> ServiceResult<Film> {
        let id = film.id.ok_or(ServiceError::MissingId(Film::KIND))?;
        self.require_film(id)?;
        film.validate()?;
        self.require_catalog_refs(&film)?;
        Ok(self.films.update(film)?)
    }

    fn require_film(&self, id: FilmId) -> ServiceResult<()> {
        if self.films.exists_by_id(id)? {
            Ok(())
        } else {
            Err(ServiceError::not_found(Film::KIND, id))
        }
    }

    fn require_like_endpoints(&self, film_id: FilmId, user_id: UserId) -> ServiceResult<()> {
        self.require_film(film_id)?;
        if self.users.exists_by_id(user_id)? {
            Ok(())
        } else {
            Err(ServiceError::not_found(User::KIND, user_id))
        }
    }

    fn require_catalog_refs(&self, film: &Film) -> ServiceResult<()> {
        self.rating_by_id(film.rating)?;
        for genre_id in &film.genres {
            self.genre_by_id(*genre_id)?;
        }
        Ok(())
    }
}

fn log_outcome(event: &'static str, result: &ServiceResult<Film>) {
    match result {
        Ok(film) => info!(
            "event={} module=film_service status=ok film_id={} genres={}",
            event,
            film.id.unwrap_or_default(),
            film.genres.len()
        ),
        Err(err) => warn!(
            "event={} module=film_service status=error error_code={}",
            event,
            err.code()
        ),
    }
}

fn log_like_outcome(
    event: &'static str,
    film_id: FilmId,
    user_id: UserId,
    result: &ServiceResult<()>,
) {
    match result {
        Ok(()) => info!(
            "event={} module=film_service status=ok film_id={} user_id={}",
            event, film_id, user_id
        ),
        Err(err) => warn!(
            "event={} module=film_service status=error film_id={} user_id={} error_code={}",
            event,
            film_id,
            user_id,
            err.code()
        ),
    }
}
