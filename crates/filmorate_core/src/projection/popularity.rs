//! Popularity ranking.
//!
//! # Invariants
//! - Films are ordered by like count descending, ties by identity ascending.
//! - Films without likes are ranked like any other film with count zero.
//! - The limit is applied after ordering.

use crate::model::film::{Film, FilmId};
use std::cmp::Reverse;
use std::collections::BTreeMap;

/// Fallback list size when the caller does not provide one.
pub const DEFAULT_POPULAR_LIMIT: u32 = 10;

/// Why a requested limit was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidLimit(pub i64);

/// Resolves the effective list size.
///
/// `None` uses `default_limit`; explicit values must be positive. Values
/// above `u32::MAX` are clamped.
pub fn resolve_limit(requested: Option<i64>, default_limit: u32) -> Result<u32, InvalidLimit> {
    match requested {
        None => Ok(default_limit),
        Some(value) if value <= 0 => Err(InvalidLimit(value)),
        Some(value) => Ok(u32::try_from(value).unwrap_or(u32::MAX)),
    }
}

/// Returns the `limit` most-liked films.
pub fn popular_films(
    films: Vec<Film>,
    like_counts: &BTreeMap<FilmId, u64>,
    limit: u32,
) -> Vec<Film> {
    let mut ranked: Vec<(u64, Film)> = films
        .into_iter()
        .map(|film| {
            let likes = film
                .id
                .and_then(|id| like_counts.get(&id).copied())
                .unwrap_or(0);
            (likes, film)
        })
        .collect();

    ranked.sort_by_key(|(likes, film)| (Reverse(*likes), film.id));
    ranked
        .into_iter()
        .take(limit as usize)
        .map(|(_, film)| film)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{popular_films, resolve_limit, InvalidLimit, DEFAULT_POPULAR_LIMIT};
    use crate::model::film::Film;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn film(id: i64) -> Film {
        let mut film = Film::new(
            format!("film-{id}"),
            NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
            90,
            1,
        );
        film.id = Some(id);
        film
    }

    fn ids(films: &[Film]) -> Vec<i64> {
        films.iter().filter_map(|film| film.id).collect()
    }

    #[test]
    fn orders_by_likes_then_identity() {
        let films = vec![film(4), film(1), film(3), film(2)];
        let counts = BTreeMap::from([(1, 1), (2, 5), (3, 1), (4, 5)]);

        let ranked = popular_films(films, &counts, 10);
        assert_eq!(ids(&ranked), vec![2, 4, 1, 3]);
    }

    #[test]
    fn films_without_likes_fill_remaining_slots() {
        let films = vec![film(3), film(2), film(1)];
        let counts = BTreeMap::from([(3, 2)]);

        let ranked = popular_films(films, &counts, 2);
        assert_eq!(ids(&ranked), vec![3, 1]);
    }

    #[test]
    fn never_ranks_a_film_above_one_with_more_likes() {
        let films: Vec<Film> = (1..=20).map(film).collect();
        let counts: BTreeMap<i64, u64> = (1..=20).map(|id| (id, (id as u64 * 7) % 5)).collect();

        let ranked = popular_films(films, &counts, 20);
        for pair in ranked.windows(2) {
            let left = counts[&pair[0].id.unwrap()];
            let right = counts[&pair[1].id.unwrap()];
            assert!(left > right || (left == right && pair[0].id < pair[1].id));
        }
    }

    #[test]
    fn resolve_limit_defaults_and_rejects_non_positive() {
        assert_eq!(resolve_limit(None, DEFAULT_POPULAR_LIMIT), Ok(10));
        assert_eq!(resolve_limit(Some(3), DEFAULT_POPULAR_LIMIT), Ok(3));
        assert_eq!(resolve_limit(Some(0), DEFAULT_POPULAR_LIMIT), Err(InvalidLimit(0)));
        assert_eq!(resolve_limit(Some(-2), DEFAULT_POPULAR_LIMIT), Err(InvalidLimit(-2)));
    }
}
