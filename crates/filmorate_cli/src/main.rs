//! CLI smoke entry point.
//!
//! # Responsibility
//! - Wire configuration, logging and the SQLite backend end to end.
//! - Print the catalog and the current popular films for a quick sanity check.

use filmorate_core::db::{open_db, open_db_in_memory};
use filmorate_core::{
    init_logging, FilmService, FilmorateConfig, SqliteCatalogRepository,
    SqliteFilmStore, SqliteRelationGraph, SqliteUserStore,
};
use log::info;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();
    let config = FilmorateConfig::from_env()?;
    let file_logging = init_logging(&config)?;

    println!("filmorate_core ping={}", filmorate_core::ping());
    println!("filmorate_core version={}", filmorate_core::core_version());

    let conn = match config.db_path.as_deref() {
        Some(path) => open_db(path)?,
        None => open_db_in_memory()?,
    };
    info!(
        "event=cli_start module=cli status=ok persistent_db={} file_logging={}",
        config.db_path.is_some(),
        file_logging
    );

    let films = FilmService::new(
        SqliteFilmStore::try_new(&conn)?,
        SqliteUserStore::try_new(&conn)?,
        SqliteRelationGraph::try_new(&conn)?,
        SqliteCatalogRepository::try_new(&conn)?,
    )
    .with_popular_default_limit(config.popular_default_limit);

    for rating in films.list_ratings()? {
        println!("mpa {} {}", rating.id, rating.name);
    }
    for genre in films.list_genres()? {
        println!("genre {} {}", genre.id, genre.name);
    }
    for film in films.popular_films(None)? {
        let likes = match film.id {
            Some(id) => films.like_count_for(id)?,
            None => 0,
        };
        println!(
            "popular {} {} likes={}",
            film.id.unwrap_or_default(),
            film.name,
            likes
        );
    }

    Ok(())
}
