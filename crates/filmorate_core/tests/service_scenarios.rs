mod common;

use common::{date, film, matrix, user};
use filmorate_core::{
    CatalogRepository, EntityKind, EntityStore, ErrorKind, Film, FilmService, RelationGraph,
    ServiceError, User, UserService,
};

fn matrix_scenario<F, U, G, C>(users: &UserService<U, G>, films: &FilmService<F, U, G, C>)
where
    F: EntityStore<Film>,
    U: EntityStore<User>,
    G: RelationGraph,
    C: CatalogRepository,
{
    let a = users.create_user(user("neo")).unwrap().id.unwrap();
    let b = users.create_user(user("trinity")).unwrap().id.unwrap();
    let c = users.create_user(user("morpheus")).unwrap().id.unwrap();
    let m = films.create_film(matrix()).unwrap().id.unwrap();

    films.add_like(m, a).unwrap();
    films.add_like(m, b).unwrap();
    films.add_like(m, a).unwrap();
    assert_eq!(films.like_count_for(m).unwrap(), 2);

    users.add_friend(a, b).unwrap();
    users.add_friend(a, c).unwrap();
    assert_eq!(users.friend_ids(b).unwrap(), vec![a]);
    assert_eq!(users.friend_ids(a).unwrap(), vec![b, c]);
    assert_eq!(users.common_friend_ids(b, c).unwrap(), vec![a]);

    let common = users.get_common_friends(c, b).unwrap();
    assert_eq!(common.len(), 1);
    assert_eq!(common[0].login, "neo");

    users.remove_friend(b, a).unwrap();
    assert_eq!(users.friend_ids(a).unwrap(), vec![c]);
    assert!(users.friend_ids(b).unwrap().is_empty());

    films.remove_like(m, b).unwrap();
    assert_eq!(films.like_count_for(m).unwrap(), 1);
}

fn self_friendship_is_a_validation_error<F, U, G, C>(
    users: &UserService<U, G>,
    _films: &FilmService<F, U, G, C>,
) where
    F: EntityStore<Film>,
    U: EntityStore<User>,
    G: RelationGraph,
    C: CatalogRepository,
{
    let a = users.create_user(user("neo")).unwrap().id.unwrap();

    let err = users.add_friend(a, a).unwrap_err();
    assert!(matches!(err, ServiceError::SelfFriendship(id) if id == a));
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(users.friend_ids(a).unwrap().is_empty());

    // Rejected even when the user does not exist.
    let err = users.add_friend(999, 999).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

fn missing_references_are_not_found<F, U, G, C>(
    users: &UserService<U, G>,
    films: &FilmService<F, U, G, C>,
) where
    F: EntityStore<Film>,
    U: EntityStore<User>,
    G: RelationGraph,
    C: CatalogRepository,
{
    let err = users.get_user_by_id(999).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::NotFound {
            kind: EntityKind::User,
            id: 999
        }
    ));
    assert_eq!(films.get_film_by_id(999).unwrap_err().kind(), ErrorKind::NotFound);

    let a = users.create_user(user("neo")).unwrap().id.unwrap();
    let m = films.create_film(matrix()).unwrap().id.unwrap();

    let err = films.add_like(999, a).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::NotFound {
            kind: EntityKind::Film,
            id: 999
        }
    ));
    let err = films.add_like(m, 999).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::NotFound {
            kind: EntityKind::User,
            id: 999
        }
    ));
    assert_eq!(films.like_count_for(m).unwrap(), 0);

    assert_eq!(users.add_friend(a, 999).unwrap_err().kind(), ErrorKind::NotFound);
    assert_eq!(users.remove_friend(999, a).unwrap_err().kind(), ErrorKind::NotFound);
    assert_eq!(users.friend_ids(999).unwrap_err().kind(), ErrorKind::NotFound);
    assert_eq!(
        users.common_friend_ids(a, 999).unwrap_err().kind(),
        ErrorKind::NotFound
    );
    assert!(users.friend_ids(a).unwrap().is_empty());
}

fn updates_of_missing_entities_are_not_found<F, U, G, C>(
    users: &UserService<U, G>,
    films: &FilmService<F, U, G, C>,
) where
    F: EntityStore<Film>,
    U: EntityStore<User>,
    G: RelationGraph,
    C: CatalogRepository,
{
    let mut ghost = user("ghost");
    ghost.id = Some(42);
    assert_eq!(users.update_user(ghost).unwrap_err().kind(), ErrorKind::NotFound);

    let mut ghost_film = matrix();
    ghost_film.id = Some(42);
    assert_eq!(films.update_film(ghost_film).unwrap_err().kind(), ErrorKind::NotFound);

    let err = users.update_user(user("anonymous")).unwrap_err();
    assert!(matches!(err, ServiceError::MissingId(EntityKind::User)));
    assert!(users.list_users().unwrap().is_empty());
}

fn create_rejects_preassigned_ids_and_invalid_fields<F, U, G, C>(
    users: &UserService<U, G>,
    films: &FilmService<F, U, G, C>,
) where
    F: EntityStore<Film>,
    U: EntityStore<User>,
    G: RelationGraph,
    C: CatalogRepository,
{
    let mut preassigned = user("neo");
    preassigned.id = Some(7);
    assert_eq!(users.create_user(preassigned).unwrap_err().kind(), ErrorKind::Validation);

    let err = users.create_user(User::new("neo.example.com", "neo")).unwrap_err();
    assert!(matches!(err, ServiceError::InvalidUser(_)));

    let err = films
        .create_film(Film::new("Early", date(1895, 12, 27), 1, 1))
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidFilm(_)));

    assert!(users.list_users().unwrap().is_empty());
    assert!(films.list_films().unwrap().is_empty());
}

fn display_name_defaults_to_login<F, U, G, C>(
    users: &UserService<U, G>,
    _films: &FilmService<F, U, G, C>,
) where
    F: EntityStore<Film>,
    U: EntityStore<User>,
    G: RelationGraph,
    C: CatalogRepository,
{
    let created = users.create_user(user("neo")).unwrap();
    assert_eq!(created.name, "neo");

    let named = users.create_user(user("trinity").with_name("Trinity")).unwrap();
    assert_eq!(named.name, "Trinity");

    let mut renamed = user("the_one").with_name("  ");
    renamed.id = created.id;
    let updated = users.update_user(renamed).unwrap();
    assert_eq!(updated.name, "the_one");
    assert_eq!(users.get_user_by_id(created.id.unwrap()).unwrap(), updated);
}

fn popular_films_rank_and_limit<F, U, G, C>(
    users: &UserService<U, G>,
    films: &FilmService<F, U, G, C>,
) where
    F: EntityStore<Film>,
    U: EntityStore<User>,
    G: RelationGraph,
    C: CatalogRepository,
{
    let first = films.create_film(film("first")).unwrap().id.unwrap();
    let second = films.create_film(film("second")).unwrap().id.unwrap();
    let third = films.create_film(film("third")).unwrap().id.unwrap();
    let a = users.create_user(user("neo")).unwrap().id.unwrap();
    let b = users.create_user(user("trinity")).unwrap().id.unwrap();

    films.add_like(third, a).unwrap();
    films.add_like(third, b).unwrap();
    films.add_like(second, a).unwrap();

    let ids = |list: Vec<Film>| list.into_iter().filter_map(|f| f.id).collect::<Vec<_>>();
    assert_eq!(ids(films.popular_films(None).unwrap()), vec![third, second, first]);
    assert_eq!(ids(films.popular_films(Some(2)).unwrap()), vec![third, second]);
    assert_eq!(ids(films.popular_films(Some(50)).unwrap()).len(), 3);

    for bad in [0, -1] {
        let err = films.popular_films(Some(bad)).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidLimit(value) if value == bad));
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}

fn catalog_lookups_and_film_details<F, U, G, C>(
    users: &UserService<U, G>,
    films: &FilmService<F, U, G, C>,
) where
    F: EntityStore<Film>,
    U: EntityStore<User>,
    G: RelationGraph,
    C: CatalogRepository,
{
    assert_eq!(films.list_ratings().unwrap().len(), 5);
    assert_eq!(films.list_genres().unwrap().len(), 6);
    assert_eq!(films.rating_by_id(3).unwrap().name, "PG-13");
    assert_eq!(films.genre_by_id(2).unwrap().name, "Drama");
    assert_eq!(films.rating_by_id(99).unwrap_err().kind(), ErrorKind::NotFound);
    assert!(matches!(
        films.genre_by_id(99).unwrap_err(),
        ServiceError::NotFound {
            kind: EntityKind::Genre,
            id: 99
        }
    ));

    let err = films
        .create_film(Film::new("Unrated", date(2000, 1, 1), 90, 99))
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::NotFound {
            kind: EntityKind::Rating,
            id: 99
        }
    ));
    let err = films.create_film(matrix().with_genres([1, 42])).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(films.list_films().unwrap().is_empty());

    let m = films
        .create_film(matrix().with_genres([6, 4]))
        .unwrap()
        .id
        .unwrap();
    let a = users.create_user(user("neo")).unwrap().id.unwrap();
    films.add_like(m, a).unwrap();

    let details = films.film_details(m).unwrap();
    assert_eq!(details.rating.name, "G");
    assert_eq!(
        details
            .genres
            .iter()
            .map(|genre| genre.name.as_str())
            .collect::<Vec<_>>(),
        vec!["Thriller", "Action"]
    );
    assert_eq!(details.like_count, 1);
    assert_eq!(details.liked_by, vec![a]);

    let json = serde_json::to_value(&details).unwrap();
    assert_eq!(json["name"], "Matrix");
    assert_eq!(json["mpa"], 1);
    assert_eq!(json["mpa_details"]["name"], "G");
    assert_eq!(json["like_count"], 1);
}

macro_rules! service_scenarios {
    ($($scenario:ident),* $(,)?) => {
        mod in_memory_services {
            use filmorate_core::{
                Film, FilmService, InMemoryRelationGraph, InMemoryStore, StaticCatalog, User,
                UserService,
            };

            $(
                #[test]
                fn $scenario() {
                    let film_store = InMemoryStore::<Film>::new();
                    let user_store = InMemoryStore::<User>::new();
                    let graph = InMemoryRelationGraph::new();
                    let users = UserService::new(&user_store, &graph);
                    let films = FilmService::new(&film_store, &user_store, &graph, StaticCatalog);
                    super::$scenario(&users, &films);
                }
            )*
        }

        mod sqlite_services {
            use filmorate_core::db::open_db_in_memory;
            use filmorate_core::{
                FilmService, SqliteCatalogRepository, SqliteFilmStore, SqliteRelationGraph,
                SqliteUserStore, UserService,
            };

            $(
                #[test]
                fn $scenario() {
                    let conn = open_db_in_memory().unwrap();
                    let film_store = SqliteFilmStore::try_new(&conn).unwrap();
                    let user_store = SqliteUserStore::try_new(&conn).unwrap();
                    let graph = SqliteRelationGraph::try_new(&conn).unwrap();
                    let catalog = SqliteCatalogRepository::try_new(&conn).unwrap();
                    let users = UserService::new(&user_store, &graph);
                    let films = FilmService::new(&film_store, &user_store, &graph, catalog);
                    super::$scenario(&users, &films);
                }
            )*
        }
    };
}

service_scenarios!(
    matrix_scenario,
    self_friendship_is_a_validation_error,
    missing_references_are_not_found,
    updates_of_missing_entities_are_not_found,
    create_rejects_preassigned_ids_and_invalid_fields,
    display_name_defaults_to_login,
    popular_films_rank_and_limit,
    catalog_lookups_and_film_details,
);

#[test]
fn configured_default_limit_applies_when_none_is_given() {
    use filmorate_core::{InMemoryRelationGraph, InMemoryStore, StaticCatalog};

    let film_store = InMemoryStore::<Film>::new();
    let user_store = InMemoryStore::<User>::new();
    let graph = InMemoryRelationGraph::new();
    let films = FilmService::new(&film_store, &user_store, &graph, StaticCatalog)
        .with_popular_default_limit(2);
    for n in 0..5 {
        films.create_film(film(&format!("film{n}"))).unwrap();
    }

    assert_eq!(films.popular_films(None).unwrap().len(), 2);
    assert_eq!(films.popular_films(Some(4)).unwrap().len(), 4);
}
