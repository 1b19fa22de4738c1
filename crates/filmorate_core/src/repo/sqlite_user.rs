//! SQLite-backed user store.
//!
//! # Invariants
//! - `find_all` returns users in ascending identity order.
//! - Identity comes from `AUTOINCREMENT` and is never reused.

use crate::model::entity::{Entity, EntityId};
use crate::model::user::{User, UserId};
use crate::repo::entity_store::EntityStore;
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::schema::ensure_connection_ready;
use rusqlite::{params, Connection, OptionalExtension, Row};

const USER_SELECT_SQL: &str = "SELECT
    id,
    email,
    login,
    name,
    birthday
FROM users";

/// User store over a migrated connection.
pub struct SqliteUserStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserStore<'conn> {
    /// Constructs a store from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["users"])?;
        Ok(Self { conn })
    }
}

impl EntityStore<User> for SqliteUserStore<'_> {
    fn create(&self, mut user: User) -> RepoResult<User> {
        if let Some(id) = user.id {
            return Err(RepoError::IdAlreadyAssigned {
                kind: User::KIND,
                id,
            });
        }

        let id: UserId = self.conn.query_row(
            "INSERT INTO users (email, login, name, birthday)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING id;",
            params![
                user.email.as_str(),
                user.login.as_str(),
                user.name.as_str(),
                user.birthday,
            ],
            |row| row.get(0),
        )?;

        user.assign_id(id);
        Ok(user)
    }

    fn update(&self, user: User) -> RepoResult<User> {
        let id = user.id.ok_or(RepoError::MissingId(User::KIND))?;

        let changed = self.conn.execute(
            "UPDATE users
             SET
                email = ?1,
                login = ?2,
                name = ?3,
                birthday = ?4
             WHERE id = ?5;",
            params![
                user.email.as_str(),
                user.login.as_str(),
                user.name.as_str(),
                user.birthday,
                id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                kind: User::KIND,
                id,
            });
        }

        Ok(user)
    }

    fn find_by_id(&self, id: EntityId) -> RepoResult<Option<User>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_user_row(row)?));
        }

        Ok(None)
    }

    fn exists_by_id(&self, id: EntityId) -> RepoResult<bool> {
        let found = self
            .conn
            .query_row("SELECT 1 FROM users WHERE id = ?1;", [id], |_| Ok(()))
            .optional()?;
        Ok(found.is_some())
    }

    fn find_all(&self) -> RepoResult<Vec<User>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut users = Vec::new();
        while let Some(row) = rows.next()? {
            users.push(parse_user_row(row)?);
        }

        Ok(users)
    }
}

fn parse_user_row(row: &Row<'_>) -> RepoResult<User> {
    Ok(User {
        id: Some(row.get("id")?),
        email: row.get("email")?,
        login: row.get("login")?,
        name: row.get("name")?,
        birthday: row.get("birthday")?,
    })
}
