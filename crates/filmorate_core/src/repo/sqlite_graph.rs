//! SQLite-backed `RelationGraph`.
//!
//! # Invariants
//! - `likes` rows are keyed by `(film_id, user_id)`; inserts use
//!   `INSERT OR IGNORE`, so re-adding a like is a no-op.
//! - A friendship is two directed `friends` rows, inserted or deleted
//!   together in one IMMEDIATE transaction. A user's friend count is the
//!   number of rows with that `user_id`, so nothing is double counted.
//! - Foreign keys reject edges that reference missing films or users.

use crate::model::film::FilmId;
use crate::model::user::UserId;
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::relation_graph::RelationGraph;
use crate::repo::schema::ensure_connection_ready;
use rusqlite::{params, Connection, Transaction, TransactionBehavior};
use std::collections::BTreeMap;

/// Relation graph over the `likes` and `friends` tables.
pub struct SqliteRelationGraph<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRelationGraph<'conn> {
    /// Constructs a graph from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["likes", "friends"])?;
        Ok(Self { conn })
    }

    fn query_ids(&self, sql: &str, args: impl rusqlite::Params) -> RepoResult<Vec<i64>> {
        let mut stmt = self.conn.prepare(sql)?;
        let ids = stmt
            .query_map(args, |row| row.get::<_, i64>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ids)
    }
}

impl RelationGraph for SqliteRelationGraph<'_> {
    fn add_like(&self, film_id: FilmId, user_id: UserId) -> RepoResult<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO likes (film_id, user_id) VALUES (?1, ?2);",
            params![film_id, user_id],
        )?;
        Ok(())
    }

    fn remove_like(&self, film_id: FilmId, user_id: UserId) -> RepoResult<()> {
        self.conn.execute(
            "DELETE FROM likes WHERE film_id = ?1 AND user_id = ?2;",
            params![film_id, user_id],
        )?;
        Ok(())
    }

    fn like_count_for(&self, film_id: FilmId) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM likes WHERE film_id = ?1;",
            [film_id],
            |row| row.get(0),
        )?;
        count_to_u64(count)
    }

    fn like_counts(&self) -> RepoResult<BTreeMap<FilmId, u64>> {
        let mut stmt = self.conn.prepare(
            "SELECT film_id, COUNT(*)
             FROM likes
             GROUP BY film_id;",
        )?;
        let mut rows = stmt.query([])?;
        let mut counts = BTreeMap::new();
        while let Some(row) = rows.next()? {
            let film_id: FilmId = row.get(0)?;
            counts.insert(film_id, count_to_u64(row.get(1)?)?);
        }
        Ok(counts)
    }

    fn likers_of(&self, film_id: FilmId) -> RepoResult<Vec<UserId>> {
        self.query_ids(
            "SELECT user_id FROM likes WHERE film_id = ?1 ORDER BY user_id ASC;",
            [film_id],
        )
    }

    fn add_friend(&self, user_id: UserId, other_user_id: UserId) -> RepoResult<()> {
        if user_id == other_user_id {
            return Err(RepoError::SelfFriendship(user_id));
        }

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        {
            let mut insert = tx.prepare(
                "INSERT OR IGNORE INTO friends (user_id, friend_id) VALUES (?1, ?2);",
            )?;
            insert.execute(params![user_id, other_user_id])?;
            insert.execute(params![other_user_id, user_id])?;
        }
        tx.commit()?;
        Ok(())
    }

    fn remove_friend(&self, user_id: UserId, other_user_id: UserId) -> RepoResult<()> {
        self.conn.execute(
            "DELETE FROM friends
             WHERE (user_id = ?1 AND friend_id = ?2)
                OR (user_id = ?2 AND friend_id = ?1);",
            params![user_id, other_user_id],
        )?;
        Ok(())
    }

    fn friends_of(&self, user_id: UserId) -> RepoResult<Vec<UserId>> {
        self.query_ids(
            "SELECT friend_id
             FROM friends
             WHERE user_id = ?1
               AND friend_id <> user_id
             ORDER BY friend_id ASC;",
            [user_id],
        )
    }

    fn common_friends(&self, user_id: UserId, other_id: UserId) -> RepoResult<Vec<UserId>> {
        self.query_ids(
            "SELECT mine.friend_id
             FROM friends mine
             INNER JOIN friends theirs ON theirs.friend_id = mine.friend_id
             WHERE mine.user_id = ?1
               AND theirs.user_id = ?2
             ORDER BY mine.friend_id ASC;",
            params![user_id, other_id],
        )
    }
}

fn count_to_u64(count: i64) -> RepoResult<u64> {
    u64::try_from(count)
        .map_err(|_| RepoError::InvalidData(format!("negative row count `{count}`")))
}
