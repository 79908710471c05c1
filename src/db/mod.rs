pub mod comments;
pub mod follows;
pub mod models;
pub mod posts;
pub mod reactions;
pub mod tags;
pub mod users;
pub mod views;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, Params};
use serde::Serialize;
use std::path::Path;

use crate::state::DbPool;

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("Pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("SQL error: {0}")]
    Sql(#[from] rusqlite::Error),

    #[error("Schema file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Comment {parent_id} does not belong to post {post_id}")]
    ParentMismatch { parent_id: i64, post_id: i64 },
}

impl DbError {
    /// True when the statement hit a primary-key or unique constraint,
    /// e.g. a second post with an existing slug.
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, DbError::Sql(e) if is_unique_violation(e))
    }
}

pub type DbResult<T> = Result<T, DbError>;

/// Result of inserting a row into one of the relationship tables
/// (likes, bookmarks, follows, post tags).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkOutcome {
    Created,
    /// The pair was already linked; nothing was written.
    AlreadyExists,
}

impl LinkOutcome {
    pub fn is_created(self) -> bool {
        matches!(self, LinkOutcome::Created)
    }
}

/// Per-connection setup. Runs for every connection the pool opens so
/// foreign keys (and their cascades) are always enforced.
fn init_connection(conn: &mut Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "
        PRAGMA foreign_keys = ON;
        PRAGMA busy_timeout = 5000;
        PRAGMA synchronous = NORMAL;
        ",
    )
}

pub fn create_pool(db_path: &Path) -> DbResult<DbPool> {
    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let manager = SqliteConnectionManager::file(db_path).with_init(init_connection);
    let pool = Pool::builder().max_size(8).build(manager)?;

    // journal_mode is persistent on the database file, so once is enough
    let conn = pool.get()?;
    conn.execute_batch("PRAGMA journal_mode = WAL;")?;

    Ok(pool)
}

/// A single-connection pool over a private in-memory database.
pub fn create_memory_pool() -> DbResult<DbPool> {
    let manager = SqliteConnectionManager::memory().with_init(init_connection);
    Ok(Pool::builder().max_size(1).build(manager)?)
}

/// Whether the schema has been applied, judged by the presence of `users`.
pub fn schema_applied(pool: &DbPool) -> DbResult<bool> {
    let conn = pool.get()?;
    let exists: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type = 'table' AND name = 'users'",
        [],
        |row| row.get(0),
    )?;
    Ok(exists)
}

/// Execute a schema definition verbatim.
///
/// There is no version tracking: the shipped schema uses plain
/// `CREATE TABLE`, so applying it to a populated database fails with
/// an "already exists" error.
pub fn apply_schema(pool: &DbPool, sql: &str) -> DbResult<()> {
    let conn = pool.get()?;
    conn.execute_batch(sql)?;
    Ok(())
}

/// Read a schema file from disk and apply it.
pub fn run_schema_file(pool: &DbPool, path: &Path) -> DbResult<()> {
    let sql = std::fs::read_to_string(path)?;
    tracing::info!("Applying schema from {}", path.display());
    apply_schema(pool, &sql)?;
    tracing::info!("Schema applied");
    Ok(())
}

/// Insert a relationship row, mapping a primary-key or unique violation to
/// `LinkOutcome::AlreadyExists`. Every other failure propagates, including
/// foreign-key violations for posts or users that do not exist.
pub(crate) fn insert_link<P: Params>(pool: &DbPool, sql: &str, params: P) -> DbResult<LinkOutcome> {
    let conn = pool.get()?;
    match conn.execute(sql, params) {
        Ok(_) => Ok(LinkOutcome::Created),
        Err(e) if is_unique_violation(&e) => Ok(LinkOutcome::AlreadyExists),
        Err(e) => Err(e.into()),
    }
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(e, _) => {
            e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                || e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
        }
        _ => false,
    }
}

/// Delete a relationship row. Returns whether a row was actually removed.
pub(crate) fn delete_link<P: Params>(pool: &DbPool, sql: &str, params: P) -> DbResult<bool> {
    let conn = pool.get()?;
    let rows = conn.execute(sql, params)?;
    Ok(rows > 0)
}

pub(crate) fn link_exists<P: Params>(pool: &DbPool, sql: &str, params: P) -> DbResult<bool> {
    let conn = pool.get()?;
    let exists: bool = conn.query_row(sql, params, |row| row.get(0))?;
    Ok(exists)
}

/// Timestamp format used for `published_at` when the caller doesn't supply one.
pub(crate) fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
