use rusqlite::params;

use crate::db::models::FollowEdge;
use crate::db::{delete_link, insert_link, link_exists, DbResult, LinkOutcome};
use crate::state::DbPool;

pub fn follow_user(db: &DbPool, follower_id: i64, following_id: i64) -> DbResult<LinkOutcome> {
    insert_link(
        db,
        "INSERT INTO user_follows (follower_id, following_id) VALUES (?1, ?2)",
        params![follower_id, following_id],
    )
}

/// Returns `false` when there was no such follow edge.
pub fn unfollow_user(db: &DbPool, follower_id: i64, following_id: i64) -> DbResult<bool> {
    delete_link(
        db,
        "DELETE FROM user_follows WHERE follower_id = ?1 AND following_id = ?2",
        params![follower_id, following_id],
    )
}

pub fn is_following(db: &DbPool, follower_id: i64, following_id: i64) -> DbResult<bool> {
    link_exists(
        db,
        "SELECT EXISTS(SELECT 1 FROM user_follows WHERE follower_id = ?1 AND following_id = ?2)",
        params![follower_id, following_id],
    )
}

fn query_edges(db: &DbPool, sql: &str, user_id: i64) -> DbResult<Vec<FollowEdge>> {
    let conn = db.get()?;
    let mut stmt = conn.prepare(sql)?;
    let edges = stmt
        .query_map(params![user_id], |row| {
            Ok(FollowEdge {
                id: row.get(0)?,
                name: row.get(1)?,
                username: row.get(2)?,
                avatar_url: row.get(3)?,
                bio: row.get(4)?,
                followed_at: row.get(5)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(edges)
}

/// Users following `user_id`, most recent first.
pub fn get_followers(db: &DbPool, user_id: i64) -> DbResult<Vec<FollowEdge>> {
    query_edges(
        db,
        "SELECT u.id, u.name, u.username, u.avatar_url, u.bio, uf.created_at
         FROM user_follows uf
         JOIN users u ON uf.follower_id = u.id
         WHERE uf.following_id = ?1
         ORDER BY uf.created_at DESC, uf.rowid DESC",
        user_id,
    )
}

/// Users `user_id` follows, most recent first.
pub fn get_following(db: &DbPool, user_id: i64) -> DbResult<Vec<FollowEdge>> {
    query_edges(
        db,
        "SELECT u.id, u.name, u.username, u.avatar_url, u.bio, uf.created_at
         FROM user_follows uf
         JOIN users u ON uf.following_id = u.id
         WHERE uf.follower_id = ?1
         ORDER BY uf.created_at DESC, uf.rowid DESC",
        user_id,
    )
}
