use rusqlite::{params, TransactionBehavior};

use crate::db::models::NewPostView;
use crate::db::DbResult;
use crate::state::DbPool;

/// Append a view to the log and bump the post's `view_count`.
///
/// Both writes commit together, so `view_count` always equals the number
/// of logged views for the post.
pub fn record_post_view(db: &DbPool, view: &NewPostView) -> DbResult<()> {
    let mut conn = db.get()?;
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    tx.execute(
        "INSERT INTO post_views (post_id, user_id, ip_address, user_agent, referrer)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            view.post_id,
            view.user_id,
            view.ip_address,
            view.user_agent,
            view.referrer
        ],
    )?;
    tx.execute(
        "UPDATE posts SET view_count = view_count + 1 WHERE id = ?1",
        params![view.post_id],
    )?;

    tx.commit()?;
    Ok(())
}

/// Number of logged views for a post.
pub fn count_post_views(db: &DbPool, post_id: i64) -> DbResult<i64> {
    let conn = db.get()?;
    let count = conn.query_row(
        "SELECT COUNT(*) FROM post_views WHERE post_id = ?1",
        params![post_id],
        |row| row.get(0),
    )?;
    Ok(count)
}
