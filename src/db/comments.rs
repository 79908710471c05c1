use rusqlite::{params, OptionalExtension, TransactionBehavior};

use crate::db::models::{CommentWithAuthor, NewComment};
use crate::db::{DbError, DbResult};
use crate::state::DbPool;

/// Comments on a post in the order they were written.
pub fn get_comments_for_post(db: &DbPool, post_id: i64) -> DbResult<Vec<CommentWithAuthor>> {
    let conn = db.get()?;
    let mut stmt = conn.prepare(&format!(
        "{} WHERE c.post_id = ?1 ORDER BY c.created_at ASC, c.id ASC",
        CommentWithAuthor::SELECT
    ))?;
    let comments = stmt
        .query_map(params![post_id], CommentWithAuthor::from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(comments)
}

/// Add a comment and return it with its author fields.
///
/// A reply's parent must be a comment on the same post; anything else is
/// rejected with [`DbError::ParentMismatch`] before the insert.
pub fn add_comment(db: &DbPool, comment: &NewComment) -> DbResult<CommentWithAuthor> {
    let mut conn = db.get()?;
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    if let Some(parent_id) = comment.parent_id {
        let parent_post: Option<i64> = tx
            .query_row(
                "SELECT post_id FROM comments WHERE id = ?1",
                params![parent_id],
                |row| row.get(0),
            )
            .optional()?;
        if parent_post != Some(comment.post_id) {
            return Err(DbError::ParentMismatch {
                parent_id,
                post_id: comment.post_id,
            });
        }
    }

    tx.execute(
        "INSERT INTO comments (content, post_id, user_id, parent_id) VALUES (?1, ?2, ?3, ?4)",
        params![
            comment.content,
            comment.post_id,
            comment.user_id,
            comment.parent_id
        ],
    )?;
    let id = tx.last_insert_rowid();

    let created = tx.query_row(
        &format!("{} WHERE c.id = ?1", CommentWithAuthor::SELECT),
        params![id],
        CommentWithAuthor::from_row,
    )?;
    tx.commit()?;
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::fixtures::*;

    fn comment(post_id: i64, user_id: i64, content: &str, parent_id: Option<i64>) -> NewComment {
        NewComment {
            content: content.to_string(),
            post_id,
            user_id,
            parent_id,
        }
    }

    #[test]
    fn comments_come_back_in_writing_order() {
        let pool = test_pool();
        let ada = user(&pool, "ada");
        let bob = user(&pool, "bob");
        let p = post(&pool, ada.id, "p", Some("2024-01-01T00:00:00.000Z"));

        let first = add_comment(&pool, &comment(p.id, bob.id, "first", None)).unwrap();
        let second = add_comment(&pool, &comment(p.id, ada.id, "second", None)).unwrap();

        assert_eq!(first.user_username, "bob");
        assert_eq!(first.content, "first");

        let ids: Vec<i64> = get_comments_for_post(&pool, p.id)
            .unwrap()
            .iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec![first.id, second.id]);
    }

    #[test]
    fn replies_keep_their_parent() {
        let pool = test_pool();
        let ada = user(&pool, "ada");
        let p = post(&pool, ada.id, "p", None);
        let root = add_comment(&pool, &comment(p.id, ada.id, "root", None)).unwrap();
        let reply = add_comment(&pool, &comment(p.id, ada.id, "reply", Some(root.id))).unwrap();
        assert_eq!(reply.parent_id, Some(root.id));
    }

    #[test]
    fn reply_to_comment_on_other_post_is_rejected() {
        let pool = test_pool();
        let ada = user(&pool, "ada");
        let p1 = post(&pool, ada.id, "p1", None);
        let p2 = post(&pool, ada.id, "p2", None);
        let root = add_comment(&pool, &comment(p1.id, ada.id, "root", None)).unwrap();

        let err = add_comment(&pool, &comment(p2.id, ada.id, "stray", Some(root.id))).unwrap_err();
        assert!(matches!(err, DbError::ParentMismatch { .. }));

        let err = add_comment(&pool, &comment(p2.id, ada.id, "ghost", Some(999))).unwrap_err();
        assert!(matches!(err, DbError::ParentMismatch { .. }));

        assert!(get_comments_for_post(&pool, p2.id).unwrap().is_empty());
    }

    #[test]
    fn comment_on_missing_post_fails() {
        let pool = test_pool();
        let ada = user(&pool, "ada");
        assert!(add_comment(&pool, &comment(404, ada.id, "x", None)).is_err());
    }
}
