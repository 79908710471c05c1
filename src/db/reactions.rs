// Likes and bookmarks: one row per (post, user) pair.
use rusqlite::params;

use crate::db::models::{BookmarkedPost, PostSummary};
use crate::db::{delete_link, insert_link, link_exists, DbResult, LinkOutcome};
use crate::state::DbPool;

pub fn like_post(db: &DbPool, post_id: i64, user_id: i64) -> DbResult<LinkOutcome> {
    insert_link(
        db,
        "INSERT INTO post_likes (post_id, user_id) VALUES (?1, ?2)",
        params![post_id, user_id],
    )
}

pub fn unlike_post(db: &DbPool, post_id: i64, user_id: i64) -> DbResult<bool> {
    delete_link(
        db,
        "DELETE FROM post_likes WHERE post_id = ?1 AND user_id = ?2",
        params![post_id, user_id],
    )
}

pub fn has_user_liked_post(db: &DbPool, post_id: i64, user_id: i64) -> DbResult<bool> {
    link_exists(
        db,
        "SELECT EXISTS(SELECT 1 FROM post_likes WHERE post_id = ?1 AND user_id = ?2)",
        params![post_id, user_id],
    )
}

pub fn bookmark_post(db: &DbPool, post_id: i64, user_id: i64) -> DbResult<LinkOutcome> {
    insert_link(
        db,
        "INSERT INTO post_bookmarks (post_id, user_id) VALUES (?1, ?2)",
        params![post_id, user_id],
    )
}

pub fn remove_bookmark(db: &DbPool, post_id: i64, user_id: i64) -> DbResult<bool> {
    delete_link(
        db,
        "DELETE FROM post_bookmarks WHERE post_id = ?1 AND user_id = ?2",
        params![post_id, user_id],
    )
}

pub fn has_user_bookmarked_post(db: &DbPool, post_id: i64, user_id: i64) -> DbResult<bool> {
    link_exists(
        db,
        "SELECT EXISTS(SELECT 1 FROM post_bookmarks WHERE post_id = ?1 AND user_id = ?2)",
        params![post_id, user_id],
    )
}

/// Published posts the user has bookmarked, most recent bookmark first.
pub fn get_bookmarked_posts(db: &DbPool, user_id: i64) -> DbResult<Vec<BookmarkedPost>> {
    let conn = db.get()?;
    let mut stmt = conn.prepare(&format!(
        "{}, pb.created_at AS bookmarked_at
         FROM post_bookmarks pb
         JOIN posts p ON pb.post_id = p.id
         JOIN users u ON p.user_id = u.id
         WHERE pb.user_id = ?1 AND p.is_published = 1
         ORDER BY pb.created_at DESC, pb.rowid DESC",
        PostSummary::SELECT
    ))?;
    let posts = stmt
        .query_map(params![user_id], |row| {
            Ok(BookmarkedPost {
                post: PostSummary::from_row(row)?,
                bookmarked_at: row.get("bookmarked_at")?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(posts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::fixtures::*;
    use crate::db::posts::get_post_by_slug;

    #[test]
    fn liking_twice_counts_once() {
        let pool = test_pool();
        let ada = user(&pool, "ada");
        let bob = user(&pool, "bob");
        let p = post(&pool, ada.id, "p", Some("2024-01-01T00:00:00.000Z"));

        assert!(like_post(&pool, p.id, bob.id).unwrap().is_created());
        assert!(!like_post(&pool, p.id, bob.id).unwrap().is_created());
        assert!(has_user_liked_post(&pool, p.id, bob.id).unwrap());

        let detail = get_post_by_slug(&pool, "p").unwrap().unwrap();
        assert_eq!(detail.like_count, 1);
    }

    #[test]
    fn unlike_reports_whether_anything_changed() {
        let pool = test_pool();
        let ada = user(&pool, "ada");
        let p = post(&pool, ada.id, "p", None);

        assert!(!unlike_post(&pool, p.id, ada.id).unwrap());
        like_post(&pool, p.id, ada.id).unwrap();
        assert!(unlike_post(&pool, p.id, ada.id).unwrap());
        assert!(!has_user_liked_post(&pool, p.id, ada.id).unwrap());
        // The pair can be liked again after removal
        assert_eq!(like_post(&pool, p.id, ada.id).unwrap(), LinkOutcome::Created);
    }

    #[test]
    fn liking_a_missing_post_is_an_error() {
        let pool = test_pool();
        let ada = user(&pool, "ada");
        assert!(like_post(&pool, 12345, ada.id).is_err());
    }

    #[test]
    fn bookmarks_toggle_and_list() {
        let pool = test_pool();
        let ada = user(&pool, "ada");
        let bob = user(&pool, "bob");
        let live = post(&pool, ada.id, "live", Some("2024-01-01T00:00:00.000Z"));
        let other = post(&pool, ada.id, "other", Some("2024-02-01T00:00:00.000Z"));
        let draft = post(&pool, ada.id, "draft", None);

        assert_eq!(bookmark_post(&pool, live.id, bob.id).unwrap(), LinkOutcome::Created);
        assert_eq!(
            bookmark_post(&pool, live.id, bob.id).unwrap(),
            LinkOutcome::AlreadyExists
        );
        bookmark_post(&pool, other.id, bob.id).unwrap();
        bookmark_post(&pool, draft.id, bob.id).unwrap();
        assert!(has_user_bookmarked_post(&pool, live.id, bob.id).unwrap());

        let ids: Vec<i64> = get_bookmarked_posts(&pool, bob.id)
            .unwrap()
            .iter()
            .map(|b| b.post.id)
            .collect();
        // Drafts are excluded; the later bookmark comes first
        assert_eq!(ids, vec![other.id, live.id]);

        assert!(remove_bookmark(&pool, live.id, bob.id).unwrap());
        assert!(!remove_bookmark(&pool, live.id, bob.id).unwrap());
        assert!(!has_user_bookmarked_post(&pool, live.id, bob.id).unwrap());
    }
}
