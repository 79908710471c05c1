use rusqlite::{params, OptionalExtension, TransactionBehavior};

use crate::db::models::{NewPost, Post, PostDetail, PostSummary};
use crate::db::{now_timestamp, DbResult};
use crate::state::DbPool;

const FEATURED_LIMIT: i64 = 5;

fn query_summaries<P: rusqlite::Params>(
    db: &DbPool,
    sql: &str,
    params: P,
) -> DbResult<Vec<PostSummary>> {
    let conn = db.get()?;
    let mut stmt = conn.prepare(sql)?;
    let posts = stmt
        .query_map(params, PostSummary::from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(posts)
}

/// Published posts, most recently published first.
pub fn get_all_posts(db: &DbPool) -> DbResult<Vec<PostSummary>> {
    query_summaries(
        db,
        &format!(
            "{} FROM posts p
             JOIN users u ON p.user_id = u.id
             WHERE p.is_published = 1
             ORDER BY p.published_at DESC",
            PostSummary::SELECT
        ),
        [],
    )
}

pub fn get_featured_posts(db: &DbPool) -> DbResult<Vec<PostSummary>> {
    query_summaries(
        db,
        &format!(
            "{} FROM posts p
             JOIN users u ON p.user_id = u.id
             WHERE p.is_published = 1 AND p.is_featured = 1
             ORDER BY p.published_at DESC
             LIMIT ?1",
            PostSummary::SELECT
        ),
        params![FEATURED_LIMIT],
    )
}

pub fn get_posts_by_tag(db: &DbPool, tag_slug: &str) -> DbResult<Vec<PostSummary>> {
    query_summaries(
        db,
        &format!(
            "{} FROM posts p
             JOIN users u ON p.user_id = u.id
             JOIN post_tags pt ON p.id = pt.post_id
             JOIN tags t ON pt.tag_id = t.id
             WHERE t.slug = ?1 AND p.is_published = 1
             ORDER BY p.published_at DESC",
            PostSummary::SELECT
        ),
        params![tag_slug],
    )
}

pub fn get_posts_by_user(db: &DbPool, username: &str) -> DbResult<Vec<PostSummary>> {
    query_summaries(
        db,
        &format!(
            "{} FROM posts p
             JOIN users u ON p.user_id = u.id
             WHERE u.username = ?1 AND p.is_published = 1
             ORDER BY p.published_at DESC",
            PostSummary::SELECT
        ),
        params![username],
    )
}

/// Look up a published post by slug. Drafts are not visible here.
pub fn get_post_by_slug(db: &DbPool, slug: &str) -> DbResult<Option<PostDetail>> {
    let conn = db.get()?;
    let post = conn
        .query_row(
            "SELECT p.id, p.slug, p.title, p.subtitle, p.content, p.content_html, p.excerpt,
                    p.cover_image_url, p.reading_time_minutes, p.is_published, p.is_featured,
                    p.view_count, p.user_id, p.published_at, p.created_at, p.updated_at,
                    u.name AS user_name, u.username AS user_username, u.email AS user_email,
                    u.avatar_url AS user_avatar_url, u.bio AS user_bio,
                    (SELECT COUNT(*) FROM post_likes WHERE post_id = p.id) AS like_count,
                    (SELECT COUNT(*) FROM comments WHERE post_id = p.id) AS comment_count
             FROM posts p
             JOIN users u ON p.user_id = u.id
             WHERE p.slug = ?1 AND p.is_published = 1",
            params![slug],
            PostDetail::from_row,
        )
        .optional()?;
    Ok(post)
}

/// Any post by id, drafts included.
pub fn get_post_by_id(db: &DbPool, id: i64) -> DbResult<Option<Post>> {
    let conn = db.get()?;
    let post = conn
        .query_row(
            &format!("SELECT {} FROM posts WHERE id = ?1", Post::COLUMNS),
            params![id],
            Post::from_row,
        )
        .optional()?;
    Ok(post)
}

/// Insert a post and return the stored row.
///
/// `published_at` is only written for published posts: the caller's value
/// if given, otherwise the current time. Drafts always store NULL.
pub fn create_post(db: &DbPool, post: &NewPost) -> DbResult<Post> {
    let published_at = if post.is_published {
        Some(post.published_at.clone().unwrap_or_else(now_timestamp))
    } else {
        None
    };

    let mut conn = db.get()?;
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    tx.execute(
        "INSERT INTO posts (
            slug, title, subtitle, content, content_html, excerpt, cover_image_url,
            reading_time_minutes, is_published, is_featured, user_id, published_at
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            post.slug,
            post.title,
            post.subtitle,
            post.content,
            post.content_html,
            post.excerpt,
            post.cover_image_url,
            post.reading_time_minutes,
            post.is_published,
            post.is_featured,
            post.user_id,
            published_at,
        ],
    )?;
    let id = tx.last_insert_rowid();

    let created = tx.query_row(
        &format!("SELECT {} FROM posts WHERE id = ?1", Post::COLUMNS),
        params![id],
        Post::from_row,
    )?;
    tx.commit()?;

    tracing::debug!(post_id = created.id, slug = %created.slug, "Created post");
    Ok(created)
}
