use rusqlite::{params, OptionalExtension, TransactionBehavior};

use crate::db::models::{NewTag, Tag, TagWithCount};
use crate::db::{insert_link, DbResult, LinkOutcome};
use crate::state::DbPool;

/// Tags that have at least one published post, with that count.
///
/// Ordered by name; popularity ordering is left to the caller
/// (see [`sort_by_post_count`]).
pub fn get_all_tags(db: &DbPool) -> DbResult<Vec<TagWithCount>> {
    let conn = db.get()?;
    let mut stmt = conn.prepare(
        "SELECT t.id, t.name, t.slug, t.description, t.color, COUNT(p.id) AS post_count
         FROM tags t
         LEFT JOIN post_tags pt ON t.id = pt.tag_id
         LEFT JOIN posts p ON pt.post_id = p.id AND p.is_published = 1
         GROUP BY t.id
         HAVING post_count > 0
         ORDER BY t.name ASC",
    )?;
    let tags = stmt
        .query_map([], |row| {
            Ok(TagWithCount {
                id: row.get(0)?,
                name: row.get(1)?,
                slug: row.get(2)?,
                description: row.get(3)?,
                color: row.get(4)?,
                post_count: row.get(5)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(tags)
}

/// Most-used tags first. Ties keep their incoming order.
pub fn sort_by_post_count(tags: &mut [TagWithCount]) {
    tags.sort_by(|a, b| b.post_count.cmp(&a.post_count));
}

pub fn get_tag_by_slug(db: &DbPool, slug: &str) -> DbResult<Option<Tag>> {
    let conn = db.get()?;
    let tag = conn
        .query_row(
            &format!("SELECT {} FROM tags WHERE slug = ?1", Tag::COLUMNS),
            params![slug],
            Tag::from_row,
        )
        .optional()?;
    Ok(tag)
}

pub fn get_tags_for_post(db: &DbPool, post_id: i64) -> DbResult<Vec<Tag>> {
    let conn = db.get()?;
    let mut stmt = conn.prepare(
        "SELECT t.id, t.name, t.slug, t.description, t.color, t.created_at
         FROM tags t
         JOIN post_tags pt ON pt.tag_id = t.id
         WHERE pt.post_id = ?1
         ORDER BY t.name ASC",
    )?;
    let tags = stmt
        .query_map(params![post_id], Tag::from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(tags)
}

pub fn create_tag(db: &DbPool, tag: &NewTag) -> DbResult<Tag> {
    let mut conn = db.get()?;
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    tx.execute(
        "INSERT INTO tags (name, slug, description, color) VALUES (?1, ?2, ?3, ?4)",
        params![tag.name, tag.slug, tag.description, tag.color],
    )?;
    let id = tx.last_insert_rowid();

    let created = tx.query_row(
        &format!("SELECT {} FROM tags WHERE id = ?1", Tag::COLUMNS),
        params![id],
        Tag::from_row,
    )?;
    tx.commit()?;
    Ok(created)
}

pub fn tag_post(db: &DbPool, post_id: i64, tag_id: i64) -> DbResult<LinkOutcome> {
    insert_link(
        db,
        "INSERT INTO post_tags (post_id, tag_id) VALUES (?1, ?2)",
        params![post_id, tag_id],
    )
}
