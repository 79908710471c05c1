use rusqlite::{params, OptionalExtension, TransactionBehavior};

use crate::db::models::{NewUser, User, UserProfile};
use crate::db::DbResult;
use crate::state::DbPool;

/// List every user, newest first.
pub fn get_all_users(db: &DbPool) -> DbResult<Vec<User>> {
    let conn = db.get()?;
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM users ORDER BY id DESC",
        User::COLUMNS
    ))?;
    let users = stmt
        .query_map([], User::from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(users)
}

pub fn get_user_by_id(db: &DbPool, id: i64) -> DbResult<Option<User>> {
    let conn = db.get()?;
    let user = conn
        .query_row(
            &format!("SELECT {} FROM users WHERE id = ?1", User::COLUMNS),
            params![id],
            User::from_row,
        )
        .optional()?;
    Ok(user)
}

pub fn get_user_by_email(db: &DbPool, email: &str) -> DbResult<Option<User>> {
    let conn = db.get()?;
    let user = conn
        .query_row(
            &format!("SELECT {} FROM users WHERE email = ?1", User::COLUMNS),
            params![email],
            User::from_row,
        )
        .optional()?;
    Ok(user)
}

/// Profile lookup for the author page. Only published posts count
/// towards `post_count`.
pub fn get_user_by_username(db: &DbPool, username: &str) -> DbResult<Option<UserProfile>> {
    let conn = db.get()?;
    let profile = conn
        .query_row(
            "SELECT u.id, u.name, u.username, u.email, u.bio, u.avatar_url,
                    u.cover_image_url, u.website_url, u.twitter_username,
                    u.github_username, u.location, u.joined_at,
                    (SELECT COUNT(*) FROM posts WHERE user_id = u.id AND is_published = 1) AS post_count,
                    (SELECT COUNT(*) FROM user_follows WHERE following_id = u.id) AS follower_count,
                    (SELECT COUNT(*) FROM user_follows WHERE follower_id = u.id) AS following_count
             FROM users u
             WHERE u.username = ?1",
            params![username],
            UserProfile::from_row,
        )
        .optional()?;
    Ok(profile)
}

/// Insert a user and return the stored row. The insert and the read-back
/// share one transaction.
pub fn create_user(db: &DbPool, user: &NewUser) -> DbResult<User> {
    let mut conn = db.get()?;
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    tx.execute(
        "INSERT INTO users (name, username, email, bio, avatar_url, password_hash)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            user.name,
            user.username,
            user.email,
            user.bio,
            user.avatar_url,
            user.password_hash,
        ],
    )?;
    let id = tx.last_insert_rowid();

    let created = tx.query_row(
        &format!("SELECT {} FROM users WHERE id = ?1", User::COLUMNS),
        params![id],
        User::from_row,
    )?;
    tx.commit()?;

    tracing::debug!(user_id = created.id, username = %created.username, "Created user");
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::fixtures::*;
    use crate::db::follows::follow_user;

    #[test]
    fn username_and_email_lookups_agree_with_create() {
        let pool = test_pool();
        let created = create_user(
            &pool,
            &NewUser {
                name: "Ada Lovelace".into(),
                username: "ada".into(),
                email: "ada@example.com".into(),
                bio: Some("First programmer".into()),
                ..Default::default()
            },
        )
        .unwrap();

        let by_email = get_user_by_email(&pool, "ada@example.com").unwrap().unwrap();
        let by_id = get_user_by_id(&pool, created.id).unwrap().unwrap();
        let by_username = get_user_by_username(&pool, "ada").unwrap().unwrap();

        assert_eq!(by_email, created);
        assert_eq!(by_id, created);
        assert_eq!(by_username.id, created.id);
        assert_eq!(by_username.email, created.email);
        assert_eq!(by_username.bio.as_deref(), Some("First programmer"));
        assert!(created.password_hash.is_none());
        assert!(created.joined_at.is_some());
    }

    #[test]
    fn missing_user_is_none() {
        let pool = test_pool();
        assert!(get_user_by_id(&pool, 42).unwrap().is_none());
        assert!(get_user_by_email(&pool, "nobody@example.com").unwrap().is_none());
        assert!(get_user_by_username(&pool, "nobody").unwrap().is_none());
    }

    #[test]
    fn duplicate_username_is_an_error() {
        let pool = test_pool();
        user(&pool, "ada");
        let result = create_user(
            &pool,
            &NewUser {
                name: "Other".into(),
                username: "ada".into(),
                email: "other@example.com".into(),
                ..Default::default()
            },
        );
        assert!(result.is_err());
        assert_eq!(get_all_users(&pool).unwrap().len(), 1);
    }

    #[test]
    fn all_users_newest_first() {
        let pool = test_pool();
        let a = user(&pool, "a");
        let b = user(&pool, "b");
        let ids: Vec<i64> = get_all_users(&pool).unwrap().iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![b.id, a.id]);
    }

    #[test]
    fn profile_counts_published_posts_and_follows() {
        let pool = test_pool();
        let ada = user(&pool, "ada");
        let bob = user(&pool, "bob");
        post(&pool, ada.id, "published", Some("2024-01-01T00:00:00.000Z"));
        post(&pool, ada.id, "draft", None);
        follow_user(&pool, bob.id, ada.id).unwrap();

        let profile = get_user_by_username(&pool, "ada").unwrap().unwrap();
        assert_eq!(profile.post_count, 1);
        assert_eq!(profile.follower_count, 1);
        assert_eq!(profile.following_count, 0);
    }
}
