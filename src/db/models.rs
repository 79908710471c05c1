use rusqlite::Row;
use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub cover_image_url: Option<String>,
    pub website_url: Option<String>,
    pub twitter_username: Option<String>,
    pub github_username: Option<String>,
    pub location: Option<String>,
    pub joined_at: Option<String>,
    pub last_seen_at: Option<String>,
}

impl User {
    pub(crate) const COLUMNS: &'static str = "id, name, username, email, password_hash, bio, \
        avatar_url, cover_image_url, website_url, twitter_username, github_username, location, \
        joined_at, last_seen_at";

    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(User {
            id: row.get("id")?,
            name: row.get("name")?,
            username: row.get("username")?,
            email: row.get("email")?,
            password_hash: row.get("password_hash")?,
            bio: row.get("bio")?,
            avatar_url: row.get("avatar_url")?,
            cover_image_url: row.get("cover_image_url")?,
            website_url: row.get("website_url")?,
            twitter_username: row.get("twitter_username")?,
            github_username: row.get("github_username")?,
            location: row.get("location")?,
            joined_at: row.get("joined_at")?,
            last_seen_at: row.get("last_seen_at")?,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password_hash: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

/// Public profile with follower and post aggregates.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub id: i64,
    pub name: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub email: String,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub cover_image_url: Option<String>,
    pub website_url: Option<String>,
    pub twitter_username: Option<String>,
    pub github_username: Option<String>,
    pub location: Option<String>,
    pub joined_at: Option<String>,
    pub post_count: i64,
    pub follower_count: i64,
    pub following_count: i64,
}

impl UserProfile {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(UserProfile {
            id: row.get("id")?,
            name: row.get("name")?,
            username: row.get("username")?,
            email: row.get("email")?,
            bio: row.get("bio")?,
            avatar_url: row.get("avatar_url")?,
            cover_image_url: row.get("cover_image_url")?,
            website_url: row.get("website_url")?,
            twitter_username: row.get("twitter_username")?,
            github_username: row.get("github_username")?,
            location: row.get("location")?,
            joined_at: row.get("joined_at")?,
            post_count: row.get("post_count")?,
            follower_count: row.get("follower_count")?,
            following_count: row.get("following_count")?,
        })
    }
}

/// A full `posts` row.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Post {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub content: String,
    pub content_html: Option<String>,
    pub excerpt: Option<String>,
    pub cover_image_url: Option<String>,
    pub reading_time_minutes: Option<i64>,
    pub is_published: bool,
    pub is_featured: bool,
    pub view_count: i64,
    pub user_id: i64,
    pub published_at: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl Post {
    pub(crate) const COLUMNS: &'static str = "id, slug, title, subtitle, content, content_html, \
        excerpt, cover_image_url, reading_time_minutes, is_published, is_featured, view_count, \
        user_id, published_at, created_at, updated_at";

    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Post {
            id: row.get("id")?,
            slug: row.get("slug")?,
            title: row.get("title")?,
            subtitle: row.get("subtitle")?,
            content: row.get("content")?,
            content_html: row.get("content_html")?,
            excerpt: row.get("excerpt")?,
            cover_image_url: row.get("cover_image_url")?,
            reading_time_minutes: row.get("reading_time_minutes")?,
            is_published: row.get("is_published")?,
            is_featured: row.get("is_featured")?,
            view_count: row.get("view_count")?,
            user_id: row.get("user_id")?,
            published_at: row.get("published_at")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewPost {
    pub slug: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub content: String,
    pub content_html: Option<String>,
    pub excerpt: Option<String>,
    pub cover_image_url: Option<String>,
    pub reading_time_minutes: Option<i64>,
    pub is_published: bool,
    pub is_featured: bool,
    pub user_id: i64,
    /// Only honored when `is_published` is set; defaults to now.
    pub published_at: Option<String>,
}

/// A post as it appears in listings: no body, author fields joined in,
/// like and comment counts attached.
#[derive(Debug, Clone, Serialize)]
pub struct PostSummary {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub excerpt: Option<String>,
    pub cover_image_url: Option<String>,
    pub reading_time_minutes: Option<i64>,
    pub is_featured: bool,
    pub published_at: Option<String>,
    pub user_id: i64,
    pub user_name: String,
    pub user_username: String,
    pub user_avatar_url: Option<String>,
    pub like_count: i64,
    pub comment_count: i64,
}

impl PostSummary {
    pub(crate) const SELECT: &'static str = "SELECT p.id, p.slug, p.title, p.subtitle, \
        p.excerpt, p.cover_image_url, p.reading_time_minutes, p.is_featured, p.published_at, \
        p.user_id, u.name AS user_name, u.username AS user_username, \
        u.avatar_url AS user_avatar_url, \
        (SELECT COUNT(*) FROM post_likes WHERE post_id = p.id) AS like_count, \
        (SELECT COUNT(*) FROM comments WHERE post_id = p.id) AS comment_count";

    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(PostSummary {
            id: row.get("id")?,
            slug: row.get("slug")?,
            title: row.get("title")?,
            subtitle: row.get("subtitle")?,
            excerpt: row.get("excerpt")?,
            cover_image_url: row.get("cover_image_url")?,
            reading_time_minutes: row.get("reading_time_minutes")?,
            is_featured: row.get("is_featured")?,
            published_at: row.get("published_at")?,
            user_id: row.get("user_id")?,
            user_name: row.get("user_name")?,
            user_username: row.get("user_username")?,
            user_avatar_url: row.get("user_avatar_url")?,
            like_count: row.get("like_count")?,
            comment_count: row.get("comment_count")?,
        })
    }
}

/// A single published post with everything the article page shows.
#[derive(Debug, Clone, Serialize)]
pub struct PostDetail {
    #[serde(flatten)]
    pub post: Post,
    pub user_name: String,
    pub user_username: String,
    #[serde(skip_serializing)]
    pub user_email: String,
    pub user_avatar_url: Option<String>,
    pub user_bio: Option<String>,
    pub like_count: i64,
    pub comment_count: i64,
}

impl PostDetail {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(PostDetail {
            post: Post::from_row(row)?,
            user_name: row.get("user_name")?,
            user_username: row.get("user_username")?,
            user_email: row.get("user_email")?,
            user_avatar_url: row.get("user_avatar_url")?,
            user_bio: row.get("user_bio")?,
            like_count: row.get("like_count")?,
            comment_count: row.get("comment_count")?,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BookmarkedPost {
    #[serde(flatten)]
    pub post: PostSummary,
    pub bookmarked_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub created_at: Option<String>,
}

impl Tag {
    pub(crate) const COLUMNS: &'static str = "id, name, slug, description, color, created_at";

    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Tag {
            id: row.get("id")?,
            name: row.get("name")?,
            slug: row.get("slug")?,
            description: row.get("description")?,
            color: row.get("color")?,
            created_at: row.get("created_at")?,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewTag {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TagWithCount {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub post_count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentWithAuthor {
    pub id: i64,
    pub content: String,
    pub post_id: i64,
    pub user_id: i64,
    pub parent_id: Option<i64>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub user_name: String,
    pub user_username: String,
    pub user_avatar_url: Option<String>,
}

impl CommentWithAuthor {
    pub(crate) const SELECT: &'static str = "SELECT c.id, c.content, c.post_id, c.user_id, \
        c.parent_id, c.created_at, c.updated_at, u.name AS user_name, \
        u.username AS user_username, u.avatar_url AS user_avatar_url \
        FROM comments c JOIN users u ON c.user_id = u.id";

    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(CommentWithAuthor {
            id: row.get("id")?,
            content: row.get("content")?,
            post_id: row.get("post_id")?,
            user_id: row.get("user_id")?,
            parent_id: row.get("parent_id")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
            user_name: row.get("user_name")?,
            user_username: row.get("user_username")?,
            user_avatar_url: row.get("user_avatar_url")?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub content: String,
    pub post_id: i64,
    pub user_id: i64,
    pub parent_id: Option<i64>,
}

/// One side of a follow relationship, as shown in follower/following lists.
#[derive(Debug, Clone, Serialize)]
pub struct FollowEdge {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub followed_at: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct NewPostView {
    pub post_id: i64,
    pub user_id: Option<i64>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
}
