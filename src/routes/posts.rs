use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::content::{slugify, PostDraft};
use crate::db::models::{CommentWithAuthor, NewComment, NewPostView, NewTag, Post, PostDetail, Tag};
use crate::db::{comments, posts, reactions, tags, views, DbResult, LinkOutcome};
use crate::error::{AppError, AppResult};
use crate::extractors::{CurrentUser, MaybeUser, ViewerInfo};
use crate::state::{AppState, DbPool};

const MAX_COMMENT_CHARS: usize = 2000;

// --- Responses ---

#[derive(Serialize)]
pub struct PostPage {
    #[serde(flatten)]
    pub post: PostDetail,
    pub tags: Vec<Tag>,
    pub comments: Vec<CommentWithAuthor>,
    pub liked: bool,
    pub bookmarked: bool,
}

#[derive(Serialize)]
pub struct CreatedPost {
    #[serde(flatten)]
    pub post: Post,
    pub tags: Vec<Tag>,
}

#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub outcome: LinkOutcome,
}

#[derive(Serialize)]
pub struct RemovedResponse {
    pub removed: bool,
}

// --- Forms ---

#[derive(Deserialize)]
pub struct CommentForm {
    pub content: String,
    pub parent_id: Option<i64>,
}

// --- Router ---

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/posts", post(create_post))
        .route("/posts/{post}", get(show_post))
        .route("/posts/{post}/comments", post(create_comment))
        .route("/posts/{post}/like", post(like).delete(unlike))
        .route("/posts/{post}/bookmark", post(bookmark).delete(unbookmark))
}

// --- Handlers ---

async fn show_post(
    State(db): State<DbPool>,
    MaybeUser(user): MaybeUser,
    viewer: ViewerInfo,
    Path(slug): Path<String>,
) -> AppResult<Json<PostPage>> {
    let mut post = posts::get_post_by_slug(&db, &slug)?.ok_or(AppError::NotFound)?;
    let post_id = post.post.id;

    views::record_post_view(
        &db,
        &NewPostView {
            post_id,
            user_id: user.as_ref().map(|u| u.id),
            ip_address: viewer.ip_address,
            user_agent: viewer.user_agent,
            referrer: viewer.referrer,
        },
    )?;
    // Count the view just recorded
    post.post.view_count += 1;

    let (liked, bookmarked) = match &user {
        Some(u) => (
            reactions::has_user_liked_post(&db, post_id, u.id)?,
            reactions::has_user_bookmarked_post(&db, post_id, u.id)?,
        ),
        None => (false, false),
    };

    Ok(Json(PostPage {
        tags: tags::get_tags_for_post(&db, post_id)?,
        comments: comments::get_comments_for_post(&db, post_id)?,
        post,
        liked,
        bookmarked,
    }))
}

async fn create_post(
    State(db): State<DbPool>,
    user: CurrentUser,
    Json(draft): Json<PostDraft>,
) -> AppResult<(StatusCode, Json<CreatedPost>)> {
    let tag_names = draft.tag_names();
    let new_post = draft.into_new_post(user.id)?;

    let post = match posts::create_post(&db, &new_post) {
        Ok(post) => post,
        Err(e) if e.is_unique_violation() => {
            return Err(AppError::Conflict(format!(
                "A post with slug '{}' already exists",
                new_post.slug
            )));
        }
        Err(e) => return Err(e.into()),
    };

    let mut attached = Vec::with_capacity(tag_names.len());
    for name in &tag_names {
        let Some(tag) = find_or_create_tag(&db, name)? else {
            continue;
        };
        if tags::tag_post(&db, post.id, tag.id)?.is_created() {
            attached.push(tag);
        }
    }

    tracing::info!(post_id = post.id, author = %user.username, "Post created");
    Ok((
        StatusCode::CREATED,
        Json(CreatedPost {
            post,
            tags: attached,
        }),
    ))
}

/// Tags are keyed by slug; names that slugify to nothing are skipped.
fn find_or_create_tag(db: &DbPool, name: &str) -> DbResult<Option<Tag>> {
    let slug = slugify(name);
    if slug.is_empty() {
        return Ok(None);
    }
    if let Some(tag) = tags::get_tag_by_slug(db, &slug)? {
        return Ok(Some(tag));
    }
    let tag = tags::create_tag(
        db,
        &NewTag {
            name: name.to_string(),
            slug,
            ..Default::default()
        },
    )?;
    Ok(Some(tag))
}

async fn create_comment(
    State(db): State<DbPool>,
    user: CurrentUser,
    Path(post_id): Path<i64>,
    Json(form): Json<CommentForm>,
) -> AppResult<(StatusCode, Json<CommentWithAuthor>)> {
    let content = form.content.trim().to_string();
    if content.is_empty() {
        return Err(AppError::BadRequest("Comment cannot be empty".into()));
    }
    if content.chars().count() > MAX_COMMENT_CHARS {
        return Err(AppError::BadRequest(format!(
            "Comment must be {} characters or less",
            MAX_COMMENT_CHARS
        )));
    }

    ensure_post_exists(&db, post_id)?;

    let comment = comments::add_comment(
        &db,
        &NewComment {
            content,
            post_id,
            user_id: user.id,
            parent_id: form.parent_id,
        },
    )?;
    Ok((StatusCode::CREATED, Json(comment)))
}

async fn like(
    State(db): State<DbPool>,
    user: CurrentUser,
    Path(post_id): Path<i64>,
) -> AppResult<(StatusCode, Json<LinkResponse>)> {
    ensure_post_exists(&db, post_id)?;
    link_response(reactions::like_post(&db, post_id, user.id)?, "Post already liked")
}

async fn unlike(
    State(db): State<DbPool>,
    user: CurrentUser,
    Path(post_id): Path<i64>,
) -> AppResult<Json<RemovedResponse>> {
    let removed = reactions::unlike_post(&db, post_id, user.id)?;
    Ok(Json(RemovedResponse { removed }))
}

async fn bookmark(
    State(db): State<DbPool>,
    user: CurrentUser,
    Path(post_id): Path<i64>,
) -> AppResult<(StatusCode, Json<LinkResponse>)> {
    ensure_post_exists(&db, post_id)?;
    link_response(
        reactions::bookmark_post(&db, post_id, user.id)?,
        "Post already bookmarked",
    )
}

async fn unbookmark(
    State(db): State<DbPool>,
    user: CurrentUser,
    Path(post_id): Path<i64>,
) -> AppResult<Json<RemovedResponse>> {
    let removed = reactions::remove_bookmark(&db, post_id, user.id)?;
    Ok(Json(RemovedResponse { removed }))
}

fn ensure_post_exists(db: &DbPool, post_id: i64) -> AppResult<()> {
    posts::get_post_by_id(db, post_id)?
        .map(|_| ())
        .ok_or(AppError::NotFound)
}

/// `Created` becomes 201; a repeat of an existing link is a 409.
pub(crate) fn link_response(
    outcome: LinkOutcome,
    conflict: &str,
) -> AppResult<(StatusCode, Json<LinkResponse>)> {
    match outcome {
        LinkOutcome::Created => Ok((StatusCode::CREATED, Json(LinkResponse { outcome }))),
        LinkOutcome::AlreadyExists => Err(AppError::Conflict(conflict.to_string())),
    }
}
