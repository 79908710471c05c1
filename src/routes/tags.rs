use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::db::models::{PostSummary, Tag, TagWithCount};
use crate::db::{posts, tags};
use crate::error::{AppError, AppResult};
use crate::state::{AppState, DbPool};

#[derive(Serialize)]
pub struct TagPage {
    pub tag: Tag,
    pub posts: Vec<PostSummary>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tags", get(list_tags))
        .route("/tags/{slug}", get(show_tag))
}

/// Every tag, busiest first.
async fn list_tags(State(db): State<DbPool>) -> AppResult<Json<Vec<TagWithCount>>> {
    let mut all = tags::get_all_tags(&db)?;
    tags::sort_by_post_count(&mut all);
    Ok(Json(all))
}

async fn show_tag(
    State(db): State<DbPool>,
    Path(slug): Path<String>,
) -> AppResult<Json<TagPage>> {
    let tag = tags::get_tag_by_slug(&db, &slug)?.ok_or(AppError::NotFound)?;
    let posts = posts::get_posts_by_tag(&db, &slug)?;
    Ok(Json(TagPage { tag, posts }))
}
