use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::db::models::{PostSummary, TagWithCount};
use crate::db::{posts, tags};
use crate::error::AppResult;
use crate::state::DbPool;

/// Front page payload: featured strip, the full feed and the tag cloud.
#[derive(Serialize)]
pub struct HomePage {
    pub featured: Vec<PostSummary>,
    pub posts: Vec<PostSummary>,
    pub tags: Vec<TagWithCount>,
}

pub async fn index(State(db): State<DbPool>) -> AppResult<Json<HomePage>> {
    let featured = posts::get_featured_posts(&db)?;
    let posts = posts::get_all_posts(&db)?;
    let mut tags = tags::get_all_tags(&db)?;
    tags::sort_by_post_count(&mut tags);

    Ok(Json(HomePage {
        featured,
        posts,
        tags,
    }))
}
