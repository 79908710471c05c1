use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;

use crate::db::models::{BookmarkedPost, FollowEdge, PostSummary, UserProfile};
use crate::db::{follows, posts, reactions, users};
use crate::error::{AppError, AppResult};
use crate::extractors::{CurrentUser, MaybeUser};
use crate::routes::posts::{link_response, LinkResponse, RemovedResponse};
use crate::state::{AppState, DbPool};

#[derive(Serialize)]
pub struct ProfilePage {
    #[serde(flatten)]
    pub profile: UserProfile,
    pub posts: Vec<PostSummary>,
    /// Whether the requesting user follows this profile. Always false for
    /// anonymous requests.
    pub followed_by_viewer: bool,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users/{username}", get(show_profile))
        .route("/users/{username}/followers", get(list_followers))
        .route("/users/{username}/following", get(list_following))
        .route("/users/{username}/follow", post(follow).delete(unfollow))
        .route("/me/bookmarks", get(my_bookmarks))
}

fn profile_or_404(db: &DbPool, username: &str) -> AppResult<UserProfile> {
    users::get_user_by_username(db, username)?.ok_or(AppError::NotFound)
}

async fn show_profile(
    State(db): State<DbPool>,
    MaybeUser(viewer): MaybeUser,
    Path(username): Path<String>,
) -> AppResult<Json<ProfilePage>> {
    let profile = profile_or_404(&db, &username)?;
    let posts = posts::get_posts_by_user(&db, &username)?;
    let followed_by_viewer = match viewer {
        Some(v) => follows::is_following(&db, v.id, profile.id)?,
        None => false,
    };

    Ok(Json(ProfilePage {
        profile,
        posts,
        followed_by_viewer,
    }))
}

async fn list_followers(
    State(db): State<DbPool>,
    Path(username): Path<String>,
) -> AppResult<Json<Vec<FollowEdge>>> {
    let profile = profile_or_404(&db, &username)?;
    Ok(Json(follows::get_followers(&db, profile.id)?))
}

async fn list_following(
    State(db): State<DbPool>,
    Path(username): Path<String>,
) -> AppResult<Json<Vec<FollowEdge>>> {
    let profile = profile_or_404(&db, &username)?;
    Ok(Json(follows::get_following(&db, profile.id)?))
}

async fn follow(
    State(db): State<DbPool>,
    user: CurrentUser,
    Path(username): Path<String>,
) -> AppResult<(StatusCode, Json<LinkResponse>)> {
    let target = profile_or_404(&db, &username)?;
    if target.id == user.id {
        return Err(AppError::BadRequest("You cannot follow yourself".into()));
    }
    link_response(
        follows::follow_user(&db, user.id, target.id)?,
        "Already following this user",
    )
}

async fn unfollow(
    State(db): State<DbPool>,
    user: CurrentUser,
    Path(username): Path<String>,
) -> AppResult<Json<RemovedResponse>> {
    let target = profile_or_404(&db, &username)?;
    let removed = follows::unfollow_user(&db, user.id, target.id)?;
    Ok(Json(RemovedResponse { removed }))
}

async fn my_bookmarks(
    State(db): State<DbPool>,
    user: CurrentUser,
) -> AppResult<Json<Vec<BookmarkedPost>>> {
    Ok(Json(reactions::get_bookmarked_posts(&db, user.id)?))
}
