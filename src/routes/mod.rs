pub mod home;
pub mod posts;
pub mod tags;
pub mod users;

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// The full application router with request tracing.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(home::index))
        .merge(posts::router())
        .merge(tags::router())
        .merge(users::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
