use axum::extract::FromRef;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

use crate::config::Config;

pub type DbPool = Pool<SqliteConnectionManager>;

/// Shared handler state. The pool is the store handle every helper
/// receives; it is created once in `main` and injected here.
#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub config: Config,
}

/// Lets handlers take `State<DbPool>` directly when they only need the store.
impl FromRef<AppState> for DbPool {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}
