use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::content::DraftError;
use crate::db::DbError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found")]
    NotFound,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

impl From<DraftError> for AppError {
    fn from(e: DraftError) -> Self {
        AppError::BadRequest(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "Not found".to_string()),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            // A reply pointing at another post's comment is the caller's mistake
            AppError::Database(e @ DbError::ParentMismatch { .. }) => {
                (StatusCode::BAD_REQUEST, e.to_string())
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, message).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn response_status(err: AppError) -> StatusCode {
        let response = err.into_response();
        response.status()
    }

    #[test]
    fn not_found_returns_404() {
        assert_eq!(response_status(AppError::NotFound), StatusCode::NOT_FOUND);
    }

    #[test]
    fn unauthorized_returns_401() {
        assert_eq!(
            response_status(AppError::Unauthorized),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn bad_request_returns_400() {
        assert_eq!(
            response_status(AppError::BadRequest("oops".into())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn conflict_returns_409() {
        assert_eq!(
            response_status(AppError::Conflict("already liked".into())),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn parent_mismatch_returns_400() {
        let err = AppError::Database(DbError::ParentMismatch {
            parent_id: 1,
            post_id: 2,
        });
        assert_eq!(response_status(err), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn sql_errors_return_500() {
        let err = AppError::Database(DbError::Sql(rusqlite::Error::InvalidQuery));
        assert_eq!(response_status(err), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn draft_errors_are_bad_requests() {
        let err: AppError = DraftError::MissingTitle.into();
        assert_eq!(response_status(err), StatusCode::BAD_REQUEST);
    }
}
