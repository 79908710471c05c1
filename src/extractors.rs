use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::header;
use axum::http::request::Parts;
use std::convert::Infallible;
use std::net::SocketAddr;

use crate::db::users;
use crate::error::AppError;
use crate::state::AppState;

/// The user the upstream identity layer authenticated for this request.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
}

/// Extractor that requires an authenticated user.
/// Returns 401 if the identity header is missing, malformed, or names an
/// unknown user.
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let id = forwarded_user_id(parts, &state.config.auth.user_header)
            .ok_or(AppError::Unauthorized)?;

        let user = users::get_user_by_id(&state.db, id)?.ok_or(AppError::Unauthorized)?;
        Ok(CurrentUser {
            id: user.id,
            username: user.username,
        })
    }
}

/// Optional user extractor: `None` instead of 401 when not authenticated.
pub struct MaybeUser(pub Option<CurrentUser>);

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match CurrentUser::from_request_parts(parts, state).await {
            Ok(user) => Ok(MaybeUser(Some(user))),
            Err(AppError::Unauthorized) => Ok(MaybeUser(None)),
            Err(e) => Err(e),
        }
    }
}

/// Request metadata logged with each post view.
#[derive(Debug, Clone, Default)]
pub struct ViewerInfo {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
}

impl<S: Send + Sync> FromRequestParts<S> for ViewerInfo {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Prefer the proxy's view of the client; fall back to the socket
        let ip_address = header_str(parts, "x-forwarded-for")
            .and_then(|v| v.split(',').next())
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .or_else(|| {
                parts
                    .extensions
                    .get::<ConnectInfo<SocketAddr>>()
                    .map(|ci| ci.0.ip().to_string())
            });

        Ok(ViewerInfo {
            ip_address,
            user_agent: header_str(parts, header::USER_AGENT.as_str()).map(str::to_string),
            referrer: header_str(parts, header::REFERER.as_str()).map(str::to_string),
        })
    }
}

fn header_str<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts.headers.get(name).and_then(|v| v.to_str().ok())
}

fn forwarded_user_id(parts: &Parts, header_name: &str) -> Option<i64> {
    header_str(parts, header_name)?.trim().parse().ok()
}
