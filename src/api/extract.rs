// Request extractors for the two kinds of caller (moderators and signed-in
// users), plus wrappers around axum's body, query and path extractors whose
// rejections come back as `{"detail": ...}` like every other error.

use super::error::ApiError;
use super::AppState;
use crate::core::auth::{AuthError, StoredUser};
use crate::core::moderation::{AdminUser, ModerationError};
use axum::async_trait;
use axum::extract::{FromRequest, FromRequestParts, Query};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use serde::Deserialize;

#[derive(Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

fn bearer_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

fn query_token(parts: &Parts) -> Option<String> {
    Query::<TokenQuery>::try_from_uri(&parts.uri)
        .ok()
        .and_then(|Query(q)| q.token)
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

/// A verified administrator. The credential is a bearer token or a `token`
/// query parameter, holding either a JWT or the admin's email address.
pub struct Admin(pub AdminUser);

#[async_trait]
impl FromRequestParts<AppState> for Admin {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .or_else(|| query_token(parts))
            .ok_or(ModerationError::Forbidden)?;

        let email = match state.auth.token_subject(&token) {
            Ok(subject) => subject,
            Err(_) => token,
        };

        Ok(Admin(state.moderation.verify_admin(&email).await?))
    }
}

/// The signed-in user behind a bearer JWT.
pub struct CurrentUser(pub StoredUser);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or_else(ApiError::unauthorized)?;

        match state.auth.authenticate(&token).await {
            Ok(user) => Ok(CurrentUser(user)),
            Err(AuthError::StorageError(e)) => Err(AuthError::StorageError(e).into()),
            Err(_) => Err(ApiError::unauthorized()),
        }
    }
}

/// JSON request body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// URL-encoded form body.
#[derive(FromRequest)]
#[from_request(via(axum::Form), rejection(ApiError))]
pub struct FormBody<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct QueryParams<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct PathParam<T>(pub T);
