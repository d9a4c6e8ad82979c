// HTTP error mapping.
//
// Every handler returns `Result<_, ApiError>`. Core errors convert into an
// `ApiError` with the matching status code; the body is always
// `{"detail": "..."}`.

use crate::core::auth::AuthError;
use crate::core::chat::ChatError;
use crate::core::moderation::ModerationError;
use axum::extract::rejection::{FormRejection, JsonRejection, PathRejection, QueryRejection};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, detail)
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, detail)
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, AuthError::Unauthorized.to_string())
    }

    /// Log the real cause, hand the client a generic message.
    fn internal(cause: impl std::fmt::Display) -> Self {
        tracing::error!("Internal error: {}", cause);
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "detail": self.detail }));
        if self.status == StatusCode::UNAUTHORIZED {
            return (self.status, [(header::WWW_AUTHENTICATE, "Bearer")], body).into_response();
        }
        (self.status, body).into_response()
    }
}

impl From<ModerationError> for ApiError {
    fn from(err: ModerationError) -> Self {
        let status = match err {
            ModerationError::StorageError(_) => return Self::internal(err),
            ModerationError::Forbidden | ModerationError::AccountRestricted(_) => {
                StatusCode::FORBIDDEN
            }
            ModerationError::NotFound(_) => StatusCode::NOT_FOUND,
            ModerationError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ModerationError::Conflict(_) => StatusCode::CONFLICT,
        };
        Self::new(status, err.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        let status = match err {
            AuthError::StorageError(_) | AuthError::TokenError(_) | AuthError::HashError(_) => {
                return Self::internal(err)
            }
            AuthError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AuthError::AlreadyRegistered => StatusCode::CONFLICT,
            AuthError::InvalidCredentials | AuthError::Unauthorized => StatusCode::UNAUTHORIZED,
        };
        Self::new(status, err.to_string())
    }
}

impl From<ChatError> for ApiError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::StorageError(_) => Self::internal(err),
            ChatError::InvalidMessage(detail) => Self::bad_request(detail),
            ChatError::Moderation(inner) => inner.into(),
        }
    }
}

// Extractor rejections keep axum's status code but use the same body shape
// as every other error.
macro_rules! from_rejection {
    ($($rejection:ty),+) => {
        $(
            impl From<$rejection> for ApiError {
                fn from(rejection: $rejection) -> Self {
                    Self::new(rejection.status(), rejection.body_text())
                }
            }
        )+
    };
}

from_rejection!(JsonRejection, QueryRejection, PathRejection, FormRejection);
