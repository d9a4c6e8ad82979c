// Chat rooms: reading is open, posting and reporting need a signed-in user.

use crate::api::error::{ApiError, ApiResult};
use crate::api::extract::{CurrentUser, JsonBody, PathParam, QueryParams};
use crate::api::AppState;
use crate::core::chat::PostedMessage;
use crate::core::moderation::ChatMessageDetail;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Deserialize)]
struct LimitQuery {
    limit: Option<i64>,
}

#[derive(Deserialize)]
struct NewMessage {
    message_text: String,
}

#[derive(Default, Deserialize)]
struct Report {
    #[serde(default)]
    reason: Option<String>,
}

impl Report {
    /// The report body is optional; an empty request means "no reason given".
    fn from_body(body: &[u8]) -> Result<Self, ApiError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body).map_err(|e| {
            ApiError::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("Invalid report body: {}", e),
            )
        })
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/rooms/:room_id/messages", get(room_messages).post(post_message))
        .route("/messages/:message_id/flag", post(flag_message))
}

async fn room_messages(
    State(state): State<AppState>,
    PathParam(room_id): PathParam<i64>,
    QueryParams(q): QueryParams<LimitQuery>,
) -> ApiResult<Json<Vec<ChatMessageDetail>>> {
    Ok(Json(state.chat.room_messages(room_id, q.limit).await?))
}

async fn post_message(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    PathParam(room_id): PathParam<i64>,
    JsonBody(body): JsonBody<NewMessage>,
) -> ApiResult<(StatusCode, Json<PostedMessage>)> {
    let posted = state
        .chat
        .post_message(room_id, user.id, &body.message_text)
        .await?;
    Ok((StatusCode::CREATED, Json(posted)))
}

async fn flag_message(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    PathParam(message_id): PathParam<i64>,
    body: Bytes,
) -> ApiResult<Json<Value>> {
    let body = Report::from_body(&body)?;
    let flag_id = state
        .chat
        .report_message(message_id, user.id, body.reason.as_deref())
        .await?;
    Ok(Json(json!({ "success": true, "flag_id": flag_id })))
}
