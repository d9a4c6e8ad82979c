// Moderation endpoints. Every route requires an admin.

use crate::api::error::ApiResult;
use crate::api::extract::{Admin, JsonBody, PathParam, QueryParams};
use crate::api::AppState;
use crate::core::moderation::{
    ActionOutcome, AutoFlagResult, FlagContext, FlaggedMessage, ModerationAction,
    ModerationStats, NewProfanityFilter, ProfanityFilter, UserProfile, UserSearchResult,
};
use axum::extract::State;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Deserialize)]
struct LimitQuery {
    limit: Option<i64>,
}

#[derive(Deserialize)]
struct UserSearchQuery {
    query: String,
    limit: Option<i64>,
}

#[derive(Deserialize)]
struct AutoFlagQuery {
    message_id: i64,
    message_text: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/flags/pending", get(pending_flags))
        .route("/flags/:flag_id/context", get(flag_context))
        .route("/flags/:flag_id/dismiss", post(dismiss_flag))
        .route("/flags/:flag_id/action", post(action_flag))
        .route("/users/search", get(search_users))
        .route("/users/:user_id", get(user_profile))
        .route("/users/:user_id/warn", post(warn_user))
        .route("/users/:user_id/suspend", post(suspend_user))
        .route("/users/:user_id/ban", post(ban_user))
        .route("/messages/:message_id/delete", post(delete_message))
        .route("/auto-flag-check", post(auto_flag_check))
        .route("/profanity-filters", get(list_filters).post(add_filter))
        .route("/profanity-filters/:filter_id", delete(delete_filter))
}

async fn dashboard(State(state): State<AppState>, _admin: Admin) -> ApiResult<Json<ModerationStats>> {
    Ok(Json(state.moderation.dashboard().await?))
}

async fn pending_flags(
    State(state): State<AppState>,
    _admin: Admin,
    QueryParams(q): QueryParams<LimitQuery>,
) -> ApiResult<Json<Vec<FlaggedMessage>>> {
    Ok(Json(state.moderation.pending_flags(q.limit).await?))
}

async fn flag_context(
    State(state): State<AppState>,
    _admin: Admin,
    PathParam(flag_id): PathParam<i64>,
) -> ApiResult<Json<FlagContext>> {
    Ok(Json(state.moderation.flag_context(flag_id).await?))
}

async fn search_users(
    State(state): State<AppState>,
    _admin: Admin,
    QueryParams(q): QueryParams<UserSearchQuery>,
) -> ApiResult<Json<Vec<UserSearchResult>>> {
    Ok(Json(state.moderation.search_users(&q.query, q.limit).await?))
}

async fn user_profile(
    State(state): State<AppState>,
    _admin: Admin,
    PathParam(user_id): PathParam<i64>,
) -> ApiResult<Json<UserProfile>> {
    Ok(Json(state.moderation.user_profile(user_id).await?))
}

async fn warn_user(
    State(state): State<AppState>,
    Admin(admin): Admin,
    PathParam(user_id): PathParam<i64>,
    JsonBody(action): JsonBody<ModerationAction>,
) -> ApiResult<Json<ActionOutcome>> {
    Ok(Json(state.moderation.warn(user_id, &action, &admin).await?))
}

async fn suspend_user(
    State(state): State<AppState>,
    Admin(admin): Admin,
    PathParam(user_id): PathParam<i64>,
    JsonBody(action): JsonBody<ModerationAction>,
) -> ApiResult<Json<ActionOutcome>> {
    Ok(Json(state.moderation.suspend(user_id, &action, &admin).await?))
}

async fn ban_user(
    State(state): State<AppState>,
    Admin(admin): Admin,
    PathParam(user_id): PathParam<i64>,
    JsonBody(action): JsonBody<ModerationAction>,
) -> ApiResult<Json<ActionOutcome>> {
    Ok(Json(state.moderation.ban(user_id, &action, &admin).await?))
}

async fn delete_message(
    State(state): State<AppState>,
    Admin(admin): Admin,
    PathParam(message_id): PathParam<i64>,
    JsonBody(action): JsonBody<ModerationAction>,
) -> ApiResult<Json<ActionOutcome>> {
    Ok(Json(
        state
            .moderation
            .delete_message(message_id, &action, &admin)
            .await?,
    ))
}

async fn dismiss_flag(
    State(state): State<AppState>,
    Admin(admin): Admin,
    PathParam(flag_id): PathParam<i64>,
    JsonBody(action): JsonBody<ModerationAction>,
) -> ApiResult<Json<ActionOutcome>> {
    Ok(Json(state.moderation.dismiss_flag(flag_id, &action, &admin).await?))
}

async fn action_flag(
    State(state): State<AppState>,
    Admin(admin): Admin,
    PathParam(flag_id): PathParam<i64>,
    JsonBody(action): JsonBody<ModerationAction>,
) -> ApiResult<Json<ActionOutcome>> {
    Ok(Json(state.moderation.action_flag(flag_id, &action, &admin).await?))
}

async fn auto_flag_check(
    State(state): State<AppState>,
    _admin: Admin,
    QueryParams(q): QueryParams<AutoFlagQuery>,
) -> ApiResult<Json<AutoFlagResult>> {
    Ok(Json(
        state
            .moderation
            .auto_flag_check(q.message_id, &q.message_text)
            .await?,
    ))
}

async fn list_filters(
    State(state): State<AppState>,
    _admin: Admin,
) -> ApiResult<Json<Vec<ProfanityFilter>>> {
    Ok(Json(state.moderation.list_filters().await?))
}

async fn add_filter(
    State(state): State<AppState>,
    Admin(admin): Admin,
    JsonBody(body): JsonBody<NewProfanityFilter>,
) -> ApiResult<Json<Value>> {
    let filter = state
        .moderation
        .add_filter(&body.word, body.severity, body.auto_delete, &admin)
        .await?;
    Ok(Json(json!({
        "success": true,
        "message": format!("Added '{}' to profanity filters", filter.word_or_phrase),
        "filter": filter,
    })))
}

async fn delete_filter(
    State(state): State<AppState>,
    _admin: Admin,
    PathParam(filter_id): PathParam<i64>,
) -> ApiResult<Json<Value>> {
    state.moderation.delete_filter(filter_id).await?;
    Ok(Json(json!({ "success": true, "message": "Filter removed" })))
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::*;
    use crate::infra::database::fixtures::{insert_message, insert_user};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use chrono::Utc;
    use serde_json::json;

    const ADMIN: &str = "admin@statiq.app";

    fn warn_body() -> serde_json::Value {
        json!({ "action_type": "warn", "reason": "Trash talk" })
    }

    #[tokio::test]
    async fn test_non_admins_are_forbidden() {
        let (app, pool, _) = test_app().await;
        insert_user(&pool, "fan@statiq.app", Some("fan"), "fan").await;

        let (status, body) = send(&app, get("/api/v1/moderation/dashboard")).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["detail"], "Admin access required");

        let (status, _) = send(
            &app,
            get("/api/v1/moderation/dashboard?token=fan%40statiq.app"),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_malformed_input_gets_json_detail() {
        let (app, pool, _) = test_app().await;
        insert_user(&pool, ADMIN, Some("admin"), "admin").await;

        let (status, body) = send(&app, with_bearer(get("/api/v1/moderation/users/abc"), ADMIN)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].as_str().unwrap().contains("Cannot parse"));

        let (status, body) = send(
            &app,
            with_bearer(get("/api/v1/moderation/flags/pending?limit=lots"), ADMIN),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].is_string());

        let (status, body) = send(
            &app,
            with_bearer(post_json("/api/v1/moderation/users/1/warn", json!({ "reason": 5 })), ADMIN),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["detail"].is_string());
    }

    #[tokio::test]
    async fn test_admin_email_or_jwt_unlocks_dashboard() {
        let (app, pool, state) = test_app().await;
        insert_user(&pool, ADMIN, Some("admin"), "admin").await;

        let (status, body) = send(
            &app,
            get("/api/v1/moderation/dashboard?token=admin%40statiq.app"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["pending_flags"], 0);

        let jwt = state.auth.issue_token(ADMIN).unwrap();
        let (status, _) = send(
            &app,
            with_bearer(get("/api/v1/moderation/dashboard"), &jwt),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_warn_then_profile_shows_history() {
        let (app, pool, _) = test_app().await;
        insert_user(&pool, ADMIN, Some("admin"), "admin").await;
        let user_id = insert_user(&pool, "kid@statiq.app", Some("kid"), "fan").await;

        let (status, body) = send(
            &app,
            with_bearer(
                post_json(&format!("/api/v1/moderation/users/{}/warn", user_id), warn_body()),
                ADMIN,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["warning_count"], 1);

        let (status, body) = send(
            &app,
            with_bearer(get(&format!("/api/v1/moderation/users/{}", user_id)), ADMIN),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["warning_count"], 1);
        assert_eq!(body["moderation_history"][0]["action_type"], "warn");
        assert_eq!(body["moderation_history"][0]["moderator_username"], "admin");
    }

    #[tokio::test]
    async fn test_unknown_user_is_404() {
        let (app, pool, _) = test_app().await;
        insert_user(&pool, ADMIN, Some("admin"), "admin").await;

        let (status, body) = send(
            &app,
            with_bearer(post_json("/api/v1/moderation/users/999/ban", warn_body()), ADMIN),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "User not found");
    }

    #[tokio::test]
    async fn test_short_search_query_is_rejected() {
        let (app, pool, _) = test_app().await;
        insert_user(&pool, ADMIN, Some("admin"), "admin").await;

        let (status, _) = send(
            &app,
            with_bearer(get("/api/v1/moderation/users/search?query=a"), ADMIN),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(
            &app,
            with_bearer(get("/api/v1/moderation/users/search?query=adm"), ADMIN),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_filter_lifecycle_and_auto_flag() {
        let (app, pool, _) = test_app().await;
        insert_user(&pool, ADMIN, Some("admin"), "admin").await;
        let author = insert_user(&pool, "kid@statiq.app", Some("kid"), "fan").await;

        let (status, body) = send(
            &app,
            with_bearer(
                post_json(
                    "/api/v1/moderation/profanity-filters",
                    json!({ "word": "Dang", "severity": "high", "auto_delete": true }),
                ),
                ADMIN,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Added 'dang' to profanity filters");
        let filter_id = body["filter"]["id"].as_i64().unwrap();

        let (status, _) = send(
            &app,
            with_bearer(
                post_json(
                    "/api/v1/moderation/profanity-filters",
                    json!({ "word": "dang", "severity": "low" }),
                ),
                ADMIN,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let message_id = insert_message(&pool, 1, author, "dang it ref", Utc::now()).await;
        let (status, body) = send(
            &app,
            with_bearer(
                Request::post(format!(
                    "/api/v1/moderation/auto-flag-check?message_id={}&message_text=dang%20it%20ref",
                    message_id
                ))
                .body(Body::empty())
                .unwrap(),
                ADMIN,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["flagged"], true);
        assert_eq!(body["should_delete"], true);
        assert_eq!(body["severity"], "high");

        let (_, pending) = send(
            &app,
            with_bearer(get("/api/v1/moderation/flags/pending"), ADMIN),
        )
        .await;
        assert_eq!(pending[0]["flag_type"], "auto_high");
        assert_eq!(pending[0]["flagged_by_username"], "System");

        let (status, body) = send(
            &app,
            with_bearer(
                Request::delete(format!("/api/v1/moderation/profanity-filters/{}", filter_id))
                    .body(Body::empty())
                    .unwrap(),
                ADMIN,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Filter removed");

        let (_, filters) = send(
            &app,
            with_bearer(get("/api/v1/moderation/profanity-filters"), ADMIN),
        )
        .await;
        assert!(filters.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_dismissing_a_flag_clears_the_queue() {
        let (app, pool, state) = test_app().await;
        insert_user(&pool, ADMIN, Some("admin"), "admin").await;
        let author = insert_user(&pool, "kid@statiq.app", Some("kid"), "fan").await;
        let reporter = insert_user(&pool, "mom@statiq.app", Some("mom"), "fan").await;
        let message_id = insert_message(&pool, 1, author, "ref is blind", Utc::now()).await;
        let flag_id = state
            .moderation
            .flag_message(message_id, reporter, Some("rude"))
            .await
            .unwrap();

        let (status, body) = send(
            &app,
            with_bearer(get(&format!("/api/v1/moderation/flags/{}/context", flag_id)), ADMIN),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["flagged_message_id"], message_id);
        assert_eq!(body["context_messages"].as_array().unwrap().len(), 1);

        let (status, _) = send(
            &app,
            with_bearer(
                post_json(
                    &format!("/api/v1/moderation/flags/{}/dismiss", flag_id),
                    json!({ "action_type": "dismiss_flag", "reason": "Fair comment" }),
                ),
                ADMIN,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, pending) = send(
            &app,
            with_bearer(get("/api/v1/moderation/flags/pending"), ADMIN),
        )
        .await;
        assert!(pending.as_array().unwrap().is_empty());
    }
}
