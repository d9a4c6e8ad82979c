// Registration, login and the current user.

use crate::api::error::ApiResult;
use crate::api::extract::{CurrentUser, FormBody, JsonBody};
use crate::api::AppState;
use crate::core::auth::{RegisterRequest, Token, UserResponse};
use crate::core::email::Welcome;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

/// OAuth2 password-flow form. `username` may hold the email.
#[derive(Deserialize)]
struct LoginForm {
    username: String,
    password: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(me))
}

async fn register(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<RegisterRequest>,
) -> ApiResult<Json<UserResponse>> {
    let user = state.auth.register(request).await?;

    // The account exists either way; a failed welcome note is only logged.
    let full_name = format!("{} {}", user.first_name, user.last_name);
    let welcome = Welcome {
        to_email: &user.email,
        to_name: &full_name,
        role: user.role,
        team_name: None,
        temp_password: None,
    };
    if let Err(e) = state.email.send_welcome(&welcome).await {
        tracing::warn!(user_id = user.id, error = %e, "Welcome email not sent");
    }

    Ok(Json(user))
}

async fn login(
    State(state): State<AppState>,
    FormBody(form): FormBody<LoginForm>,
) -> ApiResult<Json<Token>> {
    Ok(Json(state.auth.login(&form.username, &form.password).await?))
}

async fn me(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(user.into())
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::json;

    fn login_request(username: &str, password: &str) -> Request<Body> {
        Request::post("/api/v1/auth/login")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from(format!("username={}&password={}", username, password)))
            .unwrap()
    }

    fn registration(email: &str, username: &str) -> serde_json::Value {
        json!({
            "email": email,
            "username": username,
            "first_name": "Brayden",
            "last_name": "Payne",
            "password": "touchdown42",
            "role": "player",
        })
    }

    #[tokio::test]
    async fn test_register_login_me() {
        let (app, _, _) = test_app().await;

        let (status, body) = send(
            &app,
            post_json("/api/v1/auth/register", registration("qb@joshua.edu", "qb9")),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["username"], "qb9");
        assert_eq!(body["role"], "player");
        assert!(body.get("password_hash").is_none());

        let (status, body) = send(&app, login_request("qb9", "touchdown42")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["token_type"], "bearer");
        let token = body["access_token"].as_str().unwrap().to_string();

        let (status, body) = send(&app, with_bearer(get("/api/v1/auth/me"), &token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["email"], "qb@joshua.edu");
    }

    #[tokio::test]
    async fn test_duplicate_registration_conflicts() {
        let (app, _, _) = test_app().await;
        send(&app, post_json("/api/v1/auth/register", registration("qb@joshua.edu", "qb9"))).await;

        let (status, _) = send(
            &app,
            post_json("/api/v1/auth/register", registration("qb@joshua.edu", "other")),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_bad_credentials_are_401() {
        let (app, _, _) = test_app().await;
        send(&app, post_json("/api/v1/auth/register", registration("qb@joshua.edu", "qb9"))).await;

        let (status, _) = send(&app, login_request("qb9", "wrong-password")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(&app, get("/api/v1/auth/me")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(&app, with_bearer(get("/api/v1/auth/me"), "not-a-jwt")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
