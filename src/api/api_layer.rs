// API layer - axum routers and the shared application state.
//
// Handlers are THIN: pull primitives out of the request, call a core
// service, turn the result (or error) into JSON.

#[path = "error.rs"]
pub mod error;

#[path = "extract.rs"]
pub mod extract;

#[path = "routes/route_catalog.rs"]
pub mod routes;

use crate::core::auth::AuthService;
use crate::core::chat::ChatService;
use crate::core::email::{EmailConfig, EmailService};
use crate::core::moderation::{ModerationConfig, ModerationService};
use crate::infra::auth::SqliteUserStore;
use crate::infra::chat::SqliteChatStore;
use crate::infra::email::LogMailer;
use crate::infra::moderation::SqliteModerationStore;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use sqlx::{Pool, Sqlite};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub type Moderation = ModerationService<SqliteModerationStore>;
pub type Auth = AuthService<SqliteUserStore>;
pub type Chat = ChatService<SqliteChatStore, SqliteModerationStore>;
pub type Email = EmailService<LogMailer>;

/// Everything a handler can reach. Cloned per request, so only `Arc`s live here.
#[derive(Clone)]
pub struct AppState {
    pub moderation: Arc<Moderation>,
    pub auth: Arc<Auth>,
    pub chat: Arc<Chat>,
    pub email: Arc<Email>,
}

impl AppState {
    /// Wire every service onto one pool.
    pub fn new(
        pool: Pool<Sqlite>,
        jwt_secret: &str,
        token_ttl_minutes: i64,
        moderation_config: ModerationConfig,
        email_config: EmailConfig,
    ) -> Self {
        let moderation = Arc::new(ModerationService::new(
            SqliteModerationStore::new(pool.clone()),
            moderation_config,
        ));
        let auth = Arc::new(AuthService::new(
            SqliteUserStore::new(pool.clone()),
            jwt_secret,
            token_ttl_minutes,
        ));
        let chat = Arc::new(ChatService::new(
            SqliteChatStore::new(pool),
            Arc::clone(&moderation),
        ));

        let email = Arc::new(EmailService::new(LogMailer::new(), email_config));

        Self {
            moderation,
            auth,
            chat,
            email,
        }
    }
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/v1/moderation", routes::moderation::router())
        .nest("/api/v1/auth", routes::auth::router())
        .nest("/api/v1/chat", routes::chat::router())
        .merge(routes::content::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_health_is_ok() {
        let (app, _, _) = test_app().await;
        let (status, body) = send(&app, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let (app, _, _) = test_app().await;
        let (status, _) = send(&app, get("/api/v1/nope")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
