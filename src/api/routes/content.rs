// Read-only content endpoints: dashboard, scores, games, players, playoffs, search.

use crate::api::error::{ApiError, ApiResult};
use crate::api::extract::{PathParam, QueryParams};
use crate::api::AppState;
use crate::core::dashboard::{dashboard, DashboardPayload};
use crate::core::games::{game_detail, game_leaders, GameDetailResponse, GameLeadersResponse};
use crate::core::players::{list_players, player_detail, PlayerResponse};
use crate::core::playoffs::{playoff_bracket, PlayoffBracketResponse};
use crate::core::scores::{scores, ScoreFilter, ScoresResponse};
use crate::core::search::{search, SearchResult};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{NaiveDate, Utc};
use chrono_tz::America::Chicago;
use serde::Deserialize;

#[derive(Deserialize)]
struct DashboardQuery {
    team_id: Option<String>,
}

#[derive(Deserialize)]
struct ScoresQuery {
    classification: Option<String>,
    date_from: Option<NaiveDate>,
    date_to: Option<NaiveDate>,
    #[serde(default)]
    following_only: bool,
}

#[derive(Deserialize)]
struct TeamQuery {
    team: Option<String>,
}

#[derive(Deserialize)]
struct ConferenceQuery {
    conference: Option<String>,
}

#[derive(Deserialize)]
struct SearchQuery {
    q: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/dashboard", get(get_dashboard))
        .route("/api/v1/scores", get(get_scores))
        .route("/api/v1/games/:game_id/leaders", get(get_game_leaders))
        .route("/games/:game_id", get(get_game_detail))
        .route("/api/v1/players", get(get_players))
        .route("/api/v1/players/:player_id", get(get_player))
        .route("/api/v1/playoff-bracket", get(get_playoff_bracket))
        .route("/api/v1/search", get(get_search))
}

async fn get_dashboard(QueryParams(q): QueryParams<DashboardQuery>) -> Json<DashboardPayload> {
    let today = Utc::now().with_timezone(&Chicago).date_naive();
    Json(dashboard(q.team_id.as_deref(), today))
}

async fn get_scores(QueryParams(q): QueryParams<ScoresQuery>) -> Json<ScoresResponse> {
    let filter = ScoreFilter {
        classification: q.classification,
        date_from: q.date_from,
        date_to: q.date_to,
        following_only: q.following_only,
    };
    Json(scores(&filter, Utc::now()))
}

async fn get_game_leaders(PathParam(game_id): PathParam<String>) -> Json<GameLeadersResponse> {
    Json(game_leaders(&game_id, Utc::now()))
}

async fn get_game_detail(
    PathParam(game_id): PathParam<String>,
) -> ApiResult<Json<GameDetailResponse>> {
    let game_id: i64 = game_id
        .trim()
        .parse()
        .map_err(|_| ApiError::bad_request("Invalid game ID"))?;
    Ok(Json(game_detail(game_id, Utc::now())))
}

async fn get_players(QueryParams(q): QueryParams<TeamQuery>) -> Json<Vec<PlayerResponse>> {
    Json(list_players(q.team.as_deref()))
}

async fn get_player(PathParam(player_id): PathParam<String>) -> ApiResult<Json<PlayerResponse>> {
    player_detail(&player_id)
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Player not found"))
}

async fn get_playoff_bracket(
    QueryParams(q): QueryParams<ConferenceQuery>,
) -> Json<PlayoffBracketResponse> {
    Json(playoff_bracket(q.conference.as_deref()))
}

async fn get_search(
    QueryParams(q): QueryParams<SearchQuery>,
) -> ApiResult<Json<Vec<SearchResult>>> {
    let query = q.q.unwrap_or_default();
    if query.trim().is_empty() {
        return Err(ApiError::bad_request("Search query must not be empty"));
    }
    Ok(Json(search(&query)))
}
