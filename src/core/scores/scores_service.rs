// Score feed - live, upcoming and finished games.
//
// Sample data for now. Filters are applied the way a database query would
// apply them, so the handler contract stays the same once real games land.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct TeamColors {
    pub home_primary_color: Option<String>,
    pub home_background_color: Option<String>,
    pub away_primary_color: Option<String>,
    pub away_background_color: Option<String>,
}

/// Who is playing. Shared by every game list in the feed.
#[derive(Debug, Clone, Serialize)]
pub struct Matchup {
    pub home_team_id: String,
    pub away_team_id: String,
    pub home_team_name: String,
    pub away_team_name: String,
    pub home_team_mascot: String,
    pub away_team_mascot: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LiveGame {
    pub id: String,
    #[serde(flatten)]
    pub matchup: Matchup,
    pub home_score: u32,
    pub away_score: u32,
    pub quarter: String,
    pub time_remaining: String,
    pub is_live: bool,
    pub district: String,
    pub classification: String,
    pub location: String,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub colors: TeamColors,
    pub home_state_rank: Option<u32>,
    pub away_state_rank: Option<u32>,
    pub home_national_rank: Option<u32>,
    pub away_national_rank: Option<u32>,
    pub broadcaster: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FinishedGame {
    pub id: String,
    #[serde(flatten)]
    pub matchup: Matchup,
    pub home_score: u32,
    pub away_score: u32,
    pub date: NaiveDate,
    pub time: String,
    pub location: String,
    pub district: String,
    pub classification: String,
    pub final_status: String,
    #[serde(flatten)]
    pub colors: TeamColors,
    pub home_record: Option<String>,
    pub away_record: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpcomingGame {
    pub id: String,
    #[serde(flatten)]
    pub matchup: Matchup,
    pub date: NaiveDate,
    pub time: String,
    pub location: String,
    pub district: String,
    pub classification: String,
    pub week: u32,
    #[serde(flatten)]
    pub colors: TeamColors,
    pub home_record: Option<String>,
    pub away_record: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoresResponse {
    pub live_games: Vec<LiveGame>,
    pub upcoming_games: Vec<UpcomingGame>,
    pub finished_games: Vec<FinishedGame>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct ScoreFilter {
    pub classification: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    /// No follow data exists yet, so this does not narrow anything.
    pub following_only: bool,
}

impl ScoreFilter {
    fn classification_matches(&self, classification: &str) -> bool {
        match self.classification.as_deref() {
            Some(wanted) if !wanted.is_empty() => wanted == classification,
            _ => true,
        }
    }

    fn date_matches(&self, date: NaiveDate) -> bool {
        self.date_from.map_or(true, |from| date >= from)
            && self.date_to.map_or(true, |to| date <= to)
    }
}

fn matchup(home: (&str, &str, &str), away: (&str, &str, &str)) -> Matchup {
    Matchup {
        home_team_id: home.0.to_string(),
        home_team_name: home.1.to_string(),
        home_team_mascot: home.2.to_string(),
        away_team_id: away.0.to_string(),
        away_team_name: away.1.to_string(),
        away_team_mascot: away.2.to_string(),
    }
}

fn primary_colors(home: &str, away: &str) -> TeamColors {
    TeamColors {
        home_primary_color: Some(home.to_string()),
        away_primary_color: Some(away.to_string()),
        ..TeamColors::default()
    }
}

fn live_games(now: DateTime<Utc>) -> Vec<LiveGame> {
    vec![
        LiveGame {
            id: "demo-playoff-001".to_string(),
            matchup: matchup(
                ("team-highland-park", "Highland Park", "Scots"),
                ("team-midlothian", "Midlothian", "Panthers"),
            ),
            home_score: 28,
            away_score: 24,
            quarter: "4Q".to_string(),
            time_remaining: "3:47".to_string(),
            is_live: true,
            district: "Playoffs".to_string(),
            classification: "5A".to_string(),
            location: "AT&T Stadium, Arlington".to_string(),
            started_at: now,
            updated_at: now,
            colors: primary_colors("#003087", "#8B0000"),
            home_state_rank: Some(3),
            away_state_rank: Some(7),
            home_national_rank: None,
            away_national_rank: None,
            broadcaster: Some("NFHS Network".to_string()),
        },
        LiveGame {
            id: "live-6a-matchup".to_string(),
            matchup: matchup(
                ("team-southlake-carroll", "Southlake Carroll", "Dragons"),
                ("team-allen", "Allen", "Eagles"),
            ),
            home_score: 21,
            away_score: 17,
            quarter: "3Q".to_string(),
            time_remaining: "8:12".to_string(),
            is_live: true,
            district: "6A Region II".to_string(),
            classification: "6A".to_string(),
            location: "Dragon Stadium".to_string(),
            started_at: now,
            updated_at: now,
            colors: primary_colors("#003F2D", "#006747"),
            home_state_rank: Some(1),
            away_state_rank: Some(2),
            home_national_rank: Some(5),
            away_national_rank: Some(8),
            broadcaster: Some("ESPN+".to_string()),
        },
    ]
}

fn finished_games() -> Vec<FinishedGame> {
    NaiveDate::from_ymd_opt(2025, 11, 8)
        .map(|date| FinishedGame {
            id: "finished-001".to_string(),
            matchup: matchup(
                ("team-duncanville", "Duncanville", "Panthers"),
                ("team-desoto", "DeSoto", "Eagles"),
            ),
            home_score: 42,
            away_score: 35,
            date,
            time: "7:30 PM".to_string(),
            location: "Panther Stadium".to_string(),
            district: "6A Region I".to_string(),
            classification: "6A".to_string(),
            final_status: "FINAL".to_string(),
            colors: primary_colors("#000000", "#00205B"),
            home_record: Some("9-1".to_string()),
            away_record: Some("8-2".to_string()),
        })
        .into_iter()
        .collect()
}

fn upcoming_games() -> Vec<UpcomingGame> {
    NaiveDate::from_ymd_opt(2025, 11, 15)
        .map(|date| UpcomingGame {
            id: "upcoming-001".to_string(),
            matchup: matchup(
                ("team-jesuit", "Jesuit", "Rangers"),
                ("team-bishop-lynch", "Bishop Lynch", "Friars"),
            ),
            date,
            time: "7:00 PM".to_string(),
            location: "Postell Stadium".to_string(),
            district: "TAPPS D1 District 1".to_string(),
            classification: "TAPPS".to_string(),
            week: 11,
            colors: primary_colors("#00205B", "#8B0000"),
            home_record: Some("7-2".to_string()),
            away_record: Some("6-3".to_string()),
        })
        .into_iter()
        .collect()
}

pub fn scores(filter: &ScoreFilter, now: DateTime<Utc>) -> ScoresResponse {
    ScoresResponse {
        live_games: live_games(now)
            .into_iter()
            .filter(|g| filter.classification_matches(&g.classification))
            .collect(),
        upcoming_games: upcoming_games()
            .into_iter()
            .filter(|g| filter.classification_matches(&g.classification))
            .filter(|g| filter.date_matches(g.date))
            .collect(),
        finished_games: finished_games()
            .into_iter()
            .filter(|g| filter.classification_matches(&g.classification))
            .filter(|g| filter.date_matches(g.date))
            .collect(),
        updated_at: now,
    }
}
