// Game detail and per-game stat leaders.
//
// Sample data until player stats are imported per game.

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct GameLeader {
    pub player_id: String,
    pub player_name: String,
    pub jersey_number: Option<u32>,
    pub position: String,

    pub passing_yards: Option<u32>,
    pub passing_completions: Option<u32>,
    pub passing_attempts: Option<u32>,
    pub passing_tds: Option<u32>,

    pub rushing_yards: Option<u32>,
    pub rushing_carries: Option<u32>,
    pub rushing_tds: Option<u32>,

    pub receiving_yards: Option<u32>,
    pub receptions: Option<u32>,
    pub receiving_tds: Option<u32>,

    pub tackles: Option<u32>,
    pub sacks: Option<f64>,
    pub interceptions: Option<u32>,
}

impl GameLeader {
    fn player(id: &str, name: &str, number: u32, position: &str) -> Self {
        Self {
            player_id: id.to_string(),
            player_name: name.to_string(),
            jersey_number: Some(number),
            position: position.to_string(),
            ..Self::default()
        }
    }

    fn passing(mut self, yards: u32, completions: u32, attempts: u32, tds: u32) -> Self {
        self.passing_yards = Some(yards);
        self.passing_completions = Some(completions);
        self.passing_attempts = Some(attempts);
        self.passing_tds = Some(tds);
        self
    }

    fn rushing(mut self, yards: u32, carries: u32, tds: u32) -> Self {
        self.rushing_yards = Some(yards);
        self.rushing_carries = Some(carries);
        self.rushing_tds = Some(tds);
        self
    }

    fn receiving(mut self, yards: u32, receptions: u32, tds: u32) -> Self {
        self.receiving_yards = Some(yards);
        self.receptions = Some(receptions);
        self.receiving_tds = Some(tds);
        self
    }

    fn with_tackles(mut self, tackles: u32) -> Self {
        self.tackles = Some(tackles);
        self
    }

    fn with_sacks(mut self, sacks: f64) -> Self {
        self.sacks = Some(sacks);
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamLeaders {
    pub team_id: String,
    pub team_name: String,
    pub team_mascot: String,
    pub team_color: Option<String>,
    pub passing: Option<GameLeader>,
    pub rushing: Option<GameLeader>,
    pub receiving: Option<GameLeader>,
    pub tackles: Option<GameLeader>,
    pub sacks: Option<GameLeader>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GameLeadersResponse {
    pub game_id: String,
    pub home_team: TeamLeaders,
    pub away_team: TeamLeaders,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Analytics {
    pub away_win_probability: f64,
    pub home_win_probability: f64,
    pub confidence: String,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Predictions {
    pub away_percentage: f64,
    pub home_percentage: f64,
    pub total_votes: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct GameDetailResponse {
    pub id: i64,
    pub home_team_id: i64,
    pub away_team_id: i64,
    pub home_team_name: String,
    pub away_team_name: String,
    pub home_team_mascot: Option<String>,
    pub away_team_mascot: Option<String>,
    pub home_score: Option<u32>,
    pub away_score: Option<u32>,
    pub quarter: Option<String>,
    pub time_remaining: Option<String>,
    pub is_live: bool,
    pub classification: Option<String>,
    pub location: Option<String>,
    pub kickoff_at: Option<String>,
    pub date: Option<String>,
    pub broadcaster: Option<String>,
    pub home_primary_color: Option<String>,
    pub away_primary_color: Option<String>,
    pub analytics: Option<Analytics>,
    pub predictions: Option<Predictions>,
}

struct TeamSheet<'a> {
    id: &'a str,
    name: &'a str,
    mascot: &'a str,
    color: &'a str,
    leaders: [GameLeader; 5],
}

fn team_leaders(sheet: TeamSheet<'_>) -> TeamLeaders {
    let [passing, rushing, receiving, tackles, sacks] = sheet.leaders;
    TeamLeaders {
        team_id: sheet.id.to_string(),
        team_name: sheet.name.to_string(),
        team_mascot: sheet.mascot.to_string(),
        team_color: Some(sheet.color.to_string()),
        passing: Some(passing),
        rushing: Some(rushing),
        receiving: Some(receiving),
        tackles: Some(tackles),
        sacks: Some(sacks),
    }
}

/// Stat leaders for both teams of a game.
pub fn game_leaders(game_id: &str, now: DateTime<Utc>) -> GameLeadersResponse {
    let (home, away) = if game_id == "demo-playoff-001" {
        (
            TeamSheet {
                id: "team-highland-park",
                name: "Highland Park",
                mascot: "Scots",
                color: "#003087",
                leaders: [
                    GameLeader::player("player-hp-1", "C. Martinez", 7, "QB").passing(287, 21, 31, 3),
                    GameLeader::player("player-hp-2", "B. Johnson", 22, "RB").rushing(142, 22, 2),
                    GameLeader::player("player-hp-3", "T. Harris", 1, "WR").receiving(156, 9, 2),
                    GameLeader::player("player-hp-4", "J. Davis", 44, "LB").with_tackles(14),
                    GameLeader::player("player-hp-5", "M. Thompson", 95, "DE").with_sacks(2.0),
                ],
            },
            TeamSheet {
                id: "team-midlothian",
                name: "Midlothian",
                mascot: "Panthers",
                color: "#8B0000",
                leaders: [
                    GameLeader::player("player-mid-1", "D. Anderson", 10, "QB").passing(224, 18, 26, 1),
                    GameLeader::player("player-mid-2", "J. Smith", 5, "RB").rushing(94, 18, 1),
                    GameLeader::player("player-mid-3", "M. Rodriguez", 11, "WR").receiving(118, 7, 1),
                    GameLeader::player("player-mid-4", "K. Williams", 33, "LB").with_tackles(12),
                    GameLeader::player("player-mid-5", "R. Jackson", 91, "DT").with_sacks(1.5),
                ],
            },
        )
    } else {
        (
            TeamSheet {
                id: "team-home",
                name: "Home Team",
                mascot: "Eagles",
                color: "#003087",
                leaders: [
                    GameLeader::player("player-1", "J. Smith", 7, "QB").passing(245, 18, 28, 2),
                    GameLeader::player("player-2", "M. Johnson", 22, "RB").rushing(118, 19, 1),
                    GameLeader::player("player-3", "D. Brown", 1, "WR").receiving(132, 7, 1),
                    GameLeader::player("player-4", "C. Davis", 44, "LB").with_tackles(11),
                    GameLeader::player("player-5", "T. Williams", 95, "DE").with_sacks(1.5),
                ],
            },
            TeamSheet {
                id: "team-away",
                name: "Away Team",
                mascot: "Panthers",
                color: "#8B0000",
                leaders: [
                    GameLeader::player("player-6", "K. Anderson", 10, "QB").passing(198, 15, 24, 1),
                    GameLeader::player("player-7", "R. Martinez", 5, "RB").rushing(87, 16, 1),
                    GameLeader::player("player-8", "L. Thompson", 11, "WR").receiving(94, 6, 0),
                    GameLeader::player("player-9", "P. Rodriguez", 33, "LB").with_tackles(9),
                    GameLeader::player("player-10", "S. Jackson", 91, "DT").with_sacks(1.0),
                ],
            },
        )
    };

    GameLeadersResponse {
        game_id: game_id.to_string(),
        home_team: team_leaders(home),
        away_team: team_leaders(away),
        updated_at: now,
    }
}

/// Game detail with win probabilities and fan predictions.
pub fn game_detail(game_id: i64, now: DateTime<Utc>) -> GameDetailResponse {
    if game_id == 8 {
        return GameDetailResponse {
            id: 8,
            home_team_id: 16,
            away_team_id: 15,
            home_team_name: "Highland Park".to_string(),
            away_team_name: "Lovejoy".to_string(),
            home_team_mascot: Some("Scots".to_string()),
            away_team_mascot: Some("Leopards".to_string()),
            home_score: None,
            away_score: None,
            quarter: None,
            time_remaining: None,
            is_live: false,
            classification: Some("5A Division I".to_string()),
            location: Some("Highlander Stadium".to_string()),
            kickoff_at: Some("2025-11-15T19:00:00Z".to_string()),
            date: Some("2025-11-15".to_string()),
            broadcaster: Some("NFHS Network".to_string()),
            home_primary_color: Some("#003087".to_string()),
            away_primary_color: Some("#B4D836".to_string()),
            analytics: Some(Analytics {
                away_win_probability: 94.3,
                home_win_probability: 5.7,
                confidence: "High".to_string(),
                last_updated: now,
            }),
            predictions: Some(Predictions {
                away_percentage: 67.5,
                home_percentage: 32.5,
                total_votes: 1247,
            }),
        };
    }

    GameDetailResponse {
        id: game_id,
        home_team_id: 1,
        away_team_id: 2,
        home_team_name: "Home Team".to_string(),
        away_team_name: "Away Team".to_string(),
        home_team_mascot: Some("Eagles".to_string()),
        away_team_mascot: Some("Panthers".to_string()),
        home_score: None,
        away_score: None,
        quarter: None,
        time_remaining: None,
        is_live: false,
        classification: Some("6A Division I".to_string()),
        location: Some("Stadium".to_string()),
        kickoff_at: Some(now.to_rfc3339()),
        date: Some(now.date_naive().to_string()),
        broadcaster: Some("Local TV".to_string()),
        home_primary_color: Some("#003087".to_string()),
        away_primary_color: Some("#8B0000".to_string()),
        analytics: Some(Analytics {
            away_win_probability: 52.3,
            home_win_probability: 47.7,
            confidence: "Medium".to_string(),
            last_updated: now,
        }),
        predictions: Some(Predictions {
            away_percentage: 55.0,
            home_percentage: 45.0,
            total_votes: 842,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_playoff_sheet() {
        let leaders = game_leaders("demo-playoff-001", Utc::now());
        assert_eq!(leaders.home_team.team_name, "Highland Park");
        let passing = leaders.home_team.passing.unwrap();
        assert_eq!(passing.player_name, "C. Martinez");
        assert_eq!(passing.passing_yards, Some(287));
        assert_eq!(leaders.away_team.sacks.unwrap().sacks, Some(1.5));
    }

    #[test]
    fn test_other_games_get_generic_sheet() {
        let leaders = game_leaders("anything", Utc::now());
        assert_eq!(leaders.game_id, "anything");
        assert_eq!(leaders.home_team.team_id, "team-home");
        assert_eq!(leaders.away_team.receiving.unwrap().receiving_tds, Some(0));
    }

    #[test]
    fn test_game_eight_has_lovejoy_prediction() {
        let detail = game_detail(8, Utc::now());
        assert_eq!(detail.away_team_name, "Lovejoy");
        let analytics = detail.analytics.unwrap();
        assert_eq!(analytics.confidence, "High");
        assert_eq!(detail.predictions.unwrap().total_votes, 1247);
    }

    #[test]
    fn test_generic_detail_echoes_id() {
        let detail = game_detail(42, Utc::now());
        assert_eq!(detail.id, 42);
        assert_eq!(detail.predictions.unwrap().total_votes, 842);
    }
}
