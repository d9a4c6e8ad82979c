// Team dashboard - sample payload for the coach/fan home screen.
//
// No database behind this yet; the payload is fixed apart from the team id
// and the game-day flag.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::Serialize;

const DEFAULT_TEAM_ID: &str = "8f2c1b0d-3a9d-41c6-9f02-8e4e5e1c56a4";

#[derive(Debug, Clone, Serialize)]
pub struct Team {
    pub id: String,
    pub name: String,
    pub mascot: String,
    pub city: Option<String>,
    pub record: Option<String>,
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct LastGameScore {
    pub home: u32,
    pub away: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct LastGame {
    pub date: NaiveDate,
    pub opponent: String,
    pub location: String,
    pub score: LastGameScore,
    pub result: String,
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpcomingGame {
    pub date: NaiveDate,
    pub opponent: String,
    pub location: String,
    pub kickoff_time: Option<DateTime<Utc>>,
    pub preview: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AvailabilityItem {
    pub number: u32,
    pub name: String,
    pub position: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PlayerAvailability {
    pub cleared: Vec<AvailabilityItem>,
    pub limited: Vec<AvailabilityItem>,
    pub out: Vec<AvailabilityItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct KeyPerformer {
    pub player_id: String,
    pub name: String,
    pub position: Option<String>,
    pub statline: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamStats {
    pub points_per_game: f64,
    pub yards_per_game: u32,
    pub turnover_margin: String,
    pub third_down_pct: f64,
    pub red_zone_efficiency: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CoachNote {
    pub id: String,
    pub author: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardPayload {
    pub is_game_day: bool,
    pub team: Team,
    pub last_game: Option<LastGame>,
    pub upcoming_game: Option<UpcomingGame>,
    pub player_availability: PlayerAvailability,
    pub key_performers: Vec<KeyPerformer>,
    pub team_stats: Option<TeamStats>,
    pub coach_notes: Vec<CoachNote>,
}

fn available(number: u32, name: &str, position: &str, note: Option<&str>) -> AvailabilityItem {
    AvailabilityItem {
        number,
        name: name.to_string(),
        position: Some(position.to_string()),
        note: note.map(str::to_string),
    }
}

fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> Option<DateTime<Utc>> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).single()
}

/// Build the dashboard for `team_id` as of `today`.
pub fn dashboard(team_id: Option<&str>, today: NaiveDate) -> DashboardPayload {
    let upcoming_game = NaiveDate::from_ymd_opt(2025, 11, 14).map(|date| UpcomingGame {
        date,
        opponent: "Burleson Elks".to_string(),
        location: "Away".to_string(),
        kickoff_time: utc(2025, 11, 14, 19, 0),
        preview: Some(
            "District rivalry on the road; emphasis on third-down efficiency.".to_string(),
        ),
    });

    let is_game_day = upcoming_game
        .as_ref()
        .map(|game| game.date == today)
        .unwrap_or(false);

    let last_game = NaiveDate::from_ymd_opt(2025, 10, 18).map(|date| LastGame {
        date,
        opponent: "Cleburne Yellowjackets".to_string(),
        location: "Home".to_string(),
        score: LastGameScore { home: 24, away: 21 },
        result: "W".to_string(),
        summary: Some(
            "QB J. Miller threw for 212 yards and 2 TDs as Joshua edged Cleburne 24-21."
                .to_string(),
        ),
    });

    let coach_notes = [
        (
            "bfda90e2-1b45-4c52-99f1-c129cb3f34c7",
            "Coach Davis",
            "Strong week of practice. Focus on tackling angles.",
            utc(2025, 10, 21, 15, 42),
        ),
        (
            "ae9cb7f1-7821-4bc2-8c91-0d4cfb4a2b73",
            "DC Smith",
            "Burleson lives on quick slants. Press outside, help inside.",
            utc(2025, 10, 22, 9, 12),
        ),
    ]
    .into_iter()
    .filter_map(|(id, author, body, created_at)| {
        Some(CoachNote {
            id: id.to_string(),
            author: author.to_string(),
            body: body.to_string(),
            created_at: created_at?,
        })
    })
    .collect();

    DashboardPayload {
        is_game_day,
        team: Team {
            id: team_id.unwrap_or(DEFAULT_TEAM_ID).to_string(),
            name: "Joshua".to_string(),
            mascot: "Owls".to_string(),
            city: Some("Joshua, TX".to_string()),
            record: Some("3-2".to_string()),
            logo_url: Some("https://statiq.app/assets/teams/joshua-owls.png".to_string()),
        },
        last_game,
        upcoming_game,
        player_availability: PlayerAvailability {
            cleared: vec![
                available(7, "J. Miller", "QB", None),
                available(22, "T. Reed", "RB", None),
                available(10, "K. Lopez", "WR", None),
            ],
            limited: vec![available(11, "S. King", "WR", Some("ankle sprain"))],
            out: vec![available(54, "M. Hall", "LB", Some("concussion protocol"))],
        },
        key_performers: vec![
            KeyPerformer {
                player_id: "9bcd14a1-22df-4ad2-bfa8-0a72a3cc9e2e".to_string(),
                name: "T. Reed".to_string(),
                position: Some("RB".to_string()),
                statline: "18 rushes, 112 yds, 1 TD".to_string(),
            },
            KeyPerformer {
                player_id: "a642a97c-83b4-4b19-ae7e-1b665b6e2c58".to_string(),
                name: "J. Miller".to_string(),
                position: Some("QB".to_string()),
                statline: "14/21, 212 yds, 2 TD, 0 INT".to_string(),
            },
        ],
        team_stats: Some(TeamStats {
            points_per_game: 26.4,
            yards_per_game: 328,
            turnover_margin: "+3".to_string(),
            third_down_pct: 0.46,
            red_zone_efficiency: 0.71,
        }),
        coach_notes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_team_id_is_echoed() {
        let payload = dashboard(Some("abc-123"), day(2025, 10, 20));
        assert_eq!(payload.team.id, "abc-123");
        assert_eq!(dashboard(None, day(2025, 10, 20)).team.id, DEFAULT_TEAM_ID);
    }

    #[test]
    fn test_game_day_only_on_kickoff_date() {
        assert!(!dashboard(None, day(2025, 11, 13)).is_game_day);
        assert!(dashboard(None, day(2025, 11, 14)).is_game_day);
    }

    #[test]
    fn test_payload_serializes_dates_as_iso() {
        let json = serde_json::to_value(dashboard(None, day(2025, 10, 20))).unwrap();
        assert_eq!(json["last_game"]["date"], "2025-10-18");
        assert_eq!(json["upcoming_game"]["kickoff_time"], "2025-11-14T19:00:00Z");
        assert_eq!(json["player_availability"]["out"][0]["note"], "concussion protocol");
        assert_eq!(json["coach_notes"].as_array().unwrap().len(), 2);
    }
}
