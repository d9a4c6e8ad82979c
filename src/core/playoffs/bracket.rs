// Playoff bracket - sample 5A D1 bracket, round by round.

use serde::Serialize;

pub const DEFAULT_CONFERENCE: &str = "5A D1";

#[derive(Debug, Clone, Serialize)]
pub struct BracketTeam {
    pub id: i64,
    pub name: String,
    pub mascot: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayoffGame {
    pub id: i64,
    pub game_id: String,
    pub region: u32,
    pub home_team: BracketTeam,
    pub away_team: BracketTeam,
    pub home_score: Option<u32>,
    pub away_score: Option<u32>,
    pub status: String,
    pub kickoff_at: Option<String>,
    pub location: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayoffRound {
    pub round: String,
    pub games: Vec<PlayoffGame>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayoffBracketResponse {
    pub conference: String,
    pub rounds: Vec<PlayoffRound>,
}

fn team(id: i64, name: &str, mascot: &str) -> BracketTeam {
    BracketTeam {
        id,
        name: name.to_string(),
        mascot: mascot.to_string(),
    }
}

fn tbd(id: i64) -> BracketTeam {
    team(id, "TBD", "")
}

struct Slot<'a> {
    id: i64,
    game_id: &'a str,
    region: u32,
    home: BracketTeam,
    away: BracketTeam,
    score: Option<(u32, u32)>,
    kickoff_at: Option<&'a str>,
    location: &'a str,
    notes: Option<&'a str>,
}

impl From<Slot<'_>> for PlayoffGame {
    fn from(slot: Slot<'_>) -> Self {
        PlayoffGame {
            id: slot.id,
            game_id: slot.game_id.to_string(),
            region: slot.region,
            home_team: slot.home,
            away_team: slot.away,
            home_score: slot.score.map(|(home, _)| home),
            away_score: slot.score.map(|(_, away)| away),
            status: if slot.score.is_some() { "final" } else { "scheduled" }.to_string(),
            kickoff_at: slot.kickoff_at.map(str::to_string),
            location: slot.location.to_string(),
            notes: slot.notes.map(str::to_string),
        }
    }
}

fn round(name: &str, slots: Vec<Slot<'_>>) -> PlayoffRound {
    PlayoffRound {
        round: name.to_string(),
        games: slots.into_iter().map(PlayoffGame::from).collect(),
    }
}

/// The bracket for `conference`. Only one bracket exists; the conference
/// is echoed back.
pub fn playoff_bracket(conference: Option<&str>) -> PlayoffBracketResponse {
    let rounds = vec![
        round(
            "Bi-District",
            vec![
                Slot {
                    id: 218,
                    game_id: "G1",
                    region: 1,
                    home: team(1, "Highland Park", "Scots"),
                    away: team(2, "Midlothian", "Panthers"),
                    score: Some((28, 24)),
                    kickoff_at: Some("2025-11-08T19:00:00Z"),
                    location: "AT&T Stadium",
                    notes: Some("Highland Park advances"),
                },
                Slot {
                    id: 219,
                    game_id: "G2",
                    region: 1,
                    home: team(3, "Lovejoy", "Leopards"),
                    away: team(4, "Frisco Reedy", "Lions"),
                    score: Some((35, 21)),
                    kickoff_at: Some("2025-11-08T19:30:00Z"),
                    location: "McKinney ISD Stadium",
                    notes: Some("Lovejoy advances"),
                },
                Slot {
                    id: 220,
                    game_id: "G3",
                    region: 2,
                    home: team(5, "Texas High", "Tigers"),
                    away: team(6, "Mount Pleasant", "Tigers"),
                    score: None,
                    kickoff_at: Some("2025-11-15T19:00:00Z"),
                    location: "Christus Trinity Mother Frances Rose Stadium",
                    notes: None,
                },
                Slot {
                    id: 221,
                    game_id: "G4",
                    region: 2,
                    home: team(7, "Longview", "Lobos"),
                    away: team(8, "Tyler", "Lions"),
                    score: None,
                    kickoff_at: Some("2025-11-15T19:30:00Z"),
                    location: "Lobo Stadium",
                    notes: None,
                },
            ],
        ),
        round(
            "Area",
            vec![
                Slot {
                    id: 222,
                    game_id: "G5",
                    region: 1,
                    home: team(1, "Highland Park", "Scots"),
                    away: team(3, "Lovejoy", "Leopards"),
                    score: None,
                    kickoff_at: Some("2025-11-22T19:00:00Z"),
                    location: "AT&T Stadium",
                    notes: Some("Winner of G1 vs Winner of G2"),
                },
                Slot {
                    id: 223,
                    game_id: "G6",
                    region: 2,
                    home: tbd(5),
                    away: tbd(7),
                    score: None,
                    kickoff_at: None,
                    location: "TBD",
                    notes: Some("Winner of G3 vs Winner of G4"),
                },
            ],
        ),
        round(
            "Regional",
            vec![Slot {
                id: 224,
                game_id: "G7",
                region: 1,
                home: tbd(0),
                away: tbd(0),
                score: None,
                kickoff_at: None,
                location: "TBD",
                notes: Some("Winner of G5 vs Winner of G6"),
            }],
        ),
        round(
            "State Semifinal",
            vec![Slot {
                id: 225,
                game_id: "G8",
                region: 1,
                home: tbd(0),
                away: tbd(0),
                score: None,
                kickoff_at: None,
                location: "AT&T Stadium",
                notes: Some("Regional Champions"),
            }],
        ),
        round(
            "State Championship",
            vec![Slot {
                id: 226,
                game_id: "G9",
                region: 1,
                home: tbd(0),
                away: tbd(0),
                score: None,
                kickoff_at: None,
                location: "AT&T Stadium",
                notes: Some("State Championship Game"),
            }],
        ),
    ];

    PlayoffBracketResponse {
        conference: conference.unwrap_or(DEFAULT_CONFERENCE).to_string(),
        rounds,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rounds_in_order() {
        let bracket = playoff_bracket(None);
        let names: Vec<_> = bracket.rounds.iter().map(|r| r.round.as_str()).collect();
        assert_eq!(
            names,
            vec!["Bi-District", "Area", "Regional", "State Semifinal", "State Championship"]
        );
        assert_eq!(bracket.conference, DEFAULT_CONFERENCE);
    }

    #[test]
    fn test_finished_games_carry_scores() {
        let bracket = playoff_bracket(Some("6A D2"));
        assert_eq!(bracket.conference, "6A D2");
        let g1 = &bracket.rounds[0].games[0];
        assert_eq!((g1.home_score, g1.away_score), (Some(28), Some(24)));
        assert_eq!(g1.status, "final");
        let g3 = &bracket.rounds[0].games[2];
        assert_eq!(g3.status, "scheduled");
        assert!(g3.home_score.is_none());

        let ids: Vec<i64> = bracket
            .rounds
            .iter()
            .flat_map(|r| r.games.iter().map(|g| g.id))
            .collect();
        assert_eq!(ids, (218..=226).collect::<Vec<_>>());
    }
}
