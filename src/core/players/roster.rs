// Joshua Owls roster with season stats.
//
// The roster ships with the binary as JSON and is parsed once on first use.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

pub const TEAM_NAME: &str = "Joshua";
pub const TEAM_MASCOT: &str = "Owls";

static ROSTER_JSON: &str = include_str!("joshua_roster.json");

static ROSTER: Lazy<Vec<RosterPlayer>> = Lazy::new(|| {
    let mut players: Vec<RosterPlayer> = match serde_json::from_str(ROSTER_JSON) {
        Ok(players) => players,
        Err(e) => {
            tracing::error!("Failed to parse bundled roster: {}", e);
            Vec::new()
        }
    };
    players.sort_by_key(|p| p.number);
    players
});

#[derive(Debug, Clone, Deserialize)]
pub struct RosterPlayer {
    pub number: u32,
    pub name: String,
    pub position: String,
    pub class: String,
    pub height: String,
    pub weight: String,
    #[serde(default)]
    pub gpa: Option<String>,
    /// Season stats; keys vary by position.
    #[serde(default)]
    pub stats: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerResponse {
    pub id: String,
    pub number: String,
    pub name: String,
    pub position: String,
    pub class: String,
    pub height: String,
    pub weight: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gpa: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<serde_json::Value>,
    pub team: String,
    pub mascot: String,
}

impl From<&RosterPlayer> for PlayerResponse {
    fn from(player: &RosterPlayer) -> Self {
        Self {
            id: player_id(player.number),
            number: player.number.to_string(),
            name: player.name.clone(),
            position: player.position.clone(),
            class: player.class.clone(),
            height: player.height.clone(),
            weight: player.weight.clone(),
            gpa: player.gpa.clone(),
            stats: player.stats.clone(),
            team: TEAM_NAME.to_string(),
            mascot: TEAM_MASCOT.to_string(),
        }
    }
}

pub fn player_id(number: u32) -> String {
    format!("player_{}", number)
}

/// The full roster, ordered by jersey number.
pub fn roster() -> &'static [RosterPlayer] {
    &ROSTER
}

/// Find a player by `player_<n>`, a bare jersey number, or a name slug
/// such as `brayden-payne`.
pub fn find_player(player_id: &str) -> Option<&'static RosterPlayer> {
    let player_id = player_id.trim();
    let number = player_id.strip_prefix("player_").unwrap_or(player_id);

    if let Ok(number) = number.parse::<u32>() {
        return roster().iter().find(|p| p.number == number);
    }

    let name = player_id.replace('-', " ").to_lowercase();
    roster().iter().find(|p| p.name.to_lowercase() == name)
}

/// Player detail. Unlike the list entries, `gpa` is always present.
pub fn player_detail(player_id: &str) -> Option<PlayerResponse> {
    find_player(player_id).map(|player| {
        let mut response = PlayerResponse::from(player);
        response.gpa.get_or_insert_with(|| "N/A".to_string());
        response
    })
}

/// Every rostered player. `team` is accepted for future multi-team rosters
/// and does not filter yet.
pub fn list_players(_team: Option<&str>) -> Vec<PlayerResponse> {
    roster().iter().map(PlayerResponse::from).collect()
}
