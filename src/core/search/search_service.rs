// Global search across district teams, the Joshua roster and coaching staff.

use crate::core::players::{player_id, roster, TEAM_MASCOT, TEAM_NAME};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SearchResult {
    Team {
        id: String,
        name: String,
        mascot: String,
        district: String,
        record: String,
    },
    Player {
        id: String,
        name: String,
        number: String,
        position: String,
        team: String,
    },
    Coach {
        id: String,
        name: String,
        title: String,
        team: String,
    },
}

// (id, name, mascot, district, record)
const DISTRICT_TEAMS: &[(&str, &str, &str, &str, &str)] = &[
    ("1", "Highland Park", "Scots", "District 7-5A", "8-2"),
    ("2", "Joshua", "Owls", "District 7-5A", "4-3"),
    ("3", "Red Oak", "Hawks", "District 7-5A", "4-4"),
    ("4", "Tyler", "Lions", "District 7-5A", "2-6"),
    ("5", "Midlothian", "Panthers", "District 7-5A", "5-3"),
    ("6", "Centennial", "Titans", "District 7-5A", "3-5"),
    ("7", "Cleburne", "Yellow Jackets", "District 7-5A", "1-8"),
];

// (name, title)
const COACHES: &[(&str, &str)] = &[
    ("Danny Dearman", "AD/Head Coach"),
    ("Doughtery", "DC"),
    ("Carnes", "OC & OL"),
    ("Payne", "Safeties & Assoc. HC"),
    ("Wortham", "LB"),
    ("Gillmore", "OL"),
    ("Williams", "DE"),
    ("Hood", "DT"),
    ("Woolard", "QB & RB/FB"),
    ("Nickels", "Slots"),
    ("Harkness", "WR"),
];

/// Case-insensitive substring search. Teams come first, then players, then coaches.
pub fn search(query: &str) -> Vec<SearchResult> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }
    let full_team = format!("{} {}", TEAM_NAME, TEAM_MASCOT);

    let teams = DISTRICT_TEAMS
        .iter()
        .filter(|(_, name, mascot, _, _)| {
            name.to_lowercase().contains(&query) || mascot.to_lowercase().contains(&query)
        })
        .map(|(id, name, mascot, district, record)| SearchResult::Team {
            id: id.to_string(),
            name: name.to_string(),
            mascot: mascot.to_string(),
            district: district.to_string(),
            record: record.to_string(),
        });

    let players = roster()
        .iter()
        .filter(|p| {
            p.name.to_lowercase().contains(&query) || p.number.to_string().contains(&query)
        })
        .map(|p| SearchResult::Player {
            id: player_id(p.number),
            name: p.name.clone(),
            number: p.number.to_string(),
            position: p.position.clone(),
            team: full_team.clone(),
        });

    let coaches = COACHES
        .iter()
        .filter(|(name, title)| {
            name.to_lowercase().contains(&query) || title.to_lowercase().contains(&query)
        })
        .map(|(name, title)| SearchResult::Coach {
            id: format!("coach_{}", name.replace(' ', "_")),
            name: name.to_string(),
            title: title.to_string(),
            team: full_team.clone(),
        });

    teams.chain(players).chain(coaches).collect()
}
