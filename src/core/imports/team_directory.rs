// Team lookup for score imports.

use super::score_lines::normalize_team_name;
use serde::Serialize;
use std::collections::HashMap;

/// A team row as the importer sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamRecord {
    pub id: i64,
    pub name: String,
    pub classification: Option<String>,
}

/// Name -> team index. Every team is reachable by its lowercased name and
/// by its normalised name; aliases are layered on top.
#[derive(Debug, Default)]
pub struct TeamDirectory {
    teams: HashMap<String, TeamRecord>,
}

impl TeamDirectory {
    pub fn new(teams: Vec<TeamRecord>) -> Self {
        let mut index = HashMap::new();

        for team in &teams {
            index.insert(team.name.trim().to_lowercase(), team.clone());
        }
        // Full names win over a shorter team's normalised form.
        for team in teams {
            index.entry(normalize_team_name(&team.name)).or_insert(team);
        }

        Self { teams: index }
    }

    /// Add `alias -> official team name` entries. Returns the aliases whose
    /// target team is not in the directory.
    pub fn with_aliases(mut self, aliases: &HashMap<String, String>) -> (Self, Vec<String>) {
        let mut unresolved = Vec::new();

        for (alias, official) in aliases {
            match self.teams.get(&official.trim().to_lowercase()).cloned() {
                Some(team) => {
                    self.teams.insert(alias.trim().to_lowercase(), team);
                }
                None => unresolved.push(alias.clone()),
            }
        }

        unresolved.sort();
        (self, unresolved)
    }

    /// Normalised name first, then the raw lowercased name.
    pub fn find(&self, name: &str) -> Option<&TeamRecord> {
        self.teams
            .get(&normalize_team_name(name))
            .or_else(|| self.teams.get(&name.trim().to_lowercase()))
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(id: i64, name: &str, classification: &str) -> TeamRecord {
        TeamRecord {
            id,
            name: name.to_string(),
            classification: Some(classification.to_string()),
        }
    }

    fn directory() -> TeamDirectory {
        TeamDirectory::new(vec![
            team(16, "Joshua", "5A-D1"),
            team(215, "Dallas Highland Park", "5A-D1"),
            team(283, "El Paso Americas", "5A-D1"),
            team(38, "Americas", "5A-D1"),
            team(406, "Dallas Jesuit", "6A"),
        ])
    }

    #[test]
    fn test_finds_by_full_and_normalised_name() {
        let dir = directory();
        assert_eq!(dir.find("JOSHUA").unwrap().id, 16);
        assert_eq!(dir.find("Highland Park").unwrap().id, 215);
        assert_eq!(dir.find("Dallas Highland Park").unwrap().id, 215);
        assert_eq!(dir.find("Joshua High School").unwrap().id, 16);
        assert!(dir.find("Cleburne").is_none());
    }

    #[test]
    fn test_full_name_beats_normalised_collision() {
        let dir = directory();
        assert_eq!(dir.find("Americas").unwrap().id, 38);
    }

    #[test]
    fn test_falls_back_to_raw_name() {
        let aliases = HashMap::from([("sa clemens".to_string(), "Dallas Jesuit".to_string())]);
        let (dir, _) = directory().with_aliases(&aliases);
        // Normalises to "clemens", which only the raw alias key matches.
        assert_eq!(dir.find("SA Clemens").unwrap().id, 406);
        assert_eq!(dir.find("Jesuit").unwrap().id, 406);
    }

    #[test]
    fn test_aliases_point_at_official_names() {
        let aliases = HashMap::from([
            ("HP".to_string(), "Dallas Highland Park".to_string()),
            ("consol".to_string(), "A&M Consolidated".to_string()),
        ]);
        let (dir, unresolved) = directory().with_aliases(&aliases);
        assert_eq!(dir.find("hp").unwrap().id, 215);
        assert_eq!(unresolved, vec!["consol".to_string()]);
    }
}
