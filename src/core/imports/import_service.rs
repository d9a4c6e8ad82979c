// Import service - operator-run maintenance of the games table.
//
// Weekly score import from pasted text, playoff score updates and duplicate
// game cleanup. Parsing and classification are pure; the store trait is the
// only way out to the database.

use super::score_lines::{parse_score_text, ScoreLine};
use super::team_directory::{TeamDirectory, TeamRecord};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap};
use std::fmt::Write as _;
use thiserror::Error;

pub const DEFAULT_FOCUS_CLASSIFICATION: &str = "5A-D1";
pub const FINAL_STATUS: &str = "final";
pub const REGULAR_GAME: &str = "regular";

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Invalid alias file: {0}")]
    InvalidAliases(String),
}

// ============================================================================
// MODELS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGame {
    pub home_team_id: i64,
    pub away_team_id: i64,
    pub home_score: u32,
    pub away_score: u32,
    pub kickoff_at: String,
    pub status: String,
    pub game_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRow {
    pub id: i64,
    pub home_team_id: i64,
    pub away_team_id: i64,
    pub home_team: String,
    pub away_team: String,
    pub home_score: Option<u32>,
    pub away_score: Option<u32>,
    pub kickoff_at: String,
}

/// A game where both teams resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedGame {
    pub home: TeamRecord,
    pub away: TeamRecord,
    pub home_score: u32,
    pub away_score: u32,
}

/// A focus team against an opponent that isn't in the directory yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedGame {
    pub focus_team: TeamRecord,
    pub focus_score: u32,
    pub opponent: String,
    pub opponent_score: u32,
    pub focus_is_home: bool,
}

impl UnresolvedGame {
    pub fn won(&self) -> bool {
        self.focus_score > self.opponent_score
    }
}

#[derive(Debug, Clone, Default)]
pub struct ImportPlan {
    pub focus: String,
    pub focus_games: Vec<PlannedGame>,
    pub known_opponent_games: Vec<PlannedGame>,
    pub unknown_opponent_games: Vec<UnresolvedGame>,
    pub unknown_teams: BTreeSet<String>,
    /// Parsed lines with no focus team in them.
    pub skipped: usize,
    pub unparsed: Vec<String>,
}

impl ImportPlan {
    pub fn total_focus_games(&self) -> usize {
        self.focus_games.len() + self.known_opponent_games.len() + self.unknown_opponent_games.len()
    }

    /// Games that can be inserted now, in report order.
    pub fn resolvable(&self) -> impl Iterator<Item = &PlannedGame> {
        self.focus_games.iter().chain(self.known_opponent_games.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicatePair {
    pub keep: GameRow,
    pub duplicate: GameRow,
}

#[derive(Debug, Clone, Default)]
pub struct ScoreUpdateReport {
    pub updated: Vec<(ScoreLine, i64)>,
    pub not_found: Vec<ScoreLine>,
    pub unparsed: Vec<String>,
}

// ============================================================================
// STORE TRAIT
// ============================================================================

#[async_trait]
pub trait ImportStore: Send + Sync {
    async fn load_teams(&self) -> Result<Vec<TeamRecord>, ImportError>;

    /// Insert every game in one transaction. Returns the number inserted.
    async fn insert_games(&self, games: &[NewGame]) -> Result<u64, ImportError>;

    /// Set the final score of the latest game between teams whose names
    /// contain `home` and `away`. Returns the updated game's id.
    async fn update_final_score(
        &self,
        home: &str,
        away: &str,
        home_score: u32,
        away_score: u32,
    ) -> Result<Option<i64>, ImportError>;

    async fn list_games(&self) -> Result<Vec<GameRow>, ImportError>;

    async fn delete_games(&self, ids: &[i64]) -> Result<u64, ImportError>;
}

// ============================================================================
// PURE HELPERS
// ============================================================================

pub fn kickoff_for(date: NaiveDate) -> String {
    format!("{} 19:00:00", date)
}

fn in_focus(team: Option<&TeamRecord>, focus: &str) -> bool {
    team.and_then(|t| t.classification.as_deref())
        .map_or(false, |c| c.eq_ignore_ascii_case(focus))
}

/// Sort parsed games into the buckets the report prints.
pub fn classify(games: &[ScoreLine], directory: &TeamDirectory, focus: &str) -> ImportPlan {
    let mut plan = ImportPlan {
        focus: focus.to_string(),
        ..ImportPlan::default()
    };

    for game in games {
        let home = directory.find(&game.home);
        let away = directory.find(&game.away);
        let home_in_focus = in_focus(home, focus);
        let away_in_focus = in_focus(away, focus);

        match (home, away) {
            _ if !home_in_focus && !away_in_focus => plan.skipped += 1,
            (Some(home), Some(away)) => {
                let planned = PlannedGame {
                    home: home.clone(),
                    away: away.clone(),
                    home_score: game.home_score,
                    away_score: game.away_score,
                };
                if home_in_focus && away_in_focus {
                    plan.focus_games.push(planned);
                } else {
                    plan.known_opponent_games.push(planned);
                }
            }
            (Some(home), None) => {
                plan.unknown_teams.insert(game.away.clone());
                plan.unknown_opponent_games.push(UnresolvedGame {
                    focus_team: home.clone(),
                    focus_score: game.home_score,
                    opponent: game.away.clone(),
                    opponent_score: game.away_score,
                    focus_is_home: true,
                });
            }
            (None, Some(away)) => {
                plan.unknown_teams.insert(game.home.clone());
                plan.unknown_opponent_games.push(UnresolvedGame {
                    focus_team: away.clone(),
                    focus_score: game.away_score,
                    opponent: game.home.clone(),
                    opponent_score: game.home_score,
                    focus_is_home: false,
                });
            }
            (None, None) => plan.skipped += 1,
        }
    }

    plan
}

fn sql_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn rule(out: &mut String, title: &str) {
    let line = "=".repeat(80);
    let _ = writeln!(out, "\n{}\n{}\n{}", line, title, line);
}

fn game_values(out: &mut String, games: &[PlannedGame], kickoff: &str, opponent_of: Option<&str>) {
    let _ = writeln!(
        out,
        "\nINSERT INTO games (home_team_id, away_team_id, home_score, away_score, kickoff_at, status, game_type) VALUES"
    );
    for (i, g) in games.iter().enumerate() {
        let end = if i + 1 < games.len() { "," } else { ";" };
        let mut comment = format!(
            "{} {}, {} {}",
            g.home.name, g.home_score, g.away.name, g.away_score
        );
        if let Some(focus) = opponent_of {
            let opponent = if in_focus(Some(&g.home), focus) { &g.away } else { &g.home };
            let class = opponent.classification.as_deref().unwrap_or("?");
            let _ = write!(comment, " [{}]", class);
        }
        let _ = writeln!(
            out,
            "({}, {}, {}, {}, {}, {}, {}){}  -- {}",
            g.home.id,
            g.away.id,
            g.home_score,
            g.away_score,
            sql_quote(kickoff),
            sql_quote(FINAL_STATUS),
            sql_quote(REGULAR_GAME),
            end,
            comment
        );
    }
}

/// Human-readable analysis plus the SQL an operator would run by hand.
pub fn render_report(plan: &ImportPlan, date: NaiveDate, week: u32) -> String {
    let kickoff = kickoff_for(date);
    let mut out = String::new();

    rule(&mut out, &format!("WEEK {} ANALYSIS: {}", week, date));
    let _ = writeln!(out, "\n{} vs {} games: {}", plan.focus, plan.focus, plan.focus_games.len());
    let _ = writeln!(out, "{} vs known opponents: {}", plan.focus, plan.known_opponent_games.len());
    let _ = writeln!(out, "{} vs unknown opponents: {}", plan.focus, plan.unknown_opponent_games.len());
    let _ = writeln!(out, "TOTAL {} games: {}", plan.focus, plan.total_focus_games());
    if plan.skipped > 0 {
        let _ = writeln!(out, "Skipped (no {} team): {}", plan.focus, plan.skipped);
    }

    if !plan.unparsed.is_empty() {
        rule(&mut out, "UNPARSED LINES");
        for line in &plan.unparsed {
            let _ = writeln!(out, "  {}", line);
        }
    }

    if !plan.unknown_teams.is_empty() {
        rule(&mut out, "UNKNOWN OPPONENTS - add these teams first:");
        let _ = writeln!(out, "\nINSERT INTO teams (name, mascot, level, conference, wins, losses) VALUES");
        let count = plan.unknown_teams.len();
        for (i, team) in plan.unknown_teams.iter().enumerate() {
            let end = if i + 1 < count { "," } else { "" };
            let _ = writeln!(out, "({}, 'TBD', 'High School', 'Unknown', 0, 0){}", sql_quote(team), end);
        }
        let _ = writeln!(out, "ON CONFLICT (name) DO NOTHING;");
        let names: Vec<String> = plan.unknown_teams.iter().map(|t| sql_quote(t)).collect();
        let _ = writeln!(out, "\nSELECT id, name FROM teams WHERE name IN ({});", names.join(", "));
    }

    if !plan.focus_games.is_empty() {
        rule(&mut out, &format!("{} vs {} GAMES SQL:", plan.focus, plan.focus));
        game_values(&mut out, &plan.focus_games, &kickoff, None);
    }

    if !plan.known_opponent_games.is_empty() {
        rule(&mut out, &format!("{} vs KNOWN OPPONENTS SQL:", plan.focus));
        game_values(&mut out, &plan.known_opponent_games, &kickoff, Some(&plan.focus));
    }

    if !plan.unknown_opponent_games.is_empty() {
        rule(&mut out, &format!("{} vs UNKNOWN OPPONENTS (need ids after adding teams):", plan.focus));
        for g in &plan.unknown_opponent_games {
            let result = if g.won() { "WIN" } else { "LOSS" };
            let (values, comment) = if g.focus_is_home {
                (
                    format!("({}, ???, {}, {}", g.focus_team.id, g.focus_score, g.opponent_score),
                    format!("{} {}, {} {}", g.focus_team.name, g.focus_score, g.opponent, g.opponent_score),
                )
            } else {
                (
                    format!("(???, {}, {}, {}", g.focus_team.id, g.opponent_score, g.focus_score),
                    format!("{} {}, {} {}", g.opponent, g.opponent_score, g.focus_team.name, g.focus_score),
                )
            };
            let _ = writeln!(
                out,
                "-- {}, {}, {}, {})  -- {} [{}]",
                values,
                sql_quote(&kickoff),
                sql_quote(FINAL_STATUS),
                sql_quote(REGULAR_GAME),
                comment,
                result
            );
        }
    }

    out
}

fn same_game(a: &GameRow, b: &GameRow) -> bool {
    let (Some(ah), Some(aa), Some(bh), Some(ba)) = (a.home_score, a.away_score, b.home_score, b.away_score)
    else {
        return false;
    };

    let same_way = a.home_team_id == b.home_team_id && a.away_team_id == b.away_team_id;
    let swapped = a.home_team_id == b.away_team_id && a.away_team_id == b.home_team_id;

    (same_way && ah == bh && aa == ba) || (swapped && ah == ba && aa == bh)
}

/// Every pair of games with the same matchup and score. The lower id is kept.
pub fn find_duplicate_games(games: &[GameRow]) -> Vec<DuplicatePair> {
    let mut sorted: Vec<&GameRow> = games.iter().collect();
    sorted.sort_by_key(|g| g.id);

    let mut pairs = Vec::new();
    for (i, keep) in sorted.iter().enumerate() {
        for duplicate in &sorted[i + 1..] {
            if same_game(keep, duplicate) {
                pairs.push(DuplicatePair {
                    keep: (*keep).clone(),
                    duplicate: (*duplicate).clone(),
                });
            }
        }
    }

    pairs.sort_by(|a, b| {
        a.keep
            .kickoff_at
            .cmp(&b.keep.kickoff_at)
            .then(a.keep.id.cmp(&b.keep.id))
            .then(a.duplicate.id.cmp(&b.duplicate.id))
    });
    pairs
}

/// Distinct ids to delete. A game kept by one pair can be the duplicate of an
/// earlier one, so only ids that appear as a duplicate are returned.
pub fn duplicate_ids(pairs: &[DuplicatePair]) -> Vec<i64> {
    pairs
        .iter()
        .map(|p| p.duplicate.id)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

// ============================================================================
// SERVICE
// ============================================================================

pub struct ImportService<S: ImportStore> {
    store: S,
}

impl<S: ImportStore> ImportService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Team directory from the database, with optional `{"alias": "Official Name"}` JSON.
    pub async fn directory(&self, aliases_json: Option<&str>) -> Result<TeamDirectory, ImportError> {
        let directory = TeamDirectory::new(self.store.load_teams().await?);
        if directory.is_empty() {
            tracing::warn!("Teams table is empty; every opponent will be unknown");
        } else {
            tracing::debug!("Loaded {} team names", directory.len());
        }

        let Some(json) = aliases_json else {
            return Ok(directory);
        };

        let aliases: HashMap<String, String> =
            serde_json::from_str(json).map_err(|e| ImportError::InvalidAliases(e.to_string()))?;
        let (directory, unresolved) = directory.with_aliases(&aliases);
        if !unresolved.is_empty() {
            tracing::warn!("Aliases point at unknown teams: {}", unresolved.join(", "));
        }
        Ok(directory)
    }

    pub async fn plan_import(
        &self,
        text: &str,
        focus: &str,
        aliases_json: Option<&str>,
    ) -> Result<ImportPlan, ImportError> {
        let directory = self.directory(aliases_json).await?;
        let (games, unparsed) = parse_score_text(text);

        let mut plan = classify(&games, &directory, focus);
        plan.unparsed = unparsed;

        tracing::info!(
            "Import plan for {}: {} parsed, {} focus games, {} unknown opponents",
            focus,
            games.len(),
            plan.total_focus_games(),
            plan.unknown_teams.len()
        );
        Ok(plan)
    }

    /// Insert every resolvable game as a final regular-season result.
    pub async fn apply_import(&self, plan: &ImportPlan, date: NaiveDate) -> Result<u64, ImportError> {
        let kickoff_at = kickoff_for(date);
        let games: Vec<NewGame> = plan
            .resolvable()
            .map(|g| NewGame {
                home_team_id: g.home.id,
                away_team_id: g.away.id,
                home_score: g.home_score,
                away_score: g.away_score,
                kickoff_at: kickoff_at.clone(),
                status: FINAL_STATUS.to_string(),
                game_type: REGULAR_GAME.to_string(),
            })
            .collect();

        if games.is_empty() {
            return Ok(0);
        }

        let inserted = self.store.insert_games(&games).await?;
        tracing::info!("Inserted {} games for {}", inserted, date);
        Ok(inserted)
    }

    pub async fn update_scores(&self, text: &str) -> Result<ScoreUpdateReport, ImportError> {
        let (lines, unparsed) = parse_score_text(text);
        let mut report = ScoreUpdateReport {
            unparsed,
            ..ScoreUpdateReport::default()
        };

        for line in lines {
            let updated = self
                .store
                .update_final_score(&line.home, &line.away, line.home_score, line.away_score)
                .await?;
            match updated {
                Some(game_id) => {
                    tracing::info!(
                        "Updated game {}: {} {} - {} {}",
                        game_id,
                        line.home,
                        line.home_score,
                        line.away_score,
                        line.away
                    );
                    report.updated.push((line, game_id));
                }
                None => {
                    tracing::warn!("Game not found: {} vs {}", line.home, line.away);
                    report.not_found.push(line);
                }
            }
        }

        Ok(report)
    }

    pub async fn find_duplicates(&self) -> Result<Vec<DuplicatePair>, ImportError> {
        let games = self.store.list_games().await?;
        Ok(find_duplicate_games(&games))
    }

    pub async fn delete_duplicates(&self, pairs: &[DuplicatePair]) -> Result<u64, ImportError> {
        let ids = duplicate_ids(pairs);
        if ids.is_empty() {
            return Ok(0);
        }
        let deleted = self.store.delete_games(&ids).await?;
        tracing::info!("Deleted {} duplicate games", deleted);
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::database::fixtures::insert_team;
    use crate::infra::database::memory_pool;
    use crate::infra::imports::SqliteGameStore;
    use sqlx::{Pool, Sqlite};

    fn record(id: i64, name: &str, classification: &str) -> TeamRecord {
        TeamRecord {
            id,
            name: name.to_string(),
            classification: Some(classification.to_string()),
        }
    }

    fn directory() -> TeamDirectory {
        TeamDirectory::new(vec![
            record(36, "Aledo", "5A-D1"),
            record(46, "Brewer", "5A-D1"),
            record(215, "Dallas Highland Park", "5A-D1"),
            record(406, "Dallas Jesuit", "6A"),
            record(368, "Argyle", "5A-D2"),
        ])
    }

    fn line(home: &str, home_score: u32, away: &str, away_score: u32) -> ScoreLine {
        ScoreLine {
            home: home.to_string(),
            home_score,
            away: away.to_string(),
            away_score,
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, 12).unwrap()
    }

    #[test]
    fn test_classify_buckets_games() {
        let games = vec![
            line("Aledo", 54, "Brewer", 7),
            line("Highland Park", 42, "Dallas Jesuit", 14),
            line("Springtown", 21, "Aledo", 35),
            line("Argyle", 28, "Dallas Jesuit", 10),
            line("Nowhere", 1, "Elsewhere", 0),
        ];
        let plan = classify(&games, &directory(), DEFAULT_FOCUS_CLASSIFICATION);

        assert_eq!(plan.focus_games.len(), 1);
        assert_eq!(plan.known_opponent_games.len(), 1);
        assert_eq!(plan.known_opponent_games[0].away.id, 406);
        assert_eq!(plan.unknown_opponent_games.len(), 1);
        let unknown = &plan.unknown_opponent_games[0];
        assert!(!unknown.focus_is_home);
        assert!(unknown.won());
        assert_eq!(plan.unknown_teams.iter().collect::<Vec<_>>(), vec!["Springtown"]);
        assert_eq!(plan.skipped, 2);
        assert_eq!(plan.total_focus_games(), 3);
    }

    #[test]
    fn test_focus_classification_is_configurable() {
        let games = vec![line("Argyle", 28, "Dallas Jesuit", 10)];
        let plan = classify(&games, &directory(), "5a-d2");
        assert_eq!(plan.known_opponent_games.len(), 1);
    }

    #[test]
    fn test_report_contains_sql() {
        let games = vec![
            line("Aledo", 54, "Brewer", 7),
            line("Highland Park", 42, "Dallas Jesuit", 14),
            line("O'Connell", 3, "Aledo", 21),
        ];
        let plan = classify(&games, &directory(), DEFAULT_FOCUS_CLASSIFICATION);
        let report = render_report(&plan, date(), 3);

        assert!(report.contains("WEEK 3 ANALYSIS: 2025-09-12"));
        assert!(report.contains(
            "(36, 46, 54, 7, '2025-09-12 19:00:00', 'final', 'regular');  -- Aledo 54, Brewer 7"
        ));
        assert!(report.contains("Dallas Highland Park 42, Dallas Jesuit 14 [6A]"));
        assert!(report.contains("('O''Connell', 'TBD', 'High School', 'Unknown', 0, 0)"));
        assert!(report.contains("-- (???, 36, 3, 21, '2025-09-12 19:00:00'"));
        assert!(report.contains("[WIN]"));
    }

    fn game(id: i64, home: i64, away: i64, score: Option<(u32, u32)>) -> GameRow {
        GameRow {
            id,
            home_team_id: home,
            away_team_id: away,
            home_team: format!("team {}", home),
            away_team: format!("team {}", away),
            home_score: score.map(|s| s.0),
            away_score: score.map(|s| s.1),
            kickoff_at: "2025-09-12 19:00:00".to_string(),
        }
    }

    #[test]
    fn test_duplicates_match_either_orientation() {
        let games = vec![
            game(1, 10, 20, Some((28, 14))),
            game(2, 10, 20, Some((28, 14))),
            game(3, 20, 10, Some((14, 28))),
            game(4, 20, 10, Some((28, 14))),
            game(5, 30, 40, None),
            game(6, 30, 40, None),
        ];
        let pairs = find_duplicate_games(&games);
        let found: Vec<(i64, i64)> = pairs.iter().map(|p| (p.keep.id, p.duplicate.id)).collect();
        assert_eq!(found, vec![(1, 2), (1, 3), (2, 3)]);
        assert_eq!(duplicate_ids(&pairs), vec![2, 3]);
    }

    async fn seeded() -> (Pool<Sqlite>, ImportService<SqliteGameStore>) {
        let pool = memory_pool().await;
        for (name, class) in [
            ("Aledo", "5A-D1"),
            ("Brewer", "5A-D1"),
            ("Dallas Highland Park", "5A-D1"),
            ("Dallas Jesuit", "6A"),
        ] {
            insert_team(&pool, name, class).await;
        }
        let service = ImportService::new(SqliteGameStore::new(pool.clone()));
        (pool, service)
    }

    #[tokio::test]
    async fn test_import_applies_resolvable_games() {
        let (_pool, service) = seeded().await;
        let text = "Aledo 54, Brewer 7\nHP 42, Dallas Jesuit 14\nSpringtown 21, Aledo 35\n";

        let plan = service
            .plan_import(text, DEFAULT_FOCUS_CLASSIFICATION, Some(r#"{"hp": "Dallas Highland Park"}"#))
            .await
            .unwrap();
        assert_eq!(plan.focus_games.len(), 1);
        assert_eq!(plan.known_opponent_games.len(), 1);
        assert_eq!(plan.unknown_opponent_games.len(), 1);

        let inserted = service.apply_import(&plan, date()).await.unwrap();
        assert_eq!(inserted, 2);

        let games = service.store.list_games().await.unwrap();
        assert_eq!(games.len(), 2);
        assert!(games.iter().all(|g| g.kickoff_at == "2025-09-12 19:00:00"));
    }

    #[tokio::test]
    async fn test_bad_alias_file_is_rejected() {
        let (_pool, service) = seeded().await;
        let result = service.plan_import("", DEFAULT_FOCUS_CLASSIFICATION, Some("[1, 2]")).await;
        assert!(matches!(result, Err(ImportError::InvalidAliases(_))));
    }

    #[tokio::test]
    async fn test_score_updates_report_misses() {
        let (_pool, service) = seeded().await;
        let plan = service
            .plan_import("Aledo 0, Brewer 0", DEFAULT_FOCUS_CLASSIFICATION, None)
            .await
            .unwrap();
        service.apply_import(&plan, date()).await.unwrap();

        let report = service
            .update_scores("Aledo 80, Brewer 12\nRichland 77, Wyatt 43\nnot a score")
            .await
            .unwrap();
        assert_eq!(report.updated.len(), 1);
        assert_eq!(report.not_found.len(), 1);
        assert_eq!(report.unparsed, vec!["not a score".to_string()]);

        let games = service.store.list_games().await.unwrap();
        assert_eq!((games[0].home_score, games[0].away_score), (Some(80), Some(12)));
    }

    #[tokio::test]
    async fn test_dedupe_keeps_lowest_id() {
        let (_pool, service) = seeded().await;
        let plan = service
            .plan_import("Aledo 54, Brewer 7\nBrewer 7, Aledo 54\nAledo 54, Brewer 7", DEFAULT_FOCUS_CLASSIFICATION, None)
            .await
            .unwrap();
        service.apply_import(&plan, date()).await.unwrap();

        let pairs = service.find_duplicates().await.unwrap();
        assert_eq!(pairs.len(), 3);
        assert_eq!(service.delete_duplicates(&pairs).await.unwrap(), 2);

        let games = service.store.list_games().await.unwrap();
        assert_eq!(games.len(), 1);
        assert!(service.find_duplicates().await.unwrap().is_empty());
    }
}
