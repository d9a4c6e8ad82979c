// SQLite-backed teams/games access for the operator import commands.

use crate::core::imports::{GameRow, ImportError, ImportStore, NewGame, TeamRecord};
use crate::infra::database::like_pattern;
use async_trait::async_trait;
use sqlx::{Pool, QueryBuilder, Row, Sqlite};

fn db_err(e: sqlx::Error) -> ImportError {
    ImportError::StorageError(e.to_string())
}

fn score(value: Option<i64>) -> Option<u32> {
    value.and_then(|v| u32::try_from(v).ok())
}

pub struct SqliteGameStore {
    pool: Pool<Sqlite>,
}

impl SqliteGameStore {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ImportStore for SqliteGameStore {
    async fn load_teams(&self) -> Result<Vec<TeamRecord>, ImportError> {
        let rows = sqlx::query("SELECT id, name, classification FROM teams ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(rows
            .iter()
            .map(|row| TeamRecord {
                id: row.get("id"),
                name: row.get("name"),
                classification: row.get("classification"),
            })
            .collect())
    }

    async fn insert_games(&self, games: &[NewGame]) -> Result<u64, ImportError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;
        let mut inserted = 0;

        for game in games {
            let result = sqlx::query(
                r#"
                INSERT INTO games (home_team_id, away_team_id, home_score, away_score,
                                   kickoff_at, status, game_type)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(game.home_team_id)
            .bind(game.away_team_id)
            .bind(game.home_score as i64)
            .bind(game.away_score as i64)
            .bind(&game.kickoff_at)
            .bind(&game.status)
            .bind(&game.game_type)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
            inserted += result.rows_affected();
        }

        tx.commit().await.map_err(db_err)?;
        Ok(inserted)
    }

    async fn update_final_score(
        &self,
        home: &str,
        away: &str,
        home_score: u32,
        away_score: u32,
    ) -> Result<Option<i64>, ImportError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let game_id: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT g.id
            FROM games g
            JOIN teams h ON h.id = g.home_team_id
            JOIN teams a ON a.id = g.away_team_id
            WHERE LOWER(h.name) LIKE ? ESCAPE '\'
              AND LOWER(a.name) LIKE ? ESCAPE '\'
            ORDER BY g.kickoff_at DESC, g.id DESC
            LIMIT 1
            "#,
        )
        .bind(like_pattern(home.trim()))
        .bind(like_pattern(away.trim()))
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_err)?;

        let Some(game_id) = game_id else {
            return Ok(None);
        };

        sqlx::query("UPDATE games SET home_score = ?, away_score = ?, status = 'final' WHERE id = ?")
            .bind(home_score as i64)
            .bind(away_score as i64)
            .bind(game_id)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

        tx.commit().await.map_err(db_err)?;
        Ok(Some(game_id))
    }

    async fn list_games(&self) -> Result<Vec<GameRow>, ImportError> {
        let rows = sqlx::query(
            r#"
            SELECT g.id, g.home_team_id, g.away_team_id, h.name AS home_team, a.name AS away_team,
                   g.home_score, g.away_score, g.kickoff_at
            FROM games g
            JOIN teams h ON h.id = g.home_team_id
            JOIN teams a ON a.id = g.away_team_id
            ORDER BY g.id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(rows
            .iter()
            .map(|row| GameRow {
                id: row.get("id"),
                home_team_id: row.get("home_team_id"),
                away_team_id: row.get("away_team_id"),
                home_team: row.get("home_team"),
                away_team: row.get("away_team"),
                home_score: score(row.get("home_score")),
                away_score: score(row.get("away_score")),
                kickoff_at: row.get("kickoff_at"),
            })
            .collect())
    }

    async fn delete_games(&self, ids: &[i64]) -> Result<u64, ImportError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let mut query = QueryBuilder::<Sqlite>::new("DELETE FROM games WHERE id IN (");
        let mut separated = query.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        let result = query.build().execute(&self.pool).await.map_err(db_err)?;
        Ok(result.rows_affected())
    }
}
