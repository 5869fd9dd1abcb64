use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgExecutor;
use sqlx::PgPool;

use crate::models::player::{LeaguePlayer, NewPlayer, Player};
use crate::repositories::errors::repository_errors::RepositoryError;
use crate::repositories::{timed, DEFAULT_QUERY_TIMEOUT};

#[cfg(test)]
use mockall::automock;

const PLAYER_COLUMNS: &str =
    "id, league_id, user_id, handicap, is_commissioner, is_active, created_at, updated_at";

#[cfg_attr(test, automock)]
#[async_trait]
pub trait PlayerRepository: Send + Sync {
    async fn create_player(&self, player: &NewPlayer) -> Result<i64, RepositoryError>;
    /// Persists handicap, commissioner and active flags of an existing player.
    async fn update_player(&self, player: &Player) -> Result<(), RepositoryError>;
    async fn get_player_by_id(&self, player_id: i64) -> Result<Player, RepositoryError>;
    async fn get_players_by_league_id(
        &self,
        league_id: i64,
    ) -> Result<Vec<LeaguePlayer>, RepositoryError>;
    async fn get_player_by_user_and_league_id(
        &self,
        user_id: i64,
        league_id: i64,
    ) -> Result<Player, RepositoryError>;
}

pub struct PostgresPlayerRepository {
    pool: PgPool,
    timeout: Duration,
}

impl PostgresPlayerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self::with_timeout(pool, DEFAULT_QUERY_TIMEOUT)
    }

    pub fn with_timeout(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }
}

pub(crate) async fn insert_player<'e, E>(executor: E, player: &NewPlayer) -> Result<i64, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let now = Utc::now();
    sqlx::query_scalar::<_, i64>(
        r#"INSERT INTO players
               (league_id, user_id, handicap, is_commissioner, is_active, created_at, updated_at)
           VALUES ($1, $2, $3, $4, $5, $6, $7)
           RETURNING id"#,
    )
    .bind(player.league_id)
    .bind(player.user_id)
    .bind(player.handicap)
    .bind(player.is_commissioner)
    .bind(player.is_active)
    .bind(now)
    .bind(now)
    .fetch_one(executor)
    .await
}

#[async_trait]
impl PlayerRepository for PostgresPlayerRepository {
    async fn create_player(&self, player: &NewPlayer) -> Result<i64, RepositoryError> {
        timed(self.timeout, insert_player(&self.pool, player)).await
    }

    async fn update_player(&self, player: &Player) -> Result<(), RepositoryError> {
        let result = timed(
            self.timeout,
            sqlx::query(
                r#"UPDATE players
                      SET handicap = $1,
                          is_commissioner = $2,
                          is_active = $3,
                          updated_at = $4
                    WHERE id = $5"#,
            )
            .bind(player.handicap)
            .bind(player.is_commissioner)
            .bind(player.is_active)
            .bind(Utc::now())
            .bind(player.id)
            .execute(&self.pool),
        )
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn get_player_by_id(&self, player_id: i64) -> Result<Player, RepositoryError> {
        let query = format!("SELECT {} FROM players WHERE id = $1", PLAYER_COLUMNS);
        timed(
            self.timeout,
            sqlx::query_as::<_, Player>(&query)
                .bind(player_id)
                .fetch_one(&self.pool),
        )
        .await
    }

    async fn get_players_by_league_id(
        &self,
        league_id: i64,
    ) -> Result<Vec<LeaguePlayer>, RepositoryError> {
        timed(
            self.timeout,
            sqlx::query_as::<_, LeaguePlayer>(
                r#"SELECT p.id, p.league_id, p.user_id, p.handicap,
                          p.is_commissioner, p.is_active, p.created_at, p.updated_at,
                          u.first_name, u.last_name
                     FROM players p
                     JOIN users u ON u.id = p.user_id
                    WHERE p.league_id = $1
                    ORDER BY p.id"#,
            )
            .bind(league_id)
            .fetch_all(&self.pool),
        )
        .await
    }

    async fn get_player_by_user_and_league_id(
        &self,
        user_id: i64,
        league_id: i64,
    ) -> Result<Player, RepositoryError> {
        let query = format!(
            "SELECT {} FROM players WHERE league_id = $1 AND user_id = $2",
            PLAYER_COLUMNS
        );
        timed(
            self.timeout,
            sqlx::query_as::<_, Player>(&query)
                .bind(league_id)
                .bind(user_id)
                .fetch_one(&self.pool),
        )
        .await
    }
}
