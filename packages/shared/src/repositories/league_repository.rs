use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgExecutor;
use sqlx::PgPool;

use crate::models::league::{League, NewLeague};
use crate::repositories::errors::repository_errors::RepositoryError;
use crate::repositories::{timed, DEFAULT_QUERY_TIMEOUT};

#[cfg(test)]
use mockall::automock;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait LeagueRepository: Send + Sync {
    async fn get_league_by_id(&self, league_id: i64) -> Result<League, RepositoryError>;
    async fn get_league_by_name(&self, name: &str) -> Result<League, RepositoryError>;
    /// Leagues in which the user holds a player record, active or not.
    async fn get_leagues_by_user_id(&self, user_id: i64) -> Result<Vec<League>, RepositoryError>;
}

pub struct PostgresLeagueRepository {
    pool: PgPool,
    timeout: Duration,
}

impl PostgresLeagueRepository {
    pub fn new(pool: PgPool) -> Self {
        Self::with_timeout(pool, DEFAULT_QUERY_TIMEOUT)
    }

    pub fn with_timeout(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }
}

pub(crate) async fn insert_league<'e, E>(executor: E, league: &NewLeague) -> Result<i64, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let now = Utc::now();
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO leagues (name, created_at, updated_at) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(&league.name)
    .bind(now)
    .bind(now)
    .fetch_one(executor)
    .await
}

#[async_trait]
impl LeagueRepository for PostgresLeagueRepository {
    async fn get_league_by_id(&self, league_id: i64) -> Result<League, RepositoryError> {
        timed(
            self.timeout,
            sqlx::query_as::<_, League>(
                "SELECT id, name, created_at, updated_at FROM leagues WHERE id = $1",
            )
            .bind(league_id)
            .fetch_one(&self.pool),
        )
        .await
    }

    async fn get_league_by_name(&self, name: &str) -> Result<League, RepositoryError> {
        timed(
            self.timeout,
            sqlx::query_as::<_, League>(
                "SELECT id, name, created_at, updated_at FROM leagues WHERE name = $1",
            )
            .bind(name)
            .fetch_one(&self.pool),
        )
        .await
    }

    async fn get_leagues_by_user_id(&self, user_id: i64) -> Result<Vec<League>, RepositoryError> {
        timed(
            self.timeout,
            sqlx::query_as::<_, League>(
                r#"SELECT l.id, l.name, l.created_at, l.updated_at
                     FROM leagues l
                     JOIN players p ON p.league_id = l.id
                    WHERE p.user_id = $1
                    ORDER BY l.id"#,
            )
            .bind(user_id)
            .fetch_all(&self.pool),
        )
        .await
    }
}
