use std::time::Duration;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::debug;

use crate::models::league::NewLeague;
use crate::models::player::NewPlayer;
use crate::models::user::NewUser;
use crate::repositories::errors::repository_errors::RepositoryError;
use crate::repositories::league_repository::insert_league;
use crate::repositories::player_repository::insert_player;
use crate::repositories::user_repository::insert_user;
use crate::repositories::{timed, DEFAULT_QUERY_TIMEOUT};

#[cfg(test)]
use mockall::automock;

/// Hands out units of work: writes that commit together or not at all.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DbManager: Send + Sync {
    async fn begin_transaction(&self) -> Result<Box<dyn UnitOfWork>, RepositoryError>;
}

/// An open transaction. Dropping it without [`UnitOfWork::commit`] discards every write.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UnitOfWork: Send {
    async fn create_league(&mut self, league: &NewLeague) -> Result<i64, RepositoryError>;
    async fn create_player(&mut self, player: &NewPlayer) -> Result<i64, RepositoryError>;
    /// Inserts a user without a password.
    async fn create_inactive_user(&mut self, user: &NewUser) -> Result<i64, RepositoryError>;
    async fn commit(&mut self) -> Result<(), RepositoryError>;
    async fn rollback(&mut self) -> Result<(), RepositoryError>;
}

pub struct PostgresDbManager {
    pool: PgPool,
    timeout: Duration,
}

impl PostgresDbManager {
    pub fn new(pool: PgPool) -> Self {
        Self::with_timeout(pool, DEFAULT_QUERY_TIMEOUT)
    }

    pub fn with_timeout(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }
}

#[async_trait]
impl DbManager for PostgresDbManager {
    async fn begin_transaction(&self) -> Result<Box<dyn UnitOfWork>, RepositoryError> {
        let tx = timed(self.timeout, self.pool.begin()).await?;
        debug!("Transaction started");
        Ok(Box::new(PostgresUnitOfWork {
            tx: Some(tx),
            timeout: self.timeout,
        }))
    }
}

pub struct PostgresUnitOfWork {
    // sqlx rolls the transaction back when it is dropped unfinished.
    tx: Option<Transaction<'static, Postgres>>,
    timeout: Duration,
}

impl PostgresUnitOfWork {
    fn open(&mut self) -> Result<&mut Transaction<'static, Postgres>, RepositoryError> {
        self.tx.as_mut().ok_or(RepositoryError::TransactionClosed)
    }
}

#[async_trait]
impl UnitOfWork for PostgresUnitOfWork {
    async fn create_league(&mut self, league: &NewLeague) -> Result<i64, RepositoryError> {
        let timeout = self.timeout;
        let tx = self.open()?;
        timed(timeout, insert_league(&mut **tx, league)).await
    }

    async fn create_player(&mut self, player: &NewPlayer) -> Result<i64, RepositoryError> {
        let timeout = self.timeout;
        let tx = self.open()?;
        timed(timeout, insert_player(&mut **tx, player)).await
    }

    async fn create_inactive_user(&mut self, user: &NewUser) -> Result<i64, RepositoryError> {
        let timeout = self.timeout;
        let tx = self.open()?;
        timed(timeout, insert_user(&mut **tx, user, None)).await
    }

    async fn commit(&mut self) -> Result<(), RepositoryError> {
        let tx = self.tx.take().ok_or(RepositoryError::TransactionClosed)?;
        timed(self.timeout, tx.commit()).await?;
        debug!("Transaction committed");
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), RepositoryError> {
        let tx = self.tx.take().ok_or(RepositoryError::TransactionClosed)?;
        timed(self.timeout, tx.rollback()).await?;
        debug!("Transaction rolled back");
        Ok(())
    }
}
