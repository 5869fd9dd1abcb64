use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgExecutor;
use sqlx::PgPool;

use crate::models::user::{NewUser, User};
use crate::repositories::errors::repository_errors::RepositoryError;
use crate::repositories::{timed, DEFAULT_QUERY_TIMEOUT};

#[cfg(test)]
use mockall::automock;

const USER_COLUMNS: &str =
    "id, first_name, last_name, email, password, access_level_id, created_at, updated_at";

#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a user holding `password_hash` and returns its generated ID.
    async fn create_user(&self, user: &NewUser, password_hash: &str)
        -> Result<i64, RepositoryError>;
    async fn get_user_by_id(&self, user_id: i64) -> Result<User, RepositoryError>;
    async fn get_user_by_email(&self, email: &str) -> Result<User, RepositoryError>;
    async fn email_exists(&self, email: &str) -> Result<bool, RepositoryError>;
}

pub struct PostgresUserRepository {
    pool: PgPool,
    timeout: Duration,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self::with_timeout(pool, DEFAULT_QUERY_TIMEOUT)
    }

    pub fn with_timeout(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }
}

/// Inserts a user; `password_hash` is `None` for accounts nobody has claimed yet.
pub(crate) async fn insert_user<'e, E>(
    executor: E,
    user: &NewUser,
    password_hash: Option<&str>,
) -> Result<i64, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let now = Utc::now();
    sqlx::query_scalar::<_, i64>(
        r#"INSERT INTO users
               (first_name, last_name, email, password, access_level_id, created_at, updated_at)
           VALUES ($1, $2, $3, $4, $5, $6, $7)
           RETURNING id"#,
    )
    .bind(&user.first_name)
    .bind(&user.last_name)
    .bind(&user.email)
    .bind(password_hash)
    .bind(user.access_level)
    .bind(now)
    .bind(now)
    .fetch_one(executor)
    .await
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create_user(
        &self,
        user: &NewUser,
        password_hash: &str,
    ) -> Result<i64, RepositoryError> {
        timed(
            self.timeout,
            insert_user(&self.pool, user, Some(password_hash)),
        )
        .await
    }

    async fn get_user_by_id(&self, user_id: i64) -> Result<User, RepositoryError> {
        let query = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        timed(
            self.timeout,
            sqlx::query_as::<_, User>(&query)
                .bind(user_id)
                .fetch_one(&self.pool),
        )
        .await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<User, RepositoryError> {
        let query = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        timed(
            self.timeout,
            sqlx::query_as::<_, User>(&query)
                .bind(email)
                .fetch_one(&self.pool),
        )
        .await
    }

    async fn email_exists(&self, email: &str) -> Result<bool, RepositoryError> {
        timed(
            self.timeout,
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(email)
                .fetch_one(&self.pool),
        )
        .await
    }
}
