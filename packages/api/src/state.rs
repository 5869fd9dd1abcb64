use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Settings;
use shared::repositories::db_manager::{DbManager, PostgresDbManager};
use shared::repositories::league_repository::{LeagueRepository, PostgresLeagueRepository};
use shared::repositories::player_repository::{PlayerRepository, PostgresPlayerRepository};
use shared::repositories::user_repository::{PostgresUserRepository, UserRepository};
use shared::services::auth_service::AuthService;
use shared::services::credential_store::{BcryptCredentialStore, CredentialStore};
use shared::services::league_service::LeagueService;
use shared::services::player_service::PlayerService;
use shared::services::user_service::UserService;

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub user_service: Arc<UserService>,
    pub league_service: Arc<LeagueService>,
    pub player_service: Arc<PlayerService>,
}

impl AppState {
    pub fn new(
        db: Arc<dyn DbManager + Send + Sync>,
        users: Arc<dyn UserRepository + Send + Sync>,
        leagues: Arc<dyn LeagueRepository + Send + Sync>,
        players: Arc<dyn PlayerRepository + Send + Sync>,
        credentials: Arc<dyn CredentialStore + Send + Sync>,
        jwt_secret: String,
    ) -> Self {
        let user_service = Arc::new(UserService::new(users, credentials));
        let auth_service = Arc::new(AuthService::with_jwt_secret(
            user_service.clone(),
            jwt_secret,
        ));
        let league_service = Arc::new(LeagueService::new(db, leagues, players.clone()));
        let player_service = Arc::new(PlayerService::new(players));

        AppState {
            auth_service,
            user_service,
            league_service,
            player_service,
        }
    }

    pub fn postgres(pool: PgPool, settings: &Settings) -> Self {
        let timeout = settings.db_query_timeout;
        Self::new(
            Arc::new(PostgresDbManager::with_timeout(pool.clone(), timeout)),
            Arc::new(PostgresUserRepository::with_timeout(pool.clone(), timeout)),
            Arc::new(PostgresLeagueRepository::with_timeout(pool.clone(), timeout)),
            Arc::new(PostgresPlayerRepository::with_timeout(pool, timeout)),
            Arc::new(BcryptCredentialStore::with_cost(settings.bcrypt_cost)),
            settings.jwt_secret.clone(),
        )
    }
}
