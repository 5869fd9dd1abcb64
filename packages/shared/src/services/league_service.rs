use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::models::league::{League, NewLeague};
use crate::models::player::NewPlayer;
use crate::models::user::{AccessLevel, NewUser};
use crate::repositories::db_manager::{DbManager, UnitOfWork};
use crate::repositories::errors::repository_errors::RepositoryError;
use crate::repositories::league_repository::LeagueRepository;
use crate::repositories::player_repository::PlayerRepository;
use crate::services::errors::league_service_errors::LeagueServiceError;

/// League creation and membership onboarding.
///
/// Multi-row writes go through a [`UnitOfWork`] so a failure half way never
/// leaves a league without its commissioner or a user without its player.
pub struct LeagueService {
    db: Arc<dyn DbManager + Send + Sync>,
    leagues: Arc<dyn LeagueRepository + Send + Sync>,
    players: Arc<dyn PlayerRepository + Send + Sync>,
}

impl LeagueService {
    pub fn new(
        db: Arc<dyn DbManager + Send + Sync>,
        leagues: Arc<dyn LeagueRepository + Send + Sync>,
        players: Arc<dyn PlayerRepository + Send + Sync>,
    ) -> Self {
        LeagueService {
            db,
            leagues,
            players,
        }
    }

    /// Creates `league` and its commissioner atomically, returning the league ID.
    ///
    /// The commissioner's `league_id` is ignored and replaced with the new ID.
    pub async fn create_league_with_commissioner(
        &self,
        league: &NewLeague,
        commissioner: NewPlayer,
    ) -> Result<i64, LeagueServiceError> {
        if league.name.trim().is_empty() {
            return Err(LeagueServiceError::ValidationError(
                "League name cannot be empty".to_string(),
            ));
        }
        if !commissioner.is_commissioner || !commissioner.is_active {
            return Err(LeagueServiceError::ValidationError(
                "League founder must be an active commissioner".to_string(),
            ));
        }

        let mut uow = self.db.begin_transaction().await?;
        match insert_league_with_commissioner(uow.as_mut(), league, commissioner).await {
            Ok(league_id) => {
                info!("Created league {} ({})", league_id, league.name);
                Ok(league_id)
            }
            Err(err) => {
                abort(uow.as_mut()).await;
                Err(err)
            }
        }
    }

    /// Puts an existing user in a league, reactivating a previous membership if one exists.
    pub async fn add_existing_user_to_league(
        &self,
        user_id: i64,
        league_id: i64,
    ) -> Result<(), LeagueServiceError> {
        match self
            .players
            .get_player_by_user_and_league_id(user_id, league_id)
            .await
        {
            Ok(player) if player.is_active => Err(LeagueServiceError::PlayerAlreadyInLeague),
            Ok(mut player) => {
                player.is_active = true;
                self.players
                    .update_player(&player)
                    .await
                    .map_err(LeagueServiceError::ReactivationFailed)?;
                info!("Reactivated player {} in league {}", player.id, league_id);
                Ok(())
            }
            Err(RepositoryError::NotFound) => {
                let player_id = self
                    .players
                    .create_player(&NewPlayer::member(user_id, league_id))
                    .await
                    .map_err(|e| match e {
                        RepositoryError::Conflict(_) => LeagueServiceError::PlayerAlreadyInLeague,
                        other => LeagueServiceError::RepositoryError(other),
                    })?;
                info!(
                    "Added user {} to league {} as player {}",
                    user_id, league_id, player_id
                );
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Creates an unclaimed account for `user` and its player in `league_id`
    /// atomically, returning the new user ID.
    pub async fn add_new_user_to_league(
        &self,
        user: &NewUser,
        league_id: i64,
    ) -> Result<i64, LeagueServiceError> {
        let user = NewUser {
            access_level: AccessLevel::Player,
            ..user.clone()
        };

        let mut uow = self.db.begin_transaction().await?;
        match insert_user_with_player(uow.as_mut(), &user, league_id).await {
            Ok(user_id) => {
                info!("Onboarded new user {} into league {}", user_id, league_id);
                Ok(user_id)
            }
            Err(err) => {
                abort(uow.as_mut()).await;
                Err(err)
            }
        }
    }

    pub async fn get_league(&self, league_id: i64) -> Result<League, LeagueServiceError> {
        self.leagues
            .get_league_by_id(league_id)
            .await
            .map_err(not_found_as_league)
    }

    pub async fn get_league_by_name(&self, name: &str) -> Result<League, LeagueServiceError> {
        self.leagues
            .get_league_by_name(name)
            .await
            .map_err(not_found_as_league)
    }

    pub async fn get_leagues_by_user(&self, user_id: i64) -> Result<Vec<League>, LeagueServiceError> {
        Ok(self.leagues.get_leagues_by_user_id(user_id).await?)
    }
}

fn not_found_as_league(err: RepositoryError) -> LeagueServiceError {
    match err {
        RepositoryError::NotFound => LeagueServiceError::LeagueNotFound,
        other => LeagueServiceError::RepositoryError(other),
    }
}

async fn insert_league_with_commissioner(
    uow: &mut dyn UnitOfWork,
    league: &NewLeague,
    mut commissioner: NewPlayer,
) -> Result<i64, LeagueServiceError> {
    let league_id = uow.create_league(league).await.map_err(|e| match e {
        RepositoryError::Conflict(_) => LeagueServiceError::LeagueNameTaken,
        other => LeagueServiceError::RepositoryError(other),
    })?;
    commissioner.league_id = league_id;
    uow.create_player(&commissioner).await?;
    uow.commit().await?;
    Ok(league_id)
}

async fn insert_user_with_player(
    uow: &mut dyn UnitOfWork,
    user: &NewUser,
    league_id: i64,
) -> Result<i64, LeagueServiceError> {
    let user_id = uow.create_inactive_user(user).await.map_err(|e| match e {
        RepositoryError::Conflict(_) => LeagueServiceError::UserAlreadyExists,
        other => LeagueServiceError::RepositoryError(other),
    })?;
    uow.create_player(&NewPlayer::member(user_id, league_id))
        .await?;
    uow.commit().await?;
    Ok(user_id)
}

async fn abort(uow: &mut dyn UnitOfWork) {
    match uow.rollback().await {
        Ok(()) => debug!("Rolled back unit of work"),
        // A failed commit has already consumed the transaction.
        Err(RepositoryError::TransactionClosed) => {}
        Err(e) => warn!("Rollback failed: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::db_manager::{MockDbManager, MockUnitOfWork};
    use crate::repositories::in_memory::{FailurePoint, InMemoryStore};
    use crate::models::user::User;
    use crate::repositories::league_repository::MockLeagueRepository;
    use crate::repositories::player_repository::MockPlayerRepository;
    use crate::services::errors::ErrorKind;

    fn service(store: &InMemoryStore) -> LeagueService {
        LeagueService::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
        )
    }

    async fn seed_users(store: &InMemoryStore, count: usize) -> Vec<User> {
        let mut users = Vec::new();
        for i in 1..=count {
            users.push(
                store
                    .seed_user(
                        NewUser::new("Golfer", "Number", &format!("golfer{}@example.com", i)),
                        Some("hash"),
                    )
                    .await
                    .unwrap(),
            );
        }
        users
    }

    #[tokio::test]
    async fn test_create_league_with_commissioner() {
        let store = InMemoryStore::new();
        seed_users(&store, 1).await;
        let service = service(&store);

        let league_id = service
            .create_league_with_commissioner(&NewLeague::new("Eagles"), NewPlayer::commissioner(1))
            .await
            .unwrap();

        let league = service.get_league(league_id).await.unwrap();
        assert_eq!(league.name, "Eagles");
        let players = store.players().await;
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].league_id, league_id);
        assert_eq!(players[0].user_id, 1);
        assert!(players[0].is_commissioner);
        assert!(players[0].is_active);
    }

    #[tokio::test]
    async fn test_create_league_leaves_nothing_when_commissioner_insert_fails() {
        let store = InMemoryStore::new();
        seed_users(&store, 1).await;
        store.fail_on(FailurePoint::CreatePlayer).await;
        let service = service(&store);

        let err = service
            .create_league_with_commissioner(&NewLeague::new("Eagles"), NewPlayer::commissioner(1))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::PersistenceFailure);
        assert!(store.leagues().await.is_empty());
        assert!(store.players().await.is_empty());
        assert_eq!(
            service.get_league_by_name("Eagles").await.unwrap_err(),
            LeagueServiceError::LeagueNotFound
        );
    }

    #[tokio::test]
    async fn test_create_league_leaves_nothing_when_commit_fails() {
        let store = InMemoryStore::new();
        seed_users(&store, 1).await;
        store.fail_on(FailurePoint::Commit).await;
        let service = service(&store);

        let result = service
            .create_league_with_commissioner(&NewLeague::new("Eagles"), NewPlayer::commissioner(1))
            .await;

        assert!(result.is_err());
        assert!(store.leagues().await.is_empty());
        assert!(store.players().await.is_empty());
    }

    #[tokio::test]
    async fn test_create_league_with_unknown_commissioner_user() {
        let store = InMemoryStore::new();
        let service = service(&store);

        let err = service
            .create_league_with_commissioner(&NewLeague::new("Eagles"), NewPlayer::commissioner(7))
            .await
            .unwrap_err();

        assert!(matches!(err, LeagueServiceError::RepositoryError(_)));
        assert!(store.leagues().await.is_empty());
    }

    #[tokio::test]
    async fn test_create_league_name_taken() {
        let store = InMemoryStore::new();
        seed_users(&store, 1).await;
        store.seed_league("Eagles").await.unwrap();
        let service = service(&store);

        let err = service
            .create_league_with_commissioner(&NewLeague::new("Eagles"), NewPlayer::commissioner(1))
            .await
            .unwrap_err();

        assert_eq!(err, LeagueServiceError::LeagueNameTaken);
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(store.leagues().await.len(), 1);
    }

    #[tokio::test]
    async fn test_create_league_rejects_bad_input_before_persistence() {
        let mut db = MockDbManager::new();
        db.expect_begin_transaction().never();
        let service = LeagueService::new(
            Arc::new(db),
            Arc::new(MockLeagueRepository::new()),
            Arc::new(MockPlayerRepository::new()),
        );

        let empty_name = service
            .create_league_with_commissioner(&NewLeague::new("  "), NewPlayer::commissioner(1))
            .await
            .unwrap_err();
        assert_eq!(empty_name.kind(), ErrorKind::Validation);

        let not_commissioner = service
            .create_league_with_commissioner(&NewLeague::new("Eagles"), NewPlayer::member(1, 0))
            .await
            .unwrap_err();
        assert_eq!(not_commissioner.kind(), ErrorKind::Validation);

        let mut inactive = NewPlayer::commissioner(1);
        inactive.is_active = false;
        let inactive = service
            .create_league_with_commissioner(&NewLeague::new("Eagles"), inactive)
            .await
            .unwrap_err();
        assert_eq!(inactive.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_create_league_rolls_back_on_player_failure() {
        let mut uow = MockUnitOfWork::new();
        uow.expect_create_league().times(1).returning(|_| Ok(10));
        uow.expect_create_player()
            .withf(|player| player.league_id == 10 && player.is_commissioner)
            .times(1)
            .returning(|_| Err(RepositoryError::Timeout));
        uow.expect_commit().never();
        uow.expect_rollback().times(1).returning(|| Ok(()));

        let mut db = MockDbManager::new();
        db.expect_begin_transaction()
            .return_once(move || Ok(Box::new(uow) as Box<dyn UnitOfWork>));
        let service = LeagueService::new(
            Arc::new(db),
            Arc::new(MockLeagueRepository::new()),
            Arc::new(MockPlayerRepository::new()),
        );

        let err = service
            .create_league_with_commissioner(&NewLeague::new("Eagles"), NewPlayer::commissioner(1))
            .await
            .unwrap_err();

        assert_eq!(err, LeagueServiceError::RepositoryError(RepositoryError::Timeout));
    }

    #[tokio::test]
    async fn test_add_existing_user_creates_membership() {
        let store = InMemoryStore::new();
        seed_users(&store, 2).await;
        let league = store.seed_league("Eagles").await.unwrap();
        let service = service(&store);

        service.add_existing_user_to_league(2, league.id).await.unwrap();

        let players = store.players().await;
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].user_id, 2);
        assert!(players[0].is_active);
        assert!(!players[0].is_commissioner);
        assert_eq!(players[0].handicap, 0);
    }

    #[tokio::test]
    async fn test_add_existing_user_reactivates_inactive_player() {
        let store = InMemoryStore::new();
        seed_users(&store, 4).await;
        store.seed_league("Hawks").await.unwrap();
        let league = store.seed_league("Eagles").await.unwrap();
        assert_eq!(league.id, 2);
        let mut inactive = NewPlayer::member(4, 2);
        inactive.is_active = false;
        let player = store.seed_player(inactive).await.unwrap();
        let service = service(&store);

        service.add_existing_user_to_league(4, 2).await.unwrap();

        let players = store.players().await;
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].id, player.id);
        assert!(players[0].is_active);
    }

    #[tokio::test]
    async fn test_add_existing_user_already_active_is_conflict_without_mutation() {
        let store = InMemoryStore::new();
        seed_users(&store, 1).await;
        let league = store.seed_league("Eagles").await.unwrap();
        let player = store
            .seed_player(NewPlayer::member(1, league.id))
            .await
            .unwrap();
        let service = service(&store);

        let err = service
            .add_existing_user_to_league(1, league.id)
            .await
            .unwrap_err();

        assert_eq!(err, LeagueServiceError::PlayerAlreadyInLeague);
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(store.players().await, vec![player]);
    }

    #[tokio::test]
    async fn test_add_existing_user_reactivation_failure() {
        let store = InMemoryStore::new();
        seed_users(&store, 1).await;
        let league = store.seed_league("Eagles").await.unwrap();
        let mut inactive = NewPlayer::member(1, league.id);
        inactive.is_active = false;
        store.seed_player(inactive).await.unwrap();
        store.fail_on(FailurePoint::UpdatePlayer).await;
        let service = service(&store);

        let err = service
            .add_existing_user_to_league(1, league.id)
            .await
            .unwrap_err();

        assert!(matches!(err, LeagueServiceError::ReactivationFailed(_)));
        assert!(!store.players().await[0].is_active);
    }

    #[tokio::test]
    async fn test_add_existing_user_concurrent_insert_is_conflict() {
        let mut players = MockPlayerRepository::new();
        players
            .expect_get_player_by_user_and_league_id()
            .returning(|_, _| Err(RepositoryError::NotFound));
        players
            .expect_create_player()
            .times(1)
            .returning(|_| Err(RepositoryError::Conflict("players_league_id_user_id_key".to_string())));
        let service = LeagueService::new(
            Arc::new(MockDbManager::new()),
            Arc::new(MockLeagueRepository::new()),
            Arc::new(players),
        );

        let err = service.add_existing_user_to_league(1, 1).await.unwrap_err();
        assert_eq!(err, LeagueServiceError::PlayerAlreadyInLeague);
    }

    #[tokio::test]
    async fn test_add_existing_user_lookup_failure_does_not_create() {
        let mut players = MockPlayerRepository::new();
        players
            .expect_get_player_by_user_and_league_id()
            .returning(|_, _| Err(RepositoryError::Timeout));
        players.expect_create_player().never();
        players.expect_update_player().never();
        let service = LeagueService::new(
            Arc::new(MockDbManager::new()),
            Arc::new(MockLeagueRepository::new()),
            Arc::new(players),
        );

        let err = service.add_existing_user_to_league(1, 1).await.unwrap_err();
        assert_eq!(err, LeagueServiceError::RepositoryError(RepositoryError::Timeout));
    }

    #[tokio::test]
    async fn test_add_new_user_to_league() {
        let store = InMemoryStore::new();
        let league = store.seed_league("Eagles").await.unwrap();
        let service = service(&store);

        let user_id = service
            .add_new_user_to_league(&NewUser::new("John", "Doe", "j@d.com"), league.id)
            .await
            .unwrap();

        let users = store.users().await;
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].id, user_id);
        assert_eq!(users[0].email, "j@d.com");
        assert_eq!(users[0].password, None);
        assert_eq!(users[0].access_level, AccessLevel::Player);

        let players = store.players().await;
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].user_id, user_id);
        assert_eq!(players[0].league_id, league.id);
        assert!(!players[0].is_commissioner);
        assert!(players[0].is_active);
    }

    #[tokio::test]
    async fn test_add_new_user_leaves_nothing_when_player_insert_fails() {
        let store = InMemoryStore::new();
        let league = store.seed_league("Eagles").await.unwrap();
        store.fail_on(FailurePoint::CreatePlayer).await;
        let service = service(&store);

        let result = service
            .add_new_user_to_league(&NewUser::new("John", "Doe", "j@d.com"), league.id)
            .await;

        assert!(result.is_err());
        assert!(store.users().await.is_empty());
        assert!(store.players().await.is_empty());
    }

    #[tokio::test]
    async fn test_add_new_user_with_unknown_league_leaves_no_user() {
        let store = InMemoryStore::new();
        let service = service(&store);

        let result = service
            .add_new_user_to_league(&NewUser::new("John", "Doe", "j@d.com"), 99)
            .await;

        assert!(result.is_err());
        assert!(store.users().await.is_empty());
    }

    #[tokio::test]
    async fn test_add_new_user_duplicate_email() {
        let store = InMemoryStore::new();
        store
            .seed_user(NewUser::new("John", "Doe", "j@d.com"), None)
            .await
            .unwrap();
        let league = store.seed_league("Eagles").await.unwrap();
        let service = service(&store);

        let err = service
            .add_new_user_to_league(&NewUser::new("Jon", "Doe", "j@d.com"), league.id)
            .await
            .unwrap_err();

        assert_eq!(err, LeagueServiceError::UserAlreadyExists);
        assert_eq!(store.users().await.len(), 1);
        assert!(store.players().await.is_empty());
    }

    #[tokio::test]
    async fn test_begin_failure_surfaces_as_persistence_failure() {
        let store = InMemoryStore::new();
        store.fail_on(FailurePoint::BeginTransaction).await;
        let service = service(&store);

        let err = service
            .add_new_user_to_league(&NewUser::new("John", "Doe", "j@d.com"), 1)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PersistenceFailure);
    }

    #[tokio::test]
    async fn test_get_leagues_by_user() {
        let store = InMemoryStore::new();
        seed_users(&store, 2).await;
        let eagles = store.seed_league("Eagles").await.unwrap();
        store.seed_league("Hawks").await.unwrap();
        store.seed_player(NewPlayer::member(2, eagles.id)).await.unwrap();
        let service = service(&store);

        let leagues = service.get_leagues_by_user(2).await.unwrap();
        assert_eq!(leagues, vec![eagles]);
        assert!(service.get_leagues_by_user(1).await.unwrap().is_empty());
        assert_eq!(
            service.get_league(42).await.unwrap_err(),
            LeagueServiceError::LeagueNotFound
        );
    }
}
