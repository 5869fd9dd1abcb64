//! In-process implementation of every repository trait.
//!
//! Mirrors the Postgres schema constraints (unique emails, unique league
//! names, one player per user and league, foreign keys from players) so
//! services behave the same against it. Writes made through a
//! [`UnitOfWork`] stay staged until commit. Failures can be injected per
//! operation with [`InMemoryStore::fail_on`].

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::models::league::{League, NewLeague};
use crate::models::player::{LeaguePlayer, NewPlayer, Player};
use crate::models::user::{NewUser, User};
use crate::repositories::db_manager::{DbManager, UnitOfWork};
use crate::repositories::errors::repository_errors::RepositoryError;
use crate::repositories::league_repository::LeagueRepository;
use crate::repositories::player_repository::PlayerRepository;
use crate::repositories::user_repository::UserRepository;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailurePoint {
    BeginTransaction,
    CreateUser,
    CreateLeague,
    CreatePlayer,
    UpdatePlayer,
    Commit,
}

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    leagues: Vec<League>,
    players: Vec<Player>,
    last_user_id: i64,
    last_league_id: i64,
    last_player_id: i64,
    failures: HashSet<FailurePoint>,
}

#[derive(Default)]
struct Staged {
    users: Vec<User>,
    leagues: Vec<League>,
    players: Vec<Player>,
}

impl Tables {
    fn check(&self, point: FailurePoint) -> Result<(), RepositoryError> {
        if self.failures.contains(&point) {
            return Err(RepositoryError::Database(format!(
                "injected failure at {:?}",
                point
            )));
        }
        Ok(())
    }

    /// Rows staged by another unit may have been committed since these were staged.
    fn check_staged(&self, staged: &Staged) -> Result<(), RepositoryError> {
        if staged
            .users
            .iter()
            .any(|user| self.users.iter().any(|existing| existing.email == user.email))
        {
            return Err(RepositoryError::Conflict("users_email_key".to_string()));
        }
        if staged
            .leagues
            .iter()
            .any(|league| self.leagues.iter().any(|existing| existing.name == league.name))
        {
            return Err(RepositoryError::Conflict("leagues_name_key".to_string()));
        }
        if staged.players.iter().any(|player| {
            self.players.iter().any(|existing| {
                existing.league_id == player.league_id && existing.user_id == player.user_id
            })
        }) {
            return Err(RepositoryError::Conflict(
                "players_league_id_user_id_key".to_string(),
            ));
        }
        Ok(())
    }

    fn build_user(
        &mut self,
        user: &NewUser,
        password: Option<&str>,
        staged: &[User],
    ) -> Result<User, RepositoryError> {
        if self
            .users
            .iter()
            .chain(staged)
            .any(|existing| existing.email == user.email)
        {
            return Err(RepositoryError::Conflict("users_email_key".to_string()));
        }

        self.last_user_id += 1;
        let now = Utc::now();
        Ok(User {
            id: self.last_user_id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            password: password.map(str::to_string),
            access_level: user.access_level,
            created_at: now,
            updated_at: now,
        })
    }

    fn build_league(
        &mut self,
        league: &NewLeague,
        staged: &[League],
    ) -> Result<League, RepositoryError> {
        if self
            .leagues
            .iter()
            .chain(staged)
            .any(|existing| existing.name == league.name)
        {
            return Err(RepositoryError::Conflict("leagues_name_key".to_string()));
        }

        self.last_league_id += 1;
        let now = Utc::now();
        Ok(League {
            id: self.last_league_id,
            name: league.name.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    fn build_player(
        &mut self,
        player: &NewPlayer,
        staged: &Staged,
    ) -> Result<Player, RepositoryError> {
        let league_exists = self
            .leagues
            .iter()
            .chain(&staged.leagues)
            .any(|league| league.id == player.league_id);
        if !league_exists {
            return Err(RepositoryError::Database(
                "players_league_id_fkey violated".to_string(),
            ));
        }

        let user_exists = self
            .users
            .iter()
            .chain(&staged.users)
            .any(|user| user.id == player.user_id);
        if !user_exists {
            return Err(RepositoryError::Database(
                "players_user_id_fkey violated".to_string(),
            ));
        }

        if self
            .players
            .iter()
            .chain(&staged.players)
            .any(|existing| {
                existing.league_id == player.league_id && existing.user_id == player.user_id
            })
        {
            return Err(RepositoryError::Conflict(
                "players_league_id_user_id_key".to_string(),
            ));
        }

        self.last_player_id += 1;
        let now = Utc::now();
        Ok(Player {
            id: self.last_player_id,
            league_id: player.league_id,
            user_id: player.user_id,
            handicap: player.handicap,
            is_commissioner: player.is_commissioner,
            is_active: player.is_active,
            created_at: now,
            updated_at: now,
        })
    }
}

#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later call reaching `point` fail until [`InMemoryStore::clear_failures`].
    pub async fn fail_on(&self, point: FailurePoint) {
        self.tables.write().await.failures.insert(point);
    }

    pub async fn clear_failures(&self) {
        self.tables.write().await.failures.clear();
    }

    /// Inserts a user directly, bypassing injected failures.
    pub async fn seed_user(
        &self,
        user: NewUser,
        password_hash: Option<&str>,
    ) -> Result<User, RepositoryError> {
        let mut tables = self.tables.write().await;
        let user = tables.build_user(&user, password_hash, &[])?;
        tables.users.push(user.clone());
        Ok(user)
    }

    pub async fn seed_league(&self, name: &str) -> Result<League, RepositoryError> {
        let mut tables = self.tables.write().await;
        let league = tables.build_league(&NewLeague::new(name), &[])?;
        tables.leagues.push(league.clone());
        Ok(league)
    }

    pub async fn seed_player(&self, player: NewPlayer) -> Result<Player, RepositoryError> {
        let mut tables = self.tables.write().await;
        let player = tables.build_player(&player, &Staged::default())?;
        tables.players.push(player.clone());
        Ok(player)
    }

    pub async fn users(&self) -> Vec<User> {
        self.tables.read().await.users.clone()
    }

    pub async fn leagues(&self) -> Vec<League> {
        self.tables.read().await.leagues.clone()
    }

    pub async fn players(&self) -> Vec<Player> {
        self.tables.read().await.players.clone()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create_user(
        &self,
        user: &NewUser,
        password_hash: &str,
    ) -> Result<i64, RepositoryError> {
        let mut tables = self.tables.write().await;
        tables.check(FailurePoint::CreateUser)?;
        let user = tables.build_user(user, Some(password_hash), &[])?;
        let id = user.id;
        tables.users.push(user);
        Ok(id)
    }

    async fn get_user_by_id(&self, user_id: i64) -> Result<User, RepositoryError> {
        let tables = self.tables.read().await;
        tables
            .users
            .iter()
            .find(|user| user.id == user_id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<User, RepositoryError> {
        let tables = self.tables.read().await;
        tables
            .users
            .iter()
            .find(|user| user.email == email)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn email_exists(&self, email: &str) -> Result<bool, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().any(|user| user.email == email))
    }
}

#[async_trait]
impl LeagueRepository for InMemoryStore {
    async fn get_league_by_id(&self, league_id: i64) -> Result<League, RepositoryError> {
        let tables = self.tables.read().await;
        tables
            .leagues
            .iter()
            .find(|league| league.id == league_id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn get_league_by_name(&self, name: &str) -> Result<League, RepositoryError> {
        let tables = self.tables.read().await;
        tables
            .leagues
            .iter()
            .find(|league| league.name == name)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn get_leagues_by_user_id(&self, user_id: i64) -> Result<Vec<League>, RepositoryError> {
        let tables = self.tables.read().await;
        let league_ids: HashSet<i64> = tables
            .players
            .iter()
            .filter(|player| player.user_id == user_id)
            .map(|player| player.league_id)
            .collect();
        Ok(tables
            .leagues
            .iter()
            .filter(|league| league_ids.contains(&league.id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl PlayerRepository for InMemoryStore {
    async fn create_player(&self, player: &NewPlayer) -> Result<i64, RepositoryError> {
        let mut tables = self.tables.write().await;
        tables.check(FailurePoint::CreatePlayer)?;
        let player = tables.build_player(player, &Staged::default())?;
        let id = player.id;
        tables.players.push(player);
        Ok(id)
    }

    async fn update_player(&self, player: &Player) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        tables.check(FailurePoint::UpdatePlayer)?;
        let existing = tables
            .players
            .iter_mut()
            .find(|existing| existing.id == player.id)
            .ok_or(RepositoryError::NotFound)?;
        existing.handicap = player.handicap;
        existing.is_commissioner = player.is_commissioner;
        existing.is_active = player.is_active;
        existing.updated_at = Utc::now();
        Ok(())
    }

    async fn get_player_by_id(&self, player_id: i64) -> Result<Player, RepositoryError> {
        let tables = self.tables.read().await;
        tables
            .players
            .iter()
            .find(|player| player.id == player_id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn get_players_by_league_id(
        &self,
        league_id: i64,
    ) -> Result<Vec<LeaguePlayer>, RepositoryError> {
        let tables = self.tables.read().await;
        let mut roster = Vec::new();
        for player in tables.players.iter().filter(|p| p.league_id == league_id) {
            let user = tables
                .users
                .iter()
                .find(|user| user.id == player.user_id)
                .ok_or_else(|| {
                    RepositoryError::Database(format!("player {} has no user", player.id))
                })?;
            roster.push(LeaguePlayer {
                player: player.clone(),
                first_name: user.first_name.clone(),
                last_name: user.last_name.clone(),
            });
        }
        Ok(roster)
    }

    async fn get_player_by_user_and_league_id(
        &self,
        user_id: i64,
        league_id: i64,
    ) -> Result<Player, RepositoryError> {
        let tables = self.tables.read().await;
        tables
            .players
            .iter()
            .find(|player| player.user_id == user_id && player.league_id == league_id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }
}

#[async_trait]
impl DbManager for InMemoryStore {
    async fn begin_transaction(&self) -> Result<Box<dyn UnitOfWork>, RepositoryError> {
        self.tables
            .read()
            .await
            .check(FailurePoint::BeginTransaction)?;
        Ok(Box::new(InMemoryUnitOfWork {
            store: self.clone(),
            staged: Some(Staged::default()),
        }))
    }
}

pub struct InMemoryUnitOfWork {
    store: InMemoryStore,
    staged: Option<Staged>,
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    async fn create_league(&mut self, league: &NewLeague) -> Result<i64, RepositoryError> {
        let staged = self
            .staged
            .as_mut()
            .ok_or(RepositoryError::TransactionClosed)?;
        let mut tables = self.store.tables.write().await;
        tables.check(FailurePoint::CreateLeague)?;
        let league = tables.build_league(league, &staged.leagues)?;
        let id = league.id;
        staged.leagues.push(league);
        Ok(id)
    }

    async fn create_player(&mut self, player: &NewPlayer) -> Result<i64, RepositoryError> {
        let staged = self
            .staged
            .as_mut()
            .ok_or(RepositoryError::TransactionClosed)?;
        let mut tables = self.store.tables.write().await;
        tables.check(FailurePoint::CreatePlayer)?;
        let player = tables.build_player(player, staged)?;
        let id = player.id;
        staged.players.push(player);
        Ok(id)
    }

    async fn create_inactive_user(&mut self, user: &NewUser) -> Result<i64, RepositoryError> {
        let staged = self
            .staged
            .as_mut()
            .ok_or(RepositoryError::TransactionClosed)?;
        let mut tables = self.store.tables.write().await;
        tables.check(FailurePoint::CreateUser)?;
        let user = tables.build_user(user, None, &staged.users)?;
        let id = user.id;
        staged.users.push(user);
        Ok(id)
    }

    async fn commit(&mut self) -> Result<(), RepositoryError> {
        let staged = self
            .staged
            .take()
            .ok_or(RepositoryError::TransactionClosed)?;
        let mut tables = self.store.tables.write().await;
        tables.check(FailurePoint::Commit)?;
        tables.check_staged(&staged)?;
        tables.users.extend(staged.users);
        tables.leagues.extend(staged.leagues);
        tables.players.extend(staged.players);
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), RepositoryError> {
        self.staged
            .take()
            .map(|_| ())
            .ok_or(RepositoryError::TransactionClosed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store_with_user() -> (InMemoryStore, User) {
        let store = InMemoryStore::new();
        let user = store
            .seed_user(NewUser::new("Arnold", "Palmer", "arnie@example.com"), Some("hash"))
            .await
            .unwrap();
        (store, user)
    }

    #[tokio::test]
    async fn test_committed_writes_become_visible() {
        let (store, user) = store_with_user().await;

        let mut uow = store.begin_transaction().await.unwrap();
        let league_id = uow.create_league(&NewLeague::new("Eagles")).await.unwrap();
        let mut commissioner = NewPlayer::commissioner(user.id);
        commissioner.league_id = league_id;
        uow.create_player(&commissioner).await.unwrap();

        assert!(store.leagues().await.is_empty());
        assert!(store.players().await.is_empty());

        uow.commit().await.unwrap();

        assert_eq!(store.leagues().await.len(), 1);
        assert_eq!(store.players().await.len(), 1);
    }

    #[tokio::test]
    async fn test_dropped_unit_of_work_discards_writes() {
        let (store, _user) = store_with_user().await;

        {
            let mut uow = store.begin_transaction().await.unwrap();
            uow.create_league(&NewLeague::new("Eagles")).await.unwrap();
        }

        assert!(store.leagues().await.is_empty());
        assert!(store.get_league_by_name("Eagles").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_finished_unit_of_work_rejects_further_use() {
        let (store, _user) = store_with_user().await;

        let mut uow = store.begin_transaction().await.unwrap();
        uow.rollback().await.unwrap();

        assert_eq!(
            uow.create_league(&NewLeague::new("Eagles")).await,
            Err(RepositoryError::TransactionClosed)
        );
        assert_eq!(uow.commit().await, Err(RepositoryError::TransactionClosed));
    }

    #[tokio::test]
    async fn test_interleaved_units_cannot_both_commit_a_league_name() {
        let (store, _user) = store_with_user().await;

        let mut first = store.begin_transaction().await.unwrap();
        let mut second = store.begin_transaction().await.unwrap();
        first.create_league(&NewLeague::new("Eagles")).await.unwrap();
        second.create_league(&NewLeague::new("Eagles")).await.unwrap();

        first.commit().await.unwrap();
        let err = second.commit().await.unwrap_err();

        assert_eq!(err, RepositoryError::Conflict("leagues_name_key".to_string()));
        assert_eq!(store.leagues().await.len(), 1);
    }

    #[tokio::test]
    async fn test_interleaved_units_cannot_both_commit_an_email_or_membership() {
        let (store, user) = store_with_user().await;
        let league = store.seed_league("Eagles").await.unwrap();

        let mut first = store.begin_transaction().await.unwrap();
        let mut second = store.begin_transaction().await.unwrap();
        first
            .create_inactive_user(&NewUser::new("Jack", "Nicklaus", "jack@example.com"))
            .await
            .unwrap();
        second
            .create_inactive_user(&NewUser::new("Jack", "Nicklaus", "jack@example.com"))
            .await
            .unwrap();
        first.commit().await.unwrap();
        assert!(second.commit().await.unwrap_err().is_conflict());

        let mut first = store.begin_transaction().await.unwrap();
        let mut second = store.begin_transaction().await.unwrap();
        first
            .create_player(&NewPlayer::member(user.id, league.id))
            .await
            .unwrap();
        second
            .create_player(&NewPlayer::member(user.id, league.id))
            .await
            .unwrap();
        first.commit().await.unwrap();
        assert!(second.commit().await.unwrap_err().is_conflict());

        assert_eq!(store.users().await.len(), 2);
        assert_eq!(store.players().await.len(), 1);
    }

    #[tokio::test]
    async fn test_player_requires_existing_league_and_user() {
        let (store, user) = store_with_user().await;
        let league = store.seed_league("Eagles").await.unwrap();

        let missing_league = store.create_player(&NewPlayer::member(user.id, 99)).await;
        assert!(matches!(missing_league, Err(RepositoryError::Database(_))));

        let missing_user = store.create_player(&NewPlayer::member(99, league.id)).await;
        assert!(matches!(missing_user, Err(RepositoryError::Database(_))));
    }

    #[tokio::test]
    async fn test_one_player_per_user_and_league() {
        let (store, user) = store_with_user().await;
        let league = store.seed_league("Eagles").await.unwrap();

        store
            .create_player(&NewPlayer::member(user.id, league.id))
            .await
            .unwrap();
        let duplicate = store
            .create_player(&NewPlayer::member(user.id, league.id))
            .await
            .unwrap_err();

        assert!(duplicate.is_conflict());
        assert_eq!(store.players().await.len(), 1);
    }

    #[tokio::test]
    async fn test_unique_email_and_league_name() {
        let (store, _user) = store_with_user().await;
        store.seed_league("Eagles").await.unwrap();

        let email = store
            .create_user(&NewUser::new("A", "P", "arnie@example.com"), "hash")
            .await
            .unwrap_err();
        assert!(email.is_conflict());

        let mut uow = store.begin_transaction().await.unwrap();
        let name = uow.create_league(&NewLeague::new("Eagles")).await.unwrap_err();
        assert!(name.is_conflict());
    }

    #[tokio::test]
    async fn test_injected_failures_until_cleared() {
        let (store, user) = store_with_user().await;
        let league = store.seed_league("Eagles").await.unwrap();
        store.fail_on(FailurePoint::CreatePlayer).await;

        assert!(store
            .create_player(&NewPlayer::member(user.id, league.id))
            .await
            .is_err());

        store.clear_failures().await;
        assert!(store
            .create_player(&NewPlayer::member(user.id, league.id))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_roster_joins_user_names_in_insertion_order() {
        let (store, arnie) = store_with_user().await;
        let jack = store
            .seed_user(NewUser::new("Jack", "Nicklaus", "jack@example.com"), None)
            .await
            .unwrap();
        let league = store.seed_league("Eagles").await.unwrap();
        store
            .seed_player(NewPlayer::member(jack.id, league.id))
            .await
            .unwrap();
        store
            .seed_player(NewPlayer::member(arnie.id, league.id))
            .await
            .unwrap();

        let roster = store.get_players_by_league_id(league.id).await.unwrap();

        assert_eq!(roster.len(), 2);
        assert_eq!(roster[0].first_name, "Jack");
        assert_eq!(roster[1].last_name, "Palmer");
        assert!(store.get_players_by_league_id(99).await.unwrap().is_empty());
    }
}
