use std::sync::Arc;

use tracing::{debug, info};

use crate::models::player::{LeaguePlayer, Player};
use crate::repositories::errors::repository_errors::RepositoryError;
use crate::repositories::player_repository::PlayerRepository;
use crate::services::errors::player_service_errors::PlayerServiceError;

pub struct PlayerService {
    repository: Arc<dyn PlayerRepository + Send + Sync>,
}

impl PlayerService {
    pub fn new(repository: Arc<dyn PlayerRepository + Send + Sync>) -> Self {
        PlayerService { repository }
    }

    /// Full roster, inactive players included, in the order they joined.
    pub async fn get_players_in_league(
        &self,
        league_id: i64,
    ) -> Result<Vec<LeaguePlayer>, PlayerServiceError> {
        Ok(self.repository.get_players_by_league_id(league_id).await?)
    }

    pub async fn get_player_in_league(
        &self,
        user_id: i64,
        league_id: i64,
    ) -> Result<Player, PlayerServiceError> {
        self.repository
            .get_player_by_user_and_league_id(user_id, league_id)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => PlayerServiceError::NotAMember,
                other => PlayerServiceError::RepositoryError(other),
            })
    }

    pub async fn get_player(&self, player_id: i64) -> Result<Player, PlayerServiceError> {
        self.repository
            .get_player_by_id(player_id)
            .await
            .map_err(not_found_as_player)
    }

    pub async fn activate_player(&self, player: &Player) -> Result<(), PlayerServiceError> {
        let player = Player {
            is_active: true,
            ..player.clone()
        };
        self.repository
            .update_player(&player)
            .await
            .map_err(not_found_as_player)?;
        info!("Activated player {} in league {}", player.id, player.league_id);
        Ok(())
    }

    /// Deactivates `player`. The row is kept so league history stays intact.
    pub async fn remove_player(&self, player: &Player) -> Result<(), PlayerServiceError> {
        if player.is_commissioner {
            return Err(PlayerServiceError::CannotRemoveCommissioner);
        }

        let player = Player {
            is_active: false,
            ..player.clone()
        };
        self.repository
            .update_player(&player)
            .await
            .map_err(not_found_as_player)?;
        info!("Removed player {} from league {}", player.id, player.league_id);
        Ok(())
    }

    /// Returns the acting user's player record when they are an active
    /// commissioner of `league_id`.
    pub async fn require_commissioner(
        &self,
        acting_user_id: i64,
        league_id: i64,
    ) -> Result<Player, PlayerServiceError> {
        let player = self.get_player_in_league(acting_user_id, league_id).await?;
        if !player.is_commissioner || !player.is_active {
            debug!(
                "User {} attempted a commissioner action in league {}",
                acting_user_id, league_id
            );
            return Err(PlayerServiceError::NotCommissioner);
        }
        Ok(player)
    }
}

fn not_found_as_player(err: RepositoryError) -> PlayerServiceError {
    match err {
        RepositoryError::NotFound => PlayerServiceError::PlayerNotFound,
        other => PlayerServiceError::RepositoryError(other),
    }
}
