use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use tracing::{debug, error, info};

use crate::middleware::{auth::AuthenticatedUser, json::AppJson};
use crate::{error::ApiError, state::AppState};
use shared::models::auth::requests::{AddPlayerRequest, CreateLeagueRequest};
use shared::models::auth::responses::{CreatedResponse, LeagueDetailsResponse};
use shared::models::league::{League, NewLeague};
use shared::models::player::{NewPlayer, Player};
use shared::models::user::NewUser;
use shared::services::errors::league_service_errors::LeagueServiceError;
use shared::services::errors::player_service_errors::PlayerServiceError;
use shared::services::errors::user_service_errors::UserServiceError;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/leagues", get(list_leagues).post(create_league))
        .route("/leagues/{league_id}", get(get_league))
        .route("/leagues/{league_id}/players", post(add_player))
        .route(
            "/leagues/{league_id}/players/{player_id}/activate",
            post(activate_player),
        )
        .route("/leagues/{league_id}/players/{player_id}", delete(remove_player))
}

async fn list_leagues(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<League>>, ApiError> {
    state
        .league_service
        .get_leagues_by_user(user.user_id)
        .await
        .map(Json)
        .map_err(|e| {
            error!("Failed to list leagues for user {}: {}", user.user_id, e);
            ApiError::from(e)
        })
}

async fn create_league(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    AppJson(request): AppJson<CreateLeagueRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    request.validate().map_err(ApiError::Validation)?;
    let name = request.name.trim();

    match state.league_service.get_league_by_name(name).await {
        Ok(_) => return Err(LeagueServiceError::LeagueNameTaken.into()),
        Err(LeagueServiceError::LeagueNotFound) => {}
        Err(e) => return Err(e.into()),
    }

    let league_id = state
        .league_service
        .create_league_with_commissioner(&NewLeague::new(name), NewPlayer::commissioner(user.user_id))
        .await
        .map_err(|e| {
            error!("Failed to create league {}: {}", name, e);
            ApiError::from(e)
        })?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id: league_id })))
}

async fn get_league(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(league_id): Path<i64>,
) -> Result<Json<LeagueDetailsResponse>, ApiError> {
    let league = state.league_service.get_league(league_id).await?;
    let players = state
        .player_service
        .get_players_in_league(league_id)
        .await
        .map_err(|e| {
            error!("Failed to load roster for league {}: {}", league_id, e);
            ApiError::from(e)
        })?;
    Ok(Json(LeagueDetailsResponse { league, players }))
}

/// Adds a player by email, onboarding an unclaimed account when nobody owns it yet.
async fn add_player(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(league_id): Path<i64>,
    AppJson(request): AppJson<AddPlayerRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    state
        .player_service
        .require_commissioner(user.user_id, league_id)
        .await?;
    request.validate().map_err(ApiError::Validation)?;
    let email = request.email.trim();

    let user_id = match state.user_service.get_user_by_email(email).await {
        Ok(existing) => {
            state
                .league_service
                .add_existing_user_to_league(existing.id, league_id)
                .await?;
            existing.id
        }
        Err(UserServiceError::UserNotFound) => {
            let new_user = NewUser::new(request.first_name.trim(), request.last_name.trim(), email);
            state
                .league_service
                .add_new_user_to_league(&new_user, league_id)
                .await
                .map_err(|e| {
                    error!("Failed to onboard {} into league {}: {}", email, league_id, e);
                    ApiError::from(e)
                })?
        }
        Err(e) => return Err(e.into()),
    };

    info!("User {} added user {} to league {}", user.user_id, user_id, league_id);
    Ok((StatusCode::CREATED, Json(CreatedResponse { id: user_id })))
}

async fn activate_player(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path((league_id, player_id)): Path<(i64, i64)>,
) -> Result<StatusCode, ApiError> {
    let player = league_player(&state, &user, league_id, player_id).await?;
    state.player_service.activate_player(&player).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn remove_player(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path((league_id, player_id)): Path<(i64, i64)>,
) -> Result<StatusCode, ApiError> {
    let player = league_player(&state, &user, league_id, player_id).await?;
    state.player_service.remove_player(&player).await.map_err(|e| {
        debug!("Could not remove player {}: {}", player_id, e);
        ApiError::from(e)
    })?;
    Ok(StatusCode::NO_CONTENT)
}

/// Loads `player_id` for a commissioner action in `league_id`.
async fn league_player(
    state: &AppState,
    user: &AuthenticatedUser,
    league_id: i64,
    player_id: i64,
) -> Result<Player, ApiError> {
    state
        .player_service
        .require_commissioner(user.user_id, league_id)
        .await?;
    let player = state.player_service.get_player(player_id).await?;
    if player.league_id != league_id {
        return Err(PlayerServiceError::PlayerNotFound.into());
    }
    Ok(player)
}
