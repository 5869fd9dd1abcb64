use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use shared::models::auth::responses::ErrorResponse;
use shared::services::errors::{
    auth_service_errors::AuthServiceError, league_service_errors::LeagueServiceError,
    player_service_errors::PlayerServiceError, user_service_errors::UserServiceError, ErrorKind,
};

#[derive(Debug)]
pub enum ApiError {
    UserService(UserServiceError),
    AuthService(AuthServiceError),
    LeagueService(LeagueServiceError),
    PlayerService(PlayerServiceError),
    Validation(String),
    Unauthorized,
    Forbidden,
}

impl ApiError {
    fn kind(&self) -> ErrorKind {
        match self {
            ApiError::UserService(err) => err.kind(),
            ApiError::AuthService(err) => err.kind(),
            ApiError::LeagueService(err) => err.kind(),
            ApiError::PlayerService(err) => err.kind(),
            ApiError::Validation(_) => ErrorKind::Validation,
            ApiError::Unauthorized => ErrorKind::InvalidCredentials,
            ApiError::Forbidden => ErrorKind::Forbidden,
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::UserService(err) => err.to_string(),
            ApiError::AuthService(err) => err.to_string(),
            ApiError::LeagueService(err) => err.to_string(),
            ApiError::PlayerService(err) => err.to_string(),
            ApiError::Validation(msg) => msg.clone(),
            ApiError::Unauthorized => "Authentication required".to_string(),
            ApiError::Forbidden => "Admin access required".to_string(),
        }
    }
}

impl From<UserServiceError> for ApiError {
    fn from(error: UserServiceError) -> Self {
        ApiError::UserService(error)
    }
}

impl From<AuthServiceError> for ApiError {
    fn from(error: AuthServiceError) -> Self {
        ApiError::AuthService(error)
    }
}

impl From<LeagueServiceError> for ApiError {
    fn from(error: LeagueServiceError) -> Self {
        ApiError::LeagueService(error)
    }
}

impl From<PlayerServiceError> for ApiError {
    fn from(error: PlayerServiceError) -> Self {
        ApiError::PlayerService(error)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::Forbidden => StatusCode::FORBIDDEN,
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::InvalidCredentials => StatusCode::UNAUTHORIZED,
        ErrorKind::PersistenceFailure | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(self.kind());
        let message = if status.is_server_error() {
            // Storage and hashing details stay in the logs.
            error!("Request failed: {}", self.message());
            "Internal server error".to_string()
        } else {
            self.message()
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
