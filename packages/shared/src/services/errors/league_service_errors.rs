use crate::repositories::errors::repository_errors::RepositoryError;
use crate::services::errors::ErrorKind;

#[derive(Debug, Clone, PartialEq)]
pub enum LeagueServiceError {
    LeagueNotFound,
    LeagueNameTaken,
    PlayerAlreadyInLeague,
    UserAlreadyExists,
    ReactivationFailed(RepositoryError),
    ValidationError(String),
    RepositoryError(RepositoryError),
}

impl LeagueServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LeagueServiceError::LeagueNotFound => ErrorKind::NotFound,
            LeagueServiceError::LeagueNameTaken
            | LeagueServiceError::PlayerAlreadyInLeague
            | LeagueServiceError::UserAlreadyExists => ErrorKind::Conflict,
            LeagueServiceError::ValidationError(_) => ErrorKind::Validation,
            LeagueServiceError::ReactivationFailed(_) | LeagueServiceError::RepositoryError(_) => {
                ErrorKind::PersistenceFailure
            }
        }
    }
}

impl std::fmt::Display for LeagueServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeagueServiceError::LeagueNotFound => write!(f, "League not found"),
            LeagueServiceError::LeagueNameTaken => {
                write!(f, "This league name is taken, please choose another")
            }
            LeagueServiceError::PlayerAlreadyInLeague => {
                write!(f, "This player is already in this league")
            }
            LeagueServiceError::UserAlreadyExists => {
                write!(f, "Account already exists with that email address")
            }
            LeagueServiceError::ReactivationFailed(err) => {
                write!(f, "Cannot reactivate player: {}", err)
            }
            LeagueServiceError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            LeagueServiceError::RepositoryError(err) => write!(f, "Repository error: {}", err),
        }
    }
}

impl std::error::Error for LeagueServiceError {}

impl From<RepositoryError> for LeagueServiceError {
    fn from(err: RepositoryError) -> Self {
        LeagueServiceError::RepositoryError(err)
    }
}
