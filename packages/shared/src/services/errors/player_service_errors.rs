use crate::repositories::errors::repository_errors::RepositoryError;
use crate::services::errors::ErrorKind;

#[derive(Debug, Clone, PartialEq)]
pub enum PlayerServiceError {
    PlayerNotFound,
    NotAMember,
    NotCommissioner,
    CannotRemoveCommissioner,
    RepositoryError(RepositoryError),
}

impl PlayerServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PlayerServiceError::PlayerNotFound | PlayerServiceError::NotAMember => {
                ErrorKind::NotFound
            }
            PlayerServiceError::NotCommissioner => ErrorKind::Forbidden,
            PlayerServiceError::CannotRemoveCommissioner => ErrorKind::Conflict,
            PlayerServiceError::RepositoryError(_) => ErrorKind::PersistenceFailure,
        }
    }
}

impl std::fmt::Display for PlayerServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlayerServiceError::PlayerNotFound => write!(f, "Player not found"),
            PlayerServiceError::NotAMember => write!(f, "User is not a member of this league"),
            PlayerServiceError::NotCommissioner => {
                write!(f, "Only the league commissioner can do that")
            }
            PlayerServiceError::CannotRemoveCommissioner => {
                write!(f, "Cannot remove commissioner player")
            }
            PlayerServiceError::RepositoryError(err) => write!(f, "Repository error: {}", err),
        }
    }
}

impl std::error::Error for PlayerServiceError {}

impl From<RepositoryError> for PlayerServiceError {
    fn from(err: RepositoryError) -> Self {
        PlayerServiceError::RepositoryError(err)
    }
}
