use crate::repositories::errors::repository_errors::RepositoryError;
use crate::services::errors::credential_errors::CredentialError;
use crate::services::errors::ErrorKind;

#[derive(Debug, Clone, PartialEq)]
pub enum UserServiceError {
    UserNotFound,
    UserAlreadyExists,
    /// Unknown email or wrong password; deliberately does not say which.
    InvalidCredentials,
    ValidationError(String),
    CredentialError(CredentialError),
    RepositoryError(RepositoryError),
}

impl UserServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            UserServiceError::UserNotFound => ErrorKind::NotFound,
            UserServiceError::UserAlreadyExists => ErrorKind::Conflict,
            UserServiceError::InvalidCredentials => ErrorKind::InvalidCredentials,
            UserServiceError::ValidationError(_) => ErrorKind::Validation,
            UserServiceError::CredentialError(_) => ErrorKind::Internal,
            UserServiceError::RepositoryError(_) => ErrorKind::PersistenceFailure,
        }
    }
}

impl std::fmt::Display for UserServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserServiceError::UserNotFound => write!(f, "User not found"),
            UserServiceError::UserAlreadyExists => write!(f, "User already exists"),
            UserServiceError::InvalidCredentials => write!(f, "Invalid login credentials"),
            UserServiceError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            UserServiceError::CredentialError(err) => write!(f, "Credential error: {}", err),
            UserServiceError::RepositoryError(err) => write!(f, "Repository error: {}", err),
        }
    }
}

impl std::error::Error for UserServiceError {}

impl From<RepositoryError> for UserServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => UserServiceError::UserNotFound,
            other => UserServiceError::RepositoryError(other),
        }
    }
}

impl From<CredentialError> for UserServiceError {
    fn from(err: CredentialError) -> Self {
        UserServiceError::CredentialError(err)
    }
}
