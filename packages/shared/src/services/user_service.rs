use std::sync::Arc;

use tracing::{debug, error};

use crate::models::user::{AccessLevel, NewUser, User};
use crate::repositories::errors::repository_errors::RepositoryError;
use crate::repositories::user_repository::UserRepository;
use crate::services::credential_store::CredentialStore;
use crate::services::errors::user_service_errors::UserServiceError;

pub struct UserService {
    repository: Arc<dyn UserRepository + Send + Sync>,
    credentials: Arc<dyn CredentialStore + Send + Sync>,
}

impl UserService {
    pub fn new(
        repository: Arc<dyn UserRepository + Send + Sync>,
        credentials: Arc<dyn CredentialStore + Send + Sync>,
    ) -> Self {
        UserService {
            repository,
            credentials,
        }
    }

    pub async fn get_user(&self, user_id: i64) -> Result<User, UserServiceError> {
        self.repository
            .get_user_by_id(user_id)
            .await
            .map_err(UserServiceError::from)
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<User, UserServiceError> {
        if email.is_empty() {
            return Err(UserServiceError::ValidationError(
                "Email cannot be empty".to_string(),
            ));
        }
        self.repository
            .get_user_by_email(email)
            .await
            .map_err(UserServiceError::from)
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool, UserServiceError> {
        self.repository
            .email_exists(email)
            .await
            .map_err(UserServiceError::RepositoryError)
    }

    /// Registers an account. Callers check that the email is free first.
    pub async fn create_user(&self, user: &NewUser, password: &str) -> Result<i64, UserServiceError> {
        if password.is_empty() {
            return Err(UserServiceError::ValidationError(
                "Password cannot be empty".to_string(),
            ));
        }

        let hashed_password = self.credentials.hash(password)?;
        let user = NewUser {
            access_level: AccessLevel::Player,
            ..user.clone()
        };

        let id = self
            .repository
            .create_user(&user, &hashed_password)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => UserServiceError::UserAlreadyExists,
                other => UserServiceError::RepositoryError(other),
            })?;
        debug!("Created user {} for {}", id, user.email);
        Ok(id)
    }

    /// Returns the user's ID and access level when `password` matches.
    ///
    /// Unknown emails, unclaimed accounts and wrong passwords all yield
    /// [`UserServiceError::InvalidCredentials`].
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(i64, AccessLevel), UserServiceError> {
        let user = match self.repository.get_user_by_email(email).await {
            Ok(user) => user,
            Err(RepositoryError::NotFound) => return Err(UserServiceError::InvalidCredentials),
            Err(e) => return Err(UserServiceError::RepositoryError(e)),
        };

        if !user.is_claimed() {
            debug!("User {} has not claimed their account", user.id);
            return Err(UserServiceError::InvalidCredentials);
        }
        let hash = user.password.as_deref().unwrap_or_default();

        match self.credentials.verify(password, hash) {
            Ok(true) => Ok((user.id, user.access_level)),
            Ok(false) => Err(UserServiceError::InvalidCredentials),
            Err(e) => {
                error!("Stored credential for user {} is unusable: {}", user.id, e);
                Err(UserServiceError::InvalidCredentials)
            }
        }
    }
}
