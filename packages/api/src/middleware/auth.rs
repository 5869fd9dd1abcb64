use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::debug;

use crate::{error::ApiError, state::AppState};
use shared::models::user::AccessLevel;

/// The caller identified by the bearer token on the request.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: i64,
    pub access_level: AccessLevel,
}

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .ok_or(ApiError::Unauthorized)?
            .to_str()
            .map_err(|_| ApiError::Validation("Invalid header format".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::Unauthorized)?;

        let (user_id, access_level) = state
            .auth_service
            .extract_identity_from_token(token)
            .map_err(|e| {
                debug!("Rejected bearer token: {}", e);
                ApiError::from(e)
            })?;

        Ok(AuthenticatedUser {
            user_id,
            access_level,
        })
    }
}

/// An authenticated caller holding admin or super admin access.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthenticatedUser);

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthenticatedUser::from_request_parts(parts, state).await?;
        if !user.access_level.is_admin() {
            debug!("User {} was refused the admin area", user.user_id);
            return Err(ApiError::Forbidden);
        }
        Ok(AdminUser(user))
    }
}
