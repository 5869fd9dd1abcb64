use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use std::sync::Arc;
use tracing::debug;

use crate::models::auth::responses::{LoginResponse, TokenClaims};
use crate::models::user::AccessLevel;
use crate::services::errors::auth_service_errors::AuthServiceError;
use crate::services::user_service::UserService;

const TOKEN_LIFETIME_HOURS: i64 = 24;

pub struct AuthService {
    user_service: Arc<UserService>,
    jwt_secret: String,
}

impl AuthService {
    pub fn with_jwt_secret(user_service: Arc<UserService>, jwt_secret: String) -> Self {
        AuthService {
            user_service,
            jwt_secret,
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, AuthServiceError> {
        if email.is_empty() || password.is_empty() {
            return Err(AuthServiceError::ValidationError(
                "Email or password cannot be empty".to_string(),
            ));
        }

        let (user_id, access_level) = self.user_service.authenticate(email, password).await?;
        debug!("User {} logged in", user_id);
        self.generate_token(user_id, access_level)
    }

    pub fn generate_token(
        &self,
        user_id: i64,
        access_level: AccessLevel,
    ) -> Result<LoginResponse, AuthServiceError> {
        let now = Utc::now();
        let lifetime = Duration::hours(TOKEN_LIFETIME_HOURS);
        let exp = (now + lifetime).timestamp() as usize;
        let iat = now.timestamp() as usize;

        let claims = TokenClaims {
            sub: user_id.to_string(),
            access_level,
            exp,
            iat,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )
        .map_err(|e| AuthServiceError::JwtError(format!("{:#?}", e)))?;

        Ok(LoginResponse {
            token,
            token_type: "Bearer".to_string(),
            expires_in: lifetime.num_seconds(),
        })
    }

    pub fn verify_token(&self, token: &str) -> Result<TokenClaims, AuthServiceError> {
        let decoding_key = DecodingKey::from_secret(self.jwt_secret.as_ref());
        let validation = Validation::default();

        match decode::<TokenClaims>(token, &decoding_key, &validation) {
            Ok(token_data) => Ok(token_data.claims),
            Err(err) => match err.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    Err(AuthServiceError::ExpiredToken)
                }
                _ => Err(AuthServiceError::InvalidToken),
            },
        }
    }

    pub fn extract_user_id_from_token(&self, token: &str) -> Result<i64, AuthServiceError> {
        self.extract_identity_from_token(token)
            .map(|(user_id, _)| user_id)
    }

    /// The user ID and access level a valid token was issued for.
    pub fn extract_identity_from_token(
        &self,
        token: &str,
    ) -> Result<(i64, AccessLevel), AuthServiceError> {
        let claims = self.verify_token(token)?;
        let user_id = claims
            .sub
            .parse()
            .map_err(|_| AuthServiceError::InvalidToken)?;
        Ok((user_id, claims.access_level))
    }
}
