use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{debug, error};

use crate::middleware::{auth::AuthenticatedUser, json::AppJson};
use crate::{error::ApiError, state::AppState};
use shared::models::auth::requests::{CreateUserRequest, LoginRequest};
use shared::models::auth::responses::LoginResponse;
use shared::models::user::{AccessLevel, NewUser, User};
use shared::services::errors::user_service_errors::UserServiceError;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/user", get(get_user))
        .route("/user/sign-up", post(sign_up))
        .route("/user/login", post(login))
}

async fn sign_up(
    State(state): State<AppState>,
    AppJson(user_data): AppJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<LoginResponse>), ApiError> {
    user_data.validate().map_err(ApiError::Validation)?;
    let email = user_data.email.trim();

    if state.user_service.email_exists(email).await? {
        debug!("Sign-up refused, {} already has an account", email);
        return Err(UserServiceError::UserAlreadyExists.into());
    }

    let new_user = NewUser::new(
        user_data.first_name.trim(),
        user_data.last_name.trim(),
        email,
    );
    let user_id = state
        .user_service
        .create_user(&new_user, &user_data.password)
        .await
        .map_err(|e| {
            error!("Failed to create user {}: {}", email, e);
            ApiError::from(e)
        })?;
    debug!("User created successfully: {}", user_id);

    let token = state
        .auth_service
        .generate_token(user_id, AccessLevel::Player)?;
    Ok((StatusCode::CREATED, Json(token)))
}

async fn login(
    State(state): State<AppState>,
    AppJson(login_data): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    login_data.validate().map_err(ApiError::Validation)?;
    state
        .auth_service
        .login(login_data.email.trim(), &login_data.password)
        .await
        .map(Json)
        .map_err(|e| {
            error!("Failed to authenticate user {}: {}", login_data.email, e);
            ApiError::from(e)
        })
}

async fn get_user(
    State(state): State<AppState>,
    authenticated_user: AuthenticatedUser,
) -> Result<Json<User>, ApiError> {
    state
        .user_service
        .get_user(authenticated_user.user_id)
        .await
        .map(Json)
        .map_err(|e| {
            error!(
                "Failed to retrieve user {}: {}",
                authenticated_user.user_id, e
            );
            ApiError::from(e)
        })
}
