use serde::{Deserialize, Serialize};

use crate::models::league::League;
use crate::models::player::LeaguePlayer;
use crate::models::user::AccessLevel;

#[derive(Debug, Deserialize, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenClaims {
    pub sub: String, // subject (user ID)
    pub access_level: AccessLevel,
    pub exp: usize,
    pub iat: usize,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CreatedResponse {
    pub id: i64,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct LeagueDetailsResponse {
    pub league: League,
    pub players: Vec<LeaguePlayer>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct AdminDashboardResponse {
    pub user_id: i64,
    pub access_level: AccessLevel,
}
