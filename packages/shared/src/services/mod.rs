pub mod auth_service;
pub mod credential_store;
pub mod errors;
pub mod league_service;
pub mod player_service;
pub mod user_service;
