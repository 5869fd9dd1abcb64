pub mod auth;
pub mod league;
pub mod player;
pub mod user;
