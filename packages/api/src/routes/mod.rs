pub mod admin;
pub mod health;
pub mod leagues;
pub mod user;
