use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, sqlx::Type)]
#[repr(i32)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    #[default]
    Player = 1,
    Admin = 2,
    SuperAdmin = 3,
}

impl AccessLevel {
    /// Admins and super admins may use the admin area.
    pub fn is_admin(self) -> bool {
        matches!(self, AccessLevel::Admin | AccessLevel::SuperAdmin)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Bcrypt hash. `None` for accounts created by adding an unknown email to a league.
    #[serde(skip_serializing, default)]
    pub password: Option<String>,
    #[sqlx(rename = "access_level_id")]
    pub access_level: AccessLevel,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// A user with no password has never claimed the account.
    pub fn is_claimed(&self) -> bool {
        self.password.is_some()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub access_level: AccessLevel,
}

impl NewUser {
    pub fn new(first_name: &str, last_name: &str, email: &str) -> Self {
        NewUser {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.to_string(),
            access_level: AccessLevel::Player,
        }
    }
}
