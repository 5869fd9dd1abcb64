use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Membership of a user in a league.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, sqlx::FromRow)]
pub struct Player {
    pub id: i64,
    pub league_id: i64,
    pub user_id: i64,
    pub handicap: i32,
    pub is_commissioner: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Roster row: a player plus the display fields of its user.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, sqlx::FromRow)]
pub struct LeaguePlayer {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub player: Player,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct NewPlayer {
    pub league_id: i64,
    pub user_id: i64,
    pub handicap: i32,
    pub is_commissioner: bool,
    pub is_active: bool,
}

impl NewPlayer {
    /// The founding player of a league. `league_id` is filled in once the league exists.
    pub fn commissioner(user_id: i64) -> Self {
        NewPlayer {
            league_id: 0,
            user_id,
            handicap: 0,
            is_commissioner: true,
            is_active: true,
        }
    }

    pub fn member(user_id: i64, league_id: i64) -> Self {
        NewPlayer {
            league_id,
            user_id,
            handicap: 0,
            is_commissioner: false,
            is_active: true,
        }
    }
}
