use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, sqlx::FromRow)]
pub struct League {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct NewLeague {
    pub name: String,
}

impl NewLeague {
    pub fn new(name: &str) -> Self {
        NewLeague {
            name: name.to_string(),
        }
    }
}
