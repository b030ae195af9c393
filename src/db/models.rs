use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(username: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            username,
            password_hash,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Joke {
    pub id: Uuid,
    pub name: String,
    pub content: String,
    pub jokester_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Joke {
    pub fn new(name: String, content: String, jokester_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            content,
            jokester_id,
            created_at: Utc::now(),
        }
    }
}

/// Listing projection for the jokes index: id and name only.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JokeListItem {
    pub id: Uuid,
    pub name: String,
}
