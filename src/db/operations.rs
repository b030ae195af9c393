use crate::db::models::{Joke, JokeListItem, User};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Fields for a joke that passed validation and is ready to persist.
#[derive(Debug, Clone)]
pub struct NewJoke {
    pub name: String,
    pub content: String,
    pub jokester_id: Uuid,
}

/// User repository. The storage layer owns username uniqueness; a violation
/// must come back as `DatabaseError::Duplicate`.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create_user(&self, user: &User) -> Result<User, AppError>;
    async fn get_user_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, AppError>;
}

/// Joke repository.
#[async_trait]
pub trait JokeStore: Send + Sync {
    async fn create_joke(&self, new_joke: NewJoke) -> Result<Joke, AppError>;
    async fn get_joke_by_id(&self, id: Uuid) -> Result<Option<Joke>, AppError>;
    async fn list_jokes(&self, limit: i64) -> Result<Vec<JokeListItem>, AppError>;
}

pub struct DbOperations {
    pool: Arc<PgPool>,
}

impl DbOperations {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    pub async fn new_with_options(
        url: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect(url)
            .await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    pub fn pool(&self) -> &PgPool {
        self.pool.as_ref()
    }
}

#[async_trait]
impl UserStore for DbOperations {
    async fn create_user(&self, user: &User) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username, password_hash, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, password_hash, created_at
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(user)
    }

    async fn get_user_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(user)
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, created_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(user)
    }
}

#[async_trait]
impl JokeStore for DbOperations {
    async fn create_joke(&self, new_joke: NewJoke) -> Result<Joke, AppError> {
        let joke = Joke::new(new_joke.name, new_joke.content, new_joke.jokester_id);

        let joke = sqlx::query_as::<_, Joke>(
            r#"
            INSERT INTO jokes (id, name, content, jokester_id, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, content, jokester_id, created_at
            "#,
        )
        .bind(joke.id)
        .bind(&joke.name)
        .bind(&joke.content)
        .bind(joke.jokester_id)
        .bind(joke.created_at)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(joke)
    }

    async fn get_joke_by_id(&self, id: Uuid) -> Result<Option<Joke>, AppError> {
        let joke = sqlx::query_as::<_, Joke>(
            "SELECT id, name, content, jokester_id, created_at FROM jokes WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(joke)
    }

    async fn list_jokes(&self, limit: i64) -> Result<Vec<JokeListItem>, AppError> {
        let jokes = sqlx::query_as::<_, JokeListItem>(
            "SELECT id, name FROM jokes ORDER BY created_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(jokes)
    }
}
