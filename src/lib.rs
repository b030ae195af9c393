pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod jokes;
pub mod session;

use std::sync::Arc;
use std::time::Duration;
use actix_web::{web, HttpResponse};

pub use error::AppError;
pub type Result<T> = std::result::Result<T, AppError>;
pub use config::Settings;

pub use auth::{AuthCheck, AuthService};
pub use db::{DbOperations, Joke, JokeStore, User, UserStore};
pub use session::{Session, SessionStore};

/// Health check endpoint handler
/// Returns a JSON response with server status and timestamp
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Routing table, shared by `main` and the integration tests.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/login", web::get().to(auth::handlers::login_page))
        .route("/login", web::post().to(auth::handlers::login))
        .route("/register", web::post().to(auth::handlers::register))
        .route("/logout", web::post().to(auth::handlers::logout))
        .route("/jokes", web::get().to(jokes::handlers::list_jokes))
        .route("/jokes", web::post().to(jokes::handlers::create_joke))
        // Registered ahead of the id route so "new" is not parsed as one
        .route("/jokes/new", web::get().to(jokes::handlers::new_joke_page))
        .route("/jokes/{id}", web::get().to(jokes::handlers::get_joke));
}

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    pub auth: AuthService,
    pub jokes: Arc<dyn JokeStore>,
}

impl AppState {
    pub async fn new(config: Settings) -> Result<Self> {
        let db = DbOperations::new_with_options(
            &config.database.url,
            config.database.max_connections,
            Duration::from_secs(5),
        )
        .await?;

        sqlx::migrate!("./migrations")
            .run(db.pool())
            .await
            .map_err(|e| AppError::DatabaseError(error::DatabaseError::QueryError(e.to_string())))?;

        let db = Arc::new(db);
        let sessions = SessionStore::from_settings(&config);
        let auth = AuthService::new(db.clone(), sessions, config.auth.bcrypt_cost);

        Ok(Self {
            config: Arc::new(config),
            auth,
            jokes: db,
        })
    }
}
