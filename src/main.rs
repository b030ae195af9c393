use actix_web::{web, App, HttpServer};
use dotenv::dotenv;
use jokes_server::{AppError, AppState, Settings};
use std::net::TcpListener;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[actix_web::main]
async fn main() -> jokes_server::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .init();

    // Load configuration; a missing session secret aborts here
    let config = Settings::new()?;
    info!("Configuration loaded successfully");

    info!("Starting server at {}:{}", config.server.host, config.server.port);

    // Initialize application state (pool, migrations, services)
    let state = AppState::new(config.clone()).await?;
    let state = web::Data::new(state);

    let listener = TcpListener::bind(format!("{}:{}", config.server.host, config.server.port))?;

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(jokes_server::routes)
    })
    .listen(listener)?
    .workers(config.server.workers as usize)
    .run()
    .await
    .map_err(|e| AppError::InternalError(e.to_string()))?;

    Ok(())
}
