//! Innkeeper - Main Entry Point

use std::sync::Arc;

use innkeeper_backend::{
    api::{routes, AppState},
    config::Config,
    db,
    error::Result,
    store::PgStore,
    telemetry,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing at the configured level
    let directives = format!(
        "innkeeper_backend={level},tower_http={level}",
        level = config.log_level
    );
    telemetry::init_tracing(&directives);
    tracing::info!("Starting Innkeeper");

    // Connect to database
    let db_pool = db::create_pool(&config.database_url, config.db_max_connections).await?;
    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .map_err(|e| innkeeper_backend::AppError::Database(e.to_string()))?;
    tracing::info!("Database migrations complete");

    let store = Arc::new(PgStore::new(db_pool));
    let bind_address = config.bind_address.clone();
    let state = Arc::new(AppState::new(config, store));

    let router = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!(address = %bind_address, "Listening");
    axum::serve(listener, router).await?;

    Ok(())
}
