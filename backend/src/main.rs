use std::sync::Arc;
use tokio::net::TcpListener;

use reqlog_backend::{logging, router, AppState, Config, SqliteLogStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::load()
        .map_err(|e| format!("Failed to load configuration: {}", e))?;

    // Initialize tracing
    logging::init(&config.logging.level);

    tracing::info!("Starting request logger");

    // Open the request log, creating the schema on first start
    let store = SqliteLogStore::open(&config.database.path)?;

    let state = Arc::new(AppState::new(Arc::new(store)));
    let app = router(state);

    // Start server
    let addr = config.server.addr();
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
