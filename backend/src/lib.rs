pub mod config;
pub mod error;
pub mod logging;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod store;
pub mod test_util;

pub use config::Config;
pub use error::Error;
pub use middleware::{RequestLogger, RequestLoggerLayer};
pub use models::{NewLogEntry, PathCount, PathEntry};
pub use store::{LogStore, SqliteLogStore, StoreError};

use std::sync::Arc;
use axum::Router;
use tower_http::trace::TraceLayer;

/// Shared application state.
///
/// Built once at startup and handed to every route; the store handle lives
/// as long as the process.
pub struct AppState {
    /// Request log shared by the logger middleware and the stats handlers.
    pub store: Arc<dyn LogStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn LogStore>) -> Self {
        Self { store }
    }
}

/// Build the full application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(routes::intercepted::router(state.clone()))
        .merge(routes::stats::router(state))
        .layer(axum::middleware::from_fn(logging::access_log))
        .layer(TraceLayer::new_for_http())
}
