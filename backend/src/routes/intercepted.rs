//! Stub endpoints whose every call is recorded by the request logger.

use std::sync::Arc;
use axum::{routing::any, Router};

use crate::middleware::RequestLoggerLayer;
use crate::AppState;

async fn login() -> &'static str {
    "login"
}

async fn check() -> &'static str {
    "check"
}

async fn logout() -> &'static str {
    "logout"
}

/// Routes for `/login/`, `/check/` and `/logout/`, including their subtrees.
pub fn router(state: Arc<AppState>) -> Router {
    let logged = RequestLoggerLayer::new(state.store.clone());

    Router::new()
        .route("/login/", any(login).layer(logged.clone()))
        .route("/login/*rest", any(login).layer(logged.clone()))
        .route("/check/", any(check).layer(logged.clone()))
        .route("/check/*rest", any(check).layer(logged.clone()))
        .route("/logout/", any(logout).layer(logged.clone()))
        .route("/logout/*rest", any(logout).layer(logged))
}
