//! Read-only statistics over the request log. These routes are not logged.

use std::sync::Arc;
use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::models::StatsResponse;
use crate::AppState;

type QueryPairs = Query<Vec<(String, String)>>;

fn json_response<T: Serialize>(data: Vec<T>) -> Result<Response> {
    let body = serde_json::to_string(&StatsResponse { data })?;
    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}

/// ANY /stats/ - request counts grouped by path
async fn stats(State(state): State<Arc<AppState>>) -> Result<Response> {
    let counts = state.store.count_by_path()?;
    json_response(counts)
}

/// ANY /stats/detail/?path=<P> - requests logged for one path, oldest first
async fn stats_detail(
    State(state): State<Arc<AppState>>,
    Query(params): QueryPairs,
) -> Result<Response> {
    let path = params
        .iter()
        .find(|(key, _)| key == "path")
        .map(|(_, value)| value.as_str())
        .filter(|value| !value.is_empty())
        .ok_or(Error::MissingParam("path"))?;

    let entries = state.store.entries_for_path(path)?;
    json_response(entries)
}

/// Anything else under /stats/: the longest registered prefix wins.
///
/// `/stats/detail` without the trailing slash also goes to the detail view.
async fn stats_subtree(
    state: State<Arc<AppState>>,
    Path(rest): Path<String>,
    params: QueryPairs,
) -> Result<Response> {
    if rest == "detail" || rest.starts_with("detail/") {
        stats_detail(state, params).await
    } else {
        stats(state).await
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/stats/", any(stats))
        .route("/stats/*rest", any(stats_subtree))
        .with_state(state)
}
