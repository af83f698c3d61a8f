//! Capture-then-delegate middleware for intercepted endpoints.
//!
//! [`RequestLoggerLayer`] wraps a route's handler at registration time. For
//! each call the wrapped service:
//! 1. renders the request headers into a text blob,
//! 2. reads the whole body (400 on failure),
//! 3. splits the raw URI into path and query,
//! 4. inserts one row into the [`LogStore`] (500 on failure),
//! 5. runs the inner handler with an emptied body.

use std::convert::Infallible;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::extract::Request;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use futures_util::future::BoxFuture;
use tower::{Layer, Service};

use crate::error::Error;
use crate::models::NewLogEntry;
use crate::store::LogStore;

/// Layer producing [`RequestLogger`] services that share one store.
#[derive(Clone)]
pub struct RequestLoggerLayer {
    store: Arc<dyn LogStore>,
}

impl RequestLoggerLayer {
    pub fn new(store: Arc<dyn LogStore>) -> Self {
        Self { store }
    }
}

impl<S> Layer<S> for RequestLoggerLayer {
    type Service = RequestLogger<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestLogger {
            inner,
            store: self.store.clone(),
        }
    }
}

/// Service that persists each request before handing it to `inner`.
#[derive(Clone)]
pub struct RequestLogger<S> {
    inner: S,
    store: Arc<dyn LogStore>,
}

impl<S> Service<Request> for RequestLogger<S>
where
    S: Service<Request, Response = Response, Error = Infallible> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = Infallible;
    type Future = BoxFuture<'static, Result<Response, Infallible>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request) -> Self::Future {
        // The clone may not be ready; keep the one poll_ready was called on.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let store = self.store.clone();

        Box::pin(async move {
            match capture(store.as_ref(), request).await {
                Ok(request) => inner.call(request).await,
                Err(e) => Ok(e.into_response()),
            }
        })
    }
}

/// Persist `request` and return it with its body consumed.
async fn capture(store: &dyn LogStore, request: Request) -> Result<Request, Error> {
    let (parts, body) = request.into_parts();
    let headers = render_headers(&parts.headers);

    let body = axum::body::to_bytes(body, usize::MAX).await.map_err(|e| {
        tracing::warn!(error = %e, "Error reading body");
        Error::BodyRead(e)
    })?;

    let raw_uri = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| parts.uri.path());
    let (path, query) = split_request_uri(raw_uri);

    let entry = NewLogEntry {
        method: parts.method.to_string(),
        path: path.to_string(),
        query: query.to_string(),
        headers,
        body: body.to_vec(),
        created: Utc::now(),
    };

    let id = store.insert(&entry).map_err(|e| {
        tracing::error!(error = %e, path = %entry.path, "Failed to log request");
        Error::Store(e)
    })?;
    tracing::debug!(id, method = %entry.method, path = %entry.path, "Logged request");

    // The body stays consumed: downstream handlers see an empty stream.
    Ok(Request::from_parts(parts, Body::empty()))
}

/// Render one `"name": "value"` line per header name, first value only.
///
/// Line order follows the header map and is not stable across requests.
pub fn render_headers(headers: &HeaderMap) -> String {
    let mut rendered = String::new();
    for name in headers.keys() {
        if let Some(value) = headers.get(name) {
            let value = String::from_utf8_lossy(value.as_bytes());
            rendered.push_str(&format!("{:?}: {:?}\n", name.as_str(), value));
        }
    }
    rendered
}

/// Split a raw request URI on the first `?` into `(path, query)`.
pub fn split_request_uri(uri: &str) -> (&str, &str) {
    uri.split_once('?').unwrap_or((uri, ""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_split_with_query() {
        assert_eq!(split_request_uri("/login/?a=1"), ("/login/", "a=1"));
    }

    #[test]
    fn test_split_without_query() {
        assert_eq!(split_request_uri("/login/"), ("/login/", ""));
    }

    #[test]
    fn test_split_keeps_everything_after_first_question_mark() {
        assert_eq!(split_request_uri("/check/?a=1?b=2"), ("/check/", "a=1?b=2"));
        assert_eq!(split_request_uri("/check/?"), ("/check/", ""));
    }

    #[test]
    fn test_render_single_header() {
        let mut headers = HeaderMap::new();
        headers.insert("x-token", HeaderValue::from_static("abc"));
        assert_eq!(render_headers(&headers), "\"x-token\": \"abc\"\n");
    }

    #[test]
    fn test_render_takes_first_value_only() {
        let mut headers = HeaderMap::new();
        headers.append("accept", HeaderValue::from_static("text/html"));
        headers.append("accept", HeaderValue::from_static("application/json"));
        assert_eq!(render_headers(&headers), "\"accept\": \"text/html\"\n");
    }

    #[test]
    fn test_render_escapes_quotes() {
        let mut headers = HeaderMap::new();
        headers.insert("x-note", HeaderValue::from_static("say \"hi\""));
        assert_eq!(render_headers(&headers), "\"x-note\": \"say \\\"hi\\\"\"\n");
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render_headers(&HeaderMap::new()), "");
    }
}
