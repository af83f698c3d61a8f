//! Error types for the HTTP layer.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::store::StoreError;

/// Errors returned by the request logger and the stats handlers.
///
/// Responses are plain text carrying the error message, including raw
/// storage messages.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("can't read body")]
    BodyRead(#[source] axum::Error),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Url Param '{0}' is missing")]
    MissingParam(&'static str),

    #[error(transparent)]
    Serialize(#[from] serde_json::Error),
}

impl Error {
    pub fn status(&self) -> StatusCode {
        match self {
            Error::BodyRead(_) => StatusCode::BAD_REQUEST,
            Error::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            // Really a client error; candidate for 400 once no caller relies on 500.
            Error::MissingParam(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Serialize(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        (self.status(), format!("{}\n", self)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let body_read = Error::BodyRead(axum::Error::new(std::io::Error::other("reset")));
        assert_eq!(body_read.status(), StatusCode::BAD_REQUEST);

        let store = Error::Store(StoreError::DatabaseError("disk I/O error".to_string()));
        assert_eq!(store.status(), StatusCode::INTERNAL_SERVER_ERROR);

        assert_eq!(Error::MissingParam("path").status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_messages() {
        let store = Error::Store(StoreError::DatabaseError("no such table: log".to_string()));
        assert_eq!(store.to_string(), "no such table: log");
        assert_eq!(Error::MissingParam("path").to_string(), "Url Param 'path' is missing");
        let body_read = Error::BodyRead(axum::Error::new(std::io::Error::other("reset")));
        assert_eq!(body_read.to_string(), "can't read body");
    }

    #[tokio::test]
    async fn test_into_response_is_plain_text() {
        let response = Error::MissingParam("path").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.headers()[axum::http::header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"Url Param 'path' is missing\n");
    }
}
