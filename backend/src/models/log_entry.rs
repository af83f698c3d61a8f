use chrono::{DateTime, Utc};
use serde::Serialize;

/// A captured request, ready to be written to the `log` table.
///
/// The row id is assigned by storage on insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLogEntry {
    pub method: String,
    pub path: String,
    pub query: String,
    pub headers: String,
    /// Raw request bytes, stored unchanged.
    pub body: Vec<u8>,
    pub created: DateTime<Utc>,
}

impl NewLogEntry {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            query: String::new(),
            headers: String::new(),
            body: Vec::new(),
            created: Utc::now(),
        }
    }
}

/// Number of logged requests for one path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PathCount {
    pub path: String,
    pub counter: i64,
}

/// One logged request as listed by the per-path detail view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PathEntry {
    pub method: String,
    pub query: String,
    pub created: String,
}

/// Envelope shared by both stats endpoints: `{"Data": [...]}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StatsResponse<T> {
    pub data: Vec<T>,
}
