use std::time::Duration;

use thiserror::Error;

use crate::domain::ContentKind;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{kind} provider unavailable: {message}")]
    Upstream { kind: ContentKind, message: String },

    #[error("{kind} provider timed out after {after:?}")]
    Timeout { kind: ContentKind, after: Duration },

    #[error("Failed to load page {page}: {source}")]
    Aggregation {
        page: u32,
        #[source]
        source: Box<DashboardError>,
    },

    #[error("Invalid category: {0}")]
    InvalidCategory(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl DashboardError {
    pub fn aggregation(page: u32, source: DashboardError) -> Self {
        DashboardError::Aggregation {
            page,
            source: Box::new(source),
        }
    }

    /// Provider that caused this error, looking through aggregation wrappers.
    pub fn provider(&self) -> Option<ContentKind> {
        match self {
            DashboardError::Upstream { kind, .. } | DashboardError::Timeout { kind, .. } => {
                Some(*kind)
            }
            DashboardError::Aggregation { source, .. } => source.provider(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
