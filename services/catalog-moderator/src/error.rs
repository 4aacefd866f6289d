//! Error types for the catalog moderator

/// Errors that can occur while moderating the catalog
#[derive(Debug, thiserror::Error)]
pub enum ModeratorError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Dashboard must be opened from the chat host")]
    NotEmbedded,

    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The backend answered with a non-2xx status
    #[error("{status} {status_text} - {}", .error.as_deref().unwrap_or("unknown error"))]
    Api {
        status: u16,
        status_text: String,
        error: Option<String>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Template error: {0}")]
    Render(#[from] askama::Error),

    #[error("{0}")]
    Validation(String),

    #[error("An action for {0} is already in progress")]
    InFlight(String),
}

/// Result type alias for moderator operations
pub type Result<T> = std::result::Result<T, ModeratorError>;
