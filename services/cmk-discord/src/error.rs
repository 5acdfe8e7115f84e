//! Error types for the Discord notification plugin

/// Errors that can abort a notification run
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(
        "Unknown state '{0}', expected one of {expected}",
        expected = crate::render::Severity::names()
    )]
    UnknownSeverity(String),

    #[error("Unexpected response from webhook: {status}. Response body: {body}")]
    Delivery { status: u16, body: String },

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl NotifyError {
    /// Process exit status reported back to Checkmk.
    ///
    /// A rejected delivery exits with 1; everything that stops the run before
    /// or outside the webhook response exits with 2.
    pub fn exit_code(&self) -> u8 {
        match self {
            NotifyError::Delivery { .. } => 1,
            _ => 2,
        }
    }
}

/// Result type alias for notification operations
pub type Result<T> = std::result::Result<T, NotifyError>;
