use thiserror::Error;

use crate::validate::FieldErrors;

#[derive(Error, Debug)]
pub enum FolioError {
    #[error("task '{0}' not found")]
    TaskNotFound(String),

    #[error("invalid status '{0}'")]
    InvalidStatus(String),

    #[error("invalid priority '{0}'")]
    InvalidPriority(String),

    #[error("validation failed: {0}")]
    Validation(FieldErrors),

    #[error("not logged in")]
    NotAuthenticated,

    #[error("session expired, log in again")]
    SessionExpired,

    #[error("API error ({status}): {}", .message.as_deref().unwrap_or("request failed"))]
    Api {
        status: u16,
        message: Option<String>,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("TUI error: {0}")]
    Tui(String),

    #[error("{0}")]
    Other(String),
}

impl FolioError {
    /// Message supplied by the backend's error envelope, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            FolioError::Api { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Whether the backend rejected the request as unauthenticated.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, FolioError::Api { status: 401, .. })
    }
}

pub type Result<T> = std::result::Result<T, FolioError>;
