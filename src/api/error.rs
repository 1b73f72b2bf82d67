//! Decoding of backend error responses.

use reqwest::StatusCode;
use serde::Deserialize;

use crate::error::FolioError;

/// Error body returned by the backend on non-2xx responses
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorEnvelope {
    /// The most specific message the body carries
    pub fn into_message(self) -> Option<String> {
        self.message
            .or(self.error)
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
    }
}

/// Build an [`FolioError::Api`] from a failed response's status and body.
/// Bodies that are not an error envelope yield no message.
pub fn api_error(status: StatusCode, body: &str) -> FolioError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(ErrorEnvelope::into_message);

    FolioError::Api {
        status: status.as_u16(),
        message,
    }
}
