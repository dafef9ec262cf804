use reqwest::StatusCode;

/// Failure talking to the remote REST API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The server answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Status { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A body could not be encoded, or the response was not the expected JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid API URL '{0}'")]
    InvalidUrl(String),

    #[error("'{0}' cannot be used as a URL path segment")]
    InvalidSegment(String),
}

impl ApiError {
    pub(crate) fn from_status(status: StatusCode, body: String) -> Self {
        let message = if body.trim().is_empty() {
            format!("status {}", status.as_u16())
        } else {
            body
        };
        ApiError::Status {
            status: status.as_u16(),
            message,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(err) => err.status().map(|status| status.as_u16()),
            _ => None,
        }
    }

    /// 401 or 403 from the server.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }
}
