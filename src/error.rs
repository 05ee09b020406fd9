use thiserror::Error;

/// Errors produced by punch.
#[derive(Error, Debug)]
pub enum PunchError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Server returned {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Could not reach the server: {0}")]
    Transport(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Not authorized. Set a token with 'punch config set-token' or PUNCH_TOKEN")]
    Unauthorized,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Terminal error: {0}")]
    Terminal(String),
}

impl PunchError {
    /// Build an error from a non-success HTTP status and the response body.
    ///
    /// The backend reports failures as `{"error": "..."}`; anything else is
    /// passed through verbatim.
    #[must_use]
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
            .unwrap_or_else(|| body.trim().to_string());

        match status {
            401 | 403 => Self::Unauthorized,
            404 => Self::NotFound(message),
            _ => Self::Http { status, message },
        }
    }

    /// Whether the error came from the network layer rather than the server.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Timeout(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_extracts_error_field() {
        let err = PunchError::from_status(500, r#"{"error":"Error creating time entry"}"#);
        match err {
            PunchError::Http { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "Error creating time entry");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_from_status_plain_body() {
        let err = PunchError::from_status(502, "bad gateway\n");
        assert_eq!(err.to_string(), "Server returned 502: bad gateway");
    }

    #[test]
    fn test_from_status_auth_and_not_found() {
        assert!(matches!(PunchError::from_status(401, ""), PunchError::Unauthorized));
        assert!(matches!(
            PunchError::from_status(404, r#"{"error":"Project not found"}"#),
            PunchError::NotFound(m) if m == "Project not found"
        ));
    }

    #[test]
    fn test_is_transport() {
        assert!(PunchError::Timeout(5).is_transport());
        assert!(PunchError::Transport("refused".to_string()).is_transport());
        assert!(!PunchError::Unauthorized.is_transport());
    }
}
