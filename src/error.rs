use thiserror::Error;

/// AuthError
///
/// Everything that can go wrong talking to the authentication endpoints.
/// The Session Store decides what each variant means for the user; this type
/// only records what happened on the wire.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AuthError {
    /// The backend answered with a non-success status. `detail` carries the
    /// backend's own message when the body had one.
    #[error("request rejected with HTTP {status}")]
    Rejected { status: u16, detail: Option<String> },

    /// The request never produced a response (connect failure, timeout, reset).
    #[error("transport failure: {0}")]
    Transport(String),

    /// A success status with a body that does not match the expected schema.
    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl AuthError {
    /// The backend-provided message, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            AuthError::Rejected { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// True when the backend explicitly refused the credential (401/403), as
    /// opposed to the request failing for some other reason.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, AuthError::Rejected { status: 401 | 403, .. })
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            AuthError::Decode(e.to_string())
        } else {
            AuthError::Transport(e.to_string())
        }
    }
}

/// StorageError
///
/// Failures of the durable token store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("token store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("token store is corrupt: {0}")]
    Format(#[from] serde_json::Error),
}
