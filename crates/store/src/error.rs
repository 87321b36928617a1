//! Store error taxonomy.

use curio_api_client::ApiError;

/// Error type for store operations.
#[derive(Debug)]
pub enum StoreError {
    /// A mutating call was attempted without an authenticated session.
    /// Raised locally; no network request was made.
    AuthorizationRequired,
    /// The server rejected the payload (400/422). Carries the server's
    /// detail message, surfaced to the user verbatim.
    Validation(String),
    /// The requested id does not exist server-side.
    NotFound,
    /// Network failure, 5xx, or an unparseable response. Carries context
    /// for logs; users get a generic message on the error signal.
    Transport(String),
    /// `page` or `limit` below 1. Raised locally before any request.
    InvalidPage,
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::AuthorizationRequired => {
                write!(f, "Not authorized — log in and try again")
            }
            StoreError::Validation(msg) => write!(f, "{}", msg),
            StoreError::NotFound => write!(f, "Item not found"),
            StoreError::Transport(msg) => write!(f, "Transport error: {}", msg),
            StoreError::InvalidPage => write!(f, "page and limit must be at least 1"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<ApiError> for StoreError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::NotAuthenticated => StoreError::AuthorizationRequired,
            ApiError::Validation(detail) => StoreError::Validation(detail),
            ApiError::Http(404, _) => StoreError::NotFound,
            ApiError::Http(401, _) | ApiError::Http(403, _) => StoreError::AuthorizationRequired,
            ApiError::Http(code, msg) => StoreError::Transport(format!("HTTP {}: {}", code, msg)),
            ApiError::Network(msg) => StoreError::Transport(msg),
            ApiError::Parse(msg) => StoreError::Transport(msg),
        }
    }
}
