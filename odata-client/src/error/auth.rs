//! Authentication error types

/// Errors a [`TokenProvider`](crate::auth::TokenProvider) can report.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Invalid username, password or client secret.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Access token expired and refresh failed.
    #[error("Token expired and refresh failed: {message}")]
    TokenExpired { message: String },

    /// Network error while acquiring a token.
    #[error("Network error during auth: {0}")]
    Network(#[from] reqwest::Error),

    /// The provider failed for another reason.
    #[error("Token provider error: {0}")]
    Provider(String),
}
