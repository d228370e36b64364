//! Error types

mod api;
mod auth;
mod odata;

pub use api::*;
pub use auth::*;
pub use odata::*;

/// Top-level error returned by fallible client operations.
///
/// Catalog lookups and query rendering never fail; everything that can fail
/// happens in the executor and surfaces through this type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The service call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The token provider could not supply a token.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// A query expression or next link could not be resolved to a URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl Error {
    /// Returns the HTTP status code if the service answered with an error status.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api(api) => api.status_code(),
            _ => None,
        }
    }
}
