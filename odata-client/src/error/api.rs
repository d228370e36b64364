//! API error types

use std::time::Duration;

use super::ODataErrorDetail;

/// Errors that can occur while talking to an OData service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// HTTP error response from the service.
    #[error("HTTP {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Error message (the decoded OData message, or the raw body).
        message: String,
        /// OData error code, if the body carried one.
        code: Option<String>,
        /// Decoded OData error body.
        inner: Option<Box<ODataErrorDetail>>,
    },

    /// Network error during the call.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Request timed out.
    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    /// Failed to parse the service response.
    #[error("Response parse error: {message}")]
    Parse {
        /// Description of the parse error.
        message: String,
        /// Raw response body, if available.
        body: Option<String>,
    },
}

impl ApiError {
    /// Creates a new HTTP error.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
            code: None,
            inner: None,
        }
    }

    /// Creates a new HTTP error carrying a decoded OData error body.
    pub fn http_with_detail(status: u16, detail: ODataErrorDetail) -> Self {
        Self::Http {
            status,
            message: detail.message.clone(),
            code: Some(detail.code.clone()),
            inner: Some(Box::new(detail)),
        }
    }

    /// Builds the error for a non-success response body.
    ///
    /// Uses the OData error document when the body is one, the raw text otherwise.
    pub fn from_response_body(status: u16, body: &str) -> Self {
        match ODataErrorDetail::from_body(body) {
            Some(detail) => Self::http_with_detail(status, detail),
            None => Self::http(status, body),
        }
    }

    /// Creates a new parse error with the raw response body.
    pub fn parse_with_body(message: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            body: Some(body.into()),
        }
    }

    /// Returns the HTTP status code if this is an HTTP error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the OData error code if available.
    pub fn error_code(&self) -> Option<&str> {
        match self {
            Self::Http { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// Returns the decoded OData error body if available.
    pub fn odata_detail(&self) -> Option<&ODataErrorDetail> {
        match self {
            Self::Http { inner, .. } => inner.as_deref(),
            _ => None,
        }
    }
}
