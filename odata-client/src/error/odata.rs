//! OData error document types

use std::collections::HashMap;

use serde_json::Value;

/// Detailed error information decoded from an OData error response.
///
/// Services answer failed requests with a document of the form
/// `{"error": {"code": ..., "message": ..., "target": ..., "innererror": ...}}`.
/// Inner errors nest through `innererror` and `internalexception`.
#[derive(Debug, Clone)]
pub struct ODataErrorDetail {
    /// The service-defined error code (may be empty).
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// The target of the error (a property or parameter name), if reported.
    pub target: Option<String>,
    /// Nested inner error, if any.
    pub inner_error: Option<Box<ODataErrorDetail>>,
    /// Members of the error object that have no dedicated field.
    pub additional_info: HashMap<String, Value>,
}

impl ODataErrorDetail {
    /// Creates a new error detail with the given code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            target: None,
            inner_error: None,
            additional_info: HashMap::new(),
        }
    }

    /// Decodes an OData error response body.
    ///
    /// Returns `None` if the body is not a JSON object with an `error` member.
    pub fn from_body(body: &str) -> Option<Self> {
        let document: Value = serde_json::from_str(body).ok()?;
        let error = document.get("error")?.as_object()?;
        Some(Self::from_object(error))
    }

    fn from_object(object: &serde_json::Map<String, Value>) -> Self {
        let text = |key: &str| {
            object
                .get(key)
                .and_then(Value::as_str)
                .map(str::to_owned)
        };

        // Inner errors carry their classification in `type` rather than `code`.
        let mut detail = Self::new(
            text("code").or_else(|| text("type")).unwrap_or_default(),
            text("message").unwrap_or_default(),
        );
        detail.target = text("target");

        let nested = object
            .get("innererror")
            .or_else(|| object.get("internalexception"))
            .and_then(Value::as_object);
        detail.inner_error = nested.map(|inner| Box::new(Self::from_object(inner)));

        for (key, value) in object {
            if !matches!(
                key.as_str(),
                "code" | "type" | "message" | "target" | "innererror" | "internalexception"
            ) {
                detail.additional_info.insert(key.clone(), value.clone());
            }
        }

        detail
    }

    /// Returns the innermost error in the chain.
    pub fn innermost(&self) -> &ODataErrorDetail {
        let mut current = self;
        while let Some(inner) = &current.inner_error {
            current = inner;
        }
        current
    }

    /// Checks if this error or any inner error has the given code.
    pub fn has_code(&self, code: &str) -> bool {
        if self.code == code {
            return true;
        }
        if let Some(inner) = &self.inner_error {
            return inner.has_code(code);
        }
        false
    }
}

impl std::fmt::Display for ODataErrorDetail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}
