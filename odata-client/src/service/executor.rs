//! Executor capability

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Error;
use crate::query::escape_string;

pub use crate::edm::OperationKind;

use super::ServiceContext;

/// Runs composed query expressions against a service.
///
/// The pipeline hands an executor the expression its composer rendered; the
/// executor owns transport and decoding. [`HttpExecutor`] is the default
/// implementation. Tests and alternative transports implement this trait
/// directly.
///
/// [`HttpExecutor`]: super::HttpExecutor
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Decoded result. The default value is returned by a pipeline with no
    /// executor or no composer bound.
    type Output: Default + Send;

    /// Creates an executor bound to a service.
    fn bind(context: ServiceContext) -> Self
    where
        Self: Sized;

    /// Runs a query expression such as `People?$top=5`.
    async fn execute_query(&self, expression: &str) -> Result<Self::Output, Error>;

    /// Fetches a page by the next link a previous response carried.
    async fn execute_paged_query(&self, next_link: &str) -> Result<Self::Output, Error>;

    /// Invokes the function or action named by `expression`.
    async fn execute_operation_query(
        &self,
        expression: &str,
        parameters: &[OperationParameter],
        kind: OperationKind,
    ) -> Result<Self::Output, Error>;
}

/// A named argument to a function or action call.
///
/// # Example
///
/// ```
/// use odata_client::service::OperationParameter;
///
/// let lat = OperationParameter::new("lat", 33.0);
/// let name = OperationParameter::new("name", "O'Hare");
///
/// assert_eq!(lat.to_url_literal(), "33.0");
/// assert_eq!(name.to_url_literal(), "'O''Hare'");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct OperationParameter {
    /// Parameter name as declared by the operation.
    pub name: String,
    /// Argument value.
    pub value: Value,
}

impl OperationParameter {
    /// Creates a parameter from anything convertible to JSON.
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Renders the value as an inline URL literal for function calls.
    ///
    /// Strings are single-quoted with embedded quotes doubled; arrays and
    /// objects are rendered as JSON.
    pub fn to_url_literal(&self) -> String {
        match &self.value {
            Value::String(s) => escape_string(s),
            other => other.to_string(),
        }
    }
}
