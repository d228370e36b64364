//! Default HTTP executor

use std::marker::PhantomData;

use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Map;
use serde_json::Value;
use url::Url;

use crate::error::ApiError;
use crate::error::Error;

use super::context::split_query;
use super::OperationKind;
use super::OperationParameter;
use super::Page;
use super::QueryExecutor;
use super::ServiceContext;

/// Executes queries over HTTP and decodes JSON results into [`Page<T>`].
///
/// Usually created through [`ServiceContext::query`].
pub struct HttpExecutor<T> {
    context: ServiceContext,
    _marker: PhantomData<fn() -> T>,
}

impl<T> HttpExecutor<T> {
    /// Creates an executor for the given service.
    pub fn new(context: ServiceContext) -> Self {
        Self {
            context,
            _marker: PhantomData,
        }
    }

    /// Returns the service this executor talks to.
    pub fn context(&self) -> &ServiceContext {
        &self.context
    }
}

impl<T> Clone for HttpExecutor<T> {
    fn clone(&self) -> Self {
        Self::new(self.context.clone())
    }
}

impl<T: DeserializeOwned> HttpExecutor<T> {
    async fn fetch(&self, method: Method, url: Url, body: Option<&Value>) -> Result<Page<T>, Error> {
        let response = self.context.send(method, url, body).await?;
        let bytes = response.bytes().await.map_err(ApiError::from)?;
        Page::from_json(&bytes)
    }
}

#[async_trait]
impl<T> QueryExecutor for HttpExecutor<T>
where
    T: DeserializeOwned + Send + 'static,
{
    type Output = Page<T>;

    fn bind(context: ServiceContext) -> Self {
        Self::new(context)
    }

    async fn execute_query(&self, expression: &str) -> Result<Page<T>, Error> {
        let url = self.context.resolve_expression(expression)?;
        self.fetch(Method::GET, url, None).await
    }

    async fn execute_paged_query(&self, next_link: &str) -> Result<Page<T>, Error> {
        let url = self.context.resolve_link(next_link)?;
        log::trace!("following next link {}", url);
        self.fetch(Method::GET, url, None).await
    }

    async fn execute_operation_query(
        &self,
        expression: &str,
        parameters: &[OperationParameter],
        kind: OperationKind,
    ) -> Result<Page<T>, Error> {
        match kind {
            OperationKind::Function => {
                let url = self
                    .context
                    .resolve_expression(&function_call(expression, parameters))?;
                self.fetch(Method::GET, url, None).await
            }
            OperationKind::Action => {
                let url = self.context.resolve_expression(expression)?;
                let body = action_body(parameters);
                self.fetch(Method::POST, url, Some(&body)).await
            }
        }
    }
}

/// Inserts the parameter list after the operation path, ahead of any query
/// options: `Fn?$top=1` becomes `Fn(a=1,b='x')?$top=1`.
fn function_call(expression: &str, parameters: &[OperationParameter]) -> String {
    let (path, query) = split_query(expression);

    let arguments = parameters
        .iter()
        .map(|p| format!("{}={}", p.name, p.to_url_literal()))
        .collect::<Vec<_>>()
        .join(",");

    let mut call = format!("{}({})", path, arguments);
    if let Some(query) = query {
        call.push('?');
        call.push_str(query);
    }
    call
}

fn action_body(parameters: &[OperationParameter]) -> Value {
    let object: Map<String, Value> = parameters
        .iter()
        .map(|p| (p.name.clone(), p.value.clone()))
        .collect();
    Value::Object(object)
}
