//! Query execution pipeline

use futures::Stream;

use crate::error::Error;
use crate::query::ComposeQuery;
use crate::query::Expand;
use crate::query::QueryComposer;

use super::OperationKind;
use super::OperationParameter;
use super::Paged;
use super::QueryExecutor;
use super::ServiceContext;

/// Binds a query composer to an executor for one query root.
///
/// Option mutators forward to the composer; the `execute_*` methods render
/// the composer's expression and hand it to the executor.
///
/// If either the executor or the composer is absent, mutators do nothing,
/// [`get_query_expression`](Self::get_query_expression) returns `""` and the
/// `execute_*` methods resolve to `Ok(E::Output::default())` without any
/// I/O.
///
/// # Example
///
/// ```ignore
/// use odata_client::query::{Expr, ExpandPath};
///
/// let mut people = context.query::<Person>("People");
/// people
///     .filter(Expr::new("Age").ge(18))
///     .expand(ExpandPath::new("Trips").top(5))
///     .top(10);
///
/// let page = people.execute_query().await?;
/// ```
pub struct ServiceQuery<E, B = QueryComposer> {
    context: ServiceContext,
    executor: Option<E>,
    builder: Option<B>,
}

impl<E, B> ServiceQuery<E, B>
where
    E: QueryExecutor,
    B: ComposeQuery,
{
    /// Creates a pipeline for `query_root`, binding a fresh executor and
    /// composer.
    pub fn new(query_root: &str, context: ServiceContext) -> Self {
        Self {
            executor: Some(E::bind(context.clone())),
            builder: Some(B::with_root(query_root)),
            context,
        }
    }

    /// Creates a pipeline from explicit parts, either of which may be absent.
    pub fn from_parts(context: ServiceContext, executor: Option<E>, builder: Option<B>) -> Self {
        Self {
            context,
            executor,
            builder,
        }
    }

    /// Returns the service this pipeline belongs to.
    pub fn context(&self) -> &ServiceContext {
        &self.context
    }

    /// Returns the bound executor.
    pub fn executor(&self) -> Option<&E> {
        self.executor.as_ref()
    }

    /// Returns the bound composer.
    pub fn query_builder(&self) -> Option<&B> {
        self.builder.as_ref()
    }

    /// Replaces the composer, or unbinds it with `None`.
    pub fn set_query_builder(&mut self, builder: impl Into<Option<B>>) -> &mut Self {
        self.builder = builder.into();
        self
    }

    /// Renders the composer's expression, or `""` without a composer.
    pub fn get_query_expression(&self) -> String {
        self.builder
            .as_ref()
            .map(ComposeQuery::get_query_expression)
            .unwrap_or_default()
    }

    /// Runs the composed query.
    pub async fn execute_query(&self) -> Result<E::Output, Error> {
        match (&self.executor, &self.builder) {
            (Some(executor), Some(builder)) => {
                executor.execute_query(&builder.get_query_expression()).await
            }
            _ => Ok(E::Output::default()),
        }
    }

    /// Fetches the page behind a next link.
    pub async fn execute_paged_query(&self, next_link: &str) -> Result<E::Output, Error> {
        match (&self.executor, &self.builder) {
            (Some(executor), Some(_)) => executor.execute_paged_query(next_link).await,
            _ => Ok(E::Output::default()),
        }
    }

    /// Invokes the operation the composed expression names.
    ///
    /// `kind` accepts an [`OperationKind`] or a `bool` where `true` means
    /// function.
    pub async fn execute_operation_query(
        &self,
        parameters: &[OperationParameter],
        kind: impl Into<OperationKind>,
    ) -> Result<E::Output, Error> {
        let kind = kind.into();
        match (&self.executor, &self.builder) {
            (Some(executor), Some(builder)) => {
                executor
                    .execute_operation_query(&builder.get_query_expression(), parameters, kind)
                    .await
            }
            _ => Ok(E::Output::default()),
        }
    }

    /// Sets the key predicate, e.g. `'russellwhyte'` or `OrderID=1,ItemNo=2`.
    pub fn key(&mut self, key_clause: impl Into<String>) -> &mut Self {
        if let Some(builder) = self.builder.as_mut() {
            builder.key(key_clause.into());
        }
        self
    }

    /// Sets the `$filter` clause.
    pub fn filter(&mut self, filter_clause: impl Into<String>) -> &mut Self {
        if let Some(builder) = self.builder.as_mut() {
            builder.filter(filter_clause.into());
        }
        self
    }

    /// Sets the `$select` clause.
    pub fn select(&mut self, select_clause: impl Into<String>) -> &mut Self {
        if let Some(builder) = self.builder.as_mut() {
            builder.select(select_clause.into());
        }
        self
    }

    /// Appends an `$expand` item.
    pub fn expand(&mut self, expand: impl Into<Expand>) -> &mut Self {
        if let Some(builder) = self.builder.as_mut() {
            builder.expand(expand.into());
        }
        self
    }

    /// Sets the `$orderby` clause.
    pub fn orderby(&mut self, orderby_clause: impl Into<String>) -> &mut Self {
        if let Some(builder) = self.builder.as_mut() {
            builder.orderby(orderby_clause.into());
        }
        self
    }

    /// Sets `$top`.
    pub fn top(&mut self, count: u32) -> &mut Self {
        if let Some(builder) = self.builder.as_mut() {
            builder.top(count);
        }
        self
    }

    /// Sets `$skip`.
    pub fn skip(&mut self, count: u32) -> &mut Self {
        if let Some(builder) = self.builder.as_mut() {
            builder.skip(count);
        }
        self
    }

    /// Requests `$count=true`.
    pub fn count(&mut self) -> &mut Self {
        if let Some(builder) = self.builder.as_mut() {
            builder.count();
        }
        self
    }
}

impl<E, B> ServiceQuery<E, B>
where
    E: QueryExecutor,
    E::Output: Paged,
    B: ComposeQuery,
{
    /// Streams every page of the result, following next links until the
    /// service stops sending one.
    ///
    /// The stream ends after the first error.
    ///
    /// # Example
    ///
    /// ```ignore
    /// use futures::TryStreamExt;
    ///
    /// let pages = people.pages();
    /// futures::pin_mut!(pages);
    /// while let Some(page) = pages.try_next().await? {
    ///     println!("{} people", page.len());
    /// }
    /// ```
    pub fn pages(&self) -> impl Stream<Item = Result<E::Output, Error>> + '_ {
        async_stream::try_stream! {
            let mut page = self.execute_query().await?;
            loop {
                let next_link = page.next_link().map(str::to_owned);
                yield page;
                match next_link {
                    Some(link) => page = self.execute_paged_query(&link).await?,
                    None => break,
                }
            }
        }
    }
}
