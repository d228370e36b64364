//! Query composer: accumulates options into a query expression.

use super::expand::Expand;
use super::options::QueryOptions;

/// Builder capability bound into a [`ServiceQuery`](crate::service::ServiceQuery).
///
/// A builder accumulates query options for one query root and renders them
/// on demand. Rendering must be deterministic: the same state always yields
/// the same string.
pub trait ComposeQuery: Send + Sync {
    /// Creates a builder for the given query root (an entity set path,
    /// singleton or bound operation path relative to the service root).
    fn with_root(query_root: &str) -> Self
    where
        Self: Sized;

    /// Sets the key predicate.
    fn key(&mut self, key_clause: String) -> &mut Self;

    /// Sets the `$filter` clause.
    fn filter(&mut self, filter_clause: String) -> &mut Self;

    /// Sets the `$select` clause.
    fn select(&mut self, select_clause: String) -> &mut Self;

    /// Appends an `$expand` item.
    fn expand(&mut self, expand: Expand) -> &mut Self;

    /// Sets the `$orderby` clause.
    fn orderby(&mut self, orderby_clause: String) -> &mut Self;

    /// Sets `$top`.
    fn top(&mut self, count: u32) -> &mut Self;

    /// Sets `$skip`.
    fn skip(&mut self, count: u32) -> &mut Self;

    /// Requests `$count=true`.
    fn count(&mut self) -> &mut Self;

    /// Renders the accumulated state.
    fn get_query_expression(&self) -> String;
}

/// The default [`ComposeQuery`] implementation.
///
/// Renders `<root>[(<key>)][?<options>]`. The key becomes a path segment;
/// the remaining options follow in the fixed order `$filter`, `$expand`,
/// `$select`, `$orderby`, `$skip`, `$top`, `$count`, joined with `&`.
/// Values are emitted as clause text; percent-encoding is left to the
/// transport.
///
/// `expand` appends; every other option replaces its previous value.
///
/// # Example
///
/// ```
/// use odata_client::query::{Expr, ExpandPath, QueryComposer};
///
/// let mut query = QueryComposer::new("People");
/// query
///     .select("FirstName,LastName")
///     .filter(Expr::new("Age").ge(18))
///     .expand(ExpandPath::new("Trips").top(5))
///     .top(10);
///
/// assert_eq!(
///     query.get_query_expression(),
///     "People?$filter=Age ge 18&$expand=Trips($top=5)&$select=FirstName,LastName&$top=10"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryComposer {
    root: String,
    key: Option<String>,
    options: QueryOptions,
}

impl QueryComposer {
    /// Creates a composer for the given query root.
    pub fn new(query_root: impl Into<String>) -> Self {
        Self {
            root: query_root.into(),
            key: None,
            options: QueryOptions::default(),
        }
    }

    /// Returns the query root.
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Sets the key predicate, rendered as `<root>(<key>)`.
    ///
    /// Pass the key in literal form: `'russellwhyte'`, `42`, or
    /// `OrderId=1,ItemId=2` for composite keys.
    pub fn key(&mut self, key_clause: impl Into<String>) -> &mut Self {
        self.key = Some(key_clause.into());
        self
    }

    /// Sets the `$filter` clause.
    pub fn filter(&mut self, filter_clause: impl Into<String>) -> &mut Self {
        self.options.filter = Some(filter_clause.into());
        self
    }

    /// Sets the `$select` clause.
    pub fn select(&mut self, select_clause: impl Into<String>) -> &mut Self {
        self.options.select = Some(select_clause.into());
        self
    }

    /// Appends an `$expand` item: a raw clause or an [`ExpandPath`](super::ExpandPath).
    pub fn expand(&mut self, expand: impl Into<Expand>) -> &mut Self {
        self.options.expand.push(expand.into());
        self
    }

    /// Sets the `$orderby` clause.
    pub fn orderby(&mut self, orderby_clause: impl Into<String>) -> &mut Self {
        self.options.orderby = Some(orderby_clause.into());
        self
    }

    /// Sets `$top`.
    pub fn top(&mut self, count: u32) -> &mut Self {
        self.options.top = Some(count);
        self
    }

    /// Sets `$skip`.
    pub fn skip(&mut self, count: u32) -> &mut Self {
        self.options.skip = Some(count);
        self
    }

    /// Requests `$count=true`.
    pub fn count(&mut self) -> &mut Self {
        self.options.count = true;
        self
    }

    /// Renders only the option part, without root, key or `?`.
    ///
    /// Empty when no option is set.
    pub fn query_options(&self) -> String {
        self.options.render("&")
    }

    /// Renders the full query expression.
    pub fn get_query_expression(&self) -> String {
        let mut expression = self.root.clone();

        if let Some(ref key) = self.key {
            expression.push('(');
            expression.push_str(key);
            expression.push(')');
        }

        let options = self.query_options();
        if !options.is_empty() {
            expression.push('?');
            expression.push_str(&options);
        }

        expression
    }
}

impl ComposeQuery for QueryComposer {
    fn with_root(query_root: &str) -> Self {
        QueryComposer::new(query_root)
    }

    fn key(&mut self, key_clause: String) -> &mut Self {
        QueryComposer::key(self, key_clause)
    }

    fn filter(&mut self, filter_clause: String) -> &mut Self {
        QueryComposer::filter(self, filter_clause)
    }

    fn select(&mut self, select_clause: String) -> &mut Self {
        QueryComposer::select(self, select_clause)
    }

    fn expand(&mut self, expand: Expand) -> &mut Self {
        QueryComposer::expand(self, expand)
    }

    fn orderby(&mut self, orderby_clause: String) -> &mut Self {
        QueryComposer::orderby(self, orderby_clause)
    }

    fn top(&mut self, count: u32) -> &mut Self {
        QueryComposer::top(self, count)
    }

    fn skip(&mut self, count: u32) -> &mut Self {
        QueryComposer::skip(self, count)
    }

    fn count(&mut self) -> &mut Self {
        QueryComposer::count(self)
    }

    fn get_query_expression(&self) -> String {
        QueryComposer::get_query_expression(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::ExpandPath;
    use crate::query::Expr;
    use crate::query::OrderBy;

    #[test]
    fn test_root_only() {
        let query = QueryComposer::new("People");
        assert_eq!(query.get_query_expression(), "People");
        assert_eq!(query.query_options(), "");
    }

    #[test]
    fn test_key_is_path_segment() {
        let mut query = QueryComposer::new("People");
        query.key("'russellwhyte'").select("UserName");
        assert_eq!(
            query.get_query_expression(),
            "People('russellwhyte')?$select=UserName"
        );
    }

    #[test]
    fn test_canonical_order_ignores_call_order() {
        let mut query = QueryComposer::new("Airports");
        query
            .select("Name")
            .filter("contains(Location/Address,'San Francisco')")
            .orderby(OrderBy::asc("Name"));

        assert_eq!(
            query.query_options(),
            "$filter=contains(Location/Address,'San Francisco')&$select=Name&$orderby=Name asc"
        );
    }

    #[test]
    fn test_all_options() {
        let mut query = QueryComposer::new("People");
        query
            .top(2)
            .skip(4)
            .orderby("LastName")
            .select("FirstName")
            .expand("Friends")
            .filter(Expr::new("Gender").eq("Trippin.PersonGender'Female'"))
            .count();

        assert_eq!(
            query.get_query_expression(),
            "People?$filter=Gender eq Trippin.PersonGender'Female'&$expand=Friends\
             &$select=FirstName&$orderby=LastName&$skip=4&$top=2&$count=true"
        );
    }

    #[test]
    fn test_expand_appends_in_call_order() {
        let mut query = QueryComposer::new("People");
        query
            .expand("Friends")
            .expand(ExpandPath::new("Trips").top(5))
            .expand("Photo");

        assert_eq!(
            query.query_options(),
            "$expand=Friends,Trips($top=5),Photo"
        );
    }

    #[test]
    fn test_later_calls_replace() {
        let mut query = QueryComposer::new("People");
        query.top(5).top(10).filter("a eq 1").filter("b eq 2");
        assert_eq!(query.query_options(), "$filter=b eq 2&$top=10");
    }

    #[test]
    fn test_rendering_is_idempotent() {
        let mut query = QueryComposer::new("People");
        query
            .filter(Expr::new("Age").gt(30))
            .expand(ExpandPath::new("Trips").filter("Budget gt 1000"))
            .skip(1);

        let first = query.get_query_expression();
        let second = query.get_query_expression();
        assert_eq!(first, second);
    }

    #[test]
    fn test_through_trait() {
        fn compose<B: ComposeQuery>() -> String {
            let mut builder = B::with_root("Airlines");
            builder.top(1).filter("Name ne null".to_string());
            builder.get_query_expression()
        }

        assert_eq!(
            compose::<QueryComposer>(),
            "Airlines?$filter=Name ne null&$top=1"
        );
    }
}
