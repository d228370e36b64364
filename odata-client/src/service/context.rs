//! Shared service handle and its builder

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use reqwest::Method;
use reqwest::header::ACCEPT;
use url::Url;

use crate::auth::TokenProvider;
use crate::edm::Model;
use crate::error::ApiError;
use crate::error::Error;

use super::HttpExecutor;
use super::ServiceQuery;

/// Handle to one OData service.
///
/// Holds the service root, protocol version, optional metadata catalog and
/// the HTTP transport. Cheap to clone (uses `Arc` internally) and safe to
/// share across tasks.
///
/// # Example
///
/// ```
/// use odata_client::service::ServiceContext;
///
/// let context = ServiceContext::builder()
///     .url("https://services.odata.org/V4/TripPinServiceRW")
///     .max_page_size(50)
///     .build()
///     .unwrap();
///
/// assert_eq!(context.base_url(), "https://services.odata.org/V4/TripPinServiceRW/");
/// assert_eq!(context.odata_version(), "4.0");
/// ```
#[derive(Clone)]
pub struct ServiceContext {
    inner: Arc<ServiceContextInner>,
}

struct ServiceContextInner {
    base_url: Url,
    odata_version: String,
    model: Option<Arc<Model>>,
    token_provider: Option<Arc<dyn TokenProvider>>,
    http_client: Client,
    timeout: Option<Duration>,
    max_page_size: Option<u32>,
}

impl ServiceContext {
    /// Creates a new builder for constructing a context.
    pub fn builder() -> ServiceContextBuilder<Missing> {
        ServiceContextBuilder::new()
    }

    /// Returns the service root, always ending in `/`.
    pub fn base_url(&self) -> &str {
        self.inner.base_url.as_str()
    }

    /// Returns the OData protocol version sent with every request.
    pub fn odata_version(&self) -> &str {
        &self.inner.odata_version
    }

    /// Returns the metadata catalog, if one was attached.
    pub fn model(&self) -> Option<&Model> {
        self.inner.model.as_deref()
    }

    /// Starts a query rooted at `query_root` that decodes results into `T`.
    ///
    /// # Example
    ///
    /// ```
    /// use odata_client::service::ServiceContext;
    ///
    /// #[derive(serde::Deserialize)]
    /// struct Person {
    ///     #[serde(rename = "UserName")]
    ///     user_name: String,
    /// }
    ///
    /// let context = ServiceContext::builder()
    ///     .url("https://services.odata.org/V4/TripPinServiceRW/")
    ///     .build()
    ///     .unwrap();
    ///
    /// let mut people = context.query::<Person>("People");
    /// people.filter("FirstName eq 'Scott'").top(5);
    /// assert_eq!(people.get_query_expression(), "People?$filter=FirstName eq 'Scott'&$top=5");
    /// ```
    pub fn query<T>(&self, query_root: &str) -> ServiceQuery<HttpExecutor<T>>
    where
        T: serde::de::DeserializeOwned + Send + 'static,
    {
        ServiceQuery::new(query_root, self.clone())
    }

    /// Resolves a composed query expression against the service root.
    ///
    /// The expression is split at its first unquoted `?`. Characters that
    /// would end the path early are escaped, and each query option is
    /// form-encoded so that quoted literals such as `'A&B'` or `'C#'` reach
    /// the service intact.
    pub(crate) fn resolve_expression(&self, expression: &str) -> Result<Url, Error> {
        let (path, query) = split_query(expression.trim_start_matches('/'));
        let mut url = self.inner.base_url.join(&escape_path(path))?;

        if let Some(query) = query.filter(|q| !q.is_empty()) {
            let mut pairs = url.query_pairs_mut();
            for option in split_unquoted(query, '&') {
                if option.is_empty() {
                    continue;
                }
                match option.split_once('=') {
                    Some((name, value)) => pairs.append_pair(name, value),
                    None => pairs.append_key_only(option),
                };
            }
        }
        Ok(url)
    }

    /// Resolves a next link, which servers send as an absolute URL or a
    /// reference relative to the service root.
    pub(crate) fn resolve_link(&self, link: &str) -> Result<Url, Error> {
        Ok(self.inner.base_url.join(link)?)
    }

    /// Sends one request with the OData headers and credentials applied.
    ///
    /// Non-success statuses are turned into [`ApiError::Http`], carrying the
    /// decoded OData error body when the service sent one.
    pub(crate) async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<&serde_json::Value>,
    ) -> Result<reqwest::Response, Error> {
        let inner = &self.inner;
        let mut request = inner
            .http_client
            .request(method.clone(), url.clone())
            .header("OData-Version", inner.odata_version.as_str())
            .header("OData-MaxVersion", inner.odata_version.as_str())
            .header(ACCEPT, "application/json");

        if let Some(size) = inner.max_page_size {
            request = request.header("Prefer", format!("odata.maxpagesize={}", size));
        }

        if let Some(provider) = &inner.token_provider {
            let token = provider.get_token(self.base_url()).await?;
            request = request.bearer_auth(&token.access_token);
        }

        if let Some(timeout) = inner.timeout {
            request = request.timeout(timeout);
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        log::debug!("{} {}", method, url);

        let response = request.send().await.map_err(|e| match inner.timeout {
            Some(timeout) if e.is_timeout() => ApiError::Timeout(timeout),
            _ => ApiError::Network(e),
        })?;

        let status = response.status();
        log::debug!("{} {} -> {}", method, url, status.as_u16());

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        log::warn!("{} {} failed with status {}", method, url, status.as_u16());
        Err(ApiError::from_response_body(status.as_u16(), &body).into())
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("base_url", &self.base_url())
            .field("odata_version", &self.odata_version())
            .field("has_model", &self.inner.model.is_some())
            .field("authenticated", &self.inner.token_provider.is_some())
            .finish()
    }
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for constructing a [`ServiceContext`].
///
/// Uses the typestate pattern so `build` is only available once the service
/// root `url` is set.
///
/// # Defaults
///
/// - `odata_version`: `"4.0"`
/// - no metadata catalog, no credentials, no page size preference
/// - no request timeout; a default `reqwest` client
pub struct ServiceContextBuilder<U> {
    url: U,
    odata_version: String,
    model: Option<Arc<Model>>,
    token_provider: Option<Arc<dyn TokenProvider>>,
    max_page_size: Option<u32>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    http_client: Option<Client>,
}

impl ServiceContextBuilder<Missing> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            url: Missing,
            odata_version: "4.0".to_string(),
            model: None,
            token_provider: None,
            max_page_size: None,
            timeout: None,
            connect_timeout: None,
            http_client: None,
        }
    }

    /// Sets the service root URL.
    ///
    /// A trailing `/` is added when missing so query expressions resolve
    /// beneath the root rather than replacing its last segment.
    pub fn url(self, url: impl Into<String>) -> ServiceContextBuilder<Set<String>> {
        ServiceContextBuilder {
            url: Set(url.into()),
            odata_version: self.odata_version,
            model: self.model,
            token_provider: self.token_provider,
            max_page_size: self.max_page_size,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
        }
    }
}

impl Default for ServiceContextBuilder<Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U> ServiceContextBuilder<U> {
    /// Sets the protocol version sent as `OData-Version` and `OData-MaxVersion`.
    pub fn odata_version(mut self, version: impl Into<String>) -> Self {
        self.odata_version = version.into();
        self
    }

    /// Attaches a metadata catalog.
    pub fn model(mut self, model: impl Into<Arc<Model>>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the token provider used for bearer authentication.
    pub fn token_provider<T: TokenProvider + 'static>(mut self, provider: T) -> Self {
        self.token_provider = Some(Arc::new(provider));
        self
    }

    /// Asks the service to cap pages at `size` entities.
    pub fn max_page_size(mut self, size: u32) -> Self {
        self.max_page_size = Some(size);
        self
    }

    /// Sets the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout.
    ///
    /// Applied when building the HTTP client; ignored with a custom client.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets a custom HTTP client.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }
}

impl ServiceContextBuilder<Set<String>> {
    /// Builds the [`ServiceContext`].
    ///
    /// Fails if the URL does not parse or the HTTP client cannot be built.
    pub fn build(self) -> Result<ServiceContext, Error> {
        let mut raw = self.url.0;
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let base_url = Url::parse(&raw)?;

        let http_client = match self.http_client {
            Some(client) => client,
            None => {
                let mut builder = Client::builder();
                if let Some(timeout) = self.connect_timeout {
                    builder = builder.connect_timeout(timeout);
                }
                builder.build().map_err(ApiError::from)?
            }
        };

        Ok(ServiceContext {
            inner: Arc::new(ServiceContextInner {
                base_url,
                odata_version: self.odata_version,
                model: self.model,
                token_provider: self.token_provider,
                http_client,
                timeout: self.timeout,
                max_page_size: self.max_page_size,
            }),
        })
    }
}

/// Splits an expression into its path and query at the first `?` outside a
/// quoted literal.
pub(crate) fn split_query(expression: &str) -> (&str, Option<&str>) {
    match find_unquoted(expression, '?') {
        Some(i) => (&expression[..i], Some(&expression[i + 1..])),
        None => (expression, None),
    }
}

/// Byte offset of the first `needle` outside single quotes. A doubled `''`
/// toggles twice and so stays inside the literal.
fn find_unquoted(text: &str, needle: char) -> Option<usize> {
    let mut quoted = false;
    for (i, c) in text.char_indices() {
        match c {
            '\'' => quoted = !quoted,
            c if c == needle && !quoted => return Some(i),
            _ => {}
        }
    }
    None
}

fn split_unquoted(text: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut rest = text;
    while let Some(i) = find_unquoted(rest, separator) {
        parts.push(&rest[..i]);
        rest = &rest[i + separator.len_utf8()..];
    }
    parts.push(rest);
    parts
}

fn escape_path(path: &str) -> String {
    path.replace('%', "%25")
        .replace('#', "%23")
        .replace('?', "%3F")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edm::EntityType;

    fn context(url: &str) -> ServiceContext {
        ServiceContext::builder().url(url).build().unwrap()
    }

    #[test]
    fn test_trailing_slash_added() {
        assert_eq!(
            context("https://example.com/odata").base_url(),
            "https://example.com/odata/"
        );
        assert_eq!(
            context("https://example.com/odata/").base_url(),
            "https://example.com/odata/"
        );
    }

    #[test]
    fn test_invalid_url() {
        let result = ServiceContext::builder().url("not a url").build();
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn test_resolve_expression_stays_under_root() {
        let ctx = context("https://example.com/svc");
        let url = ctx.resolve_expression("People('russellwhyte')").unwrap();
        assert_eq!(url.as_str(), "https://example.com/svc/People('russellwhyte')");

        let url = ctx.resolve_expression("/People").unwrap();
        assert_eq!(url.as_str(), "https://example.com/svc/People");
    }

    #[test]
    fn test_resolve_expression_encodes_query() {
        let ctx = context("https://example.com/svc/");
        let url = ctx.resolve_expression("People?$filter=Age ge 18&$top=2").unwrap();
        assert_eq!(url.path(), "/svc/People");
        assert_eq!(
            decoded(&url),
            vec![
                ("$filter".to_string(), "Age ge 18".to_string()),
                ("$top".to_string(), "2".to_string()),
            ]
        );
    }

    fn decoded(url: &Url) -> Vec<(String, String)> {
        url.query_pairs().into_owned().collect()
    }

    #[test]
    fn test_resolve_expression_keeps_reserved_characters_in_literals() {
        let ctx = context("https://example.com/svc/");

        for filter in [
            "contains(Name,'C#')",
            "contains(Name,'A&B')",
            "Name eq 'a+b'",
            "Name eq 'why?'",
            "Name eq 'O''Neil & Sons'",
            "Discount eq '100%'",
        ] {
            let url = ctx
                .resolve_expression(&format!("Products?$filter={}&$top=1", filter))
                .unwrap();
            assert_eq!(url.path(), "/svc/Products");
            assert_eq!(url.fragment(), None);
            assert_eq!(
                decoded(&url),
                vec![
                    ("$filter".to_string(), filter.to_string()),
                    ("$top".to_string(), "1".to_string()),
                ]
            );
        }
    }

    #[test]
    fn test_resolve_expression_escapes_key_literals() {
        let ctx = context("https://example.com/svc/");

        let url = ctx.resolve_expression("Products('C#')?$select=Name").unwrap();
        assert_eq!(url.path(), "/svc/Products('C%23')");
        assert_eq!(url.fragment(), None);
        assert_eq!(decoded(&url), vec![("$select".to_string(), "Name".to_string())]);

        let url = ctx.resolve_expression("Products('why?')").unwrap();
        assert_eq!(url.path(), "/svc/Products('why%3F')");
        assert_eq!(url.query(), None);
    }

    #[test]
    fn test_split_query_ignores_quoted_marks() {
        assert_eq!(split_query("People"), ("People", None));
        assert_eq!(split_query("People?$top=1"), ("People", Some("$top=1")));
        assert_eq!(
            split_query("Get(q='a?b')?$top=1"),
            ("Get(q='a?b')", Some("$top=1"))
        );
        assert_eq!(
            split_unquoted("$filter=N eq 'it''s & more'&$count=true", '&'),
            vec!["$filter=N eq 'it''s & more'", "$count=true"]
        );
    }

    #[test]
    fn test_resolve_link() {
        let ctx = context("https://example.com/svc/");
        let url = ctx
            .resolve_link("https://other.example.com/svc/People?$skiptoken=5")
            .unwrap();
        assert_eq!(url.host_str(), Some("other.example.com"));

        let url = ctx.resolve_link("People?$skiptoken=5").unwrap();
        assert_eq!(url.as_str(), "https://example.com/svc/People?$skiptoken=5");
    }

    #[test]
    fn test_builder_options() {
        let mut model = Model::new("4.01");
        model.add_schema("NS", "").add_entity_type(EntityType::new("Person"));

        let ctx = ServiceContext::builder()
            .odata_version("4.01")
            .model(model)
            .timeout(Duration::from_secs(5))
            .url("https://example.com")
            .build()
            .unwrap();

        assert_eq!(ctx.odata_version(), "4.01");
        assert!(ctx.model().and_then(|m| m.find_entity_type("Person")).is_some());
    }

    #[test]
    fn test_clone_shares_inner() {
        let ctx = context("https://example.com");
        let clone = ctx.clone();
        assert!(Arc::ptr_eq(&ctx.inner, &clone.inner));
    }
}
