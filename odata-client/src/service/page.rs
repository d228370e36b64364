//! Page type for query results.

use serde::de::DeserializeOwned;
use serde_json::Map;
use serde_json::Value;

use crate::error::ApiError;
use crate::error::Error;

/// Result outputs that may point at a further page.
///
/// Implemented by executor outputs that support server-driven paging, so the
/// pipeline can follow next links with [`ServiceQuery::pages`].
///
/// [`ServiceQuery::pages`]: super::ServiceQuery::pages
pub trait Paged {
    /// Returns the link to the next page, if the service sent one.
    fn next_link(&self) -> Option<&str>;
}

/// A page of query results with pagination information.
///
/// Single-entity and single-value responses decode into a page holding one
/// item; an empty response decodes into an empty page.
///
/// # Example
///
/// ```ignore
/// let mut people = context.query::<Person>("People");
/// let page = people.top(10).execute_query().await?;
///
/// for person in page.items() {
///     println!("{}", person.user_name);
/// }
///
/// if let Some(link) = page.next_link() {
///     println!("More results available: {}", link);
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    items: Vec<T>,
    /// `@odata.nextLink` for fetching the next page.
    next_link: Option<String>,
    /// Total count (if requested with `$count=true`).
    total_count: Option<u64>,
}

impl<T> Page<T> {
    /// Creates a new page with items and no pagination info.
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            next_link: None,
            total_count: None,
        }
    }

    /// Sets the next link.
    pub fn with_next_link(mut self, next_link: impl Into<String>) -> Self {
        self.next_link = Some(next_link.into());
        self
    }

    /// Sets the total count.
    pub fn with_total_count(mut self, count: u64) -> Self {
        self.total_count = Some(count);
        self
    }

    /// Returns the items in this page.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consumes the page and returns the items.
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Returns the link to the next page, if available.
    pub fn next_link(&self) -> Option<&str> {
        self.next_link.as_deref()
    }

    /// Returns the total count, if it was requested.
    pub fn total_count(&self) -> Option<u64> {
        self.total_count
    }

    /// Returns `true` if this page has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of items in this page.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if there are more pages available.
    pub fn has_more(&self) -> bool {
        self.next_link.is_some()
    }
}

impl<T: DeserializeOwned> Page<T> {
    /// Decodes an OData JSON response body.
    ///
    /// - empty body: empty page
    /// - `{"value": [...]}`: collection page with next link and count
    /// - `{"value": x}` with nothing but annotations beside it: one item
    /// - any other document, or one whose context ends in `$entity`: one
    ///   item decoded from the whole document
    ///
    /// Undecodable bodies become [`ApiError::Parse`] carrying the raw body.
    pub(crate) fn from_json(body: &[u8]) -> Result<Self, Error> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        let parse_error = |e: serde_json::Error| -> Error {
            ApiError::parse_with_body(e.to_string(), String::from_utf8_lossy(body)).into()
        };

        let mut object = match serde_json::from_slice::<Value>(body).map_err(parse_error)? {
            Value::Object(object) => object,
            other => {
                let item = serde_json::from_value(other).map_err(parse_error)?;
                return Ok(Self::new(vec![item]));
            }
        };

        let next_link = object
            .get("@odata.nextLink")
            .and_then(Value::as_str)
            .map(str::to_owned);
        let total_count = object.get("@odata.count").and_then(Value::as_u64);

        let items = if wraps_value(&object) {
            match object.remove("value") {
                Some(Value::Array(values)) => values
                    .into_iter()
                    .map(serde_json::from_value)
                    .collect::<Result<Vec<T>, _>>()
                    .map_err(parse_error)?,
                Some(value) => vec![serde_json::from_value(value).map_err(parse_error)?],
                None => Vec::new(),
            }
        } else {
            vec![serde_json::from_value(Value::Object(object)).map_err(parse_error)?]
        };

        Ok(Self {
            items,
            next_link,
            total_count,
        })
    }
}

/// Whether `value` is a collection or single-value wrapper rather than a
/// property of an entity.
fn wraps_value(object: &Map<String, Value>) -> bool {
    let is_entity = object
        .get("@odata.context")
        .and_then(Value::as_str)
        .is_some_and(|context| context.ends_with("$entity"));
    if is_entity {
        return false;
    }

    match object.get("value") {
        Some(Value::Array(_)) => true,
        Some(_) => object.keys().all(|k| k == "value" || k.contains('@')),
        None => false,
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T> Paged for Page<T> {
    fn next_link(&self) -> Option<&str> {
        self.next_link.as_deref()
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Person {
        #[serde(rename = "UserName")]
        user_name: String,
    }

    #[test]
    fn test_collection_with_paging() {
        let body = br#"{
            "@odata.context": "$metadata#People",
            "@odata.count": 20,
            "@odata.nextLink": "People?$skiptoken=2",
            "value": [{"UserName": "russellwhyte"}, {"UserName": "scottketchum"}]
        }"#;

        let page = Page::<Person>::from_json(body).unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page.items()[1].user_name, "scottketchum");
        assert_eq!(page.next_link(), Some("People?$skiptoken=2"));
        assert_eq!(page.total_count(), Some(20));
        assert!(page.has_more());
    }

    #[test]
    fn test_single_entity() {
        let body = br#"{"@odata.context": "$metadata#People/$entity", "UserName": "russellwhyte"}"#;

        let page = Page::<Person>::from_json(body).unwrap();
        assert_eq!(
            page.into_items(),
            vec![Person {
                user_name: "russellwhyte".into()
            }]
        );
    }

    #[test]
    fn test_single_value() {
        let body = br#"{"@odata.context": "$metadata#Edm.Int32", "value": 42}"#;

        let page = Page::<i32>::from_json(body).unwrap();
        assert_eq!(page.items(), &[42]);
        assert!(!page.has_more());
    }

    #[test]
    fn test_empty_body() {
        let page = Page::<Person>::from_json(b"").unwrap();
        assert!(page.is_empty());
        assert_eq!(Paged::next_link(&page), None);

        assert!(Page::<Person>::from_json(b"  \n").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_body() {
        let result = Page::<Person>::from_json(b"<html>");
        assert!(matches!(
            result,
            Err(Error::Api(ApiError::Parse { body: Some(ref body), .. })) if body == "<html>"
        ));

        let result = Page::<Person>::from_json(br#"{"value": [{"Age": 3}]}"#);
        assert!(matches!(result, Err(Error::Api(ApiError::Parse { .. }))));
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Setting {
        #[serde(rename = "Name")]
        name: String,
        value: String,
    }

    #[test]
    fn test_entity_with_value_property() {
        let body = br#"{"@odata.context": "$metadata#Settings/$entity", "Name": "theme", "value": "dark"}"#;
        let page = Page::<Setting>::from_json(body).unwrap();
        assert_eq!(
            page.into_items(),
            vec![Setting {
                name: "theme".into(),
                value: "dark".into()
            }]
        );

        // Without a context the other members still mark it as an entity.
        let body = br#"{"Name": "theme", "value": "dark"}"#;
        let page = Page::<Setting>::from_json(body).unwrap();
        assert_eq!(page.items()[0].value, "dark");
    }

    #[test]
    fn test_single_value_with_annotations() {
        let body = br##"{"@odata.context": "$metadata#Edm.String", "value@odata.type": "#String", "value": "dark"}"##;
        let page = Page::<String>::from_json(body).unwrap();
        assert_eq!(page.items(), &["dark".to_string()]);
    }

    #[test]
    fn test_default_is_empty() {
        let page: Page<Person> = Page::default();
        assert!(page.is_empty());
        assert_eq!(page.total_count(), None);
    }
}
