//! `$expand` items and nested expand options.

use std::fmt;

use super::options::QueryOptions;

/// One item of an `$expand` list.
///
/// Either a raw clause passed through as-is, or an [`ExpandPath`] tree that
/// renders its own options. Strings and paths both convert into `Expand`, so
/// `expand("Trips")` and `expand(ExpandPath::new("Trips").top(5))` go through
/// the same method.
#[derive(Debug, Clone, PartialEq)]
pub enum Expand {
    /// Raw expand clause, e.g. `Friends` or `Trips($top=1)`.
    Clause(String),
    /// Structured expansion of a navigation property.
    Path(ExpandPath),
}

impl Expand {
    /// Renders this item as it appears inside `$expand=`.
    pub fn to_odata(&self) -> String {
        match self {
            Expand::Clause(clause) => clause.clone(),
            Expand::Path(path) => path.to_odata(),
        }
    }
}

impl From<&str> for Expand {
    fn from(clause: &str) -> Self {
        Expand::Clause(clause.to_string())
    }
}

impl From<String> for Expand {
    fn from(clause: String) -> Self {
        Expand::Clause(clause)
    }
}

impl From<ExpandPath> for Expand {
    fn from(path: ExpandPath) -> Self {
        Expand::Path(path)
    }
}

/// Expansion of a navigation property with its own query options.
///
/// Nested options render in parentheses after the property name, joined by
/// `;`, in the same fixed order as top-level options. A path without options
/// renders as the bare property name.
///
/// # Example
///
/// ```
/// use odata_client::query::ExpandPath;
///
/// let expand = ExpandPath::new("Trips")
///     .select("Name,Budget")
///     .top(5)
///     .expand_with("PlanItems", |e| e.select("ConfirmationCode"));
/// assert_eq!(
///     expand.to_odata(),
///     "Trips($expand=PlanItems($select=ConfirmationCode);$select=Name,Budget;$top=5)"
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ExpandPath {
    navigation_property: String,
    options: QueryOptions,
}

impl ExpandPath {
    /// Creates an expansion of a navigation property.
    pub fn new(navigation_property: impl Into<String>) -> Self {
        Self {
            navigation_property: navigation_property.into(),
            options: QueryOptions::default(),
        }
    }

    /// Sets the nested `$filter`.
    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.options.filter = Some(filter.into());
        self
    }

    /// Sets the nested `$select`.
    pub fn select(mut self, select: impl Into<String>) -> Self {
        self.options.select = Some(select.into());
        self
    }

    /// Sets the nested `$orderby`.
    pub fn orderby(mut self, orderby: impl Into<String>) -> Self {
        self.options.orderby = Some(orderby.into());
        self
    }

    /// Sets the nested `$skip`.
    pub fn skip(mut self, count: u32) -> Self {
        self.options.skip = Some(count);
        self
    }

    /// Sets the nested `$top`.
    pub fn top(mut self, count: u32) -> Self {
        self.options.top = Some(count);
        self
    }

    /// Requests `$count=true` for the expanded collection.
    pub fn count(mut self) -> Self {
        self.options.count = true;
        self
    }

    /// Appends a nested expand item.
    pub fn expand(mut self, expand: impl Into<Expand>) -> Self {
        self.options.expand.push(expand.into());
        self
    }

    /// Appends a nested expansion configured by `build`.
    pub fn expand_with<F>(self, navigation_property: impl Into<String>, build: F) -> Self
    where
        F: FnOnce(ExpandPath) -> ExpandPath,
    {
        let nested = build(ExpandPath::new(navigation_property));
        self.expand(nested)
    }

    /// Returns the navigation property name.
    pub fn navigation_property(&self) -> &str {
        &self.navigation_property
    }

    /// Renders this expansion, including nested options.
    pub fn to_odata(&self) -> String {
        let options = self.options.render(";");
        if options.is_empty() {
            self.navigation_property.clone()
        } else {
            format!("{}({})", self.navigation_property, options)
        }
    }
}

impl fmt::Display for ExpandPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_odata())
    }
}
