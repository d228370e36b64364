//! Option set shared by the composer and nested expands.

use super::expand::Expand;

/// The `$`-options of one query level.
///
/// Rendered in a fixed order regardless of the order the options were set:
/// `$filter`, `$expand`, `$select`, `$orderby`, `$skip`, `$top`, `$count`.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct QueryOptions {
    pub(crate) filter: Option<String>,
    pub(crate) expand: Vec<Expand>,
    pub(crate) select: Option<String>,
    pub(crate) orderby: Option<String>,
    pub(crate) skip: Option<u32>,
    pub(crate) top: Option<u32>,
    pub(crate) count: bool,
}

impl QueryOptions {
    /// Renders the options joined by `separator` (`&` at the top level, `;`
    /// inside an expand). Empty when nothing is set.
    pub(crate) fn render(&self, separator: &str) -> String {
        let mut parts = Vec::new();

        if let Some(ref filter) = self.filter {
            parts.push(format!("$filter={}", filter));
        }

        if !self.expand.is_empty() {
            let items: Vec<_> = self.expand.iter().map(Expand::to_odata).collect();
            parts.push(format!("$expand={}", items.join(",")));
        }

        if let Some(ref select) = self.select {
            parts.push(format!("$select={}", select));
        }

        if let Some(ref orderby) = self.orderby {
            parts.push(format!("$orderby={}", orderby));
        }

        if let Some(skip) = self.skip {
            parts.push(format!("$skip={}", skip));
        }

        if let Some(top) = self.top {
            parts.push(format!("$top={}", top));
        }

        if self.count {
            parts.push("$count=true".to_string());
        }

        parts.join(separator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_renders_nothing() {
        assert_eq!(QueryOptions::default().render("&"), "");
    }

    #[test]
    fn test_fixed_order() {
        let options = QueryOptions {
            top: Some(3),
            select: Some("Name".to_string()),
            skip: Some(6),
            filter: Some("Age gt 1".to_string()),
            count: true,
            ..Default::default()
        };

        assert_eq!(
            options.render("&"),
            "$filter=Age gt 1&$select=Name&$skip=6&$top=3&$count=true"
        );
        assert_eq!(
            options.render(";"),
            "$filter=Age gt 1;$select=Name;$skip=6;$top=3;$count=true"
        );
    }
}
