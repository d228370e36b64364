//! Textual filter and list expressions.

use std::fmt;
use std::fmt::Display;
use std::ops::Not;

use super::literal::escape_string;

/// How single-argument string functions and `substring` are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Dialect {
    /// Protocol-conformant rendering: `tolower(Name)`, `substring(Name,1,2)`.
    #[default]
    Standard,
    /// Byte-for-byte rendering of older clients: `tolower(Name')`,
    /// `substring(Name,'1,'2')`, string arguments not escaped.
    ///
    /// Only for services that were built against that output.
    Legacy,
}

/// A filter, ordering or parameter-list expression.
///
/// Every combinator consumes the expression and returns the combined one.
/// Composition is plain left-to-right text concatenation: nothing is
/// parenthesized implicitly, so `a.and(b).or(c)` renders `a and b or c`.
/// Use [`Expr::group`] where precedence matters.
///
/// No combinator validates the result against the protocol grammar.
///
/// # Example
///
/// ```
/// use odata_client::query::{Expr, Literal};
///
/// let filter = Expr::new("Age")
///     .ge(18)
///     .and(Expr::new("LastName").startswith("Wh"));
/// assert_eq!(filter.as_str(), "Age ge 18 and startswith(LastName,'Wh')");
///
/// let name = Expr::new("FirstName").eq(Literal::from("Russell"));
/// assert_eq!(name.as_str(), "FirstName eq 'Russell'");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Expr {
    text: String,
    dialect: Dialect,
}

impl Expr {
    /// Starts an expression from a property path or any raw text.
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            text: subject.into(),
            dialect: Dialect::Standard,
        }
    }

    /// Starts an expression that renders functions in the [`Dialect::Legacy`] form.
    pub fn legacy(subject: impl Into<String>) -> Self {
        Self {
            text: subject.into(),
            dialect: Dialect::Legacy,
        }
    }

    /// Returns the dialect of this expression.
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Returns the expression text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Consumes the expression and returns its text.
    pub fn into_string(self) -> String {
        self.text
    }

    fn map(self, f: impl FnOnce(&str) -> String) -> Self {
        Self {
            text: f(&self.text),
            dialect: self.dialect,
        }
    }

    fn argument(&self, value: &str) -> String {
        match self.dialect {
            Dialect::Standard => escape_string(value),
            Dialect::Legacy => format!("'{}'", value),
        }
    }

    // Logical and list composition

    /// `<self> and <other>`
    pub fn and(self, other: impl Into<Expr>) -> Self {
        let other = other.into();
        self.map(|lhs| format!("{} and {}", lhs, other.text))
    }

    /// `<self> or <other>`
    pub fn or(self, other: impl Into<Expr>) -> Self {
        let other = other.into();
        self.map(|lhs| format!("{} or {}", lhs, other.text))
    }

    /// `<self>,<other>`, for ordering and parameter lists.
    pub fn join(self, other: impl Into<Expr>) -> Self {
        let other = other.into();
        self.map(|lhs| format!("{},{}", lhs, other.text))
    }

    /// `(<self>)`
    pub fn group(self) -> Self {
        self.map(|inner| format!("({})", inner))
    }

    // Comparisons

    fn compare(self, op: &str, value: impl Display) -> Self {
        self.map(|lhs| format!("{} {} {}", lhs, op, value))
    }

    /// `<self> eq <value>`
    pub fn eq(self, value: impl Display) -> Self {
        self.compare("eq", value)
    }

    /// `<self> ne <value>`
    pub fn ne(self, value: impl Display) -> Self {
        self.compare("ne", value)
    }

    /// `<self> ge <value>`
    pub fn ge(self, value: impl Display) -> Self {
        self.compare("ge", value)
    }

    /// `<self> gt <value>`
    pub fn gt(self, value: impl Display) -> Self {
        self.compare("gt", value)
    }

    /// `<self> le <value>`
    pub fn le(self, value: impl Display) -> Self {
        self.compare("le", value)
    }

    /// `<self> lt <value>`
    pub fn lt(self, value: impl Display) -> Self {
        self.compare("lt", value)
    }

    // String functions

    fn call_with(self, function: &str, value: &str) -> Self {
        let argument = self.argument(value);
        self.map(|lhs| format!("{}({},{})", function, lhs, argument))
    }

    fn call(self, function: &str) -> Self {
        let close = match self.dialect {
            Dialect::Standard => ")",
            Dialect::Legacy => "')",
        };
        self.map(|lhs| format!("{}({}{}", function, lhs, close))
    }

    /// `contains(<self>,'<value>')`
    pub fn contains(self, value: &str) -> Self {
        self.call_with("contains", value)
    }

    /// `concat(<self>,'<value>')`
    pub fn concat(self, value: &str) -> Self {
        self.call_with("concat", value)
    }

    /// `endswith(<self>,'<value>')`
    pub fn endswith(self, value: &str) -> Self {
        self.call_with("endswith", value)
    }

    /// `startswith(<self>,'<value>')`
    pub fn startswith(self, value: &str) -> Self {
        self.call_with("startswith", value)
    }

    /// `tolower(<self>)`
    pub fn tolower(self) -> Self {
        self.call("tolower")
    }

    /// `toupper(<self>)`
    pub fn toupper(self) -> Self {
        self.call("toupper")
    }

    /// `trim(<self>)`
    pub fn trim(self) -> Self {
        self.call("trim")
    }

    /// `substring(<self>,<index>)`
    pub fn substring(self, index: i32) -> Self {
        match self.dialect {
            Dialect::Standard => self.map(|lhs| format!("substring({},{})", lhs, index)),
            Dialect::Legacy => self.map(|lhs| format!("substring({},'{}')", lhs, index)),
        }
    }

    /// `substring(<self>,<index>,<length>)`
    pub fn substring_len(self, index: i32, length: i32) -> Self {
        match self.dialect {
            Dialect::Standard => {
                self.map(|lhs| format!("substring({},{},{})", lhs, index, length))
            }
            Dialect::Legacy => {
                self.map(|lhs| format!("substring({},'{},'{}')", lhs, index, length))
            }
        }
    }
}

/// `not <self>`
impl Not for Expr {
    type Output = Expr;

    fn not(self) -> Expr {
        self.map(|inner| format!("not {}", inner))
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<&str> for Expr {
    fn from(text: &str) -> Self {
        Expr::new(text)
    }
}

impl From<String> for Expr {
    fn from(text: String) -> Self {
        Expr::new(text)
    }
}

impl From<Expr> for String {
    fn from(expr: Expr) -> Self {
        expr.text
    }
}
