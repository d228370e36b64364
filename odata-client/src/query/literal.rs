//! OData literal rendering.

use std::fmt;

use chrono::DateTime;
use chrono::SecondsFormat;
use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

/// A typed value rendered in OData URI literal form.
///
/// Used as the right-hand side of comparisons built with [`Expr`](super::Expr),
/// where any `Display` value is accepted; `Literal` takes care of quoting.
///
/// # Example
///
/// ```
/// use odata_client::query::{Expr, Literal};
///
/// let filter = Expr::new("LastName").eq(Literal::from("O'Brien"));
/// assert_eq!(filter.as_str(), "LastName eq 'O''Brien'");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// `null`
    Null,
    /// `true` / `false`
    Bool(bool),
    /// Integral number.
    Int(i64),
    /// Floating point number; rendered with a decimal point or exponent, or
    /// as `INF`, `-INF` or `NaN`.
    Float(f64),
    /// Arbitrary precision decimal.
    Decimal(Decimal),
    /// Single-quoted string, embedded quotes doubled.
    String(String),
    /// Unquoted GUID.
    Guid(Uuid),
    /// RFC 3339 timestamp in UTC.
    DateTimeOffset(DateTime<Utc>),
    /// Enum member, rendered as `Namespace.Type'Member'`.
    Enum {
        /// Qualified enum type name.
        type_name: String,
        /// Member name.
        member: String,
    },
}

impl Literal {
    /// Creates an enum member literal.
    pub fn enum_member(type_name: impl Into<String>, member: impl Into<String>) -> Self {
        Literal::Enum {
            type_name: type_name.into(),
            member: member.into(),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Null => f.write_str("null"),
            Literal::Bool(b) => f.write_str(if *b { "true" } else { "false" }),
            Literal::Int(n) => write!(f, "{}", n),
            Literal::Float(n) if n.is_nan() => f.write_str("NaN"),
            Literal::Float(n) if n.is_infinite() => {
                f.write_str(if n.is_sign_positive() { "INF" } else { "-INF" })
            }
            Literal::Float(n) => {
                let s = n.to_string();
                if s.contains('.') || s.contains('e') || s.contains('E') {
                    f.write_str(&s)
                } else {
                    write!(f, "{}.0", s)
                }
            }
            Literal::Decimal(d) => write!(f, "{}", d),
            Literal::String(s) => f.write_str(&escape_string(s)),
            Literal::Guid(g) => write!(f, "{}", g),
            Literal::DateTimeOffset(dt) => {
                f.write_str(&dt.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            Literal::Enum { type_name, member } => {
                write!(f, "{}{}", type_name, escape_string(member))
            }
        }
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::String(value.to_string())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Literal::String(value)
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Literal::Bool(value)
    }
}

impl From<i32> for Literal {
    fn from(value: i32) -> Self {
        Literal::Int(value.into())
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Literal::Int(value)
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Literal::Float(value)
    }
}

impl From<Decimal> for Literal {
    fn from(value: Decimal) -> Self {
        Literal::Decimal(value)
    }
}

impl From<Uuid> for Literal {
    fn from(value: Uuid) -> Self {
        Literal::Guid(value)
    }
}

impl From<DateTime<Utc>> for Literal {
    fn from(value: DateTime<Utc>) -> Self {
        Literal::DateTimeOffset(value)
    }
}

impl<T: Into<Literal>> From<Option<T>> for Literal {
    fn from(value: Option<T>) -> Self {
        value.map_or(Literal::Null, Into::into)
    }
}

/// Quotes a string for use in OData queries.
///
/// OData strings are enclosed in single quotes, with internal single quotes doubled.
pub fn escape_string(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}
