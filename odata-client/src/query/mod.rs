//! Query composition.
//!
//! Everything in this module is pure text composition: nothing is validated
//! against the service metadata and nothing here can fail.
//!
//! - [`Expr`] - filter, ordering and parameter-list expressions
//! - [`Literal`] - typed values in URI literal form
//! - [`OrderBy`] - `$orderby` lists
//! - [`ExpandPath`] - nested `$expand` items
//! - [`QueryComposer`] - the default [`ComposeQuery`] builder
//!
//! # Example
//!
//! ```
//! use odata_client::query::{Expr, ExpandPath, OrderBy, QueryComposer};
//!
//! let mut query = QueryComposer::new("People");
//! query
//!     .filter(Expr::new("FirstName").startswith("R").and(Expr::new("Age").lt(40)))
//!     .orderby(OrderBy::asc("LastName"))
//!     .expand(ExpandPath::new("Trips").select("Name").top(3));
//!
//! assert_eq!(
//!     query.get_query_expression(),
//!     "People?$filter=startswith(FirstName,'R') and Age lt 40\
//!      &$expand=Trips($select=Name;$top=3)&$orderby=LastName asc"
//! );
//! ```

mod composer;
mod expand;
mod expr;
mod literal;
mod options;
mod order;

pub use composer::ComposeQuery;
pub use composer::QueryComposer;
pub use expand::Expand;
pub use expand::ExpandPath;
pub use expr::Dialect;
pub use expr::Expr;
pub use literal::escape_string;
pub use literal::Literal;
pub use order::Direction;
pub use order::OrderBy;
