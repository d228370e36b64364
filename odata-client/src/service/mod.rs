//! Query execution against an OData service.
//!
//! A [`ServiceContext`] describes one service. A [`ServiceQuery`] pairs a
//! query composer with a [`QueryExecutor`] for a single query root; the
//! default executor, [`HttpExecutor`], talks HTTP and decodes JSON into
//! [`Page`]s.

mod context;
mod executor;
mod http;
mod page;
mod query;

pub use context::Missing;
pub use context::ServiceContext;
pub use context::ServiceContextBuilder;
pub use context::Set;
pub use executor::OperationKind;
pub use executor::OperationParameter;
pub use executor::QueryExecutor;
pub use http::HttpExecutor;
pub use page::Page;
pub use page::Paged;
pub use query::ServiceQuery;
