//! OData v4 client library
//!
//! Composes OData query expressions, resolves names against a service's
//! metadata catalog and executes queries through a pluggable executor.
//!
//! - [`query`]: filter expressions, literals, ordering and the query composer
//! - [`edm`]: the metadata catalog
//! - [`service`]: service handle, execution pipeline and HTTP executor

pub mod auth;
pub mod edm;
pub mod error;
pub mod query;
pub mod service;

pub use error::Error;
pub use service::ServiceContext;
pub use service::ServiceQuery;
