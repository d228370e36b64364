//! Metadata catalog (Entity Data Model).
//!
//! A [`Model`] holds the schemas of one service. It does not read metadata
//! documents itself: a metadata reader calls [`Model::add_schema`] for each
//! schema and populates the returned [`Schema`] with types and containers.
//! After population the model is only read, and may be shared freely across
//! threads (usually behind the `Arc` inside a
//! [`ServiceContext`](crate::service::ServiceContext)).
//!
//! Lookups never fail; a missing name yields `None`.

mod container;
mod model;
mod operation;
mod schema;
mod types;

pub use container::EntityContainer;
pub use container::EntitySet;
pub use container::NavigationPropertyBinding;
pub use container::OperationImport;
pub use container::Singleton;
pub use model::Model;
pub use operation::OperationKind;
pub use operation::OperationType;
pub use operation::Parameter;
pub use schema::Schema;
pub use types::ComplexType;
pub use types::EntityType;
pub use types::EnumMember;
pub use types::EnumType;
pub use types::NavigationProperty;
pub use types::Property;
