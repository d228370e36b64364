//! The catalog of all schemas of one service

use serde::Deserialize;
use serde::Serialize;

use super::ComplexType;
use super::EntityContainer;
use super::EntitySet;
use super::EntityType;
use super::EnumType;
use super::OperationType;
use super::Schema;

/// Bounds base-type walks so malformed metadata with an inheritance cycle terminates.
const MAX_INHERITANCE_DEPTH: usize = 64;

/// Metadata catalog: the schemas of one service, in registration order.
///
/// Populated once by a metadata reader through [`Model::add_schema`], then
/// shared read-only. Every lookup searches schemas in registration order and
/// returns the first match, so a name declared in two schemas resolves to the
/// earlier one. Schema names are not required to be unique.
///
/// # Example
///
/// ```
/// use odata_client::edm::{EntityContainer, EntitySet, EntityType, Model};
///
/// let mut model = Model::new("4.0");
/// let schema = model.add_schema("Microsoft.OData.SampleService.Models.TripPin", "Trippin");
/// schema.add_entity_type(EntityType::new("Person").with_key("UserName"));
/// schema
///     .add_container(EntityContainer::new("DefaultContainer", true))
///     .add_entity_set(EntitySet::new("People", "Trippin.Person"));
///
/// assert!(model.find_entity_type("Trippin.Person").is_some());
/// assert!(model.find_container("").is_some());
/// assert!(model.find_enum_type("PersonGender").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Model {
    #[serde(default)]
    schemas: Vec<Schema>,
    #[serde(default)]
    version: String,
}

impl Model {
    /// Creates an empty catalog for the given protocol version.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            schemas: Vec::new(),
            version: version.into(),
        }
    }

    /// Creates, registers and returns a new schema.
    ///
    /// Registration order is resolution priority order.
    pub fn add_schema(&mut self, name: impl Into<String>, alias: impl Into<String>) -> &mut Schema {
        self.schemas.push(Schema::new(name, alias));
        let last = self.schemas.len() - 1;
        &mut self.schemas[last]
    }

    /// Returns the first schema with the given namespace.
    pub fn schema(&self, name: &str) -> Option<&Schema> {
        self.schemas.iter().find(|s| s.name() == name)
    }

    /// Returns all schemas in registration order.
    pub fn schemas(&self) -> &[Schema] {
        &self.schemas
    }

    /// Returns the protocol version.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Sets the protocol version.
    pub fn set_version(&mut self, version: impl Into<String>) {
        self.version = version.into();
    }

    /// Looks up an entity type by qualified or unqualified name.
    pub fn find_entity_type(&self, name: &str) -> Option<&EntityType> {
        self.schemas.iter().find_map(|s| s.find_entity_type(name))
    }

    /// Looks up a complex type by qualified or unqualified name.
    pub fn find_complex_type(&self, name: &str) -> Option<&ComplexType> {
        self.schemas.iter().find_map(|s| s.find_complex_type(name))
    }

    /// Looks up an enum type by qualified or unqualified name.
    pub fn find_enum_type(&self, name: &str) -> Option<&EnumType> {
        self.schemas.iter().find_map(|s| s.find_enum_type(name))
    }

    /// Looks up a function or action by qualified or unqualified name.
    pub fn find_operation_type(&self, name: &str) -> Option<&OperationType> {
        self.schemas.iter().find_map(|s| s.find_operation_type(name))
    }

    /// Looks up an entity container.
    ///
    /// An empty name finds the first container marked default, searching
    /// schemas in order; otherwise the name must match exactly (optionally
    /// qualified).
    pub fn find_container(&self, name: &str) -> Option<&EntityContainer> {
        self.schemas.iter().find_map(|s| s.find_container(name))
    }

    /// Looks up an entity set by name.
    ///
    /// The default container is searched first, then every container in
    /// registration order.
    pub fn find_entity_set(&self, name: &str) -> Option<&EntitySet> {
        if let Some(set) = self.find_container("").and_then(|c| c.entity_set(name)) {
            return Some(set);
        }
        self.schemas
            .iter()
            .flat_map(|s| s.containers())
            .find_map(|c| c.entity_set(name))
    }

    /// Returns the base type of a derived entity type, if it resolves.
    pub fn find_base_type(&self, entity_type: &EntityType) -> Option<&EntityType> {
        entity_type
            .base_type
            .as_deref()
            .and_then(|name| self.find_entity_type(name))
    }

    /// Returns the key property names of an entity type, following base
    /// types until one declares a key.
    ///
    /// Returns `None` if no type in the chain declares a key.
    pub fn key_properties<'a>(&'a self, entity_type: &'a EntityType) -> Option<&'a [String]> {
        let mut current = entity_type;
        for _ in 0..MAX_INHERITANCE_DEPTH {
            if !current.key.is_empty() {
                return Some(&current.key);
            }
            current = self.find_base_type(current)?;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edm::OperationKind;
    use crate::edm::Property;

    #[test]
    fn test_first_match_wins() {
        let mut model = Model::new("4.0");
        model
            .add_schema("S1", "")
            .add_entity_type(EntityType::new("Foo").with_key("First"));
        model
            .add_schema("S2", "")
            .add_entity_type(EntityType::new("Foo").with_key("Second"));

        let found = model.find_entity_type("Foo").unwrap();
        assert_eq!(found.key, vec!["First".to_string()]);

        // Qualified lookup still reaches the later schema.
        let found = model.find_entity_type("S2.Foo").unwrap();
        assert_eq!(found.key, vec!["Second".to_string()]);
    }

    #[test]
    fn test_first_match_wins_reversed() {
        let mut model = Model::default();
        model
            .add_schema("S2", "")
            .add_entity_type(EntityType::new("Foo").with_key("Second"));
        model
            .add_schema("S1", "")
            .add_entity_type(EntityType::new("Foo").with_key("First"));

        let found = model.find_entity_type("Foo").unwrap();
        assert_eq!(found.key, vec!["Second".to_string()]);
    }

    #[test]
    fn test_each_kind_resolves_across_schemas() {
        let mut model = Model::new("4.0");
        model.add_schema("A", "").add_complex_type(ComplexType::new("Address"));
        let b = model.add_schema("B", "");
        b.add_enum_type(EnumType::new("Color"));
        b.add_operation_type(OperationType::new("Reset", OperationKind::Action));

        assert!(model.find_complex_type("Address").is_some());
        assert!(model.find_enum_type("B.Color").is_some());
        assert!(model.find_operation_type("Reset").is_some());
        assert!(model.find_entity_type("Address").is_none());
    }

    #[test]
    fn test_not_found_is_none() {
        let model = Model::new("4.0");
        assert!(model.find_entity_type("Anything").is_none());
        assert!(model.find_container("").is_none());
        assert!(model.find_entity_set("People").is_none());
    }

    #[test]
    fn test_default_container_across_schemas() {
        let mut model = Model::new("4.0");
        model.add_schema("A", "").add_container(EntityContainer::new("Aux", false));
        model.add_schema("B", "").add_container(EntityContainer::new("Main", true));

        assert_eq!(model.find_container("").map(|c| c.name.as_str()), Some("Main"));
        assert_eq!(model.find_container("Aux").map(|c| c.name.as_str()), Some("Aux"));
        assert!(model.find_container("Missing").is_none());
    }

    #[test]
    fn test_no_default_container() {
        let mut model = Model::new("4.0");
        model.add_schema("A", "").add_container(EntityContainer::new("Aux", false));
        assert!(model.find_container("").is_none());
    }

    #[test]
    fn test_schema_by_name_first_positional() {
        let mut model = Model::new("4.0");
        model.add_schema("Dup", "first");
        model.add_schema("Dup", "second");

        assert_eq!(model.schema("Dup").and_then(Schema::alias), Some("first"));
        assert_eq!(model.schemas().len(), 2);
    }

    #[test]
    fn test_find_entity_set_prefers_default_container() {
        let mut model = Model::new("4.0");
        let schema = model.add_schema("NS", "");
        schema
            .add_container(EntityContainer::new("Archive", false))
            .add_entity_set(EntitySet::new("People", "NS.ArchivedPerson"));
        schema
            .add_container(EntityContainer::new("Main", true))
            .add_entity_set(EntitySet::new("People", "NS.Person"));
        schema
            .add_container(EntityContainer::new("Other", false))
            .add_entity_set(EntitySet::new("Airports", "NS.Airport"));

        let people = model.find_entity_set("People").unwrap();
        assert_eq!(people.entity_type, "NS.Person");
        assert!(model.find_entity_set("Airports").is_some());
    }

    #[test]
    fn test_inherited_key() {
        let mut model = Model::new("4.0");
        let schema = model.add_schema("Trippin", "");
        schema.add_entity_type(
            EntityType::new("PlanItem")
                .with_key("PlanItemId")
                .with_property(Property::new("PlanItemId", "Edm.Int32").required()),
        );
        schema.add_entity_type(EntityType::new("PublicTransportation").with_base_type("Trippin.PlanItem"));
        schema.add_entity_type(EntityType::new("Flight").with_base_type("Trippin.PublicTransportation"));

        let flight = model.find_entity_type("Flight").unwrap();
        assert_eq!(
            model.key_properties(flight),
            Some(&["PlanItemId".to_string()][..])
        );
        assert_eq!(
            model.find_base_type(flight).map(|t| t.name.as_str()),
            Some("PublicTransportation")
        );
    }

    #[test]
    fn test_inheritance_cycle_terminates() {
        let mut model = Model::new("4.0");
        let schema = model.add_schema("NS", "");
        schema.add_entity_type(EntityType::new("A").with_base_type("NS.B"));
        schema.add_entity_type(EntityType::new("B").with_base_type("NS.A"));

        let a = model.find_entity_type("A").unwrap();
        assert!(model.key_properties(a).is_none());
    }

    #[test]
    fn test_version() {
        let mut model = Model::new("4.0");
        model.set_version("4.01");
        assert_eq!(model.version(), "4.01");
    }

    #[test]
    fn test_shared_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Model>();
    }
}
