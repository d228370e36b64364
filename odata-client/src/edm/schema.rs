//! Namespaced schema

use serde::Deserialize;
use serde::Serialize;

use super::ComplexType;
use super::EntityContainer;
use super::EntityType;
use super::EnumType;
use super::OperationType;

/// A namespace of type and container declarations.
///
/// Names passed to the `find_*` methods may be unqualified (`Person`) or
/// qualified with this schema's namespace or alias (`Trippin.Person`). A name
/// qualified with any other namespace is not found here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    namespace: String,
    #[serde(default)]
    alias: Option<String>,
    #[serde(default)]
    entity_types: Vec<EntityType>,
    #[serde(default)]
    complex_types: Vec<ComplexType>,
    #[serde(default)]
    enum_types: Vec<EnumType>,
    #[serde(default)]
    operation_types: Vec<OperationType>,
    #[serde(default)]
    containers: Vec<EntityContainer>,
}

impl Schema {
    /// Creates an empty schema. An empty alias means no alias.
    pub fn new(namespace: impl Into<String>, alias: impl Into<String>) -> Self {
        let alias = alias.into();
        Self {
            namespace: namespace.into(),
            alias: (!alias.is_empty()).then_some(alias),
            entity_types: Vec::new(),
            complex_types: Vec::new(),
            enum_types: Vec::new(),
            operation_types: Vec::new(),
            containers: Vec::new(),
        }
    }

    /// Returns the namespace.
    pub fn name(&self) -> &str {
        &self.namespace
    }

    /// Returns the alias, if any.
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Returns the qualified form of a name declared in this schema.
    pub fn qualify(&self, name: &str) -> String {
        format!("{}.{}", self.namespace, name)
    }

    /// Strips this schema's namespace or alias from `name`.
    ///
    /// Returns `None` when `name` is qualified with a different namespace.
    fn local_name<'a>(&self, name: &'a str) -> Option<&'a str> {
        match name.rsplit_once('.') {
            None => Some(name),
            Some((qualifier, local))
                if qualifier == self.namespace || self.alias.as_deref() == Some(qualifier) =>
            {
                Some(local)
            }
            Some(_) => None,
        }
    }

    // Population

    /// Registers an entity type and returns it for further population.
    pub fn add_entity_type(&mut self, entity_type: EntityType) -> &mut EntityType {
        self.entity_types.push(entity_type);
        let last = self.entity_types.len() - 1;
        &mut self.entity_types[last]
    }

    /// Registers a complex type.
    pub fn add_complex_type(&mut self, complex_type: ComplexType) -> &mut ComplexType {
        self.complex_types.push(complex_type);
        let last = self.complex_types.len() - 1;
        &mut self.complex_types[last]
    }

    /// Registers an enum type.
    pub fn add_enum_type(&mut self, enum_type: EnumType) -> &mut EnumType {
        self.enum_types.push(enum_type);
        let last = self.enum_types.len() - 1;
        &mut self.enum_types[last]
    }

    /// Registers a function or action.
    pub fn add_operation_type(&mut self, operation: OperationType) -> &mut OperationType {
        self.operation_types.push(operation);
        let last = self.operation_types.len() - 1;
        &mut self.operation_types[last]
    }

    /// Registers an entity container and returns it for population.
    pub fn add_container(&mut self, container: EntityContainer) -> &mut EntityContainer {
        self.containers.push(container);
        let last = self.containers.len() - 1;
        &mut self.containers[last]
    }

    // Lookup

    /// Finds an entity type by qualified or unqualified name.
    pub fn find_entity_type(&self, name: &str) -> Option<&EntityType> {
        let local = self.local_name(name)?;
        self.entity_types.iter().find(|t| t.name == local)
    }

    /// Finds a complex type by qualified or unqualified name.
    pub fn find_complex_type(&self, name: &str) -> Option<&ComplexType> {
        let local = self.local_name(name)?;
        self.complex_types.iter().find(|t| t.name == local)
    }

    /// Finds an enum type by qualified or unqualified name.
    pub fn find_enum_type(&self, name: &str) -> Option<&EnumType> {
        let local = self.local_name(name)?;
        self.enum_types.iter().find(|t| t.name == local)
    }

    /// Finds an operation by qualified or unqualified name.
    ///
    /// Overloads share a name; the first declared one is returned.
    pub fn find_operation_type(&self, name: &str) -> Option<&OperationType> {
        let local = self.local_name(name)?;
        self.operation_types.iter().find(|t| t.name == local)
    }

    /// Finds a container. An empty name finds the default container.
    pub fn find_container(&self, name: &str) -> Option<&EntityContainer> {
        if name.is_empty() {
            return self.containers.iter().find(|c| c.is_default);
        }
        let local = self.local_name(name)?;
        self.containers.iter().find(|c| c.name == local)
    }

    /// Returns the entity types in registration order.
    pub fn entity_types(&self) -> &[EntityType] {
        &self.entity_types
    }

    /// Returns the complex types in registration order.
    pub fn complex_types(&self) -> &[ComplexType] {
        &self.complex_types
    }

    /// Returns the enum types in registration order.
    pub fn enum_types(&self) -> &[EnumType] {
        &self.enum_types
    }

    /// Returns the operations in registration order.
    pub fn operation_types(&self) -> &[OperationType] {
        &self.operation_types
    }

    /// Returns the containers in registration order.
    pub fn containers(&self) -> &[EntityContainer] {
        &self.containers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edm::OperationKind;

    fn trippin() -> Schema {
        let mut schema = Schema::new("Microsoft.OData.SampleService.Models.TripPin", "Trippin");
        schema.add_entity_type(EntityType::new("Person").with_key("UserName"));
        schema.add_complex_type(ComplexType::new("Location"));
        schema.add_enum_type(EnumType::new("PersonGender").with_member("Male", 0));
        schema.add_operation_type(OperationType::new("GetNearestAirport", OperationKind::Function));
        schema.add_container(EntityContainer::new("DefaultContainer", true));
        schema
    }

    #[test]
    fn test_unqualified_lookup() {
        let schema = trippin();
        assert!(schema.find_entity_type("Person").is_some());
        assert!(schema.find_complex_type("Location").is_some());
        assert!(schema.find_enum_type("PersonGender").is_some());
        assert!(schema.find_operation_type("GetNearestAirport").is_some());
    }

    #[test]
    fn test_namespace_and_alias_qualified_lookup() {
        let schema = trippin();
        assert!(schema
            .find_entity_type("Microsoft.OData.SampleService.Models.TripPin.Person")
            .is_some());
        assert!(schema.find_entity_type("Trippin.Person").is_some());
        assert!(schema.find_container("Trippin.DefaultContainer").is_some());
    }

    #[test]
    fn test_foreign_qualifier_not_found() {
        let schema = trippin();
        assert!(schema.find_entity_type("Other.Person").is_none());
        assert!(schema.find_entity_type("Microsoft.OData.Person").is_none());
    }

    #[test]
    fn test_default_container() {
        let mut schema = Schema::new("NS", "");
        schema.add_container(EntityContainer::new("Side", false));
        assert!(schema.find_container("").is_none());

        schema.add_container(EntityContainer::new("Main", true));
        assert_eq!(schema.find_container("").map(|c| c.name.as_str()), Some("Main"));
        assert_eq!(schema.find_container("Side").map(|c| c.name.as_str()), Some("Side"));
    }

    #[test]
    fn test_empty_alias_is_none() {
        let schema = Schema::new("NS", "");
        assert_eq!(schema.alias(), None);
        assert_eq!(schema.qualify("Thing"), "NS.Thing");
    }

    #[test]
    fn test_population_handles() {
        let mut schema = Schema::new("NS", "N");
        let container = schema.add_container(EntityContainer::new("C", true));
        container.add_singleton("Me", "NS.Person");

        assert!(schema.find_container("N.C").unwrap().singleton("Me").is_some());
    }
}
