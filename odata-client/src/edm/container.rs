//! Entity container descriptors

use serde::Deserialize;
use serde::Serialize;

use super::OperationKind;

/// Binds a navigation property of a set's entities to a target set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationPropertyBinding {
    /// Navigation property path, e.g. `Flights/Airline`.
    pub path: String,
    /// Target entity set or singleton.
    pub target: String,
}

/// An entity set exposed by a container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySet {
    /// Set name; also the URL segment under the service root.
    pub name: String,
    /// Qualified name of the entity type.
    pub entity_type: String,
    /// Navigation property bindings.
    #[serde(default)]
    pub navigation_bindings: Vec<NavigationPropertyBinding>,
}

impl EntitySet {
    /// Creates an entity set.
    pub fn new(name: impl Into<String>, entity_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entity_type: entity_type.into(),
            navigation_bindings: Vec::new(),
        }
    }

    /// Adds a navigation property binding.
    pub fn with_binding(mut self, path: impl Into<String>, target: impl Into<String>) -> Self {
        self.navigation_bindings.push(NavigationPropertyBinding {
            path: path.into(),
            target: target.into(),
        });
        self
    }

    /// Returns the target set bound to a navigation property path.
    pub fn binding_target(&self, path: &str) -> Option<&str> {
        self.navigation_bindings
            .iter()
            .find(|b| b.path == path)
            .map(|b| b.target.as_str())
    }
}

/// A singleton exposed by a container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Singleton {
    /// Singleton name.
    pub name: String,
    /// Qualified name of the entity type.
    pub type_name: String,
}

/// A function or action import exposed by a container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationImport {
    /// Import name.
    pub name: String,
    /// Qualified name of the imported operation.
    pub operation: String,
    /// Function or action import.
    pub kind: OperationKind,
    /// Entity set of returned entities, if any.
    #[serde(default)]
    pub entity_set: Option<String>,
}

/// A grouping of entity sets, singletons and operation imports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityContainer {
    /// Container name.
    pub name: String,

    /// Whether this is the schema's default container.
    #[serde(default)]
    pub is_default: bool,

    /// Entity sets in declaration order.
    #[serde(default)]
    pub entity_sets: Vec<EntitySet>,

    /// Singletons in declaration order.
    #[serde(default)]
    pub singletons: Vec<Singleton>,

    /// Operation imports in declaration order.
    #[serde(default)]
    pub operation_imports: Vec<OperationImport>,
}

impl EntityContainer {
    /// Creates an empty container.
    pub fn new(name: impl Into<String>, is_default: bool) -> Self {
        Self {
            name: name.into(),
            is_default,
            entity_sets: Vec::new(),
            singletons: Vec::new(),
            operation_imports: Vec::new(),
        }
    }

    /// Adds an entity set.
    pub fn add_entity_set(&mut self, set: EntitySet) -> &mut Self {
        self.entity_sets.push(set);
        self
    }

    /// Adds a singleton.
    pub fn add_singleton(
        &mut self,
        name: impl Into<String>,
        type_name: impl Into<String>,
    ) -> &mut Self {
        self.singletons.push(Singleton {
            name: name.into(),
            type_name: type_name.into(),
        });
        self
    }

    /// Adds an operation import.
    pub fn add_operation_import(&mut self, import: OperationImport) -> &mut Self {
        self.operation_imports.push(import);
        self
    }

    /// Finds an entity set by name.
    pub fn entity_set(&self, name: &str) -> Option<&EntitySet> {
        self.entity_sets.iter().find(|s| s.name == name)
    }

    /// Finds a singleton by name.
    pub fn singleton(&self, name: &str) -> Option<&Singleton> {
        self.singletons.iter().find(|s| s.name == name)
    }

    /// Finds an operation import by name.
    pub fn operation_import(&self, name: &str) -> Option<&OperationImport> {
        self.operation_imports.iter().find(|o| o.name == name)
    }
}
