//! Structured and enum type descriptors

use serde::Deserialize;
use serde::Serialize;

pub(crate) fn default_true() -> bool {
    true
}

/// A structural property of an entity or complex type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    /// Property name.
    pub name: String,

    /// Qualified type name, e.g. `Edm.String` or `Collection(Trippin.Location)`.
    pub type_name: String,

    /// Whether the property accepts null.
    #[serde(default = "default_true")]
    pub nullable: bool,

    /// Declared default value in literal form, if any.
    #[serde(default)]
    pub default_value: Option<String>,
}

impl Property {
    /// Creates a nullable property.
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            nullable: true,
            default_value: None,
        }
    }

    /// Marks the property as non-nullable.
    pub fn required(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Returns `true` if the property holds a collection.
    pub fn is_collection(&self) -> bool {
        collection_element(&self.type_name).is_some()
    }
}

/// A navigation property linking to another entity type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationProperty {
    /// Navigation property name.
    pub name: String,

    /// Target type, e.g. `Trippin.Airline` or `Collection(Trippin.Trip)`.
    pub type_name: String,

    /// Whether the link may be absent.
    #[serde(default = "default_true")]
    pub nullable: bool,

    /// Name of the partner navigation property on the target type.
    #[serde(default)]
    pub partner: Option<String>,

    /// Whether the target entities are contained in the source entity.
    #[serde(default)]
    pub contains_target: bool,
}

impl NavigationProperty {
    /// Creates a navigation property.
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            nullable: true,
            partner: None,
            contains_target: false,
        }
    }

    /// Returns `true` if the navigation targets a collection.
    pub fn is_collection(&self) -> bool {
        collection_element(&self.type_name).is_some()
    }

    /// Returns the qualified name of the target entity type.
    pub fn target_type(&self) -> &str {
        collection_element(&self.type_name).unwrap_or(&self.type_name)
    }
}

/// An entity type: a keyed structured type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityType {
    /// Unqualified type name.
    pub name: String,

    /// Qualified name of the base type, if derived.
    #[serde(default)]
    pub base_type: Option<String>,

    /// Whether the type is abstract.
    #[serde(default)]
    pub is_abstract: bool,

    /// Whether instances may carry undeclared properties.
    #[serde(default)]
    pub open_type: bool,

    /// Whether instances are media entities.
    #[serde(default)]
    pub has_stream: bool,

    /// Names of the key properties. Empty for derived types, which inherit
    /// the key of their base type.
    #[serde(default)]
    pub key: Vec<String>,

    /// Declared structural properties.
    #[serde(default)]
    pub properties: Vec<Property>,

    /// Declared navigation properties.
    #[serde(default)]
    pub navigation_properties: Vec<NavigationProperty>,
}

impl EntityType {
    /// Creates an entity type with no members.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_type: None,
            is_abstract: false,
            open_type: false,
            has_stream: false,
            key: Vec::new(),
            properties: Vec::new(),
            navigation_properties: Vec::new(),
        }
    }

    /// Sets the base type.
    pub fn with_base_type(mut self, base_type: impl Into<String>) -> Self {
        self.base_type = Some(base_type.into());
        self
    }

    /// Adds a key property name.
    pub fn with_key(mut self, property: impl Into<String>) -> Self {
        self.key.push(property.into());
        self
    }

    /// Adds a structural property.
    pub fn with_property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    /// Adds a navigation property.
    pub fn with_navigation_property(mut self, property: NavigationProperty) -> Self {
        self.navigation_properties.push(property);
        self
    }

    /// Finds a declared structural property by name.
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Finds a declared navigation property by name.
    pub fn navigation_property(&self, name: &str) -> Option<&NavigationProperty> {
        self.navigation_properties.iter().find(|p| p.name == name)
    }
}

/// A complex type: a keyless structured type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexType {
    /// Unqualified type name.
    pub name: String,

    /// Qualified name of the base type, if derived.
    #[serde(default)]
    pub base_type: Option<String>,

    /// Whether the type is abstract.
    #[serde(default)]
    pub is_abstract: bool,

    /// Whether instances may carry undeclared properties.
    #[serde(default)]
    pub open_type: bool,

    /// Declared structural properties.
    #[serde(default)]
    pub properties: Vec<Property>,

    /// Declared navigation properties.
    #[serde(default)]
    pub navigation_properties: Vec<NavigationProperty>,
}

impl ComplexType {
    /// Creates a complex type with no members.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_type: None,
            is_abstract: false,
            open_type: false,
            properties: Vec::new(),
            navigation_properties: Vec::new(),
        }
    }

    /// Sets the base type.
    pub fn with_base_type(mut self, base_type: impl Into<String>) -> Self {
        self.base_type = Some(base_type.into());
        self
    }

    /// Adds a structural property.
    pub fn with_property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    /// Finds a declared structural property by name.
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// A named value of an enum type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumMember {
    /// Member name.
    pub name: String,
    /// Underlying integral value.
    pub value: i64,
}

/// An enum type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumType {
    /// Unqualified type name.
    pub name: String,

    /// Underlying integral type, `Edm.Int32` unless declared otherwise.
    #[serde(default = "default_underlying_type")]
    pub underlying_type: String,

    /// Whether members combine as bit flags.
    #[serde(default)]
    pub is_flags: bool,

    /// Members in declaration order.
    #[serde(default)]
    pub members: Vec<EnumMember>,
}

fn default_underlying_type() -> String {
    "Edm.Int32".to_string()
}

impl EnumType {
    /// Creates an enum type with no members.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            underlying_type: default_underlying_type(),
            is_flags: false,
            members: Vec::new(),
        }
    }

    /// Adds a member.
    pub fn with_member(mut self, name: impl Into<String>, value: i64) -> Self {
        self.members.push(EnumMember {
            name: name.into(),
            value,
        });
        self
    }

    /// Finds a member by name.
    pub fn member(&self, name: &str) -> Option<&EnumMember> {
        self.members.iter().find(|m| m.name == name)
    }

    /// Finds the first member with the given value.
    pub fn member_by_value(&self, value: i64) -> Option<&EnumMember> {
        self.members.iter().find(|m| m.value == value)
    }
}

/// Returns the element type of a `Collection(...)` type name.
pub(crate) fn collection_element(type_name: &str) -> Option<&str> {
    type_name
        .strip_prefix("Collection(")
        .and_then(|rest| rest.strip_suffix(')'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_types() {
        let nav = NavigationProperty::new("Trips", "Collection(Trippin.Trip)");
        assert!(nav.is_collection());
        assert_eq!(nav.target_type(), "Trippin.Trip");

        let single = NavigationProperty::new("BestFriend", "Trippin.Person");
        assert!(!single.is_collection());
        assert_eq!(single.target_type(), "Trippin.Person");

        assert!(Property::new("Emails", "Collection(Edm.String)").is_collection());
    }

    #[test]
    fn test_entity_type_lookups() {
        let person = EntityType::new("Person")
            .with_key("UserName")
            .with_property(Property::new("UserName", "Edm.String").required())
            .with_property(Property::new("Age", "Edm.Int64"))
            .with_navigation_property(NavigationProperty::new(
                "Friends",
                "Collection(Trippin.Person)",
            ));

        assert!(!person.property("UserName").unwrap().nullable);
        assert!(person.property("Missing").is_none());
        assert!(person.navigation_property("Friends").is_some());
    }

    #[test]
    fn test_enum_members() {
        let gender = EnumType::new("PersonGender")
            .with_member("Male", 0)
            .with_member("Female", 1);

        assert_eq!(gender.underlying_type, "Edm.Int32");
        assert_eq!(gender.member("Female").map(|m| m.value), Some(1));
        assert_eq!(gender.member_by_value(0).map(|m| m.name.as_str()), Some("Male"));
    }
}
