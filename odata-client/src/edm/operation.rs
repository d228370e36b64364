//! Operation (function and action) descriptors

use serde::Deserialize;
use serde::Serialize;

use super::types::default_true;

/// Whether an operation is side-effect free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    /// Idempotent, invoked with `GET`, parameters inline in the URL.
    Function,
    /// Side-effecting, invoked with `POST`, parameters in the body.
    Action,
}

impl OperationKind {
    /// Returns `true` for [`OperationKind::Function`].
    pub fn is_function(self) -> bool {
        matches!(self, OperationKind::Function)
    }
}

impl From<bool> for OperationKind {
    /// `true` means function, `false` means action.
    fn from(is_function: bool) -> Self {
        if is_function {
            OperationKind::Function
        } else {
            OperationKind::Action
        }
    }
}

/// A declared operation parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// Qualified type name.
    pub type_name: String,
    /// Whether the parameter accepts null.
    #[serde(default = "default_true")]
    pub nullable: bool,
}

/// A function or action declared in a schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationType {
    /// Unqualified operation name.
    pub name: String,

    /// Function or action.
    pub kind: OperationKind,

    /// Whether the first parameter is the binding parameter.
    #[serde(default)]
    pub is_bound: bool,

    /// Whether further path segments may follow a function call.
    #[serde(default)]
    pub is_composable: bool,

    /// Parameters in declaration order, binding parameter first.
    #[serde(default)]
    pub parameters: Vec<Parameter>,

    /// Qualified return type, `None` for actions without a result.
    #[serde(default)]
    pub return_type: Option<String>,
}

impl OperationType {
    /// Creates an unbound operation without parameters.
    pub fn new(name: impl Into<String>, kind: OperationKind) -> Self {
        Self {
            name: name.into(),
            kind,
            is_bound: false,
            is_composable: false,
            parameters: Vec::new(),
            return_type: None,
        }
    }

    /// Marks the operation as bound; the first parameter is the binding one.
    pub fn bound(mut self) -> Self {
        self.is_bound = true;
        self
    }

    /// Adds a parameter.
    pub fn with_parameter(mut self, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        self.parameters.push(Parameter {
            name: name.into(),
            type_name: type_name.into(),
            nullable: true,
        });
        self
    }

    /// Sets the return type.
    pub fn returns(mut self, type_name: impl Into<String>) -> Self {
        self.return_type = Some(type_name.into());
        self
    }

    /// Returns the binding parameter of a bound operation.
    pub fn binding_parameter(&self) -> Option<&Parameter> {
        if self.is_bound {
            self.parameters.first()
        } else {
            None
        }
    }

    /// Returns the parameters a caller supplies (all but the binding one).
    pub fn call_parameters(&self) -> &[Parameter] {
        if self.is_bound && !self.parameters.is_empty() {
            &self.parameters[1..]
        } else {
            &self.parameters
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bound_operation_parameters() {
        let op = OperationType::new("GetInvolvedPeople", OperationKind::Function)
            .bound()
            .with_parameter("trip", "Trippin.Trip")
            .returns("Collection(Trippin.Person)");

        assert_eq!(op.binding_parameter().map(|p| p.name.as_str()), Some("trip"));
        assert!(op.call_parameters().is_empty());
    }

    #[test]
    fn test_unbound_operation_parameters() {
        let op = OperationType::new("ResetDataSource", OperationKind::Action)
            .with_parameter("seed", "Edm.Int32");

        assert!(op.binding_parameter().is_none());
        assert_eq!(op.call_parameters().len(), 1);
        assert!(op.return_type.is_none());
    }

    #[test]
    fn test_kind_from_flag() {
        assert_eq!(OperationKind::from(true), OperationKind::Function);
        assert!(!OperationKind::from(false).is_function());
    }
}
