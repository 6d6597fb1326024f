//! Member symbols: methods, properties, arguments and auxiliary links.

use serde::{Deserialize, Serialize};

use super::{ModuleId, TypeId};

/// A single argument of a method or delegate signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbArg {
    /// Argument type as written (e.g., `"AActor"`, `"FName"`).
    pub typename: String,
    /// Argument name.
    pub name: String,
    /// Default value expression, if the argument is optional.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

impl DbArg {
    /// Create a required argument.
    pub fn new(typename: impl Into<String>, name: impl Into<String>) -> Self {
        DbArg {
            typename: typename.into(),
            name: name.into(),
            default_value: None,
        }
    }

    /// Create an optional argument with a default value expression.
    pub fn with_default(
        typename: impl Into<String>,
        name: impl Into<String>,
        default_value: impl Into<String>,
    ) -> Self {
        DbArg {
            typename: typename.into(),
            name: name.into(),
            default_value: Some(default_value.into()),
        }
    }
}

/// Non-owning cross-reference to a related symbol.
///
/// `container_type` is the qualified name of the type or namespace that
/// holds the peer symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AuxiliarySymbol {
    /// Name of the peer symbol.
    pub symbol_name: String,
    /// Qualified name of the peer's container.
    pub container_type: String,
}

impl AuxiliarySymbol {
    pub fn new(symbol_name: impl Into<String>, container_type: impl Into<String>) -> Self {
        AuxiliarySymbol {
            symbol_name: symbol_name.into(),
            container_type: container_type.into(),
        }
    }
}

/// Marks a method as a delegate bind operation.
///
/// Signature help and completion use the parameter positions to offer the
/// bound object's functions for the function-name argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegateBind {
    /// Delegate type being bound.
    pub bind_type: String,
    /// Position of the object argument.
    pub object_param: usize,
    /// Position of the function-name argument.
    pub function_param: usize,
}

/// A method or free function.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DbMethod {
    pub name: String,
    /// Return type; empty when the script omitted it.
    pub return_type: String,
    pub args: Vec<DbArg>,
    pub documentation: Option<String>,
    /// Module that declares this method (`None` for host functions).
    pub declared_module: Option<ModuleId>,
    /// Byte offset of the declaration site in the declaring module.
    pub offset: Option<u64>,
    /// Class whose synthesis produced this method; `None` for user-written code.
    pub generated_by: Option<TypeId>,
    /// Accessed with property syntax.
    pub is_property: bool,
    pub is_const: bool,
    pub is_constructor: bool,
    pub is_ufunction: bool,
    pub is_blueprint_event: bool,
    pub is_blueprint_override: bool,
    pub delegate_bind: Option<DelegateBind>,
    pub auxiliary_symbols: Vec<AuxiliarySymbol>,
}

impl DbMethod {
    /// Create a method with no return type and no arguments.
    pub fn new(name: impl Into<String>) -> Self {
        DbMethod {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_return_type(mut self, return_type: impl Into<String>) -> Self {
        self.return_type = return_type.into();
        self
    }

    pub fn with_args(mut self, args: Vec<DbArg>) -> Self {
        self.args = args;
        self
    }

    pub fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = Some(documentation.into());
        self
    }

    /// Set the declaration offset used for navigation.
    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_delegate_bind(mut self, bind: DelegateBind) -> Self {
        self.delegate_bind = Some(bind);
        self
    }

    /// Mark as accessed with property syntax.
    pub fn as_property(mut self) -> Self {
        self.is_property = true;
        self
    }

    pub fn as_constructor(mut self) -> Self {
        self.is_constructor = true;
        self
    }

    /// Whether synthesis produced this method.
    pub fn is_auto_generated(&self) -> bool {
        self.generated_by.is_some()
    }

    /// Whether the method returns nothing.
    pub fn returns_void(&self) -> bool {
        self.return_type.is_empty() || self.return_type == "void"
    }
}

/// A member variable.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DbProperty {
    pub name: String,
    pub typename: String,
    pub documentation: Option<String>,
    pub declared_module: Option<ModuleId>,
    pub offset: Option<u64>,
    pub generated_by: Option<TypeId>,
    /// Exposed to the host reflection system.
    pub is_uproperty: bool,
    pub auxiliary_symbols: Vec<AuxiliarySymbol>,
}

impl DbProperty {
    pub fn new(name: impl Into<String>, typename: impl Into<String>) -> Self {
        DbProperty {
            name: name.into(),
            typename: typename.into(),
            ..Default::default()
        }
    }

    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn is_auto_generated(&self) -> bool {
        self.generated_by.is_some()
    }
}

/// A symbol owned by a type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbSymbol {
    Method(DbMethod),
    Property(DbProperty),
}

impl DbSymbol {
    pub fn name(&self) -> &str {
        match self {
            DbSymbol::Method(method) => &method.name,
            DbSymbol::Property(prop) => &prop.name,
        }
    }

    pub fn generated_by(&self) -> Option<TypeId> {
        match self {
            DbSymbol::Method(method) => method.generated_by,
            DbSymbol::Property(prop) => prop.generated_by,
        }
    }

    pub fn is_auto_generated(&self) -> bool {
        self.generated_by().is_some()
    }

    pub fn auxiliary_symbols(&self) -> &[AuxiliarySymbol] {
        match self {
            DbSymbol::Method(method) => &method.auxiliary_symbols,
            DbSymbol::Property(prop) => &prop.auxiliary_symbols,
        }
    }

    pub fn auxiliary_symbols_mut(&mut self) -> &mut Vec<AuxiliarySymbol> {
        match self {
            DbSymbol::Method(method) => &mut method.auxiliary_symbols,
            DbSymbol::Property(prop) => &mut prop.auxiliary_symbols,
        }
    }

    pub fn as_method(&self) -> Option<&DbMethod> {
        match self {
            DbSymbol::Method(method) => Some(method),
            DbSymbol::Property(_) => None,
        }
    }

    pub fn as_property(&self) -> Option<&DbProperty> {
        match self {
            DbSymbol::Property(prop) => Some(prop),
            DbSymbol::Method(_) => None,
        }
    }
}

impl From<DbMethod> for DbSymbol {
    fn from(method: DbMethod) -> Self {
        DbSymbol::Method(method)
    }
}

impl From<DbProperty> for DbSymbol {
    fn from(prop: DbProperty) -> Self {
        DbSymbol::Property(prop)
    }
}
