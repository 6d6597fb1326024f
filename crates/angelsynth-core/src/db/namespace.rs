//! Namespaces and script modules.

use super::symbols::DbMethod;
use super::{ModuleId, NamespaceId, Span};

/// One site where a namespace is declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamespaceDeclaration {
    pub declared_module: Option<ModuleId>,
    pub decl_span: Span,
    pub scope_span: Option<Span>,
}

/// A container of free functions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbNamespace {
    pub namespace_id: NamespaceId,
    /// Simple name; empty for the root namespace.
    pub name: String,
    pub parent: Option<NamespaceId>,
    pub declarations: Vec<NamespaceDeclaration>,
    pub symbols: Vec<DbMethod>,
}

impl DbNamespace {
    pub fn new(namespace_id: NamespaceId, name: impl Into<String>) -> Self {
        DbNamespace {
            namespace_id,
            name: name.into(),
            parent: None,
            declarations: Vec::new(),
            symbols: Vec::new(),
        }
    }

    pub fn with_parent(mut self, parent: NamespaceId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Free functions with the given name (all overloads).
    pub fn find_functions<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a DbMethod> {
        self.symbols.iter().filter(move |f| f.name == name)
    }
}

/// Entry of a module's flat unqualified-lookup list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GlobalSymbolRef {
    pub namespace: NamespaceId,
    pub name: String,
}

/// A parsed script file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptModule {
    pub module_id: ModuleId,
    /// Dotted module name (e.g., `"Gameplay.Doors.DoorComponent"`).
    pub name: String,
    pub global_symbols: Vec<GlobalSymbolRef>,
    /// Namespaces merged into this module's symbol set.
    pub namespaces: Vec<NamespaceId>,
}

impl ScriptModule {
    pub fn new(module_id: ModuleId, name: impl Into<String>) -> Self {
        ScriptModule {
            module_id,
            name: name.into(),
            global_symbols: Vec::new(),
            namespaces: Vec::new(),
        }
    }
}
