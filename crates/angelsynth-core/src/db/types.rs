//! Type entries and inheritance chains.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::symbols::{DbArg, DbMethod, DbProperty, DbSymbol};
use super::{ModuleId, NamespaceId, Span, TypeId, ROOT_NAMESPACE};

/// Category of a type, decided once when the type is declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    /// Reference type taking part in the host object model.
    #[default]
    Class,
    /// Value struct.
    Struct,
    /// Enumeration.
    Enum,
    /// Single-cast delegate.
    Delegate,
    /// Multicast event.
    Event,
    /// Host primitive value type (`int`, `bool`, ...).
    Primitive,
}

impl TypeKind {
    /// Delegate and event types only receive delegate members.
    pub fn is_delegate_like(&self) -> bool {
        matches!(self, TypeKind::Delegate | TypeKind::Event)
    }

    /// Value categories never get a companion namespace.
    pub fn is_value_type(&self) -> bool {
        matches!(self, TypeKind::Struct | TypeKind::Enum | TypeKind::Primitive)
    }
}

/// Return type and arguments of a delegate or event type.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DelegateSignature {
    #[serde(default)]
    pub return_type: String,
    #[serde(default)]
    pub args: Vec<DbArg>,
}

/// A class, struct, enum, delegate or host type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbType {
    pub type_id: TypeId,
    pub name: String,
    /// Namespace the type is declared in.
    pub namespace: NamespaceId,
    pub kind: TypeKind,
    /// Name of the direct parent, resolved from `namespace`.
    pub superclass: Option<String>,
    /// `None` for host types.
    pub declared_module: Option<ModuleId>,
    /// Span of the declaration header.
    pub decl_span: Span,
    /// Span of the declaration body.
    pub scope_span: Option<Span>,
    pub delegate: Option<DelegateSignature>,
    pub documentation: Option<String>,
    /// Flag-style declaration specifiers (e.g. `NutClass`).
    pub specifiers: BTreeSet<String>,
    /// Key/value metadata, keys stored lowercase.
    pub meta: BTreeMap<String, String>,
    pub(super) symbols: Vec<DbSymbol>,
}

impl DbType {
    /// Create a type in the root namespace.
    pub fn new(type_id: TypeId, name: impl Into<String>, kind: TypeKind) -> Self {
        DbType {
            type_id,
            name: name.into(),
            namespace: ROOT_NAMESPACE,
            kind,
            superclass: None,
            declared_module: None,
            decl_span: Span::default(),
            scope_span: None,
            delegate: None,
            documentation: None,
            specifiers: BTreeSet::new(),
            meta: BTreeMap::new(),
            symbols: Vec::new(),
        }
    }

    pub fn with_superclass(mut self, superclass: impl Into<String>) -> Self {
        self.superclass = Some(superclass.into());
        self
    }

    pub fn with_namespace(mut self, namespace: NamespaceId) -> Self {
        self.namespace = namespace;
        self
    }

    /// Set the declaring module and declaration span.
    pub fn declared_in(mut self, module: ModuleId, decl_span: Span) -> Self {
        self.declared_module = Some(module);
        self.decl_span = decl_span;
        self
    }

    pub fn with_scope_span(mut self, scope_span: Span) -> Self {
        self.scope_span = Some(scope_span);
        self
    }

    pub fn with_delegate(mut self, signature: DelegateSignature) -> Self {
        self.delegate = Some(signature);
        self
    }

    pub fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = Some(documentation.into());
        self
    }

    pub fn with_specifier(mut self, specifier: impl Into<String>) -> Self {
        self.specifiers.insert(specifier.into());
        self
    }

    /// Attach a metadata value. The key is matched case-insensitively.
    pub fn with_meta(mut self, key: &str, value: impl Into<String>) -> Self {
        self.meta.insert(key.to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_method(mut self, method: DbMethod) -> Self {
        self.symbols.push(DbSymbol::Method(method));
        self
    }

    pub fn with_property(mut self, prop: DbProperty) -> Self {
        self.symbols.push(DbSymbol::Property(prop));
        self
    }

    /// Append a symbol.
    pub fn add_symbol(&mut self, symbol: impl Into<DbSymbol>) {
        self.symbols.push(symbol.into());
    }

    pub fn has_specifier(&self, specifier: &str) -> bool {
        self.specifiers.contains(specifier)
    }

    pub fn meta_value(&self, key: &str) -> Option<&str> {
        self.meta.get(&key.to_ascii_lowercase()).map(String::as_str)
    }

    /// Name shown in generated documentation.
    pub fn display_name(&self) -> &str {
        self.meta_value("DisplayName").unwrap_or(&self.name)
    }

    /// Byte offset of the declaration header.
    pub fn offset(&self) -> u64 {
        self.decl_span.start
    }

    /// All symbols in registration order.
    pub fn symbols(&self) -> &[DbSymbol] {
        &self.symbols
    }

    pub fn methods(&self) -> impl Iterator<Item = &DbMethod> {
        self.symbols.iter().filter_map(DbSymbol::as_method)
    }

    pub fn properties(&self) -> impl Iterator<Item = &DbProperty> {
        self.symbols.iter().filter_map(DbSymbol::as_property)
    }

    /// Methods with their position in [`DbType::symbols`].
    pub fn indexed_methods(&self) -> impl Iterator<Item = (usize, &DbMethod)> {
        self.symbols
            .iter()
            .enumerate()
            .filter_map(|(index, sym)| sym.as_method().map(|m| (index, m)))
    }

    /// Properties with their position in [`DbType::symbols`].
    pub fn indexed_properties(&self) -> impl Iterator<Item = (usize, &DbProperty)> {
        self.symbols
            .iter()
            .enumerate()
            .filter_map(|(index, sym)| sym.as_property().map(|p| (index, p)))
    }

    /// Symbols produced by synthesis.
    pub fn generated_symbols(&self) -> impl Iterator<Item = &DbSymbol> {
        self.symbols.iter().filter(|sym| sym.is_auto_generated())
    }
}

/// Ordered ancestry of a type: the type itself first, then each parent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AncestorChain {
    names: Vec<String>,
}

impl AncestorChain {
    pub fn new(names: Vec<String>) -> Self {
        AncestorChain { names }
    }

    /// Whether `name` is the type itself or one of its ancestors.
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
