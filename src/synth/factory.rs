//! Creation and registration of synthesized symbols.
//!
//! A [`SymbolFactory`] is bound to one class. Every symbol it creates is
//! stamped with the class as its generator and with the class's declaration
//! site as provenance, then buffered in a [`SynthesisOutput`]. The class's
//! own symbols are never touched while generators run; links onto them are
//! buffered too and applied when the output is committed.

use angelsynth_core::db::{
    AuxiliarySymbol, DbMethod, DbProperty, DbSymbol, ModuleId, NamespaceId, SynthesisOutput,
    TypeDatabase, TypeId,
};

/// Handle to a symbol the factory can link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolRef {
    /// Pending class member, by position in the output buffer.
    Member(usize),
    /// Pending free function, by position in the output buffer.
    Function(usize),
    /// Symbol already on the class, by position in its symbol list.
    Existing(usize),
}

/// Buffered symbol creation for one class.
#[derive(Debug)]
pub struct SymbolFactory {
    class_name: String,
    qualified_class: String,
    declared_module: Option<ModuleId>,
    offset: u64,
    enclosing: NamespaceId,
    companion: Option<NamespaceId>,
    /// Qualified names of the namespaces functions may be added to.
    namespace_names: Vec<(NamespaceId, String)>,
    /// Names of the class's existing symbols, by position.
    existing: Vec<String>,
    output: SynthesisOutput,
}

impl SymbolFactory {
    /// Bind a factory to a class. Returns `None` for unknown types.
    pub fn new(db: &TypeDatabase, type_id: TypeId, companion: Option<NamespaceId>) -> Option<Self> {
        let dbtype = db.type_by_id(type_id)?;
        let qualified_class = db.qualified_type_name(type_id)?;

        let mut namespace_names = vec![(dbtype.namespace, db.qualified_namespace(dbtype.namespace))];
        if let Some(companion) = companion {
            namespace_names.push((companion, db.qualified_namespace(companion)));
        }

        Some(SymbolFactory {
            class_name: dbtype.name.clone(),
            qualified_class,
            declared_module: dbtype.declared_module,
            offset: dbtype.offset(),
            enclosing: dbtype.namespace,
            companion,
            namespace_names,
            existing: dbtype.symbols().iter().map(|s| s.name().to_string()).collect(),
            output: SynthesisOutput::new(type_id),
        })
    }

    /// Namespace the class itself is declared in.
    pub fn enclosing(&self) -> NamespaceId {
        self.enclosing
    }


    fn stamp_method(&self, method: &mut DbMethod) {
        method.generated_by = Some(self.output.type_id);
        method.declared_module = self.declared_module;
        method.offset = method.offset.or(Some(self.offset));
    }

    /// Register a free function in `namespace` and the module's global list.
    pub fn new_free_function(&mut self, namespace: NamespaceId, mut method: DbMethod) -> SymbolRef {
        self.stamp_method(&mut method);
        self.output.functions.push((namespace, method));
        SymbolRef::Function(self.output.functions.len() - 1)
    }

    /// Register a free function in the companion namespace, or the enclosing
    /// namespace when the class has none.
    pub fn new_companion_function(&mut self, method: DbMethod) -> SymbolRef {
        let namespace = self.companion.unwrap_or(self.enclosing);
        self.new_free_function(namespace, method)
    }

    /// Register a method on the class.
    pub fn new_member(&mut self, mut method: DbMethod) -> SymbolRef {
        self.stamp_method(&mut method);
        self.output.members.push(DbSymbol::Method(method));
        SymbolRef::Member(self.output.members.len() - 1)
    }

    /// Register a property on the class.
    pub fn new_property(&mut self, mut prop: DbProperty) -> SymbolRef {
        prop.generated_by = Some(self.output.type_id);
        prop.declared_module = self.declared_module;
        prop.offset = prop.offset.or(Some(self.offset));
        self.output.members.push(DbSymbol::Property(prop));
        SymbolRef::Member(self.output.members.len() - 1)
    }

    /// Name and container of a symbol, as seen from its peer.
    fn describe(&self, symbol: SymbolRef) -> Option<AuxiliarySymbol> {
        match symbol {
            SymbolRef::Member(index) => {
                let name = self.output.members.get(index)?.name();
                Some(AuxiliarySymbol::new(name, self.qualified_class.as_str()))
            }
            SymbolRef::Existing(index) => {
                let name = self.existing.get(index)?;
                Some(AuxiliarySymbol::new(name.as_str(), self.qualified_class.as_str()))
            }
            SymbolRef::Function(index) => {
                let (namespace, method) = self.output.functions.get(index)?;
                let container = self
                    .namespace_names
                    .iter()
                    .find(|(id, _)| id == namespace)
                    .map(|(_, name)| name.clone())
                    .unwrap_or_default();
                Some(AuxiliarySymbol::new(method.name.as_str(), container))
            }
        }
    }

    fn push_link(&mut self, symbol: SymbolRef, link: AuxiliarySymbol) {
        match symbol {
            SymbolRef::Member(index) => {
                if let Some(member) = self.output.members.get_mut(index) {
                    member.auxiliary_symbols_mut().push(link);
                }
            }
            SymbolRef::Function(index) => {
                if let Some((_, method)) = self.output.functions.get_mut(index) {
                    method.auxiliary_symbols.push(link);
                }
            }
            SymbolRef::Existing(index) => self.output.links.push((index, link)),
        }
    }

    /// Link two symbols to each other.
    pub fn link(&mut self, a: SymbolRef, b: SymbolRef) {
        let (Some(a_desc), Some(b_desc)) = (self.describe(a), self.describe(b)) else {
            tracing::trace!(?a, ?b, class = %self.class_name, "link target out of range");
            return;
        };
        self.push_link(a, b_desc);
        self.push_link(b, a_desc);
    }

    /// Hand over the buffered symbols for [`TypeDatabase::apply_synthesis`].
    pub fn finish(self) -> SynthesisOutput {
        self.output
    }
}
