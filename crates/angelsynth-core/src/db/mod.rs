//! Type database: classes, namespaces, modules and their member symbols.
//!
//! This module provides the symbol model the synthesis pass reads and
//! mutates:
//! - [`DbType`]: classes, structs, enums, delegates and host types
//! - [`DbNamespace`]: free-function containers, nested by name
//! - [`ScriptModule`]: parsed script files with their global-symbol lists
//! - [`DbMethod`] / [`DbProperty`]: member symbols with provenance and
//!   auxiliary links
//!
//! The [`TypeDatabase`] provides in-memory storage with:
//! - BTreeMap storage keyed by ID for deterministic iteration
//! - Name indexes for scoped type lookup and namespace resolution
//! - Ancestor-chain resolution through superclass names
//!
//! # Synthesized symbols
//!
//! Symbols created by synthesis carry `generated_by = Some(type_id)`. The
//! database can strip everything a type generated ([`TypeDatabase::clear_generated`])
//! and commit a buffered batch of new symbols ([`TypeDatabase::apply_synthesis`]).

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

pub mod host;
mod namespace;
mod symbols;
mod types;

pub use namespace::{DbNamespace, GlobalSymbolRef, NamespaceDeclaration, ScriptModule};
pub use symbols::{AuxiliarySymbol, DbArg, DbMethod, DbProperty, DbSymbol, DelegateBind};
pub use types::{AncestorChain, DbType, DelegateSignature, TypeKind};

// ============================================================================
// ID Types
// ============================================================================

/// Unique identifier for a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct TypeId(pub u32);

impl TypeId {
    pub fn new(id: u32) -> Self {
        TypeId(id)
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "type_{}", self.0)
    }
}

/// Unique identifier for a script module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct ModuleId(pub u32);

impl ModuleId {
    pub fn new(id: u32) -> Self {
        ModuleId(id)
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mod_{}", self.0)
    }
}

/// Unique identifier for a namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct NamespaceId(pub u32);

impl fmt::Display for NamespaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ns_{}", self.0)
    }
}

/// The unnamed global namespace.
pub const ROOT_NAMESPACE: NamespaceId = NamespaceId(0);

// ============================================================================
// Span
// ============================================================================

/// Byte offsets into a module's source.
///
/// Spans are half-open intervals: `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: u64,
    pub end: u64,
}

impl Span {
    /// Create a new span.
    ///
    /// # Panics
    /// Panics if `start > end`.
    pub fn new(start: u64, end: u64) -> Self {
        assert!(
            start <= end,
            "Span start ({}) must be <= end ({})",
            start,
            end
        );
        Span { start, end }
    }
}

// ============================================================================
// Synthesis Output
// ============================================================================

/// A batch of synthesized symbols for one type, committed atomically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisOutput {
    /// Type the batch belongs to.
    pub type_id: TypeId,
    /// New members, appended to the type in order.
    pub members: Vec<DbSymbol>,
    /// New free functions and the namespace each goes into.
    pub functions: Vec<(NamespaceId, DbMethod)>,
    /// Links to append to symbols that already exist on the type,
    /// keyed by their position in [`DbType::symbols`].
    pub links: Vec<(usize, AuxiliarySymbol)>,
}

impl SynthesisOutput {
    pub fn new(type_id: TypeId) -> Self {
        SynthesisOutput {
            type_id,
            members: Vec::new(),
            functions: Vec::new(),
            links: Vec::new(),
        }
    }
}

// ============================================================================
// Type Database
// ============================================================================

/// In-memory type database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDatabase {
    types: BTreeMap<TypeId, DbType>,
    namespaces: BTreeMap<NamespaceId, DbNamespace>,
    modules: BTreeMap<ModuleId, ScriptModule>,

    /// (namespace, simple name) → type.
    types_by_name: BTreeMap<(NamespaceId, String), TypeId>,
    /// (parent, simple name) → child namespace.
    namespace_children: BTreeMap<(NamespaceId, String), NamespaceId>,
    /// Companion namespaces merged into a module on behalf of a class.
    companions: BTreeMap<TypeId, NamespaceId>,

    next_type_id: u32,
    next_module_id: u32,
    next_namespace_id: u32,
}

impl Default for TypeDatabase {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeDatabase {
    /// Create a database holding only the root namespace.
    pub fn new() -> Self {
        let mut namespaces = BTreeMap::new();
        namespaces.insert(ROOT_NAMESPACE, DbNamespace::new(ROOT_NAMESPACE, ""));
        TypeDatabase {
            types: BTreeMap::new(),
            namespaces,
            modules: BTreeMap::new(),
            types_by_name: BTreeMap::new(),
            namespace_children: BTreeMap::new(),
            companions: BTreeMap::new(),
            next_type_id: 0,
            next_module_id: 0,
            next_namespace_id: 1,
        }
    }

    /// Create a database seeded with the host framework types.
    pub fn with_host_types() -> Self {
        let mut db = Self::new();
        host::seed_host_types(&mut db);
        db
    }

    // ========================================================================
    // ID Generation
    // ========================================================================

    pub fn next_type_id(&mut self) -> TypeId {
        let id = TypeId::new(self.next_type_id);
        self.next_type_id += 1;
        id
    }

    pub fn next_module_id(&mut self) -> ModuleId {
        let id = ModuleId::new(self.next_module_id);
        self.next_module_id += 1;
        id
    }

    // ========================================================================
    // Insert Operations
    // ========================================================================

    /// Insert a type. A later type with the same name in the same
    /// namespace shadows the earlier one for name lookup.
    pub fn insert_type(&mut self, dbtype: DbType) {
        self.types_by_name
            .insert((dbtype.namespace, dbtype.name.clone()), dbtype.type_id);
        self.types.insert(dbtype.type_id, dbtype);
    }

    /// Insert a type under a freshly assigned id.
    pub fn add_type(&mut self, mut dbtype: DbType) -> TypeId {
        let type_id = self.next_type_id();
        dbtype.type_id = type_id;
        self.insert_type(dbtype);
        type_id
    }

    pub fn insert_module(&mut self, module: ScriptModule) {
        self.modules.insert(module.module_id, module);
    }

    /// Create and insert an empty module.
    pub fn add_module(&mut self, name: impl Into<String>) -> ModuleId {
        let module_id = self.next_module_id();
        self.insert_module(ScriptModule::new(module_id, name));
        module_id
    }

    /// Declare a namespace under `parent`, creating it on first use.
    ///
    /// Re-declaring from the same site does not add a second declaration.
    pub fn declare_namespace(
        &mut self,
        parent: NamespaceId,
        name: &str,
        decl: NamespaceDeclaration,
    ) -> NamespaceId {
        let key = (parent, name.to_string());
        let namespace_id = match self.namespace_children.get(&key) {
            Some(id) => *id,
            None => {
                let id = NamespaceId(self.next_namespace_id);
                self.next_namespace_id += 1;
                self.namespaces
                    .insert(id, DbNamespace::new(id, name).with_parent(parent));
                self.namespace_children.insert(key, id);
                id
            }
        };

        if let Some(ns) = self.namespaces.get_mut(&namespace_id) {
            if !ns.declarations.contains(&decl) {
                ns.declarations.push(decl);
            }
        }
        namespace_id
    }

    /// Add a free function to a namespace.
    pub fn add_function(&mut self, namespace: NamespaceId, method: DbMethod) {
        if let Some(ns) = self.namespaces.get_mut(&namespace) {
            ns.symbols.push(method);
        }
    }

    /// Register a free function for unqualified lookup from a module.
    pub fn add_global_symbol(&mut self, module: ModuleId, namespace: NamespaceId, name: String) {
        let Some(module) = self.modules.get_mut(&module) else {
            return;
        };
        let entry = GlobalSymbolRef { namespace, name };
        if !module.global_symbols.contains(&entry) {
            module.global_symbols.push(entry);
        }
    }

    /// Merge a namespace into a module's namespace list.
    pub fn merge_namespace(&mut self, module: ModuleId, namespace: NamespaceId) {
        if let Some(module) = self.modules.get_mut(&module) {
            if !module.namespaces.contains(&namespace) {
                module.namespaces.push(namespace);
            }
        }
    }

    // ========================================================================
    // Lookups
    // ========================================================================

    pub fn type_by_id(&self, type_id: TypeId) -> Option<&DbType> {
        self.types.get(&type_id)
    }

    pub fn module(&self, module_id: ModuleId) -> Option<&ScriptModule> {
        self.modules.get(&module_id)
    }

    pub fn namespace(&self, namespace_id: NamespaceId) -> Option<&DbNamespace> {
        self.namespaces.get(&namespace_id)
    }

    pub fn root_namespace(&self) -> &DbNamespace {
        &self.namespaces[&ROOT_NAMESPACE]
    }

    /// Iterate all types in ID order.
    pub fn types(&self) -> impl Iterator<Item = &DbType> {
        self.types.values()
    }

    pub fn modules(&self) -> impl Iterator<Item = &ScriptModule> {
        self.modules.values()
    }

    /// Types declared in a module, in declaration order.
    pub fn types_in_module(&self, module_id: ModuleId) -> Vec<TypeId> {
        self.types
            .values()
            .filter(|t| t.declared_module == Some(module_id))
            .map(|t| t.type_id)
            .collect()
    }

    /// Find a child namespace by simple name.
    pub fn find_namespace(&self, parent: NamespaceId, name: &str) -> Option<NamespaceId> {
        self.namespace_children
            .get(&(parent, name.to_string()))
            .copied()
    }

    /// Resolve a `A::B` namespace path from the root.
    pub fn resolve_namespace_path(&self, path: &str) -> Option<NamespaceId> {
        path.split("::")
            .filter(|part| !part.is_empty())
            .try_fold(ROOT_NAMESPACE, |ns, part| self.find_namespace(ns, part))
    }

    /// Look up a type by name as seen from `scope`.
    ///
    /// Simple names are searched in `scope` and then each enclosing
    /// namespace. Qualified names (`A::B`) are resolved from the root.
    pub fn lookup_type(&self, scope: NamespaceId, name: &str) -> Option<&DbType> {
        if let Some((path, simple)) = name.rsplit_once("::") {
            let namespace = self.resolve_namespace_path(path)?;
            return self.type_in_namespace(namespace, simple);
        }

        let mut current = Some(scope);
        while let Some(namespace) = current {
            if let Some(found) = self.type_in_namespace(namespace, name) {
                return Some(found);
            }
            current = self.namespaces.get(&namespace).and_then(|ns| ns.parent);
        }
        None
    }

    fn type_in_namespace(&self, namespace: NamespaceId, name: &str) -> Option<&DbType> {
        self.types_by_name
            .get(&(namespace, name.to_string()))
            .and_then(|id| self.types.get(id))
    }

    /// Qualified name of a namespace (`""` for the root).
    pub fn qualified_namespace(&self, namespace_id: NamespaceId) -> String {
        let mut parts = Vec::new();
        let mut current = self.namespaces.get(&namespace_id);
        while let Some(ns) = current {
            if ns.is_root() {
                break;
            }
            parts.push(ns.name.as_str());
            current = ns.parent.and_then(|p| self.namespaces.get(&p));
        }
        parts.reverse();
        parts.join("::")
    }

    /// Qualified name of a type, prefixed by its namespace path.
    pub fn qualified_type_name(&self, type_id: TypeId) -> Option<String> {
        let dbtype = self.types.get(&type_id)?;
        let prefix = self.qualified_namespace(dbtype.namespace);
        if prefix.is_empty() {
            Some(dbtype.name.clone())
        } else {
            Some(format!("{}::{}", prefix, dbtype.name))
        }
    }

    /// Free functions reachable from a module by unqualified name.
    pub fn lookup_global(&self, module_id: ModuleId, name: &str) -> Vec<&DbMethod> {
        let Some(module) = self.modules.get(&module_id) else {
            return Vec::new();
        };
        module
            .global_symbols
            .iter()
            .filter(|entry| entry.name == name)
            .filter_map(|entry| self.namespaces.get(&entry.namespace))
            .flat_map(|ns| ns.symbols.iter().filter(move |f| f.name == name))
            .collect()
    }

    // ========================================================================
    // Inheritance
    // ========================================================================

    /// Resolve the ancestry of a type, the type itself first.
    ///
    /// Parents are looked up by name from the child's namespace. The chain
    /// stops at the first unresolved parent or on a cycle.
    pub fn ancestor_chain(&self, type_id: TypeId) -> AncestorChain {
        let mut names = Vec::new();
        let mut visited = HashSet::new();
        let mut current = self.types.get(&type_id);

        while let Some(dbtype) = current {
            if !visited.insert(dbtype.type_id) {
                break; // Cycle detected
            }
            names.push(dbtype.name.clone());
            current = dbtype
                .superclass
                .as_deref()
                .and_then(|parent| self.lookup_type(dbtype.namespace, parent));
        }

        AncestorChain::new(names)
    }

    /// Whether `type_id` is `name` or derives from it.
    pub fn inherits_from(&self, type_id: TypeId, name: &str) -> bool {
        self.ancestor_chain(type_id).contains(name)
    }

    // ========================================================================
    // Synthesis Support
    // ========================================================================

    /// Remove everything synthesis previously produced for a type.
    ///
    /// Strips generated members, resets auxiliary links on the remaining
    /// members (only synthesis creates them) and drops generated free
    /// functions from every namespace.
    ///
    /// Module lists are left alone: the next [`TypeDatabase::apply_synthesis`]
    /// keeps each entry that still resolves at its position and prunes the
    /// rest, so re-running one class does not reorder its module.
    pub fn clear_generated(&mut self, type_id: TypeId) {
        let Some(dbtype) = self.types.get_mut(&type_id) else {
            return;
        };
        dbtype
            .symbols
            .retain(|sym| sym.generated_by() != Some(type_id));
        for sym in &mut dbtype.symbols {
            sym.auxiliary_symbols_mut().clear();
        }

        for ns in self.namespaces.values_mut() {
            ns.symbols.retain(|f| f.generated_by != Some(type_id));
        }
    }

    /// Commit a batch of synthesized symbols.
    ///
    /// Members are appended to the type, functions to their namespaces and
    /// to the declaring module's global list, all in buffer order. Global
    /// entries already in the list keep their position; entries that no
    /// longer resolve are dropped.
    pub fn apply_synthesis(&mut self, output: SynthesisOutput) {
        let SynthesisOutput {
            type_id,
            members,
            functions,
            links,
        } = output;

        let Some(dbtype) = self.types.get_mut(&type_id) else {
            return;
        };
        for (index, link) in links {
            if let Some(sym) = dbtype.symbols.get_mut(index) {
                sym.auxiliary_symbols_mut().push(link);
            }
        }
        dbtype.symbols.extend(members);
        let module_id = dbtype.declared_module;

        for (namespace, method) in functions {
            let name = method.name.clone();
            self.add_function(namespace, method);
            if let Some(module_id) = module_id {
                self.add_global_symbol(module_id, namespace, name);
            }
        }

        if let Some(module_id) = module_id {
            self.prune_globals(module_id);
        }
    }

    fn prune_globals(&mut self, module_id: ModuleId) {
        let namespaces = &self.namespaces;
        if let Some(module) = self.modules.get_mut(&module_id) {
            module.global_symbols.retain(|entry| {
                namespaces
                    .get(&entry.namespace)
                    .is_some_and(|ns| ns.find_functions(&entry.name).next().is_some())
            });
        }
    }

    /// Merge a class's companion namespace into the class's module.
    ///
    /// A companion that is already attached keeps its position. A namespace
    /// the module merged for another reason is left untracked.
    pub fn attach_companion(&mut self, type_id: TypeId, namespace: NamespaceId) {
        if self.companions.get(&type_id) == Some(&namespace) {
            return;
        }
        self.detach_companion(type_id);

        let Some(module_id) = self.types.get(&type_id).and_then(|t| t.declared_module) else {
            return;
        };
        if let Some(module) = self.modules.get_mut(&module_id) {
            if !module.namespaces.contains(&namespace) {
                module.namespaces.push(namespace);
                self.companions.insert(type_id, namespace);
            }
        }
    }

    /// Unmerge the companion attached for a class, if any.
    pub fn detach_companion(&mut self, type_id: TypeId) {
        let Some(namespace) = self.companions.remove(&type_id) else {
            return;
        };
        let module_id = self.types.get(&type_id).and_then(|t| t.declared_module);
        if let Some(module) = module_id.and_then(|id| self.modules.get_mut(&id)) {
            module.namespaces.retain(|ns| *ns != namespace);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
