//! The synthesis pass.
//!
//! [`synthesize_type`] is called once per class after its own symbols are
//! registered. It decides which generators apply from the class's kind and
//! ancestor chain, runs them against a [`SymbolFactory`], and commits the
//! result to the database:
//!
//! 1. Delegate and event types get the delegate members and nothing else.
//! 2. Structs, enums and primitives get nothing.
//! 3. Everything else gets a companion namespace named after the class and
//!    each entry of [`CLASS_GENERATORS`] whose predicate holds, in order.
//!    Project rules run last, one per configured rule whose `derivedFrom`
//!    is in the chain.
//!
//! Previously generated symbols are cleared first, so running the pass
//! again on an unchanged class yields the same symbols, and the module's
//! namespace and global-symbol lists keep their order.

use std::fmt;

use angelsynth_core::config::Config;
use angelsynth_core::db::host::{
    AACTOR, ACTOR_COMPONENT, COMPOSABLE_SETTINGS, EFFECT_EVENT_HANDLER, SUBSYSTEM,
};
use angelsynth_core::db::{
    AncestorChain, DbType, ModuleId, NamespaceDeclaration, NamespaceId, SynthesisOutput,
    TypeDatabase, TypeId,
};
use serde::Serialize;

pub mod builtin;
pub mod delegate;
pub mod extended;
pub mod factory;
pub mod project;
pub mod template;

pub use factory::{SymbolFactory, SymbolRef};

/// Specifier that requests the `StaticNutClass()` handle accessor.
pub const NUT_CLASS_SPECIFIER: &str = "NutClass";

// ============================================================================
// Generator Table
// ============================================================================

/// A generator that ran for a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GeneratorKind {
    Delegate,
    SingletonHandle,
    GenericObject,
    Component,
    SpawnableActor,
    Subsystem,
    ComposableSettings,
    EffectEventHandler,
    /// Project rule, by position in the configured rule list.
    ProjectRule(usize),
}

impl fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeneratorKind::Delegate => write!(f, "delegate"),
            GeneratorKind::SingletonHandle => write!(f, "singleton_handle"),
            GeneratorKind::GenericObject => write!(f, "generic_object"),
            GeneratorKind::Component => write!(f, "component"),
            GeneratorKind::SpawnableActor => write!(f, "spawnable_actor"),
            GeneratorKind::Subsystem => write!(f, "subsystem"),
            GeneratorKind::ComposableSettings => write!(f, "composable_settings"),
            GeneratorKind::EffectEventHandler => write!(f, "effect_event_handler"),
            GeneratorKind::ProjectRule(index) => write!(f, "project_rule[{}]", index),
        }
    }
}

/// Read-only view of the class being synthesized.
pub struct SynthContext<'a> {
    pub db: &'a TypeDatabase,
    pub dbtype: &'a DbType,
    pub chain: AncestorChain,
    pub config: &'a Config,
}

impl<'a> SynthContext<'a> {
    pub fn new(db: &'a TypeDatabase, dbtype: &'a DbType, config: &'a Config) -> Self {
        SynthContext {
            db,
            dbtype,
            chain: db.ancestor_chain(dbtype.type_id),
            config,
        }
    }

    fn extended(&self) -> bool {
        self.config.script.extended_conventions
    }
}

/// One entry of the class generator table.
pub struct ClassGenerator {
    pub kind: GeneratorKind,
    pub applies: fn(&SynthContext<'_>) -> bool,
    pub run: fn(&SynthContext<'_>, &mut SymbolFactory),
}

fn has_nut_class(ctx: &SynthContext<'_>) -> bool {
    ctx.dbtype.has_specifier(NUT_CLASS_SPECIFIER)
}

fn allows_static_class(ctx: &SynthContext<'_>) -> bool {
    ctx.config.script.allows_static_class()
}

fn is_component(ctx: &SynthContext<'_>) -> bool {
    ctx.chain.contains(ACTOR_COMPONENT)
}

fn is_actor(ctx: &SynthContext<'_>) -> bool {
    ctx.chain.contains(AACTOR)
}

fn is_subsystem(ctx: &SynthContext<'_>) -> bool {
    ctx.chain.contains(SUBSYSTEM)
}

fn is_composable_settings(ctx: &SynthContext<'_>) -> bool {
    ctx.extended() && ctx.chain.contains(COMPOSABLE_SETTINGS)
}

fn is_effect_event_handler(ctx: &SynthContext<'_>) -> bool {
    ctx.extended()
        && ctx.chain.contains(EFFECT_EVENT_HANDLER)
        && !ctx.chain.contains(COMPOSABLE_SETTINGS)
}

/// Built-in generators for classes, in application order.
pub const CLASS_GENERATORS: &[ClassGenerator] = &[
    ClassGenerator {
        kind: GeneratorKind::SingletonHandle,
        applies: has_nut_class,
        run: builtin::singleton_handle,
    },
    ClassGenerator {
        kind: GeneratorKind::GenericObject,
        applies: allows_static_class,
        run: builtin::generic_object,
    },
    ClassGenerator {
        kind: GeneratorKind::Component,
        applies: is_component,
        run: builtin::component,
    },
    ClassGenerator {
        kind: GeneratorKind::SpawnableActor,
        applies: is_actor,
        run: builtin::spawnable_actor,
    },
    ClassGenerator {
        kind: GeneratorKind::Subsystem,
        applies: is_subsystem,
        run: builtin::subsystem,
    },
    ClassGenerator {
        kind: GeneratorKind::ComposableSettings,
        applies: is_composable_settings,
        run: extended::composable_settings,
    },
    ClassGenerator {
        kind: GeneratorKind::EffectEventHandler,
        applies: is_effect_event_handler,
        run: extended::effect_event_handler,
    },
];

// ============================================================================
// Dispatcher
// ============================================================================

/// What one synthesis run produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SynthesisSummary {
    pub type_id: TypeId,
    pub name: String,
    /// Generators applied, in order.
    pub applied: Vec<GeneratorKind>,
    /// Members added to the class.
    pub members: usize,
    /// Free functions added to namespaces.
    pub functions: usize,
}

impl SynthesisSummary {
    fn new(type_id: TypeId, name: impl Into<String>) -> Self {
        SynthesisSummary {
            type_id,
            name: name.into(),
            applied: Vec::new(),
            members: 0,
            functions: 0,
        }
    }

    pub fn generator_names(&self) -> Vec<String> {
        self.applied.iter().map(|kind| kind.to_string()).collect()
    }
}

/// Generate the synthetic symbols of one type.
///
/// Host types and unknown ids are left alone.
pub fn synthesize_type(db: &mut TypeDatabase, type_id: TypeId, config: &Config) -> SynthesisSummary {
    let Some(dbtype) = db.type_by_id(type_id) else {
        tracing::trace!(%type_id, "synthesis skipped: unknown type");
        return SynthesisSummary::new(type_id, "");
    };
    let mut summary = SynthesisSummary::new(type_id, dbtype.name.as_str());
    if dbtype.declared_module.is_none() {
        tracing::trace!(name = %dbtype.name, "synthesis skipped: host type");
        return summary;
    }
    let kind = dbtype.kind;

    db.clear_generated(type_id);

    let companion = if kind.is_value_type() || kind.is_delegate_like() {
        None
    } else {
        declare_companion(db, type_id)
    };

    let mut output = SynthesisOutput::new(type_id);
    if kind.is_value_type() {
        tracing::trace!(name = %summary.name, ?kind, "no generators for value type");
    } else if let Some(mut factory) = SymbolFactory::new(db, type_id, companion) {
        if let Some(dbtype) = db.type_by_id(type_id) {
            let ctx = SynthContext::new(db, dbtype, config);
            if kind.is_delegate_like() {
                delegate::delegate_members(&ctx, &mut factory);
                summary.applied.push(GeneratorKind::Delegate);
            } else {
                run_class_generators(&ctx, &mut factory, &mut summary.applied);
            }
        }
        output = factory.finish();
    }

    // Committed even when empty so stale module entries are pruned.
    summary.members = output.members.len();
    summary.functions = output.functions.len();
    db.apply_synthesis(output);
    match companion {
        Some(companion) => db.attach_companion(type_id, companion),
        None => db.detach_companion(type_id),
    }

    tracing::debug!(
        name = %summary.name,
        generators = ?summary.generator_names(),
        members = summary.members,
        functions = summary.functions,
        "synthesized type"
    );
    summary
}

fn declare_companion(db: &mut TypeDatabase, type_id: TypeId) -> Option<NamespaceId> {
    let dbtype = db.type_by_id(type_id)?;
    let decl = NamespaceDeclaration {
        declared_module: dbtype.declared_module,
        decl_span: dbtype.decl_span,
        scope_span: dbtype.scope_span,
    };
    let parent = dbtype.namespace;
    let name = dbtype.name.clone();
    Some(db.declare_namespace(parent, &name, decl))
}

fn run_class_generators(
    ctx: &SynthContext<'_>,
    factory: &mut SymbolFactory,
    applied: &mut Vec<GeneratorKind>,
) {
    for generator in CLASS_GENERATORS {
        if (generator.applies)(ctx) {
            (generator.run)(ctx, factory);
            tracing::debug!(class = %ctx.dbtype.name, generator = %generator.kind, "applied generator");
            applied.push(generator.kind);
        }
    }

    let code_generation = &ctx.config.code_generation;
    if !code_generation.enable {
        return;
    }
    for (index, rule) in code_generation.generators.iter().enumerate() {
        if ctx.chain.contains(&rule.derived_from) {
            project::apply_rule(ctx, rule, factory);
            tracing::debug!(class = %ctx.dbtype.name, derived_from = %rule.derived_from, "applied project rule");
            applied.push(GeneratorKind::ProjectRule(index));
        }
    }
}

/// Synthesize every type declared in a module, in declaration order.
pub fn synthesize_module(
    db: &mut TypeDatabase,
    module_id: ModuleId,
    config: &Config,
) -> Vec<SynthesisSummary> {
    db.types_in_module(module_id)
        .into_iter()
        .map(|type_id| synthesize_type(db, type_id, config))
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
