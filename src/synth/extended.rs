//! Extended conventions: composable settings assets and effect event handlers.

use angelsynth_core::db::{DbArg, DbMethod, DbProperty};

use super::{SymbolFactory, SymbolRef, SynthContext};

const SETTINGS_ACTOR: &str = "AHazeActor";
const SETTINGS_PRIORITY: &str = "EHazeSettingsPriority";
const SETTINGS_PRIORITY_DEFAULT: &str = "EHazeSettingsPriority::Script";

/// Meta key overriding the actor type of effect triggers.
pub const REQUIRE_ACTOR_TYPE: &str = "RequireActorType";

fn priority_arg() -> DbArg {
    DbArg::with_default(SETTINGS_PRIORITY, "Priority", SETTINGS_PRIORITY_DEFAULT)
}

/// Name used in `Set<Name>` / `Clear<Name>` for a settings property.
///
/// `bIsEnabled` becomes `IsEnabled`; `bias` and `Speed` are unchanged.
pub fn setter_suffix(name: &str) -> &str {
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some('b'), Some(second)) if second.is_ascii_uppercase() => &name[1..],
        _ => name,
    }
}

/// Settings accessors, plus override flag and setter pair per exposed property.
pub fn composable_settings(ctx: &SynthContext<'_>, factory: &mut SymbolFactory) {
    let class = ctx.dbtype.name.as_str();

    factory.new_companion_function(
        DbMethod::new("GetSettings")
            .with_return_type(class)
            .with_args(vec![DbArg::new(SETTINGS_ACTOR, "Actor")])
            .with_documentation("Get the result settings asset for a specific actor."),
    );
    factory.new_companion_function(
        DbMethod::new("TakeTransientSettings")
            .with_return_type(class)
            .with_args(vec![
                DbArg::new(SETTINGS_ACTOR, "Actor"),
                DbArg::new("FInstigator", "Instigator"),
                priority_arg(),
            ])
            .with_documentation("Grab a transient settings asset that can be used to temporarily overried values. Must be returned with Actor.ReturnTransientSettings to apply new values."),
    );

    for (index, prop) in ctx.dbtype.indexed_properties() {
        if !prop.is_uproperty || prop.is_auto_generated() {
            continue;
        }

        let mut flag = DbProperty::new(format!("bOverride_{}", prop.name), "bool");
        flag.offset = prop.offset;
        factory.new_property(flag);

        let suffix = setter_suffix(&prop.name);

        let mut setter = DbMethod::new(format!("Set{}", suffix))
            .with_return_type("void")
            .with_args(vec![
                DbArg::new(SETTINGS_ACTOR, "Actor"),
                DbArg::new(prop.typename.as_str(), "NewValue"),
                DbArg::new("FInstigator", "Instigator"),
                priority_arg(),
            ])
            .with_documentation("Apply a transient override for this composable settings property.");
        setter.offset = prop.offset;
        let setter = factory.new_companion_function(setter);

        let mut clear = DbMethod::new(format!("Clear{}", suffix))
            .with_return_type("void")
            .with_args(vec![
                DbArg::new(SETTINGS_ACTOR, "Actor"),
                DbArg::new("FInstigator", "Instigator"),
                priority_arg(),
            ])
            .with_documentation("Clear a previously applied transient override.");
        clear.offset = prop.offset;
        let clear = factory.new_companion_function(clear);

        let property = SymbolRef::Existing(index);
        factory.link(property, setter);
        factory.link(property, clear);
        factory.link(setter, clear);
    }
}

/// `Trigger_<Event>` free functions for bindable effect events.
///
/// Only blueprint events that are not overrides, take at most one argument
/// and return nothing qualify.
pub fn effect_event_handler(ctx: &SynthContext<'_>, factory: &mut SymbolFactory) {
    let actor_type = ctx
        .dbtype
        .meta_value(REQUIRE_ACTOR_TYPE)
        .unwrap_or(SETTINGS_ACTOR);
    let display_name = ctx.dbtype.display_name();

    for (index, method) in ctx.dbtype.indexed_methods() {
        let bindable = method.is_ufunction
            && method.is_blueprint_event
            && !method.is_blueprint_override
            && !method.is_auto_generated();
        if !bindable || method.args.len() > 1 || !method.returns_void() {
            continue;
        }

        let mut args = vec![DbArg::new(actor_type, "Actor")];
        if let Some(arg) = method.args.first() {
            args.push(DbArg::new(arg.typename.as_str(), arg.name.as_str()));
        }
        let documentation = method.documentation.clone().unwrap_or_else(|| {
            format!(
                "Trigger the effect event {} on all handlers for {}",
                method.name, display_name
            )
        });

        let mut trigger = DbMethod::new(format!("Trigger_{}", method.name))
            .with_return_type("void")
            .with_args(args)
            .with_documentation(documentation);
        trigger.offset = method.offset;
        let trigger = factory.new_companion_function(trigger);
        factory.link(trigger, SymbolRef::Existing(index));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::synthesize_type;
    use crate::synth::test_support::*;
    use angelsynth_core::config::Config;
    use angelsynth_core::db::{AuxiliarySymbol, DbNamespace, TypeDatabase, ROOT_NAMESPACE};

    fn extended_config() -> Config {
        let mut config = Config::default();
        config.script.extended_conventions = true;
        config
    }

    fn companion<'a>(db: &'a TypeDatabase, name: &str) -> &'a DbNamespace {
        let ns = db.find_namespace(ROOT_NAMESPACE, name).unwrap();
        db.namespace(ns).unwrap()
    }

    fn uproperty(name: &str, typename: &str, offset: u64) -> DbProperty {
        let mut prop = DbProperty::new(name, typename).with_offset(offset);
        prop.is_uproperty = true;
        prop
    }

    mod setter_names {
        use super::*;

        #[test]
        fn strips_boolean_prefix() {
            assert_eq!(setter_suffix("bIsEnabled"), "IsEnabled");
            assert_eq!(setter_suffix("bX"), "X");
        }

        #[test]
        fn keeps_other_names() {
            assert_eq!(setter_suffix("bias"), "bias");
            assert_eq!(setter_suffix("Speed"), "Speed");
            assert_eq!(setter_suffix("b"), "b");
            assert_eq!(setter_suffix("b_Flag"), "b_Flag");
            assert_eq!(setter_suffix(""), "");
        }
    }

    mod composable {
        use super::*;

        fn settings_db() -> (TypeDatabase, angelsynth_core::db::TypeId) {
            let (mut db, module) = script_db();
            let type_id = db.add_type(
                script_class(module, "UMoveSettings", "UHazeComposableSettings")
                    .with_property(uproperty("MaxSpeed", "float", 150))
                    .with_property(uproperty("bCanJump", "bool", 180))
                    .with_property(DbProperty::new("Scratch", "int")),
            );
            synthesize_type(&mut db, type_id, &extended_config());
            (db, type_id)
        }

        #[test]
        fn functions_per_exposed_property() {
            let (db, _) = settings_db();
            let names: Vec<_> = companion(&db, "UMoveSettings")
                .symbols
                .iter()
                .map(|f| f.name.as_str())
                .collect();
            assert_eq!(
                names,
                vec![
                    "StaticClass",
                    "GetSettings",
                    "TakeTransientSettings",
                    "SetMaxSpeed",
                    "ClearMaxSpeed",
                    "SetCanJump",
                    "ClearCanJump"
                ]
            );
        }

        #[test]
        fn override_flags_follow_property_offsets() {
            let (db, type_id) = settings_db();
            let settings = db.type_by_id(type_id).unwrap();
            let flags: Vec<_> = settings
                .properties()
                .filter(|p| p.is_auto_generated())
                .map(|p| (p.name.as_str(), p.typename.as_str(), p.offset))
                .collect();
            assert_eq!(
                flags,
                vec![
                    ("bOverride_MaxSpeed", "bool", Some(150)),
                    ("bOverride_bCanJump", "bool", Some(180))
                ]
            );
        }

        #[test]
        fn setter_signature() {
            let (db, _) = settings_db();
            let ns = companion(&db, "UMoveSettings");
            let setter = ns.find_functions("SetMaxSpeed").next().unwrap();
            let types: Vec<_> = setter.args.iter().map(|a| a.typename.as_str()).collect();
            assert_eq!(
                types,
                vec!["AHazeActor", "float", "FInstigator", "EHazeSettingsPriority"]
            );
            assert_eq!(
                setter.args[3].default_value.as_deref(),
                Some("EHazeSettingsPriority::Script")
            );
            assert_eq!(setter.offset, Some(150));

            let clear = ns.find_functions("ClearMaxSpeed").next().unwrap();
            assert_eq!(clear.args.len(), 3);
        }

        #[test]
        fn links_are_symmetric() {
            let (db, type_id) = settings_db();
            let settings = db.type_by_id(type_id).unwrap();
            let ns = companion(&db, "UMoveSettings");

            let prop = settings.properties().find(|p| p.name == "bCanJump").unwrap();
            assert_eq!(
                prop.auxiliary_symbols,
                vec![
                    AuxiliarySymbol::new("SetCanJump", "UMoveSettings"),
                    AuxiliarySymbol::new("ClearCanJump", "UMoveSettings"),
                ]
            );

            let setter = ns.find_functions("SetCanJump").next().unwrap();
            assert_eq!(
                setter.auxiliary_symbols,
                vec![
                    AuxiliarySymbol::new("bCanJump", "UMoveSettings"),
                    AuxiliarySymbol::new("ClearCanJump", "UMoveSettings"),
                ]
            );
            let clear = ns.find_functions("ClearCanJump").next().unwrap();
            assert_eq!(
                clear.auxiliary_symbols,
                vec![
                    AuxiliarySymbol::new("bCanJump", "UMoveSettings"),
                    AuxiliarySymbol::new("SetCanJump", "UMoveSettings"),
                ]
            );

            let scratch = settings.properties().find(|p| p.name == "Scratch").unwrap();
            assert!(scratch.auxiliary_symbols.is_empty());
        }

        #[test]
        fn rerun_does_not_duplicate_links() {
            let (mut db, type_id) = settings_db();
            synthesize_type(&mut db, type_id, &extended_config());
            let settings = db.type_by_id(type_id).unwrap();
            let prop = settings.properties().find(|p| p.name == "MaxSpeed").unwrap();
            assert_eq!(prop.auxiliary_symbols.len(), 2);
        }
    }

    mod effect_handler {
        use super::*;

        fn event(name: &str, args: Vec<DbArg>) -> DbMethod {
            let mut method = DbMethod::new(name).with_args(args).with_offset(300);
            method.is_ufunction = true;
            method.is_blueprint_event = true;
            method
        }

        #[test]
        fn triggers_for_qualifying_events() {
            let (mut db, module) = script_db();
            let mut overridden = event("OnOverride", vec![]);
            overridden.is_blueprint_override = true;
            let type_id = db.add_type(
                script_class(module, "UDoorEffects", "UHazeEffectEventHandler")
                    .with_meta("DisplayName", "Door Effects")
                    .with_method(event("OnOpened", vec![]))
                    .with_method(event("OnSlammed", vec![DbArg::new("float", "Force")]))
                    .with_method(event("OnTwoArgs", vec![DbArg::new("int", "A"), DbArg::new("int", "B")]))
                    .with_method(event("OnValue", vec![]).with_return_type("int"))
                    .with_method(overridden)
                    .with_method(DbMethod::new("Helper")),
            );

            synthesize_type(&mut db, type_id, &extended_config());

            let ns = companion(&db, "UDoorEffects");
            let triggers: Vec<_> = ns
                .symbols
                .iter()
                .filter(|f| f.name.starts_with("Trigger_"))
                .collect();
            let names: Vec<_> = triggers.iter().map(|f| f.name.as_str()).collect();
            assert_eq!(names, vec!["Trigger_OnOpened", "Trigger_OnSlammed"]);

            assert_eq!(triggers[0].args.len(), 1);
            assert_eq!(triggers[0].args[0].typename, "AHazeActor");
            assert_eq!(
                triggers[0].documentation.as_deref(),
                Some("Trigger the effect event OnOpened on all handlers for Door Effects")
            );
            assert_eq!(triggers[0].offset, Some(300));
            assert_eq!(triggers[1].args[1].name, "Force");

            let handler = db.type_by_id(type_id).unwrap();
            let opened = handler.methods().find(|m| m.name == "OnOpened").unwrap();
            assert_eq!(
                opened.auxiliary_symbols,
                vec![AuxiliarySymbol::new("Trigger_OnOpened", "UDoorEffects")]
            );
            assert_eq!(
                triggers[0].auxiliary_symbols,
                vec![AuxiliarySymbol::new("OnOpened", "UDoorEffects")]
            );
        }

        #[test]
        fn actor_type_from_meta() {
            let (mut db, module) = script_db();
            let type_id = db.add_type(
                script_class(module, "UDoorEffects", "UHazeEffectEventHandler")
                    .with_meta("RequireActorType", "ADoor")
                    .with_method(event("OnOpened", vec![]).with_documentation("Door swung open.")),
            );

            synthesize_type(&mut db, type_id, &extended_config());

            let trigger = companion(&db, "UDoorEffects")
                .find_functions("Trigger_OnOpened")
                .next()
                .unwrap();
            assert_eq!(trigger.args[0].typename, "ADoor");
            assert_eq!(trigger.documentation.as_deref(), Some("Door swung open."));
        }
    }
}
