//! Host-convention generators: class handles, components, actors, subsystems.
//!
//! All of these add free functions to the companion namespace, in the order
//! completion lists show them.

use angelsynth_core::db::host::LOCAL_PLAYER_SUBSYSTEM;
use angelsynth_core::db::{DbArg, DbMethod};

use super::{SymbolFactory, SynthContext};

/// `StaticNutClass()` for classes carrying the `NutClass` specifier.
pub fn singleton_handle(_ctx: &SynthContext<'_>, factory: &mut SymbolFactory) {
    factory.new_companion_function(
        DbMethod::new("StaticNutClass")
            .with_return_type("FNutClassHandle")
            .with_documentation(
                "Gets the NutClass descriptor for the class generated for the specified type.",
            ),
    );
}

/// `StaticClass()` for every class.
pub fn generic_object(_ctx: &SynthContext<'_>, factory: &mut SymbolFactory) {
    factory.new_companion_function(
        DbMethod::new("StaticClass")
            .with_return_type("UClass")
            .with_documentation("Gets the descriptor for the class generated for the specified type."),
    );
}

fn component_args() -> Vec<DbArg> {
    vec![
        DbArg::new("AActor", "Actor"),
        DbArg::with_default("FName", "WithName", "NAME_None"),
    ]
}

/// `Get`, `GetOrCreate` and `Create` for actor components.
pub fn component(ctx: &SynthContext<'_>, factory: &mut SymbolFactory) {
    let class = ctx.dbtype.name.as_str();
    let functions = [
        (
            "Get",
            "Get the component of this type from an actor. Specified name is optional.",
        ),
        (
            "GetOrCreate",
            "Get a component of a particular type on an actor, create it if it doesn't exist. Specified name is optional.",
        ),
        (
            "Create",
            "Always create a new component of this type on an actor.",
        ),
    ];
    for (name, documentation) in functions {
        factory.new_companion_function(
            DbMethod::new(name)
                .with_return_type(class)
                .with_args(component_args())
                .with_documentation(documentation),
        );
    }
}

/// `Spawn(...)` for actors.
pub fn spawnable_actor(ctx: &SynthContext<'_>, factory: &mut SymbolFactory) {
    factory.new_companion_function(
        DbMethod::new("Spawn")
            .with_return_type(ctx.dbtype.name.as_str())
            .with_args(vec![
                DbArg::with_default("FVector", "Location", "FVector::ZeroVector"),
                DbArg::with_default("FRotator", "Rotation", "FRotator::ZeroRotator"),
                DbArg::with_default("FName", "Name", "NAME_None"),
                DbArg::with_default("bool", "bDeferredSpawn", "false"),
                DbArg::with_default("ULevel", "Level", "nullptr"),
            ])
            .with_documentation("Spawn a new actor of this type into the world."),
    );
}

/// `Get` accessors for subsystems.
///
/// Local player subsystems are keyed by the player; all others are global.
pub fn subsystem(ctx: &SynthContext<'_>, factory: &mut SymbolFactory) {
    let class = ctx.dbtype.name.as_str();
    let display_name = ctx.dbtype.display_name();

    if ctx.chain.contains(LOCAL_PLAYER_SUBSYSTEM) {
        factory.new_companion_function(
            DbMethod::new("Get")
                .with_return_type(class)
                .with_args(vec![DbArg::new("ULocalPlayer", "LocalPlayer")])
                .with_documentation(format!(
                    "Get the {} subsystem for this local player.",
                    display_name
                )),
        );
        factory.new_companion_function(
            DbMethod::new("Get")
                .with_return_type(class)
                .with_args(vec![DbArg::new("APlayerController", "PlayerController")])
                .with_documentation(format!(
                    "Get the {} subsystem for this player controller.",
                    display_name
                )),
        );
    } else {
        factory.new_companion_function(
            DbMethod::new("Get")
                .with_return_type(class)
                .with_documentation(format!("Get the relevant {} subsystem.", display_name)),
        );
    }
}

#[cfg(test)]
mod tests {
    #[allow(unused_imports)]
    use super::*;
    use crate::synth::test_support::*;
    use crate::synth::synthesize_type;
    use angelsynth_core::config::Config;
    use angelsynth_core::db::{DbNamespace, TypeDatabase, TypeId, ROOT_NAMESPACE};

    fn companion<'a>(db: &'a TypeDatabase, name: &str) -> &'a DbNamespace {
        let ns = db.find_namespace(ROOT_NAMESPACE, name).unwrap();
        db.namespace(ns).unwrap()
    }

    fn synthesize(parent: &str, name: &str) -> (TypeDatabase, TypeId) {
        let (mut db, module) = script_db();
        let type_id = db.add_type(script_class(module, name, parent));
        synthesize_type(&mut db, type_id, &Config::default());
        (db, type_id)
    }

    mod component {
        use super::*;

        #[test]
        fn get_get_or_create_create_in_order() {
            let (db, type_id) = synthesize("USceneComponent", "UDoorComponent");
            let ns = companion(&db, "UDoorComponent");

            let component_fns: Vec<_> = ns.symbols.iter().filter(|f| f.name != "StaticClass").collect();
            let names: Vec<_> = component_fns.iter().map(|f| f.name.as_str()).collect();
            assert_eq!(names, vec!["Get", "GetOrCreate", "Create"]);

            for function in component_fns {
                assert_eq!(function.return_type, "UDoorComponent");
                assert_eq!(function.args.len(), 2);
                assert_eq!(function.args[0].typename, "AActor");
                assert_eq!(function.args[0].default_value, None);
                assert_eq!(function.args[1].typename, "FName");
                assert_eq!(function.args[1].default_value.as_deref(), Some("NAME_None"));
                assert_eq!(function.generated_by, Some(type_id));
                assert_eq!(function.offset, Some(100));
            }
        }
    }

    mod actor {
        use super::*;

        #[test]
        fn spawn_has_defaults() {
            let (db, _) = synthesize("ACharacter", "AHero");
            let spawn = companion(&db, "AHero").find_functions("Spawn").next().unwrap();

            assert_eq!(spawn.return_type, "AHero");
            let defaults: Vec<_> = spawn
                .args
                .iter()
                .map(|a| a.default_value.as_deref().unwrap_or(""))
                .collect();
            assert_eq!(
                defaults,
                vec![
                    "FVector::ZeroVector",
                    "FRotator::ZeroRotator",
                    "NAME_None",
                    "false",
                    "nullptr"
                ]
            );
            assert_eq!(spawn.args[3].name, "bDeferredSpawn");
        }

        #[test]
        fn plain_object_is_not_spawnable() {
            let (db, _) = synthesize("UObject", "UData");
            assert!(companion(&db, "UData").find_functions("Spawn").next().is_none());
        }
    }

    mod subsystem {
        use super::*;

        #[test]
        fn world_subsystem_has_single_get() {
            let (db, _) = synthesize("UScriptWorldSubsystem", "UWeatherSubsystem");
            let gets: Vec<_> = companion(&db, "UWeatherSubsystem").find_functions("Get").collect();
            assert_eq!(gets.len(), 1);
            assert!(gets[0].args.is_empty());
            assert_eq!(
                gets[0].documentation.as_deref(),
                Some("Get the relevant UWeatherSubsystem subsystem.")
            );
        }

        #[test]
        fn local_player_subsystem_has_two_overloads() {
            let (db, _) = synthesize("UScriptLocalPlayerSubsystem", "UHudSubsystem");
            let gets: Vec<_> = companion(&db, "UHudSubsystem").find_functions("Get").collect();
            assert_eq!(gets.len(), 2);
            assert_eq!(gets[0].args[0].typename, "ULocalPlayer");
            assert_eq!(gets[1].args[0].typename, "APlayerController");
            assert!(gets.iter().all(|g| g.return_type == "UHudSubsystem"));
        }

        #[test]
        fn documentation_uses_display_name() {
            let (mut db, module) = script_db();
            let type_id = db.add_type(
                script_class(module, "UInventorySubsystem", "UGameInstanceSubsystem")
                    .with_meta("DisplayName", "Inventory"),
            );
            synthesize_type(&mut db, type_id, &Config::default());

            let get = companion(&db, "UInventorySubsystem").find_functions("Get").next().unwrap();
            assert_eq!(
                get.documentation.as_deref(),
                Some("Get the relevant Inventory subsystem.")
            );
        }
    }

    mod handles {
        use super::*;

        #[test]
        fn nut_class_handle_and_static_class() {
            let (mut db, module) = script_db();
            let type_id = db.add_type(
                script_class(module, "UPickup", "UObject").with_specifier("NutClass"),
            );
            synthesize_type(&mut db, type_id, &Config::default());

            let ns = companion(&db, "UPickup");
            let handle = ns.find_functions("StaticNutClass").next().unwrap();
            assert_eq!(handle.return_type, "FNutClassHandle");
            assert!(handle.args.is_empty());
            let class = ns.find_functions("StaticClass").next().unwrap();
            assert_eq!(class.return_type, "UClass");
        }

        #[test]
        fn deprecated_static_class_is_omitted() {
            let (mut db, module) = script_db();
            let type_id = db.add_type(script_class(module, "UPickup", "UObject"));
            let mut config = Config::default();
            config.script.deprecate_static_class = true;
            synthesize_type(&mut db, type_id, &config);

            assert!(companion(&db, "UPickup").symbols.is_empty());
        }
    }
}
