//! Project-declared generator rules.
//!
//! A rule applies to every class whose ancestor chain contains its
//! `derivedFrom`. Function templates are expanded once with `{class}`.
//! Accessor templates are expanded once per script-declared property whose
//! type resolves, with `{class}`, `{propType}` and `{propName}`, and may
//! further require the property type to derive from a given class.

use angelsynth_core::config::{FunctionTemplate, GeneratorRule};
use angelsynth_core::db::{DbArg, DbMethod, TypeId};

use super::template::Tokens;
use super::{SymbolFactory, SynthContext};

fn expand_method(template: &FunctionTemplate, tokens: &Tokens) -> DbMethod {
    DbMethod::new(tokens.expand(&template.name))
        .with_return_type(tokens.expand(&template.return_type))
        .with_args(
            template
                .args
                .iter()
                .map(|arg| DbArg::new(tokens.expand(&arg.typename), tokens.expand(&arg.name)))
                .collect(),
        )
}

fn expand_member(template: &FunctionTemplate, tokens: &Tokens) -> DbMethod {
    let mut method = expand_method(template, tokens);
    method.is_const = template.is_const;
    method.is_property = template.property;
    method
}

/// Whether an accessor template applies to a property of the given type.
fn accessor_applies(ctx: &SynthContext<'_>, template: &FunctionTemplate, prop_type: TypeId) -> bool {
    match &template.derived_from {
        Some(base) => ctx.db.inherits_from(prop_type, base),
        None => true,
    }
}

/// Apply one rule to the class in `ctx`.
///
/// The caller has already checked the rule's `derivedFrom` against the
/// class's chain.
pub fn apply_rule(ctx: &SynthContext<'_>, rule: &GeneratorRule, factory: &mut SymbolFactory) {
    let class = ctx.dbtype.name.as_str();
    let tokens = Tokens::class(class);

    for template in &rule.static_functions {
        factory.new_companion_function(expand_method(template, &tokens));
    }
    for template in &rule.member_functions {
        factory.new_member(expand_member(template, &tokens));
    }

    if rule.static_accessors.is_empty() && rule.member_accessors.is_empty() {
        return;
    }

    for prop in ctx.dbtype.properties() {
        if prop.is_auto_generated() || prop.declared_module.is_none() {
            continue;
        }
        let Some(prop_type) = ctx.db.lookup_type(ctx.dbtype.namespace, &prop.typename) else {
            tracing::trace!(class, property = %prop.name, typename = %prop.typename, "accessors skipped: unresolved type");
            continue;
        };
        let tokens = Tokens::property(class, &prop_type.name, &prop.name);

        for template in &rule.static_accessors {
            if accessor_applies(ctx, template, prop_type.type_id) {
                factory.new_companion_function(expand_method(template, &tokens));
            }
        }
        for template in &rule.member_accessors {
            if accessor_applies(ctx, template, prop_type.type_id) {
                factory.new_member(expand_member(template, &tokens));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::test_support::*;
    use crate::synth::{synthesize_type, GeneratorKind};
    use angelsynth_core::config::{ArgumentTemplate, Config};
    use angelsynth_core::db::{DbProperty, TypeDatabase, ROOT_NAMESPACE};

    fn template(name: &str, return_type: &str) -> FunctionTemplate {
        FunctionTemplate {
            name: name.to_string(),
            return_type: return_type.to_string(),
            ..Default::default()
        }
    }

    fn config_with(rule: GeneratorRule) -> Config {
        let mut config = Config::default();
        config.script.disallow_static_class = true;
        config.code_generation.enable = true;
        config.code_generation.generators.push(rule);
        config
    }

    fn companion_names(db: &TypeDatabase, class: &str) -> Vec<String> {
        let ns = db.find_namespace(ROOT_NAMESPACE, class).unwrap();
        db.namespace(ns)
            .unwrap()
            .symbols
            .iter()
            .map(|f| f.name.clone())
            .collect()
    }

    fn host_property(name: &str, typename: &str) -> DbProperty {
        DbProperty::new(name, typename)
    }

    fn script_property(db: &TypeDatabase, name: &str, typename: &str) -> DbProperty {
        let mut prop = DbProperty::new(name, typename);
        prop.declared_module = db.modules().next().map(|m| m.module_id);
        prop
    }

    mod functions {
        use super::*;

        #[test]
        fn static_and_member_templates_expand_class() {
            let (mut db, module) = script_db();
            let type_id = db.add_type(script_class(module, "UDoor", "UObject"));
            let mut member = template("Describe{class}", "FString");
            member.is_const = true;
            member.property = true;
            member.args = vec![ArgumentTemplate {
                typename: "{class}".to_string(),
                name: "Other{class}".to_string(),
            }];
            let config = config_with(GeneratorRule {
                derived_from: "UObject".to_string(),
                static_functions: vec![template("Find{class}", "{class}")],
                member_functions: vec![member],
                ..Default::default()
            });

            let summary = synthesize_type(&mut db, type_id, &config);

            assert_eq!(summary.applied, vec![GeneratorKind::ProjectRule(0)]);
            assert_eq!(companion_names(&db, "UDoor"), vec!["FindUDoor"]);
            let door = db.type_by_id(type_id).unwrap();
            let describe = door.methods().next().unwrap();
            assert_eq!(describe.name, "DescribeUDoor");
            assert!(describe.is_const && describe.is_property);
            assert!(describe.is_auto_generated());
            assert_eq!(describe.args[0].typename, "UDoor");
            assert_eq!(describe.args[0].name, "OtherUDoor");
        }

        #[test]
        fn rules_need_enable_and_matching_ancestor() {
            let (mut db, module) = script_db();
            let type_id = db.add_type(script_class(module, "UDoor", "UObject"));
            let rule = GeneratorRule {
                derived_from: "AActor".to_string(),
                static_functions: vec![template("Find{class}", "{class}")],
                ..Default::default()
            };

            let summary = synthesize_type(&mut db, type_id, &config_with(rule.clone()));
            assert!(summary.applied.is_empty());

            let mut disabled = config_with(GeneratorRule {
                derived_from: "UObject".to_string(),
                ..rule
            });
            disabled.code_generation.enable = false;
            let summary = synthesize_type(&mut db, type_id, &disabled);
            assert!(summary.applied.is_empty());
            assert!(companion_names(&db, "UDoor").is_empty());
        }

        #[test]
        fn unknown_derived_from_is_a_non_match() {
            let (mut db, module) = script_db();
            let type_id = db.add_type(script_class(module, "UDoor", "UObject"));
            let config = config_with(GeneratorRule {
                derived_from: "UNoSuchClass".to_string(),
                static_functions: vec![template("Find{class}", "{class}")],
                ..Default::default()
            });
            let summary = synthesize_type(&mut db, type_id, &config);
            assert!(summary.applied.is_empty());
        }

        #[test]
        fn rules_apply_in_configured_order() {
            let (mut db, module) = script_db();
            let type_id = db.add_type(script_class(module, "UDoorComponent", "UActorComponent"));
            let mut config = config_with(GeneratorRule {
                derived_from: "UActorComponent".to_string(),
                static_functions: vec![template("First", "void")],
                ..Default::default()
            });
            config.code_generation.generators.push(GeneratorRule {
                derived_from: "UObject".to_string(),
                static_functions: vec![template("Second", "void")],
                ..Default::default()
            });

            let summary = synthesize_type(&mut db, type_id, &config);

            assert_eq!(
                summary.applied,
                vec![
                    GeneratorKind::Component,
                    GeneratorKind::ProjectRule(0),
                    GeneratorKind::ProjectRule(1)
                ]
            );
            assert_eq!(
                companion_names(&db, "UDoorComponent"),
                vec!["Get", "GetOrCreate", "Create", "First", "Second"]
            );
        }
    }

    mod accessors {
        use super::*;

        fn accessor_rule() -> GeneratorRule {
            let mut member = template("Get{propName}", "{propType}");
            member.derived_from = Some("UActorComponent".to_string());
            member.is_const = true;
            GeneratorRule {
                derived_from: "AActor".to_string(),
                static_accessors: vec![template("Set{propName}On{class}", "void")],
                member_accessors: vec![member],
                ..Default::default()
            }
        }

        #[test]
        fn accessors_per_resolved_script_property() {
            let (mut db, module) = script_db();
            let class = script_class(module, "ADoor", "AActor");
            let class = class
                .with_property(script_property(&db, "Mesh", "UStaticMeshComponent"))
                .with_property(script_property(&db, "Angle", "float"))
                .with_property(script_property(&db, "Missing", "UNotAType"))
                .with_property(host_property("RootComponent", "USceneComponent"));
            let type_id = db.add_type(class);

            let mut config = config_with(accessor_rule());
            config.script.disallow_static_class = true;
            synthesize_type(&mut db, type_id, &config);

            assert_eq!(
                companion_names(&db, "ADoor"),
                vec!["Spawn", "SetMeshOnADoor", "SetAngleOnADoor"]
            );
            let door = db.type_by_id(type_id).unwrap();
            let getters: Vec<_> = door
                .methods()
                .map(|m| (m.name.as_str(), m.return_type.as_str(), m.is_const))
                .collect();
            assert_eq!(getters, vec![("GetMesh", "UStaticMeshComponent", true)]);
        }

        #[test]
        fn no_accessor_lists_emit_nothing_per_property() {
            let (mut db, module) = script_db();
            let class = script_class(module, "UDoor", "UObject")
                .with_property(script_property(&db, "Mesh", "UStaticMeshComponent"));
            let type_id = db.add_type(class);
            let config = config_with(GeneratorRule {
                derived_from: "UObject".to_string(),
                ..Default::default()
            });

            let summary = synthesize_type(&mut db, type_id, &config);

            assert_eq!(summary.applied, vec![GeneratorKind::ProjectRule(0)]);
            assert_eq!(summary.members, 0);
            assert_eq!(summary.functions, 0);
        }
    }
}
