//! Members of delegate and event types.
//!
//! Events (multicast) get broadcast and add/unbind members. Single-cast
//! delegates get execute and bind members, two property-style getters, and
//! a constructor function named after the type in the type's own namespace.

use angelsynth_core::db::{DbArg, DbMethod, DelegateBind, TypeKind};

use super::{SymbolFactory, SynthContext};

fn signature(ctx: &SynthContext<'_>) -> (String, Vec<DbArg>) {
    match &ctx.dbtype.delegate {
        Some(sig) => (
            sig.return_type.clone(),
            sig.args
                .iter()
                .map(|arg| DbArg::new(arg.typename.as_str(), arg.name.as_str()))
                .collect(),
        ),
        None => ("void".to_string(), Vec::new()),
    }
}

fn bind_function(name: &str, bind_type: &str, documentation: &str) -> DbMethod {
    DbMethod::new(name)
        .with_return_type("void")
        .with_args(vec![
            DbArg::new("UObject", "Object"),
            DbArg::new("FName", "FunctionName"),
        ])
        .with_documentation(documentation)
        .with_delegate_bind(DelegateBind {
            bind_type: bind_type.to_string(),
            object_param: 0,
            function_param: 1,
        })
}

/// Generate the members of a delegate or event type.
pub fn delegate_members(ctx: &SynthContext<'_>, factory: &mut SymbolFactory) {
    let class = ctx.dbtype.name.as_str();
    let (return_type, args) = signature(ctx);

    factory.new_member(
        DbMethod::new("IsBound")
            .with_return_type("bool")
            .with_documentation("Whether the anything is bound to the delegate."),
    );
    factory.new_member(
        DbMethod::new("Clear")
            .with_return_type("void")
            .with_documentation("Remove all bindings from the delegate."),
    );

    if ctx.dbtype.kind == TypeKind::Event {
        factory.new_member(
            DbMethod::new("Broadcast")
                .with_return_type(return_type)
                .with_args(args)
                .with_documentation("Broadcast event to all existing bindings."),
        );
        factory.new_member(bind_function(
            "AddUFunction",
            class,
            "Add a new binding to this event. Make sure the function you're binding is a UFUNCTION().",
        ));
        factory.new_member(bind_function(
            "Unbind",
            class,
            "Unbind a specific function that was previously added to this event.",
        ));
        factory.new_member(
            DbMethod::new("UnbindObject")
                .with_return_type("void")
                .with_args(vec![DbArg::new("UObject", "Object")])
                .with_documentation(
                    "Unbind all previously added functions that are called on the specified object.",
                ),
        );
        return;
    }

    factory.new_member(
        DbMethod::new("Execute")
            .with_return_type(return_type.as_str())
            .with_args(args.clone())
            .with_documentation(
                "Execute the function bound to the delegate. Will throw an error if nothing is bound, use ExecuteIfBound() if you do not want an error in that case.",
            ),
    );
    factory.new_member(
        DbMethod::new("ExecuteIfBound")
            .with_return_type(return_type)
            .with_args(args)
            .with_documentation(
                "Execute the function if one is bound to the delegate, otherwise do nothing.",
            ),
    );
    factory.new_member(bind_function(
        "BindUFunction",
        class,
        "Set the function that is bound to this delegate. Make sure the function you're binding is a UFUNCTION().",
    ));
    factory.new_member(
        DbMethod::new("GetUObject")
            .with_return_type("UObject")
            .with_documentation("Get the object that this delegate is bound to. Returns nullptr if unbound.")
            .as_property(),
    );
    factory.new_member(
        DbMethod::new("GetFunctionName")
            .with_return_type("FName")
            .with_documentation("Get the function that this delegate is bound to. Returns NAME_None if unbound.")
            .as_property(),
    );

    let mut constructor = DbMethod::new(class)
        .with_return_type(class)
        .with_args(vec![
            DbArg::with_default("UObject", "Object", "nullptr"),
            DbArg::with_default("FName", "FunctionName", "NAME_None"),
        ])
        .as_constructor();
    constructor.documentation = ctx.dbtype.documentation.clone();
    let namespace = factory.enclosing();
    factory.new_free_function(namespace, constructor);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::synthesize_type;
    use crate::synth::test_support::script_db;
    use angelsynth_core::config::Config;
    use angelsynth_core::db::{
        DbType, DelegateSignature, NamespaceDeclaration, Span, TypeDatabase, TypeId,
        ROOT_NAMESPACE,
    };

    fn names(db: &TypeDatabase, type_id: TypeId) -> Vec<String> {
        db.type_by_id(type_id)
            .unwrap()
            .methods()
            .map(|m| m.name.clone())
            .collect()
    }

    #[test]
    fn event_members_are_exact() {
        let (mut db, module) = script_db();
        let type_id = db.add_type(
            DbType::new(TypeId::new(0), "FOnScored", TypeKind::Event)
                .declared_in(module, Span::new(5, 50))
                .with_delegate(DelegateSignature {
                    return_type: "void".to_string(),
                    args: vec![DbArg::new("int", "Points"), DbArg::new("FString", "Reason")],
                }),
        );

        synthesize_type(&mut db, type_id, &Config::default());

        assert_eq!(
            names(&db, type_id),
            vec!["IsBound", "Clear", "Broadcast", "AddUFunction", "Unbind", "UnbindObject"]
        );
        let event = db.type_by_id(type_id).unwrap();
        let broadcast = event.methods().find(|m| m.name == "Broadcast").unwrap();
        assert_eq!(broadcast.args.len(), 2);
        assert_eq!(broadcast.args[1].typename, "FString");

        let add = event.methods().find(|m| m.name == "AddUFunction").unwrap();
        let bind = add.delegate_bind.as_ref().unwrap();
        assert_eq!(bind.bind_type, "FOnScored");
        assert_eq!((bind.object_param, bind.function_param), (0, 1));
        assert!(event
            .methods()
            .find(|m| m.name == "Unbind")
            .unwrap()
            .delegate_bind
            .is_some());

        // Events get no free functions.
        assert!(db.root_namespace().find_functions("FOnScored").next().is_none());
        assert!(db.module(module).unwrap().global_symbols.is_empty());
    }

    #[test]
    fn single_cast_members_and_constructor() {
        let (mut db, module) = script_db();
        let type_id = db.add_type(
            DbType::new(TypeId::new(0), "FCanOpen", TypeKind::Delegate)
                .declared_in(module, Span::new(5, 50))
                .with_documentation("Asked before a door opens.")
                .with_delegate(DelegateSignature {
                    return_type: "bool".to_string(),
                    args: Vec::new(),
                }),
        );

        synthesize_type(&mut db, type_id, &Config::default());

        assert_eq!(
            names(&db, type_id),
            vec![
                "IsBound",
                "Clear",
                "Execute",
                "ExecuteIfBound",
                "BindUFunction",
                "GetUObject",
                "GetFunctionName"
            ]
        );
        let delegate = db.type_by_id(type_id).unwrap();
        let execute = delegate.methods().find(|m| m.name == "Execute").unwrap();
        assert_eq!(execute.return_type, "bool");
        assert!(execute.args.is_empty());
        assert!(delegate.methods().filter(|m| m.name.starts_with("Get")).all(|m| m.is_property));

        let constructors: Vec<_> = db.root_namespace().find_functions("FCanOpen").collect();
        assert_eq!(constructors.len(), 1);
        let ctor = constructors[0];
        assert!(ctor.is_constructor);
        assert_eq!(ctor.return_type, "FCanOpen");
        assert_eq!(ctor.documentation.as_deref(), Some("Asked before a door opens."));
        assert_eq!(ctor.args[0].default_value.as_deref(), Some("nullptr"));
        assert_eq!(ctor.args[1].default_value.as_deref(), Some("NAME_None"));
        assert_eq!(db.lookup_global(module, "FCanOpen").len(), 1);
    }

    #[test]
    fn constructor_goes_into_enclosing_namespace() {
        let (mut db, module) = script_db();
        let ns = db.declare_namespace(
            ROOT_NAMESPACE,
            "Doors",
            NamespaceDeclaration {
                declared_module: Some(module),
                decl_span: Span::new(0, 4),
                scope_span: None,
            },
        );
        let type_id = db.add_type(
            DbType::new(TypeId::new(0), "FOnKnock", TypeKind::Delegate)
                .with_namespace(ns)
                .declared_in(module, Span::new(5, 50)),
        );

        synthesize_type(&mut db, type_id, &Config::default());

        assert_eq!(db.namespace(ns).unwrap().find_functions("FOnKnock").count(), 1);
        assert!(db.root_namespace().find_functions("FOnKnock").next().is_none());
    }

    #[test]
    fn missing_signature_is_void() {
        let (mut db, module) = script_db();
        let type_id = db.add_type(
            DbType::new(TypeId::new(0), "FOnPing", TypeKind::Delegate)
                .declared_in(module, Span::new(5, 50)),
        );
        synthesize_type(&mut db, type_id, &Config::default());

        let delegate = db.type_by_id(type_id).unwrap();
        let execute = delegate.methods().find(|m| m.name == "Execute").unwrap();
        assert_eq!(execute.return_type, "void");
    }
}
