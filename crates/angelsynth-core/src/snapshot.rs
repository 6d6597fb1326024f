//! Script snapshots: parsed script declarations as JSON.
//!
//! A snapshot stands in for parser output. Loading it produces a
//! [`TypeDatabase`] seeded with the host types plus every declared module,
//! namespace, type and member, ready for synthesis.
//!
//! ```json
//! {
//!   "modules": [{
//!     "name": "Gameplay.Door",
//!     "types": [{
//!       "name": "UDoorComponent",
//!       "superclass": "UActorComponent",
//!       "span": [10, 40],
//!       "properties": [{ "name": "OpenAngle", "type": "float", "uproperty": true }]
//!     }]
//!   }]
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::db::host::is_host_type;
use crate::db::{
    DbArg, DbMethod, DbProperty, DbType, DelegateSignature, ModuleId, NamespaceDeclaration,
    NamespaceId, Span, TypeDatabase, TypeKind, ROOT_NAMESPACE,
};
use crate::error::{SynthError, SynthResult};

/// Root of a snapshot document.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ScriptSnapshot {
    #[serde(default)]
    pub modules: Vec<ModuleSnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModuleSnapshot {
    pub name: String,
    #[serde(default)]
    pub types: Vec<TypeSnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TypeSnapshot {
    pub name: String,
    #[serde(default)]
    pub kind: TypeKind,
    #[serde(default)]
    pub superclass: Option<String>,
    /// Enclosing namespace path (`A::B`), global when absent.
    #[serde(default)]
    pub namespace: Option<String>,
    /// Declaration header `[start, end)`.
    #[serde(default)]
    pub span: Option<(u64, u64)>,
    /// Declaration body `[start, end)`.
    #[serde(default)]
    pub scope: Option<(u64, u64)>,
    #[serde(default)]
    pub documentation: Option<String>,
    #[serde(default)]
    pub specifiers: Vec<String>,
    #[serde(default)]
    pub meta: BTreeMap<String, String>,
    #[serde(default)]
    pub delegate: Option<SignatureSnapshot>,
    #[serde(default)]
    pub properties: Vec<PropertySnapshot>,
    #[serde(default)]
    pub methods: Vec<MethodSnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct SignatureSnapshot {
    #[serde(default)]
    pub return_type: String,
    #[serde(default)]
    pub args: Vec<ArgSnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArgSnapshot {
    #[serde(rename = "type")]
    pub typename: String,
    pub name: String,
    #[serde(default)]
    pub default: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PropertySnapshot {
    pub name: String,
    #[serde(rename = "type")]
    pub typename: String,
    #[serde(default)]
    pub offset: Option<u64>,
    #[serde(default)]
    pub uproperty: bool,
    /// Inherited from a host type (no declaration site in script).
    #[serde(default)]
    pub host: bool,
    #[serde(default)]
    pub documentation: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MethodSnapshot {
    pub name: String,
    #[serde(default)]
    pub return_type: String,
    #[serde(default)]
    pub args: Vec<ArgSnapshot>,
    #[serde(default)]
    pub offset: Option<u64>,
    #[serde(default)]
    pub documentation: Option<String>,
    #[serde(default, rename = "const")]
    pub is_const: bool,
    #[serde(default)]
    pub property: bool,
    #[serde(default)]
    pub ufunction: bool,
    #[serde(default)]
    pub blueprint_event: bool,
    #[serde(default)]
    pub blueprint_override: bool,
}

impl From<&ArgSnapshot> for DbArg {
    fn from(arg: &ArgSnapshot) -> Self {
        DbArg {
            typename: arg.typename.clone(),
            name: arg.name.clone(),
            default_value: arg.default.clone(),
        }
    }
}

fn span_of(pair: (u64, u64), what: &str) -> SynthResult<Span> {
    let (start, end) = pair;
    if start > end {
        return Err(SynthError::snapshot(format!(
            "{}: span start {} is after end {}",
            what, start, end
        )));
    }
    Ok(Span::new(start, end))
}

impl ScriptSnapshot {
    pub fn from_json_str(content: &str) -> SynthResult<Self> {
        serde_json::from_str(content)
            .map_err(|e| SynthError::snapshot(format!("failed to parse snapshot: {}", e)))
    }

    pub fn load(path: &Path) -> SynthResult<Self> {
        if !path.exists() {
            return Err(SynthError::file_not_found(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Build a database holding the host types and every snapshot module.
    ///
    /// Returns the database and the module ids in snapshot order.
    pub fn into_database(self) -> SynthResult<(TypeDatabase, Vec<ModuleId>)> {
        let mut db = TypeDatabase::with_host_types();
        let mut module_ids = Vec::with_capacity(self.modules.len());

        for module in self.modules {
            let module_id = db.add_module(module.name.as_str());
            for ty in module.types {
                load_type(&mut db, module_id, ty)?;
            }
            tracing::debug!(module = %module.name, id = %module_id, "loaded module");
            module_ids.push(module_id);
        }

        Ok((db, module_ids))
    }
}

fn declare_path(
    db: &mut TypeDatabase,
    module_id: ModuleId,
    path: &str,
    decl_span: Span,
) -> NamespaceId {
    let decl = NamespaceDeclaration {
        declared_module: Some(module_id),
        decl_span,
        scope_span: None,
    };
    let mut current = ROOT_NAMESPACE;
    for part in path.split("::").filter(|p| !p.is_empty()) {
        current = db.declare_namespace(current, part, decl);
        db.merge_namespace(module_id, current);
    }
    current
}

fn load_type(db: &mut TypeDatabase, module_id: ModuleId, ty: TypeSnapshot) -> SynthResult<()> {
    let decl_span = match ty.span {
        Some(pair) => span_of(pair, &ty.name)?,
        None => Span::default(),
    };
    let namespace = match ty.namespace.as_deref() {
        Some(path) => declare_path(db, module_id, path, decl_span),
        None => ROOT_NAMESPACE,
    };
    if namespace == ROOT_NAMESPACE && is_host_type(&ty.name) {
        tracing::warn!(name = %ty.name, "script type shadows host type");
    }

    let type_id = db.next_type_id();
    let mut dbtype = DbType::new(type_id, ty.name.as_str(), ty.kind)
        .with_namespace(namespace)
        .declared_in(module_id, decl_span);
    if let Some(pair) = ty.scope {
        dbtype = dbtype.with_scope_span(span_of(pair, &ty.name)?);
    }
    if let Some(superclass) = ty.superclass {
        dbtype = dbtype.with_superclass(superclass);
    }
    if let Some(doc) = ty.documentation {
        dbtype = dbtype.with_documentation(doc);
    }
    if let Some(sig) = ty.delegate {
        dbtype = dbtype.with_delegate(DelegateSignature {
            return_type: sig.return_type,
            args: sig.args.iter().map(DbArg::from).collect(),
        });
    } else if ty.kind.is_delegate_like() {
        tracing::warn!(name = %ty.name, "delegate type without signature, assuming void()");
        dbtype = dbtype.with_delegate(DelegateSignature {
            return_type: "void".to_string(),
            args: Vec::new(),
        });
    }
    for specifier in ty.specifiers {
        dbtype = dbtype.with_specifier(specifier);
    }
    for (key, value) in ty.meta {
        dbtype = dbtype.with_meta(&key, value);
    }

    for prop in ty.properties {
        let mut dbprop = DbProperty::new(prop.name, prop.typename);
        dbprop.offset = prop.offset;
        dbprop.is_uproperty = prop.uproperty;
        dbprop.documentation = prop.documentation;
        if !prop.host {
            dbprop.declared_module = Some(module_id);
        }
        dbtype.add_symbol(dbprop);
    }

    for method in ty.methods {
        let mut dbmethod = DbMethod::new(method.name)
            .with_return_type(method.return_type)
            .with_args(method.args.iter().map(DbArg::from).collect());
        dbmethod.offset = method.offset;
        dbmethod.documentation = method.documentation;
        dbmethod.declared_module = Some(module_id);
        dbmethod.is_const = method.is_const;
        dbmethod.is_property = method.property;
        dbmethod.is_ufunction = method.ufunction;
        dbmethod.is_blueprint_event = method.blueprint_event;
        dbmethod.is_blueprint_override = method.blueprint_override;
        dbtype.add_symbol(dbmethod);
    }

    db.insert_type(dbtype);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"{
        "modules": [{
            "name": "Gameplay.Door",
            "types": [{
                "name": "UDoorComponent",
                "superclass": "UActorComponent",
                "namespace": "Doors",
                "span": [10, 40],
                "scope": [40, 200],
                "meta": { "RequireActorType": "ADoor" },
                "properties": [
                    { "name": "OpenAngle", "type": "float", "uproperty": true, "offset": 60 },
                    { "name": "Owner", "type": "AActor", "host": true }
                ],
                "methods": [
                    { "name": "OnOpened", "ufunction": true, "blueprint_event": true,
                      "args": [{ "type": "float", "name": "Angle" }] }
                ]
            }, {
                "name": "FOnDoorOpened",
                "kind": "event",
                "delegate": { "return_type": "void", "args": [{ "type": "int", "name": "Count" }] }
            }]
        }]
    }"#;

    #[test]
    fn snapshot_builds_database() {
        let snapshot = ScriptSnapshot::from_json_str(SAMPLE).unwrap();
        let (db, modules) = snapshot.into_database().unwrap();
        assert_eq!(modules.len(), 1);

        let types = db.types_in_module(modules[0]);
        assert_eq!(types.len(), 2);

        let door = db.type_by_id(types[0]).unwrap();
        assert_eq!(db.qualified_type_name(door.type_id).as_deref(), Some("Doors::UDoorComponent"));
        assert!(db.inherits_from(door.type_id, "UActorComponent"));
        assert_eq!(door.meta_value("requireactortype"), Some("ADoor"));
        assert_eq!(door.scope_span, Some(Span::new(40, 200)));

        let props: Vec<_> = door.properties().collect();
        assert!(props[0].is_uproperty);
        assert_eq!(props[0].declared_module, Some(modules[0]));
        assert_eq!(props[1].declared_module, None);

        let method = door.methods().next().unwrap();
        assert!(method.is_ufunction && method.is_blueprint_event);
        assert_eq!(method.args[0].name, "Angle");

        let event = db.type_by_id(types[1]).unwrap();
        assert_eq!(event.kind, TypeKind::Event);
        assert_eq!(event.delegate.as_ref().unwrap().args[0].typename, "int");

        let module = db.module(modules[0]).unwrap();
        assert_eq!(module.namespaces.len(), 1);
    }

    #[test]
    fn inverted_span_is_rejected() {
        let json = r#"{ "modules": [{ "name": "M", "types": [{ "name": "UBad", "span": [9, 3] }] }] }"#;
        let err = ScriptSnapshot::from_json_str(json)
            .unwrap()
            .into_database()
            .unwrap_err();
        assert!(matches!(err, SynthError::Snapshot { .. }));
    }

    #[test]
    fn malformed_json_is_snapshot_error() {
        let err = ScriptSnapshot::from_json_str("{ nope").unwrap_err();
        assert!(matches!(err, SynthError::Snapshot { .. }));
    }

    #[test]
    fn missing_file_is_reported() {
        let temp = TempDir::new().unwrap();
        let err = ScriptSnapshot::load(&temp.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, SynthError::FileNotFound { .. }));
    }

    #[test]
    fn delegate_without_signature_defaults_to_void() {
        let json = r#"{ "modules": [{ "name": "M", "types": [{ "name": "FOnPing", "kind": "delegate" }] }] }"#;
        let (db, modules) = ScriptSnapshot::from_json_str(json)
            .unwrap()
            .into_database()
            .unwrap();
        let ty = db.type_by_id(db.types_in_module(modules[0])[0]).unwrap();
        let sig = ty.delegate.as_ref().unwrap();
        assert_eq!(sig.return_type, "void");
        assert!(sig.args.is_empty());
    }

    #[test]
    fn script_type_shadows_host_type() {
        let json = r#"{ "modules": [{ "name": "M", "types": [{ "name": "AHazeActor", "superclass": "AActor" }] }] }"#;
        let (db, modules) = ScriptSnapshot::from_json_str(json)
            .unwrap()
            .into_database()
            .unwrap();
        let found = db.lookup_type(ROOT_NAMESPACE, "AHazeActor").unwrap();
        assert_eq!(found.declared_module, Some(modules[0]));
        assert!(db.inherits_from(found.type_id, "AActor"));
    }
}
