//! Host framework types.
//!
//! These are registered before any script types so that superclass and
//! property type lookups resolve. Host types have no declaring module.

use super::{DbType, TypeDatabase, TypeKind};

pub const UOBJECT: &str = "UObject";
pub const UCLASS: &str = "UClass";
pub const AACTOR: &str = "AActor";
pub const ACTOR_COMPONENT: &str = "UActorComponent";
pub const SUBSYSTEM: &str = "USubsystem";
pub const LOCAL_PLAYER_SUBSYSTEM: &str = "ULocalPlayerSubsystem";
pub const COMPOSABLE_SETTINGS: &str = "UHazeComposableSettings";
pub const EFFECT_EVENT_HANDLER: &str = "UHazeEffectEventHandler";

/// (name, kind, superclass)
const HOST_TYPES: &[(&str, TypeKind, Option<&str>)] = &[
    ("bool", TypeKind::Primitive, None),
    ("int", TypeKind::Primitive, None),
    ("int64", TypeKind::Primitive, None),
    ("uint8", TypeKind::Primitive, None),
    ("float", TypeKind::Primitive, None),
    ("float32", TypeKind::Primitive, None),
    ("float64", TypeKind::Primitive, None),
    ("double", TypeKind::Primitive, None),
    ("FString", TypeKind::Struct, None),
    ("FName", TypeKind::Struct, None),
    ("FText", TypeKind::Struct, None),
    ("FVector", TypeKind::Struct, None),
    ("FRotator", TypeKind::Struct, None),
    ("FTransform", TypeKind::Struct, None),
    ("FLinearColor", TypeKind::Struct, None),
    ("FInstigator", TypeKind::Struct, None),
    ("FNutClassHandle", TypeKind::Struct, None),
    ("EHazeSettingsPriority", TypeKind::Enum, None),
    (UOBJECT, TypeKind::Class, None),
    (UCLASS, TypeKind::Class, Some(UOBJECT)),
    (AACTOR, TypeKind::Class, Some(UOBJECT)),
    ("APawn", TypeKind::Class, Some(AACTOR)),
    ("ACharacter", TypeKind::Class, Some("APawn")),
    ("AController", TypeKind::Class, Some(AACTOR)),
    ("APlayerController", TypeKind::Class, Some("AController")),
    ("AHazeActor", TypeKind::Class, Some(AACTOR)),
    ("ULevel", TypeKind::Class, Some(UOBJECT)),
    ("ULocalPlayer", TypeKind::Class, Some(UOBJECT)),
    ("UDataAsset", TypeKind::Class, Some(UOBJECT)),
    (ACTOR_COMPONENT, TypeKind::Class, Some(UOBJECT)),
    ("USceneComponent", TypeKind::Class, Some(ACTOR_COMPONENT)),
    ("UPrimitiveComponent", TypeKind::Class, Some("USceneComponent")),
    ("UStaticMeshComponent", TypeKind::Class, Some("UPrimitiveComponent")),
    (SUBSYSTEM, TypeKind::Class, Some(UOBJECT)),
    ("UWorldSubsystem", TypeKind::Class, Some(SUBSYSTEM)),
    ("UGameInstanceSubsystem", TypeKind::Class, Some(SUBSYSTEM)),
    (LOCAL_PLAYER_SUBSYSTEM, TypeKind::Class, Some(SUBSYSTEM)),
    ("UScriptWorldSubsystem", TypeKind::Class, Some("UWorldSubsystem")),
    ("UScriptLocalPlayerSubsystem", TypeKind::Class, Some(LOCAL_PLAYER_SUBSYSTEM)),
    (COMPOSABLE_SETTINGS, TypeKind::Class, Some("UDataAsset")),
    (EFFECT_EVENT_HANDLER, TypeKind::Class, Some(UOBJECT)),
];

/// Register the host framework types into the root namespace.
pub(super) fn seed_host_types(db: &mut TypeDatabase) {
    for (name, kind, superclass) in HOST_TYPES {
        let type_id = db.next_type_id();
        let mut dbtype = DbType::new(type_id, *name, *kind);
        if let Some(superclass) = superclass {
            dbtype = dbtype.with_superclass(*superclass);
        }
        db.insert_type(dbtype);
    }
}

/// Whether `name` is one of the seeded host types.
pub fn is_host_type(name: &str) -> bool {
    HOST_TYPES.iter().any(|(host, _, _)| *host == name)
}
