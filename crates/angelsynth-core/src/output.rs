//! JSON output types for CLI responses.
//!
//! All CLI output is a single JSON document on stdout:
//! - [`SynthesisResponse`] on success
//! - [`ErrorResponse`] on failure
//!
//! Symbols are rendered in registration order, which is also the order
//! completion lists present them in.

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use crate::db::{DbArg, DbMethod, DbProperty, DbSymbol, TypeDatabase, TypeId};
use crate::error::SynthError;

/// Version of the JSON output schema.
pub const SCHEMA_VERSION: &str = "1";

// ============================================================================
// Symbol Output
// ============================================================================

/// A rendered argument.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArgOutput {
    #[serde(rename = "type")]
    pub typename: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl From<&DbArg> for ArgOutput {
    fn from(arg: &DbArg) -> Self {
        ArgOutput {
            typename: arg.typename.clone(),
            name: arg.name.clone(),
            default: arg.default_value.clone(),
        }
    }
}

/// A rendered auxiliary link.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LinkOutput {
    pub symbol: String,
    pub container: String,
}

/// A rendered method, property or free function.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SymbolOutput {
    pub name: String,
    /// `"method"` or `"property"`.
    pub kind: String,
    /// Return type for methods, value type for properties.
    #[serde(rename = "type")]
    pub typename: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<ArgOutput>,
    /// Set flags (`generated`, `property`, `const`, `constructor`, `delegate_bind`).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<LinkOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
}

impl SymbolOutput {
    pub fn from_method(method: &DbMethod) -> Self {
        let flags = [
            (method.is_auto_generated(), "generated"),
            (method.is_property, "property"),
            (method.is_const, "const"),
            (method.is_constructor, "constructor"),
            (method.delegate_bind.is_some(), "delegate_bind"),
        ]
        .into_iter()
        .filter(|(set, _)| *set)
        .map(|(_, flag)| flag.to_string())
        .collect();

        SymbolOutput {
            name: method.name.clone(),
            kind: "method".to_string(),
            typename: method.return_type.clone(),
            args: method.args.iter().map(ArgOutput::from).collect(),
            flags,
            links: method
                .auxiliary_symbols
                .iter()
                .map(|aux| LinkOutput {
                    symbol: aux.symbol_name.clone(),
                    container: aux.container_type.clone(),
                })
                .collect(),
            offset: method.offset,
            documentation: method.documentation.clone(),
        }
    }

    pub fn from_property(prop: &DbProperty) -> Self {
        let mut flags = Vec::new();
        if prop.is_auto_generated() {
            flags.push("generated".to_string());
        }
        SymbolOutput {
            name: prop.name.clone(),
            kind: "property".to_string(),
            typename: prop.typename.clone(),
            args: Vec::new(),
            flags,
            links: prop
                .auxiliary_symbols
                .iter()
                .map(|aux| LinkOutput {
                    symbol: aux.symbol_name.clone(),
                    container: aux.container_type.clone(),
                })
                .collect(),
            offset: prop.offset,
            documentation: prop.documentation.clone(),
        }
    }

    pub fn from_symbol(symbol: &DbSymbol) -> Self {
        match symbol {
            DbSymbol::Method(method) => Self::from_method(method),
            DbSymbol::Property(prop) => Self::from_property(prop),
        }
    }
}

/// A synthesized free function with its namespace.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FunctionOutput {
    /// Qualified namespace (`""` for global).
    pub namespace: String,
    #[serde(flatten)]
    pub symbol: SymbolOutput,
}

// ============================================================================
// Type Output
// ============================================================================

/// Synthesis result for one type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TypeOutput {
    pub name: String,
    pub qualified_name: String,
    pub kind: String,
    /// Generators applied, in order.
    pub generators: Vec<String>,
    /// All members of the type (user-written and generated).
    pub members: Vec<SymbolOutput>,
    /// Free functions generated for the type.
    pub functions: Vec<FunctionOutput>,
}

impl TypeOutput {
    /// Render a type from the database. Returns `None` for unknown types.
    pub fn from_db(db: &TypeDatabase, type_id: TypeId, generators: Vec<String>) -> Option<Self> {
        let dbtype = db.type_by_id(type_id)?;
        let qualified_name = db.qualified_type_name(type_id)?;

        let members = dbtype.symbols().iter().map(SymbolOutput::from_symbol).collect();

        let mut functions = Vec::new();
        let mut namespace_ids: Vec<_> = db
            .modules()
            .flat_map(|m| m.namespaces.iter().copied())
            .collect();
        namespace_ids.push(dbtype.namespace);
        namespace_ids.sort();
        namespace_ids.dedup();
        for ns_id in namespace_ids {
            let Some(ns) = db.namespace(ns_id) else {
                continue;
            };
            let qualified = db.qualified_namespace(ns_id);
            functions.extend(
                ns.symbols
                    .iter()
                    .filter(|f| f.generated_by == Some(type_id))
                    .map(|f| FunctionOutput {
                        namespace: qualified.clone(),
                        symbol: SymbolOutput::from_method(f),
                    }),
            );
        }

        Some(TypeOutput {
            name: dbtype.name.clone(),
            qualified_name,
            kind: format!("{:?}", dbtype.kind).to_lowercase(),
            generators,
            members,
            functions,
        })
    }
}

// ============================================================================
// Responses
// ============================================================================

/// Successful synthesis response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SynthesisResponse {
    pub status: String,
    pub schema_version: String,
    pub types: Vec<TypeOutput>,
}

impl SynthesisResponse {
    pub fn new(types: Vec<TypeOutput>) -> Self {
        SynthesisResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            types,
        }
    }
}

/// Error details.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorInfo {
    pub code: u8,
    pub kind: String,
    pub message: String,
}

/// Error response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub status: String,
    pub schema_version: String,
    pub error: ErrorInfo,
}

impl From<&SynthError> for ErrorResponse {
    fn from(err: &SynthError) -> Self {
        ErrorResponse {
            status: "error".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            error: ErrorInfo {
                code: err.error_code().code(),
                kind: err.kind_name().to_string(),
                message: err.to_string(),
            },
        }
    }
}

/// Emit a response as pretty-printed JSON to a writer.
pub fn emit_response<T: Serialize>(response: &T, writer: &mut impl Write) -> io::Result<()> {
    let json = serde_json::to_string_pretty(response)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{}", json)
}

// ============================================================================
// Tests
// ============================================================================
