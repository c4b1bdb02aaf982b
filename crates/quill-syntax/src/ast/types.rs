use std::fmt;

use serde::{Deserialize, Serialize};

/// Built-in scalar types of the IDL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveType {
    #[serde(rename = "void")]
    Void,
    #[serde(rename = "bool")]
    Bool,
    #[serde(rename = "int32_t")]
    Int32,
    #[serde(rename = "int64_t")]
    Int64,
    #[serde(rename = "float")]
    Float,
    #[serde(rename = "double")]
    Double,
    #[serde(rename = "string_t")]
    String,
}

impl PrimitiveType {
    pub const ALL: [PrimitiveType; 7] = [
        PrimitiveType::Void,
        PrimitiveType::Bool,
        PrimitiveType::Int32,
        PrimitiveType::Int64,
        PrimitiveType::Float,
        PrimitiveType::Double,
        PrimitiveType::String,
    ];

    /// Spelling of the primitive in IDL source.
    pub fn idl_name(self) -> &'static str {
        match self {
            PrimitiveType::Void => "void",
            PrimitiveType::Bool => "bool",
            PrimitiveType::Int32 => "int32_t",
            PrimitiveType::Int64 => "int64_t",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
            PrimitiveType::String => "string_t",
        }
    }

    pub fn from_idl_name(name: &str) -> Option<PrimitiveType> {
        PrimitiveType::ALL.into_iter().find(|p| p.idl_name() == name)
    }

    /// Integer, floating point and boolean primitives have value semantics
    /// and no natural null state.
    pub fn is_scalar(self) -> bool {
        !matches!(self, PrimitiveType::Void | PrimitiveType::String)
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.idl_name())
    }
}

/// The IDL type algebra.
///
/// Containers and `Nullable` nest arbitrarily; every consumer is expected to
/// match exhaustively over the variants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Type {
    Primitive { name: PrimitiveType },
    /// Reference to an interface, enum or typedef declared in the same namespace.
    TypeRef { name: String },
    Array { element: Box<Type> },
    Dict { key: Box<Type>, value: Box<Type> },
    Set { element: Box<Type> },
    Nullable { inner: Box<Type> },
}

impl Type {
    pub fn primitive(name: PrimitiveType) -> Type {
        Type::Primitive { name }
    }

    pub fn type_ref(name: impl Into<String>) -> Type {
        Type::TypeRef { name: name.into() }
    }

    pub fn array(element: Type) -> Type {
        Type::Array { element: Box::new(element) }
    }

    pub fn dict(key: Type, value: Type) -> Type {
        Type::Dict { key: Box::new(key), value: Box::new(value) }
    }

    pub fn set(element: Type) -> Type {
        Type::Set { element: Box::new(element) }
    }

    pub fn nullable(inner: Type) -> Type {
        Type::Nullable { inner: Box::new(inner) }
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, Type::Primitive { .. })
    }

    pub fn is_void(&self) -> bool {
        match self {
            Type::Primitive { name } => *name == PrimitiveType::Void,
            Type::TypeRef { name } => name == "void",
            _ => false,
        }
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, Type::Array { .. } | Type::Dict { .. } | Type::Set { .. })
    }

    pub fn is_nullable(&self) -> bool {
        matches!(self, Type::Nullable { .. })
    }

    /// The type with one level of `Nullable` removed, if present.
    pub fn strip_nullable(&self) -> &Type {
        match self {
            Type::Nullable { inner } => inner,
            other => other,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Primitive { name } => write!(f, "{name}"),
            Type::TypeRef { name } => f.write_str(name),
            Type::Array { element } => write!(f, "{element}[]"),
            Type::Dict { key, value } => write!(f, "dict<{key}, {value}>"),
            Type::Set { element } => write!(f, "set<{element}>"),
            Type::Nullable { inner } => write!(f, "{inner}?"),
        }
    }
}
