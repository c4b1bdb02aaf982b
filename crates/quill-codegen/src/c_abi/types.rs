//! IDL type to C type mapping.

use quill_syntax::{PrimitiveType, Type};

use super::naming::{container_handle, handle_type, ContainerKind};
use crate::context::{NamespaceContext, RefKind};

/// How a value is represented at the C boundary, independent of its IDL type.
///
/// Names the typed variants of the generic container API, e.g. the
/// `Int32` in `Example_Array_GetInt32`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CRepr {
    Bool,
    Int32,
    Int64,
    Float,
    Double,
    String,
    /// An opaque handle; holds the handle type name.
    Handle(String),
}

impl CRepr {
    pub fn c_type(&self) -> String {
        match self {
            CRepr::Bool => "bool".to_string(),
            CRepr::Int32 => "int32_t".to_string(),
            CRepr::Int64 => "int64_t".to_string(),
            CRepr::Float => "float".to_string(),
            CRepr::Double => "double".to_string(),
            CRepr::String => "const char*".to_string(),
            CRepr::Handle(name) => name.clone(),
        }
    }

    /// Suffix used in generic container function names.
    pub fn suffix(&self) -> &str {
        match self {
            CRepr::Bool => "Bool",
            CRepr::Int32 => "Int32",
            CRepr::Int64 => "Int64",
            CRepr::Float => "Float",
            CRepr::Double => "Double",
            CRepr::String => "String",
            CRepr::Handle(name) => name.strip_suffix("_Handle").unwrap_or(name),
        }
    }
}

pub fn primitive_c_type(primitive: PrimitiveType) -> &'static str {
    match primitive {
        PrimitiveType::Void => "void",
        PrimitiveType::Bool => "bool",
        PrimitiveType::Int32 => "int32_t",
        PrimitiveType::Int64 => "int64_t",
        PrimitiveType::Float => "float",
        PrimitiveType::Double => "double",
        PrimitiveType::String => "const char*",
    }
}

/// Map an IDL type to its C spelling.
///
/// Enums keep their integer typedef name, interfaces become handles and every
/// container collapses to the namespace's container handle. Nullability is
/// erased: handles and strings use `NULL`, numbers and bools have no null.
pub fn c_type(ty: &Type, ctx: &NamespaceContext<'_>) -> String {
    match ty {
        Type::Primitive { name } => primitive_c_type(*name).to_string(),
        Type::TypeRef { name } if name == "void" => "void".to_string(),
        Type::TypeRef { name } => match ctx.resolve(name) {
            RefKind::Enum(_) | RefKind::Typedef(_) => name.clone(),
            RefKind::Interface => handle_type(name),
        },
        Type::Array { .. } => container_handle(ctx.name(), ContainerKind::Array),
        Type::Dict { .. } => container_handle(ctx.name(), ContainerKind::Dict),
        Type::Set { .. } => container_handle(ctx.name(), ContainerKind::Set),
        Type::Nullable { inner } => c_type(inner, ctx),
    }
}

/// Boundary representation of a value type, looking through typedefs and
/// nullability. `None` only for `void`.
pub fn c_repr(ty: &Type, ctx: &NamespaceContext<'_>) -> Option<CRepr> {
    match ctx.unalias(ty) {
        Type::Primitive { name } => match name {
            PrimitiveType::Void => None,
            PrimitiveType::Bool => Some(CRepr::Bool),
            PrimitiveType::Int32 => Some(CRepr::Int32),
            PrimitiveType::Int64 => Some(CRepr::Int64),
            PrimitiveType::Float => Some(CRepr::Float),
            PrimitiveType::Double => Some(CRepr::Double),
            PrimitiveType::String => Some(CRepr::String),
        },
        Type::TypeRef { name } if name == "void" => None,
        Type::TypeRef { name } => match ctx.resolve(name) {
            RefKind::Enum(decl) if decl.backing == PrimitiveType::Int64 => Some(CRepr::Int64),
            RefKind::Enum(_) => Some(CRepr::Int32),
            // unalias already followed every typedef
            RefKind::Typedef(target) => c_repr(target, ctx),
            RefKind::Interface => Some(CRepr::Handle(handle_type(name))),
        },
        Type::Array { .. } => Some(CRepr::Handle(container_handle(ctx.name(), ContainerKind::Array))),
        Type::Dict { .. } => Some(CRepr::Handle(container_handle(ctx.name(), ContainerKind::Dict))),
        Type::Set { .. } => Some(CRepr::Handle(container_handle(ctx.name(), ContainerKind::Set))),
        Type::Nullable { inner } => c_repr(inner, ctx),
    }
}

/// The collection behind `ty`, looking through typedefs and one level of
/// nullability (a null collection reads as empty).
pub fn as_collection<'t>(ty: &'t Type, ctx: &NamespaceContext<'t>) -> Option<&'t Type> {
    let ty = match ctx.unalias(ty) {
        Type::Nullable { inner } => ctx.unalias(inner),
        other => other,
    };
    ty.is_collection().then_some(ty)
}
