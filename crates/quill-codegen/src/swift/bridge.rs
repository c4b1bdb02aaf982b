//! Moving values across the C surface from Swift.
//!
//! Scalars pass straight through. Strings, enums and interface handles are
//! converted inline. Collections that travel as container handles go through
//! `fileprivate` helpers, one `read` and one `make` per collection type, built
//! on the generic container API.

use std::collections::BTreeMap;
use std::fmt::Write;

use quill_syntax::{PrimitiveType, Type};

use super::types::{mangle, swift_type, SwiftNames};
use crate::c_abi::naming::{container_function, ContainerKind};
use crate::c_abi::types::{as_collection, c_repr};
use crate::context::{NamespaceContext, RefKind};

pub(super) const INDENT: &str = "    ";

/// A Swift value lowered for a C call: statements to run first, then the argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lowered {
    pub setup: Vec<String>,
    pub value: String,
}

impl Lowered {
    fn inline(value: String) -> Self {
        Self { setup: Vec::new(), value }
    }
}

pub struct Bridge<'c, 'a> {
    pub ctx: &'c NamespaceContext<'a>,
    pub names: &'c SwiftNames,
}

pub fn container_kind(collection: &Type) -> Option<ContainerKind> {
    match collection {
        Type::Array { .. } => Some(ContainerKind::Array),
        Type::Dict { .. } => Some(ContainerKind::Dict),
        Type::Set { .. } => Some(ContainerKind::Set),
        _ => None,
    }
}

/// Literal for an empty value of a collection type.
pub fn empty_literal(collection: &Type) -> &'static str {
    match collection {
        Type::Dict { .. } => "[:]",
        _ => "[]",
    }
}

impl<'c, 'a> Bridge<'c, 'a> {
    pub fn new(ctx: &'c NamespaceContext<'a>, names: &'c SwiftNames) -> Self {
        Self { ctx, names }
    }

    pub fn swift_type(&self, ty: &Type) -> String {
        swift_type(ty, self.ctx, self.names)
    }

    /// The type behind `ty` with typedefs and one level of nullability removed.
    fn split<'t>(&self, ty: &'t Type) -> (&'t Type, bool)
    where
        'a: 't,
    {
        match self.ctx.unalias(ty) {
            Type::Nullable { inner } => (self.ctx.unalias(inner), true),
            other => (other, false),
        }
    }

    /// Swift expression for the C expression `expr` of IDL type `ty`.
    pub fn from_c(&self, expr: &str, ty: &Type) -> String {
        let (base, nullable) = self.split(ty);
        if base.is_collection() {
            return format!("read{}({expr})", mangle(base, self.ctx, self.names));
        }
        match base {
            Type::Primitive { name: PrimitiveType::String } if nullable => {
                format!("{expr}.map {{ String(cString: $0) }}")
            }
            Type::Primitive { name: PrimitiveType::String } => {
                format!("{expr}.map {{ String(cString: $0) }} ?? \"\"")
            }
            Type::TypeRef { name } if name != "void" => match self.ctx.resolve(name) {
                RefKind::Enum(decl) if nullable => format!("{}(cValue: {expr})", decl.name),
                RefKind::Enum(decl) => format!("{}(cValue: {expr})!", decl.name),
                RefKind::Interface if nullable => {
                    format!("{expr}.map {{ {}(handle: $0) }}", self.names.class_name(name))
                }
                RefKind::Interface => format!("{}(handle: {expr}!)", self.names.class_name(name)),
                RefKind::Typedef(_) => expr.to_string(),
            },
            _ => expr.to_string(),
        }
    }

    /// Lower the Swift variable `name` of IDL type `ty` to a C argument.
    pub fn to_c(&self, name: &str, ty: &Type) -> Lowered {
        let (base, nullable) = self.split(ty);
        if let Some(kind) = container_kind(base) {
            let make = format!("make{}", mangle(base, self.ctx, self.names));
            let var = format!("{}Handle", name.trim_matches('`'));
            let create = if nullable {
                format!("let {var} = {name}.flatMap({make})")
            } else {
                format!("let {var} = {make}({name})")
            };
            let release = container_function(self.ctx.name(), kind, "Release");
            return Lowered { setup: vec![create, format!("defer {{ {release}({var}) }}")], value: var };
        }
        let value = match base {
            Type::Primitive { name: primitive } if nullable && primitive.is_scalar() => {
                let zero = if *primitive == PrimitiveType::Bool { "false" } else { "0" };
                format!("{name} ?? {zero}")
            }
            Type::TypeRef { name: ty_name } if ty_name != "void" => match self.ctx.resolve(ty_name) {
                RefKind::Enum(_) if nullable => format!("{name}?.cValue ?? 0"),
                RefKind::Enum(_) => format!("{name}.cValue"),
                RefKind::Interface if nullable => format!("{name}?.handle"),
                RefKind::Interface => format!("{name}.handle"),
                RefKind::Typedef(_) => name.to_string(),
            },
            _ => name.to_string(),
        };
        Lowered::inline(value)
    }

    /// Every collection type that crosses as a container handle, by helper name.
    pub fn handle_collections(&self) -> BTreeMap<String, Type> {
        let mut found = BTreeMap::new();
        for interface in self.ctx.interfaces() {
            for property in &interface.properties {
                self.require_elements(&property.ty, &mut found);
            }
            for method in &interface.methods {
                self.require_elements(&method.return_type, &mut found);
                for param in &method.parameters {
                    self.require(&param.ty, &mut found);
                }
            }
        }
        found
    }

    fn require(&self, ty: &Type, found: &mut BTreeMap<String, Type>) {
        let Some(collection) = as_collection(ty, self.ctx) else {
            return;
        };
        found
            .entry(mangle(collection, self.ctx, self.names))
            .or_insert_with(|| collection.clone());
        self.require_elements(collection, found);
    }

    fn require_elements(&self, ty: &Type, found: &mut BTreeMap<String, Type>) {
        match as_collection(ty, self.ctx) {
            Some(Type::Array { element }) | Some(Type::Set { element }) => self.require(element, found),
            Some(Type::Dict { key, value }) => {
                self.require(key, found);
                self.require(value, found);
            }
            _ => {}
        }
    }

    fn generic(&self, kind: ContainerKind, operation: &str, element: &Type) -> String {
        let suffix = c_repr(element, self.ctx).map(|r| r.suffix().to_string()).unwrap_or_default();
        container_function(self.ctx.name(), kind, &format!("{operation}{suffix}"))
    }

    /// `read<M>` and `make<M>` for one handle-crossing collection type.
    pub fn helpers(&self, mangled: &str, collection: &Type) -> String {
        let Some(kind) = container_kind(collection) else {
            return String::new();
        };
        let ns = self.ctx.name();
        let swift = self.swift_type(collection);
        let empty = empty_literal(collection);
        let i2 = INDENT.repeat(2);

        let mut out = String::new();
        let _ = writeln!(out, "fileprivate func read{mangled}(_ container: OpaquePointer?) -> {swift} {{");
        let _ = writeln!(out, "{INDENT}guard let container = container else {{");
        let _ = writeln!(out, "{i2}return {empty}");
        let _ = writeln!(out, "{INDENT}}}");
        let _ = writeln!(out, "{INDENT}defer {{ {}(container) }}", container_function(ns, kind, "Release"));
        let _ = writeln!(out, "{INDENT}var result: {swift} = {empty}");
        let _ = writeln!(out, "{INDENT}let count = {}(container)", container_function(ns, kind, "Count"));
        let _ = writeln!(out, "{INDENT}for position in 0..<count {{");
        match collection {
            Type::Dict { key, value } => {
                let key_call = format!("{}(container, position)", self.generic(kind, "Key", key));
                let value_call = format!("{}(container, position)", self.generic(kind, "Value", value));
                let _ = writeln!(out, "{i2}let key = {}", self.from_c(&key_call, key));
                let _ = writeln!(out, "{i2}result[key] = {}", self.from_c(&value_call, value));
            }
            Type::Array { element } | Type::Set { element } => {
                let call = format!("{}(container, position)", self.generic(kind, "Get", element));
                let add = if kind == ContainerKind::Set { "insert" } else { "append" };
                let _ = writeln!(out, "{i2}result.{add}({})", self.from_c(&call, element));
            }
            _ => {}
        }
        let _ = writeln!(out, "{INDENT}}}");
        let _ = writeln!(out, "{INDENT}return result");
        out.push_str("}\n\n");

        let _ = writeln!(out, "fileprivate func make{mangled}(_ values: {swift}) -> OpaquePointer? {{");
        let _ = writeln!(out, "{INDENT}let container = {}()", container_function(ns, kind, "Create"));
        match collection {
            Type::Dict { key, value } => {
                let _ = writeln!(out, "{INDENT}for (key, value) in values {{");
                let key_arg = self.to_c("key", key);
                let value_arg = self.to_c("value", value);
                for line in key_arg.setup.iter().chain(&value_arg.setup) {
                    let _ = writeln!(out, "{i2}{line}");
                }
                let insert = container_function(
                    ns,
                    kind,
                    &format!(
                        "Insert{}{}",
                        c_repr(key, self.ctx).map(|r| r.suffix().to_string()).unwrap_or_default(),
                        c_repr(value, self.ctx).map(|r| r.suffix().to_string()).unwrap_or_default()
                    ),
                );
                let _ = writeln!(out, "{i2}{insert}(container, {}, {})", key_arg.value, value_arg.value);
            }
            Type::Array { element } | Type::Set { element } => {
                let _ = writeln!(out, "{INDENT}for item in values {{");
                let item = self.to_c("item", element);
                for line in &item.setup {
                    let _ = writeln!(out, "{i2}{line}");
                }
                let add = if kind == ContainerKind::Set { "Insert" } else { "Append" };
                let _ = writeln!(out, "{i2}{}(container, {})", self.generic(kind, add, element), item.value);
            }
            _ => {}
        }
        let _ = writeln!(out, "{INDENT}}}");
        let _ = writeln!(out, "{INDENT}return container");
        out.push_str("}\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_syntax::parse;

    fn with_bridge(source: &str, check: impl FnOnce(&Bridge<'_, '_>)) {
        let file = parse(source).unwrap();
        let validated = quill_resolve::validate(&file).unwrap();
        let (ns, table) = validated.namespaces().next().unwrap();
        let ctx = NamespaceContext::new(ns, table);
        let names = SwiftNames::new(&ctx, true);
        check(&Bridge::new(&ctx, &names));
    }

    const SOURCE: &str = "namespace Ex {
        enum Level : int32_t { LOW = 0 }
        interface IUser { }
        typedef string_t Name;
    }";

    #[test]
    fn values_from_c() {
        with_bridge(SOURCE, |bridge| {
            let s = Type::primitive(PrimitiveType::String);
            assert_eq!(bridge.from_c("f()", &s), "f().map { String(cString: $0) } ?? \"\"");
            assert_eq!(bridge.from_c("f()", &Type::nullable(s.clone())), "f().map { String(cString: $0) }");
            assert_eq!(bridge.from_c("f()", &Type::type_ref("Name")), "f().map { String(cString: $0) } ?? \"\"");
            assert_eq!(bridge.from_c("f()", &Type::type_ref("Level")), "Level(cValue: f())!");
            assert_eq!(bridge.from_c("f()", &Type::type_ref("IUser")), "User(handle: f()!)");
            assert_eq!(
                bridge.from_c("f()", &Type::nullable(Type::type_ref("IUser"))),
                "f().map { User(handle: $0) }"
            );
            assert_eq!(bridge.from_c("f()", &Type::array(s)), "readArrayString(f())");
            assert_eq!(bridge.from_c("f()", &Type::primitive(PrimitiveType::Int64)), "f()");
        });
    }

    #[test]
    fn values_to_c() {
        with_bridge(SOURCE, |bridge| {
            let int = Type::primitive(PrimitiveType::Int32);
            assert_eq!(bridge.to_c("x", &int).value, "x");
            assert_eq!(bridge.to_c("x", &Type::nullable(int.clone())).value, "x ?? 0");
            assert_eq!(bridge.to_c("x", &Type::nullable(Type::primitive(PrimitiveType::Bool))).value, "x ?? false");
            assert_eq!(bridge.to_c("x", &Type::type_ref("Level")).value, "x.cValue");
            assert_eq!(bridge.to_c("x", &Type::nullable(Type::type_ref("Level"))).value, "x?.cValue ?? 0");
            assert_eq!(bridge.to_c("x", &Type::nullable(Type::type_ref("IUser"))).value, "x?.handle");

            let lowered = bridge.to_c("ids", &Type::set(int));
            assert_eq!(lowered.value, "idsHandle");
            assert_eq!(
                lowered.setup,
                ["let idsHandle = makeSetInt32(ids)", "defer { Ex_Set_Release(idsHandle) }"]
            );
        });
    }
}
