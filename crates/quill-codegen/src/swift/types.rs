//! Swift spelling of IDL types and names.

use fxhash::FxHashSet;
use quill_syntax::{PrimitiveType, Type};

use crate::context::{NamespaceContext, RefKind};

const KEYWORDS: &[&str] = &[
    "Any", "Self", "Type", "as", "associatedtype", "break", "case", "catch", "class", "continue",
    "default", "defer", "deinit", "do", "else", "enum", "extension", "fallthrough", "false",
    "fileprivate", "for", "func", "guard", "if", "import", "in", "init", "inout", "internal", "is",
    "let", "nil", "operator", "private", "protocol", "public", "repeat", "rethrows", "return",
    "self", "static", "struct", "subscript", "super", "switch", "throw", "throws", "true", "try",
    "typealias", "var", "where", "while",
];

/// Identifiers the generated bodies declare themselves. Parameters with these
/// names get a distinct internal name.
const RESERVED_LOCALS: &[&str] = &["handle", "result", "count", "position", "item", "key", "value", "newValue"];

/// Decides the Swift names of interfaces for one namespace.
#[derive(Debug)]
pub struct SwiftNames {
    strip_prefix: bool,
    /// Every type name declared in the namespace.
    taken: FxHashSet<String>,
}

impl SwiftNames {
    pub fn new(ctx: &NamespaceContext<'_>, strip_prefix: bool) -> Self {
        let ns = ctx.namespace();
        let taken = ctx
            .interface_names()
            .iter()
            .map(|name| name.to_string())
            .chain(ns.enums.iter().map(|e| e.name.clone()))
            .chain(ns.typedefs.iter().map(|t| t.name.clone()))
            .collect();
        Self { strip_prefix, taken }
    }

    /// `IUser` becomes `User` unless stripping is off, the second letter is
    /// not uppercase (`Item` stays `Item`) or `User` is already declared.
    pub fn class_name(&self, interface: &str) -> String {
        if !self.strip_prefix {
            return interface.to_string();
        }
        let mut chars = interface.chars();
        match (chars.next(), chars.next()) {
            (Some('I'), Some(second)) if second.is_ascii_uppercase() => {
                let stripped = &interface[1..];
                if self.taken.contains(stripped) {
                    interface.to_string()
                } else {
                    stripped.to_string()
                }
            }
            _ => interface.to_string(),
        }
    }
}

pub fn primitive_swift_type(primitive: PrimitiveType) -> &'static str {
    match primitive {
        PrimitiveType::Void => "Void",
        PrimitiveType::Bool => "Bool",
        PrimitiveType::Int32 => "Int32",
        PrimitiveType::Int64 => "Int64",
        PrimitiveType::Float => "Float",
        PrimitiveType::Double => "Double",
        PrimitiveType::String => "String",
    }
}

pub fn swift_type(ty: &Type, ctx: &NamespaceContext<'_>, names: &SwiftNames) -> String {
    match ty {
        Type::Primitive { name } => primitive_swift_type(*name).to_string(),
        Type::TypeRef { name } if name == "void" => "Void".to_string(),
        Type::TypeRef { name } => match ctx.resolve(name) {
            RefKind::Enum(_) | RefKind::Typedef(_) => name.clone(),
            RefKind::Interface => names.class_name(name),
        },
        Type::Array { element } => format!("[{}]", swift_type(element, ctx, names)),
        Type::Dict { key, value } => {
            format!("[{}: {}]", swift_type(key, ctx, names), swift_type(value, ctx, names))
        }
        Type::Set { element } => format!("Set<{}>", swift_type(element, ctx, names)),
        Type::Nullable { inner } => format!("{}?", swift_type(inner, ctx, names)),
    }
}

/// Identifier fragment naming a collection helper: `[[String: Int32]]` is `ArrayDictStringInt32`.
pub fn mangle(ty: &Type, ctx: &NamespaceContext<'_>, names: &SwiftNames) -> String {
    match ctx.unalias(ty) {
        Type::Primitive { name } => primitive_swift_type(*name).to_string(),
        Type::TypeRef { name } => match ctx.resolve(name) {
            RefKind::Interface => names.class_name(name),
            _ => name.clone(),
        },
        Type::Array { element } => format!("Array{}", mangle(element, ctx, names)),
        Type::Dict { key, value } => format!("Dict{}{}", mangle(key, ctx, names), mangle(value, ctx, names)),
        Type::Set { element } => format!("Set{}", mangle(element, ctx, names)),
        Type::Nullable { inner } => format!("Optional{}", mangle(inner, ctx, names)),
    }
}

/// Back-quote Swift keywords.
pub fn escape(name: &str) -> String {
    if KEYWORDS.contains(&name) {
        format!("`{name}`")
    } else {
        name.to_string()
    }
}

/// Member name in lower camel case: `GetName` and `get_name` both become `getName`.
pub fn member_name(name: &str) -> String {
    escape(&camel_case(name))
}

/// Enum case name: `NOT_FOUND` becomes `notFound`, `OK` becomes `ok`.
pub fn case_name(name: &str) -> String {
    escape(&camel_case(name))
}

/// Internal name for a parameter, avoiding the locals of generated bodies.
pub fn param_internal_name(name: &str) -> Option<String> {
    let camel = camel_case(name);
    RESERVED_LOCALS.contains(&camel.as_str()).then(|| format!("{camel}Arg"))
}

fn camel_case(name: &str) -> String {
    let screaming = !name.chars().any(|c| c.is_ascii_lowercase());
    let mut out = String::with_capacity(name.len());
    for (i, part) in name.split('_').filter(|p| !p.is_empty()).enumerate() {
        let part = if screaming { part.to_ascii_lowercase() } else { part.to_string() };
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            if i == 0 {
                out.extend(first.to_lowercase());
            } else {
                out.extend(first.to_uppercase());
            }
            out.push_str(chars.as_str());
        }
    }
    if out.is_empty() {
        name.to_string()
    } else {
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names() {
        assert_eq!(case_name("NOT_FOUND"), "notFound");
        assert_eq!(case_name("OK"), "ok");
        assert_eq!(case_name("Debug"), "debug");
        assert_eq!(case_name("DEFAULT"), "`default`");
        assert_eq!(member_name("doSomething"), "doSomething");
        assert_eq!(member_name("GetName"), "getName");
        assert_eq!(member_name("get_name"), "getName");
        assert_eq!(member_name("Timeout"), "timeout");
        assert_eq!(param_internal_name("count").as_deref(), Some("countArg"));
        assert_eq!(param_internal_name("query"), None);
    }

    #[test]
    fn interface_prefix() {
        let file = quill_syntax::parse(
            "namespace N {
                interface IUser { }
                interface Item { }
                interface I { }
                interface IConfig { }
                enum Config : int32_t { A = 0 }
            }",
        )
        .unwrap();
        let validated = quill_resolve::validate(&file).unwrap();
        let (ns, table) = validated.namespaces().next().unwrap();
        let ctx = NamespaceContext::new(ns, table);

        let names = SwiftNames::new(&ctx, true);
        assert_eq!(names.class_name("IUser"), "User");
        assert_eq!(names.class_name("Item"), "Item");
        assert_eq!(names.class_name("I"), "I");
        assert_eq!(names.class_name("IConfig"), "IConfig");
        assert_eq!(SwiftNames::new(&ctx, false).class_name("IUser"), "IUser");

        let user = Type::type_ref("IUser");
        assert_eq!(swift_type(&Type::dict(Type::primitive(PrimitiveType::String), user.clone()), &ctx, &names), "[String: User]");
        assert_eq!(swift_type(&Type::set(Type::nullable(user.clone())), &ctx, &names), "Set<User?>");
        assert_eq!(mangle(&Type::array(Type::dict(Type::primitive(PrimitiveType::String), Type::primitive(PrimitiveType::Int32))), &ctx, &names), "ArrayDictStringInt32");
    }
}
