//! C++ backend: one header per namespace declaring abstract classes.

use std::fmt::Write;

use quill_syntax::{Constant, Enum, Interface, PrimitiveType, Type, Typedef};

use crate::context::NamespaceContext;
use crate::expr::{render_expr, Grouping, LiteralStyle, RenderStyle};
use crate::output::{DeclGroup, GeneratedFile};
use crate::{Backend, Target};

const INDENT: &str = "    ";

pub struct CppBackend;

/// Map an IDL type to its C++ spelling.
pub fn cpp_type(ty: &Type) -> String {
    match ty {
        Type::Primitive { name } => primitive_type(*name).to_string(),
        Type::TypeRef { name } if name == "void" => "void".to_string(),
        Type::TypeRef { name } => name.clone(),
        Type::Array { element } => format!("std::vector<{}>", cpp_type(element)),
        Type::Dict { key, value } => {
            format!("std::unordered_map<{}, {}>", cpp_type(key), cpp_type(value))
        }
        Type::Set { element } => format!("std::unordered_set<{}>", cpp_type(element)),
        // value types get an explicit has-value wrapper, everything else is
        // held by shared reference
        Type::Nullable { inner } => match &**inner {
            Type::Primitive { .. } => format!("std::optional<{}>", cpp_type(inner)),
            _ => format!("std::shared_ptr<{}>", cpp_type(inner)),
        },
    }
}

fn primitive_type(primitive: PrimitiveType) -> &'static str {
    match primitive {
        PrimitiveType::Void => "void",
        PrimitiveType::Bool => "bool",
        PrimitiveType::Int32 => "int32_t",
        PrimitiveType::Int64 => "int64_t",
        PrimitiveType::Float => "float",
        PrimitiveType::Double => "double",
        PrimitiveType::String => "std::string",
    }
}

/// Parameter spelling: numbers and bools by value, everything else by const reference.
pub fn cpp_param_type(ty: &Type) -> String {
    match ty {
        Type::Primitive { name } if *name != PrimitiveType::String => cpp_type(ty),
        _ => format!("const {}&", cpp_type(ty)),
    }
}

pub fn header_name(namespace: &str) -> String {
    format!("{}.hpp", namespace.to_lowercase())
}

impl Backend for CppBackend {
    fn target(&self) -> Target {
        Target::Cpp
    }

    fn generate_namespace(&self, ctx: &NamespaceContext<'_>) -> Vec<GeneratedFile> {
        let ns = ctx.namespace();
        let mut file = GeneratedFile::new(header_name(&ns.name));

        file.push(DeclGroup::Preamble, preamble(&ns.name));
        file.push(DeclGroup::ForwardDeclarations, forward_declarations(ctx));

        // enums and constants may refer to each other, so they are emitted
        // in dependency order; typedefs follow the last enum they may name
        let values = value_order(ctx);
        let last_enum = values.iter().rposition(|v| matches!(v, ValueDecl::Enum(_)));
        let (before, after) = values.split_at(last_enum.map_or(0, |i| i + 1));
        push_values(&mut file, before, ctx);

        let mut typedefs = String::new();
        for typedef in typedef_order(ctx) {
            let _ = writeln!(typedefs, "using {} = {};", typedef.name, cpp_type(&typedef.ty));
        }
        file.push(DeclGroup::Typedefs, typedefs);
        push_values(&mut file, after, ctx);

        let classes: Vec<String> = ns.interfaces.iter().map(class_decl).collect();
        file.push(DeclGroup::Interfaces, classes.join("\n"));

        file.push(DeclGroup::Epilogue, format!("}}  // namespace {}\n", ns.name));
        vec![file]
    }
}

#[derive(Debug, Clone, Copy)]
enum ValueDecl<'a> {
    Enum(&'a Enum),
    Constant(&'a Constant),
}

/// Enums and constants, each after the declarations its expressions name.
fn value_order<'a>(ctx: &NamespaceContext<'a>) -> Vec<ValueDecl<'a>> {
    let ns = ctx.namespace();
    let decls: Vec<ValueDecl<'a>> = ns
        .enums
        .iter()
        .map(ValueDecl::Enum)
        .chain(ns.constants.iter().map(ValueDecl::Constant))
        .collect();
    let enum_index = |decl: &Enum| ns.enums.iter().position(|e| std::ptr::eq(e, decl));
    let constant_index =
        |name: &str| ns.constants.iter().position(|c| c.name == name).map(|i| ns.enums.len() + i);

    // names resolve the same way the rewrites in `enum_decl` and `constant_decl` do
    let order = dependency_order(decls.len(), |i| match decls[i] {
        ValueDecl::Enum(decl) => decl
            .values
            .iter()
            .flat_map(|v| v.value.identifiers())
            .filter(|name| !decl.values.iter().any(|v| v.name == *name))
            .filter_map(|name| match ctx.enum_of_member(name) {
                Some(owner) => enum_index(owner),
                None => constant_index(name),
            })
            .collect(),
        ValueDecl::Constant(constant) => constant
            .value
            .identifiers()
            .into_iter()
            .filter_map(|name| match constant_index(name) {
                Some(index) => Some(index),
                None => ctx.enum_of_member(name).and_then(enum_index),
            })
            .collect(),
    });
    order.into_iter().map(|i| decls[i]).collect()
}

/// Typedefs, each after the typedefs its target names.
fn typedef_order<'a>(ctx: &NamespaceContext<'a>) -> Vec<&'a Typedef> {
    let typedefs = &ctx.namespace().typedefs;
    let order = dependency_order(typedefs.len(), |i| {
        let mut names = Vec::new();
        type_names(&typedefs[i].ty, &mut names);
        names
            .into_iter()
            .filter_map(|name| typedefs.iter().position(|t| t.name == name))
            .collect()
    });
    order.into_iter().map(|i| &typedefs[i]).collect()
}

fn type_names<'t>(ty: &'t Type, names: &mut Vec<&'t str>) {
    match ty {
        Type::Primitive { .. } => {}
        Type::TypeRef { name } => names.push(name),
        Type::Array { element } | Type::Set { element } => type_names(element, names),
        Type::Dict { key, value } => {
            type_names(key, names);
            type_names(value, names);
        }
        Type::Nullable { inner } => type_names(inner, names),
    }
}

/// Indices `0..count` with every index placed after the indices it depends
/// on. Independent declarations keep their relative order; a cycle is cut
/// where it is first found.
fn dependency_order(count: usize, depends_on: impl Fn(usize) -> Vec<usize>) -> Vec<usize> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        Fresh,
        Active,
        Done,
    }

    fn visit(index: usize, depends_on: &dyn Fn(usize) -> Vec<usize>, marks: &mut [Mark], order: &mut Vec<usize>) {
        if marks[index] != Mark::Fresh {
            return;
        }
        marks[index] = Mark::Active;
        for dependency in depends_on(index) {
            visit(dependency, depends_on, marks, order);
        }
        marks[index] = Mark::Done;
        order.push(index);
    }

    let mut marks = vec![Mark::Fresh; count];
    let mut order = Vec::with_capacity(count);
    for index in 0..count {
        visit(index, &depends_on, &mut marks, &mut order);
    }
    order
}

/// Push runs of consecutive enums or constants as their own sections.
fn push_values(file: &mut GeneratedFile, values: &[ValueDecl<'_>], ctx: &NamespaceContext<'_>) {
    let mut start = 0;
    while start < values.len() {
        let is_enum = matches!(values[start], ValueDecl::Enum(_));
        let run = values[start..]
            .iter()
            .take_while(|v| matches!(v, ValueDecl::Enum(_)) == is_enum)
            .count();
        let group = &values[start..start + run];
        if is_enum {
            let enums: Vec<String> = group
                .iter()
                .filter_map(|v| match v {
                    ValueDecl::Enum(decl) => Some(enum_decl(decl, ctx)),
                    ValueDecl::Constant(_) => None,
                })
                .collect();
            file.push(DeclGroup::Enums, enums.join("\n"));
        } else {
            let constants: String = group
                .iter()
                .filter_map(|v| match v {
                    ValueDecl::Constant(constant) => Some(constant_decl(constant, ctx)),
                    ValueDecl::Enum(_) => None,
                })
                .collect();
            file.push(DeclGroup::Constants, constants);
        }
        start += run;
    }
}

fn preamble(namespace: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "// Generated by quill from the {namespace} IDL. Do not edit.");
    out.push_str("#pragma once\n\n");
    for header in ["cstdint", "memory", "optional", "string", "unordered_map", "unordered_set", "vector"] {
        let _ = writeln!(out, "#include <{header}>");
    }
    let _ = write!(out, "\nnamespace {namespace} {{\n");
    out
}

/// `class X;` for every interface, so declaration order never matters.
fn forward_declarations(ctx: &NamespaceContext<'_>) -> String {
    let mut out = String::new();
    for name in ctx.interface_names() {
        let _ = writeln!(out, "class {name};");
    }
    out
}

fn enum_decl(decl: &Enum, ctx: &NamespaceContext<'_>) -> String {
    // members of other enums need qualifying; siblings are in scope
    let rewrite = |name: &str| {
        if decl.values.iter().any(|v| v.name == name) {
            return None;
        }
        ctx.enum_of_member(name).map(|owner| {
            format!("static_cast<{}>({}::{})", primitive_type(decl.backing), owner.name, name)
        })
    };
    let style = RenderStyle::new(LiteralStyle::PreserveRadix, Grouping::Minimal).with_rewrite(&rewrite);

    let mut out = String::new();
    let _ = writeln!(out, "enum class {} : {} {{", decl.name, primitive_type(decl.backing));
    for value in &decl.values {
        let _ = writeln!(out, "{INDENT}{} = {},", value.name, render_expr(&value.value, &style));
    }
    out.push_str("};\n");
    out
}

fn constant_decl(constant: &Constant, ctx: &NamespaceContext<'_>) -> String {
    let ty = primitive_type(constant.ty);
    let rewrite = |name: &str| {
        if ctx.constant_type(name).is_some() {
            return None;
        }
        ctx.enum_of_member(name)
            .map(|owner| format!("static_cast<{ty}>({}::{name})", owner.name))
    };
    let style = RenderStyle::new(LiteralStyle::PreserveRadix, Grouping::Minimal).with_rewrite(&rewrite);
    format!("constexpr {ty} {} = {};\n", constant.name, render_expr(&constant.value, &style))
}

fn class_decl(interface: &Interface) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "class {} {{", interface.name);
    out.push_str("public:\n");
    let _ = writeln!(out, "{INDENT}virtual ~{}() = default;", interface.name);

    if !interface.properties.is_empty() {
        out.push('\n');
    }
    for property in &interface.properties {
        let _ = writeln!(
            out,
            "{INDENT}virtual {} get_{}() const = 0;",
            cpp_type(&property.ty),
            property.name
        );
        if property.writable {
            let _ = writeln!(
                out,
                "{INDENT}virtual void set_{}({} value) = 0;",
                property.name,
                cpp_param_type(&property.ty)
            );
        }
    }

    if !interface.methods.is_empty() {
        out.push('\n');
    }
    for method in &interface.methods {
        let params: Vec<String> = method
            .parameters
            .iter()
            .map(|p| format!("{} {}", cpp_param_type(&p.ty), p.name))
            .collect();
        let _ = writeln!(
            out,
            "{INDENT}virtual {} {}({}) = 0;",
            cpp_type(&method.return_type),
            method.name,
            params.join(", ")
        );
    }

    out.push_str("};\n");
    out
}
