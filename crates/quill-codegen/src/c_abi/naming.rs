//! Symbol names of the flat C surface.
//!
//! The Swift backend calls these too, so both sides always agree on every name.

use std::fmt;

/// The three namespace-wide container handle families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContainerKind {
    Array,
    Dict,
    Set,
}

impl ContainerKind {
    pub const ALL: [ContainerKind; 3] = [ContainerKind::Array, ContainerKind::Dict, ContainerKind::Set];

    pub fn as_str(self) -> &'static str {
        match self {
            ContainerKind::Array => "Array",
            ContainerKind::Dict => "Dict",
            ContainerKind::Set => "Set",
        }
    }
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Suffixes of the index-based accessor family emitted for collection
/// properties and collection-returning methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accessor {
    Count,
    Item,
    Key,
    Clear,
    Add,
}

impl Accessor {
    pub fn as_str(self) -> &'static str {
        match self {
            Accessor::Count => "Count",
            Accessor::Item => "Item",
            Accessor::Key => "Key",
            Accessor::Clear => "Clear",
            Accessor::Add => "Add",
        }
    }
}

/// Reference counting entry points of every interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifetime {
    Create,
    AddRef,
    Release,
}

impl Lifetime {
    pub fn as_str(self) -> &'static str {
        match self {
            Lifetime::Create => "Create",
            Lifetime::AddRef => "AddRef",
            Lifetime::Release => "Release",
        }
    }
}

pub fn handle_type(interface: &str) -> String {
    format!("{interface}_Handle")
}

pub fn opaque_struct(name: &str) -> String {
    format!("{name}_Opaque")
}

/// `ExampleArray_Handle` and friends.
pub fn container_handle(namespace: &str, kind: ContainerKind) -> String {
    format!("{namespace}{kind}_Handle")
}

pub fn export_macro(namespace: &str) -> String {
    format!("{}_API", namespace.to_uppercase())
}

/// `ILogger_log`, `IUser_Getname`, `IUser_Setname`.
pub fn function_name(interface: &str, member: &str, prefix: &str) -> String {
    format!("{interface}_{prefix}{member}")
}

pub fn getter_name(interface: &str, property: &str) -> String {
    function_name(interface, property, "Get")
}

pub fn setter_name(interface: &str, property: &str) -> String {
    function_name(interface, property, "Set")
}

/// `IContainer_Getitems_Count`.
pub fn accessor_name(base: &str, accessor: Accessor) -> String {
    format!("{base}_{}", accessor.as_str())
}

pub fn lifetime_name(interface: &str, lifetime: Lifetime) -> String {
    format!("{interface}_{}", lifetime.as_str())
}

/// Generic container entry point, e.g. `Example_Array_GetInt32`.
pub fn container_function(namespace: &str, kind: ContainerKind, operation: &str) -> String {
    format!("{namespace}_{kind}_{operation}")
}

pub fn error_function(namespace: &str, operation: &str) -> String {
    format!("{namespace}_{operation}")
}

pub fn error_code_type(namespace: &str) -> String {
    format!("{namespace}_ErrorCode")
}

pub fn error_code(namespace: &str, code: &str) -> String {
    format!("{}_{code}", namespace.to_uppercase())
}

/// `#define` name of an enum member.
pub fn enum_member_define(enum_name: &str, member: &str) -> String {
    format!("{enum_name}_{member}")
}

/// `#define` name of a constant.
pub fn constant_define(namespace: &str, constant: &str) -> String {
    format!("{namespace}_{constant}")
}

pub fn header_name(namespace: &str) -> String {
    format!("{}_wrapper.h", namespace.to_lowercase())
}

pub fn exports_name(namespace: &str) -> String {
    format!("{}_exports.def", namespace.to_lowercase())
}

/// C parameter names may not shadow the receiver or the index argument.
pub fn param_name(name: &str) -> String {
    match name {
        "handle" | "index" => format!("{name}_"),
        _ => name.to_string(),
    }
}
