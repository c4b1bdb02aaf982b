//! Read-only facts about one namespace, shared by every mapping call.

use fxhash::FxHashMap;
use quill_resolve::{SymbolKind, SymbolTable};
use quill_syntax::{Enum, Interface, Namespace, PrimitiveType, Type};

/// What a `TypeRef` name denotes in its namespace.
#[derive(Debug, Clone, Copy)]
pub enum RefKind<'a> {
    Interface,
    Enum(&'a Enum),
    Typedef(&'a Type),
}

/// Snapshot of a validated namespace, built once before generation starts
/// and never modified afterwards.
#[derive(Debug)]
pub struct NamespaceContext<'a> {
    namespace: &'a Namespace,
    refs: FxHashMap<&'a str, RefKind<'a>>,
    constants: FxHashMap<&'a str, PrimitiveType>,
    /// Enum member name to the first enum declaring it.
    enum_members: FxHashMap<&'a str, &'a Enum>,
    interface_names: Vec<&'a str>,
}

impl<'a> NamespaceContext<'a> {
    pub fn new(namespace: &'a Namespace, symbols: &'a SymbolTable) -> Self {
        let mut refs = FxHashMap::default();
        let mut interface_names = Vec::new();
        for symbol in symbols.iter() {
            let kind = match &symbol.kind {
                SymbolKind::Interface { .. } => {
                    interface_names.push(symbol.name.as_str());
                    RefKind::Interface
                }
                SymbolKind::Enum { .. } => match namespace.enum_decl(&symbol.name) {
                    Some(decl) => RefKind::Enum(decl),
                    None => continue,
                },
                SymbolKind::Typedef { target } => RefKind::Typedef(target),
            };
            refs.insert(symbol.name.as_str(), kind);
        }

        let constants = namespace
            .constants
            .iter()
            .map(|c| (c.name.as_str(), c.ty))
            .collect();

        let mut enum_members = FxHashMap::default();
        for decl in &namespace.enums {
            for value in &decl.values {
                enum_members.entry(value.name.as_str()).or_insert(decl);
            }
        }

        Self { namespace, refs, constants, enum_members, interface_names }
    }

    pub fn name(&self) -> &'a str {
        &self.namespace.name
    }

    pub fn namespace(&self) -> &'a Namespace {
        self.namespace
    }

    /// Classify a type name. Names that are neither enums nor typedefs are interfaces.
    pub fn resolve(&self, name: &str) -> RefKind<'a> {
        self.refs.get(name).copied().unwrap_or(RefKind::Interface)
    }

    pub fn enum_decl(&self, name: &str) -> Option<&'a Enum> {
        match self.resolve(name) {
            RefKind::Enum(decl) => Some(decl),
            _ => None,
        }
    }

    /// Follow typedefs until a type that is not an alias is reached.
    pub fn unalias<'t>(&self, ty: &'t Type) -> &'t Type
    where
        'a: 't,
    {
        let mut current = ty;
        // validated typedef chains are acyclic, so this bound is never hit
        for _ in 0..=self.namespace.typedefs.len() {
            match current {
                Type::TypeRef { name } => match self.resolve(name) {
                    RefKind::Typedef(target) => current = target,
                    _ => break,
                },
                _ => break,
            }
        }
        current
    }

    /// True for `T?` where `T` is (an alias of) a number or bool.
    pub fn is_nullable_scalar(&self, ty: &Type) -> bool {
        match self.unalias(ty) {
            Type::Nullable { inner } => {
                matches!(self.unalias(inner), Type::Primitive { name } if name.is_scalar())
            }
            _ => false,
        }
    }

    pub fn constant_type(&self, name: &str) -> Option<PrimitiveType> {
        self.constants.get(name).copied()
    }

    pub fn enum_of_member(&self, member: &str) -> Option<&'a Enum> {
        self.enum_members.get(member).copied()
    }

    /// Every interface name, forward-only ones included, in registration order.
    pub fn interface_names(&self) -> &[&'a str] {
        &self.interface_names
    }

    /// Interfaces with a body.
    pub fn interfaces(&self) -> impl Iterator<Item = &'a Interface> {
        self.namespace.interfaces.iter()
    }
}
