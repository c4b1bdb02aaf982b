//! How collections cross the C boundary.
//!
//! Collection properties and collection-returning methods are read element
//! by element through an index-based accessor family. Collections passed as
//! parameters, and collections nested inside other collections, travel as
//! namespace-wide container handles driven by the generic container API. That
//! API is emitted on demand: only the typed operations some member needs.

use std::collections::BTreeSet;

use quill_syntax::Type;

use super::naming::{accessor_name, container_function, container_handle, Accessor, ContainerKind};
use super::types::{as_collection, c_repr, c_type, CRepr};
use super::{CFunction, CParam};
use crate::context::NamespaceContext;

/// Typed generic container operations required by a namespace.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ContainerDemand {
    pub arrays: BTreeSet<CRepr>,
    pub sets: BTreeSet<CRepr>,
    pub dicts: BTreeSet<(CRepr, CRepr)>,
}

impl ContainerDemand {
    pub fn collect(ctx: &NamespaceContext<'_>) -> Self {
        let mut demand = Self::default();
        for interface in ctx.interfaces() {
            for property in &interface.properties {
                demand.require_elements(&property.ty, ctx);
            }
            for method in &interface.methods {
                demand.require_elements(&method.return_type, ctx);
                for param in &method.parameters {
                    demand.require(&param.ty, ctx);
                }
            }
        }
        demand
    }

    /// `ty` itself crosses as a container handle.
    pub fn require(&mut self, ty: &Type, ctx: &NamespaceContext<'_>) {
        match as_collection(ty, ctx) {
            Some(Type::Array { element }) => {
                if let Some(repr) = c_repr(element, ctx) {
                    self.arrays.insert(repr);
                }
                self.require(element, ctx);
            }
            Some(Type::Set { element }) => {
                if let Some(repr) = c_repr(element, ctx) {
                    self.sets.insert(repr);
                }
                self.require(element, ctx);
            }
            Some(Type::Dict { key, value }) => {
                if let (Some(k), Some(v)) = (c_repr(key, ctx), c_repr(value, ctx)) {
                    self.dicts.insert((k, v));
                }
                self.require(key, ctx);
                self.require(value, ctx);
            }
            _ => {}
        }
    }

    /// `ty` is read through an accessor family, so only its elements can be handles.
    pub fn require_elements(&mut self, ty: &Type, ctx: &NamespaceContext<'_>) {
        match as_collection(ty, ctx) {
            Some(Type::Array { element }) | Some(Type::Set { element }) => self.require(element, ctx),
            Some(Type::Dict { key, value }) => {
                self.require(key, ctx);
                self.require(value, ctx);
            }
            _ => {}
        }
    }

    pub fn is_empty(&self) -> bool {
        self.arrays.is_empty() && self.sets.is_empty() && self.dicts.is_empty()
    }

    pub fn uses(&self, kind: ContainerKind) -> bool {
        match kind {
            ContainerKind::Array => !self.arrays.is_empty(),
            ContainerKind::Dict => !self.dicts.is_empty(),
            ContainerKind::Set => !self.sets.is_empty(),
        }
    }

    /// Declarations of the generic container API, grouped by container kind.
    pub fn functions(&self, namespace: &str) -> Vec<CFunction> {
        let mut functions = Vec::new();
        for kind in ContainerKind::ALL {
            if !self.uses(kind) {
                continue;
            }
            let handle = container_handle(namespace, kind);
            let receiver = CParam::new(&handle, kind.as_str().to_lowercase());
            let name = |operation: &str| container_function(namespace, kind, operation);
            let index = CParam::new("size_t", "index");

            functions.push(CFunction::new(&handle, name("Create"), vec![]));
            functions.push(CFunction::new("void", name("Release"), vec![receiver.clone()]));
            functions.push(CFunction::new("size_t", name("Count"), vec![receiver.clone()]));

            match kind {
                ContainerKind::Array | ContainerKind::Set => {
                    let (reprs, insert) = match kind {
                        ContainerKind::Array => (&self.arrays, "Append"),
                        _ => (&self.sets, "Insert"),
                    };
                    for repr in reprs {
                        let suffix = repr.suffix();
                        functions.push(CFunction::new(
                            repr.c_type(),
                            name(&format!("Get{suffix}")),
                            vec![receiver.clone(), index.clone()],
                        ));
                        functions.push(CFunction::new(
                            "void",
                            name(&format!("{insert}{suffix}")),
                            vec![receiver.clone(), CParam::new(repr.c_type(), "value")],
                        ));
                    }
                }
                ContainerKind::Dict => {
                    let keys: BTreeSet<&CRepr> = self.dicts.iter().map(|(k, _)| k).collect();
                    let values: BTreeSet<&CRepr> = self.dicts.iter().map(|(_, v)| v).collect();
                    for key in keys {
                        functions.push(CFunction::new(
                            key.c_type(),
                            name(&format!("Key{}", key.suffix())),
                            vec![receiver.clone(), index.clone()],
                        ));
                    }
                    for value in values {
                        functions.push(CFunction::new(
                            value.c_type(),
                            name(&format!("Value{}", value.suffix())),
                            vec![receiver.clone(), index.clone()],
                        ));
                    }
                    for (key, value) in &self.dicts {
                        functions.push(CFunction::new(
                            "void",
                            name(&format!("Insert{}{}", key.suffix(), value.suffix())),
                            vec![
                                receiver.clone(),
                                CParam::new(key.c_type(), "key"),
                                CParam::new(value.c_type(), "value"),
                            ],
                        ));
                    }
                }
            }
        }
        functions
    }
}

/// `_Count`, then `_Key` (dicts only) and `_Item`, all taking `leading`
/// followed by an index.
pub fn read_accessors(
    base: &str,
    collection: &Type,
    leading: &[CParam],
    ctx: &NamespaceContext<'_>,
) -> Vec<CFunction> {
    let mut indexed = leading.to_vec();
    indexed.push(CParam::new("size_t", "index"));

    let mut functions = vec![CFunction::new("size_t", accessor_name(base, Accessor::Count), leading.to_vec())];
    match collection {
        Type::Dict { key, value } => {
            functions.push(CFunction::new(c_type(key, ctx), accessor_name(base, Accessor::Key), indexed.clone()));
            functions.push(CFunction::new(c_type(value, ctx), accessor_name(base, Accessor::Item), indexed));
        }
        Type::Array { element } | Type::Set { element } => {
            functions.push(CFunction::new(c_type(element, ctx), accessor_name(base, Accessor::Item), indexed));
        }
        _ => {}
    }
    functions
}

/// `_Clear` and `_Add` for a writable collection property.
pub fn write_accessors(
    base: &str,
    collection: &Type,
    receiver: &CParam,
    ctx: &NamespaceContext<'_>,
) -> Vec<CFunction> {
    let add_params = match collection {
        Type::Dict { key, value } => vec![
            receiver.clone(),
            CParam::new(c_type(key, ctx), "key"),
            CParam::new(c_type(value, ctx), "value"),
        ],
        Type::Array { element } | Type::Set { element } => {
            vec![receiver.clone(), CParam::new(c_type(element, ctx), "value")]
        }
        _ => vec![receiver.clone()],
    };
    vec![
        CFunction::new("void", accessor_name(base, Accessor::Clear), vec![receiver.clone()]),
        CFunction::new("void", accessor_name(base, Accessor::Add), add_params),
    ]
}
