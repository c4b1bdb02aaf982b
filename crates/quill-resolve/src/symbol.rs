//! Per-namespace symbol tables.

use indexmap::IndexMap;
use quill_syntax::{PrimitiveType, Span, Type};

/// What a registered type name refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolKind {
    /// An interface, possibly only forward declared so far.
    Interface {
        /// Whether a full `interface Name { ... }` body has been registered.
        complete: bool,
    },
    /// An enum together with its integer backing type.
    Enum {
        backing: PrimitiveType,
    },
    /// A type alias.
    Typedef {
        /// The aliased type, unresolved.
        target: Type,
    },
}

impl SymbolKind {
    pub fn describe(&self) -> &'static str {
        match self {
            SymbolKind::Interface { complete: true } => "interface",
            SymbolKind::Interface { complete: false } => "forward declaration",
            SymbolKind::Enum { .. } => "enum",
            SymbolKind::Typedef { .. } => "typedef",
        }
    }
}

/// A type name registered in a namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    /// The bare name as written in the source.
    pub name: String,
    pub kind: SymbolKind,
    /// The span of the first registration.
    pub span: Option<Span>,
}

/// Outcome of trying to add a name to a [`SymbolTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// The name was new.
    Added,
    /// An interface body completed an earlier forward declaration,
    /// or a forward declaration repeated a complete interface.
    Merged,
    /// The name was already taken; the table is unchanged.
    Duplicate,
}

/// The type names declared in one namespace.
///
/// Lookups accept both the bare name and the `Namespace::Name` form; a
/// qualified name with any other namespace prefix never resolves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolTable {
    namespace: String,
    symbols: IndexMap<String, Symbol>,
}

impl SymbolTable {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self { namespace: namespace.into(), symbols: IndexMap::new() }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Fully qualified spelling of `name` in this namespace.
    pub fn qualify(&self, name: &str) -> String {
        format!("{}::{}", self.namespace, name)
    }

    /// Add `name` with the given kind, applying the forward declaration rules.
    pub fn register(&mut self, name: &str, kind: SymbolKind, span: Option<Span>) -> Registration {
        let qualified = self.qualify(name);
        let Some(existing) = self.symbols.get_mut(name) else {
            log::debug!("registered type {qualified} ({})", kind.describe());
            self.symbols.insert(name.to_string(), Symbol { name: name.to_string(), kind, span });
            return Registration::Added;
        };

        match (&mut existing.kind, &kind) {
            // `interface I;` followed by `interface I { ... }`
            (SymbolKind::Interface { complete }, SymbolKind::Interface { complete: true })
                if !*complete =>
            {
                *complete = true;
                log::debug!("completed forward declaration {qualified}");
                Registration::Merged
            }
            // a redundant forward declaration of an already complete interface
            (SymbolKind::Interface { complete: true }, SymbolKind::Interface { complete: false }) => {
                Registration::Merged
            }
            _ => Registration::Duplicate,
        }
    }

    fn strip_qualifier<'n>(&self, name: &'n str) -> Option<&'n str> {
        match name.split_once("::") {
            Some((prefix, rest)) if prefix == self.namespace => Some(rest),
            Some(_) => None,
            None => Some(name),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.strip_qualifier(name).and_then(|bare| self.symbols.get(bare))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn kind(&self, name: &str) -> Option<&SymbolKind> {
        self.get(name).map(|s| &s.kind)
    }

    pub fn is_enum(&self, name: &str) -> bool {
        matches!(self.kind(name), Some(SymbolKind::Enum { .. }))
    }

    pub fn is_interface(&self, name: &str) -> bool {
        matches!(self.kind(name), Some(SymbolKind::Interface { .. }))
    }

    /// Symbols in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.values()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
