//! Semantic validation of quill IDL files.
//!
//! Validation runs in two passes per namespace. [`definitions`] registers every
//! type name into the namespace's [`SymbolTable`]; [`validate`](mod@validate)
//! then checks member names and resolves every type reference against that
//! table. Namespaces never see each other's symbols.
//!
//! Errors are collected across the whole file and reported at once through
//! [`ValidationFailed`].

pub mod definitions;
pub mod error;
pub mod symbol;
pub mod validate;

pub use error::{ResolutionError, ValidationFailed};
pub use symbol::{Registration, Symbol, SymbolKind, SymbolTable};

use fxhash::FxHashSet;
use quill_syntax::{IdlFile, Namespace};

/// An [`IdlFile`] that passed validation, together with its symbol tables.
///
/// Code generation only accepts this type, so it cannot run on an
/// unvalidated tree.
#[derive(Debug, Clone)]
pub struct ValidatedIdl<'a> {
    file: &'a IdlFile,
    tables: Vec<SymbolTable>,
}

impl<'a> ValidatedIdl<'a> {
    pub fn file(&self) -> &'a IdlFile {
        self.file
    }

    /// Each namespace paired with its symbol table, in declaration order.
    pub fn namespaces(&self) -> impl Iterator<Item = (&'a Namespace, &SymbolTable)> + '_ {
        self.file.namespaces.iter().zip(self.tables.iter())
    }

    pub fn symbols(&self, namespace: &str) -> Option<&SymbolTable> {
        self.tables.iter().find(|t| t.namespace() == namespace)
    }
}

/// Validate a whole file, reporting every problem found.
pub fn validate(file: &IdlFile) -> Result<ValidatedIdl<'_>, ValidationFailed> {
    let mut errors = Vec::new();
    let mut tables = Vec::with_capacity(file.namespaces.len());
    let mut seen = FxHashSet::default();

    for namespace in &file.namespaces {
        if !seen.insert(namespace.name.as_str()) {
            errors.push(ResolutionError::DuplicateNamespace {
                name: namespace.name.clone(),
                span: namespace.span.map(Into::into),
            });
        }
        tables.push(validate_namespace(namespace, &mut errors));
    }

    if errors.is_empty() {
        log::info!("validated {} namespace(s)", tables.len());
        Ok(ValidatedIdl { file, tables })
    } else {
        log::debug!("validation found {} error(s)", errors.len());
        Err(ValidationFailed { errors })
    }
}

/// Run both passes over a single namespace.
pub fn validate_namespace(namespace: &Namespace, errors: &mut Vec<ResolutionError>) -> SymbolTable {
    let table = definitions::collect_definitions(namespace, errors);
    validate::validate_namespace(namespace, &table, errors);
    table
}
