pub mod build;
pub mod check;
pub mod parse;

use std::path::Path;

use quill_resolve::ValidatedIdl;
use quill_syntax::IdlFile;

use crate::error::CliError;
use crate::io::read_file;

/// An input file and, when it is IDL source, the text diagnostics point into.
pub struct Loaded {
    pub name: String,
    pub source: Option<String>,
    pub idl: IdlFile,
}

impl Loaded {
    pub fn validate(&self) -> Result<ValidatedIdl<'_>, CliError> {
        quill_resolve::validate(&self.idl).map_err(|failed| match &self.source {
            Some(source) => CliError::validation(&self.name, source, failed),
            None => CliError::Resolution(failed),
        })
    }
}

pub fn load_source(path: &Path) -> Result<Loaded, CliError> {
    let name = path.display().to_string();
    let source = read_file(path)?;
    let mut idl = quill_syntax::parse(&source).map_err(|e| CliError::syntax(&name, &source, e))?;
    idl.source_file = Some(path.to_path_buf());
    log::debug!("parsed {name}: {} namespace(s)", idl.namespaces.len());
    Ok(Loaded { name, source: Some(source), idl })
}

pub fn load_ast(path: &Path) -> Result<Loaded, CliError> {
    let json = read_file(path)?;
    let idl = IdlFile::from_json(&json).map_err(CliError::Ast)?;
    Ok(Loaded { name: path.display().to_string(), source: None, idl })
}
