//! Generated text, grouped by declaration kind.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{CodegenError, CodegenResult};

/// The kind of declarations a [`Section`] holds, in the order they usually
/// appear in a generated file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DeclGroup {
    Preamble,
    ForwardDeclarations,
    Handles,
    ErrorHandling,
    Enums,
    Typedefs,
    Constants,
    Containers,
    Interfaces,
    Exports,
    Epilogue,
}

impl fmt::Display for DeclGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeclGroup::Preamble => "preamble",
            DeclGroup::ForwardDeclarations => "forward declarations",
            DeclGroup::Handles => "handles",
            DeclGroup::ErrorHandling => "error handling",
            DeclGroup::Enums => "enums",
            DeclGroup::Typedefs => "typedefs",
            DeclGroup::Constants => "constants",
            DeclGroup::Containers => "containers",
            DeclGroup::Interfaces => "interfaces",
            DeclGroup::Exports => "exports",
            DeclGroup::Epilogue => "epilogue",
        };
        f.write_str(name)
    }
}

/// One declaration group's emitted text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub group: DeclGroup,
    pub text: String,
}

/// A file produced by a backend, as an ordered list of sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Path relative to the output directory.
    pub path: PathBuf,
    pub sections: Vec<Section>,
}

impl GeneratedFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), sections: Vec::new() }
    }

    /// Append a section; empty text is dropped.
    pub fn push(&mut self, group: DeclGroup, text: String) {
        if !text.trim().is_empty() {
            self.sections.push(Section { group, text });
        }
    }

    /// Text of every section in `group`.
    pub fn group(&self, group: DeclGroup) -> impl Iterator<Item = &str> {
        self.sections
            .iter()
            .filter(move |s| s.group == group)
            .map(|s| s.text.as_str())
    }

    /// The full file: sections separated by a blank line.
    pub fn contents(&self) -> String {
        let mut out = String::new();
        for section in &self.sections {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(section.text.trim_end_matches('\n'));
            out.push('\n');
        }
        out
    }
}

/// Write `files` below `dir`, creating directories as needed.
pub fn write_files(dir: &Path, files: &[GeneratedFile]) -> CodegenResult<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(files.len());
    for file in files {
        let path = dir.join(&file.path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|source| CodegenError::Io { path: parent.to_path_buf(), source })?;
        }
        std::fs::write(&path, file.contents())
            .map_err(|source| CodegenError::Io { path: path.clone(), source })?;
        log::info!("wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}
