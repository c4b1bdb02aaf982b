//! Code generation for validated quill IDL files.
//!
//! Three backends read the same validated tree:
//!
//! * [`cpp`] emits abstract C++ classes,
//! * [`c_abi`] emits a flat C surface built on opaque reference-counted handles,
//! * [`swift`] emits Swift classes that wrap the C surface.
//!
//! Each namespace is generated independently from its own
//! [`NamespaceContext`], so namespaces are processed in parallel.

pub mod c_abi;
pub mod context;
pub mod cpp;
pub mod error;
pub mod expr;
pub mod output;
pub mod swift;

use std::fmt;
use std::str::FromStr;

use quill_resolve::ValidatedIdl;
use rayon::prelude::*;
use serde::Deserialize;

pub use context::{NamespaceContext, RefKind};
pub use error::{CodegenError, CodegenResult};
pub use output::{write_files, DeclGroup, GeneratedFile, Section};

/// A code generation target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    Cpp,
    C,
    Swift,
}

impl Target {
    pub const ALL: [Target; 3] = [Target::Cpp, Target::C, Target::Swift];

    pub fn name(self) -> &'static str {
        match self {
            Target::Cpp => "cpp",
            Target::C => "c",
            Target::Swift => "swift",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Target {
    type Err = CodegenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cpp" | "c++" => Ok(Target::Cpp),
            "c" => Ok(Target::C),
            "swift" => Ok(Target::Swift),
            _ => Err(CodegenError::UnknownTarget(s.to_string())),
        }
    }
}

/// Backend knobs, loadable from the `[swift]` table of `quill.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GeneratorOptions {
    /// Drop the `I` marker from interface names in Swift: `IUser` becomes `User`.
    pub strip_interface_prefix: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self { strip_interface_prefix: true }
    }
}

/// A code generator for one target language.
pub trait Backend: Send + Sync {
    fn target(&self) -> Target;

    /// Produce the files for a single namespace.
    fn generate_namespace(&self, ctx: &NamespaceContext<'_>) -> Vec<GeneratedFile>;
}

pub fn backend(target: Target, options: &GeneratorOptions) -> Box<dyn Backend> {
    match target {
        Target::Cpp => Box::new(cpp::CppBackend),
        Target::C => Box::new(c_abi::CAbiBackend),
        Target::Swift => Box::new(swift::SwiftBackend::new(options.clone())),
    }
}

/// Generate every namespace of `idl` for `target`.
///
/// Files come back in namespace order regardless of how the work was scheduled.
pub fn generate(idl: &ValidatedIdl<'_>, target: Target, options: &GeneratorOptions) -> Vec<GeneratedFile> {
    let backend = backend(target, options);
    let contexts: Vec<NamespaceContext<'_>> = idl
        .namespaces()
        .map(|(namespace, symbols)| NamespaceContext::new(namespace, symbols))
        .collect();

    contexts
        .par_iter()
        .map(|ctx| {
            log::debug!("generating {} for namespace {}", backend.target(), ctx.name());
            backend.generate_namespace(ctx)
        })
        .collect::<Vec<_>>()
        .into_iter()
        .flatten()
        .collect()
}
