use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

pub type CodegenResult<T> = Result<T, CodegenError>;

/// Errors that can occur around code generation.
///
/// Mapping a validated tree never fails; only target selection and writing
/// the results can.
#[derive(Error, Debug, Diagnostic)]
pub enum CodegenError {
    #[error("Unknown target `{0}`")]
    #[diagnostic(
        code(quill_codegen::unknown_target),
        help("supported targets are `cpp`, `c` and `swift`")
    )]
    UnknownTarget(String),

    #[error("Failed to write {path}")]
    #[diagnostic(code(quill_codegen::io_error))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
