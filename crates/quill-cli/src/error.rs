use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use quill_codegen::CodegenError;
use quill_resolve::{ResolutionError, ValidationFailed};
use quill_syntax::SyntaxError;
use thiserror::Error;

/// CLI-specific error type that provides rich diagnostics
#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error("Failed while {operation}: {}", path.display())]
    #[diagnostic(code(quill::cli::io_error))]
    IoError {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// A syntax error, reported against the text it was found in.
    #[error("{message}")]
    #[diagnostic(code(quill::cli::syntax_error))]
    Syntax {
        #[source_code]
        src: NamedSource<String>,
        #[label("{message}")]
        span: Option<SourceSpan>,
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Every validation error of a file, each labelled in the source.
    #[error("{message}")]
    #[diagnostic(code(quill::cli::validation_failed))]
    Validation {
        #[source_code]
        src: NamedSource<String>,
        message: String,
        #[related]
        errors: Vec<ResolutionError>,
    },

    /// Validation errors for input without source text, such as an AST file.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Resolution(#[from] ValidationFailed),

    /// Malformed AST JSON.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Ast(SyntaxError),

    #[error("Invalid configuration in {}: {message}", path.display())]
    #[diagnostic(code(quill::cli::config_error))]
    Config { path: PathBuf, message: String },

    #[error("No quill.toml found in {} or any parent directory", searched_path.display())]
    #[diagnostic(code(quill::cli::config_not_found))]
    ConfigNotFound { searched_path: PathBuf },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Codegen(#[from] CodegenError),
}

impl CliError {
    pub fn syntax(path: &str, source: &str, error: SyntaxError) -> Self {
        let help = error.help().map(|h| h.to_string());
        CliError::Syntax {
            src: NamedSource::new(path, source.to_string()),
            span: error.span(),
            message: error.to_string(),
            help,
        }
    }

    pub fn validation(path: &str, source: &str, failed: ValidationFailed) -> Self {
        CliError::Validation {
            src: NamedSource::new(path, source.to_string()),
            message: failed.to_string(),
            errors: failed.errors,
        }
    }
}

/// Convert IO errors with context
pub fn convert_io_error(error: std::io::Error, path: PathBuf, operation: &str) -> CliError {
    CliError::IoError { path, operation: operation.to_string(), source: error }
}
