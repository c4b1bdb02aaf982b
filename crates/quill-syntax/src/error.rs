use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

pub type SyntaxResult<T> = Result<T, SyntaxError>;

/// Errors produced while turning IDL text (or persisted AST JSON) into an [`crate::IdlFile`].
#[derive(Debug, Clone, Error, Diagnostic, PartialEq, Eq)]
pub enum SyntaxError {
    /// The lexer hit a character sequence that is not part of any token.
    #[error("Lexer error: {message}")]
    #[diagnostic(code(quill_syntax::lexer_error))]
    Lexer {
        message: String,
        #[label("unrecognized input")]
        span: SourceSpan,
    },

    /// A token appeared where the grammar does not allow it.
    #[error("Parse error: {message}")]
    #[diagnostic(code(quill_syntax::parse_error))]
    Parser {
        message: String,
        #[label("error occurred here")]
        span: SourceSpan,
        /// What the grammar would have accepted at this point.
        #[help]
        expected: Option<String>,
    },

    /// Input ended in the middle of a declaration.
    #[error("Unexpected end of input; expected {expected}")]
    #[diagnostic(code(quill_syntax::unexpected_eof))]
    UnexpectedEof {
        expected: String,
        #[label("input ends here")]
        span: SourceSpan,
    },

    /// A numeric literal does not fit the 64-bit literal model.
    #[error("Invalid numeric literal `{literal}`")]
    #[diagnostic(
        code(quill_syntax::invalid_literal),
        help("integer literals must fit in 64 bits")
    )]
    InvalidLiteral {
        literal: String,
        #[label("this literal")]
        span: SourceSpan,
    },

    /// The file could not be read from disk.
    #[error("Failed to read {path}: {message}")]
    #[diagnostic(code(quill_syntax::io_error))]
    Io { path: String, message: String },

    /// Persisted AST JSON was malformed or did not match the model.
    #[error("AST JSON error: {0}")]
    #[diagnostic(code(quill_syntax::json_error))]
    Json(String),
}

impl SyntaxError {
    /// Source location of the error, when it has one.
    pub fn span(&self) -> Option<SourceSpan> {
        match self {
            SyntaxError::Lexer { span, .. }
            | SyntaxError::Parser { span, .. }
            | SyntaxError::UnexpectedEof { span, .. }
            | SyntaxError::InvalidLiteral { span, .. } => Some(*span),
            SyntaxError::Io { .. } | SyntaxError::Json(_) => None,
        }
    }
}

impl From<serde_json::Error> for SyntaxError {
    fn from(error: serde_json::Error) -> Self {
        SyntaxError::Json(error.to_string())
    }
}
