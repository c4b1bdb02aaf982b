//! Syntax layer of the quill IDL compiler.
//!
//! Turns IDL source text into the [`ast::IdlFile`] tree consumed by the
//! validator and the code generators, and persists that tree as JSON.

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;

pub use ast::*;
pub use error::{SyntaxError, SyntaxResult};
pub use parser::{parse, parse_file};
