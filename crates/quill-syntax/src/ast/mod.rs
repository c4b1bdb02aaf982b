//! The IDL abstract syntax tree.
//!
//! The tree is built once per compilation and never mutated afterwards: the
//! validator and every backend only borrow it.

pub mod common;
pub mod expr;
pub mod items;
pub mod types;

pub use common::Span;
pub use expr::{BinaryOp, Expr, LiteralValue, Radix, UnaryOp};
pub use items::{
    Constant, Enum, EnumValue, ForwardDeclaration, IdlFile, Interface, Method, Namespace,
    Parameter, Property, Typedef,
};
pub use types::{PrimitiveType, Type};
