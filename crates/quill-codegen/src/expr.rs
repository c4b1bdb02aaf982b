//! Structural re-emission of constant expressions.
//!
//! Nothing is folded or evaluated: the tree is printed back out in the
//! target's syntax and the target compiler does the arithmetic.

use quill_syntax::{Expr, LiteralValue, Radix, UnaryOp};

/// How integer literals are spelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralStyle {
    /// `0xFF` stays `0xFF`, `0b1010` stays `0b1010`.
    PreserveRadix,
    /// For targets without binary literals: `0b1010` becomes `0xA`.
    BinaryAsHex,
}

/// When nested binary expressions get parentheses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grouping {
    /// Only where the IDL precedence would otherwise be lost. Correct for
    /// targets whose operator precedence matches the IDL's (C and C++).
    Minimal,
    /// Around every binary operand that is itself binary, for targets that
    /// rank the operators differently.
    Explicit,
}

type Rewrite<'r> = &'r dyn Fn(&str) -> Option<String>;

/// Target-specific rendering rules.
#[derive(Clone, Copy)]
pub struct RenderStyle<'r> {
    pub literals: LiteralStyle,
    pub grouping: Grouping,
    /// Replacement spelling for identifiers, e.g. prefixed enum members.
    pub rewrite: Option<Rewrite<'r>>,
}

impl<'r> RenderStyle<'r> {
    pub fn new(literals: LiteralStyle, grouping: Grouping) -> Self {
        Self { literals, grouping, rewrite: None }
    }

    pub fn with_rewrite(mut self, rewrite: Rewrite<'r>) -> Self {
        self.rewrite = Some(rewrite);
        self
    }
}

pub fn render_expr(expr: &Expr, style: &RenderStyle<'_>) -> String {
    let mut out = String::new();
    write_expr(&mut out, expr, style);
    out
}

fn write_expr(out: &mut String, expr: &Expr, style: &RenderStyle<'_>) {
    match expr {
        Expr::Literal { value, radix } => out.push_str(&render_literal(*value, *radix, style.literals)),
        Expr::Identifier { name } => {
            match style.rewrite.and_then(|rewrite| rewrite(name)) {
                Some(spelled) => out.push_str(&spelled),
                None => out.push_str(name),
            }
        }
        Expr::Unary { op, operand } => {
            out.push_str(op.symbol());
            // `- -1` must not become the decrement operator
            let group = match &**operand {
                Expr::Binary { .. } => true,
                Expr::Unary { op: inner, .. } => inner == op && *op != UnaryOp::BitNot,
                _ => false,
            };
            write_operand(out, operand, group, style);
        }
        Expr::Binary { op, left, right } => {
            let left_group = match &**left {
                Expr::Binary { op: inner, .. } => {
                    style.grouping == Grouping::Explicit || inner.precedence() < op.precedence()
                }
                _ => false,
            };
            // operators are left associative, so an equal-precedence right
            // operand needs its parentheses back
            let right_group = match &**right {
                Expr::Binary { op: inner, .. } => {
                    style.grouping == Grouping::Explicit || inner.precedence() <= op.precedence()
                }
                _ => false,
            };
            write_operand(out, left, left_group, style);
            out.push(' ');
            out.push_str(op.symbol());
            out.push(' ');
            write_operand(out, right, right_group, style);
        }
        Expr::Parenthesized { inner } => {
            out.push('(');
            write_expr(out, inner, style);
            out.push(')');
        }
    }
}

fn write_operand(out: &mut String, expr: &Expr, group: bool, style: &RenderStyle<'_>) {
    if group {
        out.push('(');
        write_expr(out, expr, style);
        out.push(')');
    } else {
        write_expr(out, expr, style);
    }
}

pub fn render_literal(value: LiteralValue, radix: Radix, style: LiteralStyle) -> String {
    match value {
        LiteralValue::Integer(v) => match (radix, style) {
            (Radix::Decimal, _) => v.to_string(),
            (Radix::Hex, _) | (Radix::Binary, LiteralStyle::BinaryAsHex) => format!("0x{v:X}"),
            (Radix::Binary, LiteralStyle::PreserveRadix) => format!("0b{v:b}"),
        },
        LiteralValue::Float(v) => format!("{v:?}"),
    }
}
