use std::fmt;

use serde::{Deserialize, Serialize};

/// Spelling of an integer literal in the source.
///
/// Kept so that backends re-emit `0xFF` as `0xFF` rather than `255`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Radix {
    #[default]
    Decimal,
    Hex,
    Binary,
}

impl Radix {
    pub fn is_decimal(&self) -> bool {
        *self == Radix::Decimal
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LiteralValue {
    Integer(u64),
    Float(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    #[serde(rename = "+")]
    Plus,
    #[serde(rename = "-")]
    Neg,
    #[serde(rename = "~")]
    BitNot,
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Plus => "+",
            UnaryOp::Neg => "-",
            UnaryOp::BitNot => "~",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    #[serde(rename = "|")]
    BitOr,
    #[serde(rename = "&")]
    BitAnd,
    #[serde(rename = "<<")]
    Shl,
    #[serde(rename = ">>")]
    Shr,
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Sub,
    #[serde(rename = "*")]
    Mul,
    #[serde(rename = "/")]
    Div,
    #[serde(rename = "%")]
    Rem,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::BitOr => "|",
            BinaryOp::BitAnd => "&",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
        }
    }

    /// Binding strength in the IDL grammar; higher binds tighter.
    ///
    /// All three target languages agree on the relative order of these operators.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::BitOr => 1,
            BinaryOp::BitAnd => 2,
            BinaryOp::Shl | BinaryOp::Shr => 3,
            BinaryOp::Add | BinaryOp::Sub => 4,
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => 5,
        }
    }
}

/// Constant expression attached to an enum value or a constant.
///
/// Expressions are never evaluated by the compiler; backends re-emit them
/// structurally and leave evaluation to the target toolchain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Expr {
    Literal {
        value: LiteralValue,
        #[serde(default, skip_serializing_if = "Radix::is_decimal")]
        radix: Radix,
    },
    Identifier {
        name: String,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Parenthesized {
        inner: Box<Expr>,
    },
}

impl Expr {
    pub fn int(value: u64) -> Expr {
        Expr::Literal { value: LiteralValue::Integer(value), radix: Radix::Decimal }
    }

    pub fn int_with_radix(value: u64, radix: Radix) -> Expr {
        Expr::Literal { value: LiteralValue::Integer(value), radix }
    }

    pub fn float(value: f64) -> Expr {
        Expr::Literal { value: LiteralValue::Float(value), radix: Radix::Decimal }
    }

    pub fn ident(name: impl Into<String>) -> Expr {
        Expr::Identifier { name: name.into() }
    }

    pub fn unary(op: UnaryOp, operand: Expr) -> Expr {
        Expr::Unary { op, operand: Box::new(operand) }
    }

    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
        Expr::Binary { op, left: Box::new(left), right: Box::new(right) }
    }

    pub fn paren(inner: Expr) -> Expr {
        Expr::Parenthesized { inner: Box::new(inner) }
    }

    /// Every identifier the expression refers to, in source order.
    pub fn identifiers(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_identifiers(&mut names);
        names
    }

    fn collect_identifiers<'e>(&'e self, names: &mut Vec<&'e str>) {
        match self {
            Expr::Literal { .. } => {}
            Expr::Identifier { name } => names.push(name),
            Expr::Unary { operand, .. } => operand.collect_identifiers(names),
            Expr::Binary { left, right, .. } => {
                left.collect_identifiers(names);
                right.collect_identifiers(names);
            }
            Expr::Parenthesized { inner } => inner.collect_identifiers(names),
        }
    }

    /// A literal, optionally behind one sign: `3`, `-1`, `+0x10`.
    pub fn is_simple_literal(&self) -> bool {
        match self {
            Expr::Literal { .. } => true,
            Expr::Unary { op: UnaryOp::Neg | UnaryOp::Plus, operand } => {
                matches!(**operand, Expr::Literal { .. })
            }
            _ => false,
        }
    }
}

impl fmt::Display for Expr {
    /// IDL spelling, radix preserved.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal { value: LiteralValue::Integer(v), radix } => match radix {
                Radix::Decimal => write!(f, "{v}"),
                Radix::Hex => write!(f, "0x{v:X}"),
                Radix::Binary => write!(f, "0b{v:b}"),
            },
            Expr::Literal { value: LiteralValue::Float(v), .. } => write!(f, "{v:?}"),
            Expr::Identifier { name } => f.write_str(name),
            Expr::Unary { op, operand } => match &**operand {
                Expr::Unary { op: inner, .. } if inner == op => write!(f, "{}({operand})", op.symbol()),
                _ => write!(f, "{}{operand}", op.symbol()),
            },
            Expr::Binary { op, left, right } => write!(f, "{left} {} {right}", op.symbol()),
            Expr::Parenthesized { inner } => write!(f, "({inner})"),
        }
    }
}
