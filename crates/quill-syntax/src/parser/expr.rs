use super::{span_of, Parser};
use crate::ast::{BinaryOp, Expr, Radix, UnaryOp};
use crate::error::{SyntaxError, SyntaxResult};
use crate::lexer::{Token, TokenKind};

impl<'a> Parser<'a> {
    //--------------------------------------------------------------------------
    // <Expr> ::= <Or>
    // <Or>    ::= <And> ("|" <And>)*
    // <And>   ::= <Shift> ("&" <Shift>)*
    // <Shift> ::= <Add> (("<<" | ">>") <Add>)*
    // <Add>   ::= <Mul> (("+" | "-") <Mul>)*
    // <Mul>   ::= <Unary> (("*" | "/" | "%") <Unary>)*
    //--------------------------------------------------------------------------

    pub fn parse_expr(&mut self) -> SyntaxResult<Expr> {
        self.parse_binary(1)
    }

    /// Precedence climbing over the left-associative binary operators.
    fn parse_binary(&mut self, min_precedence: u8) -> SyntaxResult<Expr> {
        let mut left = self.parse_unary()?;
        while let Some(op) = self.peek_kind().and_then(binary_op) {
            let precedence = op.precedence();
            if precedence < min_precedence {
                break;
            }
            self.next();
            let right = self.parse_binary(precedence + 1)?;
            left = Expr::binary(op, left, right);
        }
        Ok(left)
    }

    // <Unary> ::= ("+" | "-" | "~") <Unary> | <Primary>
    fn parse_unary(&mut self) -> SyntaxResult<Expr> {
        let op = match self.peek_kind() {
            Some(TokenKind::Plus) => UnaryOp::Plus,
            Some(TokenKind::Minus) => UnaryOp::Neg,
            Some(TokenKind::Tilde) => UnaryOp::BitNot,
            _ => return self.parse_primary(),
        };
        self.next();
        let operand = self.parse_unary()?;
        Ok(Expr::unary(op, operand))
    }

    // <Primary> ::= <number> | <ident> | "(" <Expr> ")"
    fn parse_primary(&mut self) -> SyntaxResult<Expr> {
        let Some(tok) = self.peek().cloned() else {
            return Err(self.error_expected("an expression"));
        };
        match tok.kind {
            TokenKind::Number | TokenKind::HexNumber | TokenKind::BinNumber => {
                self.next();
                parse_integer(&tok)
            }
            TokenKind::FloatNumber => {
                self.next();
                let value = tok.lexeme.parse::<f64>().map_err(|_| invalid_literal(&tok))?;
                Ok(Expr::float(value))
            }
            TokenKind::Identifier => {
                self.next();
                Ok(Expr::ident(tok.lexeme))
            }
            TokenKind::LParen => {
                self.next();
                let inner = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                Ok(Expr::paren(inner))
            }
            _ => Err(self.error_expected("an expression")),
        }
    }
}

fn binary_op(kind: TokenKind) -> Option<BinaryOp> {
    Some(match kind {
        TokenKind::Pipe => BinaryOp::BitOr,
        TokenKind::Ampersand => BinaryOp::BitAnd,
        TokenKind::Shl => BinaryOp::Shl,
        TokenKind::Shr => BinaryOp::Shr,
        TokenKind::Plus => BinaryOp::Add,
        TokenKind::Minus => BinaryOp::Sub,
        TokenKind::Star => BinaryOp::Mul,
        TokenKind::Slash => BinaryOp::Div,
        TokenKind::Percent => BinaryOp::Rem,
        _ => return None,
    })
}

fn parse_integer(tok: &Token<'_>) -> SyntaxResult<Expr> {
    let (digits, radix, base) = match tok.kind {
        TokenKind::HexNumber => (&tok.lexeme[2..], Radix::Hex, 16),
        TokenKind::BinNumber => (&tok.lexeme[2..], Radix::Binary, 2),
        _ => (tok.lexeme, Radix::Decimal, 10),
    };
    let value = u64::from_str_radix(digits, base).map_err(|_| invalid_literal(tok))?;
    Ok(Expr::int_with_radix(value, radix))
}

fn invalid_literal(tok: &Token<'_>) -> SyntaxError {
    let span = span_of(tok);
    SyntaxError::InvalidLiteral { literal: tok.lexeme.to_string(), span: span.into() }
}
