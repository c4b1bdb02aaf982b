use super::Parser;
use crate::ast::{PrimitiveType, Type};
use crate::error::SyntaxResult;
use crate::lexer::TokenKind;

impl<'a> Parser<'a> {
    //--------------------------------------------------------------------------
    // <Type> ::= <BaseType> ("[" "]" | "?")*
    //
    // Suffixes apply left to right: `T[]?` is a nullable array, `T?[]` an
    // array of nullable elements.
    //--------------------------------------------------------------------------

    pub fn parse_type(&mut self) -> SyntaxResult<Type> {
        let mut ty = self.parse_base_type()?;
        loop {
            if self.at(TokenKind::LBracket) && self.peek_nth_kind(1) == Some(TokenKind::RBracket) {
                self.next();
                self.next();
                ty = Type::array(ty);
            } else if self.eat(TokenKind::Question) {
                ty = Type::nullable(ty);
            } else {
                break;
            }
        }
        Ok(ty)
    }

    // <BaseType> ::= <primitive> | "dict" "<" <Type> "," <Type> ">"
    //              | "set" "<" <Type> ">" | "array" "<" <Type> ">" | <ident>
    fn parse_base_type(&mut self) -> SyntaxResult<Type> {
        let Some(tok) = self.peek().filter(|t| t.kind == TokenKind::Identifier).cloned() else {
            return Err(self.error_expected("a type"));
        };
        let generic = self.peek_nth_kind(1) == Some(TokenKind::Lt);

        match tok.lexeme {
            "dict" if generic => {
                self.next();
                self.expect(TokenKind::Lt)?;
                let key = self.parse_type()?;
                self.expect(TokenKind::Comma)?;
                let value = self.parse_type()?;
                self.expect_close_angle()?;
                Ok(Type::dict(key, value))
            }
            "set" if generic => {
                self.next();
                self.expect(TokenKind::Lt)?;
                let element = self.parse_type()?;
                self.expect_close_angle()?;
                Ok(Type::set(element))
            }
            "array" if generic => {
                self.next();
                self.expect(TokenKind::Lt)?;
                let element = self.parse_type()?;
                self.expect_close_angle()?;
                Ok(Type::array(element))
            }
            name => {
                self.next();
                Ok(match PrimitiveType::from_idl_name(name) {
                    Some(primitive) => Type::primitive(primitive),
                    None => Type::type_ref(name),
                })
            }
        }
    }
}
