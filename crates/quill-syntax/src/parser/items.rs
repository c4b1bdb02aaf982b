use super::Parser;
use crate::ast::*;
use crate::error::SyntaxResult;
use crate::lexer::TokenKind;

impl<'a> Parser<'a> {
    //--------------------------------------------------------------------------
    // <File> ::= <Namespace>*
    //--------------------------------------------------------------------------

    pub fn parse_idl_file(&mut self) -> SyntaxResult<IdlFile> {
        let mut namespaces = Vec::new();
        while !self.at_end() {
            namespaces.push(self.parse_namespace()?);
        }
        Ok(IdlFile { namespaces, source_file: None })
    }

    //--------------------------------------------------------------------------
    // <Namespace> ::= "namespace" <ident> "{" <Member>* "}" ";"?
    //--------------------------------------------------------------------------

    fn parse_namespace(&mut self) -> SyntaxResult<Namespace> {
        let start = self.current_start();
        self.expect(TokenKind::Namespace)?;
        let (name, _) = self.expect_identifier()?;
        self.expect(TokenKind::LBrace)?;

        let mut namespace = Namespace::new(name);
        while !self.at(TokenKind::RBrace) {
            self.parse_member(&mut namespace)?;
        }
        self.expect(TokenKind::RBrace)?;
        self.eat(TokenKind::Semicolon);

        namespace.span = Some(self.span_from(start));
        Ok(namespace)
    }

    fn parse_member(&mut self, namespace: &mut Namespace) -> SyntaxResult<()> {
        match self.peek_kind() {
            // `interface IName;` is a forward declaration
            Some(TokenKind::Interface) if self.peek_nth_kind(2) == Some(TokenKind::Semicolon) => {
                let forward = self.parse_forward_declaration()?;
                namespace.forward_declarations.push(forward);
            }
            Some(TokenKind::Interface) => {
                let interface = self.parse_interface()?;
                namespace.interfaces.push(interface);
            }
            Some(TokenKind::Enum) => {
                let decl = self.parse_enum()?;
                namespace.enums.push(decl);
            }
            Some(TokenKind::Typedef) => {
                let typedef = self.parse_typedef()?;
                namespace.typedefs.push(typedef);
            }
            Some(TokenKind::Const) => {
                let constant = self.parse_constant()?;
                namespace.constants.push(constant);
            }
            _ => {
                return Err(self.error_expected(
                    "`interface`, `enum`, `typedef`, `const` or `}`",
                ))
            }
        }
        Ok(())
    }

    fn parse_forward_declaration(&mut self) -> SyntaxResult<ForwardDeclaration> {
        let start = self.current_start();
        self.expect(TokenKind::Interface)?;
        let (name, _) = self.expect_identifier()?;
        self.expect(TokenKind::Semicolon)?;
        Ok(ForwardDeclaration { name, span: Some(self.span_from(start)) })
    }

    //--------------------------------------------------------------------------
    // <Interface> ::= "interface" <ident> "{" (<Method> | <Property>)* "}" ";"?
    //--------------------------------------------------------------------------

    fn parse_interface(&mut self) -> SyntaxResult<Interface> {
        let start = self.current_start();
        self.expect(TokenKind::Interface)?;
        let (name, _) = self.expect_identifier()?;
        self.expect(TokenKind::LBrace)?;

        let mut methods = Vec::new();
        let mut properties = Vec::new();
        while !self.at(TokenKind::RBrace) {
            let member_start = self.current_start();
            let ty = self.parse_type()?;
            let (member_name, _) = self.expect_identifier()?;

            if self.at(TokenKind::LParen) {
                let parameters = self.parse_parameters()?;
                self.expect(TokenKind::Semicolon)?;
                methods.push(Method {
                    name: member_name,
                    return_type: ty,
                    parameters,
                    span: Some(self.span_from(member_start)),
                });
            } else {
                let writable = self.at_word("writable");
                if writable {
                    self.next();
                }
                self.expect(TokenKind::Semicolon)?;
                properties.push(Property {
                    name: member_name,
                    ty,
                    writable,
                    span: Some(self.span_from(member_start)),
                });
            }
        }
        self.expect(TokenKind::RBrace)?;
        self.eat(TokenKind::Semicolon);

        Ok(Interface { name, methods, properties, span: Some(self.span_from(start)) })
    }

    /// "(" (<Type> <ident> ("," <Type> <ident>)*)? ")"
    fn parse_parameters(&mut self) -> SyntaxResult<Vec<Parameter>> {
        self.expect(TokenKind::LParen)?;
        let mut parameters = Vec::new();
        if self.eat(TokenKind::RParen) {
            return Ok(parameters);
        }
        loop {
            let start = self.current_start();
            let ty = self.parse_type()?;
            let (name, _) = self.expect_identifier()?;
            parameters.push(Parameter { name, ty, span: Some(self.span_from(start)) });
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RParen)?;
        Ok(parameters)
    }

    //--------------------------------------------------------------------------
    // <Enum> ::= "enum" <ident> ":" <int-type> "{" (<EnumValue> ("," <EnumValue>)* ","?)? "}" ";"?
    //--------------------------------------------------------------------------

    fn parse_enum(&mut self) -> SyntaxResult<Enum> {
        let start = self.current_start();
        self.expect(TokenKind::Enum)?;
        let (name, _) = self.expect_identifier()?;
        self.expect(TokenKind::Colon)?;
        let backing = self.parse_primitive_keyword(
            &[PrimitiveType::Int32, PrimitiveType::Int64],
            "`int32_t` or `int64_t`",
        )?;
        self.expect(TokenKind::LBrace)?;

        let mut values = Vec::new();
        while !self.at(TokenKind::RBrace) {
            let value_start = self.current_start();
            let (value_name, _) = self.expect_identifier()?;
            self.expect(TokenKind::Eq)?;
            let value = self.parse_expr()?;
            values.push(EnumValue {
                name: value_name,
                value,
                span: Some(self.span_from(value_start)),
            });
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RBrace)?;
        self.eat(TokenKind::Semicolon);

        Ok(Enum { name, backing, values, span: Some(self.span_from(start)) })
    }

    // <Typedef> ::= "typedef" <Type> <ident> ";"
    fn parse_typedef(&mut self) -> SyntaxResult<Typedef> {
        let start = self.current_start();
        self.expect(TokenKind::Typedef)?;
        let ty = self.parse_type()?;
        let (name, _) = self.expect_identifier()?;
        self.expect(TokenKind::Semicolon)?;
        Ok(Typedef { name, ty, span: Some(self.span_from(start)) })
    }

    // <Const> ::= "const" <numeric-type> <ident> "=" <Expr> ";"
    fn parse_constant(&mut self) -> SyntaxResult<Constant> {
        let start = self.current_start();
        self.expect(TokenKind::Const)?;
        let ty = self.parse_primitive_keyword(
            &[
                PrimitiveType::Int32,
                PrimitiveType::Int64,
                PrimitiveType::Float,
                PrimitiveType::Double,
            ],
            "`int32_t`, `int64_t`, `float` or `double`",
        )?;
        let (name, _) = self.expect_identifier()?;
        self.expect(TokenKind::Eq)?;
        let value = self.parse_expr()?;
        self.expect(TokenKind::Semicolon)?;
        Ok(Constant { name, ty, value, span: Some(self.span_from(start)) })
    }

    /// One of the `allowed` primitive type names.
    fn parse_primitive_keyword(
        &mut self,
        allowed: &[PrimitiveType],
        expected: &str,
    ) -> SyntaxResult<PrimitiveType> {
        let found = self
            .peek()
            .filter(|t| t.kind == TokenKind::Identifier)
            .and_then(|t| PrimitiveType::from_idl_name(t.lexeme))
            .filter(|p| allowed.contains(p));
        match found {
            Some(primitive) => {
                self.next();
                Ok(primitive)
            }
            None => Err(self.error_expected(expected)),
        }
    }
}
