//! Hand-rolled recursive descent parser over the token stream from [`crate::lexer`].

mod expr;
mod items;
mod types;

use std::path::Path;

use miette::SourceSpan;

use crate::ast::{IdlFile, Span};
use crate::error::{SyntaxError, SyntaxResult};
use crate::lexer::{lex, Token, TokenKind};

/// Parse IDL source text into an [`IdlFile`].
pub fn parse(source: &str) -> SyntaxResult<IdlFile> {
    let tokens = lex(source)?;
    log::debug!("lexed {} tokens", tokens.len());
    let mut parser = Parser::new(&tokens, source.len());
    parser.parse_idl_file()
}

/// Read and parse an IDL file, tagging the result with its path.
pub fn parse_file(path: &Path) -> SyntaxResult<IdlFile> {
    let source = std::fs::read_to_string(path).map_err(|e| SyntaxError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    let mut file = parse(&source)?;
    file.source_file = Some(path.to_path_buf());
    Ok(file)
}

pub struct Parser<'a> {
    tokens: &'a [Token<'a>],
    pos: usize,
    source_len: usize,
    /// Second half of a `>>` already consumed by a closing type bracket.
    pending_gt: bool,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token<'a>], source_len: usize) -> Self {
        Self { tokens, pos: 0, source_len, pending_gt: false }
    }

    /// Peek at the current token without consuming it.
    fn peek(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|t| t.kind)
    }

    fn peek_nth_kind(&self, n: usize) -> Option<TokenKind> {
        self.tokens.get(self.pos + n).map(|t| t.kind)
    }

    fn at(&self, kind: TokenKind) -> bool {
        if self.pending_gt {
            return kind == TokenKind::Gt;
        }
        self.peek_kind() == Some(kind)
    }

    /// True when the current token is the identifier `word`.
    fn at_word(&self, word: &str) -> bool {
        !self.pending_gt && matches!(self.peek(), Some(t) if t.kind == TokenKind::Identifier && t.lexeme == word)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Consume and return the current token.
    fn next(&mut self) -> Option<Token<'a>> {
        if self.pending_gt {
            self.pending_gt = false;
            return self.pos.checked_sub(1).and_then(|i| self.tokens.get(i)).cloned();
        }
        let tok = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        tok
    }

    /// Consume the current token if it has the given kind.
    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.next();
            true
        } else {
            false
        }
    }

    /// Expect the next token to be of a specific kind.
    fn expect(&mut self, expected: TokenKind) -> SyntaxResult<Token<'a>> {
        if self.at(expected) {
            if let Some(tok) = self.next() {
                return Ok(tok);
            }
        }
        Err(self.error_expected(expected.describe()))
    }

    /// Close a generic argument list. A `>>` token closes two lists at once.
    fn expect_close_angle(&mut self) -> SyntaxResult<()> {
        if self.at(TokenKind::Shr) {
            self.pos += 1;
            self.pending_gt = true;
            return Ok(());
        }
        self.expect(TokenKind::Gt).map(|_| ())
    }

    fn expect_identifier(&mut self) -> SyntaxResult<(String, Span)> {
        let tok = self.expect(TokenKind::Identifier)?;
        Ok((tok.lexeme.to_string(), span_of(&tok)))
    }

    /// Error describing what was expected at the current position.
    fn error_expected(&self, expected: &str) -> SyntaxError {
        if self.pending_gt {
            let end = self.last_end();
            return SyntaxError::Parser {
                message: format!("Expected {expected}, found `>`"),
                span: SourceSpan::new((end - 1).into(), 1),
                expected: Some(expected.to_string()),
            };
        }
        match self.peek() {
            Some(tok) => SyntaxError::Parser {
                message: format!("Expected {expected}, found {} `{}`", tok.kind.describe(), tok.lexeme),
                span: tok.span,
                expected: Some(expected.to_string()),
            },
            None => SyntaxError::UnexpectedEof {
                expected: expected.to_string(),
                span: SourceSpan::new(self.source_len.into(), 0),
            },
        }
    }

    /// End offset of the most recently consumed token.
    fn last_end(&self) -> usize {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map_or(0, |t| t.end())
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(start, self.last_end())
    }

    fn current_start(&self) -> usize {
        self.peek().map_or(self.source_len, |t| t.start())
    }
}

fn span_of(tok: &Token<'_>) -> Span {
    Span::new(tok.start(), tok.end())
}
