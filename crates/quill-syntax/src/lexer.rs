use logos::Logos;
use miette::SourceSpan;

use crate::error::{SyntaxError, SyntaxResult};

/// A token spans from `start` to `end` within the original source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub lexeme: &'a str,
    pub span: SourceSpan,
}

impl Token<'_> {
    pub fn start(&self) -> usize {
        self.span.offset()
    }

    pub fn end(&self) -> usize {
        self.span.offset() + self.span.len()
    }
}

/// All tokens of the IDL grammar.
///
/// Only the declaration keywords are reserved; `dict`, `set`, `array`,
/// `writable` and the primitive type names are recognized by the parser in
/// context, so they stay usable as member names.
#[derive(Debug, Logos, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    // Keywords
    #[token("namespace")]
    Namespace,
    #[token("interface")]
    Interface,
    #[token("enum")]
    Enum,
    #[token("typedef")]
    Typedef,
    #[token("const")]
    Const,

    // Multi-character operators
    #[token("<<")]
    Shl,
    #[token(">>")]
    Shr,

    // Single-character operators
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("&")]
    Ampersand,
    #[token("|")]
    Pipe,
    #[token("~")]
    Tilde,
    #[token("=")]
    Eq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("?")]
    Question,

    // Punctuation
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,

    // Numbers
    #[regex(r"0[xX][0-9a-fA-F]+")]
    HexNumber,
    #[regex(r"0[bB][01]+")]
    BinNumber,
    #[regex(r"[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?")]
    FloatNumber,
    #[regex(r"[0-9]+")]
    Number,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Identifier,

    #[regex(r"//[^\n]*", logos::skip)]
    LineComment,
    #[token("/*", block_comment)]
    BlockComment,
    #[regex(r"[ \t\n\r\f]+", logos::skip)]
    Whitespace,

    #[error]
    Error,
}

impl TokenKind {
    /// Human readable spelling used in diagnostics.
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Namespace => "`namespace`",
            TokenKind::Interface => "`interface`",
            TokenKind::Enum => "`enum`",
            TokenKind::Typedef => "`typedef`",
            TokenKind::Const => "`const`",
            TokenKind::Shl => "`<<`",
            TokenKind::Shr => "`>>`",
            TokenKind::Plus => "`+`",
            TokenKind::Minus => "`-`",
            TokenKind::Star => "`*`",
            TokenKind::Slash => "`/`",
            TokenKind::Percent => "`%`",
            TokenKind::Ampersand => "`&`",
            TokenKind::Pipe => "`|`",
            TokenKind::Tilde => "`~`",
            TokenKind::Eq => "`=`",
            TokenKind::Lt => "`<`",
            TokenKind::Gt => "`>`",
            TokenKind::Question => "`?`",
            TokenKind::LBrace => "`{`",
            TokenKind::RBrace => "`}`",
            TokenKind::LParen => "`(`",
            TokenKind::RParen => "`)`",
            TokenKind::LBracket => "`[`",
            TokenKind::RBracket => "`]`",
            TokenKind::Comma => "`,`",
            TokenKind::Semicolon => "`;`",
            TokenKind::Colon => "`:`",
            TokenKind::HexNumber => "hex literal",
            TokenKind::BinNumber => "binary literal",
            TokenKind::FloatNumber => "float literal",
            TokenKind::Number => "integer literal",
            TokenKind::Identifier => "identifier",
            TokenKind::LineComment | TokenKind::BlockComment => "comment",
            TokenKind::Whitespace => "whitespace",
            TokenKind::Error => "invalid input",
        }
    }
}

/// Runs a `/* ... */` comment to its closing delimiter. Unterminated comments are errors.
fn block_comment(lex: &mut logos::Lexer<TokenKind>) -> bool {
    match lex.remainder().find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            true
        }
        None => {
            lex.bump(lex.remainder().len());
            false
        }
    }
}

/// Split `source` into tokens, failing on the first unrecognized character.
pub fn lex(source: &str) -> SyntaxResult<Vec<Token<'_>>> {
    let mut lexer = TokenKind::lexer(source);
    let mut tokens = Vec::new();

    while let Some(kind) = lexer.next() {
        let range = lexer.span();
        let span = SourceSpan::new(range.start.into(), range.len());
        if kind == TokenKind::Error {
            return Err(SyntaxError::Lexer {
                message: format!("unexpected character sequence `{}`", lexer.slice()),
                span,
            });
        }
        if kind == TokenKind::BlockComment {
            continue;
        }
        tokens.push(Token { kind, lexeme: lexer.slice(), span });
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn keywords_win_over_identifiers() {
        assert_eq!(
            kinds("interface interfaces enum"),
            vec![TokenKind::Interface, TokenKind::Identifier, TokenKind::Enum]
        );
    }

    #[test]
    fn number_literals_by_radix() {
        assert_eq!(
            kinds("0xFF 0b1010 42 3.25 1.0e-3"),
            vec![
                TokenKind::HexNumber,
                TokenKind::BinNumber,
                TokenKind::Number,
                TokenKind::FloatNumber,
                TokenKind::FloatNumber,
            ]
        );
    }

    #[test]
    fn comments_are_skipped() {
        let source = "// leading\nenum /* inline */ E";
        assert_eq!(kinds(source), vec![TokenKind::Enum, TokenKind::Identifier]);
    }

    #[test]
    fn block_comments_with_extra_stars() {
        let source = "/** doc **/ namespace /* a * b / c */ N /***/";
        assert_eq!(kinds(source), vec![TokenKind::Namespace, TokenKind::Identifier]);
    }

    #[test]
    fn unterminated_block_comment_is_an_error() {
        let err = lex("namespace /* open").unwrap_err();
        assert!(matches!(err, SyntaxError::Lexer { .. }));
    }

    #[test]
    fn shift_right_stays_one_token() {
        assert_eq!(kinds("a>>b"), vec![TokenKind::Identifier, TokenKind::Shr, TokenKind::Identifier]);
    }

    #[test]
    fn spans_point_into_source() {
        let tokens = lex("  namespace Foo").unwrap();
        assert_eq!(tokens[1].lexeme, "Foo");
        assert_eq!(tokens[1].start(), 12);
        assert_eq!(tokens[1].end(), 15);
    }

    #[test]
    fn unknown_character_is_an_error() {
        let err = lex("namespace $").unwrap_err();
        assert!(matches!(err, SyntaxError::Lexer { .. }));
    }
}
