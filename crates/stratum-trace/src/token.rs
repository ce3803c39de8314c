//! Token definitions for the transition log grammar

use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t]+")] // Skip whitespace
pub enum TokenKind {
    // === Keywords ===
    #[token("of")]
    Of,
    #[token("size")]
    Size,
    #[token("objects")]
    Objects,
    #[token("elements:")]
    Elements,

    // === Punctuation ===
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("->")]
    Arrow,

    // === Literals ===
    #[regex(r"[0-9]+", priority = 2)]
    Int,

    // === Names (strategies, host classes, operations) ===
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Word,

    // === Special ===
    Error,
    Eof,
}

impl TokenKind {
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::Of => "'of'",
            TokenKind::Size => "'size'",
            TokenKind::Objects => "'objects'",
            TokenKind::Elements => "'elements:'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::Arrow => "'->'",
            TokenKind::Int => "count",
            TokenKind::Word => "name",
            TokenKind::Error => "error",
            TokenKind::Eof => "end of line",
        }
    }
}

/// A token with its span into the source line
#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub span: std::ops::Range<usize>,
}

impl Token {
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.span.clone()]
    }
}

/// Tokenize one log line into a vector of tokens
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(source);

    while let Some(result) = lexer.next() {
        let kind = match result {
            Ok(kind) => kind,
            Err(_) => TokenKind::Error,
        };
        tokens.push(Token {
            kind,
            span: lexer.span(),
        });
    }

    // Add EOF token
    let end = source.len();
    tokens.push(Token {
        kind: TokenKind::Eof,
        span: end..end,
    });

    tokens
}
