//! Recursive descent parser for the transition log grammar
//!
//! ```text
//! <operation> (<new>)[ of <classname>] size <n>[ objects <m>][ elements: <c> ...]
//! <operation> (<old> -> <new>)[ of <classname>] size <n>[ objects <m>][ elements: <c> ...]
//! ```
//!
//! Lines that do not match are skipped, never fatal: logs may carry
//! comments or unrelated output interleaved with the events.

use std::io::{self, BufRead};

use crate::entry::LogEntry;
use crate::error::ParseError;
use crate::token::{tokenize, Token, TokenKind};

pub struct Parser<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    pos: usize,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str, tokens: Vec<Token>) -> Self {
        Self {
            source,
            tokens,
            pos: 0,
        }
    }

    // === Utilities ===

    fn current(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or_else(|| {
            self.tokens.last().expect("tokens should have at least EOF")
        })
    }

    fn peek(&self) -> TokenKind {
        self.current().kind
    }

    fn advance(&mut self) -> &Token {
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        // Return the token we just passed
        &self.tokens[self.pos - 1]
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek() == kind
    }

    fn consume(&mut self, kind: TokenKind) -> Result<&Token, ParseError> {
        if self.at(kind) {
            Ok(self.advance())
        } else if self.at(TokenKind::Eof) {
            Err(ParseError::UnexpectedEol)
        } else {
            Err(ParseError::Unexpected {
                expected: kind.describe().to_string(),
                found: self.current().text(self.source).to_string(),
            })
        }
    }

    // Helper to consume a token and extract its text in one step
    fn consume_text(&mut self, kind: TokenKind) -> Result<String, ParseError> {
        let span = self.consume(kind)?.span.clone();
        Ok(self.source[span].to_string())
    }

    fn consume_count(&mut self) -> Result<u64, ParseError> {
        let text = self.consume_text(TokenKind::Int)?;
        text.parse().map_err(|_| ParseError::InvalidCount(text))
    }

    // === Grammar ===

    pub fn parse_entry(&mut self) -> Result<LogEntry, ParseError> {
        let operation = self.consume_text(TokenKind::Word)?;

        self.consume(TokenKind::LParen)?;
        let first = self.consume_text(TokenKind::Word)?;
        let (old, new) = if self.at(TokenKind::Arrow) {
            self.advance();
            (Some(first), self.consume_text(TokenKind::Word)?)
        } else {
            (None, first)
        };
        self.consume(TokenKind::RParen)?;

        let classname = if self.at(TokenKind::Of) {
            self.advance();
            Some(self.consume_text(TokenKind::Word)?)
        } else {
            None
        };

        self.consume(TokenKind::Size)?;
        let size = self.consume_count()?;

        let objects = if self.at(TokenKind::Objects) {
            self.advance();
            self.consume_count()?
        } else {
            1
        };

        let mut element_classes = Vec::new();
        if self.at(TokenKind::Elements) {
            self.advance();
            while self.at(TokenKind::Word) {
                element_classes.push(self.consume_text(TokenKind::Word)?);
            }
        }

        self.consume(TokenKind::Eof)?;

        Ok(LogEntry {
            operation,
            old,
            new,
            classname,
            size,
            objects,
            element_classes,
        })
    }
}

/// Parse a single log line
pub fn parse_line(line: &str) -> Result<LogEntry, ParseError> {
    let tokens = tokenize(line);
    Parser::new(line, tokens).parse_entry()
}

/// One line the reader could not parse
#[derive(Debug, Clone)]
pub struct SkippedLine {
    pub line_number: usize,
    pub content: String,
    pub reason: ParseError,
}

/// Everything a log yielded: the entries plus the skipped lines, so
/// callers can report the latter without the batch aborting.
#[derive(Debug, Default)]
pub struct ParsedLog {
    pub entries: Vec<LogEntry>,
    pub skipped: Vec<SkippedLine>,
}

/// Parse a whole log, line by line. Blank lines are ignored; anything
/// else that does not match the grammar lands in `skipped`.
pub fn parse_log<R: BufRead>(reader: R) -> io::Result<ParsedLog> {
    let mut parsed = ParsedLog::default();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match parse_line(line.trim()) {
            Ok(entry) => parsed.entries.push(entry),
            Err(reason) => parsed.skipped.push(SkippedLine {
                line_number: index + 1,
                content: line,
                reason,
            }),
        }
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_created_line() {
        let entry = parse_line("Created (NilStrategy) size 10").unwrap();
        assert_eq!(entry.operation, "Created");
        assert_eq!(entry.old, None);
        assert_eq!(entry.new, "NilStrategy");
        assert_eq!(entry.classname, None);
        assert_eq!(entry.size, 10);
        assert_eq!(entry.objects, 1);
        assert!(entry.element_classes.is_empty());
    }

    #[test]
    fn test_parse_switched_line_with_all_clauses() {
        let entry = parse_line(
            "Switched (NilStrategy -> GenericStrategy) of VarList size 10 objects 3 elements: Object Integer",
        )
        .unwrap();
        assert_eq!(entry.old.as_deref(), Some("NilStrategy"));
        assert_eq!(entry.new, "GenericStrategy");
        assert_eq!(entry.classname.as_deref(), Some("VarList"));
        assert_eq!(entry.size, 10);
        assert_eq!(entry.objects, 3);
        assert_eq!(entry.element_classes, vec!["Object", "Integer"]);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_line("this is not a transition").is_err());
        assert!(parse_line("Created NilStrategy size 10").is_err());
        assert!(parse_line("Created (NilStrategy) size").is_err());
        assert!(parse_line("Created (NilStrategy) size ten").is_err());
        assert!(parse_line("Created (NilStrategy) size 10 trailing").is_err());
    }

    #[test]
    fn test_parse_log_collects_entries_and_skips() {
        let log = "\
Created (NilStrategy) of VarList size 5
# a comment the logger never wrote

Switched (NilStrategy -> GenericStrategy) of VarList size 5
";
        let parsed = parse_log(log.as_bytes()).unwrap();
        assert_eq!(parsed.entries.len(), 2);
        assert_eq!(parsed.skipped.len(), 1);
        assert_eq!(parsed.skipped[0].line_number, 2);
    }

    #[test]
    fn test_display_parse_roundtrip() {
        let line = "Switched (A -> B) of VarList size 4 objects 2 elements: Integer";
        let entry = parse_line(line).unwrap();
        assert_eq!(entry.to_string(), line);
    }
}
