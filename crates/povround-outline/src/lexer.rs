//! SVG path data lexer.
//!
//! Tokenizes the `d` attribute of an SVG `<path>`. Handles:
//! - Command letters (any ASCII letter; the parser decides which are supported)
//! - Numbers with optional sign, fraction and exponent (e.g. `-1.5`, `.5`, `2e-3`)
//! - Whitespace and commas as interchangeable separators
//!
//! A sign or a second decimal point starts a new number, so `10-5` and
//! `0.5.5` lex as two numbers each, as in SVG.

use crate::error::{OutlineError, Result};

/// A token in SVG path data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token {
    /// A command letter.
    Command(u8),
    /// A number.
    Number(f64),
}

/// A token with the byte offset where it starts.
#[derive(Debug, Clone, Copy)]
pub struct SpannedToken {
    /// The token.
    pub token: Token,
    /// Byte offset of the token's first character.
    pub offset: usize,
}

/// Lexer for SVG path data.
pub struct Lexer<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input.
    pub fn new(input: &'a str) -> Self {
        Self {
            input: input.as_bytes(),
            pos: 0,
        }
    }

    /// Tokenize the entire input.
    pub fn tokenize(&mut self) -> Result<Vec<SpannedToken>> {
        let mut tokens = Vec::new();
        while let Some(tok) = self.next_token()? {
            tokens.push(tok);
        }
        Ok(tokens)
    }

    /// Get the next token, or `None` if at end of input.
    pub fn next_token(&mut self) -> Result<Option<SpannedToken>> {
        self.skip_separators();

        let Some(ch) = self.peek_char() else {
            return Ok(None);
        };
        let offset = self.pos;

        let token = match ch {
            b'A'..=b'Z' | b'a'..=b'z' => {
                self.pos += 1;
                Token::Command(ch)
            }
            b'0'..=b'9' | b'.' | b'-' | b'+' => self.read_number()?,
            _ => {
                return Err(OutlineError::syntax(
                    offset,
                    format!("unexpected character: '{}'", ch as char),
                ));
            }
        };

        Ok(Some(SpannedToken { token, offset }))
    }

    fn peek_char(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn skip_separators(&mut self) {
        while let Some(ch) = self.peek_char() {
            if ch.is_ascii_whitespace() || ch == b',' {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn skip_digits(&mut self) -> usize {
        let start = self.pos;
        while matches!(self.peek_char(), Some(b'0'..=b'9')) {
            self.pos += 1;
        }
        self.pos - start
    }

    fn read_number(&mut self) -> Result<Token> {
        let start = self.pos;

        if matches!(self.peek_char(), Some(b'-' | b'+')) {
            self.pos += 1;
        }

        let mut digits = self.skip_digits();
        if self.peek_char() == Some(b'.') {
            self.pos += 1;
            digits += self.skip_digits();
        }
        if digits == 0 {
            return Err(OutlineError::syntax(start, "expected a number"));
        }

        // Exponent only when followed by digits; otherwise the letter is a command.
        if matches!(self.peek_char(), Some(b'e' | b'E')) {
            let mark = self.pos;
            self.pos += 1;
            if matches!(self.peek_char(), Some(b'-' | b'+')) {
                self.pos += 1;
            }
            if self.skip_digits() == 0 {
                self.pos = mark;
            }
        }

        // Input is a &str and the number is pure ASCII.
        let text = std::str::from_utf8(&self.input[start..self.pos])
            .map_err(|_| OutlineError::syntax(start, "invalid UTF-8 in number"))?;
        text.parse::<f64>()
            .map(Token::Number)
            .map_err(|e| OutlineError::syntax(start, format!("invalid number '{}': {}", text, e)))
    }
}
