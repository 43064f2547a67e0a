#![allow(unsafe_code)]

//! Pull-based tokenizer over the NUL-terminated arena copy of the source.

use crate::{Span, Str, error::ErrorKind};

/// Longest numeric literal accepted, counting digits and the decimal point
/// but not the sign.
pub const MAX_NUMBER_LEN: usize = 21;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum TokenKind {
    Key,
    Equals,
    String,
    Int,
    Float,
    Bool,
    Vec,
    BraceLeft,
    BraceRight,
    BracketLeft,
    BracketRight,
    ParenLeft,
    ParenRight,
    Semicolon,
    Comma,
    Eof,
    Error,
}

impl TokenKind {
    pub(crate) fn describe(self) -> &'static str {
        match self {
            Self::Key => "an identifier",
            Self::Equals => "an equals",
            Self::String => "a string",
            Self::Int => "an integer",
            Self::Float => "a float",
            Self::Bool => "a boolean",
            Self::Vec => "a vector",
            Self::BraceLeft => "a left brace",
            Self::BraceRight => "a right brace",
            Self::BracketLeft => "a left bracket",
            Self::BracketRight => "a right bracket",
            Self::ParenLeft => "a left paren",
            Self::ParenRight => "a right paren",
            Self::Semicolon => "a semicolon",
            Self::Comma => "a comma",
            Self::Eof => "eof",
            Self::Error => "an invalid token",
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) enum TokenValue<'a> {
    None,
    Str(Str<'a>),
    Int(i64),
    Float(f64),
    Bool(bool),
    Arity(u8),
    Error(ErrorKind),
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Token<'a> {
    pub(crate) kind: TokenKind,
    pub(crate) value: TokenValue<'a>,
    /// 1-based line of the first byte.
    pub(crate) line: u32,
    /// 1-based column of the first byte.
    pub(crate) column: u32,
    pub(crate) span: Span,
}

impl Token<'_> {
    /// Placeholder used before the first scan.
    pub(crate) const START: Token<'static> = Token {
        kind: TokenKind::Eof,
        value: TokenValue::None,
        line: 1,
        column: 1,
        span: Span { start: 0, end: 0 },
    };
}

/// Scanner state. `Copy` so the parser can snapshot and rewind it.
#[derive(Clone, Copy)]
pub(crate) struct Lexer<'a> {
    /// Source bytes followed by a NUL terminator.
    bytes: &'a [u8],
    start: usize,
    cursor: usize,
    line: u32,
    column: u32,
    start_line: u32,
    start_column: u32,
}

impl<'a> Lexer<'a> {
    /// `bytes` must be valid UTF-8 followed by a single NUL byte.
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        debug_assert_eq!(bytes.last(), Some(&0));
        Lexer {
            bytes,
            start: 0,
            cursor: 0,
            line: 1,
            column: 1,
            start_line: 1,
            start_column: 1,
        }
    }

    /// Get a `&str` slice from the underlying bytes.
    /// SAFETY: the bytes come from a `&str`, and callers must ensure
    /// `start..end` falls on UTF-8 char boundaries.
    #[inline]
    unsafe fn str_slice(&self, start: usize, end: usize) -> &'a str {
        #[cfg(not(debug_assertions))]
        unsafe {
            std::str::from_utf8_unchecked(&self.bytes[start..end])
        }
        #[cfg(debug_assertions)]
        match std::str::from_utf8(&self.bytes[start..end]) {
            Ok(value) => value,
            Err(err) => panic!(
                "Invalid UTF-8 slice: bytes[{}..{}] is not valid UTF-8: {}",
                start, end, err
            ),
        }
    }

    // -- cursor operations --------------------------------------------------

    #[inline]
    fn peek(&self) -> u8 {
        self.bytes.get(self.cursor).copied().unwrap_or(0)
    }

    #[inline]
    fn peek_next(&self) -> u8 {
        self.bytes.get(self.cursor + 1).copied().unwrap_or(0)
    }

    /// Consumes one byte and returns it. Never moves past a NUL.
    #[inline]
    fn advance(&mut self) -> u8 {
        let b = self.peek();
        if b == 0 {
            return 0;
        }
        self.cursor += 1;
        if b == b'\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        b
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                b' ' | b'\r' | b'\t' | b'\n' => {
                    self.advance();
                }
                b'/' if self.peek_next() == b'/' => {
                    while !matches!(self.peek(), b'\n' | 0) {
                        self.advance();
                    }
                }
                b'/' if self.peek_next() == b'*' => {
                    self.advance();
                    self.advance();
                    // Unterminated block comments run to end of input.
                    loop {
                        match self.peek() {
                            0 => break,
                            b'*' if self.peek_next() == b'/' => {
                                self.advance();
                                self.advance();
                                break;
                            }
                            _ => {
                                self.advance();
                            }
                        }
                    }
                }
                _ => return,
            }
        }
    }

    // -- token construction -------------------------------------------------

    #[inline]
    fn make(&self, kind: TokenKind, value: TokenValue<'a>) -> Token<'a> {
        Token {
            kind,
            value,
            line: self.start_line,
            column: self.start_column,
            span: Span::from_offsets(self.start, self.cursor),
        }
    }

    /// An error token positioned at the cursor rather than the token start.
    #[cold]
    fn error_here(&self, kind: ErrorKind) -> Token<'a> {
        // Zero-width at the end of input.
        let end = if self.peek() == 0 { self.cursor } else { self.cursor + 1 };
        Token {
            kind: TokenKind::Error,
            value: TokenValue::Error(kind),
            line: self.line,
            column: self.column,
            span: Span::from_offsets(self.cursor, end),
        }
    }

    #[cold]
    fn error_at_start(&self, kind: ErrorKind) -> Token<'a> {
        self.make(TokenKind::Error, TokenValue::Error(kind))
    }

    /// Scans and returns the next token. After the end of input every call
    /// returns an `Eof` token.
    pub(crate) fn scan_token(&mut self) -> Token<'a> {
        self.skip_trivia();

        self.start = self.cursor;
        self.start_line = self.line;
        self.start_column = self.column;

        let c = self.peek();
        let kind = match c {
            0 => return self.make(TokenKind::Eof, TokenValue::None),
            b'=' => TokenKind::Equals,
            b'{' => TokenKind::BraceLeft,
            b'}' => TokenKind::BraceRight,
            b'[' => TokenKind::BracketLeft,
            b']' => TokenKind::BracketRight,
            b'(' => TokenKind::ParenLeft,
            b')' => TokenKind::ParenRight,
            b';' => TokenKind::Semicolon,
            b',' => TokenKind::Comma,
            b'"' => return self.string(),
            b'0'..=b'9' => return self.number(false),
            b'+' | b'-' if self.peek_next().is_ascii_digit() => {
                self.advance();
                return self.number(c == b'-');
            }
            b if b.is_ascii_alphabetic() || b == b'_' => return self.identifier(),
            _ => return self.unexpected_character(),
        };
        self.advance();
        self.make(kind, TokenValue::None)
    }

    #[cold]
    fn unexpected_character(&mut self) -> Token<'a> {
        // Token starts always sit on a char boundary: everything consumed so
        // far ends on an ASCII byte or a completed string.
        let rest = unsafe { self.str_slice(self.start, self.bytes.len() - 1) };
        let ch = rest.chars().next().unwrap_or('\0');
        self.advance();
        // Continuation bytes belong to the same column.
        self.cursor = self.start + ch.len_utf8();
        self.error_at_start(ErrorKind::UnexpectedCharacter(ch))
    }

    fn string(&mut self) -> Token<'a> {
        self.advance();
        let content_start = self.cursor;
        loop {
            match self.peek() {
                b'"' => break,
                0 => return self.error_here(ErrorKind::UnterminatedString),
                _ => {
                    self.advance();
                }
            }
        }
        // SAFETY: bounded by ASCII quotes.
        let text = unsafe { self.str_slice(content_start, self.cursor) };
        self.advance();
        self.make(TokenKind::String, TokenValue::Str(Str::from(text)))
    }

    fn identifier(&mut self) -> Token<'a> {
        while matches!(self.peek(), b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'_') {
            self.advance();
        }
        // SAFETY: identifiers are ASCII.
        let ident = unsafe { self.str_slice(self.start, self.cursor) };
        match ident.as_bytes() {
            b"true" => self.make(TokenKind::Bool, TokenValue::Bool(true)),
            b"false" => self.make(TokenKind::Bool, TokenValue::Bool(false)),
            &[b'v', b'e', b'c', n @ b'0'..=b'9'] => match n {
                b'2'..=b'4' => self.make(TokenKind::Vec, TokenValue::Arity(n - b'0')),
                _ => self.error_at_start(ErrorKind::InvalidVectorSize),
            },
            _ => self.make(TokenKind::Key, TokenValue::Str(Str::from(ident))),
        }
    }

    /// Scans `digits ['.' digits]`. The sign, if any, is already consumed.
    fn number(&mut self, negative: bool) -> Token<'a> {
        let digits_start = self.cursor;
        let mut len = 0usize;
        let mut dot = None;

        loop {
            let b = self.peek();
            let is_dot = b == b'.' && dot.is_none() && self.peek_next().is_ascii_digit();
            if !(b.is_ascii_digit() || is_dot) {
                break;
            }
            if len == MAX_NUMBER_LEN {
                return self.error_here(ErrorKind::InvalidNumber);
            }
            if is_dot {
                dot = Some(self.cursor);
            }
            self.advance();
            len += 1;
        }

        let digits = &self.bytes[digits_start..self.cursor];
        let sign = if negative { -1 } else { 1 };
        match dot {
            None => match parse_int(digits, negative) {
                Some(v) => self.make(TokenKind::Int, TokenValue::Int(v)),
                None => self.error_at_start(ErrorKind::InvalidNumber),
            },
            Some(dot) => {
                let (int, frac) = digits.split_at(dot - digits_start);
                let v = parse_float(int, &frac[1..]);
                self.make(TokenKind::Float, TokenValue::Float(v * sign as f64))
            }
        }
    }
}

/// Digit accumulation with overflow detection. `i64::MIN` is reachable
/// through the negative branch.
fn parse_int(digits: &[u8], negative: bool) -> Option<i64> {
    let mut magnitude: u64 = 0;
    for &d in digits {
        magnitude = match magnitude
            .checked_mul(10)
            .and_then(|m| m.checked_add(u64::from(d - b'0')))
        {
            Some(m) => m,
            None => return None,
        };
    }
    if negative {
        0i64.checked_sub_unsigned(magnitude)
    } else {
        i64::try_from(magnitude).ok()
    }
}

const POW10: [f64; 23] = [
    1e0, 1e1, 1e2, 1e3, 1e4, 1e5, 1e6, 1e7, 1e8, 1e9, 1e10, 1e11, 1e12, 1e13, 1e14, 1e15, 1e16,
    1e17, 1e18, 1e19, 1e20, 1e21, 1e22,
];

/// Converts `int.frac` digit runs to a float.
///
/// When the combined mantissa fits in 53 bits the result is a single exact
/// division and therefore correctly rounded. Longer mantissas fall back to
/// plain accumulation, which can be off by an ulp.
fn parse_float(int: &[u8], frac: &[u8]) -> f64 {
    let mut mantissa: u64 = 0;
    let mut exact = true;
    for &d in int.iter().chain(frac) {
        match mantissa
            .checked_mul(10)
            .and_then(|m| m.checked_add(u64::from(d - b'0')))
        {
            Some(m) if m <= 1 << 53 => mantissa = m,
            _ => {
                exact = false;
                break;
            }
        }
    }
    if exact {
        // frac.len() < MAX_NUMBER_LEN < POW10.len()
        return mantissa as f64 / POW10[frac.len()];
    }

    let mut value = 0.0f64;
    for &d in int {
        value = value * 10.0 + f64::from(d - b'0');
    }
    let mut scale = 1.0f64;
    for &d in frac {
        scale /= 10.0;
        value += f64::from(d - b'0') * scale;
    }
    value
}

#[cfg(test)]
#[path = "./lexer_tests.rs"]
mod tests;
