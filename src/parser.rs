// Deliberately avoid `?` operator throughout this module for compile-time
// performance: explicit match/if-let prevents the compiler from generating
// From::from conversion and drop-glue machinery at every call site.
#![allow(clippy::question_mark)]
#![allow(unsafe_code)]

use crate::{
    Arena, Array, Document, Field, Fields, Span, Value,
    array::{ArrayBuf, MAX_ARRAY_ITEMS},
    error::{Error, ErrorKind},
    lexer::{Lexer, Token, TokenKind, TokenValue},
    value::{ValueKind, Vector},
};
use std::ptr::NonNull;

/// Maximum number of objects that may enclose a field.
pub const MAX_NESTING_DEPTH: usize = 128;

/// Longest source [`parse`] accepts, in bytes. Spans are `u32` offsets.
pub const MAX_SOURCE_LEN: usize = u32::MAX as usize;

// ---------------------------------------------------------------------------
// Lightweight internal error -- zero-sized, no drop glue.
// When a method returns Err(ParseError), the full error details have already
// been latched into Parser::error.
// ---------------------------------------------------------------------------

#[derive(Copy, Clone)]
struct ParseError;

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

struct Parser<'a, 'b> {
    arena: &'b Arena<'a>,
    lexer: Lexer<'a>,
    current: Token<'a>,
    #[cfg_attr(not(feature = "tracing"), allow(dead_code))]
    previous: Token<'a>,
    /// Objects currently open.
    depth: usize,
    /// First error wins; later ones are dropped.
    error: Option<Error>,
}

impl<'a, 'b> Parser<'a, 'b> {
    fn new(arena: &'b Arena<'a>, source: &'a [u8]) -> Self {
        Parser {
            arena,
            lexer: Lexer::new(source),
            current: Token::START,
            previous: Token::START,
            depth: 0,
            error: None,
        }
    }

    // -- error helpers ------------------------------------------------------

    #[cold]
    fn set_error(&mut self, token: Token<'a>, kind: ErrorKind) -> ParseError {
        if self.error.is_none() {
            debug_event!(
                code = kind.code(),
                line = token.line,
                column = token.column,
                after = self.previous.kind.describe(),
                "fld parse error latched"
            );
            self.error = Some(Error::new(kind, token.line, token.column, token.span));
        }
        ParseError
    }

    #[cold]
    fn unexpected(&mut self, expected: &'static str) -> ParseError {
        let found = self.current.kind.describe();
        self.set_error(self.current, ErrorKind::UnexpectedToken { expected, found })
    }

    #[cold]
    fn out_of_memory(&mut self) -> ParseError {
        self.set_error(self.current, ErrorKind::OutOfMemory)
    }

    fn take_error(&mut self) -> Error {
        match self.error.take() {
            Some(error) => error,
            // Every ParseError is created through set_error.
            None => Error::new(
                ErrorKind::UnexpectedToken {
                    expected: "a key",
                    found: self.current.kind.describe(),
                },
                self.current.line,
                self.current.column,
                self.current.span,
            ),
        }
    }

    // -- token operations ---------------------------------------------------

    /// Moves to the next token. Lexer error tokens are latched as soon as
    /// they become current.
    fn advance(&mut self) -> Result<(), ParseError> {
        self.previous = self.current;
        self.current = self.lexer.scan_token();
        if let TokenValue::Error(kind) = self.current.value {
            return Err(self.set_error(self.current, kind));
        }
        Ok(())
    }

    #[inline]
    fn check(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    fn expect(&mut self, kind: TokenKind) -> Result<(), ParseError> {
        if !self.check(kind) {
            return Err(self.unexpected(kind.describe()));
        }
        self.advance()
    }

    // -- fields -------------------------------------------------------------

    fn parse_document(&mut self) -> Result<Option<NonNull<Field<'a>>>, ParseError> {
        if let Err(e) = self.advance() {
            return Err(e);
        }
        self.parse_fields(None, TokenKind::Eof)
    }

    /// Parses fields until `end` is current, linking them in order. `end`
    /// is not consumed.
    fn parse_fields(
        &mut self,
        parent: Option<NonNull<Field<'a>>>,
        end: TokenKind,
    ) -> Result<Option<NonNull<Field<'a>>>, ParseError> {
        let mut head = None;
        let mut tail: Option<NonNull<Field<'a>>> = None;
        while !self.check(end) {
            let field = match self.parse_field(parent) {
                Ok(field) => field,
                Err(e) => return Err(e),
            };
            match tail {
                // SAFETY: `t` is a finished sibling nothing else refers to yet.
                Some(t) => unsafe { Field::set_next(t, field) },
                None => head = Some(field),
            }
            tail = Some(field);
        }
        Ok(head)
    }

    fn parse_field(
        &mut self,
        parent: Option<NonNull<Field<'a>>>,
    ) -> Result<NonNull<Field<'a>>, ParseError> {
        let key = match self.current.value {
            TokenValue::Str(key) if self.check(TokenKind::Key) => key,
            _ => return Err(self.unexpected("a key")),
        };
        // Allocated before the value so children can point back at it.
        let Some(field) = self.arena.alloc_value(Field::new(key, parent)) else {
            return Err(self.out_of_memory());
        };
        if let Err(e) = self.advance() {
            return Err(e);
        }
        if let Err(e) = self.expect(TokenKind::Equals) {
            return Err(e);
        }
        let value = match self.parse_value(field) {
            Ok(value) => value,
            Err(e) => return Err(e),
        };
        // SAFETY: the field is not linked anywhere yet, and its children only
        // hold a raw parent pointer.
        unsafe { Field::set_value(field, value) };
        if let Err(e) = self.expect(TokenKind::Semicolon) {
            return Err(e);
        }
        Ok(field)
    }

    // -- values -------------------------------------------------------------

    /// Kind of the value the current token starts, if it starts one.
    fn value_kind(&self) -> Option<ValueKind> {
        match (self.current.kind, self.current.value) {
            (TokenKind::String, _) => Some(ValueKind::String),
            (TokenKind::Int, _) => Some(ValueKind::Int),
            (TokenKind::Float, _) => Some(ValueKind::Float),
            (TokenKind::Bool, _) => Some(ValueKind::Bool),
            (TokenKind::BracketLeft, _) => Some(ValueKind::Array),
            (TokenKind::BraceLeft, _) => Some(ValueKind::Object),
            (TokenKind::Vec, TokenValue::Arity(n)) => ValueKind::vector(n as usize),
            _ => None,
        }
    }

    /// The value of a String, Int, Float or Bool token.
    fn scalar(&self) -> Option<Value<'a>> {
        match (self.current.kind, self.current.value) {
            (TokenKind::String, TokenValue::Str(s)) => Some(Value::String(s)),
            (TokenKind::Int, TokenValue::Int(i)) => Some(Value::Int(i)),
            (TokenKind::Float, TokenValue::Float(f)) => Some(Value::Float(f)),
            (TokenKind::Bool, TokenValue::Bool(b)) => Some(Value::Bool(b)),
            _ => None,
        }
    }

    fn parse_value(&mut self, owner: NonNull<Field<'a>>) -> Result<Value<'a>, ParseError> {
        match self.current.kind {
            TokenKind::BraceLeft => self.parse_object(owner),
            TokenKind::BracketLeft => self.parse_array(),
            TokenKind::Vec => self.parse_vector(),
            _ => {
                let Some(value) = self.scalar() else {
                    return Err(self.unexpected("a value"));
                };
                match self.advance() {
                    Ok(()) => Ok(value),
                    Err(e) => Err(e),
                }
            }
        }
    }

    fn parse_object(&mut self, owner: NonNull<Field<'a>>) -> Result<Value<'a>, ParseError> {
        if self.depth == MAX_NESTING_DEPTH {
            return Err(self.set_error(self.current, ErrorKind::NestingTooDeep));
        }
        if let Err(e) = self.advance() {
            return Err(e);
        }
        self.depth += 1;
        let head = self.parse_fields(Some(owner), TokenKind::BraceRight);
        self.depth -= 1;
        let head = match head {
            Ok(head) => head,
            Err(e) => return Err(e),
        };
        if let Err(e) = self.advance() {
            return Err(e);
        }
        Ok(Value::Object(Fields::from_head(head)))
    }

    /// Arrays take two passes over the same tokens: the first checks the
    /// element kinds and counts them, the second fills a buffer sized
    /// exactly for them.
    fn parse_array(&mut self) -> Result<Value<'a>, ParseError> {
        let open = self.current;
        let rewind = self.lexer;

        if let Err(e) = self.advance() {
            return Err(e);
        }
        if self.check(TokenKind::BracketRight) {
            return match self.advance() {
                Ok(()) => Ok(Value::Array(Array::EMPTY)),
                Err(e) => Err(e),
            };
        }

        let kind = match self.value_kind() {
            Some(kind) if kind.is_scalar() => kind,
            Some(_) => return Err(self.set_error(self.current, ErrorKind::ArrayUnsupportedType)),
            None => return Err(self.unexpected("a value")),
        };
        if let Err(e) = self.advance() {
            return Err(e);
        }

        let mut count = 1;
        while self.check(TokenKind::Comma) {
            if let Err(e) = self.advance() {
                return Err(e);
            }
            match self.value_kind() {
                Some(item) if item == kind => {}
                Some(_) => return Err(self.set_error(self.current, ErrorKind::ArrayTypeMismatch)),
                None => return Err(self.unexpected("a value")),
            }
            if count == MAX_ARRAY_ITEMS {
                return Err(self.set_error(self.current, ErrorKind::ArrayTooManyItems));
            }
            count += 1;
            if let Err(e) = self.advance() {
                return Err(e);
            }
        }
        if !self.check(TokenKind::BracketRight) {
            return Err(self.unexpected("a comma or a right bracket"));
        }

        // Second pass: rescan from just after `[`.
        self.lexer = rewind;
        self.current = open;
        if let Err(e) = self.advance() {
            return Err(e);
        }
        let Some(mut buf) = ArrayBuf::alloc(self.arena, kind, count) else {
            return Err(self.out_of_memory());
        };
        for i in 0..count {
            if i > 0 {
                if let Err(e) = self.expect(TokenKind::Comma) {
                    return Err(e);
                }
            }
            let pushed = match self.scalar() {
                Some(value) => buf.push(value),
                None => false,
            };
            if !pushed {
                return Err(self.set_error(self.current, ErrorKind::ArrayTypeMismatch));
            }
            if let Err(e) = self.advance() {
                return Err(e);
            }
        }
        if let Err(e) = self.expect(TokenKind::BracketRight) {
            return Err(e);
        }
        Ok(Value::Array(buf.finish()))
    }

    fn parse_vector(&mut self) -> Result<Value<'a>, ParseError> {
        let arity = match self.current.value {
            TokenValue::Arity(n) => n,
            _ => return Err(self.unexpected("a vector")),
        };
        if let Err(e) = self.advance() {
            return Err(e);
        }
        if let Err(e) = self.expect(TokenKind::ParenLeft) {
            return Err(e);
        }
        let mut components = [0.0f32; 4];
        for i in 0..arity as usize {
            if i > 0 {
                if let Err(e) = self.expect(TokenKind::Comma) {
                    return Err(e);
                }
            }
            components[i] = match self.current.value {
                TokenValue::Int(v) => v as f32,
                TokenValue::Float(v) => v as f32,
                _ => return Err(self.unexpected("a number")),
            };
            if let Err(e) = self.advance() {
                return Err(e);
            }
        }
        if let Err(e) = self.expect(TokenKind::ParenRight) {
            return Err(e);
        }
        Ok(Value::Vector(Vector::new(components, arity)))
    }
}

// ---------------------------------------------------------------------------
// Top-level parse entry point
// ---------------------------------------------------------------------------

/// Number of bytes [`parse`] requires for `source`.
///
/// This is a heuristic upper bound: one value and one field for every four
/// bytes of input, plus the source copy, its terminator and a fixed reserve.
pub fn estimate_memory(source: &str) -> usize {
    estimate_for_len(source.len())
}

fn estimate_for_len(len: usize) -> usize {
    let per_node = std::mem::size_of::<Value<'_>>() + std::mem::size_of::<Field<'_>>();
    (len / 4)
        .saturating_mul(per_node)
        .saturating_add(len)
        .saturating_add(1 + 1024)
}

/// Checks made before the buffer is touched.
fn preflight(len: usize, provided: usize) -> Result<(), Error> {
    if len > MAX_SOURCE_LEN {
        debug_event!(source_len = len, "fld source too large");
        return Err(Error::new(ErrorKind::SourceTooLarge, 1, 1, Span::default()));
    }
    let required = estimate_for_len(len);
    if provided < required {
        debug_event!(required, provided, "fld buffer too small");
        return Err(Error::new(ErrorKind::InsufficientMemory, 1, 1, Span::default()));
    }
    Ok(())
}

/// Parses an FLD document into `memory`.
///
/// `memory` must hold at least [`estimate_memory`] bytes, otherwise the
/// parse fails with [`ErrorKind::InsufficientMemory`] before the buffer is
/// touched. Sources longer than [`MAX_SOURCE_LEN`] fail with
/// [`ErrorKind::SourceTooLarge`]. The source is copied into `memory`, so the
/// returned [`Document`] does not borrow `source`.
///
/// Parsing stops at the first error.
pub fn parse<'a>(source: &str, memory: &'a mut [u8]) -> Result<Document<'a>, Error> {
    if let Err(e) = preflight(source.len(), memory.len()) {
        return Err(e);
    }

    let arena = Arena::new(memory);
    let Some(bytes) = arena.alloc_source(source) else {
        return Err(Error::new(ErrorKind::OutOfMemory, 1, 1, Span::default()));
    };
    debug_event!(source_len = source.len(), capacity = arena.capacity(), "fld parse start");

    let mut parser = Parser::new(&arena, bytes);
    let head = match parser.parse_document() {
        Ok(head) => head,
        Err(ParseError) => return Err(parser.take_error()),
    };

    // SAFETY: `bytes` is a copy of `source` plus one NUL byte.
    let text = unsafe { std::str::from_utf8_unchecked(&bytes[..bytes.len() - 1]) };
    debug_event!(bytes_used = arena.used(), "fld parse finished");
    Ok(Document::new(
        Fields::from_head(head),
        text,
        arena.used(),
        arena.capacity(),
    ))
}

#[cfg(test)]
#[path = "./parser_tests.rs"]
mod tests;
