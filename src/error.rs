use crate::Span;
use std::fmt::{self, Debug, Display};

/// The error latched by a failed [`parse`](crate::parse).
///
/// Only the first error encountered is kept; parsing stops there.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Error {
    /// The error kind
    pub kind: ErrorKind,
    /// 1-based line of the offending token.
    pub line: u32,
    /// 1-based column where the offending token starts.
    pub column: u32,
    /// Byte range of the offending token in the source. Empty for errors
    /// raised before the source is scanned.
    pub span: Span,
}

impl Error {
    #[inline]
    pub(crate) fn new(kind: ErrorKind, line: u32, column: u32, span: Span) -> Self {
        Self {
            kind,
            line,
            column,
            span,
        }
    }

    /// Returns `(line, column)`, both 1-based.
    #[inline]
    pub fn position(&self) -> (u32, u32) {
        (self.line, self.column)
    }
}

impl std::error::Error for Error {}

impl Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Error")
            .field("kind", &self.kind)
            .field("line", &self.line)
            .field("column", &self.column)
            .field("span", &self.span)
            .finish()
    }
}

/// Every way a parse can fail.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The arena ran out of room part way through the document.
    OutOfMemory,

    /// The buffer handed to [`parse`](crate::parse) is smaller than
    /// [`estimate_memory`](crate::estimate_memory) asks for. Nothing was
    /// written to it.
    InsufficientMemory,

    /// Wanted one sort of token, but found another.
    UnexpectedToken {
        /// Expected token type.
        expected: &'static str,
        /// Actually found token type.
        found: &'static str,
    },

    /// A numeric literal is too long or does not fit in 64 bits.
    InvalidNumber,

    /// An array element has a different kind than the first element.
    ArrayTypeMismatch,

    /// The first element of an array is an array, object or vector.
    ArrayUnsupportedType,

    /// An array holds more than [`MAX_ARRAY_ITEMS`](crate::MAX_ARRAY_ITEMS)
    /// elements.
    ArrayTooManyItems,

    /// End of input was reached inside a string literal.
    UnterminatedString,

    /// A character that cannot start any token.
    UnexpectedCharacter(char),

    /// `vecN` with `N` outside `2..=4`.
    InvalidVectorSize,

    /// Objects nested deeper than
    /// [`MAX_NESTING_DEPTH`](crate::MAX_NESTING_DEPTH).
    NestingTooDeep,

    /// The source is longer than [`MAX_SOURCE_LEN`](crate::MAX_SOURCE_LEN)
    /// bytes. Nothing was written to the buffer.
    SourceTooLarge,
}

impl ErrorKind {
    /// Stable, machine-friendly identifier.
    pub fn code(&self) -> &'static str {
        match self {
            Self::OutOfMemory => "out-of-memory",
            Self::InsufficientMemory => "insufficient-memory",
            Self::UnexpectedToken { .. } => "unexpected-token",
            Self::InvalidNumber => "invalid-number",
            Self::ArrayTypeMismatch => "array-type-mismatch",
            Self::ArrayUnsupportedType => "array-unsupported-type",
            Self::ArrayTooManyItems => "array-too-many-items",
            Self::UnterminatedString => "unterminated-string",
            Self::UnexpectedCharacter(..) => "unexpected-character",
            Self::InvalidVectorSize => "invalid-vector-size",
            Self::NestingTooDeep => "nesting-too-deep",
            Self::SourceTooLarge => "source-too-large",
        }
    }

    /// Human-readable summary of the kind, without position information.
    pub fn description(&self) -> &'static str {
        match self {
            Self::OutOfMemory => "Out of memory",
            Self::InsufficientMemory => "Insufficient memory provided",
            Self::UnexpectedToken { .. } => "Unexpected token",
            Self::InvalidNumber => "Invalid number format",
            Self::ArrayTypeMismatch => "Array type mismatch",
            Self::ArrayUnsupportedType => "Unsupported array type",
            Self::ArrayTooManyItems => "Too many items in array",
            Self::UnterminatedString => "Unterminated string",
            Self::UnexpectedCharacter(..) => "Unexpected character",
            Self::InvalidVectorSize => "Invalid vector size",
            Self::NestingTooDeep => "Objects nested too deeply",
            Self::SourceTooLarge => "Source too large",
        }
    }

    /// `true` for grammar violations, including the lexer-level ones
    /// (unterminated strings, stray characters, bad `vecN` sizes).
    pub fn is_unexpected_token(&self) -> bool {
        matches!(
            self,
            Self::UnexpectedToken { .. }
                | Self::UnterminatedString
                | Self::UnexpectedCharacter(..)
                | Self::InvalidVectorSize
        )
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Debug for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

struct Escape(char);

impl fmt::Display for Escape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use std::fmt::Write as _;

        if self.0.is_whitespace() || self.0.is_control() {
            for esc in self.0.escape_default() {
                f.write_char(esc)?;
            }
            Ok(())
        } else {
            f.write_char(self.0)
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::UnexpectedToken { expected, found } => {
                write!(f, "expected {expected}, found {found}")?;
            }
            ErrorKind::UnexpectedCharacter(c) => {
                write!(f, "unexpected character `{}`", Escape(*c))?;
            }
            // Raised before scanning, so there is no position.
            ErrorKind::InsufficientMemory | ErrorKind::SourceTooLarge => {
                return f.write_str(&self.kind.description().to_ascii_lowercase());
            }
            kind => f.write_str(&kind.description().to_ascii_lowercase())?,
        }
        write!(f, " at line {}, column {}", self.line, self.column)
    }
}

#[cfg(feature = "reporting")]
#[cfg_attr(docsrs, doc(cfg(feature = "reporting")))]
impl Error {
    /// Converts this [`Error`] into a [`codespan_reporting::diagnostic::Diagnostic`]
    pub fn to_diagnostic<FileId: Copy + PartialEq>(
        &self,
        fid: FileId,
    ) -> codespan_reporting::diagnostic::Diagnostic<FileId> {
        use codespan_reporting::diagnostic::{Diagnostic, Label};

        let diag = Diagnostic::error()
            .with_code(self.kind.code())
            .with_message(self.kind.description());

        match &self.kind {
            ErrorKind::InsufficientMemory => diag.with_notes(vec![
                "use `fld::estimate_memory` to size the buffer".to_owned(),
            ]),
            ErrorKind::UnexpectedToken { expected, .. } => diag.with_labels(vec![
                Label::primary(fid, self.span).with_message(format!("expected {expected}")),
            ]),
            ErrorKind::UnexpectedCharacter(c) => diag.with_labels(vec![
                Label::primary(fid, self.span)
                    .with_message(format!("unexpected character '{}'", Escape(*c))),
            ]),
            ErrorKind::UnterminatedString => diag.with_labels(vec![
                Label::primary(fid, self.span).with_message("eof reached before string terminator"),
            ]),
            ErrorKind::InvalidNumber => diag.with_labels(vec![
                Label::primary(fid, self.span).with_message("unable to parse number"),
            ]),
            ErrorKind::InvalidVectorSize => diag.with_labels(vec![
                Label::primary(fid, self.span).with_message("only vec2, vec3 and vec4 exist"),
            ]),
            ErrorKind::ArrayTypeMismatch => diag.with_labels(vec![
                Label::primary(fid, self.span)
                    .with_message("element kind differs from the first element"),
            ]),
            ErrorKind::ArrayUnsupportedType => diag.with_labels(vec![
                Label::primary(fid, self.span)
                    .with_message("arrays may only hold strings, numbers or booleans"),
            ]),
            ErrorKind::ArrayTooManyItems => diag.with_labels(vec![
                Label::primary(fid, self.span).with_message(format!(
                    "arrays hold at most {} items",
                    crate::MAX_ARRAY_ITEMS
                )),
            ]),
            ErrorKind::SourceTooLarge => diag.with_notes(vec![format!(
                "sources are limited to {} bytes",
                crate::MAX_SOURCE_LEN
            )]),
            ErrorKind::NestingTooDeep => diag.with_labels(vec![
                Label::primary(fid, self.span).with_message(format!(
                    "objects nest at most {} levels deep",
                    crate::MAX_NESTING_DEPTH
                )),
            ]),
            ErrorKind::OutOfMemory => {
                diag.with_labels(vec![Label::primary(fid, self.span).with_message("arena exhausted here")])
            }
        }
    }
}

#[cfg(test)]
#[path = "./error_tests.rs"]
mod tests;
